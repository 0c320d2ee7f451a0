//! The built-in forms: linear elasticity, Nitsche mortar coupling and load
//! terms, together with their material parameter records.

use crate::assembly::{BilinearForm, LinearForm};
use crate::basis::{QuadratureContext, ShapeFunction};
use crate::interface::Side;
use nalgebra::{Matrix2, Unit, Vector2};
use serde::{Deserialize, Serialize};

/// Lamé parameters of an isotropic linear-elastic material.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LameParameters {
    pub mu: f64,
    pub lambda: f64,
}

/// Young's modulus and Poisson's ratio, the usual engineering constants.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YoungPoisson {
    pub young: f64,
    pub poisson: f64,
}

impl From<YoungPoisson> for LameParameters {
    fn from(params: YoungPoisson) -> Self {
        let YoungPoisson { young, poisson } = params;
        let mu = young / (2.0 * (1.0 + poisson));
        let lambda = young * poisson / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
        Self { mu, lambda }
    }
}

/// The infinitesimal strain tensor of a displacement gradient,
/// `eps = (grad + grad^T) / 2`.
pub fn strain(gradient: &Matrix2<f64>) -> Matrix2<f64> {
    gradient.symmetric_part()
}

/// The linear-elastic stress of a strain tensor,
/// `sigma = 2 mu eps + lambda tr(eps) I`.
pub fn stress(strain: &Matrix2<f64>, parameters: &LameParameters) -> Matrix2<f64> {
    strain * (2.0 * parameters.mu) + Matrix2::identity() * (parameters.lambda * strain.trace())
}

/// The normal-normal component of the stress induced by a displacement
/// gradient, `n . sigma(eps(grad)) . n`.
fn normal_stress(
    gradient: &Matrix2<f64>,
    normal: &Unit<Vector2<f64>>,
    parameters: &LameParameters,
) -> f64 {
    let n = normal.into_inner();
    let traction = stress(&strain(gradient), parameters) * n;
    traction.dot(&n)
}

/// The linear elasticity bilinear form `sigma(eps(u)) : eps(v)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearElasticity {
    pub parameters: LameParameters,
}

impl LinearElasticity {
    pub fn new(parameters: impl Into<LameParameters>) -> Self {
        Self { parameters: parameters.into() }
    }
}

impl BilinearForm for LinearElasticity {
    fn eval(&self, trial: &ShapeFunction, test: &ShapeFunction, _context: &QuadratureContext) -> f64 {
        stress(&strain(&trial.gradient), &self.parameters).dot(&strain(&test.gradient))
    }
}

/// The signed normal jump contribution of one side, `(-1)^side (w . n)`.
fn normal_jump(side: Side, value: &Vector2<f64>, normal: &Unit<Vector2<f64>>) -> f64 {
    side.sign() * value.dot(&normal.into_inner())
}

/// One (trial side, test side) block of the Nitsche coupling form:
///
/// `(alpha / h) ju jv - tu jv - tv ju`
///
/// where `ju = (-1)^i (u . n)` is the signed normal jump contribution of the
/// trial side and `tu = 1/2 n . sigma_i(eps(grad u)) . n` its average normal
/// traction. Summed over all four side pairs this is the symmetric Nitsche
/// interface form: penalty plus consistency, coupling the normal displacement
/// jump of the two bodies without matching meshes or Lagrange multipliers.
///
/// `alpha` is the penalty strength: the penalty scales like `alpha / h`, so
/// interface stiffness grows monotonically with `alpha`. Each side's traction
/// uses that side's material parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NitscheCoupling {
    pub alpha: f64,
    pub materials: [LameParameters; 2],
    pub trial_side: Side,
    pub test_side: Side,
}

impl NitscheCoupling {
    pub fn new(
        alpha: f64,
        materials: [LameParameters; 2],
        trial_side: Side,
        test_side: Side,
    ) -> Self {
        Self { alpha, materials, trial_side, test_side }
    }
}

impl BilinearForm for NitscheCoupling {
    fn eval(&self, trial: &ShapeFunction, test: &ShapeFunction, context: &QuadratureContext) -> f64 {
        let normal = context
            .normal
            .as_ref()
            .expect("interface form requires a facet normal");
        let h = context.element_size;

        let ju = normal_jump(self.trial_side, &trial.value, normal);
        let jv = normal_jump(self.test_side, &test.value, normal);
        let tu = 0.5
            * normal_stress(&trial.gradient, normal, &self.materials[self.trial_side.index()]);
        let tv =
            0.5 * normal_stress(&test.gradient, normal, &self.materials[self.test_side.index()]);

        (self.alpha / h) * ju * jv - tu * jv - tv * ju
    }
}

/// The pure penalty part of the interface form, `(alpha / h) ju jv`.
///
/// Symmetric positive semi-definite for any `alpha > 0`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpPenalty {
    pub alpha: f64,
    pub trial_side: Side,
    pub test_side: Side,
}

impl BilinearForm for JumpPenalty {
    fn eval(&self, trial: &ShapeFunction, test: &ShapeFunction, context: &QuadratureContext) -> f64 {
        let normal = context
            .normal
            .as_ref()
            .expect("interface form requires a facet normal");
        let ju = normal_jump(self.trial_side, &trial.value, normal);
        let jv = normal_jump(self.test_side, &test.value, normal);
        (self.alpha / context.element_size) * ju * jv
    }
}

/// A constant body load, `f . v`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantLoad {
    pub force: Vector2<f64>,
}

impl LinearForm for ConstantLoad {
    fn eval(&self, test: &ShapeFunction, _context: &QuadratureContext) -> f64 {
        self.force.dot(&test.value)
    }
}
