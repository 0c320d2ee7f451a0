//! A 2D finite element assembly engine with mortar (Nitsche) interface coupling.
//!
//! The crate provides the pipeline for small two-dimensional elasticity
//! problems posed on one or more triangulated bodies: mesh storage and
//! refinement, reference elements and affine mappings, quadrature bases for
//! interior and interface integration, assembly of user-supplied bilinear and
//! linear forms into sparse matrices, and static condensation with a sparse
//! direct solve. Non-matching bodies are coupled through a derived
//! one-dimensional mortar mesh over which penalty and consistency terms are
//! integrated.

pub mod assembly;
pub mod basis;
pub mod connectivity;
pub mod element;
pub mod error;
pub mod interface;
pub mod mesh;
pub mod quadrature;
pub mod solve;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
