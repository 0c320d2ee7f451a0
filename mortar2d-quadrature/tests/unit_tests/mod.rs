mod triangle;
