pub mod formula;
pub mod literal;
pub mod qdimacs;
pub mod random;
