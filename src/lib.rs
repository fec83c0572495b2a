pub mod bench;
pub mod deps;
pub mod error;
pub mod qbf;
