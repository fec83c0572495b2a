pub mod driver;
pub mod occurrence;
pub mod output;
pub mod query;
pub mod search;
