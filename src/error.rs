use thiserror::Error;

/// Fatal conditions the command line reports with their own exit codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepsError {
    #[error(
        "the formula has {0} clauses, unable to process; only formulas with up to 2147483648 clauses are supported"
    )]
    TooManyClauses(usize),
    #[error("invalid query, variable {0} does not exist")]
    QueryOutOfRange(u32),
    #[error("invalid query, variable {0} is not quantified")]
    UnquantifiedQueryVariable(u32),
}

impl DepsError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DepsError::TooManyClauses(_) => 4,
            DepsError::QueryOutOfRange(_) | DepsError::UnquantifiedQueryVariable(_) => 5,
        }
    }
}
