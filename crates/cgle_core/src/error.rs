use thiserror::Error;

/// Failure category for everything between construction and post-processing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CgleError {
    /// Grid resolution cannot support the stencil or the delay lookups.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// `run_simulation` or an accessor was called before `initialize_state`.
    #[error("state not initialized: {0}")]
    Uninitialized(String),

    /// A derived time/space index falls outside the stored history.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    /// Post-processing could not be carried out on the supplied data.
    #[error("analysis error: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, CgleError>;
