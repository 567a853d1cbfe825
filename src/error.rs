use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} must be a positive number")]
    NonPositive(&'static str),

    #[error("invalid matrix mode: {0}")]
    Mode(#[from] matrix_mul::Error),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] prodcons::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
