use crate::curve::CurveId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MimcError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("round constants of {0} not initialized")]
    UninitializedParameters(CurveId),
    #[error("arithmetic backend operation failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
