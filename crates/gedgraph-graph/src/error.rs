use gedgraph_core::RecordError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Individual {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Record(#[from] RecordError),
}
