use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unterminated Marker: {0}")]
    UnterminatedMarker(String),
    #[error("Mismatched Block: {0}")]
    MismatchedBlock(String),
    #[error("Invalid Directive: {0}")]
    InvalidDirective(String),
    #[error("Invalid Filter Syntax: {0}")]
    InvalidFilterSyntax(String),
    #[error("Invalid Filter Argument: {0}")]
    InvalidFilterArgument(String),
    #[error("Unknown Filter: {0}")]
    UnknownFilter(String),
    #[error("Serialization Error: {0}")]
    Serialization(String),
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }
}
