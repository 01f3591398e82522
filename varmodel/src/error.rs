use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid module coordinates '{0}', expected 'group:module:version'")]
    InvalidIdentifier(String),

    #[error("Invalid module selector '{0}', expected 'group:module[:version]'")]
    InvalidSelector(String),

    #[error("Module coordinates '{0}' must not carry a version, expected 'group:module'")]
    UnexpectedVersion(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
