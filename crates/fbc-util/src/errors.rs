use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for everything outside the filtering core.
#[derive(Debug, Error, Diagnostic)]
pub enum FbcError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed filter configuration document.
    #[error("Configuration error: {message}")]
    #[diagnostic(help(
        "The document must declare kind FilterConfiguration and apiVersion olm.operatorframework.io/v1"
    ))]
    Config { message: String },

    /// The catalog could not be read or rendered into the model.
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// The filtered catalog could not be serialized or written.
    #[error("Output error: {message}")]
    Output { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type FbcResult<T> = miette::Result<T>;
