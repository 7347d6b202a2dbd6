use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors from the hosted imagery service client.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(&'static str),

    #[error("service returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
