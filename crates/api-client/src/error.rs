use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),

    #[error("The HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The provider answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("The provider reported an error [{code}]: {description}")]
    Provider { code: String, description: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
