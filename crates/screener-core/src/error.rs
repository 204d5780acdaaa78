use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

impl From<std::io::Error> for ScreenerError {
    fn from(e: std::io::Error) -> Self {
        ScreenerError::Storage(e.to_string())
    }
}
