use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Value at {path} is not yet known and has no plain JSON form")]
    UnknownValue { path: String },

    #[error("Invalid typed value: {0}")]
    Decode(#[from] serde_json::Error),
}
