use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    /// The service tool ran and reported a non-zero exit status.
    #[error("{stderr}")]
    CallFailed { code: Option<i32>, stderr: String },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {}ms", .limit.as_millis())]
    TimedOut { program: String, limit: Duration },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CameraError>;
