use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Preflight check failed: {0}")]
    Preflight(String),

    #[error("Command failed ({context}) with exit status {status}: {stderr}")]
    Command {
        context: String,
        status: i32,
        stderr: String,
    },

    #[error("Expected artifact missing: {0}")]
    MissingArtifact(String),

    #[error("Step {index} ({name}) failed")]
    StepFailed {
        index: usize,
        name: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Build a command failure, keeping only the tail of stderr.
    pub fn command(context: impl Into<String>, status: i32, stderr: &str) -> Self {
        let lines: Vec<&str> = stderr.trim_end().lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        AppError::Command {
            context: context.into(),
            status,
            stderr: tail,
        }
    }
}

const STDERR_TAIL_LINES: usize = 20;
