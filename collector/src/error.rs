use std::{
    io,
    process::ExitStatus,
    time::Duration,
};

/// Everything that can go wrong while obtaining a report from the Mirth Connect CLI.
///
/// Any of these aborts the current scrape and is reported as `mirth_up 0`.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("The {0} pipe of the CLI process is not available")]
    Pipe(&'static str),
    #[error("Failed to write commands to the CLI: {0}")]
    Write(#[source] io::Error),
    #[error("Failed to read the CLI output: {0}")]
    Read(#[source] io::Error),
    #[error("The CLI exited with {status}: {stderr}")]
    NonZeroExit { status: ExitStatus, stderr: String },
    #[error("Unexpected output: {0}")]
    UnexpectedOutput(String),
    #[error("The CLI did not finish within {0:?}")]
    Timeout(Duration),
}
