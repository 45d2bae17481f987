use crate::{
    FetchError,
    RawReport,
};
use std::{
    ffi::OsString,
    future::Future,
    io,
    path::Path,
    pin::Pin,
    process::Stdio,
    time::{
        Duration,
        Instant,
    },
};
use tokio::{
    io::AsyncWriteExt as _,
    process::Command,
};

/// The command script piped into the CLI, one command per line.
pub const CLI_COMMANDS: [&str; 2] = ["status", "channel stats"];

/// Anything that can produce a [`RawReport`] on demand.
pub trait ReportSource: Send + Sync {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<RawReport, FetchError>> + Send + '_>>;
}

/// Program and arguments used to start the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl CliCommand {
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `{runtime} -jar {jar_path} -c {config_path}`
    pub fn mirth_cli(runtime: impl Into<OsString>, jar_path: impl AsRef<Path>, config_path: impl AsRef<Path>) -> Self {
        Self::new(
            runtime,
            [
                OsString::from("-jar"),
                jar_path.as_ref().as_os_str().to_owned(),
                OsString::from("-c"),
                config_path.as_ref().as_os_str().to_owned(),
            ],
        )
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

/// Runs the Mirth Connect CLI once per [`ReportSource::fetch`] and captures its report.
#[derive(Debug, Clone)]
pub struct ReportFetcher {
    command: CliCommand,
    timeout: Option<Duration>,
}

impl ReportFetcher {
    pub fn new(command: CliCommand) -> Self {
        Self { command, timeout: None }
    }

    /// Bounds a single invocation. The child is killed when the bound is hit.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_report(&self) -> Result<RawReport, FetchError> {
        let start = Instant::now();
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run())
                .await
                .unwrap_or(Err(FetchError::Timeout(limit))),
            None => self.run().await,
        };
        debug!(elapsed = ?start.elapsed(), ok = result.is_ok(), "CLI invocation finished");
        result
    }

    async fn run(&self) -> Result<RawReport, FetchError> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FetchError::Spawn {
                program: self.command.program.to_string_lossy().into_owned(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or(FetchError::Pipe("stdin"))?;
        if child.stdout.is_none() {
            return Err(FetchError::Pipe("stdout"));
        }

        let script: String = CLI_COMMANDS.iter().map(|command| format!("{command}\n")).collect();
        match stdin.write_all(script.as_bytes()).await {
            Ok(()) => {}
            // The exit status below says more about why the CLI went away.
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                warn!("CLI closed its input before all commands were written");
            }
            Err(err) => return Err(FetchError::Write(err)),
        }
        drop(stdin);

        let output = child.wait_with_output().await.map_err(FetchError::Read)?;
        if !output.status.success() {
            return Err(FetchError::NonZeroExit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = RawReport::from_output(&stdout)?;
        debug!(lines = report.len(), output = %stdout, "CLI output");
        Ok(report)
    }
}

impl ReportSource for ReportFetcher {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<RawReport, FetchError>> + Send + '_>> {
        Box::pin(self.fetch_report())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sh(script: &str) -> ReportFetcher {
        ReportFetcher::new(CliCommand::new("/bin/sh", ["-c", script]))
    }

    #[test]
    fn mirth_cli_command_line() {
        let command = CliCommand::mirth_cli("java", "/opt/mirth/mirth-cli-launcher.jar", "./cli.properties");
        assert_eq!(command.program(), &OsString::from("java"));
        assert_eq!(
            command.args(),
            &[
                OsString::from("-jar"),
                OsString::from("/opt/mirth/mirth-cli-launcher.jar"),
                OsString::from("-c"),
                OsString::from("./cli.properties"),
            ]
        );
    }

    #[tokio::test]
    async fn writes_both_commands_then_closes_stdin() {
        // `cat` only terminates once stdin is closed, so echoing the input back
        // proves both the script and the EOF.
        let report = sh("echo Connected; cat").fetch().await.unwrap();
        assert_eq!(
            report.lines().collect::<Vec<_>>(),
            vec!["Connected", "status", "channel stats", ""]
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error_even_with_output() {
        let err = sh("cat >/dev/null; printf 'a\\nb\\nc\\nd\\n'; echo boom >&2; exit 3")
            .fetch()
            .await
            .unwrap_err();
        match err {
            FetchError::NonZeroExit { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_output_is_unexpected() {
        let err = sh("cat >/dev/null; echo 'Could not connect'").fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedOutput(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let fetcher = ReportFetcher::new(CliCommand::mirth_cli(
            "/nonexistent/bin/java",
            "mirth-cli-launcher.jar",
            "mirth-cli-config.properties",
        ));
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Spawn { ref program, .. } if program == "/nonexistent/bin/java"));
    }

    #[tokio::test]
    async fn hung_cli_times_out() {
        let fetcher = sh("sleep 10").with_timeout(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(limit) if limit == Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
