use crate::FetchError;

/// Fewest lines a CLI answer can have and still carry both report sections.
pub const MIN_REPORT_LINES: usize = 3;

/// The captured output of one CLI invocation, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReport {
    lines: Vec<String>,
}

impl RawReport {
    /// Splits the output on `\n`. A trailing newline yields a trailing empty line.
    pub fn new(output: &str) -> Self {
        Self {
            lines: output.split('\n').map(str::to_string).collect(),
        }
    }

    /// Like [`RawReport::new`] but rejects output too short to hold a report.
    pub fn from_output(output: &str) -> Result<Self, FetchError> {
        let report = Self::new(output);
        if report.lines.len() < MIN_REPORT_LINES {
            return Err(FetchError::UnexpectedOutput(output.to_string()));
        }
        Ok(report)
    }

    /// Lines with a trailing `\r` removed, so CRLF output reads like LF output.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw_lines().map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// Lines exactly as split, `\r` included.
    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }
}
