use super::WS;
use crate::RawReport;
use regex::Regex;

lazy_static::lazy_static! {
    /// A 36 character channel id, then the channel type.
    static ref DEPLOYED: Regex =
        Regex::new(&format!("^[0-9a-f-]{{36}}{WS}+[a-zA-Z]+{WS}+")).expect("valid deployed regex");
    static ref STARTED: Regex = Regex::new(&format!("{WS}+Started{WS}+")).expect("valid started regex");
}

/// Channel counts from the `status` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSample {
    pub deployed: u64,
    pub started: u64,
}

/// Counts deployed channels and, among them, the started ones. Lines that do not
/// look like a channel status line are ignored.
///
/// Lines are matched with their trailing `\r`, which counts as whitespace.
pub fn parse_status(report: &RawReport) -> StatusSample {
    report
        .raw_lines()
        .filter(|line| DEPLOYED.is_match(line))
        .fold(StatusSample::default(), |mut sample, line| {
            sample.deployed += 1;
            if STARTED.is_match(line) {
                sample.started += 1;
            }
            sample
        })
}
