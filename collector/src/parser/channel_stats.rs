use super::WS;
use crate::RawReport;
use regex::Regex;

lazy_static::lazy_static! {
    static ref STAT: Regex = Regex::new(&format!(
        "^([0-9]+){WS}+([0-9]+){WS}+([0-9]+){WS}+([0-9]+){WS}+([0-9]+){WS}+(.+)$"
    ))
    .expect("valid channel stats regex");
}

/// Message statistics of one channel from the `channel stats` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelStatsSample {
    pub channel: String,
    pub received: f64,
    pub filtered: f64,
    pub queued: f64,
    pub sent: f64,
    pub errored: f64,
}

/// Extracts one sample per `<received> <filtered> <queued> <sent> <errored> <name>`
/// line, in report order. The name is everything after the fifth number.
pub fn parse_channel_stats(report: &RawReport) -> Vec<ChannelStatsSample> {
    report
        .lines()
        .filter_map(|line| STAT.captures(line))
        .map(|caps| ChannelStatsSample {
            channel: caps[6].to_string(),
            received: parse_count(&caps[1]),
            filtered: parse_count(&caps[2]),
            queued: parse_count(&caps[3]),
            sent: parse_count(&caps[4]),
            errored: parse_count(&caps[5]),
        })
        .collect()
}

/// A field that cannot be parsed counts as zero; the rest of the line is kept.
fn parse_count(field: &str) -> f64 {
    field.parse().unwrap_or_else(|err| {
        trace!(field, %err, "unparseable channel stats field");
        0.0
    })
}
