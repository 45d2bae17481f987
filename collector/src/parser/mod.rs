//! Parsers for the two report sections.
//!
//! Both are pure functions over a [`RawReport`](crate::RawReport) and never fail:
//! lines they do not recognise are skipped.

mod channel_stats;
mod status;

/// ASCII whitespace. `\s` in `regex` is Unicode-aware and `(?-u:\s)` adds `\v`.
const WS: &str = r"[\t\n\f\r ]";

pub use channel_stats::{
    parse_channel_stats,
    ChannelStatsSample,
};
pub use status::{
    parse_status,
    StatusSample,
};
