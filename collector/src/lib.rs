//! # Mirth Connect Collector
//!
//! Turns the text report of the Mirth Connect CLI into Prometheus metrics.
//!
//! ## Architecture
//!
//! - **`ReportFetcher`**: Runs `java -jar mirth-cli-launcher.jar -c <config>`, pipes in the
//!   `status` and `channel stats` commands and captures the answer as a `RawReport`
//! - **`parser`**: Pure functions extracting channel counts and per-channel message statistics
//! - **`MetricRegistry`**: The fixed metric schema; builds fresh metric families for each scrape
//! - **`Collector`**: Serializes scrapes and runs fetch, parse and publish for each of them
//!
//! A failed fetch never propagates past the `Collector`: the scrape is published as
//! `mirth_up 0` and the next scrape starts from scratch.

#[macro_use]
extern crate tracing;

mod collector;
mod error;
mod fetcher;
pub mod parser;
mod registry;
mod report;

pub use collector::{
    Collector,
    ScrapeResult,
};
pub use error::FetchError;
pub use fetcher::{
    CliCommand,
    ReportFetcher,
    ReportSource,
    CLI_COMMANDS,
};
pub use parser::{
    parse_channel_stats,
    parse_status,
    ChannelStatsSample,
    StatusSample,
};
pub use registry::{
    MetricRegistry,
    CHANNEL_LABEL,
    NAMESPACE,
};
pub use report::{
    RawReport,
    MIN_REPORT_LINES,
};
