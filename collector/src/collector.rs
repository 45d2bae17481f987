use crate::{
    parse_channel_stats,
    parse_status,
    ChannelStatsSample,
    MetricRegistry,
    RawReport,
    ReportSource,
    StatusSample,
};
use std::time::Instant;
use tokio::sync::Mutex;

/// Outcome of one scrape. Built, published and dropped; never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    pub up: bool,
    pub status: Option<StatusSample>,
    pub channels: Vec<ChannelStatsSample>,
}

impl ScrapeResult {
    /// The result of a scrape whose fetch failed.
    pub fn down() -> Self {
        Self::default()
    }

    pub fn from_report(report: &RawReport) -> Self {
        Self {
            up: true,
            status: Some(parse_status(report)),
            channels: parse_channel_stats(report),
        }
    }
}

/// Drives fetch, parse and publish for every scrape request.
///
/// Scrapes are serialized: while one CLI process is running, further requests
/// wait for the lock instead of starting another JVM.
pub struct Collector {
    source: Box<dyn ReportSource>,
    registry: MetricRegistry,
    scrape_lock: Mutex<()>,
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector").field("registry", &self.registry).finish_non_exhaustive()
    }
}

impl Collector {
    pub fn new(source: impl ReportSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            registry: MetricRegistry::new(),
            scrape_lock: Mutex::new(()),
        }
    }

    /// Fetches and parses one report.
    pub async fn scrape(&self) -> ScrapeResult {
        let _guard = self.scrape_lock.lock().await;
        self.scrape_locked().await
    }

    /// One full scrape in the Prometheus text exposition format.
    pub async fn render(&self) -> prometheus::Result<String> {
        let _guard = self.scrape_lock.lock().await;
        let result = self.scrape_locked().await;
        self.registry.encode(&result)
    }

    #[instrument(level = "debug", skip(self))]
    async fn scrape_locked(&self) -> ScrapeResult {
        let start = Instant::now();
        let report = match self.source.fetch().await {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, elapsed = ?start.elapsed(), "Mirth scrape failed");
                return ScrapeResult::down();
            }
        };

        let result = ScrapeResult::from_report(&report);
        let status = result.status.unwrap_or_default();
        debug!(
            deployed = status.deployed,
            started = status.started,
            channels = result.channels.len(),
            elapsed = ?start.elapsed(),
            "Mirth scrape succeeded"
        );
        result
    }
}
