use crate::ScrapeResult;
use prometheus::{
    proto::MetricFamily,
    CounterVec,
    Encoder as _,
    Gauge,
    GaugeVec,
    Opts,
    Registry,
    TextEncoder,
};

pub const NAMESPACE: &str = "mirth";
pub const CHANNEL_LABEL: &str = "channel";

/// The fixed metric schema of the exporter.
///
/// Only descriptors live here. Every call to [`MetricRegistry::publish`] builds the
/// metrics from scratch in a throwaway [`Registry`], so a channel that disappears
/// from the CLI output disappears from the exposition as well.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    up: Opts,
    channels_deployed: Opts,
    channels_started: Opts,
    messages_received: Opts,
    messages_filtered: Opts,
    messages_queued: Opts,
    messages_sent: Opts,
    messages_errored: Opts,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        let opts = |name: &str, help: &str| Opts::new(name, help).namespace(NAMESPACE);
        Self {
            up: opts("up", "Was the last Mirth query successful."),
            channels_deployed: opts("channels_deployed", "How many channels are deployed."),
            channels_started: opts("channels_started", "How many of the deployed channels are started."),
            messages_received: opts(
                "messages_received",
                "How many messages have been received (per channel).",
            ),
            messages_filtered: opts(
                "messages_filtered",
                "How many messages have been filtered (per channel).",
            ),
            messages_queued: opts(
                "messages_queued",
                "How many messages are currently queued (per channel).",
            ),
            messages_sent: opts("messages_sent", "How many messages have been sent (per channel)."),
            messages_errored: opts("messages_errored", "How many messages have errored (per channel)."),
        }
    }

    /// Turns one scrape into metric families. A failed scrape yields `up` only.
    pub fn publish(&self, result: &ScrapeResult) -> prometheus::Result<Vec<MetricFamily>> {
        let registry = Registry::new();

        let up = Gauge::with_opts(self.up.clone())?;
        up.set(if result.up { 1.0 } else { 0.0 });
        registry.register(Box::new(up))?;

        if !result.up {
            return Ok(registry.gather());
        }

        if let Some(status) = &result.status {
            let deployed = Gauge::with_opts(self.channels_deployed.clone())?;
            deployed.set(status.deployed as f64);
            registry.register(Box::new(deployed))?;

            let started = Gauge::with_opts(self.channels_started.clone())?;
            started.set(status.started as f64);
            registry.register(Box::new(started))?;
        }

        let received = CounterVec::new(self.messages_received.clone(), &[CHANNEL_LABEL])?;
        let filtered = CounterVec::new(self.messages_filtered.clone(), &[CHANNEL_LABEL])?;
        let queued = GaugeVec::new(self.messages_queued.clone(), &[CHANNEL_LABEL])?;
        let sent = CounterVec::new(self.messages_sent.clone(), &[CHANNEL_LABEL])?;
        let errored = CounterVec::new(self.messages_errored.clone(), &[CHANNEL_LABEL])?;

        for sample in &result.channels {
            let channel = sample.channel.as_str();
            set_counter(&received, channel, sample.received);
            set_counter(&filtered, channel, sample.filtered);
            queued.with_label_values(&[channel]).set(sample.queued);
            set_counter(&sent, channel, sample.sent);
            set_counter(&errored, channel, sample.errored);
        }

        registry.register(Box::new(received))?;
        registry.register(Box::new(filtered))?;
        registry.register(Box::new(queued))?;
        registry.register(Box::new(sent))?;
        registry.register(Box::new(errored))?;

        Ok(registry.gather())
    }

    /// [`MetricRegistry::publish`] followed by the text exposition format.
    pub fn encode(&self, result: &ScrapeResult) -> prometheus::Result<String> {
        let families = self.publish(result)?;
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(format!("metrics are not UTF-8: {err}")))
    }
}

/// Counters mirror the cumulative value reported by Mirth; a repeated channel
/// keeps its last value.
fn set_counter(vec: &CounterVec, channel: &str, value: f64) {
    let counter = vec.with_label_values(&[channel]);
    counter.reset();
    counter.inc_by(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChannelStatsSample,
        StatusSample,
    };
    use pretty_assertions::assert_eq;

    fn lab_orders() -> ChannelStatsSample {
        ChannelStatsSample {
            channel: "Lab Orders".to_string(),
            received: 12.0,
            filtered: 3.0,
            queued: 0.0,
            sent: 9.0,
            errored: 1.0,
        }
    }

    fn sample_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|line| !line.starts_with('#')).collect()
    }

    #[test]
    fn failed_scrape_exposes_up_only() {
        let text = MetricRegistry::new().encode(&ScrapeResult::down()).unwrap();
        assert_eq!(sample_lines(&text), vec!["mirth_up 0"]);
    }

    #[test]
    fn successful_scrape_exposes_full_schema() {
        let result = ScrapeResult {
            up: true,
            status: Some(StatusSample { deployed: 1, started: 1 }),
            channels: vec![lab_orders()],
        };
        let text = MetricRegistry::new().encode(&result).unwrap();
        let mut lines = sample_lines(&text);
        lines.sort_unstable();
        assert_eq!(
            lines,
            vec![
                "mirth_channels_deployed 1",
                "mirth_channels_started 1",
                "mirth_messages_errored{channel=\"Lab Orders\"} 1",
                "mirth_messages_filtered{channel=\"Lab Orders\"} 3",
                "mirth_messages_queued{channel=\"Lab Orders\"} 0",
                "mirth_messages_received{channel=\"Lab Orders\"} 12",
                "mirth_messages_sent{channel=\"Lab Orders\"} 9",
                "mirth_up 1",
            ]
        );
        assert!(text.contains("# TYPE mirth_messages_received counter"));
        assert!(text.contains("# TYPE mirth_messages_queued gauge"));
        assert!(text.contains("# HELP mirth_up Was the last Mirth query successful."));
    }

    #[test]
    fn repeated_channel_keeps_last_value() {
        let mut second = lab_orders();
        second.received = 20.0;
        let result = ScrapeResult {
            up: true,
            status: Some(StatusSample::default()),
            channels: vec![lab_orders(), second],
        };
        let text = MetricRegistry::new().encode(&result).unwrap();
        assert!(text.contains("mirth_messages_received{channel=\"Lab Orders\"} 20\n"), "{text}");
    }

    #[test]
    fn channels_do_not_leak_between_scrapes() {
        let registry = MetricRegistry::new();
        let first = ScrapeResult {
            up: true,
            status: Some(StatusSample::default()),
            channels: vec![lab_orders()],
        };
        let second = ScrapeResult {
            up: true,
            status: Some(StatusSample::default()),
            channels: Vec::new(),
        };
        assert!(registry.encode(&first).unwrap().contains("Lab Orders"));
        assert!(!registry.encode(&second).unwrap().contains("Lab Orders"));
    }
}
