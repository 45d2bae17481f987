use clap::Parser;
use std::{
    net::SocketAddr,
    path::PathBuf,
};

/// Prometheus exporter for Mirth Connect channel statistics.
///
/// Every flag is optional; unset flags fall back to the config file and then to
/// the built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Address to listen on for telemetry.
    #[arg(long = "web.listen-address", env = "MIRTH_EXPORTER_LISTEN_ADDRESS", value_name = "ADDR")]
    pub listen_address: Option<SocketAddr>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", env = "MIRTH_EXPORTER_TELEMETRY_PATH", value_name = "PATH")]
    pub telemetry_path: Option<String>,

    /// Path to the jar file for the Mirth Connect CLI.
    #[arg(long = "mccli.jar-path", env = "MIRTH_EXPORTER_MCCLI_JAR_PATH", value_name = "FILE")]
    pub jar_path: Option<PathBuf>,

    /// Path to the properties file for the Mirth Connect CLI.
    #[arg(long = "mccli.config-path", env = "MIRTH_EXPORTER_MCCLI_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Java runtime used to launch the Mirth Connect CLI.
    #[arg(long = "mccli.runtime", env = "MIRTH_EXPORTER_MCCLI_RUNTIME", value_name = "PROGRAM")]
    pub runtime: Option<String>,

    /// Upper bound for one CLI invocation, e.g. "30s" or "2m". "0s" waits forever.
    #[arg(long = "mccli.timeout", env = "MIRTH_EXPORTER_MCCLI_TIMEOUT", value_name = "DURATION")]
    pub timeout: Option<humantime::Duration>,

    /// Explicit configuration file. Replaces the lookup in the config directory.
    #[arg(long = "config.file", env = "MIRTH_EXPORTER_CONFIG_FILE", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Default log filter, used when RUST_LOG is not set.
    #[arg(long = "log.level", env = "MIRTH_EXPORTER_LOG_LEVEL", value_name = "FILTER")]
    pub log_level: Option<String>,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(listen_address) = &self.listen_address {
                cache.insert("listen_address".to_string(), listen_address.to_string().into());
            }
            if let Some(telemetry_path) = &self.telemetry_path {
                cache.insert("telemetry_path".to_string(), telemetry_path.clone().into());
            }
            if let Some(jar_path) = &self.jar_path {
                cache.insert("mccli.jar_path".to_string(), jar_path.display().to_string().into());
            }
            if let Some(config_path) = &self.config_path {
                cache.insert("mccli.config_path".to_string(), config_path.display().to_string().into());
            }
            if let Some(runtime) = &self.runtime {
                cache.insert("mccli.runtime".to_string(), runtime.clone().into());
            }
            if let Some(timeout) = &self.timeout {
                cache.insert("mccli.timeout".to_string(), timeout.to_string().into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "{}

Authors: {author}

Config directory: {config_dir_path}",
        clap::crate_version!()
    )
}
