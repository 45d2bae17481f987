#[macro_use]
extern crate tracing;

mod app_config;
mod args;

pub use app_config::{
    get_config_dir,
    CONFIG_FILE_NAME,
};
pub use args::Args;
use eyre::bail;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    net::SocketAddr,
    path::PathBuf,
    time::Duration,
};

/// Path reserved for the exporter's own liveness probe.
pub const HEALTH_PATH: &str = "/healthz";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub telemetry_path: String,
    pub mccli: MccliConfig,
}

/// How to invoke the Mirth Connect CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MccliConfig {
    pub runtime: String,
    pub jar_path: PathBuf,
    pub config_path: PathBuf,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl MccliConfig {
    /// The bounded wait for one CLI invocation. A zero duration means no bound.
    pub fn timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the built-in defaults, the config file and the command-line
    /// arguments (highest precedence).
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        builder = match &args.config_file {
            Some(path) => {
                debug!(?path, "using explicit config file");
                builder.add_source(config::File::from(path.clone()).format(config::FileFormat::Yaml))
            }
            None => {
                let path = get_config_dir().join(CONFIG_FILE_NAME);
                debug!(?path, "looking for optional config file");
                builder.add_source(
                    config::File::from(path)
                        .format(config::FileFormat::Yaml)
                        .required(false),
                )
            }
        };

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    /// Rejects settings that would make the HTTP surface ambiguous.
    pub fn validate(&self) -> eyre::Result<()> {
        if !self.telemetry_path.starts_with('/') {
            bail!("telemetry path must start with '/': {:?}", self.telemetry_path);
        }
        if self.telemetry_path == "/" || self.telemetry_path == HEALTH_PATH {
            bail!("telemetry path {:?} is reserved", self.telemetry_path);
        }
        if self.mccli.runtime.trim().is_empty() {
            bail!("mccli runtime must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use temp_dir::TempDir;

    fn args_with_file(content: &str) -> (TempDir, Args) {
        let dir = TempDir::new().unwrap();
        let path = dir.child("config.yaml");
        std::fs::write(&path, content).unwrap();
        let args = Args {
            config_file: Some(path),
            ..Args::default()
        };
        (dir, args)
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_address, "0.0.0.0:9140".parse().unwrap());
        assert_eq!(config.telemetry_path, "/metrics");
        assert_eq!(config.mccli.runtime, "java");
        assert_eq!(config.mccli.jar_path, PathBuf::from("./mirth-cli-launcher.jar"));
        assert_eq!(config.mccli.config_path, PathBuf::from("./mirth-cli-config.properties"));
        assert_eq!(config.mccli.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn file_overrides_defaults() {
        let (_dir, args) = args_with_file(
            "telemetry_path: /mirth\nmccli:\n  jar_path: /opt/mirth/cli.jar\n  timeout: 2m\n",
        );
        let config = Config::new(args).unwrap();
        assert_eq!(config.telemetry_path, "/mirth");
        assert_eq!(config.mccli.jar_path, PathBuf::from("/opt/mirth/cli.jar"));
        assert_eq!(config.mccli.timeout, Duration::from_secs(120));
        // untouched keys keep their defaults
        assert_eq!(config.mccli.runtime, "java");
        assert_eq!(config.listen_address, "0.0.0.0:9140".parse().unwrap());
    }

    #[test]
    fn args_override_file() {
        let (_dir, mut args) = args_with_file("telemetry_path: /mirth\nmccli:\n  runtime: /usr/bin/java\n");
        args.telemetry_path = Some("/scrape".to_string());
        args.listen_address = Some("127.0.0.1:9999".parse().unwrap());
        args.config_path = Some(PathBuf::from("/etc/mirth/cli.properties"));
        args.timeout = Some("0s".parse().unwrap());

        let config = Config::new(args).unwrap();
        assert_eq!(config.telemetry_path, "/scrape");
        assert_eq!(config.listen_address, "127.0.0.1:9999".parse().unwrap());
        assert_eq!(config.mccli.runtime, "/usr/bin/java");
        assert_eq!(config.mccli.config_path, PathBuf::from("/etc/mirth/cli.properties"));
        assert_eq!(config.mccli.timeout(), None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let args = Args {
            config_file: Some(PathBuf::from("/definitely/not/here/config.yaml")),
            ..Args::default()
        };
        assert!(Config::new(args).is_err());
    }

    #[test]
    fn validate_rejects_reserved_paths() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.telemetry_path = "metrics".to_string();
        assert!(config.validate().is_err());

        config.telemetry_path = HEALTH_PATH.to_string();
        assert!(config.validate().is_err());

        config.telemetry_path = "/".to_string();
        assert!(config.validate().is_err());

        config.telemetry_path = "/metrics".to_string();
        config.mccli.runtime = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("runtime"), "{err}");
    }
}
