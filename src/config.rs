//! Layered application configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. a config file: `--config`/`CONFIG_FILE`, else `./config.{yaml,toml,json}`
//!    when present
//! 3. `LEXAI_` environment variables with `__` between sections, e.g.
//!    `LEXAI_RESEARCH__BASE_URL`
//! 4. command-line flags (and the plain env vars clap binds them to)

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the research backend
    #[arg(long, env = "RESEARCH_URL")]
    pub research_url: Option<String>,

    /// Emit logs as JSON lines (`--log-json` alone means `true`)
    #[arg(long, env = "LOG_JSON", num_args = 0..=1, default_missing_value = "true")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub research: ResearchConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are dropped.
    pub session_idle_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResearchConfig {
    /// Where `/chat_stream/{message}` lives.
    pub base_url: String,
    /// Longest silence tolerated on a running stream.
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Feed poll period while a reply streams.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.session_idle_secs", 3600)?
            .set_default("research.base_url", "http://127.0.0.1:8000")?
            .set_default("research.idle_timeout_secs", 120)?
            .set_default("ui.poll_interval_ms", 750)?
            .set_default("log.json", false)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("LEXAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.research_url {
            builder = builder.set_override("research.base_url", url)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_rejects_unknown_flag() {
        let err = AppConfig::load_from_args(["lexai", "--no-such-flag"]).unwrap_err();
        assert!(err.to_string().contains("no-such-flag"));
    }

    #[test]
    fn test_bind_address() {
        let config =
            AppConfig::load_from_args(["lexai", "--host", "127.0.0.1", "--port", "8081"]).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8081");
    }
}
