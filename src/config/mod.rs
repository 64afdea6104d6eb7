use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
    /// Optional request-log sink. When absent, request logging and `/stats`
    /// aggregation are disabled but the endpoint still answers.
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Limits and caps applied by the parameter resolver and the serializer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationSettings {
    /// Record count used when the `count` parameter is absent.
    #[serde(default = "default_count")]
    pub default_count: usize,
    /// Hard upper bound the `count` parameter is clamped to.
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    /// Maximum size of the per-request user pool.
    #[serde(default = "default_user_pool_cap")]
    pub user_pool_cap: usize,
    /// Maximum size of the per-request product pool.
    #[serde(default = "default_product_pool_cap")]
    pub product_pool_cap: usize,
    /// JSON responses longer than this many records are streamed instead of
    /// materialized in memory.
    #[serde(default = "default_streaming_threshold")]
    pub streaming_threshold: usize,
}

fn default_count() -> usize {
    5
}

fn default_max_count() -> usize {
    10_000
}

fn default_user_pool_cap() -> usize {
    100
}

fn default_product_pool_cap() -> usize {
    50
}

fn default_streaming_threshold() -> usize {
    1_000
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            user_pool_cap: default_user_pool_cap(),
            product_pool_cap: default_product_pool_cap(),
            streaming_threshold: default_streaming_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseSettings {
    /// SQLite connection URL, e.g. `sqlite://usage.db`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::new_with_cli(&Cli {
            config: "plasma.toml".into(),
            host: None,
            port: None,
            database_url: None,
        })
    }

    /// Create settings from CLI arguments (config file plus CLI overrides).
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.apply_cli_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(url) = &cli.database_url {
            let database = self.database.get_or_insert_with(|| DatabaseSettings {
                url: String::new(),
                max_connections: default_max_connections(),
            });
            database.url = url.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        let generation = &self.generation;
        if generation.default_count == 0 || generation.max_count == 0 {
            anyhow::bail!("generation counts must be at least 1");
        }
        if generation.default_count > generation.max_count {
            anyhow::bail!(
                "generation.default_count ({}) exceeds generation.max_count ({})",
                generation.default_count,
                generation.max_count
            );
        }
        if generation.user_pool_cap == 0 || generation.product_pool_cap == 0 {
            anyhow::bail!("pool caps must be at least 1");
        }
        if let Some(rate_limit) = &self.rate_limit {
            if rate_limit.enabled && rate_limit.requests_per_second == 0 {
                anyhow::bail!("rate_limit.requests_per_second must be at least 1");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(args: &[&str]) -> Cli {
        use clap::Parser;
        let mut full = vec!["plasma"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn defaults_apply_without_config_file() {
        let cli = cli_with(&["--config", "/nonexistent/plasma.toml"]);
        let settings = Settings::new_with_cli(&cli).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.generation.default_count, 5);
        assert_eq!(settings.generation.max_count, 10_000);
        assert_eq!(settings.generation.user_pool_cap, 100);
        assert_eq!(settings.generation.product_pool_cap, 50);
        assert_eq!(settings.generation.streaming_threshold, 1_000);
        assert!(settings.database.is_none());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let cli = cli_with(&[
            "--config",
            "/nonexistent/plasma.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--database-url",
            "sqlite://usage.db",
        ]);
        let settings = Settings::new_with_cli(&cli).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.unwrap().url, "sqlite://usage.db");
    }
}
