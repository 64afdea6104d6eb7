use clap::Parser;
use std::path::PathBuf;

/// Synthetic data API server - fabricates plausible fake records over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "plasma", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PLASMA_CONFIG", default_value = "plasma.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PLASMA_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PLASMA_PORT")]
    pub port: Option<u16>,

    /// SQLite URL for the request-log sink (enables /stats aggregation)
    #[arg(long, env = "PLASMA_DATABASE_URL")]
    pub database_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["plasma"]);
        assert_eq!(cli.config, PathBuf::from("plasma.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.database_url.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "plasma",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--database-url",
            "sqlite://usage.db",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.database_url, Some("sqlite://usage.db".to_string()));
    }
}
