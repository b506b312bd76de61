use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Deployment environment, controls log format and how much of a server
/// fault is echoed back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "bookmarkr")]
#[command(about = "Token-gated bookmark management API")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "BOOKMARKR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "BOOKMARKR_PORT", default_value = "8000")]
    pub port: u16,

    /// Shared secret expected in `Authorization: Bearer <token>`
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Deployment environment (development, test, production)
    #[arg(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    /// Path of the libsql database file, or `:memory:`
    #[arg(long, env = "BOOKMARKR_DATABASE", default_value = "bookmarks.db")]
    pub database: PathBuf,

    /// Enable CORS for all origins
    #[arg(long, env = "BOOKMARKR_CORS", default_value = "true")]
    pub cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// File receiving JSON log lines in every environment
    #[arg(long, env = "LOG_FILE", default_value = "info.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.as_os_str() == ":memory:"
    }

    /// Directory and file name of the log file, as the appender wants them.
    pub fn log_file_location(&self) -> (PathBuf, String) {
        let dir = match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = self
            .log_file
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("info.log")
            .to_string();
        (dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["bookmarkr"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_bind_address_custom() {
        let config = parse(&["--api-token", "secret", "--host", "127.0.0.1", "--port", "3000"]);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_environment_parses_production() {
        let config = parse(&["--api-token", "secret", "--environment", "production"]);
        assert_eq!(config.environment, Environment::Production);
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        if std::env::var_os("API_TOKEN").is_some() {
            return;
        }
        assert!(Config::try_parse_from(["bookmarkr"]).is_err());
    }

    #[test]
    fn test_in_memory_database() {
        let config = parse(&["--api-token", "secret", "--database", ":memory:"]);
        assert!(config.is_in_memory());

        let config = parse(&["--api-token", "secret", "--database", "/tmp/bookmarks.db"]);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_log_file_location() {
        let config = parse(&["--api-token", "secret", "--log-file", "info.log"]);
        assert_eq!(
            config.log_file_location(),
            (PathBuf::from("."), "info.log".to_string())
        );

        let config = parse(&["--api-token", "secret", "--log-file", "/var/log/bookmarkr/api.log"]);
        assert_eq!(
            config.log_file_location(),
            (PathBuf::from("/var/log/bookmarkr"), "api.log".to_string())
        );
    }
}
