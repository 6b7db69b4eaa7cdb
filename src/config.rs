use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::client::http::{DEFAULT_BASE_URL, DEFAULT_LANG, DEFAULT_REQUEST_TIMEOUT};
use crate::client::HttpConfig;
use crate::listing::filters::DEFAULT_SEARCH_DEBOUNCE;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "safta-admin", about = "Terminal admin console for the SAFTA portal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Portal API base URL
    #[arg(long, env = "SAFTA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Response language sent with every request
    #[arg(long, env = "SAFTA_LANG", global = true)]
    pub lang: Option<String>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Search debounce in milliseconds
    #[arg(long)]
    pub search_debounce_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Start at a link such as safta://admin/links?status=1
    #[arg(long)]
    pub open: Option<String>,

    /// Session file (defaults to the user data directory)
    #[arg(long, env = "SAFTA_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "SAFTA_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "SAFTA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Request a password reset email
    ForgotPassword { email: String },
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub lang: Option<String>,
    pub page_size: Option<u32>,
    pub search_debounce_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn load() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let config_path = config_dir.join("safta-admin").join("config.toml");
        let content = std::fs::read_to_string(&config_path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config file");
                None
            }
        }
    }
}

/// Effective settings: CLI flags and env first, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub lang: String,
    pub page_size: u32,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub tick_rate: Duration,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<ConfigFile>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            lang: cli
                .lang
                .clone()
                .or(file.lang)
                .unwrap_or_else(|| DEFAULT_LANG.to_string()),
            page_size: cli
                .page_size
                .or(file.page_size)
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            search_debounce: cli
                .search_debounce_ms
                .or(file.search_debounce_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
            request_timeout: cli
                .timeout_secs
                .or(file.timeout_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }

    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            lang: self.lang.clone(),
            timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("safta-admin").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let mut cli = parse(&[]);
        // Environment may carry overrides on a dev machine.
        cli.base_url = None;
        cli.lang = None;
        let settings = Settings::resolve(&cli, None);
        assert_eq!(settings.base_url, "https://dev-portal.safta.sa/api/v1");
        assert_eq!(settings.lang, "en");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.search_debounce, Duration::from_millis(300));
        assert_eq!(settings.request_timeout, Duration::from_secs(20));
    }

    #[test]
    fn flags_override_file() {
        let cli = parse(&["--page-size", "30", "--lang", "ar"]);
        let file: ConfigFile = toml::from_str(
            r#"
            base_url = "http://localhost:8000/api/v1"
            lang = "en"
            page_size = 20
            search_debounce_ms = 500
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(&cli, Some(file));
        assert_eq!(settings.page_size, 30);
        assert_eq!(settings.lang, "ar");
        assert_eq!(settings.search_debounce, Duration::from_millis(500));
        if std::env::var("SAFTA_BASE_URL").is_err() {
            assert_eq!(settings.base_url, "http://localhost:8000/api/v1");
        }
    }

    #[test]
    fn zero_page_size_falls_back() {
        let cli = parse(&["--page-size", "0"]);
        assert_eq!(Settings::resolve(&cli, None).page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn subcommands_parse() {
        let cli = parse(&["login", "admin@safta.sa", "--password", "secret"]);
        assert_eq!(
            cli.command,
            Some(Command::Login {
                email: "admin@safta.sa".into(),
                password: Some("secret".into()),
            })
        );
        assert_eq!(
            parse(&["forgot-password", "a@b.sa"]).command,
            Some(Command::ForgotPassword {
                email: "a@b.sa".into()
            })
        );
        assert_eq!(parse(&["logout"]).command, Some(Command::Logout));
    }
}
