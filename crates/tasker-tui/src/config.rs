use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tasker_core::ValidationRules;

use crate::nav::Route;

/// Terminal client for the task backend.
#[derive(Debug, Parser)]
#[command(name = "tasker", about = "Terminal client for the tasker backend")]
pub struct Config {
    /// Backend base URL
    #[arg(long, env = "TASKER_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    pub server_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "TASKER_TOKEN")]
    pub token: Option<String>,

    /// Route to open on startup
    #[arg(long, env = "TASKER_ROUTE", default_value = "/user/home")]
    pub route: String,

    /// Require a description when saving task edits
    #[arg(long, env = "TASKER_REQUIRE_DESCRIPTION")]
    pub require_description: bool,

    /// Where tracing output goes (the terminal belongs to the UI)
    #[arg(long, env = "TASKER_LOG_FILE", default_value_os_t = default_log_file())]
    pub log_file: PathBuf,
}

impl Config {
    pub fn server_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn initial_route(&self) -> Result<Route> {
        Route::parse(&self.route).ok_or_else(|| anyhow!("unknown route: {}", self.route))
    }

    /// Rule set applied when a task edit is saved.
    pub fn edit_rules(&self) -> ValidationRules {
        if self.require_description {
            ValidationRules::edit_strict()
        } else {
            ValidationRules::edit()
        }
    }
}

fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("tasker.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasker_core::validation::Field;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["tasker"]).unwrap();
        assert_eq!(cfg.server_url(), "http://127.0.0.1:8080");
        assert_eq!(cfg.token, None);
        assert_eq!(cfg.initial_route().unwrap(), Route::Home);
        assert!(!cfg.edit_rules().requires(Field::Description));
        assert!(cfg.log_file.ends_with("tasker.log"));
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::try_parse_from([
            "tasker",
            "--server-url",
            "http://tasks.local:9000/",
            "--token",
            "abc",
            "--route",
            "/user/calendar",
            "--require-description",
        ])
        .unwrap();
        assert_eq!(cfg.server_url(), "http://tasks.local:9000");
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert_eq!(cfg.initial_route().unwrap(), Route::Calendar);
        assert!(cfg.edit_rules().requires(Field::Description));
    }

    #[test]
    fn unknown_route_is_an_error() {
        let cfg = Config::try_parse_from(["tasker", "--route", "/nowhere"]).unwrap();
        assert!(cfg.initial_route().is_err());
    }
}
