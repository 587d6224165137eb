use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_ADMIN_PASSWORD: &str = "696969";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub demo: bool,
    pub demo_password: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url = lookup("BACKEND_URL")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let demo = lookup("DASHBOARD_DEMO")
            .map(|val| parse_flag(&val))
            .unwrap_or(false);
        let demo_password = lookup("ADMIN_PASSWORD")
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());
        let log_file = lookup("DASHBOARD_LOG")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);

        Self {
            backend_url,
            demo,
            demo_password,
            log_file,
        }
    }

    pub fn api_root(&self) -> String {
        format!("{}/api", self.backend_url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend_url", &self.backend_url)
            .field("demo", &self.demo)
            .field("demo_password", &"<redacted>")
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
