use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_SESSION_FILE: &str = ".pastor-session.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend exposing `/pastor-messages`.
    pub api_url: String,
    /// JSON file backing the client-side key/value storage (holds the `token` key).
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let optional = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let api_url = optional("API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!("API_URL must be an http(s) URL, got: {}", api_url);
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file: optional("SESSION_FILE")
                .unwrap_or_else(|| DEFAULT_SESSION_FILE.into())
                .into(),
        })
    }
}
