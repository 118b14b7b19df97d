use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "CareDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const ENV_API_URL: &str = "CAREDESK_API_URL";
const ENV_TOKEN: &str = "CAREDESK_TOKEN";
const ENV_CONNECT_TIMEOUT: &str = "CAREDESK_CONNECT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API token: set {0} or log in to store one")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("Cannot determine home directory")]
    NoHomeDir,
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "caredesk=info,caredesk_lib=info"
}

/// Get the application data directory
/// ~/CareDesk/ on all platforms
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_NAME))
}

/// Where a login session's bearer token is kept between runs.
pub fn token_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("token"))
}

/// Read a stored token; surrounding whitespace is ignored and an empty file
/// counts as no token.
pub fn read_token_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let token = raw.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Connection settings for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Build from the process environment, falling back to the stored token.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        let stored = token_path()?;
        Self::from_lookup(lookup, &stored)
    }

    /// Environment-independent core of `from_env`.
    pub fn from_lookup<F>(lookup: F, token_file: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let token = match lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            Some(token) => token,
            None => read_token_file(token_file)?.ok_or(ConfigError::MissingVar(ENV_TOKEN))?,
        };

        // Zero would make every connect attempt time out immediately.
        let connect_timeout_secs = match lookup(ENV_CONNECT_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: ENV_CONNECT_TIMEOUT,
                    value: raw,
                })?,
            None => DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            token,
            connect_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("CareDesk"));
    }

    #[test]
    fn token_path_under_app_data() {
        let token = token_path().unwrap();
        assert!(token.starts_with(app_data_dir().unwrap()));
        assert!(token.ends_with("token"));
    }

    #[test]
    fn app_name_is_caredesk() {
        assert_eq!(APP_NAME, "CareDesk");
    }

    #[test]
    fn defaults_with_env_token() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ClientConfig::from_lookup(env(&[("CAREDESK_TOKEN", "abc")]), &tmp.path().join("token"))
            .unwrap();
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.token, "abc");
        assert_eq!(cfg.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ClientConfig::from_lookup(
            env(&[
                ("CAREDESK_TOKEN", "abc"),
                ("CAREDESK_API_URL", "https://hospital.example/api/"),
            ]),
            &tmp.path().join("token"),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://hospital.example/api");
    }

    #[test]
    fn falls_back_to_token_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("token");
        std::fs::write(&path, "  stored-token\n").unwrap();
        let cfg = ClientConfig::from_lookup(env(&[]), &path).unwrap();
        assert_eq!(cfg.token, "stored-token");
    }

    #[test]
    fn missing_token_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("token");
        let err = ClientConfig::from_lookup(env(&[]), &path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CAREDESK_TOKEN")));

        std::fs::write(&path, "   ").unwrap();
        assert!(ClientConfig::from_lookup(env(&[]), &path).is_err());
    }

    #[test]
    fn invalid_timeout_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_lookup(
            env(&[
                ("CAREDESK_TOKEN", "abc"),
                ("CAREDESK_CONNECT_TIMEOUT_SECS", "ten"),
            ]),
            &tmp.path().join("token"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { .. }));
    }

    #[test]
    fn zero_timeout_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_lookup(
            env(&[
                ("CAREDESK_TOKEN", "abc"),
                ("CAREDESK_CONNECT_TIMEOUT_SECS", "0"),
            ]),
            &tmp.path().join("token"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar { name: "CAREDESK_CONNECT_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn explicit_timeout_is_used() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ClientConfig::from_lookup(
            env(&[
                ("CAREDESK_TOKEN", "abc"),
                ("CAREDESK_CONNECT_TIMEOUT_SECS", " 30 "),
            ]),
            &tmp.path().join("token"),
        )
        .unwrap();
        assert_eq!(cfg.connect_timeout_secs, 30);
    }
}
