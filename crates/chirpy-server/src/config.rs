use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Duration;

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "secret"];

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "database.json";
const DEFAULT_FILE_ROOT: &str = ".";
const DEFAULT_ACCESS_TTL_SECS: i64 = chirpy_api::jwt::DEFAULT_ACCESS_TOKEN_TTL_SECS;

/// Server configuration, read once at startup.
///
/// | Env Var                  | Required | Default         |
/// |--------------------------|----------|-----------------|
/// | `JWT_SECRET`             | **yes**  | --              |
/// | `POLKA_KEY`              | **yes**  | --              |
/// | `CHIRPY_HOST`            | no       | `localhost`     |
/// | `CHIRPY_PORT`            | no       | `8080`          |
/// | `CHIRPY_DB_PATH`         | no       | `database.json` |
/// | `CHIRPY_FILE_ROOT`       | no       | `.`             |
/// | `CHIRPY_ACCESS_TTL_SECS` | no       | `3600`          |
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub polka_key: String,
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub file_root: PathBuf,
    pub access_token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("JWT_SECRET is unset or still a placeholder");
        }

        let polka_key = var("POLKA_KEY").unwrap_or_default();
        if polka_key.is_empty() {
            bail!("POLKA_KEY is unset");
        }

        let port = match var("CHIRPY_PORT") {
            Some(v) => v.parse().context("CHIRPY_PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let ttl_secs: i64 = match var("CHIRPY_ACCESS_TTL_SECS") {
            Some(v) => v
                .parse()
                .context("CHIRPY_ACCESS_TTL_SECS must be a whole number of seconds")?,
            None => DEFAULT_ACCESS_TTL_SECS,
        };
        if ttl_secs <= 0 {
            bail!("CHIRPY_ACCESS_TTL_SECS must be positive");
        }

        Ok(Self {
            jwt_secret,
            polka_key,
            host: var("CHIRPY_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            db_path: var("CHIRPY_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.into())
                .into(),
            file_root: var("CHIRPY_FILE_ROOT")
                .unwrap_or_else(|| DEFAULT_FILE_ROOT.into())
                .into(),
            access_token_ttl: Duration::seconds(ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config =
            Config::from_lookup(lookup(&[("JWT_SECRET", "s3cr3t-value"), ("POLKA_KEY", "k")]))
                .unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, PathBuf::from("database.json"));
        assert_eq!(config.access_token_ttl, Duration::hours(1));
    }

    #[test]
    fn placeholder_secret_is_refused() {
        assert!(Config::from_lookup(lookup(&[("POLKA_KEY", "k")])).is_err());
        assert!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "change-me"), ("POLKA_KEY", "k")]))
                .is_err()
        );
    }

    #[test]
    fn missing_polka_key_is_refused() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s3cr3t-value")])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cr3t-value"),
            ("POLKA_KEY", "k"),
            ("CHIRPY_PORT", "9000"),
            ("CHIRPY_ACCESS_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.access_token_ttl, Duration::seconds(60));

        assert!(
            Config::from_lookup(lookup(&[
                ("JWT_SECRET", "s3cr3t-value"),
                ("POLKA_KEY", "k"),
                ("CHIRPY_PORT", "eighty"),
            ]))
            .is_err()
        );
    }
}
