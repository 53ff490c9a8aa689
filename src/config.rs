// Runtime configuration, read from the environment (a `.env` file is loaded
// first by main).

use anyhow::Context;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// Built front-end to serve at `/`. Unset means API only.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            host: try_load(&lookup, "KERAMAS_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "3000")?,
            database_url: try_load(&lookup, "KERAMAS_DATABASE_URL", "data/keramas.db")?,
            upload_dir: try_load(&lookup, "KERAMAS_UPLOAD_DIR", "public/uploads")?,
            static_dir: lookup("KERAMAS_STATIC_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database_url, "data/keramas.db");
        assert_eq!(config.upload_dir, PathBuf::from("public/uploads"));
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KERAMAS_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("KERAMAS_STATIC_DIR", "dist"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = config_from(&[("PORT", "eighty")]).err().unwrap();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_blank_static_dir_is_ignored() {
        let config = config_from(&[("KERAMAS_STATIC_DIR", "  ")]).unwrap();
        assert!(config.static_dir.is_none());
    }
}
