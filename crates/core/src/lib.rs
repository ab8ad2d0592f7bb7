pub mod aggregate;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod store;
pub mod views;

pub mod config {
    use crate::generator::DEFAULT_CACHE_CAPACITY;
    use anyhow::Context;
    use std::path::PathBuf;

    pub const DEFAULT_PORT: u16 = 8501;

    #[derive(Debug, Clone)]
    pub struct Settings {
        /// Directory holding `sentiment_data_<program>.csv` files.
        pub data_dir: PathBuf,
        pub cache_capacity: u64,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

            Ok(Self {
                data_dir: non_empty("SENTIMENT_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                cache_capacity: non_empty("SENTIMENT_CACHE_CAPACITY")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_CACHE_CAPACITY),
                port: non_empty("PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_PORT),
                sentry_dsn: non_empty("SENTRY_DSN"),
            })
        }

        pub fn bind_addr(&self) -> std::net::SocketAddr {
            std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
        }

        pub fn data_dir_display(&self) -> anyhow::Result<String> {
            let abs = std::path::absolute(&self.data_dir)
                .with_context(|| format!("cannot resolve {}", self.data_dir.display()))?;
            Ok(abs.display().to_string())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn settings(vars: &[(&str, &str)]) -> Settings {
            let map: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Settings::from_lookup(|k| map.get(k).cloned()).unwrap()
        }

        #[test]
        fn defaults_when_unset() {
            let s = settings(&[]);
            assert_eq!(s.data_dir, PathBuf::from("."));
            assert_eq!(s.cache_capacity, DEFAULT_CACHE_CAPACITY);
            assert_eq!(s.port, DEFAULT_PORT);
            assert!(s.sentry_dsn.is_none());
        }

        #[test]
        fn reads_overrides_and_ignores_garbage() {
            let s = settings(&[
                ("SENTIMENT_DATA_DIR", "/srv/sentiment"),
                ("SENTIMENT_CACHE_CAPACITY", "0"),
                ("PORT", "not-a-port"),
                ("SENTRY_DSN", "  "),
            ]);
            assert_eq!(s.data_dir, PathBuf::from("/srv/sentiment"));
            assert_eq!(s.cache_capacity, DEFAULT_CACHE_CAPACITY);
            assert_eq!(s.port, DEFAULT_PORT);
            assert!(s.sentry_dsn.is_none());
        }
    }
}
