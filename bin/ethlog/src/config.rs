use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use ethlog_decoder::{decode_quantity, BatchPolicy};
use eyre::{eyre, Result};
use num::BigUint;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Config file read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "ethlog.json";

/// Settings for a decoding run. Command line flags take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// What to do with logs that fail to decode.
    pub(crate) policy: BatchPolicy,
    /// JSON object mapping hex block numbers to block timestamps.
    pub(crate) timestamps: Option<PathBuf>,
}

impl Config {
    /// Loads the config at `path`, or at [`DEFAULT_CONFIG_PATH`] if it exists.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
            None => {
                debug!("No `{DEFAULT_CONFIG_PATH}` found, using defaults");
                return Ok(Self::default());
            }
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| eyre!("failed to read config `{}`: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| eyre!("failed to parse `{}`: {}", path.display(), e))
    }

    fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Applies command line overrides.
    pub(crate) fn with_overrides(
        mut self,
        policy: Option<BatchPolicy>,
        timestamps: Option<PathBuf>,
    ) -> Self {
        if let Some(policy) = policy {
            self.policy = policy;
        }
        if timestamps.is_some() {
            self.timestamps = timestamps;
        }
        self
    }
}

/// Reads a block timestamp file, e.g. `{ "0x11feef0": 1703595263 }`.
pub(crate) fn load_timestamps(path: &Path) -> Result<HashMap<BigUint, u64>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre!("failed to read timestamps `{}`: {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| eyre!("failed to parse timestamps `{}`: {}", path.display(), e))?;
    parse_timestamps(&value)
}

fn parse_timestamps(value: &Value) -> Result<HashMap<BigUint, u64>> {
    value
        .as_object()
        .ok_or_else(|| eyre!("timestamps must be an object"))?
        .iter()
        .map(|(block_number, timestamp)| {
            let number = decode_quantity("blockNumber", block_number)
                .map_err(|e| eyre!("timestamps invalid at {block_number}: {e}"))?;
            let timestamp = timestamp.as_u64().ok_or_else(|| {
                eyre!("timestamps invalid at {block_number}: timestamp must be an unsigned integer")
            })?;
            Ok((number, timestamp))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ethlog_decoder::BatchPolicy;
    use num::BigUint;
    use serde_json::json;

    use super::{parse_timestamps, Config};

    #[test]
    fn test_parse_config() {
        assert_eq!(Config::parse("{}").unwrap(), Config::default());

        let config = Config::parse(r#"{ "policy": "skip", "timestamps": "blocks.json" }"#).unwrap();
        assert_eq!(
            config,
            Config { policy: BatchPolicy::Skip, timestamps: Some(PathBuf::from("blocks.json")) }
        );

        assert!(Config::parse(r#"{ "policy": "retry" }"#).is_err());
        assert!(Config::parse(r#"{ "rpcUrl": "http://localhost:8545" }"#).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config { policy: BatchPolicy::Skip, timestamps: None }
            .with_overrides(Some(BatchPolicy::Abort), Some(PathBuf::from("t.json")));
        assert_eq!(config.policy, BatchPolicy::Abort);
        assert_eq!(config.timestamps, Some(PathBuf::from("t.json")));

        let config =
            Config { policy: BatchPolicy::Skip, timestamps: None }.with_overrides(None, None);
        assert_eq!(config.policy, BatchPolicy::Skip);
    }

    #[test]
    fn test_parse_timestamps() {
        let timestamps =
            parse_timestamps(&json!({ "0x11feef0": 1703595263, "0x11FEEF1": 1703595275 })).unwrap();
        assert_eq!(timestamps.get(&BigUint::from(18870000u64)), Some(&1703595263));
        assert_eq!(timestamps.get(&BigUint::from(18870001u64)), Some(&1703595275));

        assert!(parse_timestamps(&json!({ "18870000": 1703595263 })).is_err());
        assert!(parse_timestamps(&json!({ "0x1": "1703595263" })).is_err());
        assert!(parse_timestamps(&json!([1703595263])).is_err());
    }
}
