//! `REACT_APP_*` environment for the minting front end

use crate::io::error::{ForgeError, Result, WithPath, config_error, invalid_parameter};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Input format of start dates, e.g. `01 Jan 2021 00:00:00 GMT`
pub const START_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

/// Seconds since the Unix epoch of a `DD Mon YYYY HH:MM:SS GMT` date
///
/// # Errors
///
/// Returns [`ForgeError::DateParse`] when the string does not match
/// [`START_DATE_FORMAT`].
pub fn start_date_to_timestamp(start_date: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(start_date, START_DATE_FORMAT)
        .map(|naive| naive.and_utc().timestamp())
        .map_err(|source| ForgeError::DateParse {
            input: start_date.to_string(),
            source,
        })
}

/// The `program.config` entry of a deployment cache document
///
/// # Errors
///
/// Returns [`ForgeError::Config`] when the entry is absent.
pub fn program_config_from_cache(cache: &Value) -> Result<String> {
    match cache.get("program").and_then(|p| p.get("config")) {
        Some(Value::String(config)) => Ok(config.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(config_error(&"deployment cache has no program.config")),
    }
}

/// Target cluster of the front end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Network {
    /// Development cluster
    #[default]
    Devnet,
    /// Production cluster
    MainnetBeta,
}

impl Network {
    /// RPC endpoint the front end talks to
    pub const fn rpc_host(self) -> &'static str {
        match self {
            Self::Devnet => "https://explorer-api.devnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }

    /// Cluster name as written in the environment and cache file names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "devnet" => Ok(Self::Devnet),
            "mainnet-beta" => Ok(Self::MainnetBeta),
            other => Err(invalid_parameter(
                "env",
                &other,
                &"expected devnet or mainnet-beta",
            )),
        }
    }
}

/// Caller-supplied parts of the environment
#[derive(Clone, Debug, Default)]
pub struct FrontendOptions {
    /// Deployed candy machine id
    pub candy_machine_id: Option<String>,
    /// Target cluster
    pub network: Network,
    /// Mint start date; the current time when absent
    pub start_date: Option<String>,
    /// Treasury address replacing the creator address
    pub treasury_override: Option<String>,
}

/// Ordered `KEY=VALUE` lines of a `.env` file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontendEnv {
    entries: Vec<(String, String)>,
}

impl FrontendEnv {
    /// Assemble the environment from options, the deployment cache and the
    /// creator address
    ///
    /// The cache is read from `{cache_dir}/{network}-temp`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidParameter`] without a candy machine id,
    /// [`ForgeError::Config`] when the cache is absent or incomplete, and
    /// [`ForgeError::DateParse`] for a malformed start date.
    pub fn build(
        options: &FrontendOptions,
        creator_address: &str,
        cache_dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let candy_machine_id = options
            .candy_machine_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                invalid_parameter("react-env-candy-machine-id", &"", &"required for --react-env")
            })?;

        let mut entries = vec![
            (
                "REACT_APP_CANDY_MACHINE_ID".to_string(),
                candy_machine_id.to_string(),
            ),
            (
                "REACT_APP_SOLANA_RPC_HOST".to_string(),
                options.network.rpc_host().to_string(),
            ),
            (
                "REACT_APP_SOLANA_NETWORK".to_string(),
                options.network.to_string(),
            ),
        ];

        let cache_path = cache_dir.join(format!("{}-temp", options.network));
        if !cache_path.exists() {
            return Err(config_error(&format!(
                "no deployment cache at {}",
                cache_path.display()
            )));
        }
        let text = std::fs::read_to_string(&cache_path).with_path(&cache_path, "read cache")?;
        let cache: Value = serde_json::from_str(&text).with_path(&cache_path, "parse cache")?;
        entries.push((
            "REACT_APP_CANDY_MACHINE_CONFIG".to_string(),
            program_config_from_cache(&cache)?,
        ));

        let (timestamp, start_date) = match options.start_date.as_deref() {
            Some(date) => (start_date_to_timestamp(date)?, date.to_string()),
            None => (
                now.timestamp(),
                now.format(START_DATE_FORMAT).to_string(),
            ),
        };
        entries.push((
            "REACT_APP_CANDY_START_DATE".to_string(),
            timestamp.to_string(),
        ));
        entries.push(("# Start Date".to_string(), start_date));

        let treasury = options
            .treasury_override
            .as_deref()
            .unwrap_or(creator_address);
        entries.push((
            "REACT_APP_TREASURY_ADDRESS".to_string(),
            treasury.to_string(),
        ));

        Ok(Self { entries })
    }

    /// Value of a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in output order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl fmt::Display for FrontendEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
