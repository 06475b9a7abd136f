//! Settings a host chooses when it stands up a ledger.
//!
//! Only the creator (the administrative authority allowed to register
//! currencies) is required. Everything else has a default matching the
//! ledger's standard behavior.
//!
//! ```toml
//! creator = "tkn.deployer"
//! max_memo_bytes = 256
//! prune_zero_balances = false
//! issuer_may_transfer_locked = false
//! ```

use crate::{
    error::{Error, Result},
    models::lib::agent::AccountName,
};
use getset::{CopyGetters, Getters, Setters};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Memos longer than this many bytes are rejected unless configured otherwise.
pub const DEFAULT_MAX_MEMO_BYTES: usize = 256;

fn default_max_memo_bytes() -> usize {
    DEFAULT_MAX_MEMO_BYTES
}

#[derive(Clone, Debug, PartialEq, Getters, CopyGetters, Setters, derive_builder::Builder, Serialize, Deserialize)]
#[builder(pattern = "owned", setter(into))]
pub struct LedgerConfig {
    /// The initial administrative authority
    #[getset(get = "pub")]
    creator: AccountName,
    /// Upper bound on memo length for `issue` and `transfer`
    #[builder(default = "DEFAULT_MAX_MEMO_BYTES")]
    #[serde(default = "default_max_memo_bytes")]
    #[getset(get_copy = "pub", set = "pub")]
    max_memo_bytes: usize,
    /// Drop balance rows once they reach zero instead of keeping them around
    #[builder(default)]
    #[serde(default)]
    #[getset(get_copy = "pub", set = "pub")]
    prune_zero_balances: bool,
    /// Let the issuer move its own funds out even while the currency is locked
    #[builder(default)]
    #[serde(default)]
    #[getset(get_copy = "pub", set = "pub")]
    issuer_may_transfer_locked: bool,
}

impl LedgerConfig {
    pub fn builder() -> LedgerConfigBuilder {
        LedgerConfigBuilder::default()
    }

    /// A config with every default and the given creator.
    pub fn new(creator: AccountName) -> Self {
        Self {
            creator,
            max_memo_bytes: DEFAULT_MAX_MEMO_BYTES,
            prune_zero_balances: false,
            issuer_may_transfer_locked: false,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid TOML: {}", e)))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("invalid JSON: {}", e)))
    }

    /// Load a config file, picking the format from the file's extension.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file: {}", e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::Config("unsupported file format".into())),
        }
    }

    /// Override settings from `LEDGER_*` environment variables, when set.
    pub fn merge_with_env(&mut self) -> Result<()> {
        if let Ok(creator) = std::env::var("LEDGER_CREATOR") {
            self.creator = AccountName::new(creator)?;
        }
        if let Ok(bytes) = std::env::var("LEDGER_MAX_MEMO_BYTES") {
            self.max_memo_bytes = bytes.parse()
                .map_err(|_| Error::Config("invalid number in LEDGER_MAX_MEMO_BYTES".into()))?;
        }
        if let Ok(prune) = std::env::var("LEDGER_PRUNE_ZERO_BALANCES") {
            self.prune_zero_balances = prune.parse()
                .map_err(|_| Error::Config("invalid boolean in LEDGER_PRUNE_ZERO_BALANCES".into()))?;
        }
        if let Ok(exempt) = std::env::var("LEDGER_ISSUER_MAY_TRANSFER_LOCKED") {
            self.issuer_may_transfer_locked = exempt.parse()
                .map_err(|_| Error::Config("invalid boolean in LEDGER_ISSUER_MAY_TRANSFER_LOCKED".into()))?;
        }
        Ok(())
    }

    /// Check a memo against the configured length bound.
    pub fn check_memo(&self, memo: &str) -> Result<()> {
        if memo.len() > self.max_memo_bytes {
            Err(Error::MemoTooLong(self.max_memo_bytes))?;
        }
        Ok(())
    }
}
