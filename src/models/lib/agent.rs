use crate::error::{Error, Result};
use serde::{Serialize, Deserialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// The longest an account name can be.
pub const MAX_NAME_LEN: usize = 12;

/// A trait for anything that acts on the ledger under an account's authority.
pub trait Agent {
    /// The account this agent acts as.
    fn account_name(&self) -> &AccountName;
}

/// The identity of an account on the host chain, ie `issuer` or
/// `tkn.deployer`.
///
/// Names are one to twelve characters from `a-z`, `1-5` and `.`, and may not
/// end with a `.`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Validate and create an account name.
    pub fn new<T: Into<String>>(name: T) -> Result<Self> {
        let name = name.into();
        let valid_chars = name.chars().all(|c| matches!(c, 'a'..='z' | '1'..='5' | '.'));
        if name.is_empty() || name.len() > MAX_NAME_LEN || !valid_chars || name.ends_with('.') {
            return Err(Error::InvalidAccount(name));
        }
        Ok(Self(name))
    }

    /// Return a string ref for this name
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Agent for AccountName {
    fn account_name(&self) -> &AccountName {
        self
    }
}

impl TryFrom<String> for AccountName {
    type Error = Error;

    fn try_from(val: String) -> Result<Self> {
        Self::new(val)
    }
}

impl TryFrom<&str> for AccountName {
    type Error = Error;

    fn try_from(val: &str) -> Result<Self> {
        Self::new(val)
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

impl FromStr for AccountName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
