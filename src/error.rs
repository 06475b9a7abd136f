//! The main error enum for the ledger lives here, and documents the various
//! conditions that can cause an action to be rejected.
//!
//! Every error aborts the action that raised it. Nothing is committed to the
//! ledger tables when a transaction returns an `Err`.

use thiserror::Error;

/// This is our error enum. It contains an entry for any part of the system in
/// which an expectation is not met or a problem occurs.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// A balance was already present when we tried to create it
    #[error("balance for {0} already exists")]
    BalanceAlreadyExists(String),
    /// Only an emptied balance can be deleted
    #[error("balance for {0} is not empty")]
    BalanceNotEmpty(String),
    /// A balance we expected to exist was missing
    #[error("no balance object found for {0}")]
    BalanceMissing(String),
    /// A record builder was missing a required field
    #[error("error building object {0}")]
    BuilderFailed(String),
    /// Could not load or parse the ledger configuration
    #[error("configuration error: {0}")]
    Config(String),
    /// A `create` was attempted on a symbol that is already registered
    #[error("token with symbol {0} already exists")]
    CurrencyAlreadyExists(String),
    /// The debit would take the holder's balance below zero
    #[error("overdrawn balance")]
    InsufficientBalance,
    /// An account name doesn't follow the naming rules
    #[error("invalid account name: {0}")]
    InvalidAccount(String),
    /// An action payload is missing a field or has a field of the wrong type
    #[error("invalid action payload: {0}")]
    InvalidPayload(String),
    /// A quantity is unparseable or isn't positive where it must be
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    /// The maximum supply given to `create` is non-positive or out of range
    #[error("invalid supply")]
    InvalidSupply,
    /// A symbol code or precision is malformed
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
    /// A memo exceeded the configured byte limit
    #[error("memo has more than {0} bytes")]
    MemoTooLong(usize),
    /// A modification carried a different op than expected
    #[error("operation mismatch")]
    OpMismatch,
    /// Arithmetic left the representable amount range
    #[error("arithmetic overflow")]
    Overflow,
    /// Sender and receiver of a transfer are the same account
    #[error("cannot transfer to self")]
    SelfTransfer,
    /// The ledger state couldn't be encoded or decoded
    #[error("snapshot error: {0}")]
    Snapshot(String),
    /// A set of modifications would leave a currency's supply different from
    /// the sum of its balances
    #[error("supply of {0} does not match its balances")]
    SupplyMismatch(String),
    /// The issue would push the current supply past the maximum supply
    #[error("quantity exceeds available supply")]
    SupplyExceeded,
    /// Two quantities with different codes or precisions were combined
    #[error("symbol precision mismatch")]
    SymbolMismatch,
    /// A transfer was attempted while the currency is locked
    #[error("token is locked")]
    TokenLocked,
    /// The caller lacks the authority this action requires
    #[error("missing required authority")]
    Unauthorized,
    /// The action name isn't one the ledger recognizes
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// The referenced currency hasn't been created
    #[error("token with symbol {0} does not exist")]
    UnknownSymbol(String),
    /// A modification held a different model type than expected
    #[error("wrong model type")]
    WrongModelType,
}

pub type Result<T> = std::result::Result<T, Error>;
