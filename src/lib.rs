//! A fungible-token ledger: currencies registered per symbol, balances per
//! account, and four authority-gated actions (`create`, `issue`, `transfer`,
//! `unlock`) plus `burn` and `setcreator`. A currency may be created locked,
//! in which case nobody can transfer it until its issuer unlocks it.
//!
//! The pieces, leaves first:
//!
//! - [asset] holds the symbol and quantity value types.
//! - [models] holds the records the ledger keeps.
//! - [transactions] holds the rules. Each one returns a set of modifications
//!   instead of writing anything.
//! - [store] holds the tables and applies modifications all-or-nothing.
//! - [dispatch] ties it together behind `apply_action(name, actor, payload)`.
//!
//! [asset]: asset/index.html
//! [models]: models/index.html
//! [transactions]: transactions/index.html
//! [store]: store/index.html
//! [dispatch]: dispatch/index.html

pub mod error;
mod util;
pub mod access;
pub mod asset;
pub mod models;
pub mod config;
pub mod transactions;
pub mod store;
pub mod dispatch;

pub use crate::{
    access::{Authorizer, ExactAuthority},
    config::LedgerConfig,
    dispatch::{Action, Dispatcher, SharedDispatcher},
    error::{Error, Result},
    models::AccountName,
    store::Ledger,
};
