//! Transactions are the primary interface for changing the ledger. They are
//! responsible for taking the needed information (which must be passed in)
//! and returning a list of modifications that the caller is responsible for
//! applying to the ledger's tables.
//!
//! The high-level picture here is that every rule the ledger enforces
//! (authority, supply ceilings, locks, non-negative balances) lives in these
//! functions, while storage happens somewhere else. A transaction either
//! returns the complete set of changes an action makes, or an error and no
//! changes at all. That's what makes actions all-or-nothing: the
//! [store](../store/index.html) only ever sees a finished set of changes.

pub mod admin;
pub mod balance;
pub mod currency;
