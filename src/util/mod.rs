//! A set of utility structs and functions used when operating the ledger.

pub(crate) mod time;
