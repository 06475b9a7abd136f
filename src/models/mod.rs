//! Models are the records the ledger keeps: the administrative authority, one
//! `Currency` per symbol and one `Balance` per (account, symbol).
//!
//! Transactions never write to storage. Instead they hand back a list of
//! [Modifications] that the [store] applies all at once, which is what lets a
//! failed action leave no trace.
//!
//! [Modifications]: struct.Modifications.html
//! [store]: ../store/index.html

#[macro_use]
pub(crate) mod lib;

load_models!{ pub mod }
load_models!{ pub enum Model }

pub use lib::agent::{Agent, AccountName};

use crate::error::{Error, Result};
use serde::{Serialize, Deserialize};
use std::convert::TryFrom;

/// The kind of change being made to a record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Op {
    Create,
    Update,
    Delete,
}

/// A single change: an op paired with the full record it applies to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    op: Op,
    model: Model,
}

impl Modification {
    pub fn new(op: Op, model: Model) -> Self {
        Self { op, model }
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_pair(self) -> (Op, Model) {
        (self.op, self.model)
    }

    /// Pull the concrete record out of this modification, making sure the op
    /// is the one we expect.
    pub fn expect_op<T: TryFrom<Model, Error = Error>>(self, op: Op) -> Result<T> {
        if self.op != op {
            Err(Error::OpMismatch)?;
        }
        T::try_from(self.model)
    }
}

/// An ordered list of modifications produced by a transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifications {
    modifications: Vec<Modification>,
}

impl Modifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a modification list with a single entry.
    pub fn new_single<T: Into<Model>>(op: Op, model: T) -> Self {
        let mut mods = Self::new();
        mods.push(op, model);
        mods
    }

    pub fn push<T: Into<Model>>(&mut self, op: Op, model: T) {
        self.modifications.push(Modification::new(op, model.into()));
    }

    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Modification> {
        self.modifications.iter()
    }

    pub fn into_vec(self) -> Vec<Modification> {
        self.modifications
    }
}
