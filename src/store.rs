//! The store holds the ledger's tables: the creator singleton, one `Currency`
//! per symbol code and one `Balance` per (account, symbol code).
//!
//! Reads never change anything. The only way to write is [commit], which takes
//! the full set of modifications a transaction produced, checks every one of
//! them against the tables, and only then applies them. If any modification
//! doesn't fit, none of them are applied.
//!
//! [commit]: struct.Ledger.html#method.commit

use chrono::{DateTime, Utc};
use crate::{
    asset::SymbolCode,
    error::{Error, Result},
    models::{
        Model,
        Modifications,
        Op,

        balance::{Balance, BalanceKey},
        creator::Creator,
        currency::Currency,
        lib::agent::AccountName,
    },
};
use serde::{Serialize, Deserialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// The in-memory ledger tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Ledger {
    creator: Creator,
    currencies: BTreeMap<SymbolCode, Currency>,
    balances: BTreeMap<BalanceKey, Balance>,
}

/// A serializable copy of every table, used to persist a ledger and bring it
/// back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub creator: Creator,
    pub currencies: Vec<Currency>,
    pub balances: Vec<Balance>,
}

impl Ledger {
    /// Start an empty ledger administered by `creator`.
    pub fn new(creator: AccountName, now: &DateTime<Utc>) -> Result<Self> {
        let creator = Creator::builder()
            .account(creator)
            .created(now.clone())
            .updated(now.clone())
            .build()
            .map_err(|e| Error::BuilderFailed(e))?;
        Ok(Self {
            creator,
            currencies: BTreeMap::new(),
            balances: BTreeMap::new(),
        })
    }

    /// The ledger's current administrative authority.
    pub fn creator(&self) -> &Creator {
        &self.creator
    }

    pub fn currency(&self, code: &SymbolCode) -> Option<&Currency> {
        self.currencies.get(code)
    }

    /// Like `currency()` but a missing currency is an error.
    pub fn get_currency(&self, code: &SymbolCode) -> Result<&Currency> {
        self.currency(code).ok_or_else(|| Error::UnknownSymbol(code.to_string()))
    }

    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn balance(&self, owner: &AccountName, code: &SymbolCode) -> Option<&Balance> {
        self.balances.get(&(owner.clone(), code.clone()))
    }

    /// Every balance row an account holds, ordered by symbol code.
    pub fn balances_of<'a>(&'a self, owner: &'a AccountName) -> impl Iterator<Item = &'a Balance> + 'a {
        self.balances.values().filter(move |b| b.owner() == owner)
    }

    /// Every balance row for a currency, ordered by account.
    pub fn holders<'a>(&'a self, code: &'a SymbolCode) -> impl Iterator<Item = &'a Balance> + 'a {
        self.balances.values().filter(move |b| b.code() == code)
    }

    /// Apply a transaction's modifications, all of them or none of them.
    pub fn commit(&mut self, mods: Modifications) -> Result<()> {
        self.check(&mods)?;
        let count = mods.len();
        for modification in mods.into_vec() {
            let (op, model) = modification.into_pair();
            trace!(?op, ?model, "applying modification");
            match (op, model) {
                (_, Model::Creator(creator)) => {
                    self.creator = creator;
                }
                (_, Model::Currency(currency)) => {
                    self.currencies.insert(currency.code().clone(), currency);
                }
                (Op::Delete, Model::Balance(balance)) => {
                    self.balances.remove(&balance.key());
                }
                (_, Model::Balance(balance)) => {
                    self.balances.insert(balance.key(), balance);
                }
            }
        }
        debug!(count, "committed modifications");
        Ok(())
    }

    /// Make sure every modification in the set fits the current tables (and
    /// the rows created earlier in the same set), and that once applied every
    /// currency's supply still equals the sum of its balances.
    ///
    /// Currencies are never deleted, and a balance can only be deleted once
    /// it's empty.
    fn check(&self, mods: &Modifications) -> Result<()> {
        let mut new_currencies: HashSet<&SymbolCode> = HashSet::new();
        let mut new_balances: HashSet<BalanceKey> = HashSet::new();
        let mut final_supply: BTreeMap<&SymbolCode, i64> = BTreeMap::new();
        let mut final_balances: BTreeMap<BalanceKey, i64> = BTreeMap::new();
        for modification in mods.iter() {
            match (modification.op(), modification.model()) {
                (Op::Update, Model::Creator(_)) => {}
                (_, Model::Creator(_)) => Err(Error::OpMismatch)?,
                (Op::Delete, Model::Currency(_)) => Err(Error::OpMismatch)?,
                (Op::Create, Model::Currency(currency)) => {
                    let code = currency.code();
                    if self.currencies.contains_key(code) || !new_currencies.insert(code) {
                        Err(Error::CurrencyAlreadyExists(code.to_string()))?;
                    }
                    final_supply.insert(code, currency.supply().amount());
                }
                (_, Model::Currency(currency)) => {
                    let code = currency.code();
                    if !self.currencies.contains_key(code) && !new_currencies.contains(code) {
                        Err(Error::UnknownSymbol(code.to_string()))?;
                    }
                    final_supply.insert(code, currency.supply().amount());
                }
                (op, Model::Balance(balance)) => {
                    let code = balance.code();
                    let currency = match self.currencies.get(code) {
                        Some(currency) => Some(currency),
                        None => mods.iter().find_map(|m| match m.model() {
                            Model::Currency(c) if c.code() == code => Some(c),
                            _ => None,
                        }),
                    };
                    let currency = currency.ok_or_else(|| Error::UnknownSymbol(code.to_string()))?;
                    currency.check_symbol(balance.balance())?;
                    if balance.balance().amount() < 0 {
                        Err(Error::InsufficientBalance)?;
                    }
                    let key = balance.key();
                    let exists = self.balances.contains_key(&key) || new_balances.contains(&key);
                    let label = format!("{}@{}", key.0, key.1);
                    match op {
                        Op::Create if exists => Err(Error::BalanceAlreadyExists(label))?,
                        Op::Create => {
                            new_balances.insert(key.clone());
                        }
                        _ if !exists => Err(Error::BalanceMissing(label))?,
                        Op::Delete if !balance.is_zero() => Err(Error::BalanceNotEmpty(label))?,
                        _ => {}
                    }
                    let amount = match op {
                        Op::Delete => 0,
                        _ => balance.balance().amount(),
                    };
                    final_balances.insert(key, amount);
                }
            }
        }

        // per currency: (change in balances) - (change in supply) must be zero
        let mut drift: BTreeMap<&SymbolCode, i128> = BTreeMap::new();
        for (key, amount) in final_balances.iter() {
            let before = self.balances.get(key).map(|b| b.balance().amount()).unwrap_or(0);
            *drift.entry(&key.1).or_insert(0) += i128::from(*amount) - i128::from(before);
        }
        for (code, amount) in final_supply.iter() {
            let before = self.currencies.get(*code).map(|c| c.supply().amount()).unwrap_or(0);
            *drift.entry(*code).or_insert(0) -= i128::from(*amount) - i128::from(before);
        }
        if let Some((code, _)) = drift.iter().find(|(_, delta)| **delta != 0) {
            Err(Error::SupplyMismatch(code.to_string()))?;
        }
        Ok(())
    }

    /// Copy every table into a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            creator: self.creator.clone(),
            currencies: self.currencies.values().cloned().collect(),
            balances: self.balances.values().cloned().collect(),
        }
    }

    /// Rebuild a ledger from a snapshot, checking that the tables agree with
    /// each other: every balance has its currency, and every currency's supply
    /// is what its holders hold.
    pub fn restore(snapshot: Snapshot) -> Result<Self> {
        let Snapshot { creator, currencies, balances } = snapshot;
        let mut ledger = Self {
            creator,
            currencies: BTreeMap::new(),
            balances: BTreeMap::new(),
        };
        let mut mods = Modifications::new();
        for currency in currencies {
            let (supply, max_supply) = (currency.supply(), currency.max_supply());
            if !max_supply.is_valid() || !max_supply.is_positive() || supply.symbol() != max_supply.symbol() {
                Err(Error::Snapshot(format!("currency {} has an invalid maximum supply", currency.code())))?;
            }
            if supply.amount() < 0 || supply.amount() > max_supply.amount() {
                Err(Error::Snapshot(format!("currency {} has an invalid supply", currency.code())))?;
            }
            mods.push(Op::Create, currency);
        }
        for balance in balances {
            mods.push(Op::Create, balance);
        }
        ledger.commit(mods).map_err(|e| Error::Snapshot(e.to_string()))?;
        Ok(ledger)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot())
            .map_err(|e| Error::Snapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| Error::Snapshot(e.to_string()))?;
        Self::restore(snapshot)
    }
}
