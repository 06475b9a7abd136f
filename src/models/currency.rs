//! The currency module holds the `Currency` record (one per symbol), which
//! tracks who may issue the currency, how much of it exists, how much of it
//! may ever exist, and whether it can currently move between accounts.

use crate::{
    asset::{Quantity, Symbol, SymbolCode},
    error::{Error, Result},
    models::lib::agent::AccountName,
};

ledger_model! {
    /// A currency registered with the ledger. Keyed by its symbol code.
    pub struct Currency {
        /// How much of this currency is in circulation
        supply: Quantity,
        /// The supply ceiling. Fixed at creation (only burning lowers it).
        max_supply: Quantity,
        /// The account with exclusive rights to issue and unlock
        issuer: AccountName,
        /// While set, every transfer of this currency is rejected
        locked: bool,
    }
    CurrencyBuilder
}

impl Currency {
    pub fn symbol(&self) -> &Symbol {
        self.max_supply().symbol()
    }

    pub fn code(&self) -> &SymbolCode {
        self.max_supply().code()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Make sure a quantity is expressed in this currency's exact symbol.
    pub fn check_symbol(&self, quantity: &Quantity) -> Result<()> {
        if quantity.symbol() != self.symbol() {
            Err(Error::SymbolMismatch)?;
        }
        Ok(())
    }

    /// How much more can be issued before hitting the ceiling.
    pub fn available_supply(&self) -> Result<Quantity> {
        self.max_supply().checked_sub(self.supply())
    }

    /// Put more of this currency into circulation. The supply cannot pass the
    /// maximum supply. Returns the updated supply on success.
    pub(crate) fn add_supply(&mut self, quantity: &Quantity) -> Result<&Quantity> {
        self.check_symbol(quantity)?;
        let new_supply = self.supply().checked_add(quantity)?;
        if new_supply.amount() > self.max_supply().amount() {
            Err(Error::SupplyExceeded)?;
        }
        self.set_supply(new_supply);
        Ok(self.supply())
    }

    /// Take some of this currency out of existence, lowering both the supply
    /// and the ceiling. Neither can go below zero.
    pub(crate) fn retire_supply(&mut self, quantity: &Quantity) -> Result<&Quantity> {
        self.check_symbol(quantity)?;
        let new_supply = self.supply().checked_sub(quantity)?;
        let new_max = self.max_supply().checked_sub(quantity)?;
        if new_supply.amount() < 0 || new_max.amount() < 0 {
            Err(Error::InsufficientBalance)?;
        }
        self.set_supply(new_supply);
        self.set_max_supply(new_max);
        Ok(self.supply())
    }
}
