//! Balances hold an account's funds in a single currency. Think of them like
//! one line on a bank statement.

use crate::{
    asset::{Quantity, SymbolCode},
    error::{Error, Result},
    models::lib::agent::AccountName,
};

/// The key a balance is stored under.
pub type BalanceKey = (AccountName, SymbolCode);

ledger_model! {
    /// One account's holdings of one currency.
    pub struct Balance {
        /// The account holding the funds
        owner: AccountName,
        /// How much the account holds. Never negative.
        balance: Quantity,
    }
    BalanceBuilder
}

impl Balance {
    pub fn code(&self) -> &SymbolCode {
        self.balance().code()
    }

    pub fn key(&self) -> BalanceKey {
        (self.owner().clone(), self.code().clone())
    }

    pub fn is_zero(&self) -> bool {
        self.balance().amount() == 0
    }

    /// Add funds to this balance. Returns the updated balance on success.
    pub(crate) fn credit(&mut self, quantity: &Quantity) -> Result<&Quantity> {
        let new_balance = self.balance().checked_add(quantity)?;
        self.set_balance(new_balance);
        Ok(self.balance())
    }

    /// Take funds out of this balance. The balance cannot go below zero.
    /// Returns the updated balance on success.
    pub(crate) fn debit(&mut self, quantity: &Quantity) -> Result<&Quantity> {
        let new_balance = self.balance().checked_sub(quantity)?;
        if new_balance.amount() < 0 {
            Err(Error::InsufficientBalance)?;
        }
        self.set_balance(new_balance);
        Ok(self.balance())
    }
}
