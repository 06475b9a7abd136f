//! Balances move between accounts through transfers. A transfer debits the
//! sender and credits the receiver in one step, and is refused outright while
//! the currency is locked.

use chrono::{DateTime, Utc};
use crate::{
    access::Caller,
    asset::Quantity,
    config::LedgerConfig,
    error::{Error, Result},
    models::{
        Op,
        Modifications,
        balance::Balance,
        currency::Currency,
        lib::agent::AccountName,
    },
    transactions::currency::{balance_or_new, check_positive},
};

/// Transfer funds from one account to another.
///
/// `from_balance` and `to_balance` are the two accounts' existing balances in
/// `currency`, if they have them.
pub fn transfer(caller: &Caller, config: &LedgerConfig, currency: &Currency, from_balance: Option<Balance>, to_balance: Option<Balance>, from: &AccountName, to: &AccountName, quantity: Quantity, memo: &str, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(from)?;
    let issuer_exempt = config.issuer_may_transfer_locked() && from == currency.issuer();
    if currency.is_locked() && !issuer_exempt {
        Err(Error::TokenLocked)?;
    }
    if from == to {
        Err(Error::SelfTransfer)?;
    }
    config.check_memo(memo)?;
    check_positive(&quantity)?;
    currency.check_symbol(&quantity)?;

    let mut from_balance = from_balance.ok_or(Error::InsufficientBalance)?;
    from_balance.debit(&quantity)?;
    from_balance.set_updated(now.clone());
    let (to_op, mut to_balance) = balance_or_new(to_balance, to, currency, now)?;
    to_balance.credit(&quantity)?;
    to_balance.set_updated(now.clone());

    let from_op = if config.prune_zero_balances() && from_balance.is_zero() { Op::Delete } else { Op::Update };
    let mut mods = Modifications::new();
    mods.push(from_op, from_balance);
    mods.push(to_op, to_balance);
    Ok(mods)
}
