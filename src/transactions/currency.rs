//! Currencies are registered by the ledger's creator and from then on belong
//! to their issuer, who alone may put new units into circulation and lift the
//! currency's lock.
//!
//! See the [currency model.][1]
//!
//! [1]: ../../models/currency/index.html

use chrono::{DateTime, Utc};
use crate::{
    access::Caller,
    asset::{Quantity, Symbol},
    config::LedgerConfig,
    error::{Error, Result},
    models::{
        Op,
        Modifications,
        balance::Balance,
        creator::Creator,
        currency::Currency,
        lib::agent::AccountName,
    },
};

/// Make sure a quantity is in range and strictly positive.
pub(crate) fn check_positive(quantity: &Quantity) -> Result<()> {
    if !quantity.is_valid() || !quantity.is_positive() {
        Err(Error::InvalidQuantity(quantity.to_string()))?;
    }
    Ok(())
}

/// Grab the holder's balance row, or start a fresh zero row if they have never
/// held this currency. The op tells the store which one it got.
pub(crate) fn balance_or_new(existing: Option<Balance>, owner: &AccountName, currency: &Currency, now: &DateTime<Utc>) -> Result<(Op, Balance)> {
    match existing {
        Some(balance) => Ok((Op::Update, balance)),
        None => {
            let balance = Balance::builder()
                .owner(owner.clone())
                .balance(Quantity::zero(currency.symbol().clone()))
                .created(now.clone())
                .updated(now.clone())
                .build()
                .map_err(|e| Error::BuilderFailed(e))?;
            Ok((Op::Create, balance))
        }
    }
}

/// Register a new `Currency`. Only the ledger's creator may do this, and only
/// once per symbol code.
pub fn create(caller: &Caller, creator: &Creator, existing: Option<&Currency>, issuer: AccountName, max_supply: Quantity, lock: bool, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(creator)?;
    if !max_supply.is_valid() || !max_supply.is_positive() {
        Err(Error::InvalidSupply)?;
    }
    if existing.is_some() {
        Err(Error::CurrencyAlreadyExists(max_supply.code().to_string()))?;
    }
    let model = Currency::builder()
        .supply(Quantity::zero(max_supply.symbol().clone()))
        .max_supply(max_supply)
        .issuer(issuer)
        .locked(lock)
        .created(now.clone())
        .updated(now.clone())
        .build()
        .map_err(|e| Error::BuilderFailed(e))?;
    Ok(Modifications::new_single(Op::Create, model))
}

/// Put new units of a currency into circulation, crediting them to `to`.
///
/// `to_balance` is `to`'s existing balance in this currency, if any.
pub fn issue(caller: &Caller, config: &LedgerConfig, mut subject: Currency, to_balance: Option<Balance>, to: &AccountName, quantity: Quantity, memo: &str, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(subject.issuer())?;
    config.check_memo(memo)?;
    check_positive(&quantity)?;
    subject.add_supply(&quantity)?;
    subject.set_updated(now.clone());

    let (balance_op, mut balance) = balance_or_new(to_balance, to, &subject, now)?;
    balance.credit(&quantity)?;
    balance.set_updated(now.clone());

    let mut mods = Modifications::new();
    mods.push(Op::Update, subject);
    mods.push(balance_op, balance);
    Ok(mods)
}

/// Lift a currency's lock so its holders can transfer it. Unlocking a currency
/// that isn't locked changes nothing.
pub fn unlock(caller: &Caller, mut subject: Currency, symbol: &Symbol, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(subject.issuer())?;
    if symbol != subject.symbol() {
        Err(Error::SymbolMismatch)?;
    }
    if !subject.is_locked() {
        return Ok(Modifications::new());
    }
    subject.set_locked(false);
    subject.set_updated(now.clone());
    Ok(Modifications::new_single(Op::Update, subject))
}

/// Destroy some of the owner's funds, taking them out of both the supply and
/// the supply ceiling.
pub fn burn(caller: &Caller, config: &LedgerConfig, mut subject: Currency, owner_balance: Option<Balance>, owner: &AccountName, quantity: Quantity, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(owner)?;
    check_positive(&quantity)?;
    subject.check_symbol(&quantity)?;
    let mut balance = owner_balance.ok_or(Error::InsufficientBalance)?;
    balance.debit(&quantity)?;
    balance.set_updated(now.clone());
    subject.retire_supply(&quantity)?;
    subject.set_updated(now.clone());

    let balance_op = if config.prune_zero_balances() && balance.is_zero() { Op::Delete } else { Op::Update };
    let mut mods = Modifications::new();
    mods.push(Op::Update, subject);
    mods.push(balance_op, balance);
    Ok(mods)
}
