//! Administrative transactions act on the ledger itself rather than on any one
//! currency.

use chrono::{DateTime, Utc};
use crate::{
    access::Caller,
    error::Result,
    models::{
        Op,
        Modifications,
        creator::Creator,
        lib::agent::AccountName,
    },
};

/// Hand the creator role (the right to register currencies) to another
/// account. Only the current creator may do this.
pub fn set_creator(caller: &Caller, mut subject: Creator, new_creator: AccountName, now: &DateTime<Utc>) -> Result<Modifications> {
    caller.access_check(&subject)?;
    subject.set_account(new_creator);
    subject.set_updated(now.clone());
    Ok(Modifications::new_single(Op::Update, subject))
}
