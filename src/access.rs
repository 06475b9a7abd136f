//! The access module decides whether the account submitting an action holds
//! the authority that action requires.
//!
//! Every ledger action names exactly one required authority: the ledger's
//! creator for `create`, the currency's issuer for `issue` and `unlock`, and
//! the sending account for `transfer`. Proving that the actor really controls
//! an account is the host's job (signatures, wallets). What the ledger needs is
//! the yes/no answer, which it gets through the [Authorizer] trait so tests and
//! hosts can plug in their own rules.
//!
//! Access is denied by default: anything an authorizer doesn't explicitly allow
//! fails with [Error::Unauthorized][err_unauth].
//!
//! [Authorizer]: trait.Authorizer.html
//! [err_unauth]: ../error/enum.Error.html#variant.Unauthorized

use crate::{
    error::{Error, Result},
    models::lib::agent::{Agent, AccountName},
};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Answers "may `actor` act with `required`'s authority?"
pub trait Authorizer {
    fn authorize(&self, actor: &AccountName, required: &AccountName) -> bool;
}

impl<F> Authorizer for F
    where F: Fn(&AccountName, &AccountName) -> bool
{
    fn authorize(&self, actor: &AccountName, required: &AccountName) -> bool {
        self(actor, required)
    }
}

/// The plain rule: an account only ever acts for itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExactAuthority;

impl Authorizer for ExactAuthority {
    fn authorize(&self, actor: &AccountName, required: &AccountName) -> bool {
        actor == required
    }
}

/// Lets accounts grant other accounts the right to act on their behalf, on top
/// of every account acting for itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DelegatedAuthority {
    delegates: HashMap<AccountName, HashSet<AccountName>>,
}

impl DelegatedAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `delegate` to act with `owner`'s authority.
    pub fn grant(&mut self, owner: AccountName, delegate: AccountName) {
        self.delegates.entry(owner).or_insert_with(HashSet::new).insert(delegate);
    }

    /// Take back a grant. Returns whether the grant existed.
    pub fn revoke(&mut self, owner: &AccountName, delegate: &AccountName) -> bool {
        self.delegates.get_mut(owner).map(|set| set.remove(delegate)).unwrap_or(false)
    }
}

impl Authorizer for DelegatedAuthority {
    fn authorize(&self, actor: &AccountName, required: &AccountName) -> bool {
        if actor == required {
            return true;
        }
        self.delegates.get(required)
            .map(|set| set.contains(actor))
            .unwrap_or(false)
    }
}

/// The account submitting an action, along with the rules used to check its
/// authority. Transactions take one of these the way they'd take a user.
#[derive(Clone, Copy)]
pub struct Caller<'a> {
    actor: &'a AccountName,
    authorizer: &'a dyn Authorizer,
}

impl<'a> Caller<'a> {
    pub fn new(actor: &'a AccountName, authorizer: &'a dyn Authorizer) -> Self {
        Self { actor, authorizer }
    }

    /// The account submitting the action.
    pub fn actor(&self) -> &AccountName {
        self.actor
    }

    /// Determine if the caller can act with the given agent's authority.
    pub fn can<T: Agent + ?Sized>(&self, required: &T) -> bool {
        self.authorizer.authorize(self.actor, required.account_name())
    }

    /// Check if the caller can act with the given agent's authority.
    pub fn access_check<T: Agent + ?Sized>(&self, required: &T) -> Result<()> {
        if !self.can(required) {
            Err(Error::Unauthorized)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Debug for Caller<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("actor", &self.actor)
            .finish()
    }
}
