//! The creator is the ledger's administrative authority: the one account
//! allowed to register new currencies. There is only ever one of these.

use crate::models::lib::agent::{Agent, AccountName};

ledger_model! {
    /// Holds the account currently acting as the ledger's administrative
    /// authority.
    pub struct Creator {
        /// The account allowed to `create` currencies and hand this role off
        account: AccountName,
    }
    CreatorBuilder
}

impl Agent for Creator {
    fn account_name(&self) -> &AccountName {
        self.account()
    }
}
