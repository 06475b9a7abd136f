//! The dispatcher is the ledger's front door. Hosts hand it an action name, the
//! acting account and a JSON payload; it turns the payload into a typed
//! [Action], looks up the rows the action touches, runs the matching
//! [transaction](../transactions/index.html) and commits the result.
//!
//! Each action goes Received → AuthorizationChecked → PreconditionsChecked →
//! Applied, or drops to Rejected at the first failed check. Nothing is written
//! until every check has passed, so a rejected action leaves the ledger
//! exactly as it found it.
//!
//! [Action]: enum.Action.html

use chrono::{DateTime, Utc};
use crate::{
    access::{Authorizer, Caller, ExactAuthority},
    asset::{Quantity, Symbol},
    config::LedgerConfig,
    error::{Error, Result},
    models::{
        Modifications,
        lib::agent::AccountName,
    },
    store::Ledger,
    transactions::{admin, balance, currency},
    util,
};
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Every action the ledger understands, with its fields already validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Register a currency (creator only)
    Create {
        issuer: AccountName,
        maximum_supply: Quantity,
        lock: bool,
    },
    /// Put new units into circulation (issuer only)
    Issue {
        to: AccountName,
        quantity: Quantity,
        memo: String,
    },
    /// Move funds between accounts (sender only)
    Transfer {
        from: AccountName,
        to: AccountName,
        quantity: Quantity,
        memo: String,
    },
    /// Lift a currency's lock (issuer only)
    Unlock {
        symbol: Symbol,
    },
    /// Destroy some of the owner's funds (owner only)
    Burn {
        owner: AccountName,
        value: Quantity,
    },
    /// Hand off the creator role (creator only)
    SetCreator {
        new_creator: AccountName,
    },
}

/// Pulls typed fields out of a JSON object payload.
struct Payload<'a> {
    action: &'a str,
    fields: Map<String, Value>,
}

impl<'a> Payload<'a> {
    fn new(action: &'a str, payload: Value) -> Result<Self> {
        match payload {
            Value::Object(fields) => Ok(Self { action, fields }),
            _ => Err(Error::InvalidPayload(format!("{}: payload must be an object", action))),
        }
    }

    /// Find a field under any of its accepted names.
    fn get(&self, names: &[&str]) -> Option<&Value> {
        names.iter().find_map(|name| self.fields.get(*name))
    }

    fn string(&self, names: &[&str]) -> Result<&str> {
        match self.get(names) {
            Some(Value::String(val)) => Ok(val.as_str()),
            Some(_) => Err(Error::InvalidPayload(format!("{}: field `{}` must be a string", self.action, names[0]))),
            None => Err(Error::InvalidPayload(format!("{}: missing field `{}`", self.action, names[0]))),
        }
    }

    fn parse<T: FromStr<Err = Error>>(&self, names: &[&str]) -> Result<T> {
        self.string(names)?.parse()
    }

    fn boolean(&self, name: &str) -> Result<bool> {
        match self.get(&[name]) {
            Some(Value::Bool(val)) => Ok(*val),
            Some(_) => Err(Error::InvalidPayload(format!("{}: field `{}` must be a boolean", self.action, name))),
            None => Err(Error::InvalidPayload(format!("{}: missing field `{}`", self.action, name))),
        }
    }

    /// Memos are optional and default to empty.
    fn memo(&self) -> Result<String> {
        match self.get(&["memo"]) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(_) => Ok(self.string(&["memo"])?.to_string()),
        }
    }
}

impl Action {
    /// Validate an action name and its JSON payload.
    pub fn parse(name: &str, payload: Value) -> Result<Self> {
        let payload = Payload::new(name, payload)?;
        let action = match name {
            "create" | "createlocked" => {
                let lock = if name == "createlocked" { true } else { payload.boolean("lock")? };
                Action::Create {
                    issuer: payload.parse(&["issuer"])?,
                    maximum_supply: payload.parse(&["maximum_supply", "max_supply"])?,
                    lock,
                }
            }
            "issue" => Action::Issue {
                to: payload.parse(&["to"])?,
                quantity: payload.parse(&["quantity"])?,
                memo: payload.memo()?,
            },
            "transfer" => Action::Transfer {
                from: payload.parse(&["from"])?,
                to: payload.parse(&["to"])?,
                quantity: payload.parse(&["quantity"])?,
                memo: payload.memo()?,
            },
            "unlock" => Action::Unlock {
                symbol: payload.parse(&["symbol"])?,
            },
            "burn" => Action::Burn {
                owner: payload.parse(&["owner"])?,
                value: payload.parse(&["value", "quantity"])?,
            },
            "setcreator" => Action::SetCreator {
                new_creator: payload.parse(&["new_creator"])?,
            },
            _ => Err(Error::UnknownAction(name.to_string()))?,
        };
        Ok(action)
    }

    /// The action's name as hosts submit it.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create { lock: true, .. } => "createlocked",
            Action::Create { .. } => "create",
            Action::Issue { .. } => "issue",
            Action::Transfer { .. } => "transfer",
            Action::Unlock { .. } => "unlock",
            Action::Burn { .. } => "burn",
            Action::SetCreator { .. } => "setcreator",
        }
    }
}

/// Owns a ledger and applies actions to it one at a time.
///
/// Taking `&mut self` for every write is what serializes actions: each one
/// runs to completion (or rejection) before the next can start. Use
/// [SharedDispatcher](struct.SharedDispatcher.html) to share one across
/// threads.
#[derive(Debug)]
pub struct Dispatcher<A: Authorizer = ExactAuthority> {
    ledger: Ledger,
    config: LedgerConfig,
    authorizer: A,
}

impl Dispatcher<ExactAuthority> {
    /// A dispatcher for a fresh ledger where accounts only act for themselves.
    pub fn standard(config: LedgerConfig) -> Result<Self> {
        Self::new(config, ExactAuthority)
    }
}

impl<A: Authorizer> Dispatcher<A> {
    /// A dispatcher for a fresh, empty ledger.
    pub fn new(config: LedgerConfig, authorizer: A) -> Result<Self> {
        let ledger = Ledger::new(config.creator().clone(), &util::time::now())?;
        Ok(Self::with_ledger(ledger, config, authorizer))
    }

    /// A dispatcher for an existing (ie restored) ledger.
    pub fn with_ledger(ledger: Ledger, config: LedgerConfig, authorizer: A) -> Self {
        Self { ledger, config, authorizer }
    }

    /// Read-only access to the ledger's tables.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Parse and apply an action as submitted by a host.
    pub fn apply_action(&mut self, name: &str, actor: &AccountName, payload: Value) -> Result<()> {
        let action = Action::parse(name, payload)
            .map_err(|err| {
                warn!(action = name, actor = %actor, error = %err, "action payload rejected");
                err
            })?;
        self.apply(actor, action)
    }

    /// Apply a typed action, stamped with the current time.
    pub fn apply(&mut self, actor: &AccountName, action: Action) -> Result<()> {
        self.apply_at(actor, action, &util::time::now())
    }

    /// Apply a typed action, stamped with the given time.
    pub fn apply_at(&mut self, actor: &AccountName, action: Action, now: &DateTime<Utc>) -> Result<()> {
        let name = action.name();
        debug!(action = name, actor = %actor, "action received");
        let mods = match self.plan(actor, action, now) {
            Ok(mods) => mods,
            Err(err) => {
                warn!(action = name, actor = %actor, error = %err, "action rejected");
                return Err(err);
            }
        };
        let count = mods.len();
        self.commit(name, actor, mods)?;
        info!(action = name, actor = %actor, modifications = count, "action applied");
        Ok(())
    }

    fn commit(&mut self, name: &str, actor: &AccountName, mods: Modifications) -> Result<()> {
        self.ledger.commit(mods)
            .map_err(|err| {
                warn!(action = name, actor = %actor, error = %err, "action rejected");
                err
            })
    }

    /// Run every check an action needs and return the changes it would make,
    /// without touching the ledger.
    pub fn plan(&self, actor: &AccountName, action: Action, now: &DateTime<Utc>) -> Result<Modifications> {
        let caller = Caller::new(actor, &self.authorizer);
        let ledger = &self.ledger;
        match action {
            Action::Create { issuer, maximum_supply, lock } => {
                let existing = ledger.currency(maximum_supply.code());
                currency::create(&caller, ledger.creator(), existing, issuer, maximum_supply, lock, now)
            }
            Action::Issue { to, quantity, memo } => {
                let subject = ledger.get_currency(quantity.code())?.clone();
                let to_balance = ledger.balance(&to, quantity.code()).cloned();
                currency::issue(&caller, &self.config, subject, to_balance, &to, quantity, &memo, now)
            }
            Action::Transfer { from, to, quantity, memo } => {
                caller.access_check(&from)?;
                let subject = ledger.get_currency(quantity.code())?;
                let from_balance = ledger.balance(&from, quantity.code()).cloned();
                let to_balance = ledger.balance(&to, quantity.code()).cloned();
                balance::transfer(&caller, &self.config, subject, from_balance, to_balance, &from, &to, quantity, &memo, now)
            }
            Action::Unlock { symbol } => {
                let subject = ledger.get_currency(symbol.code())?.clone();
                currency::unlock(&caller, subject, &symbol, now)
            }
            Action::Burn { owner, value } => {
                caller.access_check(&owner)?;
                let subject = ledger.get_currency(value.code())?.clone();
                let owner_balance = ledger.balance(&owner, value.code()).cloned();
                currency::burn(&caller, &self.config, subject, owner_balance, &owner, value, now)
            }
            Action::SetCreator { new_creator } => {
                admin::set_creator(&caller, ledger.creator().clone(), new_creator, now)
            }
        }
    }
}

/// A dispatcher that can be cloned and shared between threads. Writes take an
/// exclusive lock, so actions are still applied one at a time; reads can run
/// side by side.
pub struct SharedDispatcher<A: Authorizer = ExactAuthority> {
    inner: Arc<RwLock<Dispatcher<A>>>,
}

impl<A: Authorizer> SharedDispatcher<A> {
    pub fn new(dispatcher: Dispatcher<A>) -> Self {
        Self { inner: Arc::new(RwLock::new(dispatcher)) }
    }

    pub fn apply_action(&self, name: &str, actor: &AccountName, payload: Value) -> Result<()> {
        // a panic can't leave a half-applied action behind, so a poisoned lock
        // still guards consistent tables
        let mut dispatcher = self.inner.write().unwrap_or_else(|e| e.into_inner());
        dispatcher.apply_action(name, actor, payload)
    }

    pub fn apply(&self, actor: &AccountName, action: Action) -> Result<()> {
        let mut dispatcher = self.inner.write().unwrap_or_else(|e| e.into_inner());
        dispatcher.apply(actor, action)
    }

    /// Run a read-only query against the ledger.
    pub fn read<F, R>(&self, query: F) -> R
        where F: FnOnce(&Ledger) -> R
    {
        let dispatcher = self.inner.read().unwrap_or_else(|e| e.into_inner());
        query(dispatcher.ledger())
    }
}

impl<A: Authorizer> Clone for SharedDispatcher<A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        access::DelegatedAuthority,
        asset::SymbolCode,
        models::Op,
        util::test::*,
    };
    use proptest::prelude::*;
    use serde_json::json;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn dispatcher() -> Dispatcher {
        init_logging();
        Dispatcher::standard(LedgerConfig::new(acct(DEPLOYER))).unwrap()
    }

    fn create_json(lock: bool) -> Value {
        json!({
            "issuer": "issuer",
            "maximum_supply": "10000.0000 ABC",
            "lock": lock,
        })
    }

    fn issue_json(quantity: &str) -> Value {
        json!({
            "to": "holder",
            "quantity": quantity,
            "memo": "",
        })
    }

    fn transfer_json(from: &str, to: &str, quantity: &str) -> Value {
        json!({
            "from": from,
            "to": to,
            "quantity": quantity,
            "memo": "",
        })
    }

    fn balance_of(dispatcher: &Dispatcher, owner: &str) -> Option<Quantity> {
        dispatcher.ledger().balance(&acct(owner), &code("ABC")).map(|b| b.balance().clone())
    }

    /// create + issue 500.0000 ABC to holder
    fn setup(lock: bool) -> Dispatcher {
        let mut dispatcher = dispatcher();
        dispatcher.apply_action("create", &acct(DEPLOYER), create_json(lock)).unwrap();
        dispatcher.apply_action("issue", &acct("issuer"), issue_json("500.0000 ABC")).unwrap();
        dispatcher
    }

    #[test]
    fn locked_tokens_cannot_be_transferred() {
        let mut dispatcher = setup(true);
        let before = dispatcher.ledger().clone();
        let res = dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "250.0000 ABC"));
        assert_eq!(res, Err(Error::TokenLocked));
        assert_eq!(dispatcher.ledger(), &before);
    }

    #[test]
    fn unlocked_tokens_can_be_transferred() {
        let mut dispatcher = setup(true);

        // only the issuer can unlock
        let res = dispatcher.apply_action("unlock", &acct("holder"), json!({"symbol": "4,ABC"}));
        assert_eq!(res, Err(Error::Unauthorized));
        assert!(dispatcher.ledger().currency(&code("ABC")).unwrap().is_locked());

        dispatcher.apply_action("unlock", &acct("issuer"), json!({"symbol": "4,ABC"})).unwrap();
        assert!(!dispatcher.ledger().currency(&code("ABC")).unwrap().is_locked());

        dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "250.0000 ABC")).unwrap();
        assert_eq!(balance_of(&dispatcher, "holder"), Some(qty("250.0000 ABC")));
        assert_eq!(balance_of(&dispatcher, "issuer"), Some(qty("250.0000 ABC")));

        // unlocking twice is fine
        dispatcher.apply_action("unlock", &acct("issuer"), json!({"symbol": "4,ABC"})).unwrap();
    }

    #[test]
    fn nonlocked_tokens_can_be_transferred() {
        let mut dispatcher = setup(false);
        dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "250.0000 ABC")).unwrap();
        assert_eq!(balance_of(&dispatcher, "holder"), Some(qty("250.0000 ABC")));
        assert_eq!(balance_of(&dispatcher, "issuer"), Some(qty("250.0000 ABC")));
    }

    #[test]
    fn supply_ceiling_holds() {
        let mut dispatcher = setup(false);
        let res = dispatcher.apply_action("issue", &acct("issuer"), issue_json("9500.0001 ABC"));
        assert_eq!(res, Err(Error::SupplyExceeded));
        let currency = dispatcher.ledger().currency(&code("ABC")).unwrap();
        assert_eq!(currency.supply(), &qty("500.0000 ABC"));
        assert_eq!(balance_of(&dispatcher, "holder"), Some(qty("500.0000 ABC")));

        dispatcher.apply_action("issue", &acct("issuer"), issue_json("9500.0000 ABC")).unwrap();
        let currency = dispatcher.ledger().currency(&code("ABC")).unwrap();
        assert_eq!(currency.supply(), currency.max_supply());
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let mut dispatcher = setup(false);
        dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "100.0000 ABC")).unwrap();
        let before = dispatcher.ledger().clone();
        let res = dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "400.0001 ABC"));
        assert_eq!(res, Err(Error::InsufficientBalance));
        assert_eq!(balance_of(&dispatcher, "holder"), Some(qty("400.0000 ABC")));
        assert_eq!(balance_of(&dispatcher, "issuer"), Some(qty("100.0000 ABC")));
        assert_eq!(dispatcher.ledger(), &before);

        // the receiver's row isn't created by a failed transfer either
        let res = dispatcher.apply_action("transfer", &acct("holder"), transfer_json("holder", "newcomer", "400.0001 ABC"));
        assert_eq!(res, Err(Error::InsufficientBalance));
        assert!(dispatcher.ledger().balance(&acct("newcomer"), &code("ABC")).is_none());
    }

    #[test]
    fn checks_authority_for_each_action() {
        let mut dispatcher = dispatcher();
        let res = dispatcher.apply_action("create", &acct("issuer"), create_json(false));
        assert_eq!(res, Err(Error::Unauthorized));
        dispatcher.apply_action("create", &acct(DEPLOYER), create_json(false)).unwrap();

        let res = dispatcher.apply_action("issue", &acct(DEPLOYER), issue_json("1.0000 ABC"));
        assert_eq!(res, Err(Error::Unauthorized));
        dispatcher.apply_action("issue", &acct("issuer"), issue_json("1.0000 ABC")).unwrap();

        let res = dispatcher.apply_action("transfer", &acct("issuer"), transfer_json("holder", "issuer", "1.0000 ABC"));
        assert_eq!(res, Err(Error::Unauthorized));

        // authority is checked before the symbol is looked up
        let res = dispatcher.apply_action("transfer", &acct("issuer"), transfer_json("holder", "issuer", "1.0000 XYZ"));
        assert_eq!(res, Err(Error::Unauthorized));
    }

    #[test]
    fn rejects_unknown_and_duplicate_symbols() {
        let mut dispatcher = setup(false);
        let res = dispatcher.apply_action("issue", &acct("issuer"), issue_json("1.0000 XYZ"));
        assert_eq!(res, Err(Error::UnknownSymbol("XYZ".into())));
        let res = dispatcher.apply_action("unlock", &acct("issuer"), json!({"symbol": "4,XYZ"}));
        assert_eq!(res, Err(Error::UnknownSymbol("XYZ".into())));
        let res = dispatcher.apply_action("create", &acct(DEPLOYER), create_json(true));
        assert_eq!(res, Err(Error::CurrencyAlreadyExists("ABC".into())));
        let res = dispatcher.apply_action("issue", &acct("issuer"), issue_json("1.00 ABC"));
        assert_eq!(res, Err(Error::SymbolMismatch));
    }

    #[test]
    fn validates_payloads() {
        let mut dispatcher = dispatcher();
        let deployer = acct(DEPLOYER);
        let res = dispatcher.apply_action("mint", &deployer, json!({}));
        assert_eq!(res, Err(Error::UnknownAction("mint".into())));
        let res = dispatcher.apply_action("create", &deployer, json!([]));
        assert!(matches!(res, Err(Error::InvalidPayload(_))));
        let res = dispatcher.apply_action("create", &deployer, json!({"issuer": "issuer", "maximum_supply": "1.0 ABC"}));
        assert_eq!(res, Err(Error::InvalidPayload("create: missing field `lock`".into())));
        let res = dispatcher.apply_action("create", &deployer, json!({"issuer": "issuer", "maximum_supply": 10, "lock": false}));
        assert_eq!(res, Err(Error::InvalidPayload("create: field `maximum_supply` must be a string".into())));
        let res = dispatcher.apply_action("create", &deployer, json!({"issuer": "Issuer", "maximum_supply": "1.0 ABC", "lock": false}));
        assert_eq!(res, Err(Error::InvalidAccount("Issuer".into())));
        let res = dispatcher.apply_action("create", &deployer, json!({"issuer": "issuer", "maximum_supply": "1.0 abc", "lock": false}));
        assert_eq!(res, Err(Error::InvalidSymbol("abc".into())));
        let res = dispatcher.apply_action("create", &deployer, json!({"issuer": "issuer", "maximum_supply": "0.0 ABC", "lock": false}));
        assert_eq!(res, Err(Error::InvalidSupply));
        let res = dispatcher.apply_action("unlock", &deployer, json!({"symbol": "ABC"}));
        assert_eq!(res, Err(Error::InvalidSymbol("ABC".into())));
        assert_eq!(dispatcher.ledger().currencies().count(), 0);

        // `max_supply` is accepted too, and memos are optional
        dispatcher.apply_action("create", &deployer, json!({"issuer": "issuer", "max_supply": "1.0 ABC", "lock": false})).unwrap();
        dispatcher.apply_action("issue", &acct("issuer"), json!({"to": "holder", "quantity": "1.0 ABC"})).unwrap();
    }

    #[test]
    fn parses_every_action() {
        let action = Action::parse("createlocked", json!({"issuer": "issuer", "maximum_supply": "5.00 XYZ"})).unwrap();
        assert_eq!(action, Action::Create { issuer: acct("issuer"), maximum_supply: qty("5.00 XYZ"), lock: true });
        assert_eq!(action.name(), "createlocked");
        let action = Action::parse("transfer", transfer_json("holder", "issuer", "1.0000 ABC")).unwrap();
        assert_eq!(action.name(), "transfer");
        let action = Action::parse("burn", json!({"owner": "holder", "value": "1.0000 ABC"})).unwrap();
        assert_eq!(action, Action::Burn { owner: acct("holder"), value: qty("1.0000 ABC") });
        let action = Action::parse("setcreator", json!({"new_creator": "new.creator"})).unwrap();
        assert_eq!(action, Action::SetCreator { new_creator: acct("new.creator") });
        let action = Action::parse("unlock", json!({"symbol": "4,ABC"})).unwrap();
        assert_eq!(action, Action::Unlock { symbol: sym("4,ABC") });

        // typed actions serialize with their name as the tag
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, json!({"action": "unlock", "symbol": "4,ABC"}));
        let action2: Action = serde_json::from_value(json).unwrap();
        assert_eq!(action, action2);
    }

    #[test]
    fn commit_failures_are_logged() {
        let mut dispatcher = setup(false);
        let before = dispatcher.ledger().clone();
        let now = util::time::now();
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .finish();
        let res = tracing::subscriber::with_default(subscriber, || {
            let mods = Modifications::new_single(Op::Update, make_balance("issuer", "1.0000 ABC", &now));
            dispatcher.commit("transfer", &acct("holder"), mods)
        });
        assert_eq!(res, Err(Error::BalanceMissing("issuer@ABC".into())));
        assert_eq!(dispatcher.ledger(), &before);
        let logs = logs.contents();
        assert!(logs.contains("action rejected"));
        assert!(logs.contains("holder"));
    }

    #[test]
    fn createlocked_locks() {
        let mut dispatcher = dispatcher();
        dispatcher.apply_action("createlocked", &acct(DEPLOYER), json!({"issuer": "issuer", "maximum_supply": "10.00 XYZ"})).unwrap();
        assert!(dispatcher.ledger().currency(&code("XYZ")).unwrap().is_locked());
    }

    #[test]
    fn burn_and_set_creator() {
        let mut dispatcher = setup(true);
        dispatcher.apply_action("burn", &acct("holder"), json!({"owner": "holder", "value": "100.0000 ABC"})).unwrap();
        let currency = dispatcher.ledger().currency(&code("ABC")).unwrap();
        assert_eq!(currency.supply(), &qty("400.0000 ABC"));
        assert_eq!(currency.max_supply(), &qty("9900.0000 ABC"));
        assert_eq!(balance_of(&dispatcher, "holder"), Some(qty("400.0000 ABC")));
        let res = dispatcher.apply_action("burn", &acct("issuer"), json!({"owner": "holder", "value": "1.0000 ABC"}));
        assert_eq!(res, Err(Error::Unauthorized));

        let res = dispatcher.apply_action("setcreator", &acct("holder"), json!({"new_creator": "holder"}));
        assert_eq!(res, Err(Error::Unauthorized));
        dispatcher.apply_action("setcreator", &acct(DEPLOYER), json!({"new_creator": "new.creator"})).unwrap();
        assert_eq!(dispatcher.ledger().creator().account(), &acct("new.creator"));
        let xyz = json!({"issuer": "issuer", "maximum_supply": "1.00 XYZ", "lock": false});
        let res = dispatcher.apply_action("create", &acct(DEPLOYER), xyz.clone());
        assert_eq!(res, Err(Error::Unauthorized));
        dispatcher.apply_action("create", &acct("new.creator"), xyz).unwrap();
    }

    #[test]
    fn injected_authorizer_is_used() {
        init_logging();
        let mut auth = DelegatedAuthority::new();
        auth.grant(acct("issuer"), acct("issuer.ops"));
        let mut dispatcher = Dispatcher::new(LedgerConfig::new(acct(DEPLOYER)), auth).unwrap();
        dispatcher.apply_action("create", &acct(DEPLOYER), create_json(true)).unwrap();
        dispatcher.apply_action("issue", &acct("issuer.ops"), issue_json("5.0000 ABC")).unwrap();
        dispatcher.apply_action("unlock", &acct("issuer.ops"), json!({"symbol": "4,ABC"})).unwrap();
        let res = dispatcher.apply_action("transfer", &acct("issuer.ops"), transfer_json("holder", "issuer", "1.0000 ABC"));
        assert_eq!(res, Err(Error::Unauthorized));
    }

    #[test]
    fn restored_ledger_keeps_going() {
        let dispatcher = setup(false);
        let json = dispatcher.ledger().to_json().unwrap();
        let ledger = Ledger::from_json(&json).unwrap();
        let mut dispatcher2 = Dispatcher::with_ledger(ledger, LedgerConfig::new(acct(DEPLOYER)), ExactAuthority);
        dispatcher2.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "250.0000 ABC")).unwrap();
        assert_eq!(balance_of(&dispatcher2, "issuer"), Some(qty("250.0000 ABC")));
    }

    #[test]
    fn shared_dispatcher_serializes_writes() {
        let shared = SharedDispatcher::new(setup(false));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        shared.apply_action("transfer", &acct("holder"), transfer_json("holder", "issuer", "1.0000 ABC")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let issuer_balance = shared.read(|ledger| ledger.balance(&acct("issuer"), &code("ABC")).map(|b| b.balance().clone()));
        assert_eq!(issuer_balance, Some(qty("100.0000 ABC")));
        let holder_balance = shared.read(|ledger| ledger.balance(&acct("holder"), &code("ABC")).map(|b| b.balance().clone()));
        assert_eq!(holder_balance, Some(qty("400.0000 ABC")));
    }

    /// Check the invariants that must hold after any sequence of actions.
    fn assert_invariants(ledger: &Ledger) {
        for currency in ledger.currencies() {
            assert!(currency.supply().amount() >= 0);
            assert!(currency.supply().amount() <= currency.max_supply().amount());
            let held: i64 = ledger.holders(currency.code()).map(|b| b.balance().amount()).sum();
            assert_eq!(held, currency.supply().amount());
        }
        for holder in &["issuer", "holder", "third"] {
            for balance in ledger.balances_of(&acct(holder)) {
                assert!(balance.balance().amount() >= 0);
            }
        }
    }

    fn op_strategy() -> impl Strategy<Value = (u8, usize, usize, i64)> {
        (0u8..5, 0usize..3, 0usize..3, 1i64..4_000)
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(ops in proptest::collection::vec(op_strategy(), 1..40), lock in any::<bool>()) {
            let accounts = ["issuer", "holder", "third"];
            let mut dispatcher = Dispatcher::standard(LedgerConfig::new(acct(DEPLOYER))).unwrap();
            dispatcher.apply_action("create", &acct(DEPLOYER), json!({
                "issuer": "issuer",
                "maximum_supply": "10000.00 ABC",
                "lock": lock,
            })).unwrap();
            let abc = SymbolCode::new("ABC").unwrap();
            for (kind, a, b, amount) in ops {
                let quantity = Quantity::new(amount * 100, sym("2,ABC")).to_string();
                let (name, actor, payload) = match kind {
                    0 | 1 => ("issue", "issuer", json!({"to": accounts[a], "quantity": quantity, "memo": ""})),
                    2 => ("unlock", "issuer", json!({"symbol": "2,ABC"})),
                    3 => ("burn", accounts[a], json!({"owner": accounts[a], "value": quantity})),
                    _ => ("transfer", accounts[a], json!({"from": accounts[a], "to": accounts[b], "quantity": quantity, "memo": ""})),
                };
                let before = dispatcher.ledger().clone();
                let was_locked = before.currency(&abc).unwrap().is_locked();
                let res = dispatcher.apply_action(name, &acct(actor), payload);
                if res.is_err() {
                    prop_assert_eq!(dispatcher.ledger(), &before);
                }
                if name == "transfer" && was_locked {
                    prop_assert_eq!(res, Err(Error::TokenLocked));
                }
                assert_invariants(dispatcher.ledger());
            }
        }
    }
}
