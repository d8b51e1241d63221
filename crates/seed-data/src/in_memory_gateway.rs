//! In-memory gateway implementing every port.
//!
//! Identifiers are sequential per entity (`user-1`, `account-1`, `card-1`,
//! ...). Default cards created when a card-bearing account is opened draw
//! from the same card sequence as issued cards, so card identifiers stay
//! unique across the whole run. Every call is recorded in arrival order,
//! including calls that were made to fail.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ids::{AccountId, CardId, OperationId, UserId};
use crate::ports::{
    AccountKind, AccountsGateway, CardKind, CardsGateway, GatewayError, MakeOperationRequest,
    OpenedAccount, OperationsGateway, UsersGateway,
};

/// Kind of gateway call, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `UsersGateway::create_user`.
    CreateUser,
    /// `AccountsGateway::open_account`.
    OpenAccount,
    /// `CardsGateway::issue_card`.
    IssueCard,
    /// `OperationsGateway::make_operation`.
    MakeOperation,
}

/// A call received by the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// A user creation.
    CreateUser,
    /// An account opening.
    OpenAccount {
        /// Requested account kind.
        kind: AccountKind,
        /// Owning user.
        user_id: UserId,
    },
    /// A card issuance.
    IssueCard {
        /// Requested card kind.
        kind: CardKind,
        /// Owning user.
        user_id: UserId,
        /// Owning account.
        account_id: AccountId,
    },
    /// An operation creation.
    MakeOperation(MakeOperationRequest),
}

impl GatewayCall {
    /// Returns the kind of this call.
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        match self {
            Self::CreateUser => CallKind::CreateUser,
            Self::OpenAccount { .. } => CallKind::OpenAccount,
            Self::IssueCard { .. } => CallKind::IssueCard,
            Self::MakeOperation(_) => CallKind::MakeOperation,
        }
    }
}

#[derive(Debug, Default)]
struct Sequences {
    users: u64,
    accounts: u64,
    cards: u64,
    operations: u64,
}

#[derive(Debug, Default)]
struct GatewayState {
    calls: Vec<GatewayCall>,
    sequences: Sequences,
}

/// Gateway double that keeps everything in memory.
///
/// # Example
///
/// ```
/// use seed_data::{CallKind, InMemoryGateway};
///
/// let gateway = InMemoryGateway::new().fail_on(CallKind::CreateUser, 2);
/// assert_eq!(gateway.call_count(CallKind::CreateUser), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<GatewayState>,
    failures: HashSet<(CallKind, usize)>,
    omit_default_cards: bool,
}

impl InMemoryGateway {
    /// Creates a gateway that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `nth` call (1-based) of `kind` with a transport error.
    ///
    /// Can be chained to inject several failures.
    #[must_use]
    pub fn fail_on(mut self, kind: CallKind, nth: usize) -> Self {
        self.failures.insert((kind, nth));
        self
    }

    /// Opens card-bearing accounts without a default card.
    #[must_use]
    pub const fn without_default_cards(mut self) -> Self {
        self.omit_default_cards = true;
        self
    }

    /// Returns every recorded call in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Returns how many calls of `kind` were received.
    #[must_use]
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.kind() == kind)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `call`, applies injected failures, then runs `respond` with
    /// the identifier sequences while still holding the lock.
    fn dispatch<T>(
        &self,
        call: GatewayCall,
        respond: impl FnOnce(&mut Sequences) -> T,
    ) -> Result<T, GatewayError> {
        let kind = call.kind();
        let mut state = self.lock();
        state.calls.push(call);
        let ordinal = state
            .calls
            .iter()
            .filter(|recorded| recorded.kind() == kind)
            .count();
        if self.failures.contains(&(kind, ordinal)) {
            return Err(GatewayError::transport(format!(
                "injected failure on {kind:?} call {ordinal}"
            )));
        }
        Ok(respond(&mut state.sequences))
    }
}

fn next_id(counter: &mut u64, prefix: &str) -> String {
    *counter = counter.saturating_add(1);
    format!("{prefix}-{counter}")
}

fn invalid(err: impl ToString) -> GatewayError {
    GatewayError::invalid_response(err.to_string())
}

#[async_trait]
impl UsersGateway for InMemoryGateway {
    async fn create_user(&self) -> Result<UserId, GatewayError> {
        let raw = self.dispatch(GatewayCall::CreateUser, |seq| next_id(&mut seq.users, "user"))?;
        UserId::new(raw).map_err(invalid)
    }
}

#[async_trait]
impl AccountsGateway for InMemoryGateway {
    async fn open_account(
        &self,
        kind: AccountKind,
        user_id: &UserId,
    ) -> Result<OpenedAccount, GatewayError> {
        let with_card = kind.is_card_bearing() && !self.omit_default_cards;
        let call = GatewayCall::OpenAccount {
            kind,
            user_id: user_id.clone(),
        };
        let (account_raw, card_raw) = self.dispatch(call, |seq| {
            let account = next_id(&mut seq.accounts, "account");
            let card = with_card.then(|| next_id(&mut seq.cards, "card"));
            (account, card)
        })?;
        Ok(OpenedAccount {
            account_id: AccountId::new(account_raw).map_err(invalid)?,
            default_card_id: card_raw.map(CardId::new).transpose().map_err(invalid)?,
        })
    }
}

#[async_trait]
impl CardsGateway for InMemoryGateway {
    async fn issue_card(
        &self,
        kind: CardKind,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<CardId, GatewayError> {
        let call = GatewayCall::IssueCard {
            kind,
            user_id: user_id.clone(),
            account_id: account_id.clone(),
        };
        let raw = self.dispatch(call, |seq| next_id(&mut seq.cards, "card"))?;
        CardId::new(raw).map_err(invalid)
    }
}

#[async_trait]
impl OperationsGateway for InMemoryGateway {
    async fn make_operation(
        &self,
        request: &MakeOperationRequest,
    ) -> Result<OperationId, GatewayError> {
        let call = GatewayCall::MakeOperation(request.clone());
        let raw = self.dispatch(call, |seq| next_id(&mut seq.operations, "operation"))?;
        OperationId::new(raw).map_err(invalid)
    }
}
