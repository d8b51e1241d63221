//! Plan-driven seed synthesis.
//!
//! [`SeedsBuilder`] walks a [`SeedsPlan`] and issues one gateway call per
//! planned entity, assembling the returned identifiers into a
//! [`SeedsResult`] of the same shape.
//!
//! Within a user subtree every call is strictly sequential because later
//! calls consume identifiers returned by earlier ones: accounts need the
//! user, cards and operations need the account and its default card. Users
//! are independent, so up to `concurrency` user subtrees run at once and
//! finish in any order; the result is put back in start order afterwards.
//! The first failure to complete drops every in-flight subtree before any
//! further user starts. No partial result is returned.

use std::fmt;
use std::num::NonZeroUsize;

use futures_util::{StreamExt, TryStreamExt, stream};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ResultValidationError;
use crate::ids::{AccountId, CardId, UserId};
use crate::plan::{SeedAccountsPlan, SeedUsersPlan, SeedsPlan};
use crate::ports::{
    AccountKind, CardKind, GatewayError, MakeOperationRequest, OpenedAccount, OperationKind,
    SeedGateways,
};
use crate::result::{
    SeedAccountResult, SeedCardResult, SeedOperationResult, SeedUserResult, SeedsResult,
};

/// The gateway call a build was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    /// Creating a user.
    CreateUser,
    /// Opening an account of the given kind.
    OpenAccount(AccountKind),
    /// Issuing a card of the given kind.
    IssueCard(CardKind),
    /// Creating an operation of the given kind.
    MakeOperation(OperationKind),
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateUser => f.write_str("create user"),
            Self::OpenAccount(kind) => write!(f, "open {kind} account"),
            Self::IssueCard(kind) => write!(f, "issue {kind} card"),
            Self::MakeOperation(kind) => write!(f, "make {kind} operation"),
        }
    }
}

/// Errors that abort a seeding run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedBuildError {
    /// A gateway call failed.
    #[error("failed to {step}: {source}")]
    Gateway {
        /// The call that failed.
        step: SeedStep,
        /// Error reported by the gateway adapter.
        source: GatewayError,
    },

    /// A card-bearing account was opened without a default card.
    #[error("{kind} account '{account_id}' was opened without a default card")]
    MissingDefaultCard {
        /// Kind of the opened account.
        kind: AccountKind,
        /// Identifier of the opened account.
        account_id: AccountId,
    },

    /// The assembled result broke a structural invariant.
    #[error("seed result is invalid: {0}")]
    InvalidResult(#[from] ResultValidationError),
}

const fn gateway_failure(step: SeedStep) -> impl FnOnce(GatewayError) -> SeedBuildError {
    move |source| SeedBuildError::Gateway { step, source }
}

/// Builds seed data by calling gateway ports according to a plan.
#[derive(Clone)]
pub struct SeedsBuilder {
    gateways: SeedGateways,
    concurrency: NonZeroUsize,
}

impl SeedsBuilder {
    /// Creates a builder that seeds one user at a time.
    #[must_use]
    pub const fn new(gateways: SeedGateways) -> Self {
        Self {
            gateways,
            concurrency: NonZeroUsize::MIN,
        }
    }

    /// Sets how many user subtrees may be built at once.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Returns the configured user-build concurrency.
    #[must_use]
    pub const fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    /// Builds every user in `plan` and returns the assembled result.
    ///
    /// Users appear in the result in the order their builds were started,
    /// regardless of completion order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SeedBuildError`] raised by any user subtree, or
    /// [`SeedBuildError::InvalidResult`] when the gateway returned duplicate
    /// identifiers.
    pub async fn build(&self, plan: &SeedsPlan) -> Result<SeedsResult, SeedBuildError> {
        let expected = plan.expected_calls();
        info!(
            user_count = plan.users.count,
            expected_calls = expected.total(),
            concurrency = self.concurrency.get(),
            "building seed data"
        );

        let mut built = stream::iter(0..plan.users.count)
            .map(move |index| async move {
                self.build_user(&plan.users)
                    .await
                    .map(|user| (index, user))
            })
            .buffer_unordered(self.concurrency.get())
            .try_collect::<Vec<_>>()
            .await
            .inspect_err(|err| warn!(error = %err, "seed build aborted"))?;
        built.sort_unstable_by_key(|(index, _)| *index);

        let result = SeedsResult::new(built.into_iter().map(|(_, user)| user).collect());
        result
            .validate()
            .inspect_err(|err| warn!(error = %err, "seed result failed validation"))?;

        let counts = result.counts();
        info!(
            users = counts.users,
            accounts = counts.accounts,
            cards = counts.cards,
            operations = counts.operations,
            "seed data built"
        );
        Ok(result)
    }

    /// Creates one user and opens their accounts.
    ///
    /// Accounts are opened savings first, then deposit, debit-card and
    /// credit-card.
    ///
    /// # Errors
    ///
    /// Returns the first [`SeedBuildError`] raised within the subtree.
    pub async fn build_user(&self, plan: &SeedUsersPlan) -> Result<SeedUserResult, SeedBuildError> {
        let user_id = self
            .gateways
            .users
            .create_user()
            .await
            .map_err(gateway_failure(SeedStep::CreateUser))?;
        debug!(user_id = %user_id, "created user");

        let mut user = SeedUserResult::new(user_id);
        for _ in 0..plan.savings_accounts.count {
            let account = self.build_savings_account_result(&user.user_id).await?;
            user.savings_accounts.push(account);
        }
        for _ in 0..plan.deposit_accounts.count {
            let account = self.build_deposit_account_result(&user.user_id).await?;
            user.deposit_accounts.push(account);
        }
        for _ in 0..plan.debit_card_accounts.count {
            let account = self
                .build_debit_card_account_result(&plan.debit_card_accounts, &user.user_id)
                .await?;
            user.debit_card_accounts.push(account);
        }
        for _ in 0..plan.credit_card_accounts.count {
            let account = self
                .build_credit_card_account_result(&plan.credit_card_accounts, &user.user_id)
                .await?;
            user.credit_card_accounts.push(account);
        }
        Ok(user)
    }

    /// Opens one savings account.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::Gateway`] when the account cannot be opened.
    pub async fn build_savings_account_result(
        &self,
        user_id: &UserId,
    ) -> Result<SeedAccountResult, SeedBuildError> {
        let opened = self.open_account(AccountKind::Savings, user_id).await?;
        Ok(SeedAccountResult::new(opened.account_id))
    }

    /// Opens one deposit account.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::Gateway`] when the account cannot be opened.
    pub async fn build_deposit_account_result(
        &self,
        user_id: &UserId,
    ) -> Result<SeedAccountResult, SeedBuildError> {
        let opened = self.open_account(AccountKind::Deposit, user_id).await?;
        Ok(SeedAccountResult::new(opened.account_id))
    }

    /// Opens one debit-card account and populates its cards and operations.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::MissingDefaultCard`] when the gateway opens
    /// the account without a card, or [`SeedBuildError::Gateway`] for the
    /// first failing call.
    pub async fn build_debit_card_account_result(
        &self,
        plan: &SeedAccountsPlan,
        user_id: &UserId,
    ) -> Result<SeedAccountResult, SeedBuildError> {
        self.build_card_account(AccountKind::DebitCard, plan, user_id)
            .await
    }

    /// Opens one credit-card account and populates its cards and operations.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::MissingDefaultCard`] when the gateway opens
    /// the account without a card, or [`SeedBuildError::Gateway`] for the
    /// first failing call.
    pub async fn build_credit_card_account_result(
        &self,
        plan: &SeedAccountsPlan,
        user_id: &UserId,
    ) -> Result<SeedAccountResult, SeedBuildError> {
        self.build_card_account(AccountKind::CreditCard, plan, user_id)
            .await
    }

    /// Issues one physical card.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::Gateway`] when issuance fails.
    pub async fn build_physical_card_result(
        &self,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<SeedCardResult, SeedBuildError> {
        self.issue_card(CardKind::Physical, user_id, account_id)
            .await
    }

    /// Issues one virtual card.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::Gateway`] when issuance fails.
    pub async fn build_virtual_card_result(
        &self,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<SeedCardResult, SeedBuildError> {
        self.issue_card(CardKind::Virtual, user_id, account_id)
            .await
    }

    /// Creates one operation of `kind` with the given card and account.
    ///
    /// # Errors
    ///
    /// Returns [`SeedBuildError::Gateway`] when the operation is rejected.
    pub async fn build_operation_result(
        &self,
        kind: OperationKind,
        card_id: &CardId,
        account_id: &AccountId,
    ) -> Result<SeedOperationResult, SeedBuildError> {
        let request = MakeOperationRequest::new(kind, card_id.clone(), account_id.clone());
        let operation_id = self
            .gateways
            .operations
            .make_operation(&request)
            .await
            .map_err(gateway_failure(SeedStep::MakeOperation(kind)))?;
        debug!(
            operation_id = %operation_id,
            account_id = %account_id,
            kind = %kind,
            "created operation"
        );
        Ok(SeedOperationResult { operation_id })
    }

    async fn open_account(
        &self,
        kind: AccountKind,
        user_id: &UserId,
    ) -> Result<OpenedAccount, SeedBuildError> {
        let opened = self
            .gateways
            .accounts
            .open_account(kind, user_id)
            .await
            .map_err(gateway_failure(SeedStep::OpenAccount(kind)))?;
        debug!(
            account_id = %opened.account_id,
            user_id = %user_id,
            kind = %kind,
            "opened account"
        );
        Ok(opened)
    }

    async fn issue_card(
        &self,
        kind: CardKind,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<SeedCardResult, SeedBuildError> {
        let card_id = self
            .gateways
            .cards
            .issue_card(kind, user_id, account_id)
            .await
            .map_err(gateway_failure(SeedStep::IssueCard(kind)))?;
        debug!(card_id = %card_id, account_id = %account_id, kind = %kind, "issued card");
        Ok(SeedCardResult { card_id })
    }

    async fn build_card_account(
        &self,
        kind: AccountKind,
        plan: &SeedAccountsPlan,
        user_id: &UserId,
    ) -> Result<SeedAccountResult, SeedBuildError> {
        let OpenedAccount {
            account_id,
            default_card_id,
        } = self.open_account(kind, user_id).await?;
        let Some(card_id) = default_card_id else {
            return Err(SeedBuildError::MissingDefaultCard { kind, account_id });
        };

        let mut account = SeedAccountResult::new(account_id);
        for _ in 0..plan.physical_cards.count {
            let card = self
                .build_physical_card_result(user_id, &account.account_id)
                .await?;
            account.physical_cards.push(card);
        }
        for _ in 0..plan.virtual_cards.count {
            let card = self
                .build_virtual_card_result(user_id, &account.account_id)
                .await?;
            account.virtual_cards.push(card);
        }

        account.top_up_operations = self
            .build_operations(
                OperationKind::TopUp,
                plan.top_up_operations.count,
                &card_id,
                &account.account_id,
            )
            .await?;
        account.purchase_operations = self
            .build_operations(
                OperationKind::Purchase,
                plan.purchase_operations.count,
                &card_id,
                &account.account_id,
            )
            .await?;
        account.transfer_operations = self
            .build_operations(
                OperationKind::Transfer,
                plan.transfer_operations.count,
                &card_id,
                &account.account_id,
            )
            .await?;
        account.cash_withdrawal_operations = self
            .build_operations(
                OperationKind::CashWithdrawal,
                plan.cash_withdrawal_operations.count,
                &card_id,
                &account.account_id,
            )
            .await?;
        Ok(account)
    }

    async fn build_operations(
        &self,
        kind: OperationKind,
        count: usize,
        card_id: &CardId,
        account_id: &AccountId,
    ) -> Result<Vec<SeedOperationResult>, SeedBuildError> {
        let mut operations = Vec::with_capacity(count);
        for _ in 0..count {
            operations.push(self.build_operation_result(kind, card_id, account_id).await?);
        }
        Ok(operations)
    }
}
