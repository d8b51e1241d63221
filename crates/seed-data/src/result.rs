//! Seeding result types.
//!
//! The result tree mirrors the plan tree exactly: one [`SeedUserResult`] per
//! planned user, one [`SeedAccountResult`] per planned account and one
//! identifier record per card or operation. These types are what dumps
//! persist and what load scenarios sample from, so their field names are the
//! on-disk schema.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ResultValidationError;
use crate::ids::{AccountId, CardId, OperationId, UserId};
use crate::sampling::{SeedUserQueue, SeedsSnapshot};

/// An issued card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCardResult {
    /// Identifier of the issued card.
    pub card_id: CardId,
}

/// A created operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedOperationResult {
    /// Identifier of the created operation.
    pub operation_id: OperationId,
}

/// An opened account together with its cards and operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAccountResult {
    /// Identifier of the opened account.
    pub account_id: AccountId,
    /// Issued physical cards.
    #[serde(default)]
    pub physical_cards: Vec<SeedCardResult>,
    /// Issued virtual cards.
    #[serde(default)]
    pub virtual_cards: Vec<SeedCardResult>,
    /// Created top-up operations.
    #[serde(default)]
    pub top_up_operations: Vec<SeedOperationResult>,
    /// Created purchase operations.
    #[serde(default)]
    pub purchase_operations: Vec<SeedOperationResult>,
    /// Created transfer operations.
    #[serde(default)]
    pub transfer_operations: Vec<SeedOperationResult>,
    /// Created cash withdrawal operations.
    #[serde(default)]
    pub cash_withdrawal_operations: Vec<SeedOperationResult>,
}

impl SeedAccountResult {
    /// Creates an account result with no cards or operations.
    #[must_use]
    pub const fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            physical_cards: Vec::new(),
            virtual_cards: Vec::new(),
            top_up_operations: Vec::new(),
            purchase_operations: Vec::new(),
            transfer_operations: Vec::new(),
            cash_withdrawal_operations: Vec::new(),
        }
    }

    /// Iterates over every issued card, physical first.
    pub fn cards(&self) -> impl Iterator<Item = &SeedCardResult> {
        self.physical_cards.iter().chain(&self.virtual_cards)
    }

    /// Iterates over every created operation in plan order.
    pub fn operations(&self) -> impl Iterator<Item = &SeedOperationResult> {
        self.top_up_operations
            .iter()
            .chain(&self.purchase_operations)
            .chain(&self.transfer_operations)
            .chain(&self.cash_withdrawal_operations)
    }

    fn validate(&self) -> Result<(), ResultValidationError> {
        let parent = format!("account '{}'", self.account_id);
        ensure_unique("card", &parent, self.cards().map(|card| card.card_id.as_str()))?;
        ensure_unique(
            "operation",
            &parent,
            self.operations().map(|operation| operation.operation_id.as_str()),
        )
    }
}

/// A created user together with the accounts opened for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUserResult {
    /// Identifier of the created user.
    pub user_id: UserId,
    /// Opened deposit accounts.
    #[serde(default)]
    pub deposit_accounts: Vec<SeedAccountResult>,
    /// Opened savings accounts.
    #[serde(default)]
    pub savings_accounts: Vec<SeedAccountResult>,
    /// Opened debit-card accounts.
    #[serde(default)]
    pub debit_card_accounts: Vec<SeedAccountResult>,
    /// Opened credit-card accounts.
    #[serde(default)]
    pub credit_card_accounts: Vec<SeedAccountResult>,
}

impl SeedUserResult {
    /// Creates a user result with no accounts.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            deposit_accounts: Vec::new(),
            savings_accounts: Vec::new(),
            debit_card_accounts: Vec::new(),
            credit_card_accounts: Vec::new(),
        }
    }

    /// Iterates over every account of every type.
    pub fn accounts(&self) -> impl Iterator<Item = &SeedAccountResult> {
        self.deposit_accounts
            .iter()
            .chain(&self.savings_accounts)
            .chain(&self.debit_card_accounts)
            .chain(&self.credit_card_accounts)
    }

    fn validate(&self) -> Result<(), ResultValidationError> {
        let parent = format!("user '{}'", self.user_id);
        ensure_unique(
            "account",
            &parent,
            self.accounts().map(|account| account.account_id.as_str()),
        )?;
        self.accounts().try_for_each(SeedAccountResult::validate)
    }
}

/// Result of a complete seeding run.
///
/// # Example
///
/// ```
/// use seed_data::{SeedUserResult, SeedsResult, UserId};
///
/// let result = SeedsResult::new(vec![
///     SeedUserResult::new(UserId::new("user-1").expect("valid id")),
/// ]);
///
/// assert!(result.validate().is_ok());
/// assert_eq!(result.counts().users, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedsResult {
    /// Seeded users in creation order.
    #[serde(default)]
    pub users: Vec<SeedUserResult>,
}

impl SeedsResult {
    /// Creates a result from seeded users.
    #[must_use]
    pub const fn new(users: Vec<SeedUserResult>) -> Self {
        Self { users }
    }

    /// Checks that no identifier repeats among its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`ResultValidationError::DuplicateIdentifier`] for the first
    /// repeated identifier found.
    pub fn validate(&self) -> Result<(), ResultValidationError> {
        ensure_unique(
            "user",
            "result",
            self.users.iter().map(|user| user.user_id.as_str()),
        )?;
        self.users.iter().try_for_each(SeedUserResult::validate)
    }

    /// Counts the entities held in the tree.
    #[must_use]
    pub fn counts(&self) -> SeedCounts {
        self.users
            .iter()
            .flat_map(SeedUserResult::accounts)
            .fold(
                SeedCounts {
                    users: self.users.len(),
                    ..SeedCounts::default()
                },
                |counts, account| SeedCounts {
                    accounts: counts.accounts.saturating_add(1),
                    cards: counts.cards.saturating_add(account.cards().count()),
                    operations: counts
                        .operations
                        .saturating_add(account.operations().count()),
                    ..counts
                },
            )
    }

    /// Converts the result into an immutable snapshot for random sampling.
    #[must_use]
    pub fn into_snapshot(self) -> SeedsSnapshot {
        SeedsSnapshot::new(self)
    }

    /// Converts the result into a single-owner queue for draining.
    #[must_use]
    pub fn into_queue(self) -> SeedUserQueue {
        SeedUserQueue::new(self)
    }
}

/// Entity totals in a result tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    /// Seeded users.
    pub users: usize,
    /// Opened accounts of every type.
    pub accounts: usize,
    /// Issued cards, excluding default cards created with accounts.
    pub cards: usize,
    /// Created operations.
    pub operations: usize,
}

fn ensure_unique<'a>(
    kind: &'static str,
    parent: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ResultValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ResultValidationError::DuplicateIdentifier {
                kind,
                id: id.to_owned(),
                parent: parent.to_owned(),
            });
        }
    }
    Ok(())
}
