//! Declarative seeding plans.
//!
//! A plan describes how many users, accounts, cards and operations to
//! synthesise. The tree shape is fixed (users, four account types, six leaf
//! counts per account type); only the counts vary. Every count defaults to
//! zero so a plan only needs to mention the subtrees it wants populated.

use serde::{Deserialize, Serialize};

/// Number of cards of one kind to issue per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedCardsPlan {
    /// How many cards to issue.
    pub count: usize,
}

impl SeedCardsPlan {
    /// Creates a card plan with the given count.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}

/// Number of operations of one kind to create per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedOperationsPlan {
    /// How many operations to create.
    pub count: usize,
}

impl SeedOperationsPlan {
    /// Creates an operation plan with the given count.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}

/// Plan for one account type, including its cards and operations.
///
/// Card and operation counts only apply to card-bearing account types
/// (debit-card and credit-card accounts); savings and deposit accounts are
/// opened without sub-entities.
///
/// # Example
///
/// ```
/// use seed_data::{SeedAccountsPlan, SeedCardsPlan, SeedOperationsPlan};
///
/// let plan = SeedAccountsPlan {
///     count: 1,
///     virtual_cards: SeedCardsPlan::new(2),
///     purchase_operations: SeedOperationsPlan::new(5),
///     ..SeedAccountsPlan::default()
/// };
///
/// assert_eq!(plan.cards_per_account(), 2);
/// assert_eq!(plan.operations_per_account(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedAccountsPlan {
    /// How many accounts of this type to open per user.
    pub count: usize,
    /// Physical cards issued per account.
    pub physical_cards: SeedCardsPlan,
    /// Virtual cards issued per account.
    pub virtual_cards: SeedCardsPlan,
    /// Top-up operations created per account.
    pub top_up_operations: SeedOperationsPlan,
    /// Purchase operations created per account.
    pub purchase_operations: SeedOperationsPlan,
    /// Transfer operations created per account.
    pub transfer_operations: SeedOperationsPlan,
    /// Cash withdrawal operations created per account.
    pub cash_withdrawal_operations: SeedOperationsPlan,
}

impl SeedAccountsPlan {
    /// Creates an account plan that opens `count` accounts with no
    /// sub-entities.
    #[must_use]
    pub const fn with_count(count: usize) -> Self {
        Self {
            count,
            physical_cards: SeedCardsPlan::new(0),
            virtual_cards: SeedCardsPlan::new(0),
            top_up_operations: SeedOperationsPlan::new(0),
            purchase_operations: SeedOperationsPlan::new(0),
            transfer_operations: SeedOperationsPlan::new(0),
            cash_withdrawal_operations: SeedOperationsPlan::new(0),
        }
    }

    /// Returns the number of cards issued for each account of this type.
    #[must_use]
    pub const fn cards_per_account(&self) -> usize {
        self.physical_cards
            .count
            .saturating_add(self.virtual_cards.count)
    }

    /// Returns the number of operations created for each account of this
    /// type.
    #[must_use]
    pub const fn operations_per_account(&self) -> usize {
        self.top_up_operations
            .count
            .saturating_add(self.purchase_operations.count)
            .saturating_add(self.transfer_operations.count)
            .saturating_add(self.cash_withdrawal_operations.count)
    }
}

/// Plan for users and the accounts opened for each of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedUsersPlan {
    /// How many users to create.
    pub count: usize,
    /// Deposit accounts per user.
    pub deposit_accounts: SeedAccountsPlan,
    /// Savings accounts per user.
    pub savings_accounts: SeedAccountsPlan,
    /// Debit-card accounts per user.
    pub debit_card_accounts: SeedAccountsPlan,
    /// Credit-card accounts per user.
    pub credit_card_accounts: SeedAccountsPlan,
}

impl SeedUsersPlan {
    /// Returns the number of accounts opened for each user.
    #[must_use]
    pub const fn accounts_per_user(&self) -> usize {
        self.deposit_accounts
            .count
            .saturating_add(self.savings_accounts.count)
            .saturating_add(self.debit_card_accounts.count)
            .saturating_add(self.credit_card_accounts.count)
    }

    const fn cards_per_user(&self) -> usize {
        let debit = self
            .debit_card_accounts
            .count
            .saturating_mul(self.debit_card_accounts.cards_per_account());
        let credit = self
            .credit_card_accounts
            .count
            .saturating_mul(self.credit_card_accounts.cards_per_account());
        debit.saturating_add(credit)
    }

    const fn operations_per_user(&self) -> usize {
        let debit = self
            .debit_card_accounts
            .count
            .saturating_mul(self.debit_card_accounts.operations_per_account());
        let credit = self
            .credit_card_accounts
            .count
            .saturating_mul(self.credit_card_accounts.operations_per_account());
        debit.saturating_add(credit)
    }
}

/// Root of a seeding plan.
///
/// # Example
///
/// ```
/// use seed_data::{SeedAccountsPlan, SeedsPlan};
///
/// let plan = SeedsPlan::from_json(r#"{"users": {"count": 3, "debit_card_accounts": {"count": 1}}}"#)
///     .expect("valid plan");
///
/// assert_eq!(plan.users.count, 3);
/// assert_eq!(plan.users.debit_card_accounts, SeedAccountsPlan::with_count(1));
/// assert_eq!(plan.expected_calls().account_openings, 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedsPlan {
    /// User plan.
    pub users: SeedUsersPlan,
}

impl SeedsPlan {
    /// Creates a plan rooted at the given user plan.
    #[must_use]
    pub const fn new(users: SeedUsersPlan) -> Self {
        Self { users }
    }

    /// Parses a plan from JSON. Omitted fields default to zero.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the JSON is malformed or contains
    /// unknown fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Predicts how many remote calls of each kind a build of this plan
    /// issues.
    #[must_use]
    pub const fn expected_calls(&self) -> PlannedCalls {
        let users = self.users.count;
        PlannedCalls {
            user_creations: users,
            account_openings: users.saturating_mul(self.users.accounts_per_user()),
            card_issuances: users.saturating_mul(self.users.cards_per_user()),
            operation_creations: users.saturating_mul(self.users.operations_per_user()),
        }
    }
}

/// Remote call counts implied by a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannedCalls {
    /// User-creation calls.
    pub user_creations: usize,
    /// Account-opening calls.
    pub account_openings: usize,
    /// Card-issuance calls (excluding default cards created with accounts).
    pub card_issuances: usize,
    /// Operation-creation calls.
    pub operation_creations: usize,
}

impl PlannedCalls {
    /// Returns the total number of remote calls.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.user_creations
            .saturating_add(self.account_openings)
            .saturating_add(self.card_issuances)
            .saturating_add(self.operation_creations)
    }
}
