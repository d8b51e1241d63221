//! Port for opening accounts.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::ids::{AccountId, CardId, UserId};

/// Account products the gateway can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Deposit account without cards.
    Deposit,
    /// Savings account without cards.
    Savings,
    /// Debit-card account, opened with a default card.
    DebitCard,
    /// Credit-card account, opened with a default card.
    CreditCard,
}

impl AccountKind {
    /// Every account kind in the order the builder opens them.
    pub const ALL: [Self; 4] = [
        Self::Savings,
        Self::Deposit,
        Self::DebitCard,
        Self::CreditCard,
    ];

    /// Returns `true` when opening this account also creates a default card.
    #[must_use]
    pub const fn is_card_bearing(self) -> bool {
        matches!(self, Self::DebitCard | Self::CreditCard)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deposit => "deposit",
            Self::Savings => "savings",
            Self::DebitCard => "debit card",
            Self::CreditCard => "credit card",
        };
        f.write_str(label)
    }
}

/// Account returned by the gateway after opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedAccount {
    /// Identifier of the new account.
    pub account_id: AccountId,
    /// First card attached to the account, present for card-bearing kinds.
    pub default_card_id: Option<CardId>,
}

/// Opens accounts for existing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsGateway: Send + Sync {
    /// Open one account of `kind` for `user_id`.
    async fn open_account(
        &self,
        kind: AccountKind,
        user_id: &UserId,
    ) -> Result<OpenedAccount, GatewayError>;
}
