//! Port for issuing cards against an account.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::ids::{AccountId, CardId, UserId};

/// Card products the gateway can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Plastic card delivered to the user.
    Physical,
    /// Card usable online only.
    Virtual,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => f.write_str("physical"),
            Self::Virtual => f.write_str("virtual"),
        }
    }
}

/// Issues cards for an owning user and account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardsGateway: Send + Sync {
    /// Issue one card of `kind` and return its identifier.
    async fn issue_card(
        &self,
        kind: CardKind,
        user_id: &UserId,
        account_id: &AccountId,
    ) -> Result<CardId, GatewayError>;
}
