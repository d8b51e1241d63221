//! Port for creating account operations.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::ids::{AccountId, CardId, OperationId};

/// Operation types the gateway can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Money added to the account.
    TopUp,
    /// Card purchase.
    Purchase,
    /// Transfer to another account.
    Transfer,
    /// Cash taken out at an ATM.
    CashWithdrawal,
    /// Service fee.
    Fee,
    /// Bill payment.
    BillPayment,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TopUp => "top-up",
            Self::Purchase => "purchase",
            Self::Transfer => "transfer",
            Self::CashWithdrawal => "cash withdrawal",
            Self::Fee => "fee",
            Self::BillPayment => "bill payment",
        };
        f.write_str(label)
    }
}

/// Request payload for creating an operation.
///
/// `amount` is expressed in whole currency units; adapters choose a value
/// when it is omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeOperationRequest {
    /// Operation type.
    pub kind: OperationKind,
    /// Card the operation is made with.
    pub card_id: CardId,
    /// Account the operation is booked against.
    pub account_id: AccountId,
    /// Optional amount override.
    pub amount: Option<u32>,
}

impl MakeOperationRequest {
    /// Creates a request with an adapter-chosen amount.
    #[must_use]
    pub const fn new(kind: OperationKind, card_id: CardId, account_id: AccountId) -> Self {
        Self {
            kind,
            card_id,
            account_id,
            amount: None,
        }
    }
}

/// Creates operations on existing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperationsGateway: Send + Sync {
    /// Create one operation and return its identifier.
    async fn make_operation(
        &self,
        request: &MakeOperationRequest,
    ) -> Result<OperationId, GatewayError>;
}
