//! Gateway ports consumed by the seed builder.
//!
//! The remote gateway exposes four independent capability groups: user
//! creation, account opening, card issuance and operation creation. The
//! builder only depends on these traits; transport adapters (HTTP, gRPC, the
//! in-memory gateway) live behind them.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_gateway;
mod cards_gateway;
mod operations_gateway;
mod users_gateway;

use std::sync::Arc;

#[cfg(test)]
pub use accounts_gateway::MockAccountsGateway;
pub use accounts_gateway::{AccountKind, AccountsGateway, OpenedAccount};
#[cfg(test)]
pub use cards_gateway::MockCardsGateway;
pub use cards_gateway::{CardKind, CardsGateway};
#[cfg(test)]
pub use operations_gateway::MockOperationsGateway;
pub use operations_gateway::{MakeOperationRequest, OperationKind, OperationsGateway};
#[cfg(test)]
pub use users_gateway::MockUsersGateway;
pub use users_gateway::UsersGateway;

define_port_error! {
    /// Failures reported by gateway adapters.
    pub enum GatewayError {
        /// The request could not be delivered or the connection failed.
        Transport {
            /// Transport error description.
            message: String,
        } => "gateway transport failed: {message}",
        /// The request exceeded the adapter's timeout.
        Timeout {
            /// Timeout description.
            message: String,
        } => "gateway request timed out: {message}",
        /// The gateway answered with a non-success status.
        Status {
            /// HTTP-style status code.
            status: u16,
            /// Status description or body preview.
            message: String,
        } => "gateway rejected the request with status {status}: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Decoder error description.
            message: String,
        } => "gateway response could not be decoded: {message}",
        /// The response decoded but lacks required data.
        InvalidResponse {
            /// Description of the missing or invalid data.
            message: String,
        } => "gateway response is invalid: {message}",
    }
}

/// The four capability groups the builder calls into.
///
/// Each group is shared behind an [`Arc`] so builders for independent users
/// can run concurrently against the same adapters.
#[derive(Clone)]
pub struct SeedGateways {
    /// User creation.
    pub users: Arc<dyn UsersGateway>,
    /// Account opening.
    pub accounts: Arc<dyn AccountsGateway>,
    /// Card issuance.
    pub cards: Arc<dyn CardsGateway>,
    /// Operation creation.
    pub operations: Arc<dyn OperationsGateway>,
}

impl SeedGateways {
    /// Bundles four independent capability adapters.
    #[must_use]
    pub fn new(
        users: Arc<dyn UsersGateway>,
        accounts: Arc<dyn AccountsGateway>,
        cards: Arc<dyn CardsGateway>,
        operations: Arc<dyn OperationsGateway>,
    ) -> Self {
        Self {
            users,
            accounts,
            cards,
            operations,
        }
    }

    /// Uses one adapter that implements every capability group.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use seed_data::{InMemoryGateway, SeedGateways};
    ///
    /// let gateway = Arc::new(InMemoryGateway::new());
    /// let gateways = SeedGateways::from_shared(&gateway);
    /// # let _ = gateways;
    /// ```
    #[must_use]
    pub fn from_shared<G>(gateway: &Arc<G>) -> Self
    where
        G: UsersGateway + AccountsGateway + CardsGateway + OperationsGateway + 'static,
    {
        Self {
            users: Arc::clone(gateway) as Arc<dyn UsersGateway>,
            accounts: Arc::clone(gateway) as Arc<dyn AccountsGateway>,
            cards: Arc::clone(gateway) as Arc<dyn CardsGateway>,
            operations: Arc::clone(gateway) as Arc<dyn OperationsGateway>,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_constructors_format_messages() {
        assert_eq!(
            GatewayError::status(503_u16, "unavailable").to_string(),
            "gateway rejected the request with status 503: unavailable"
        );
        assert_eq!(
            GatewayError::timeout("30s elapsed").to_string(),
            "gateway request timed out: 30s elapsed"
        );
        assert_eq!(
            GatewayError::invalid_response("account has no cards"),
            GatewayError::InvalidResponse {
                message: "account has no cards".to_owned(),
            }
        );
    }
}
