//! Port for creating users.

use async_trait::async_trait;

use super::GatewayError;
use crate::ids::UserId;

/// Creates users on the remote gateway.
///
/// Adapters synthesise whatever profile data the gateway requires; the
/// builder only needs the resulting identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersGateway: Send + Sync {
    /// Create one user and return its identifier.
    async fn create_user(&self) -> Result<UserId, GatewayError>;
}
