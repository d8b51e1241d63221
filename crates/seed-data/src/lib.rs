//! Plan-driven seed data synthesis for banking gateway load tests.
//!
//! Load scenarios need pre-existing users, accounts, cards and operations on
//! the gateway under test. This crate turns a declarative [`SeedsPlan`] into
//! those entities by calling gateway ports, records every returned
//! identifier in a [`SeedsResult`] of the same shape, and persists it per
//! scenario so load runs can sample from it later.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Declarative plans with every count defaulting to zero
//! - Building plans through async gateway ports with bounded per-user
//!   concurrency and all-or-nothing results
//! - Atomic JSON dumps per scenario, with missing, corrupt and mis-shaped
//!   dumps reported separately
//! - Built-in scenarios and a versioned JSON scenario catalogue
//! - Random sampling from shared snapshots and draining from owned queues
//!
//! Network adapters live outside this crate; [`InMemoryGateway`] implements
//! every port for dry runs and tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use seed_data::{
//!     InMemoryGateway, SeedAccountsPlan, SeedCardsPlan, SeedGateways, SeedUsersPlan,
//!     SeedsBuilder, SeedsPlan,
//! };
//!
//! let plan = SeedsPlan::new(SeedUsersPlan {
//!     count: 2,
//!     debit_card_accounts: SeedAccountsPlan {
//!         count: 1,
//!         virtual_cards: SeedCardsPlan::new(1),
//!         ..SeedAccountsPlan::default()
//!     },
//!     ..SeedUsersPlan::default()
//! });
//!
//! let gateway = Arc::new(InMemoryGateway::new());
//! let builder = SeedsBuilder::new(SeedGateways::from_shared(&gateway));
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .expect("runtime");
//! let result = runtime.block_on(builder.build(&plan)).expect("seeding succeeds");
//!
//! assert_eq!(result.counts().users, 2);
//! assert_eq!(result.counts().cards, 2);
//! ```

mod atomic_io;
mod builder;
mod catalogue;
mod dumps;
mod error;
mod ids;
mod in_memory_gateway;
mod plan;
mod ports;
mod result;
mod sampling;
mod scenario;
mod validation;

pub use builder::{SeedBuildError, SeedStep, SeedsBuilder};
pub use catalogue::{CatalogueScenario, ScenarioCatalogue};
pub use dumps::{DUMP_FILE_SUFFIX, SeedDumps};
pub use error::{CatalogueError, DumpError, IdentifierError, ResultValidationError, SamplingError};
pub use ids::{AccountId, CardId, OperationId, UserId};
pub use in_memory_gateway::{CallKind, GatewayCall, InMemoryGateway};
pub use plan::{
    PlannedCalls, SeedAccountsPlan, SeedCardsPlan, SeedOperationsPlan, SeedUsersPlan, SeedsPlan,
};
pub use ports::{
    AccountKind, AccountsGateway, CardKind, CardsGateway, GatewayError, MakeOperationRequest,
    OpenedAccount, OperationKind, OperationsGateway, SeedGateways, UsersGateway,
};
pub use result::{
    SeedAccountResult, SeedCardResult, SeedCounts, SeedOperationResult, SeedUserResult,
    SeedsResult,
};
pub use sampling::{SeedUserQueue, SeedsSnapshot};
pub use scenario::{
    ExistingUserGetOperations, ExistingUserIssueVirtualCard, PRESET_USER_COUNT, ScenarioError,
    ScenarioSeeder, SeedsScenario, builtin_scenarios, find_builtin_scenario,
};
pub use validation::{SCENARIO_NAME_MAX, is_valid_scenario_name};
