//! Built-in load-test scenarios.

use crate::plan::{SeedAccountsPlan, SeedOperationsPlan, SeedUsersPlan, SeedsPlan};
use crate::scenario::SeedsScenario;

/// Users seeded by each built-in scenario.
pub const PRESET_USER_COUNT: usize = 300;

/// Existing users listing the operations of their credit-card account.
///
/// Each user owns one credit-card account with five purchases, one top-up
/// and one cash withdrawal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistingUserGetOperations;

impl SeedsScenario for ExistingUserGetOperations {
    fn scenario(&self) -> &str {
        "existing_user_get_operations"
    }

    fn plan(&self) -> SeedsPlan {
        SeedsPlan::new(SeedUsersPlan {
            count: PRESET_USER_COUNT,
            credit_card_accounts: SeedAccountsPlan {
                count: 1,
                top_up_operations: SeedOperationsPlan::new(1),
                purchase_operations: SeedOperationsPlan::new(5),
                cash_withdrawal_operations: SeedOperationsPlan::new(1),
                ..SeedAccountsPlan::default()
            },
            ..SeedUsersPlan::default()
        })
    }
}

/// Existing users issuing a virtual card against their debit-card account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistingUserIssueVirtualCard;

impl SeedsScenario for ExistingUserIssueVirtualCard {
    fn scenario(&self) -> &str {
        "existing_user_issue_virtual_card"
    }

    fn plan(&self) -> SeedsPlan {
        SeedsPlan::new(SeedUsersPlan {
            count: PRESET_USER_COUNT,
            debit_card_accounts: SeedAccountsPlan::with_count(1),
            ..SeedUsersPlan::default()
        })
    }
}

static BUILTIN_SCENARIOS: [&dyn SeedsScenario; 2] =
    [&ExistingUserGetOperations, &ExistingUserIssueVirtualCard];

/// Returns every built-in scenario.
#[must_use]
pub fn builtin_scenarios() -> &'static [&'static dyn SeedsScenario] {
    &BUILTIN_SCENARIOS
}

/// Finds a built-in scenario by name.
///
/// # Example
///
/// ```
/// use seed_data::find_builtin_scenario;
///
/// let scenario = find_builtin_scenario("existing_user_issue_virtual_card").expect("preset");
/// assert_eq!(scenario.plan().users.debit_card_accounts.count, 1);
/// assert!(find_builtin_scenario("unknown").is_none());
/// ```
#[must_use]
pub fn find_builtin_scenario(name: &str) -> Option<&'static dyn SeedsScenario> {
    builtin_scenarios()
        .iter()
        .copied()
        .find(|scenario| scenario.scenario() == name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::validation::is_valid_scenario_name;

    #[test]
    fn get_operations_plan_matches_load_profile() {
        let calls = ExistingUserGetOperations.plan().expected_calls();

        assert_eq!(calls.user_creations, 300);
        assert_eq!(calls.account_openings, 300);
        assert_eq!(calls.card_issuances, 0);
        assert_eq!(calls.operation_creations, 2100);
    }

    #[test]
    fn issue_virtual_card_plan_opens_one_debit_account_per_user() {
        let plan = ExistingUserIssueVirtualCard.plan();

        assert_eq!(plan.users.count, 300);
        assert_eq!(plan.users.accounts_per_user(), 1);
        assert_eq!(plan.expected_calls().total(), 600);
    }

    #[rstest]
    fn builtin_names_are_unique_and_dump_safe() {
        let names: Vec<&str> = builtin_scenarios()
            .iter()
            .map(|scenario| scenario.scenario())
            .collect();

        assert!(names.iter().all(|name| is_valid_scenario_name(name)));
        assert_eq!(
            names,
            vec![
                "existing_user_get_operations",
                "existing_user_issue_virtual_card"
            ]
        );
    }
}
