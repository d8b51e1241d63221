//! Read access to seeded users for load scenarios.
//!
//! Two ownership disciplines are offered and never mixed on one value:
//!
//! - [`SeedsSnapshot`] is immutable and cheap to clone. Any number of
//!   virtual users may sample from it concurrently; sampling never mutates.
//! - [`SeedUserQueue`] hands each user out exactly once. Draining needs
//!   `&mut self`, so sharing a queue across tasks requires the caller to pick
//!   an explicit synchronisation strategy.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::SamplingError;
use crate::result::{SeedUserResult, SeedsResult};

/// Shared, read-only view of seeded users.
///
/// # Example
///
/// ```
/// use seed_data::{SeedUserResult, SeedsResult, UserId};
///
/// let snapshot = SeedsResult::new(vec![
///     SeedUserResult::new(UserId::new("user-1").expect("valid id")),
/// ])
/// .into_snapshot();
///
/// let sampled = snapshot.get_random_user().expect("non-empty");
/// assert_eq!(sampled.user_id.as_str(), "user-1");
/// ```
#[derive(Debug, Clone)]
pub struct SeedsSnapshot {
    users: Arc<[SeedUserResult]>,
}

impl SeedsSnapshot {
    /// Wraps the users of `result`.
    #[must_use]
    pub fn new(result: SeedsResult) -> Self {
        Self {
            users: result.users.into(),
        }
    }

    /// Returns a uniformly chosen user using the thread-local generator.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::Empty`] when the snapshot holds no users.
    pub fn get_random_user(&self) -> Result<&SeedUserResult, SamplingError> {
        self.random_user_with(&mut rand::rng())
    }

    /// Returns a uniformly chosen user using `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::Empty`] when the snapshot holds no users.
    pub fn random_user_with<R>(&self, rng: &mut R) -> Result<&SeedUserResult, SamplingError>
    where
        R: Rng + ?Sized,
    {
        self.users.choose(rng).ok_or(SamplingError::Empty)
    }

    /// Returns every user in creation order.
    #[must_use]
    pub fn users(&self) -> &[SeedUserResult] {
        &self.users
    }

    /// Returns the number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` when the snapshot holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Single-owner queue handing out each seeded user once, front first.
#[derive(Debug, Default)]
pub struct SeedUserQueue {
    users: VecDeque<SeedUserResult>,
}

impl SeedUserQueue {
    /// Queues the users of `result` in creation order.
    #[must_use]
    pub fn new(result: SeedsResult) -> Self {
        Self {
            users: result.users.into(),
        }
    }

    /// Removes and returns the next user.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::Exhausted`] once every user was handed out.
    pub fn get_next_user(&mut self) -> Result<SeedUserResult, SamplingError> {
        self.users.pop_front().ok_or(SamplingError::Exhausted)
    }

    /// Returns how many users remain.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.users.len()
    }
}

impl Iterator for SeedUserQueue {
    type Item = SeedUserResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.users.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.users.len(), Some(self.users.len()))
    }
}

impl ExactSizeIterator for SeedUserQueue {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::ids::UserId;

    #[fixture]
    fn three_users() -> SeedsResult {
        SeedsResult::new(
            ["user-1", "user-2", "user-3"]
                .into_iter()
                .map(|raw| SeedUserResult::new(UserId::new(raw).expect("valid id")))
                .collect(),
        )
    }

    #[rstest]
    fn queue_drains_in_order_then_exhausts(three_users: SeedsResult) {
        let mut queue = three_users.into_queue();

        let drained: Vec<String> = (0..3)
            .map(|_| {
                queue
                    .get_next_user()
                    .map(|user| user.user_id.as_str().to_owned())
                    .expect("user available")
            })
            .collect();

        assert_eq!(drained, vec!["user-1", "user-2", "user-3"]);
        assert_eq!(queue.get_next_user(), Err(SamplingError::Exhausted));
        assert_eq!(queue.remaining(), 0);
    }

    #[rstest]
    fn queue_iterates_each_user_once(three_users: SeedsResult) {
        let queue = three_users.into_queue();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.count(), 3);
    }

    #[rstest]
    fn sampling_never_mutates(three_users: SeedsResult) {
        let snapshot = three_users.into_snapshot();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let seen: HashSet<&str> = (0..200)
            .map(|_| {
                snapshot
                    .random_user_with(&mut rng)
                    .map(|user| user.user_id.as_str())
                    .expect("non-empty snapshot")
            })
            .collect();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = SeedsResult::default().into_snapshot();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.get_random_user(), Err(SamplingError::Empty));
    }

    #[rstest]
    fn clones_share_users(three_users: SeedsResult) {
        let snapshot = three_users.into_snapshot();
        let clone = snapshot.clone();

        assert!(std::ptr::eq(snapshot.users(), clone.users()));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn snapshot_is_shareable_across_tasks(three_users: SeedsResult) {
        let snapshot = three_users.into_snapshot();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = snapshot.clone();
                tokio::spawn(async move {
                    shared
                        .get_random_user()
                        .map(|user| user.user_id.clone())
                })
            })
            .collect();

        for handle in handles {
            let sampled = handle.await.expect("task completes").expect("user sampled");
            assert!(sampled.as_str().starts_with("user-"));
        }
    }
}
