//! In-memory user store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ids::UserId;
use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::quiz::QuizAttemptSummary;
use crate::domain::user::User;

/// User collection keyed by user id.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    store: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a user, returning the repository for chaining.
    pub fn with_user(self, user: User) -> Self {
        if let Ok(mut guard) = self.store.write() {
            guard.insert(user.id, user);
        }
        self
    }
}

fn poisoned() -> UserStoreError {
    UserStoreError::query("store lock poisoned")
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        let Some(stored) = guard.get_mut(&user.id) else {
            return Err(UserStoreError::Missing { user_id: user.id });
        };
        *stored = user.clone();
        Ok(())
    }

    async fn push_quiz_summary(
        &self,
        user_id: UserId,
        summary: &QuizAttemptSummary,
    ) -> Result<(), UserStoreError> {
        // Targeted append under the write lock; the rest of the document
        // is untouched, matching a `$push`-style update.
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        let Some(stored) = guard.get_mut(&user_id) else {
            return Err(UserStoreError::Missing { user_id });
        };
        stored.quizzes_attended.push(summary.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::QuizId;
    use crate::domain::user::AccountStatus;
    use chrono::Utc;

    fn summary(quiz_id: QuizId) -> QuizAttemptSummary {
        QuizAttemptSummary {
            quiz_id,
            quiz_title: "Kinematics".to_owned(),
            score: 7.0,
            total_answered: 10,
            right_answers: 7,
            wrong_answers: 3,
            submitted_at: Utc::now(),
            details: None,
        }
    }

    #[tokio::test]
    async fn update_replaces_an_existing_user() {
        let user = User::new_student(UserId::random(), "Ada", "Lovelace");
        let repo = MemoryUserRepository::new().with_user(user.clone());

        let mut updated = user.clone();
        updated.status = AccountStatus::Active;
        repo.update(&updated).await.expect("update");

        let fetched = repo
            .find_by_id(user.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(fetched.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn update_of_missing_user_reports_missing() {
        let repo = MemoryUserRepository::new();
        let user = User::new_student(UserId::random(), "Ada", "Lovelace");

        let error = repo.update(&user).await.expect_err("missing user");
        assert_eq!(error, UserStoreError::Missing { user_id: user.id });
    }

    #[tokio::test]
    async fn push_quiz_summary_appends_without_touching_the_rest() {
        let mut user = User::new_student(UserId::random(), "Ada", "Lovelace");
        user.status = AccountStatus::Active;
        let repo = MemoryUserRepository::new().with_user(user.clone());

        repo.push_quiz_summary(user.id, &summary(QuizId::random()))
            .await
            .expect("first append");
        repo.push_quiz_summary(user.id, &summary(QuizId::random()))
            .await
            .expect("second append");

        let fetched = repo
            .find_by_id(user.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(fetched.quizzes_attended.len(), 2);
        assert_eq!(fetched.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn find_by_ids_skips_missing_users() {
        let user = User::new_student(UserId::random(), "Ada", "Lovelace");
        let repo = MemoryUserRepository::new().with_user(user.clone());

        let found = repo
            .find_by_ids(&[user.id, UserId::random()])
            .await
            .expect("find");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, user.id);
    }
}
