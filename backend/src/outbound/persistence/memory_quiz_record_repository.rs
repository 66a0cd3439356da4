//! In-memory detailed quiz attempt store.
//!
//! The map is keyed by (user, quiz), so the uniqueness constraint the
//! recorder relies on is structural: a second insert for the same pair
//! fails inside the critical section, exactly like a unique index.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ids::{QuizId, UserId};
use crate::domain::ports::{QuizRecordRepository, QuizRecordStoreError};
use crate::domain::quiz::UserQuizRecord;

/// Detailed quiz attempt collection with a unique (user, quiz) key.
#[derive(Debug, Default)]
pub struct MemoryQuizRecordRepository {
    store: RwLock<HashMap<(UserId, QuizId), UserQuizRecord>>,
}

impl MemoryQuizRecordRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> QuizRecordStoreError {
    QuizRecordStoreError::Query {
        message: "store lock poisoned".to_owned(),
    }
}

#[async_trait]
impl QuizRecordRepository for MemoryQuizRecordRepository {
    async fn insert(&self, record: &UserQuizRecord) -> Result<(), QuizRecordStoreError> {
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        let key = (record.user_id, record.quiz_id);
        if guard.contains_key(&key) {
            return Err(QuizRecordStoreError::DuplicateAttempt {
                user_id: record.user_id,
                quiz_id: record.quiz_id,
            });
        }
        guard.insert(key, record.clone());
        Ok(())
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
    ) -> Result<Option<UserQuizRecord>, QuizRecordStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        Ok(guard.get(&(user_id, quiz_id)).cloned())
    }

    async fn find_by_quiz(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<UserQuizRecord>, QuizRecordStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        Ok(guard
            .values()
            .filter(|record| record.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}
