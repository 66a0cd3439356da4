//! In-memory quiz definition store (read-only from the core's view).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ids::QuizId;
use crate::domain::ports::{QuizRepository, QuizStoreError};
use crate::domain::quiz::Quiz;

/// Quiz definition collection keyed by quiz id.
#[derive(Debug, Default)]
pub struct MemoryQuizRepository {
    store: RwLock<HashMap<QuizId, Quiz>>,
}

impl MemoryQuizRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a quiz, returning the repository for chaining.
    pub fn with_quiz(self, quiz: Quiz) -> Self {
        if let Ok(mut guard) = self.store.write() {
            guard.insert(quiz.id, quiz);
        }
        self
    }
}

#[async_trait]
impl QuizRepository for MemoryQuizRepository {
    async fn find_by_id(&self, id: QuizId) -> Result<Option<Quiz>, QuizStoreError> {
        let guard = self.store.read().map_err(|_| QuizStoreError::Query {
            message: "store lock poisoned".to_owned(),
        })?;
        Ok(guard.get(&id).cloned())
    }
}
