//! The quiz submission recorder and its read paths.
//!
//! Submission is at-most-once per (user, quiz): a fast-path existence
//! check runs first, but the store-level uniqueness constraint on the
//! detailed record is the authoritative guard under concurrency.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ids::{QuizId, UserId};
use crate::domain::ports::{
    QuizRecordRepository, QuizRecordStoreError, QuizRepository, QuizResults, QuizStoreError,
    SubmitQuizResult, UserRepository, UserStoreError,
};
use crate::domain::quiz::{
    LeaderboardEntry, QuizAttemptSummary, QuizSubmissionView, UserQuizRecord,
};
use crate::domain::Error;

/// Quiz results service implementing the driving port.
#[derive(Clone)]
pub struct QuizResultService<Q, R, U> {
    quizzes: Arc<Q>,
    records: Arc<R>,
    users: Arc<U>,
}

impl<Q, R, U> QuizResultService<Q, R, U> {
    /// Create a new service with the given stores.
    pub fn new(quizzes: Arc<Q>, records: Arc<R>, users: Arc<U>) -> Self {
        Self {
            quizzes,
            records,
            users,
        }
    }
}

impl<Q, R, U> QuizResultService<Q, R, U>
where
    Q: QuizRepository,
    R: QuizRecordRepository,
    U: UserRepository,
{
    fn map_record_store_error(error: QuizRecordStoreError) -> Error {
        match error {
            QuizRecordStoreError::Connection { message } => {
                Error::service_unavailable(format!("quiz record store unavailable: {message}"))
            }
            QuizRecordStoreError::Query { message } => {
                Error::internal(format!("quiz record store error: {message}"))
            }
            QuizRecordStoreError::DuplicateAttempt { .. } => {
                Error::conflict("Quiz already attempted. Duplicate submission blocked.")
            }
        }
    }

    fn map_quiz_store_error(error: QuizStoreError) -> Error {
        match error {
            QuizStoreError::Connection { message } => {
                Error::service_unavailable(format!("quiz store unavailable: {message}"))
            }
            QuizStoreError::Query { message } => {
                Error::internal(format!("quiz store error: {message}"))
            }
        }
    }

    fn map_user_store_error(error: UserStoreError) -> Error {
        match error {
            UserStoreError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserStoreError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            UserStoreError::Missing { .. } => {
                // The user existed moments ago; losing it mid-operation
                // is an unexpected store-level failure, not a 404.
                Error::internal("failed to update user profile")
            }
            UserStoreError::Validation { field, message } => {
                Error::internal(format!("user schema violation on {field}: {message}"))
            }
        }
    }
}

#[async_trait]
impl<Q, R, U> QuizResults for QuizResultService<Q, R, U>
where
    Q: QuizRepository,
    R: QuizRecordRepository,
    U: UserRepository,
{
    async fn record(&self, submission: SubmitQuizResult) -> Result<QuizAttemptSummary, Error> {
        let SubmitQuizResult {
            user_id,
            quiz_id,
            score,
            total_answered,
            right_answers,
            wrong_answers,
            answers,
        } = submission;

        // Fast path; the insert below is the authoritative guard.
        let already_attempted = self
            .records
            .find_by_user_and_quiz(user_id, quiz_id)
            .await
            .map_err(Self::map_record_store_error)?
            .is_some();
        if already_attempted {
            warn!(%user_id, %quiz_id, "duplicate quiz submission blocked");
            return Err(Error::conflict(
                "Quiz already attempted. Duplicate submission blocked.",
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_store_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await
            .map_err(Self::map_quiz_store_error)?
            .ok_or_else(|| Error::not_found("Quiz not found"))?;

        let finished_at = Utc::now();
        let record = UserQuizRecord {
            user_id,
            course_id: quiz.course_id,
            quiz_id,
            started_at: finished_at,
            finished_at,
            score,
            total_answered,
            right_answers,
            wrong_answers,
            answers,
        };

        // The uniqueness constraint fires here if a concurrent
        // submission won the race.
        self.records
            .insert(&record)
            .await
            .map_err(Self::map_record_store_error)?;

        let summary = QuizAttemptSummary {
            quiz_id,
            quiz_title: quiz.quiz_title,
            score,
            total_answered,
            right_answers,
            wrong_answers,
            submitted_at: finished_at,
            details: None,
        };
        self.users
            .push_quiz_summary(user.id, &summary)
            .await
            .map_err(Self::map_user_store_error)?;

        info!(%user_id, %quiz_id, score, "quiz result recorded");
        Ok(summary)
    }

    async fn submission(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
    ) -> Result<QuizSubmissionView, Error> {
        if let Some(record) = self
            .records
            .find_by_user_and_quiz(user_id, quiz_id)
            .await
            .map_err(Self::map_record_store_error)?
        {
            return Ok(QuizSubmissionView::from(record));
        }

        // Legacy compatibility: older attempts live only as embedded
        // summaries on the user profile.
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_store_error)?;
        let embedded = user.and_then(|user| {
            user.quizzes_attended
                .into_iter()
                .find(|summary| summary.quiz_id == quiz_id)
        });

        embedded
            .map(|summary| QuizSubmissionView::from_summary(user_id, summary))
            .ok_or_else(|| Error::not_found("Detailed quiz record not found"))
    }

    async fn leaderboard(&self, quiz_id: QuizId) -> Result<Vec<LeaderboardEntry>, Error> {
        let records = self
            .records
            .find_by_quiz(quiz_id)
            .await
            .map_err(Self::map_record_store_error)?;

        let user_ids: Vec<UserId> = records.iter().map(|record| record.user_id).collect();
        let users = self
            .users
            .find_by_ids(&user_ids)
            .await
            .map_err(Self::map_user_store_error)?;

        let mut entries: Vec<LeaderboardEntry> = records
            .into_iter()
            .filter_map(|record| {
                let user = users.iter().find(|user| user.id == record.user_id)?;
                Some(LeaderboardEntry {
                    name: user.display_name(),
                    avatar: user.avatar.clone(),
                    score: record.score,
                    right_answers: record.right_answers,
                    wrong_answers: record.wrong_answers,
                    submitted_at: record.finished_at,
                })
            })
            .collect();

        // Best score first; ties go to the earlier submission.
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        });
        Ok(entries)
    }
}
