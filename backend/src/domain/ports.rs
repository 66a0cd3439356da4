//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to interact with the
//! backing document store; driving ports are the use-cases the HTTP
//! adapter calls. Each driven trait exposes strongly typed errors so
//! adapters map their failures into predictable variants.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use super::enrollment::{EnrollmentRequest, RequestStatus, SubmitEnrollment};
use super::ids::{EnrollmentRequestId, QuizId, UserId};
use super::quiz::{
    LeaderboardEntry, Quiz, QuizAttemptSummary, QuizSubmissionView, UserQuizRecord,
};
use super::user::User;
use super::Error;

/// Errors surfaced by the enrollment-request store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrollmentStoreError {
    /// Store connectivity failure.
    #[error("enrollment store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("enrollment store query failed: {message}")]
    Query { message: String },
}

impl EnrollmentStoreError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the user store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    /// Store connectivity failure.
    #[error("user store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },
    /// The targeted user document no longer exists.
    #[error("user {user_id} not found")]
    Missing { user_id: UserId },
    /// The document violates the store schema on a named field.
    #[error("user field {field} failed validation: {message}")]
    Validation { field: String, message: String },
}

impl UserStoreError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for schema violations on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the quiz-record store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizRecordStoreError {
    /// Store connectivity failure.
    #[error("quiz record store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("quiz record store query failed: {message}")]
    Query { message: String },
    /// The uniqueness constraint on (user, quiz) rejected the insert.
    #[error("duplicate attempt for user {user_id} on quiz {quiz_id}")]
    DuplicateAttempt { user_id: UserId, quiz_id: QuizId },
}

/// Errors surfaced by the quiz-definition store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizStoreError {
    /// Store connectivity failure.
    #[error("quiz store connection failed: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("quiz store query failed: {message}")]
    Query { message: String },
}

/// Outcome of the conditional PENDING → VERIFIED transition.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkVerifiedOutcome {
    /// The request was pending and is now verified.
    Updated(EnrollmentRequest),
    /// The request exists but was not pending; nothing changed.
    NotPending(RequestStatus),
    /// The request no longer exists.
    Missing,
}

/// Persistence port for enrollment requests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EnrollmentRequestRepository: Send + Sync {
    /// Persist a freshly submitted request.
    async fn insert(&self, request: &EnrollmentRequest) -> Result<(), EnrollmentStoreError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: EnrollmentRequestId,
    ) -> Result<Option<EnrollmentRequest>, EnrollmentStoreError>;

    /// List every request, newest submission first.
    async fn list_newest_first(&self) -> Result<Vec<EnrollmentRequest>, EnrollmentStoreError>;

    /// Atomically transition a request from PENDING to VERIFIED.
    ///
    /// The transition is conditional inside the store: a request that is
    /// no longer pending is reported, never re-verified.
    async fn mark_verified(
        &self,
        id: EnrollmentRequestId,
        verified_at: DateTime<Utc>,
    ) -> Result<MarkVerifiedOutcome, EnrollmentStoreError>;

    /// Delete a request; returns whether it existed.
    async fn delete(&self, id: EnrollmentRequestId) -> Result<bool, EnrollmentStoreError>;
}

/// Persistence port for user aggregates.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch several users at once; missing identifiers are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserStoreError>;

    /// Replace the stored user document.
    async fn update(&self, user: &User) -> Result<(), UserStoreError>;

    /// Atomically append a quiz summary to the user's profile.
    ///
    /// This is a targeted list append inside the store, not a
    /// read-modify-write of the whole document, so concurrent
    /// submissions for different quizzes by the same user cannot lose
    /// updates.
    async fn push_quiz_summary(
        &self,
        user_id: UserId,
        summary: &QuizAttemptSummary,
    ) -> Result<(), UserStoreError>;
}

/// Read-only port for quiz definitions.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Fetch a quiz definition by identifier.
    async fn find_by_id(&self, id: QuizId) -> Result<Option<Quiz>, QuizStoreError>;
}

/// Persistence port for detailed quiz attempt records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizRecordRepository: Send + Sync {
    /// Insert a detailed record, enforcing the (user, quiz) uniqueness
    /// constraint inside the store.
    async fn insert(&self, record: &UserQuizRecord) -> Result<(), QuizRecordStoreError>;

    /// Fetch the record for a (user, quiz) pair.
    async fn find_by_user_and_quiz(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
    ) -> Result<Option<UserQuizRecord>, QuizRecordStoreError>;

    /// Fetch every record for a quiz.
    async fn find_by_quiz(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<UserQuizRecord>, QuizRecordStoreError>;
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedEnrollment {
    /// The mutated user aggregate (credential still present; response
    /// DTOs strip it).
    pub user: User,
    /// The request, now VERIFIED.
    pub request: EnrollmentRequest,
}

/// Driving port: the enrollment workflow engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EnrollmentWorkflow: Send + Sync {
    /// Submit a new enrollment or renewal request.
    async fn submit(&self, submission: SubmitEnrollment) -> Result<EnrollmentRequest, Error>;

    /// Verify a pending request, creating or extending the grant.
    async fn verify(&self, id: EnrollmentRequestId) -> Result<VerifiedEnrollment, Error>;

    /// Reject a pending request by deleting it.
    async fn reject(&self, id: EnrollmentRequestId) -> Result<(), Error>;

    /// List every request, newest first.
    async fn list(&self) -> Result<Vec<EnrollmentRequest>, Error>;

    /// Fetch a single request.
    async fn get(&self, id: EnrollmentRequestId) -> Result<EnrollmentRequest, Error>;
}

/// Validated input for recording a quiz submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitQuizResult {
    pub user_id: UserId,
    pub quiz_id: QuizId,
    pub score: f64,
    pub total_answered: u32,
    pub right_answers: u32,
    pub wrong_answers: u32,
    pub answers: Vec<super::quiz::AnswerRecord>,
}

/// Driving port: the quiz submission recorder and its read paths.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizResults: Send + Sync {
    /// Record a submission exactly once per (user, quiz).
    async fn record(&self, submission: SubmitQuizResult) -> Result<QuizAttemptSummary, Error>;

    /// Look up a submission, falling back to the legacy embedded
    /// summary when the detailed record is absent.
    async fn submission(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
    ) -> Result<QuizSubmissionView, Error>;

    /// Ranked entries for a quiz, best score first.
    async fn leaderboard(&self, quiz_id: QuizId) -> Result<Vec<LeaderboardEntry>, Error>;
}
