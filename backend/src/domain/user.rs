//! The user aggregate: identity, payment snapshot, course-access grants
//! and embedded quiz-attempt summaries.
//!
//! Grants are written only by the enrollment workflow's verify step; the
//! summary list is appended to only by the quiz submission recorder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CourseId, UserId};
use super::plan::PlanCode;
use super::quiz::QuizAttemptSummary;

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account has at least one verified payment.
    Active,
    /// Freshly registered, awaiting first verification.
    Hold,
    /// Temporarily blocked by an administrator.
    Suspended,
    /// Permanently blocked.
    Banned,
}

/// Role of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular learner account.
    Student,
    /// Operator able to verify and reject enrollment requests.
    Admin,
}

/// Payment channels accepted by the platform.
///
/// The set is closed; [`PaymentMethod::normalise`] folds anything else
/// into [`PaymentMethod::Others`] so a free-form method recorded on an
/// enrollment request can never fail the user schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "bKash")]
    Bkash,
    Rocket,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Nagad,
    #[serde(rename = "Mobile Banking")]
    MobileBanking,
    Others,
}

impl PaymentMethod {
    /// Map a free-form method string onto the closed set.
    pub fn normalise(raw: &str) -> Self {
        match raw {
            "Cash" => Self::Cash,
            "bKash" => Self::Bkash,
            "Rocket" => Self::Rocket,
            "Credit Card" => Self::CreditCard,
            "Nagad" => Self::Nagad,
            "Mobile Banking" => Self::MobileBanking,
            _ => Self::Others,
        }
    }
}

/// A student's timed access right to a specific course.
///
/// Expired grants are never deleted; they stay as history with
/// `is_active` possibly still set and an expiry in the past. Access is
/// always evaluated lazily through [`CourseAccessGrant::confers_access`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseAccessGrant {
    pub course_id: CourseId,
    /// Course title snapshot taken at enrollment time.
    pub title: String,
    pub plan: PlanCode,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
}

impl CourseAccessGrant {
    /// A grant confers access iff it is active and its expiry is strictly
    /// in the future relative to `now`.
    pub fn confers_access(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expiry_date > now
    }
}

/// Latest-transaction payment snapshot kept on the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Payer account number used for the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_used: Option<String>,
}

/// The user aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Stored credential hash. Must never leave the process boundary;
    /// response DTOs are built without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub payment: PaymentInfo,
    /// Per-course access grants, at most one per course.
    #[serde(default)]
    pub courses: Vec<CourseAccessGrant>,
    /// Denormalised quiz-attempt summaries, append-only.
    #[serde(default)]
    pub quizzes_attended: Vec<QuizAttemptSummary>,
}

impl User {
    /// Create a fresh student account with no grants or attempts.
    pub fn new_student(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            contact_no: None,
            avatar: None,
            password_hash: None,
            role: UserRole::Student,
            status: AccountStatus::Hold,
            joined_at: Utc::now(),
            payment: PaymentInfo::default(),
            courses: Vec::new(),
            quizzes_attended: Vec::new(),
        }
    }

    /// Full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Find the grant for `course_id`, if any.
    pub fn grant_for(&self, course_id: CourseId) -> Option<&CourseAccessGrant> {
        self.courses.iter().find(|g| g.course_id == course_id)
    }

    /// Mutable access to the grant for `course_id`, if any.
    pub fn grant_for_mut(&mut self, course_id: CourseId) -> Option<&mut CourseAccessGrant> {
        self.courses.iter_mut().find(|g| g.course_id == course_id)
    }

    /// Whether the user currently has access to `course_id`.
    pub fn has_active_course(&self, course_id: CourseId, now: DateTime<Utc>) -> bool {
        self.grant_for(course_id)
            .is_some_and(|grant| grant.confers_access(now))
    }
}
