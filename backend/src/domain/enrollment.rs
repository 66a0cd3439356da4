//! Enrollment and renewal requests submitted by students and reviewed
//! by administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CourseId, EnrollmentRequestId, UserId};
use super::plan::PlanCode;

/// Review status of an enrollment request.
///
/// The only transition ever performed is `Pending` → `Verified`;
/// rejection deletes the request instead of storing a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Verified,
    /// Never written by this service (rejection deletes the request);
    /// kept so documents from before that change still deserialise.
    Rejected,
}

/// A student-submitted, admin-reviewed record proposing a new grant or
/// a renewal of an existing one.
///
/// Created by student submission; mutated only by the verify step
/// (status and verification date) or removed by the reject step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub id: EnrollmentRequestId,
    pub student_id: UserId,
    pub course_id: CourseId,
    /// Course title snapshot taken from the cart.
    pub course_title: String,
    pub plan: PlanCode,
    pub amount: f64,
    pub transaction_id: String,
    /// Payer account number used for the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_used: Option<String>,
    /// Free-form payment channel as reported by the student; normalised
    /// onto the user's closed set only at verification time.
    pub payment_method: String,
    pub is_renewal: bool,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<DateTime<Utc>>,
}

/// Payment channel recorded when the student does not report one.
pub const DEFAULT_PAYMENT_METHOD: &str = "Mobile Banking";

/// Validated input for submitting an enrollment or renewal request.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitEnrollment {
    pub student_id: UserId,
    pub course_id: CourseId,
    pub course_title: String,
    pub plan: PlanCode,
    pub amount: f64,
    pub transaction_id: String,
    pub number_used: Option<String>,
    pub payment_method: Option<String>,
    pub is_renewal: bool,
}

impl EnrollmentRequest {
    /// Build a fresh pending request from a validated submission.
    pub fn pending(submission: SubmitEnrollment, now: DateTime<Utc>) -> Self {
        let SubmitEnrollment {
            student_id,
            course_id,
            course_title,
            plan,
            amount,
            transaction_id,
            number_used,
            payment_method,
            is_renewal,
        } = submission;
        Self {
            id: EnrollmentRequestId::random(),
            student_id,
            course_id,
            course_title,
            plan,
            amount,
            transaction_id,
            number_used,
            payment_method: payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned()),
            is_renewal,
            status: RequestStatus::Pending,
            request_date: now,
            verification_date: None,
        }
    }
}
