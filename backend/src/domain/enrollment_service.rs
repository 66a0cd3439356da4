//! The enrollment workflow engine.
//!
//! Orchestrates request submission, duplicate detection, admin
//! verification (branching between new enrollment and renewal) and
//! rejection. Grants on the user aggregate are written only here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::domain::enrollment::{EnrollmentRequest, RequestStatus, SubmitEnrollment};
use crate::domain::ids::EnrollmentRequestId;
use crate::domain::plan::expiry_from;
use crate::domain::ports::{
    EnrollmentRequestRepository, EnrollmentStoreError, EnrollmentWorkflow, MarkVerifiedOutcome,
    UserRepository, UserStoreError, VerifiedEnrollment,
};
use crate::domain::user::{AccountStatus, CourseAccessGrant, PaymentMethod, User};
use crate::domain::Error;

/// Enrollment workflow service implementing the driving port.
#[derive(Clone)]
pub struct EnrollmentService<R, U> {
    requests: Arc<R>,
    users: Arc<U>,
}

impl<R, U> EnrollmentService<R, U> {
    /// Create a new service with the given stores.
    pub fn new(requests: Arc<R>, users: Arc<U>) -> Self {
        Self { requests, users }
    }
}

impl<R, U> EnrollmentService<R, U>
where
    R: EnrollmentRequestRepository,
    U: UserRepository,
{
    fn map_request_store_error(error: EnrollmentStoreError) -> Error {
        match error {
            EnrollmentStoreError::Connection { message } => {
                Error::service_unavailable(format!("enrollment store unavailable: {message}"))
            }
            EnrollmentStoreError::Query { message } => {
                Error::internal(format!("enrollment store error: {message}"))
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
            UserStoreError::Missing { user_id } => {
                Error::not_found(format!("Student {user_id} not found"))
            }
            UserStoreError::Validation { field, message } => {
                Error::invalid_request(format!("Validation error on {field}: {message}"))
                    .with_details(json!({ "field": field }))
            }
        }
    }

    fn validate_submission(submission: &SubmitEnrollment) -> Result<(), Error> {
        if submission.transaction_id.trim().is_empty() {
            return Err(Error::invalid_request("transactionId must not be empty")
                .with_details(json!({ "field": "transactionId" })));
        }
        if submission.amount <= 0.0 {
            return Err(Error::invalid_request("amount must be positive")
                .with_details(json!({ "field": "amount" })));
        }
        if submission.course_title.trim().is_empty() {
            return Err(Error::invalid_request("courseTitle must not be empty")
                .with_details(json!({ "field": "courseTitle" })));
        }
        Ok(())
    }

    /// Create or extend the grant for the request's course on `user`.
    ///
    /// Both branches converge on the same extension rule: an existing
    /// grant is extended from `max(expiry, now)` (duplicate verified
    /// enrollments are treated leniently, exactly like renewals), a
    /// missing grant is created starting now.
    fn apply_grant(user: &mut User, request: &EnrollmentRequest) {
        let now = Utc::now();
        if let Some(grant) = user.grant_for_mut(request.course_id) {
            let base = grant.expiry_date.max(now);
            grant.expiry_date = expiry_from(request.plan, base);
            grant.plan = request.plan;
            grant.is_active = true;
        } else {
            user.courses.push(CourseAccessGrant {
                course_id: request.course_id,
                title: request.course_title.clone(),
                plan: request.plan,
                start_date: now,
                expiry_date: expiry_from(request.plan, now),
                is_active: true,
            });
        }
    }

    /// Snapshot the latest payment metadata onto the user and activate
    /// the account.
    fn apply_payment_metadata(user: &mut User, request: &EnrollmentRequest) {
        user.payment.method = Some(PaymentMethod::normalise(&request.payment_method));
        user.payment.transaction_id = Some(request.transaction_id.clone());
        user.payment.number_used = request.number_used.clone();
        user.status = AccountStatus::Active;
    }
}

#[async_trait]
impl<R, U> EnrollmentWorkflow for EnrollmentService<R, U>
where
    R: EnrollmentRequestRepository,
    U: UserRepository,
{
    async fn submit(&self, submission: SubmitEnrollment) -> Result<EnrollmentRequest, Error> {
        Self::validate_submission(&submission)?;

        let student = self
            .users
            .find_by_id(submission.student_id)
            .await
            .map_err(Self::map_user_store_error)?
            .ok_or_else(|| Error::not_found("Student not found"))?;

        let now = Utc::now();
        // A renewal may be submitted while the grant is still active;
        // only a plain duplicate enrollment is blocked.
        if !submission.is_renewal && student.has_active_course(submission.course_id, now) {
            return Err(Error::conflict(format!(
                "Already actively enrolled in {}. Renew or extend instead.",
                submission.course_title
            )));
        }

        let request = EnrollmentRequest::pending(submission, now);
        self.requests
            .insert(&request)
            .await
            .map_err(Self::map_request_store_error)?;

        info!(
            request_id = %request.id,
            student_id = %request.student_id,
            course_id = %request.course_id,
            is_renewal = request.is_renewal,
            "enrollment request submitted"
        );
        Ok(request)
    }

    async fn verify(&self, id: EnrollmentRequestId) -> Result<VerifiedEnrollment, Error> {
        let request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(Self::map_request_store_error)?
            .ok_or_else(|| Error::not_found("Request not found"))?;

        if request.status != RequestStatus::Pending {
            return Err(Error::conflict("Request already processed"));
        }

        let mut student = self
            .users
            .find_by_id(request.student_id)
            .await
            .map_err(Self::map_user_store_error)?
            .ok_or_else(|| Error::not_found("Student not found"))?;

        // The renewal and new-enrollment branches share the grant rule;
        // the renewal flag only matters at submission time.
        Self::apply_grant(&mut student, &request);
        Self::apply_payment_metadata(&mut student, &request);

        self.users
            .update(&student)
            .await
            .map_err(Self::map_user_store_error)?;

        // The user mutation is persisted; the request transition must
        // follow. Any failure past this point is a fatal inconsistency
        // to be reported, never auto-healed or retried, because a retry
        // would re-extend the grant.
        let verified_at = Utc::now();
        let outcome = match self.requests.mark_verified(id, verified_at).await {
            Ok(outcome) => outcome,
            Err(store_error) => {
                error!(
                    request_id = %id,
                    student_id = %request.student_id,
                    error = %store_error,
                    "grant persisted but request transition failed; manual reconciliation required"
                );
                return Err(Error::internal(
                    "verification left inconsistent state; contact support",
                ));
            }
        };

        let request = match outcome {
            MarkVerifiedOutcome::Updated(request) => request,
            MarkVerifiedOutcome::NotPending(status) => {
                error!(
                    request_id = %id,
                    status = ?status,
                    "grant persisted but request was concurrently processed"
                );
                return Err(Error::internal(
                    "verification left inconsistent state; contact support",
                ));
            }
            MarkVerifiedOutcome::Missing => {
                error!(
                    request_id = %id,
                    "grant persisted but request disappeared"
                );
                return Err(Error::internal(
                    "verification left inconsistent state; contact support",
                ));
            }
        };

        info!(
            request_id = %request.id,
            student_id = %request.student_id,
            course_id = %request.course_id,
            is_renewal = request.is_renewal,
            "enrollment request verified"
        );
        Ok(VerifiedEnrollment {
            user: student,
            request,
        })
    }

    async fn reject(&self, id: EnrollmentRequestId) -> Result<(), Error> {
        let existed = self
            .requests
            .delete(id)
            .await
            .map_err(Self::map_request_store_error)?;
        if !existed {
            return Err(Error::not_found("Request not found"));
        }
        info!(request_id = %id, "enrollment request rejected");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EnrollmentRequest>, Error> {
        self.requests
            .list_newest_first()
            .await
            .map_err(Self::map_request_store_error)
    }

    async fn get(&self, id: EnrollmentRequestId) -> Result<EnrollmentRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(Self::map_request_store_error)?
            .ok_or_else(|| Error::not_found("Request not found"))
    }
}
