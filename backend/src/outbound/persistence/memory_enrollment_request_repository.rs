//! In-memory enrollment request store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::enrollment::{EnrollmentRequest, RequestStatus};
use crate::domain::ids::EnrollmentRequestId;
use crate::domain::ports::{
    EnrollmentRequestRepository, EnrollmentStoreError, MarkVerifiedOutcome,
};

/// Enrollment request collection keyed by request id.
#[derive(Debug, Default)]
pub struct MemoryEnrollmentRequestRepository {
    store: RwLock<HashMap<EnrollmentRequestId, EnrollmentRequest>>,
}

impl MemoryEnrollmentRequestRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> EnrollmentStoreError {
    EnrollmentStoreError::query("store lock poisoned")
}

#[async_trait]
impl EnrollmentRequestRepository for MemoryEnrollmentRequestRepository {
    async fn insert(&self, request: &EnrollmentRequest) -> Result<(), EnrollmentStoreError> {
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        guard.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: EnrollmentRequestId,
    ) -> Result<Option<EnrollmentRequest>, EnrollmentStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_newest_first(&self) -> Result<Vec<EnrollmentRequest>, EnrollmentStoreError> {
        let guard = self.store.read().map_err(|_| poisoned())?;
        let mut requests: Vec<EnrollmentRequest> = guard.values().cloned().collect();
        requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        Ok(requests)
    }

    async fn mark_verified(
        &self,
        id: EnrollmentRequestId,
        verified_at: DateTime<Utc>,
    ) -> Result<MarkVerifiedOutcome, EnrollmentStoreError> {
        // The whole check-and-set runs under the write lock, matching a
        // conditional update in the real store.
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        let Some(request) = guard.get_mut(&id) else {
            return Ok(MarkVerifiedOutcome::Missing);
        };
        if request.status != RequestStatus::Pending {
            return Ok(MarkVerifiedOutcome::NotPending(request.status));
        }
        request.status = RequestStatus::Verified;
        request.verification_date = Some(verified_at);
        Ok(MarkVerifiedOutcome::Updated(request.clone()))
    }

    async fn delete(&self, id: EnrollmentRequestId) -> Result<bool, EnrollmentStoreError> {
        let mut guard = self.store.write().map_err(|_| poisoned())?;
        Ok(guard.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::SubmitEnrollment;
    use crate::domain::ids::{CourseId, UserId};
    use crate::domain::plan::PlanCode;
    use chrono::Duration;

    fn request(request_date: DateTime<Utc>) -> EnrollmentRequest {
        let mut request = EnrollmentRequest::pending(
            SubmitEnrollment {
                student_id: UserId::random(),
                course_id: CourseId::random(),
                course_title: "Higher Algebra".to_owned(),
                plan: PlanCode::OneMonth,
                amount: 500.0,
                transaction_id: "T1".to_owned(),
                number_used: None,
                payment_method: None,
                is_renewal: false,
            },
            request_date,
        );
        request.request_date = request_date;
        request
    }

    #[tokio::test]
    async fn round_trips_requests() {
        let repo = MemoryEnrollmentRequestRepository::new();
        let request = request(Utc::now());

        repo.insert(&request).await.expect("insert");
        let fetched = repo.find_by_id(request.id).await.expect("find");
        assert_eq!(fetched, Some(request));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let repo = MemoryEnrollmentRequestRepository::new();
        let now = Utc::now();
        let older = request(now - Duration::hours(2));
        let newer = request(now);

        repo.insert(&older).await.expect("insert older");
        repo.insert(&newer).await.expect("insert newer");

        let listed = repo.list_newest_first().await.expect("list");
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn mark_verified_transitions_only_once() {
        let repo = MemoryEnrollmentRequestRepository::new();
        let request = request(Utc::now());
        repo.insert(&request).await.expect("insert");

        let first = repo
            .mark_verified(request.id, Utc::now())
            .await
            .expect("first transition");
        let MarkVerifiedOutcome::Updated(updated) = first else {
            panic!("expected update, got {first:?}");
        };
        assert_eq!(updated.status, RequestStatus::Verified);
        assert!(updated.verification_date.is_some());

        let second = repo
            .mark_verified(request.id, Utc::now())
            .await
            .expect("second transition attempt");
        assert_eq!(
            second,
            MarkVerifiedOutcome::NotPending(RequestStatus::Verified)
        );
    }

    #[tokio::test]
    async fn mark_verified_reports_missing_requests() {
        let repo = MemoryEnrollmentRequestRepository::new();
        let outcome = repo
            .mark_verified(EnrollmentRequestId::random(), Utc::now())
            .await
            .expect("transition attempt");
        assert_eq!(outcome, MarkVerifiedOutcome::Missing);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let repo = MemoryEnrollmentRequestRepository::new();
        let request = request(Utc::now());
        repo.insert(&request).await.expect("insert");

        assert!(repo.delete(request.id).await.expect("delete"));
        assert!(!repo.delete(request.id).await.expect("delete again"));
    }
}
