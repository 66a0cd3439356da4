//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they
//! only depend on domain ports (use-cases) and remain testable without
//! I/O.

use std::sync::Arc;

use crate::domain::ports::{EnrollmentWorkflow, QuizResults};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub enrollments: Arc<dyn EnrollmentWorkflow>,
    pub quiz_results: Arc<dyn QuizResults>,
}

impl HttpState {
    /// Bundle the driving ports for handler injection.
    pub fn new(enrollments: Arc<dyn EnrollmentWorkflow>, quiz_results: Arc<dyn QuizResults>) -> Self {
        Self {
            enrollments,
            quiz_results,
        }
    }
}
