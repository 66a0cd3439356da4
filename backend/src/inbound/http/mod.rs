//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod quiz_results;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every API route under the caller's scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(enrollments::submit_enrollment)
        .service(enrollments::list_enrollments)
        .service(enrollments::get_enrollment)
        .service(enrollments::verify_enrollment)
        .service(enrollments::reject_enrollment)
        .service(quiz_results::save_quiz_result)
        .service(quiz_results::get_quiz_result)
        .service(quiz_results::quiz_leaderboard);
}
