//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the
//! request and response schemas, and the gateway header security
//! scheme. Debug builds expose the document at
//! `/api-docs/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccountStatus, AnswerRecord, CourseAccessGrant, EnrollmentRequest, Error, ErrorCode,
    LeaderboardEntry, PaymentInfo, PaymentMethod, PlanCode, QuizAttemptSummary,
    QuizSubmissionView, RequestStatus, UserRole,
};
use crate::inbound::http::enrollments::{
    EnrollmentRequestBody, MessageResponse, SubmitEnrollmentResponse, UserResponse,
    VerifyEnrollmentResponse,
};
use crate::inbound::http::quiz_results::{QuizResultBody, SaveQuizResultResponse};

/// Enrich the generated document with the gateway header scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "GatewayIdentity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-user-id",
                "Principal identity injected by the upstream gateway; \
                 paired with x-user-role for role checks.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Learning platform backend API",
        description = "Enrollment lifecycle, quiz submission recording and \
                       per-quiz leaderboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("GatewayIdentity" = [])),
    paths(
        crate::inbound::http::enrollments::submit_enrollment,
        crate::inbound::http::enrollments::list_enrollments,
        crate::inbound::http::enrollments::get_enrollment,
        crate::inbound::http::enrollments::verify_enrollment,
        crate::inbound::http::enrollments::reject_enrollment,
        crate::inbound::http::quiz_results::save_quiz_result,
        crate::inbound::http::quiz_results::get_quiz_result,
        crate::inbound::http::quiz_results::quiz_leaderboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PlanCode,
        RequestStatus,
        EnrollmentRequest,
        EnrollmentRequestBody,
        SubmitEnrollmentResponse,
        VerifyEnrollmentResponse,
        MessageResponse,
        UserResponse,
        UserRole,
        AccountStatus,
        PaymentMethod,
        PaymentInfo,
        CourseAccessGrant,
        AnswerRecord,
        QuizAttemptSummary,
        QuizResultBody,
        SaveQuizResultResponse,
        QuizSubmissionView,
        LeaderboardEntry,
    )),
    tags(
        (name = "enrollments", description = "Enrollment request lifecycle"),
        (name = "quiz-results", description = "Quiz submissions and leaderboards"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn document_registers_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/api/v1/enrollments/request",
            "/api/v1/enrollments",
            "/api/v1/enrollments/{id}",
            "/api/v1/enrollments/{id}/verify",
            "/api/v1/users/{student_id}/{quiz_id}",
            "/api/v1/quizzes/leaderboard/{quiz_id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn error_schema_exposes_code_and_message() {
        use utoipa::openapi::schema::Schema;
        use utoipa::openapi::RefOr;

        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");
        match error_schema {
            RefOr::T(Schema::Object(object)) => {
                assert!(object.properties.contains_key("code"));
                assert!(object.properties.contains_key("message"));
            }
            _ => panic!("expected Object schema"),
        }
    }
}
