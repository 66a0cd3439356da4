//! Enrollment request HTTP handlers.
//!
//! ```text
//! POST   /api/v1/enrollments/request      Submit a new or renewal request
//! GET    /api/v1/enrollments              List requests (admin)
//! GET    /api/v1/enrollments/{id}         Fetch one request (admin)
//! PUT    /api/v1/enrollments/{id}/verify  Approve payment (admin)
//! DELETE /api/v1/enrollments/{id}         Reject a request (admin)
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::VerifiedEnrollment;
use crate::domain::{
    AccountStatus, CourseAccessGrant, CourseId, EnrollmentRequest, EnrollmentRequestId, Error,
    PaymentInfo, QuizAttemptSummary, SubmitEnrollment, User, UserId, UserRole,
};
use crate::inbound::http::auth::Principal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_plan_code, parse_uuid, require_field};
use crate::inbound::http::ApiResult;

/// Request payload for submitting an enrollment or renewal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnrollmentRequestBody {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub course_title: Option<String>,
    pub plan: Option<String>,
    pub transaction_id: Option<String>,
    pub number_used: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub is_renewal: Option<bool>,
}

fn parse_enrollment_body(body: EnrollmentRequestBody) -> Result<SubmitEnrollment, Error> {
    let student_id = require_field(body.student_id, "studentId")?;
    let course_id = require_field(body.course_id, "courseId")?;
    let course_title = require_field(body.course_title, "courseTitle")?;
    let plan = require_field(body.plan, "plan")?;
    let transaction_id = require_field(body.transaction_id, "transactionId")?;
    let amount = require_field(body.amount, "amount")?;

    Ok(SubmitEnrollment {
        student_id: UserId::new(parse_uuid(&student_id, "studentId")?),
        course_id: CourseId::new(parse_uuid(&course_id, "courseId")?),
        course_title,
        plan: parse_plan_code(&plan, "plan")?,
        amount,
        transaction_id,
        number_used: body.number_used,
        payment_method: body.payment_method,
        is_renewal: body.is_renewal.unwrap_or(false),
    })
}

/// User representation returned by the API, with the stored credential
/// stripped.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub joined_at: DateTime<Utc>,
    pub payment: PaymentInfo,
    pub courses: Vec<CourseAccessGrant>,
    pub quizzes_attended: Vec<QuizAttemptSummary>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            contact_no: user.contact_no,
            avatar: user.avatar,
            role: user.role,
            status: user.status,
            joined_at: user.joined_at,
            payment: user.payment,
            courses: user.courses,
            quizzes_attended: user.quizzes_attended,
        }
    }
}

/// Response for a successful submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnrollmentResponse {
    pub message: String,
    pub enrollment_request: EnrollmentRequest,
}

/// Response for a successful verification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEnrollmentResponse {
    pub message: String,
    pub updated_user: UserResponse,
    pub request: EnrollmentRequest,
}

/// Plain message envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Submit a new enrollment or renewal request.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/request",
    request_body = EnrollmentRequestBody,
    responses(
        (status = 201, description = "Request queued for verification", body = SubmitEnrollmentResponse),
        (status = 400, description = "Missing or malformed fields", body = Error),
        (status = 404, description = "Student not found", body = Error),
        (status = 409, description = "Already actively enrolled", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "submitEnrollment"
)]
#[post("/enrollments/request")]
pub async fn submit_enrollment(
    state: web::Data<HttpState>,
    payload: web::Json<EnrollmentRequestBody>,
) -> ApiResult<HttpResponse> {
    let submission = parse_enrollment_body(payload.into_inner())?;
    let request = state.enrollments.submit(submission).await?;
    Ok(HttpResponse::Created().json(SubmitEnrollmentResponse {
        message: "Request submitted successfully. Awaiting admin verification.".to_owned(),
        enrollment_request: request,
    }))
}

/// List every enrollment request, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    responses(
        (status = 200, description = "All requests, newest first", body = [EnrollmentRequest]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "listEnrollments"
)]
#[get("/enrollments")]
pub async fn list_enrollments(
    state: web::Data<HttpState>,
    principal: Principal,
) -> ApiResult<web::Json<Vec<EnrollmentRequest>>> {
    principal.require_admin()?;
    let requests = state.enrollments.list().await?;
    Ok(web::Json(requests))
}

/// Fetch a single enrollment request.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment request identifier")),
    responses(
        (status = 200, description = "The request", body = EnrollmentRequest),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Request not found", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "getEnrollment"
)]
#[get("/enrollments/{id}")]
pub async fn get_enrollment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<EnrollmentRequest>> {
    principal.require_admin()?;
    let id = EnrollmentRequestId::new(path.into_inner());
    let request = state.enrollments.get(id).await?;
    Ok(web::Json(request))
}

/// Approve a pending request, creating or extending the grant.
#[utoipa::path(
    put,
    path = "/api/v1/enrollments/{id}/verify",
    params(("id" = Uuid, Path, description = "Enrollment request identifier")),
    responses(
        (status = 200, description = "Student enrolled or subscription renewed", body = VerifyEnrollmentResponse),
        (status = 400, description = "Validation failure naming the field", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Request or student not found", body = Error),
        (status = 409, description = "Request already processed", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "verifyEnrollment"
)]
#[put("/enrollments/{id}/verify")]
pub async fn verify_enrollment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<VerifyEnrollmentResponse>> {
    principal.require_admin()?;
    let id = EnrollmentRequestId::new(path.into_inner());
    let VerifiedEnrollment { user, request } = state.enrollments.verify(id).await?;

    let message = if request.is_renewal {
        "Subscription renewed successfully."
    } else {
        "Student enrolled successfully."
    };
    Ok(web::Json(VerifyEnrollmentResponse {
        message: message.to_owned(),
        updated_user: UserResponse::from(user),
        request,
    }))
}

/// Reject a pending request by deleting it.
#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment request identifier")),
    responses(
        (status = 200, description = "Request rejected and deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Request not found", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "rejectEnrollment"
)]
#[delete("/enrollments/{id}")]
pub async fn reject_enrollment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<MessageResponse>> {
    principal.require_admin()?;
    let id = EnrollmentRequestId::new(path.into_inner());
    state.enrollments.reject(id).await?;
    Ok(web::Json(MessageResponse {
        message: "Request rejected and deleted.".to_owned(),
    }))
}
