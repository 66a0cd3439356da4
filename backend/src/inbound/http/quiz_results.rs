//! Quiz submission HTTP handlers.
//!
//! ```text
//! POST /api/v1/users/{student_id}/{quiz_id}  Record a submission
//! GET  /api/v1/users/{student_id}/{quiz_id}  Fetch a submission
//! GET  /api/v1/quizzes/leaderboard/{quiz_id} Ranked entries
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::SubmitQuizResult;
use crate::domain::{
    AnswerRecord, Error, LeaderboardEntry, QuizAttemptSummary, QuizId, QuizSubmissionView, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_field;
use crate::inbound::http::ApiResult;

/// Request payload for recording a submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizResultBody {
    pub score: Option<f64>,
    pub total_answered: Option<u32>,
    pub right_answers: Option<u32>,
    pub wrong_answers: Option<u32>,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

fn parse_quiz_result_body(
    user_id: UserId,
    quiz_id: QuizId,
    body: QuizResultBody,
) -> Result<SubmitQuizResult, Error> {
    Ok(SubmitQuizResult {
        user_id,
        quiz_id,
        score: require_field(body.score, "score")?,
        total_answered: require_field(body.total_answered, "totalAnswered")?,
        right_answers: require_field(body.right_answers, "rightAnswers")?,
        wrong_answers: require_field(body.wrong_answers, "wrongAnswers")?,
        answers: body.answers,
    })
}

/// Response for a recorded submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveQuizResultResponse {
    pub message: String,
    pub result: QuizAttemptSummary,
}

/// Record a student's quiz submission exactly once.
#[utoipa::path(
    post,
    path = "/api/v1/users/{student_id}/{quiz_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student identifier"),
        ("quiz_id" = Uuid, Path, description = "Quiz identifier")
    ),
    request_body = QuizResultBody,
    responses(
        (status = 200, description = "Submission recorded", body = SaveQuizResultResponse),
        (status = 400, description = "Missing or malformed fields", body = Error),
        (status = 404, description = "Student or quiz not found", body = Error),
        (status = 409, description = "Duplicate submission", body = Error)
    ),
    tags = ["quiz-results"],
    operation_id = "saveQuizResult"
)]
#[post("/users/{student_id}/{quiz_id}")]
pub async fn save_quiz_result(
    state: web::Data<HttpState>,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<QuizResultBody>,
) -> ApiResult<HttpResponse> {
    let (student_id, quiz_id) = path.into_inner();
    let submission = parse_quiz_result_body(
        UserId::new(student_id),
        QuizId::new(quiz_id),
        payload.into_inner(),
    )?;
    let summary = state.quiz_results.record(submission).await?;
    Ok(HttpResponse::Ok().json(SaveQuizResultResponse {
        message: "Quiz result saved successfully.".to_owned(),
        result: summary,
    }))
}

/// Fetch a student's submission for a quiz.
#[utoipa::path(
    get,
    path = "/api/v1/users/{student_id}/{quiz_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student identifier"),
        ("quiz_id" = Uuid, Path, description = "Quiz identifier")
    ),
    responses(
        (status = 200, description = "The submission", body = QuizSubmissionView),
        (status = 404, description = "No submission on record", body = Error)
    ),
    tags = ["quiz-results"],
    operation_id = "getQuizResult"
)]
#[get("/users/{student_id}/{quiz_id}")]
pub async fn get_quiz_result(
    state: web::Data<HttpState>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<web::Json<QuizSubmissionView>> {
    let (student_id, quiz_id) = path.into_inner();
    let view = state
        .quiz_results
        .submission(UserId::new(student_id), QuizId::new(quiz_id))
        .await?;
    Ok(web::Json(view))
}

/// Ranked submissions for a quiz, best score first.
#[utoipa::path(
    get,
    path = "/api/v1/quizzes/leaderboard/{quiz_id}",
    params(("quiz_id" = Uuid, Path, description = "Quiz identifier")),
    responses(
        (status = 200, description = "Ranked entries", body = [LeaderboardEntry])
    ),
    tags = ["quiz-results"],
    operation_id = "quizLeaderboard"
)]
#[get("/quizzes/leaderboard/{quiz_id}")]
pub async fn quiz_leaderboard(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<LeaderboardEntry>>> {
    let quiz_id = QuizId::new(path.into_inner());
    let entries = state.quiz_results.leaderboard(quiz_id).await;
    Ok(web::Json(entries?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseId, EnrollmentService, Quiz, QuizResultService, User};
    use crate::outbound::persistence::{
        MemoryEnrollmentRequestRepository, MemoryQuizRecordRepository, MemoryQuizRepository,
        MemoryUserRepository,
    };
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn quiz_fixture() -> Quiz {
        Quiz {
            id: QuizId::random(),
            course_id: CourseId::random(),
            quiz_title: "Kinematics".to_owned(),
        }
    }

    fn state_with(students: Vec<User>, quiz: Quiz) -> HttpState {
        let mut users = MemoryUserRepository::new();
        for student in students {
            users = users.with_user(student);
        }
        let users = Arc::new(users);
        let quizzes = Arc::new(MemoryQuizRepository::new().with_quiz(quiz));
        let records = Arc::new(MemoryQuizRecordRepository::new());
        let quiz_results = Arc::new(QuizResultService::new(quizzes, records, Arc::clone(&users)));
        let enrollments = Arc::new(EnrollmentService::new(
            Arc::new(MemoryEnrollmentRequestRepository::new()),
            users,
        ));
        HttpState::new(enrollments, quiz_results)
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(crate::inbound::http::configure))
    }

    fn result_body(score: f64, right: u32, wrong: u32) -> Value {
        json!({
            "score": score,
            "totalAnswered": right + wrong,
            "rightAnswers": right,
            "wrongAnswers": wrong,
            "answers": [],
        })
    }

    #[actix_web::test]
    async fn save_then_fetch_round_trips_the_submission() {
        let student = User::new_student(UserId::random(), "Ada", "Lovelace");
        let student_id = student.id;
        let quiz = quiz_fixture();
        let quiz_id = quiz.id;
        let app = actix_test::init_service(test_app(state_with(vec![student], quiz))).await;

        let save = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
            .set_json(result_body(8.0, 8, 2))
            .to_request();
        let response = actix_test::call_service(&app, save).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["result"]["quizTitle"], json!("Kinematics"));
        assert_eq!(body["result"]["score"], json!(8.0));

        let fetch = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
            .to_request();
        let response = actix_test::call_service(&app, fetch).await;
        assert_eq!(response.status(), StatusCode::OK);

        let view: Value = actix_test::read_body_json(response).await;
        assert_eq!(view["score"], json!(8.0));
        assert_eq!(view["rightAnswers"], json!(8));
        assert!(view["courseId"].is_string());
    }

    #[actix_web::test]
    async fn second_submission_for_same_quiz_is_a_conflict() {
        let student = User::new_student(UserId::random(), "Ada", "Lovelace");
        let student_id = student.id;
        let quiz = quiz_fixture();
        let quiz_id = quiz.id;
        let app = actix_test::init_service(test_app(state_with(vec![student], quiz))).await;

        let first = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
            .set_json(result_body(8.0, 8, 2))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, first).await.status(),
            StatusCode::OK
        );

        let second = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
            .set_json(result_body(9.0, 9, 1))
            .to_request();
        let response = actix_test::call_service(&app, second).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn unknown_quiz_is_not_found() {
        let student = User::new_student(UserId::random(), "Ada", "Lovelace");
        let student_id = student.id;
        let app = actix_test::init_service(test_app(state_with(vec![student], quiz_fixture()))).await;

        let save = actix_test::TestRequest::post()
            .uri(&format!(
                "/api/v1/users/{student_id}/{}",
                Uuid::new_v4()
            ))
            .set_json(result_body(8.0, 8, 2))
            .to_request();
        let response = actix_test::call_service(&app, save).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_score_is_a_bad_request() {
        let student = User::new_student(UserId::random(), "Ada", "Lovelace");
        let student_id = student.id;
        let quiz = quiz_fixture();
        let quiz_id = quiz.id;
        let app = actix_test::init_service(test_app(state_with(vec![student], quiz))).await;

        let save = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
            .set_json(json!({
                "totalAnswered": 10,
                "rightAnswers": 8,
                "wrongAnswers": 2,
            }))
            .to_request();
        let response = actix_test::call_service(&app, save).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], json!("score"));
    }

    #[actix_web::test]
    async fn leaderboard_ranks_by_score_descending() {
        let alice = User::new_student(UserId::random(), "Alice", "Auger");
        let bob = User::new_student(UserId::random(), "Bob", "Breuer");
        let alice_id = alice.id;
        let bob_id = bob.id;
        let quiz = quiz_fixture();
        let quiz_id = quiz.id;
        let app = actix_test::init_service(test_app(state_with(vec![alice, bob], quiz))).await;

        for (student_id, score, right, wrong) in
            [(alice_id, 6.0, 6, 4), (bob_id, 9.0, 9, 1)]
        {
            let save = actix_test::TestRequest::post()
                .uri(&format!("/api/v1/users/{student_id}/{quiz_id}"))
                .set_json(result_body(score, right, wrong))
                .to_request();
            assert_eq!(
                actix_test::call_service(&app, save).await.status(),
                StatusCode::OK
            );
        }

        let fetch = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/quizzes/leaderboard/{quiz_id}"))
            .to_request();
        let response = actix_test::call_service(&app, fetch).await;
        assert_eq!(response.status(), StatusCode::OK);

        let entries: Value = actix_test::read_body_json(response).await;
        let entries = entries.as_array().expect("array body");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], json!("Bob Breuer"));
        assert_eq!(entries[0]["score"], json!(9.0));
        assert_eq!(entries[1]["name"], json!("Alice Auger"));
    }
}
