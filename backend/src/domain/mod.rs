//! Domain primitives, aggregates and services.
//!
//! The domain owns the enrollment workflow, the quiz submission
//! recorder and the plan calculator. It talks to the backing document
//! store exclusively through the ports in [`ports`], so adapters stay
//! swappable and services stay testable without I/O.

pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod ids;
pub mod plan;
pub mod ports;
pub mod quiz;
pub mod quiz_service;
pub mod user;

pub use self::enrollment::{EnrollmentRequest, RequestStatus, SubmitEnrollment};
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{CourseId, EnrollmentRequestId, QuestionId, QuizId, UserId};
pub use self::plan::{expiry_from, PlanCode, UnknownPlanCode};
pub use self::quiz::{
    AnswerRecord, LeaderboardEntry, Quiz, QuizAttemptSummary, QuizSubmissionView, UserQuizRecord,
};
pub use self::quiz_service::QuizResultService;
pub use self::user::{
    AccountStatus, CourseAccessGrant, PaymentInfo, PaymentMethod, User, UserRole,
};
