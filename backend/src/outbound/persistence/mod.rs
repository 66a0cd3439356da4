//! Document-store adapters.
//!
//! The production deployment fronts a document database; these
//! in-process adapters implement the same ports with the same atomic
//! primitives (conditional status transition, uniqueness constraint on
//! attempts, targeted list append), so every guarantee the services
//! rely on is provided by the store layer rather than by application
//! locks.

mod memory_enrollment_request_repository;
mod memory_quiz_record_repository;
mod memory_quiz_repository;
mod memory_user_repository;

pub use memory_enrollment_request_repository::MemoryEnrollmentRequestRepository;
pub use memory_quiz_record_repository::MemoryQuizRecordRepository;
pub use memory_quiz_repository::MemoryQuizRepository;
pub use memory_user_repository::MemoryUserRepository;
