//! Quiz definitions, detailed attempt records and the lightweight
//! summaries embedded in user profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CourseId, QuestionId, QuizId, UserId};

/// A quiz definition, owned by the (external) quiz catalogue. The core
/// only ever reads it to resolve the course link and the title snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub course_id: CourseId,
    pub quiz_title: String,
}

/// One answered question inside a detailed attempt record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// Option key the student picked ("A", "B", "C", "D").
    pub selected_answer: String,
    /// Stored for fast result rendering; optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// Immutable detailed record of a single quiz attempt.
///
/// The pair (`user_id`, `quiz_id`) is unique across the store; the
/// record is created exactly once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserQuizRecord {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub quiz_id: QuizId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub score: f64,
    pub total_answered: u32,
    pub right_answers: u32,
    pub wrong_answers: u32,
    /// Ordered full answer breakdown.
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

/// Lightweight attempt summary embedded in the user profile.
///
/// A denormalised, read-optimised copy written by the same operation
/// that writes the detailed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptSummary {
    pub quiz_id: QuizId,
    /// Quiz title snapshot taken at submission time.
    pub quiz_title: String,
    pub score: f64,
    pub total_answered: u32,
    pub right_answers: u32,
    pub wrong_answers: u32,
    pub submitted_at: DateTime<Utc>,
    /// Optional detail breakdown carried by legacy embedded records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<AnswerRecord>>,
}

/// Shape returned by the submission lookup, covering both the detailed
/// store and the legacy embedded-summary fallback (which lacks a course
/// link and a start time).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmissionView {
    pub user_id: UserId,
    pub quiz_id: QuizId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    pub score: f64,
    pub total_answered: u32,
    pub right_answers: u32,
    pub wrong_answers: u32,
    pub answers: Vec<AnswerRecord>,
}

impl From<UserQuizRecord> for QuizSubmissionView {
    fn from(record: UserQuizRecord) -> Self {
        Self {
            user_id: record.user_id,
            quiz_id: record.quiz_id,
            course_id: Some(record.course_id),
            started_at: Some(record.started_at),
            finished_at: record.finished_at,
            score: record.score,
            total_answered: record.total_answered,
            right_answers: record.right_answers,
            wrong_answers: record.wrong_answers,
            answers: record.answers,
        }
    }
}

impl QuizSubmissionView {
    /// Shape a legacy embedded summary to look like a detailed record.
    pub fn from_summary(user_id: UserId, summary: QuizAttemptSummary) -> Self {
        Self {
            user_id,
            quiz_id: summary.quiz_id,
            course_id: None,
            started_at: None,
            finished_at: summary.submitted_at,
            score: summary.score,
            total_answered: summary.total_answered,
            right_answers: summary.right_answers,
            wrong_answers: summary.wrong_answers,
            answers: summary.details.unwrap_or_default(),
        }
    }
}

/// One row of the per-quiz leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub score: f64,
    pub right_answers: u32,
    pub wrong_answers: u32,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(quiz_id: QuizId) -> QuizAttemptSummary {
        QuizAttemptSummary {
            quiz_id,
            quiz_title: "Kinematics".to_owned(),
            score: 7.5,
            total_answered: 10,
            right_answers: 8,
            wrong_answers: 2,
            submitted_at: Utc::now(),
            details: None,
        }
    }

    #[test]
    fn view_from_summary_has_no_course_link() {
        let user_id = UserId::random();
        let quiz_id = QuizId::random();
        let view = QuizSubmissionView::from_summary(user_id, summary(quiz_id));

        assert_eq!(view.user_id, user_id);
        assert_eq!(view.quiz_id, quiz_id);
        assert!(view.course_id.is_none());
        assert!(view.started_at.is_none());
        assert!(view.answers.is_empty());
    }

    #[test]
    fn view_from_record_keeps_the_breakdown() {
        let record = UserQuizRecord {
            user_id: UserId::random(),
            course_id: CourseId::random(),
            quiz_id: QuizId::random(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            score: 5.0,
            total_answered: 5,
            right_answers: 5,
            wrong_answers: 0,
            answers: vec![AnswerRecord {
                question_id: QuestionId::random(),
                selected_answer: "B".to_owned(),
                correct_answer: Some("B".to_owned()),
                score: 1.0,
            }],
        };

        let view = QuizSubmissionView::from(record.clone());
        assert_eq!(view.course_id, Some(record.course_id));
        assert_eq!(view.answers.len(), 1);
    }
}
