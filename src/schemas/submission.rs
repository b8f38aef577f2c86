use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{GradedAnswer, PracticeSubmission, SubmissionAnalytics};
use crate::db::types::Skill;
use crate::repositories::submissions::ProgressRow;

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct AnswerInput {
    pub(crate) item_id: String,
    #[serde(default)]
    pub(crate) payload: serde_json::Value,
    #[serde(default)]
    pub(crate) time_spent_ms: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmitAnswersRequest {
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub(crate) answers: Vec<AnswerInput>,
    #[serde(default)]
    pub(crate) duration_sec: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherGradeRequest {
    #[validate(range(min = 0.0, message = "teacher_score must be non-negative"))]
    pub(crate) teacher_score: f64,
    pub(crate) teacher_feedback: String,
    pub(crate) graded_by: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherGradeResponse {
    pub(crate) teacher_score: f64,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) graded_by: Option<String>,
    pub(crate) graded_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) is_anonymous: bool,
    pub(crate) exam_type: String,
    pub(crate) skill: Skill,
    pub(crate) set_id: String,
    pub(crate) section_id: Option<String>,
    pub(crate) duration_sec: i32,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) answers: Vec<GradedAnswer>,
    pub(crate) analytics: SubmissionAnalytics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) teacher_grade: Option<TeacherGradeResponse>,
    pub(crate) created_at: String,
}

impl SubmissionResponse {
    pub(crate) fn from_model(submission: PracticeSubmission) -> Self {
        let teacher_grade = submission.teacher_score.map(|teacher_score| TeacherGradeResponse {
            teacher_score,
            teacher_feedback: submission.teacher_feedback.clone(),
            graded_by: submission.graded_by.clone(),
            graded_at: submission.graded_at.map(format_primitive),
        });

        Self {
            id: submission.id,
            user_id: submission.user_id,
            is_anonymous: submission.is_anonymous,
            exam_type: submission.exam_type,
            skill: submission.skill,
            set_id: submission.set_id,
            section_id: submission.section_id,
            duration_sec: submission.duration_sec,
            score: submission.score,
            total: submission.total,
            answers: submission.answers.0,
            analytics: submission.analytics.0,
            teacher_grade,
            created_at: format_primitive(submission.created_at),
        }
    }
}

/// Compact view used by list and leaderboard endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct SubmissionSummaryResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) is_anonymous: bool,
    pub(crate) skill: Skill,
    pub(crate) set_id: String,
    pub(crate) section_id: Option<String>,
    pub(crate) duration_sec: i32,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) teacher_score: Option<f64>,
    pub(crate) created_at: String,
}

impl SubmissionSummaryResponse {
    pub(crate) fn from_model(submission: PracticeSubmission) -> Self {
        Self {
            id: submission.id,
            user_id: submission.user_id,
            is_anonymous: submission.is_anonymous,
            skill: submission.skill,
            set_id: submission.set_id,
            section_id: submission.section_id,
            duration_sec: submission.duration_sec,
            score: submission.score,
            total: submission.total,
            teacher_score: submission.teacher_score,
            created_at: format_primitive(submission.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressEntryResponse {
    pub(crate) set_id: String,
    pub(crate) set_title: Option<String>,
    pub(crate) best_score: i32,
    pub(crate) total: i32,
    pub(crate) last_attempt_at: String,
}

impl ProgressEntryResponse {
    pub(crate) fn from_row(row: ProgressRow) -> Self {
        Self {
            set_id: row.set_id,
            set_title: row.set_title,
            best_score: row.best_score,
            total: row.total,
            last_attempt_at: format_primitive(row.last_attempt_at),
        }
    }
}
