use time::PrimitiveDateTime;

use crate::db::types::Skill;

pub(crate) const COLUMNS: &str = "\
    id, user_id, is_anonymous, exam_type, skill, set_id, section_id, duration_sec, \
    answers, score, total, analytics, teacher_score, teacher_feedback, graded_by, \
    graded_at, created_at";

/// Filters for the submission list endpoint; all optional, combined with AND.
#[derive(Debug, Default)]
pub(crate) struct SubmissionFilter<'a> {
    pub(crate) user_id: Option<&'a str>,
    pub(crate) set_id: Option<&'a str>,
    pub(crate) section_id: Option<&'a str>,
    pub(crate) skill: Option<Skill>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProgressRow {
    pub(crate) set_id: String,
    pub(crate) set_title: Option<String>,
    pub(crate) best_score: i32,
    pub(crate) total: i32,
    pub(crate) last_attempt_at: PrimitiveDateTime,
}
