mod commands;
mod queries;
mod types;

pub(crate) use commands::{apply_teacher_grade, create, delete_by_id};
pub(crate) use queries::{best_per_set, count, find_by_id, latest_for_user_section, leaderboard, list};
pub(crate) use types::{ProgressRow, SubmissionFilter};
