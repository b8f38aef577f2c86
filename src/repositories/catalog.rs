use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{PracticeItem, PracticeSection, PracticeSet};
use crate::db::types::SetStatus;

pub(crate) const SET_COLUMNS: &str =
    "id, exam_type, title, description, status, created_at, updated_at";

pub(crate) const SECTION_COLUMNS: &str = "\
    id, set_id, skill, order_index, title, audio_url, transcript, \
    show_transcript_after_submit, replay_limit, created_at, updated_at";

pub(crate) const ITEM_COLUMNS: &str =
    "id, section_id, order_index, prompt, payload, created_at, updated_at";

pub(crate) async fn find_set_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<PracticeSet>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSet>(&format!(
        "SELECT {SET_COLUMNS} FROM practice_sets WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_sets(
    pool: &PgPool,
    exam_type: Option<&str>,
    status: Option<SetStatus>,
    skip: i64,
    limit: i64,
) -> Result<Vec<PracticeSet>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {SET_COLUMNS} FROM practice_sets WHERE TRUE"));

    if let Some(exam_type) = exam_type {
        builder.push(" AND exam_type = ").push_bind(exam_type);
    }
    if let Some(status) = status {
        builder.push(" AND status = ").push_bind(status);
    }

    builder.push(" ORDER BY created_at DESC, id ASC");
    builder.push(" OFFSET ").push_bind(skip);
    builder.push(" LIMIT ").push_bind(limit);

    builder.build_query_as::<PracticeSet>().fetch_all(pool).await
}

pub(crate) async fn count_sets(
    pool: &PgPool,
    exam_type: Option<&str>,
    status: Option<SetStatus>,
) -> Result<i64, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM practice_sets WHERE TRUE");

    if let Some(exam_type) = exam_type {
        builder.push(" AND exam_type = ").push_bind(exam_type);
    }
    if let Some(status) = status {
        builder.push(" AND status = ").push_bind(status);
    }

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn find_section_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<PracticeSection>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSection>(&format!(
        "SELECT {SECTION_COLUMNS} FROM practice_sections WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_sections_by_set(
    pool: &PgPool,
    set_id: &str,
) -> Result<Vec<PracticeSection>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSection>(&format!(
        "SELECT {SECTION_COLUMNS}
         FROM practice_sections
         WHERE set_id = $1
         ORDER BY order_index ASC, id ASC"
    ))
    .bind(set_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_items_by_section(
    pool: &PgPool,
    section_id: &str,
) -> Result<Vec<PracticeItem>, sqlx::Error> {
    sqlx::query_as::<_, PracticeItem>(&format!(
        "SELECT {ITEM_COLUMNS}
         FROM practice_items
         WHERE section_id = $1
         ORDER BY order_index ASC"
    ))
    .bind(section_id)
    .fetch_all(pool)
    .await
}

/// Batch lookup for a whole-set grading pass; one query keeps the snapshot
/// internally consistent.
pub(crate) async fn list_items_by_sections(
    pool: &PgPool,
    section_ids: &[String],
) -> Result<Vec<PracticeItem>, sqlx::Error> {
    if section_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, PracticeItem>(&format!(
        "SELECT {ITEM_COLUMNS}
         FROM practice_items
         WHERE section_id = ANY($1)
         ORDER BY section_id ASC, order_index ASC"
    ))
    .bind(section_ids)
    .fetch_all(pool)
    .await
}
