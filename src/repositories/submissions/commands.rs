use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::PracticeSubmission;

use super::types::COLUMNS;

pub(crate) async fn create(
    pool: &PgPool,
    submission: &PracticeSubmission,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO practice_submissions (
            id, user_id, is_anonymous, exam_type, skill, set_id, section_id, duration_sec,
            answers, score, total, analytics, teacher_score, teacher_feedback, graded_by,
            graded_at, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17)",
    )
    .bind(&submission.id)
    .bind(&submission.user_id)
    .bind(submission.is_anonymous)
    .bind(&submission.exam_type)
    .bind(submission.skill)
    .bind(&submission.set_id)
    .bind(&submission.section_id)
    .bind(submission.duration_sec)
    .bind(&submission.answers)
    .bind(submission.score)
    .bind(submission.total)
    .bind(&submission.analytics)
    .bind(submission.teacher_score)
    .bind(&submission.teacher_feedback)
    .bind(&submission.graded_by)
    .bind(submission.graded_at)
    .bind(submission.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM practice_submissions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Attach (or replace) the teacher grade. Last write wins; the original
/// answers, score and analytics columns are never touched.
pub(crate) async fn apply_teacher_grade(
    pool: &PgPool,
    id: &str,
    teacher_score: f64,
    teacher_feedback: &str,
    graded_by: &str,
    graded_at: PrimitiveDateTime,
) -> Result<Option<PracticeSubmission>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSubmission>(&format!(
        "UPDATE practice_submissions
         SET teacher_score = $1, teacher_feedback = $2, graded_by = $3, graded_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(teacher_score)
    .bind(teacher_feedback)
    .bind(graded_by)
    .bind(graded_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::core::time::primitive_now_utc;
    use crate::test_support;

    #[tokio::test]
    async fn teacher_grade_overlay_leaves_auto_results_untouched() {
        let Some(pool) = test_support::db_pool().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };

        let user_id = Uuid::new_v4().to_string();
        let set_id = Uuid::new_v4().to_string();
        let submission =
            test_support::graded_submission(&user_id, &set_id, 3, 600, primitive_now_utc());
        create(&pool, &submission).await.expect("insert submission");

        let graded = apply_teacher_grade(
            &pool,
            &submission.id,
            6.5,
            "solid structure, weak conclusion",
            "teacher-1",
            primitive_now_utc(),
        )
        .await
        .expect("apply grade")
        .expect("graded row");

        assert_eq!(graded.score, submission.score);
        assert_eq!(graded.total, submission.total);
        assert_eq!(graded.analytics.0, submission.analytics.0);
        assert_eq!(
            serde_json::to_value(&graded.answers.0).expect("answers json"),
            serde_json::to_value(&submission.answers.0).expect("answers json"),
        );
        assert_eq!(graded.teacher_score, Some(6.5));
        assert_eq!(graded.teacher_feedback.as_deref(), Some("solid structure, weak conclusion"));
        assert_eq!(graded.graded_by.as_deref(), Some("teacher-1"));
        assert!(graded.graded_at.is_some());

        // A second grade replaces the overlay, still without touching the
        // auto-graded results.
        let regraded = apply_teacher_grade(
            &pool,
            &submission.id,
            7.0,
            "second pass",
            "teacher-2",
            primitive_now_utc(),
        )
        .await
        .expect("apply second grade")
        .expect("regraded row");

        assert_eq!(regraded.teacher_score, Some(7.0));
        assert_eq!(regraded.graded_by.as_deref(), Some("teacher-2"));
        assert_eq!(regraded.score, submission.score);
        assert_eq!(regraded.total, submission.total);
        assert_eq!(regraded.analytics.0, submission.analytics.0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let Some(pool) = test_support::db_pool().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };

        let user_id = Uuid::new_v4().to_string();
        let set_id = Uuid::new_v4().to_string();
        let submission =
            test_support::graded_submission(&user_id, &set_id, 1, 120, primitive_now_utc());
        create(&pool, &submission).await.expect("insert submission");

        assert_eq!(delete_by_id(&pool, &submission.id).await.expect("delete"), 1);
        assert_eq!(delete_by_id(&pool, &submission.id).await.expect("repeat delete"), 0);
    }
}
