use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::PracticeSubmission;

use super::types::{ProgressRow, SubmissionFilter, COLUMNS};

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<PracticeSubmission>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSubmission>(&format!(
        "SELECT {COLUMNS} FROM practice_submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &SubmissionFilter<'_>,
    skip: i64,
    limit: i64,
) -> Result<Vec<PracticeSubmission>, sqlx::Error> {
    let mut builder = filtered_query(
        format!("SELECT {COLUMNS} FROM practice_submissions WHERE TRUE"),
        filter,
    );

    builder.push(" ORDER BY created_at DESC, id ASC");
    builder.push(" OFFSET ").push_bind(skip);
    builder.push(" LIMIT ").push_bind(limit);

    builder.build_query_as::<PracticeSubmission>().fetch_all(pool).await
}

pub(crate) async fn count(
    pool: &PgPool,
    filter: &SubmissionFilter<'_>,
) -> Result<i64, sqlx::Error> {
    let mut builder =
        filtered_query("SELECT COUNT(*) FROM practice_submissions WHERE TRUE".to_string(), filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Most recent attempt for a (user, section) pair; teachers use this to
/// locate the attempt awaiting subjective grading.
pub(crate) async fn latest_for_user_section(
    pool: &PgPool,
    user_id: &str,
    section_id: &str,
) -> Result<Option<PracticeSubmission>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSubmission>(&format!(
        "SELECT {COLUMNS}
         FROM practice_submissions
         WHERE user_id = $1 AND section_id = $2
         ORDER BY created_at DESC
         LIMIT 1"
    ))
    .bind(user_id)
    .bind(section_id)
    .fetch_optional(pool)
    .await
}

/// Best attempt per set for one user: highest score, ties broken by the
/// earliest attempt, ordered by recency of that best attempt.
pub(crate) async fn best_per_set(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<ProgressRow>, sqlx::Error> {
    sqlx::query_as::<_, ProgressRow>(
        "SELECT best.set_id, best.set_title, best.best_score, best.total, best.last_attempt_at
         FROM (
             SELECT DISTINCT ON (s.set_id)
                    s.set_id,
                    ps.title AS set_title,
                    s.score AS best_score,
                    s.total,
                    s.created_at AS last_attempt_at
             FROM practice_submissions s
             LEFT JOIN practice_sets ps ON ps.id = s.set_id
             WHERE s.user_id = $1
             ORDER BY s.set_id, s.score DESC, s.created_at ASC
         ) best
         ORDER BY best.last_attempt_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Top attempts for a set: score first, faster attempts win ties, earlier
/// attempts win remaining ties.
pub(crate) async fn leaderboard(
    pool: &PgPool,
    set_id: &str,
    limit: i64,
) -> Result<Vec<PracticeSubmission>, sqlx::Error> {
    sqlx::query_as::<_, PracticeSubmission>(&format!(
        "SELECT {COLUMNS}
         FROM practice_submissions
         WHERE set_id = $1
         ORDER BY score DESC, duration_sec ASC, created_at ASC
         LIMIT $2"
    ))
    .bind(set_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

fn filtered_query<'a>(
    base: String,
    filter: &SubmissionFilter<'a>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(base);

    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.to_string());
    }
    if let Some(set_id) = filter.set_id {
        builder.push(" AND set_id = ").push_bind(set_id.to_string());
    }
    if let Some(section_id) = filter.section_id {
        builder.push(" AND section_id = ").push_bind(section_id.to_string());
    }
    if let Some(skill) = filter.skill {
        builder.push(" AND skill = ").push_bind(skill);
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    use crate::core::time::primitive_now_utc;
    use crate::repositories::submissions::create;
    use crate::test_support;

    #[tokio::test]
    async fn resubmission_keeps_every_attempt_and_progress_takes_the_best() {
        let Some(pool) = test_support::db_pool().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };

        let user_id = Uuid::new_v4().to_string();
        let set_id = Uuid::new_v4().to_string();
        let now = primitive_now_utc();

        let first =
            test_support::graded_submission(&user_id, &set_id, 2, 900, now - Duration::minutes(10));
        let second = test_support::graded_submission(&user_id, &set_id, 4, 700, now);
        create(&pool, &first).await.expect("insert first attempt");
        create(&pool, &second).await.expect("insert second attempt");

        // Both attempts stay retrievable; nothing is overwritten.
        assert!(find_by_id(&pool, &first.id).await.expect("find first").is_some());
        assert!(find_by_id(&pool, &second.id).await.expect("find second").is_some());

        let progress = best_per_set(&pool, &user_id).await.expect("progress");
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].set_id, set_id);
        assert_eq!(progress[0].best_score, 4);
        assert_eq!(progress[0].total, 4);
    }

    #[tokio::test]
    async fn leaderboard_orders_by_score_then_speed_then_earliest() {
        let Some(pool) = test_support::db_pool().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };

        let set_id = Uuid::new_v4().to_string();
        let now = primitive_now_utc();

        let slow_top = test_support::graded_submission(
            &Uuid::new_v4().to_string(),
            &set_id,
            5,
            900,
            now - Duration::minutes(3),
        );
        let fast_top = test_support::graded_submission(
            &Uuid::new_v4().to_string(),
            &set_id,
            5,
            400,
            now - Duration::minutes(2),
        );
        let lower = test_support::graded_submission(
            &Uuid::new_v4().to_string(),
            &set_id,
            3,
            100,
            now - Duration::minutes(1),
        );
        create(&pool, &slow_top).await.expect("insert slow top");
        create(&pool, &fast_top).await.expect("insert fast top");
        create(&pool, &lower).await.expect("insert lower");

        let board = leaderboard(&pool, &set_id, 10).await.expect("leaderboard");
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].id, fast_top.id);
        assert_eq!(board[1].id, slow_top.id);
        assert_eq!(board[2].id, lower.id);
    }
}
