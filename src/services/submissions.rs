use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::db::models::{GradedAnswer, ItemPayload, SubmissionAnalytics};
use crate::db::types::Skill;
use crate::services::analytics;
use crate::services::grading::{grade_item, GradingConfig};

/// One catalog item as seen by a single grading pass, tagged with the skill
/// of its owning section. The whole pass works from one snapshot, so a
/// half-updated catalog can never grade one submission inconsistently.
#[derive(Debug)]
pub(crate) struct CatalogEntry<'a> {
    pub(crate) payload: &'a ItemPayload,
    pub(crate) skill: Skill,
}

#[derive(Debug)]
pub(crate) struct SubmittedAnswer {
    pub(crate) item_id: String,
    pub(crate) payload: Value,
    pub(crate) time_spent_ms: i64,
}

#[derive(Debug)]
pub(crate) struct GradedOutcome {
    pub(crate) answers: Vec<GradedAnswer>,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) analytics: SubmissionAnalytics,
}

/// Grade a full answer list against a catalog snapshot.
///
/// Answers for unknown item ids are recorded ungraded with an explanatory
/// note and never fail the rest of the submission. Items in subjective
/// sections are left ungraded for the teacher overlay. `total` counts the
/// auto-graded answers, floored at 1 so downstream ratios cannot divide by
/// zero.
pub(crate) fn grade_submission(
    catalog: &HashMap<String, CatalogEntry<'_>>,
    answers: Vec<SubmittedAnswer>,
    skill: Skill,
    config: &GradingConfig,
    per_type: bool,
) -> GradedOutcome {
    let mut graded = Vec::with_capacity(answers.len());

    for submitted in answers {
        let time_spent_ms = submitted.time_spent_ms.max(0);

        let Some(entry) = catalog.get(&submitted.item_id) else {
            tracing::warn!(
                item_id = %submitted.item_id,
                "submitted answer references an item missing from the catalog"
            );
            graded.push(GradedAnswer {
                item_id: submitted.item_id,
                item_type: None,
                payload: submitted.payload,
                correct: None,
                expected: Vec::new(),
                explanation: Some("item not found in catalog".to_string()),
                time_spent_ms,
            });
            continue;
        };

        let (correct, expected) = if config.is_objective(entry.skill) {
            let result = grade_item(entry.payload, &submitted.payload);
            (result.correct, result.expected)
        } else {
            // Subjective lanes keep the raw payload for human grading.
            (None, Vec::new())
        };

        graded.push(GradedAnswer {
            item_id: submitted.item_id,
            item_type: Some(entry.payload.item_type()),
            payload: submitted.payload,
            correct,
            expected,
            explanation: None,
            time_spent_ms,
        });
    }

    let score = graded.iter().filter(|answer| answer.correct == Some(true)).count() as i32;
    let total = graded.iter().filter(|answer| answer.correct.is_some()).count().max(1) as i32;
    let analytics = analytics::aggregate(&graded, skill, config, per_type);

    GradedOutcome { answers: graded, score, total, analytics }
}

/// Accept the caller-supplied user id when it is a well-formed UUID;
/// otherwise mint a synthetic anonymous id so the attempt can still be
/// persisted and scored. The flag marks the submission as unattributable.
pub(crate) fn resolve_identity(raw: Option<&str>) -> (String, bool) {
    if let Some(id) = raw {
        let trimmed = id.trim();
        if Uuid::parse_str(trimmed).is_ok() {
            return (trimmed.to_string(), false);
        }
    }

    let synthetic = format!("anon-{}", Uuid::new_v4());
    tracing::warn!(
        user_id = %synthetic,
        "caller identity unusable; recording submission under a synthetic id"
    );
    (synthetic, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MatchPair;
    use crate::db::types::{BoolAnswer, ItemType};
    use serde_json::json;

    fn submitted(item_id: &str, payload: Value, time_spent_ms: i64) -> SubmittedAnswer {
        SubmittedAnswer { item_id: item_id.to_string(), payload, time_spent_ms }
    }

    #[test]
    fn listening_section_end_to_end() {
        let mcq = ItemPayload::Mcq {
            options: vec!["cat".to_string(), "dog".to_string()],
            answers: vec!["a".to_string()],
        };
        let gap = ItemPayload::Gap { answers: vec!["blue".to_string()], strict: false };

        let mut catalog = HashMap::new();
        catalog.insert(
            "item-a".to_string(),
            CatalogEntry { payload: &mcq, skill: Skill::Listening },
        );
        catalog.insert(
            "item-b".to_string(),
            CatalogEntry { payload: &gap, skill: Skill::Listening },
        );

        let answers = vec![
            submitted("item-a", json!("cat"), 4000),
            submitted("item-b", json!("it is blue-ish"), 6000),
        ];

        let outcome = grade_submission(
            &catalog,
            answers,
            Skill::Listening,
            &GradingConfig::default(),
            true,
        );

        assert_eq!(outcome.answers[0].correct, Some(true));
        assert_eq!(outcome.answers[1].correct, Some(true));
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.analytics.accuracy, Some(1.0));
        assert_eq!(outcome.analytics.avg_time_per_item_ms, 5000.0);
        assert_eq!(outcome.analytics.by_type.get(&ItemType::Mcq), Some(&1.0));
        assert_eq!(outcome.analytics.by_type.get(&ItemType::Gap), Some(&1.0));
    }

    #[test]
    fn writing_answers_are_left_for_the_teacher() {
        let payload = ItemPayload::Gap { answers: vec!["unused".to_string()], strict: true };
        let mut catalog = HashMap::new();
        catalog
            .insert("essay".to_string(), CatalogEntry { payload: &payload, skill: Skill::Writing });

        let answers = vec![submitted("essay", json!("my essay text"), 120_000)];
        let outcome =
            grade_submission(&catalog, answers, Skill::Writing, &GradingConfig::default(), true);

        assert_eq!(outcome.answers[0].correct, None);
        assert!(outcome.answers[0].expected.is_empty());
        assert_eq!(outcome.answers[0].payload, json!("my essay text"));
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.analytics.accuracy, None);
    }

    #[test]
    fn unknown_item_is_recorded_but_never_counted() {
        let mcq = ItemPayload::Mcq {
            options: vec!["cat".to_string(), "dog".to_string()],
            answers: vec!["a".to_string()],
        };
        let mut catalog = HashMap::new();
        catalog.insert("known".to_string(), CatalogEntry { payload: &mcq, skill: Skill::Reading });

        let answers = vec![
            submitted("known", json!("cat"), 1000),
            submitted("ghost", json!("anything"), 3000),
        ];

        let outcome =
            grade_submission(&catalog, answers, Skill::Reading, &GradingConfig::default(), true);

        assert_eq!(outcome.answers.len(), 2);
        let ghost = &outcome.answers[1];
        assert_eq!(ghost.correct, None);
        assert_eq!(ghost.item_type, None);
        assert_eq!(ghost.explanation.as_deref(), Some("item not found in catalog"));

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.analytics.accuracy, Some(1.0));
        assert_eq!(outcome.analytics.avg_time_per_item_ms, 2000.0);
    }

    #[test]
    fn mixed_set_pass_skips_per_type_analytics() {
        let matching = ItemPayload::Matching {
            pairs: vec![MatchPair { left: "cat".to_string(), right: "mèo".to_string() }],
        };
        let tf = ItemPayload::TrueFalse { answer: BoolAnswer::False };

        let mut catalog = HashMap::new();
        catalog.insert(
            "m1".to_string(),
            CatalogEntry { payload: &matching, skill: Skill::Reading },
        );
        catalog.insert("t1".to_string(), CatalogEntry { payload: &tf, skill: Skill::Listening });

        let answers = vec![
            submitted("m1", json!([["cat", "mèo"]]), 2000),
            submitted("t1", json!("false"), 1000),
        ];

        let outcome =
            grade_submission(&catalog, answers, Skill::Mixed, &GradingConfig::default(), false);

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.analytics.accuracy, None);
        assert!(outcome.analytics.by_type.is_empty());
    }

    #[test]
    fn resolve_identity_accepts_uuid_and_synthesizes_otherwise() {
        let real = Uuid::new_v4().to_string();
        assert_eq!(resolve_identity(Some(&real)), (real.clone(), false));

        let (synthetic, anonymous) = resolve_identity(Some("demo-session"));
        assert!(anonymous);
        assert!(synthetic.starts_with("anon-"));

        let (first, _) = resolve_identity(None);
        let (second, _) = resolve_identity(None);
        assert_ne!(first, second);
    }
}
