use std::collections::BTreeSet;

use serde_json::Value;

use crate::core::config::Settings;
use crate::db::models::{ItemPayload, MatchPair};
use crate::db::types::{BoolAnswer, Skill};
use crate::services::normalize::normalize;

/// Skills whose items are auto-graded. Everything else is left for the
/// teacher grading overlay.
#[derive(Debug, Clone)]
pub(crate) struct GradingConfig {
    objective_skills: Vec<Skill>,
}

impl GradingConfig {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let objective_skills = settings
            .grading()
            .objective_skills
            .iter()
            .filter_map(|value| Skill::parse(value))
            .collect::<Vec<_>>();
        Self { objective_skills }
    }

    pub(crate) fn is_objective(&self, skill: Skill) -> bool {
        self.objective_skills.contains(&skill)
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self { objective_skills: vec![Skill::Listening, Skill::Reading] }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GradeResult {
    pub(crate) correct: Option<bool>,
    pub(crate) expected: Vec<String>,
}

impl GradeResult {
    fn ungraded() -> Self {
        Self { correct: None, expected: Vec::new() }
    }
}

/// Grade one submitted payload against an item's answer key. Never panics:
/// a missing or wrong-shaped payload degrades to incorrect (or ungraded for
/// speaking), so one bad answer can never abort a whole submission.
pub(crate) fn grade_item(payload: &ItemPayload, submitted: &Value) -> GradeResult {
    match payload {
        ItemPayload::Mcq { options, answers } | ItemPayload::Heading { options, answers } => {
            grade_choice(options, answers, submitted)
        }
        ItemPayload::TrueFalse { answer } | ItemPayload::YesNoNg { answer } => {
            grade_bool(*answer, submitted)
        }
        ItemPayload::Gap { answers, strict } => grade_gap(answers, *strict, submitted),
        ItemPayload::Matching { pairs } => grade_matching(pairs, submitted),
        ItemPayload::Speaking {} => GradeResult::ungraded(),
    }
}

fn grade_choice(options: &[String], answers: &[String], submitted: &Value) -> GradeResult {
    let expected: Vec<String> =
        answers.iter().map(|raw| resolve_answer_key(options, raw)).collect();

    // The submitted payload goes through the same letter-or-literal
    // resolution as the answer key, so "b" and "London" grade identically.
    let correct = match submitted_text(submitted) {
        Some(text) => expected.contains(&resolve_answer_key(options, &text)),
        None => false,
    };

    GradeResult { correct: Some(correct), expected }
}

/// Authors record choice keys either as an option letter ("a".."d") or as
/// the literal option text. Both encodings resolve into the same normalized
/// comparison space here; a letter with no matching option index falls back
/// to literal text.
fn resolve_answer_key(options: &[String], raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() {
            let index = letter.to_ascii_lowercase() as usize - 'a' as usize;
            if let Some(option) = options.get(index) {
                return normalize(option);
            }
        }
    }
    normalize(trimmed)
}

fn grade_bool(answer: BoolAnswer, submitted: &Value) -> GradeResult {
    let correct = submitted_text(submitted)
        .map(|text| text.trim().to_lowercase() == answer.as_str())
        .unwrap_or(false);

    GradeResult { correct: Some(correct), expected: vec![answer.as_str().to_string()] }
}

fn grade_gap(answers: &[String], strict: bool, submitted: &Value) -> GradeResult {
    let expected: Vec<String> = answers.iter().map(|answer| normalize(answer)).collect();

    let Some(text) = submitted_text(submitted) else {
        return GradeResult { correct: Some(false), expected };
    };

    let normalized = normalize(&text);
    // An empty answer must not match every key by containment.
    if normalized.is_empty() {
        return GradeResult { correct: Some(false), expected };
    }

    let correct = expected.iter().any(|answer| {
        if strict {
            *answer == normalized
        } else {
            *answer == normalized
                || normalized.contains(answer.as_str())
                || answer.contains(normalized.as_str())
        }
    });

    GradeResult { correct: Some(correct), expected }
}

fn grade_matching(pairs: &[MatchPair], submitted: &Value) -> GradeResult {
    let expected_set: BTreeSet<String> =
        pairs.iter().map(|pair| pair_key(&pair.left, &pair.right)).collect();
    let expected: Vec<String> = expected_set.iter().cloned().collect();

    let Some(entries) = submitted.as_array() else {
        return GradeResult { correct: Some(false), expected };
    };

    let mut submitted_set = BTreeSet::new();
    for entry in entries {
        let Some(pair) = entry.as_array() else {
            return GradeResult { correct: Some(false), expected };
        };
        let (Some(left), Some(right)) =
            (pair.first().and_then(Value::as_str), pair.get(1).and_then(Value::as_str))
        else {
            return GradeResult { correct: Some(false), expected };
        };
        submitted_set.insert(pair_key(left, right));
    }

    let correct = submitted_set == expected_set;
    GradeResult { correct: Some(correct), expected }
}

fn pair_key(left: &str, right: &str) -> String {
    format!("{}::{}", normalize(left), normalize(right))
}

fn submitted_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mcq(options: &[&str], answers: &[&str]) -> ItemPayload {
        ItemPayload::Mcq {
            options: options.iter().map(|s| s.to_string()).collect(),
            answers: answers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn mcq_letter_and_text_keys_grade_identically() {
        let item = mcq(&["Paris", "London", "Rome", "Berlin"], &["b"]);

        assert_eq!(grade_item(&item, &json!("London")).correct, Some(true));
        assert_eq!(grade_item(&item, &json!("b")).correct, Some(true));
        assert_eq!(grade_item(&item, &json!("Rome")).correct, Some(false));
        assert_eq!(grade_item(&item, &json!("c")).correct, Some(false));

        let literal = mcq(&["Paris", "London", "Rome", "Berlin"], &["London"]);
        assert_eq!(grade_item(&literal, &json!("london ")).correct, Some(true));
    }

    #[test]
    fn mcq_letter_without_matching_option_is_literal_text() {
        let item = mcq(&["cat", "dog"], &["e"]);
        assert_eq!(grade_item(&item, &json!("e")).correct, Some(true));
        assert_eq!(grade_item(&item, &json!("cat")).correct, Some(false));
    }

    #[test]
    fn mcq_missing_payload_is_incorrect_not_a_panic() {
        let item = mcq(&["cat", "dog"], &["a"]);
        assert_eq!(grade_item(&item, &Value::Null).correct, Some(false));
        assert_eq!(grade_item(&item, &json!({"weird": true})).correct, Some(false));
    }

    #[test]
    fn heading_resolves_letters_like_mcq() {
        let item = ItemPayload::Heading {
            options: vec!["A brief history".to_string(), "Modern usage".to_string()],
            answers: vec!["B".to_string()],
        };
        assert_eq!(grade_item(&item, &json!("modern usage")).correct, Some(true));
    }

    #[test]
    fn bool_items_compare_case_insensitively() {
        let item = ItemPayload::YesNoNg { answer: BoolAnswer::NotGiven };
        assert_eq!(grade_item(&item, &json!("NOT_GIVEN")).correct, Some(true));
        assert_eq!(grade_item(&item, &json!("true")).correct, Some(false));
        assert_eq!(grade_item(&item, &Value::Null).correct, Some(false));

        let item = ItemPayload::TrueFalse { answer: BoolAnswer::True };
        assert_eq!(grade_item(&item, &json!(" True ")).correct, Some(true));
    }

    #[test]
    fn gap_strict_requires_exact_match() {
        let item = ItemPayload::Gap { answers: vec!["seven".to_string()], strict: true };
        assert_eq!(grade_item(&item, &json!("about seven")).correct, Some(false));
        assert_eq!(grade_item(&item, &json!("Seven.")).correct, Some(true));
    }

    #[test]
    fn gap_lenient_accepts_containment_both_ways() {
        let item = ItemPayload::Gap { answers: vec!["seven".to_string()], strict: false };
        assert_eq!(grade_item(&item, &json!("about seven")).correct, Some(true));

        let item = ItemPayload::Gap { answers: vec!["the blue whale".to_string()], strict: false };
        assert_eq!(grade_item(&item, &json!("blue whale")).correct, Some(true));
        assert_eq!(grade_item(&item, &json!("red whale")).correct, Some(false));
    }

    #[test]
    fn gap_empty_payload_never_matches_by_containment() {
        let item = ItemPayload::Gap { answers: vec!["seven".to_string()], strict: false };
        assert_eq!(grade_item(&item, &json!("   ")).correct, Some(false));
        assert_eq!(grade_item(&item, &json!("?!")).correct, Some(false));
    }

    #[test]
    fn matching_is_order_independent() {
        let item = ItemPayload::Matching {
            pairs: vec![
                MatchPair { left: "cat".to_string(), right: "mèo".to_string() },
                MatchPair { left: "dog".to_string(), right: "chó".to_string() },
            ],
        };

        let reordered = json!([["dog", "chó"], ["cat", "mèo"]]);
        assert_eq!(grade_item(&item, &reordered).correct, Some(true));

        let altered = json!([["dog", "mèo"], ["cat", "chó"]]);
        assert_eq!(grade_item(&item, &altered).correct, Some(false));

        let incomplete = json!([["cat", "mèo"]]);
        assert_eq!(grade_item(&item, &incomplete).correct, Some(false));
    }

    #[test]
    fn matching_rejects_malformed_entries() {
        let item = ItemPayload::Matching {
            pairs: vec![MatchPair { left: "cat".to_string(), right: "mèo".to_string() }],
        };
        assert_eq!(grade_item(&item, &json!("cat::mèo")).correct, Some(false));
        assert_eq!(grade_item(&item, &json!([["cat"]])).correct, Some(false));
        assert_eq!(grade_item(&item, &json!([[1, 2]])).correct, Some(false));
    }

    #[test]
    fn speaking_is_never_auto_graded() {
        let item = ItemPayload::Speaking {};
        let result = grade_item(&item, &json!("a recorded answer"));
        assert_eq!(result.correct, None);
        assert!(result.expected.is_empty());
    }

    #[test]
    fn config_defaults_to_listening_and_reading() {
        let config = GradingConfig::default();
        assert!(config.is_objective(Skill::Listening));
        assert!(config.is_objective(Skill::Reading));
        assert!(!config.is_objective(Skill::Writing));
        assert!(!config.is_objective(Skill::Speaking));
        assert!(!config.is_objective(Skill::Mixed));
    }
}
