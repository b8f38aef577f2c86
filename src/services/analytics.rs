use std::collections::BTreeMap;

use crate::db::models::{GradedAnswer, SubmissionAnalytics};
use crate::db::types::Skill;
use crate::services::grading::GradingConfig;

/// Derive per-submission analytics from a graded answer list.
///
/// `accuracy` is only meaningful for auto-graded skills and stays `None`
/// otherwise. Answers whose item was missing from the catalog carry no
/// `item_type` and are skipped by accuracy and the per-type breakdown, but
/// the time spent on them still counts. Whole-set submissions pass
/// `per_type = false` and get no per-type breakdown at all.
pub(crate) fn aggregate(
    answers: &[GradedAnswer],
    skill: Skill,
    config: &GradingConfig,
    per_type: bool,
) -> SubmissionAnalytics {
    let graded: Vec<&GradedAnswer> =
        answers.iter().filter(|answer| answer.item_type.is_some()).collect();

    // Only answers that were actually auto-graded enter the accuracy ratio;
    // a speaking item inside a listening section stays out of it.
    let accuracy = if config.is_objective(skill) {
        let gradable = graded.iter().filter(|answer| answer.correct.is_some()).count();
        let correct = graded.iter().filter(|answer| answer.correct == Some(true)).count();
        Some(round2(correct as f64 / gradable.max(1) as f64))
    } else {
        None
    };

    let time_total: i64 = answers.iter().map(|answer| answer.time_spent_ms.max(0)).sum();
    let avg_time_per_item_ms = time_total as f64 / answers.len().max(1) as f64;

    let mut by_type = BTreeMap::new();
    if per_type {
        let mut groups: BTreeMap<_, (usize, usize)> = BTreeMap::new();
        for answer in &graded {
            let Some(item_type) = answer.item_type else { continue };
            let entry = groups.entry(item_type).or_default();
            entry.1 += 1;
            if answer.correct == Some(true) {
                entry.0 += 1;
            }
        }
        for (item_type, (correct, total)) in groups {
            by_type.insert(item_type, round2(correct as f64 / total as f64));
        }
    }

    SubmissionAnalytics { accuracy, avg_time_per_item_ms, by_type }
}

/// Ratios are rounded to two decimals for stable, comparable output.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
