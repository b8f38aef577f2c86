use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{BoolAnswer, ItemType, SetStatus, Skill};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PracticeSet {
    pub(crate) id: String,
    pub(crate) exam_type: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) status: SetStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// One skill lane within a set. The audio/transcript/replay fields are
/// presentation config consumed verbatim by clients; the grader never reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PracticeSection {
    pub(crate) id: String,
    pub(crate) set_id: String,
    pub(crate) skill: Skill,
    pub(crate) order_index: i32,
    pub(crate) title: String,
    pub(crate) audio_url: Option<String>,
    pub(crate) transcript: Option<String>,
    pub(crate) show_transcript_after_submit: bool,
    pub(crate) replay_limit: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PracticeItem {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) order_index: i32,
    pub(crate) prompt: String,
    pub(crate) payload: Json<ItemPayload>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Type-dependent answer key, stored as tagged JSON on the item row.
/// Every new item type must be handled explicitly by the grader's match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ItemPayload {
    /// `answers` entries may be option letters ("a".."d") or literal option
    /// text; both encodings grade identically.
    #[serde(rename = "mcq")]
    Mcq { options: Vec<String>, answers: Vec<String> },
    #[serde(rename = "heading")]
    Heading { options: Vec<String>, answers: Vec<String> },
    #[serde(rename = "truefalse")]
    TrueFalse { answer: BoolAnswer },
    #[serde(rename = "yesno_ng")]
    YesNoNg { answer: BoolAnswer },
    #[serde(rename = "gap")]
    Gap {
        answers: Vec<String>,
        #[serde(default)]
        strict: bool,
    },
    #[serde(rename = "matching")]
    Matching { pairs: Vec<MatchPair> },
    /// No machine-checkable answer; graded only by a human.
    #[serde(rename = "speaking")]
    Speaking {},
}

impl ItemPayload {
    pub(crate) fn item_type(&self) -> ItemType {
        match self {
            ItemPayload::Mcq { .. } => ItemType::Mcq,
            ItemPayload::Heading { .. } => ItemType::Heading,
            ItemPayload::TrueFalse { .. } => ItemType::TrueFalse,
            ItemPayload::YesNoNg { .. } => ItemType::YesNoNg,
            ItemPayload::Gap { .. } => ItemType::Gap,
            ItemPayload::Matching { .. } => ItemType::Matching,
            ItemPayload::Speaking {} => ItemType::Speaking,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MatchPair {
    pub(crate) left: String,
    pub(crate) right: String,
}

/// One graded answer inside a submission. `item_type` is `None` when the
/// referenced item was missing from the catalog at grading time; such
/// answers stay in the record but never count toward score or analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GradedAnswer {
    pub(crate) item_id: String,
    pub(crate) item_type: Option<ItemType>,
    pub(crate) payload: serde_json::Value,
    pub(crate) correct: Option<bool>,
    pub(crate) expected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) explanation: Option<String>,
    #[serde(default)]
    pub(crate) time_spent_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SubmissionAnalytics {
    pub(crate) accuracy: Option<f64>,
    pub(crate) avg_time_per_item_ms: f64,
    #[serde(default)]
    pub(crate) by_type: BTreeMap<ItemType, f64>,
}

/// A recorded attempt. Answers, score and analytics are immutable once the
/// row exists; only the teacher-grade columns may change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PracticeSubmission {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) is_anonymous: bool,
    pub(crate) exam_type: String,
    pub(crate) skill: Skill,
    pub(crate) set_id: String,
    pub(crate) section_id: Option<String>,
    pub(crate) duration_sec: i32,
    pub(crate) answers: Json<Vec<GradedAnswer>>,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) analytics: Json<SubmissionAnalytics>,
    pub(crate) teacher_score: Option<f64>,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) graded_by: Option<String>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
}
