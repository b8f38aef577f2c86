use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{ItemPayload, PracticeItem, PracticeSection, PracticeSet};
use crate::db::types::{ItemType, SetStatus, Skill};

#[derive(Debug, Serialize)]
pub(crate) struct SetSummaryResponse {
    pub(crate) id: String,
    pub(crate) exam_type: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) status: SetStatus,
    pub(crate) created_at: String,
}

impl SetSummaryResponse {
    pub(crate) fn from_model(set: PracticeSet) -> Self {
        Self {
            id: set.id,
            exam_type: set.exam_type,
            title: set.title,
            description: set.description,
            status: set.status,
            created_at: format_primitive(set.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SetDetailResponse {
    pub(crate) id: String,
    pub(crate) exam_type: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) status: SetStatus,
    pub(crate) sections: Vec<SectionResponse>,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SectionResponse {
    pub(crate) id: String,
    pub(crate) set_id: String,
    pub(crate) skill: Skill,
    pub(crate) order_index: i32,
    pub(crate) title: String,
    pub(crate) audio_url: Option<String>,
    pub(crate) transcript: Option<String>,
    pub(crate) show_transcript_after_submit: bool,
    pub(crate) replay_limit: Option<i32>,
    pub(crate) items: Vec<ItemResponse>,
}

impl SectionResponse {
    pub(crate) fn from_model(section: PracticeSection, items: Vec<PracticeItem>) -> Self {
        Self {
            id: section.id,
            set_id: section.set_id,
            skill: section.skill,
            order_index: section.order_index,
            title: section.title,
            audio_url: section.audio_url,
            transcript: section.transcript,
            show_transcript_after_submit: section.show_transcript_after_submit,
            replay_limit: section.replay_limit,
            items: items.into_iter().map(ItemResponse::from_model).collect(),
        }
    }
}

/// Learner-facing view of an item: the answer key never leaves the server.
/// Matching items expose the right-hand column sorted so the correct
/// pairing cannot be read off the response.
#[derive(Debug, Serialize)]
pub(crate) struct ItemResponse {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) order_index: i32,
    pub(crate) item_type: ItemType,
    pub(crate) prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) match_left: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) match_right: Option<Vec<String>>,
}

impl ItemResponse {
    pub(crate) fn from_model(item: PracticeItem) -> Self {
        let item_type = item.payload.item_type();
        let (options, match_left, match_right) = match item.payload.0 {
            ItemPayload::Mcq { options, .. } | ItemPayload::Heading { options, .. } => {
                (Some(options), None, None)
            }
            ItemPayload::Matching { pairs } => {
                let left: Vec<String> = pairs.iter().map(|pair| pair.left.clone()).collect();
                let mut right: Vec<String> =
                    pairs.into_iter().map(|pair| pair.right).collect();
                right.sort();
                (None, Some(left), Some(right))
            }
            ItemPayload::TrueFalse { .. }
            | ItemPayload::YesNoNg { .. }
            | ItemPayload::Gap { .. }
            | ItemPayload::Speaking {} => (None, None, None),
        };

        Self {
            id: item.id,
            section_id: item.section_id,
            order_index: item.order_index,
            item_type,
            prompt: item.prompt,
            options,
            match_left,
            match_right,
        }
    }
}
