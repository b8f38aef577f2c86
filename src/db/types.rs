use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "setstatus", rename_all = "lowercase")]
pub(crate) enum SetStatus {
    Draft,
    Review,
    Published,
}

/// `Mixed` is only ever recorded on whole-set submissions; catalog sections
/// always carry one of the four real skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "skill", rename_all = "lowercase")]
pub(crate) enum Skill {
    Listening,
    Reading,
    Writing,
    Speaking,
    Mixed,
}

impl Skill {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Skill::Listening => "listening",
            Skill::Reading => "reading",
            Skill::Writing => "writing",
            Skill::Speaking => "speaking",
            Skill::Mixed => "mixed",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "listening" => Some(Skill::Listening),
            "reading" => Some(Skill::Reading),
            "writing" => Some(Skill::Writing),
            "speaking" => Some(Skill::Speaking),
            "mixed" => Some(Skill::Mixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub(crate) enum ItemType {
    #[serde(rename = "mcq")]
    Mcq,
    #[serde(rename = "gap")]
    Gap,
    #[serde(rename = "truefalse")]
    TrueFalse,
    #[serde(rename = "yesno_ng")]
    YesNoNg,
    #[serde(rename = "matching")]
    Matching,
    #[serde(rename = "heading")]
    Heading,
    #[serde(rename = "speaking")]
    Speaking,
}

/// Author-recorded key for truefalse / yesno_ng items. Values are a
/// controlled enumeration, so grading compares them without normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum BoolAnswer {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    #[serde(rename = "not_given")]
    NotGiven,
}

impl BoolAnswer {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BoolAnswer::True => "true",
            BoolAnswer::False => "false",
            BoolAnswer::NotGiven => "not_given",
        }
    }
}
