//! Thought record model.
//!
//! Defines [`ThoughtStage`] (the five fixed stages of a reasoning sequence),
//! [`ThoughtFields`] (unvalidated caller input) and [`Thought`] (an immutable,
//! validated record), plus conversion to and from the persisted JSON form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Persisted key names. The snake_case variants are accepted on read only.
mod keys {
    pub const TEXT: &str = "thought";
    pub const SEQUENCE: &[&str] = &["thoughtNumber", "thought_number"];
    pub const TOTAL: &[&str] = &["totalThoughts", "total_thoughts"];
    pub const CONTINUATION: &[&str] = &["nextThoughtNeeded", "next_thought_needed"];
    pub const STAGE: &str = "stage";
    pub const TAGS: &str = "tags";
    pub const PRINCIPLES: &[&str] = &["axiomsUsed", "axioms_used"];
    pub const ASSUMPTIONS: &[&str] = &["assumptionsChallenged", "assumptions_challenged"];
    pub const TIMESTAMP: &str = "timestamp";
    pub const ID: &str = "id";
}

/// Where in a reasoning process a thought belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThoughtStage {
    #[serde(rename = "Problem Definition")]
    ProblemDefinition,
    Research,
    Analysis,
    Synthesis,
    Conclusion,
}

impl ThoughtStage {
    pub const ALL: [ThoughtStage; 5] = [
        Self::ProblemDefinition,
        Self::Research,
        Self::Analysis,
        Self::Synthesis,
        Self::Conclusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProblemDefinition => "Problem Definition",
            Self::Research => "Research",
            Self::Analysis => "Analysis",
            Self::Synthesis => "Synthesis",
            Self::Conclusion => "Conclusion",
        }
    }

    /// Comma-separated display names of every stage, in canonical order.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ThoughtStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThoughtStage {
    type Err = ValidationError;

    /// Case-insensitive match against the display names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().to_lowercase() == wanted)
            .ok_or_else(|| ValidationError::UnknownStage(s.to_string()))
    }
}

/// Caller-supplied thought input, before validation.
///
/// Numbers are signed so that non-positive input can be reported rather than
/// rejected at deserialization time. Deserializes from the `process_thought`
/// argument names; `created_at` and `id` are never taken from callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtFields {
    #[serde(rename = "thought")]
    pub text: String,
    #[serde(rename = "thoughtNumber")]
    pub sequence_number: i64,
    #[serde(rename = "totalThoughts")]
    pub total_sequence_length: i64,
    #[serde(rename = "nextThoughtNeeded")]
    pub continuation: bool,
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "axiomsUsed", default, deserialize_with = "null_as_empty")]
    pub principles_applied: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assumptions_challenged: Vec<String>,
    /// ISO 8601 creation time. Defaults to now.
    #[serde(skip)]
    pub created_at: Option<String>,
    /// Defaults to a fresh UUID v4.
    #[serde(skip)]
    pub id: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One validated, immutable record in a reasoning sequence.
///
/// Equality and hashing consider only the id.
#[derive(Debug, Clone)]
pub struct Thought {
    id: String,
    text: String,
    sequence_number: u32,
    total_sequence_length: u32,
    continuation: bool,
    stage: ThoughtStage,
    tags: Vec<String>,
    principles_applied: Vec<String>,
    assumptions_challenged: Vec<String>,
    created_at: String,
}

impl Thought {
    /// Validate `fields` and build a thought, filling in defaults.
    ///
    /// Rules are checked in order: blank text, sequence number outside
    /// `1..=u32::MAX`, total outside that range, total below sequence number,
    /// unknown stage.
    pub fn new(fields: ThoughtFields) -> Result<Self, ValidationError> {
        let text = fields.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let sequence_number = positive(fields.sequence_number)
            .ok_or(ValidationError::SequenceNumberOutOfRange(fields.sequence_number))?;
        let total_sequence_length = positive(fields.total_sequence_length)
            .ok_or(ValidationError::TotalOutOfRange(fields.total_sequence_length))?;
        if total_sequence_length < sequence_number {
            return Err(ValidationError::TotalBelowSequence {
                sequence: fields.sequence_number,
                total: fields.total_sequence_length,
            });
        }
        let stage: ThoughtStage = fields.stage.parse()?;

        Ok(Self {
            id: fields
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            text: text.to_string(),
            sequence_number,
            total_sequence_length,
            continuation: fields.continuation,
            stage,
            tags: fields.tags,
            principles_applied: fields.principles_applied,
            assumptions_challenged: fields.assumptions_challenged,
            created_at: fields.created_at.unwrap_or_else(now_iso8601),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn total_sequence_length(&self) -> u32 {
        self.total_sequence_length
    }

    pub fn continuation(&self) -> bool {
        self.continuation
    }

    pub fn stage(&self) -> ThoughtStage {
        self.stage
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn principles_applied(&self) -> &[String] {
        &self.principles_applied
    }

    pub fn assumptions_challenged(&self) -> &[String] {
        &self.assumptions_challenged
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Plain key/value form for JSON files. `id` is only written when asked for;
    /// older export files omitted it.
    pub fn to_persistable(&self, include_id: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(keys::TEXT.into(), Value::from(self.text.as_str()));
        map.insert(keys::SEQUENCE[0].into(), Value::from(self.sequence_number));
        map.insert(keys::TOTAL[0].into(), Value::from(self.total_sequence_length));
        map.insert(keys::CONTINUATION[0].into(), Value::from(self.continuation));
        map.insert(keys::STAGE.into(), Value::from(self.stage.as_str()));
        map.insert(keys::TAGS.into(), Value::from(self.tags.clone()));
        map.insert(
            keys::PRINCIPLES[0].into(),
            Value::from(self.principles_applied.clone()),
        );
        map.insert(
            keys::ASSUMPTIONS[0].into(),
            Value::from(self.assumptions_challenged.clone()),
        );
        map.insert(keys::TIMESTAMP.into(), Value::from(self.created_at.as_str()));
        if include_id {
            map.insert(keys::ID.into(), Value::from(self.id.as_str()));
        }
        map
    }

    /// Rebuild a thought from its persisted form.
    ///
    /// Accepts snake_case key variants (canonical names win when both exist).
    /// A missing timestamp or id is defaulted rather than rejected.
    pub fn from_persistable(data: &Value) -> Result<Self, ValidationError> {
        let text = data
            .get(keys::TEXT)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField(keys::TEXT))?;
        let sequence_number = first_of(data, keys::SEQUENCE)
            .and_then(Value::as_i64)
            .ok_or(ValidationError::MissingField(keys::SEQUENCE[0]))?;
        let total_sequence_length = first_of(data, keys::TOTAL)
            .and_then(Value::as_i64)
            .ok_or(ValidationError::MissingField(keys::TOTAL[0]))?;
        let continuation = first_of(data, keys::CONTINUATION)
            .and_then(Value::as_bool)
            .ok_or(ValidationError::MissingField(keys::CONTINUATION[0]))?;
        let stage = data
            .get(keys::STAGE)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField(keys::STAGE))?;

        Self::new(ThoughtFields {
            text: text.to_string(),
            sequence_number,
            total_sequence_length,
            continuation,
            stage: stage.to_string(),
            tags: string_list(data.get(keys::TAGS)),
            principles_applied: string_list(first_of(data, keys::PRINCIPLES)),
            assumptions_challenged: string_list(first_of(data, keys::ASSUMPTIONS)),
            created_at: data
                .get(keys::TIMESTAMP)
                .and_then(Value::as_str)
                .map(str::to_string),
            id: data.get(keys::ID).and_then(Value::as_str).map(str::to_string),
        })
    }
}

impl PartialEq for Thought {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Thought {}

impl std::hash::Hash for Thought {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Current UTC time in the `2024-01-01T12:00:00.000Z` form.
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn positive(n: i64) -> Option<u32> {
    u32::try_from(n).ok().filter(|&n| n >= 1)
}

/// First non-null value among `names`, in priority order.
fn first_of<'a>(data: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| data.get(*name))
        .find(|v| !v.is_null())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(text: &str, seq: i64, total: i64, stage: &str) -> ThoughtFields {
        ThoughtFields {
            text: text.into(),
            sequence_number: seq,
            total_sequence_length: total,
            continuation: true,
            stage: stage.into(),
            ..Default::default()
        }
    }

    #[test]
    fn stage_parsing_is_case_insensitive() {
        assert_eq!(
            "problem definition".parse::<ThoughtStage>().unwrap(),
            ThoughtStage::ProblemDefinition
        );
        assert_eq!("RESEARCH".parse::<ThoughtStage>().unwrap(), ThoughtStage::Research);
        assert_eq!("aNaLySiS".parse::<ThoughtStage>().unwrap(), ThoughtStage::Analysis);
        for stage in ThoughtStage::ALL {
            assert_eq!(stage.as_str().parse::<ThoughtStage>().unwrap(), stage);
        }
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let err = "Brainstorm".parse::<ThoughtStage>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownStage("Brainstorm".into()));
    }

    #[test]
    fn valid_fields_build_a_thought_with_defaults() {
        let t = Thought::new(fields("  Frame the problem  ", 1, 3, "Problem Definition")).unwrap();
        assert_eq!(t.text(), "Frame the problem");
        assert_eq!(t.sequence_number(), 1);
        assert_eq!(t.total_sequence_length(), 3);
        assert_eq!(t.stage(), ThoughtStage::ProblemDefinition);
        assert!(t.tags().is_empty());
        assert!(uuid::Uuid::parse_str(t.id()).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(t.created_at()).is_ok());
    }

    #[test]
    fn validation_follows_priority_order() {
        // Everything is wrong; blank text wins.
        let err = Thought::new(fields("   ", 0, 0, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);

        let err = Thought::new(fields("x", 0, 0, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::SequenceNumberOutOfRange(0));

        let too_big = i64::from(u32::MAX) + 1;
        let err = Thought::new(fields("x", too_big, too_big, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::SequenceNumberOutOfRange(too_big));

        let err = Thought::new(fields("x", 2, -1, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::TotalOutOfRange(-1));

        let err = Thought::new(fields("x", 4, 3, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::TotalBelowSequence { sequence: 4, total: 3 });

        let err = Thought::new(fields("x", 3, 3, "nope")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownStage("nope".into()));
    }

    #[test]
    fn persistable_omits_id_unless_requested() {
        let t = Thought::new(fields("x", 1, 1, "Conclusion")).unwrap();
        let without = t.to_persistable(false);
        assert!(!without.contains_key("id"));
        assert_eq!(without["stage"], json!("Conclusion"));
        assert_eq!(without["thoughtNumber"], json!(1));

        let with = t.to_persistable(true);
        assert_eq!(with["id"], json!(t.id()));
    }

    #[test]
    fn from_persistable_accepts_snake_case_and_prefers_canonical() {
        let data = json!({
            "thought": "Legacy",
            "thought_number": 2,
            "totalThoughts": 5,
            "total_thoughts": 1,
            "next_thought_needed": false,
            "stage": "synthesis",
            "axioms_used": ["parsimony"],
            "assumptions_challenged": ["a"]
        });
        let t = Thought::from_persistable(&data).unwrap();
        assert_eq!(t.sequence_number(), 2);
        assert_eq!(t.total_sequence_length(), 5);
        assert!(!t.continuation());
        assert_eq!(t.stage(), ThoughtStage::Synthesis);
        assert_eq!(t.principles_applied(), ["parsimony"]);
        assert_eq!(t.assumptions_challenged(), ["a"]);
        assert!(!t.id().is_empty());
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = Thought::new(ThoughtFields {
            id: Some("same".into()),
            ..fields("one", 1, 2, "Research")
        })
        .unwrap();
        let b = Thought::new(ThoughtFields {
            id: Some("same".into()),
            ..fields("two", 2, 2, "Analysis")
        })
        .unwrap();
        let c = Thought::new(fields("one", 1, 2, "Research")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
