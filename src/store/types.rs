//! Todo record types, request parameters, and field validation.
//!
//! Everything here is backend-agnostic and shared by the HTTP surface and
//! the sync client.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::StoreError;

/// Store-assigned record identity.
pub type TodoId = i64;

/// Required fields, in the order they are validated.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "date", "importance"];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The mutable fields of a todo record.
///
/// Serialized in canonical order: `label`, `name`, `description`, `date`,
/// `importance`. An unset label serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFields {
    /// Optional classification.
    #[serde(default)]
    pub label: Option<String>,
    pub name: String,
    pub description: String,
    /// Free-form date string; the format is not validated.
    pub date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub importance: String,
}

impl TodoFields {
    /// Create a field set without a label.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        importance: impl Into<String>,
    ) -> Self {
        Self {
            label: None,
            name: name.into(),
            description: description.into(),
            date: date.into(),
            importance: importance.into(),
        }
    }

    /// Attach a label. An empty label is treated as unset.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
        self
    }

    /// Query/form pairs for an outbound request, label first when present.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(label) = self.label.as_deref() {
            pairs.push(("label", label));
        }
        pairs.push(("name", self.name.as_str()));
        pairs.push(("description", self.description.as_str()));
        pairs.push(("date", self.date.as_str()));
        pairs.push(("importance", self.importance.as_str()));
        pairs
    }

    /// Field values in display order, skipping an unset label.
    pub fn display_values(&self) -> impl Iterator<Item = &str> {
        self.label.as_deref().into_iter().chain([
            self.name.as_str(),
            self.description.as_str(),
            self.date.as_str(),
            self.importance.as_str(),
        ])
    }
}

/// Accept importance as either a JSON string or a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// A stored todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub id: TodoId,
    pub fields: TodoFields,
}

/// The full record set in storage order.
///
/// On the wire this is a JSON object mapping each id to its fields. The
/// serde impls below keep entry order in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoSnapshot {
    pub records: Vec<TodoRecord>,
}

impl TodoSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: TodoId) -> Option<&TodoRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

impl Serialize for TodoSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.id, &record.fields)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TodoSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = TodoSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of todo id to record fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, fields)) = map.next_entry::<TodoId, TodoFields>()? {
                    records.push(TodoRecord { id, fields });
                }
                Ok(TodoSnapshot { records })
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

// ---------------------------------------------------------------------------
// Request parameters and validation
// ---------------------------------------------------------------------------

/// A required field was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is a required argument")]
    MissingField(&'static str),
}

/// Raw parameters of a mutating request, from either the query string or a
/// form body. Nothing is required at this level; see the `require_*` methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationParams {
    pub id: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub importance: Option<String>,
}

impl MutationParams {
    /// The `id` parameter, which must be present and non-empty.
    pub fn require_id(&self) -> Result<&str, ValidationError> {
        required(&self.id, "id")
    }

    /// All mutable fields, checking required ones in canonical order.
    pub fn require_fields(&self) -> Result<TodoFields, ValidationError> {
        let [name, description, date, importance] = REQUIRED_FIELDS;
        let fields = TodoFields::new(
            required(&self.name, name)?,
            required(&self.description, description)?,
            required(&self.date, date)?,
            required(&self.importance, importance)?,
        );
        Ok(match self.label.as_deref() {
            Some(label) => fields.with_label(label),
            None => fields,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Parse a validated `id` parameter into a [`TodoId`].
pub fn parse_id(raw: &str) -> Result<TodoId, StoreError> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::InvalidId(raw.to_owned()))
}
