//! The wizard document: an immutable, structurally shared answer tree.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::path::{FieldPath, assign};
use crate::step::Section;

pub type NodeMap = BTreeMap<String, Node>;

static EMPTY_SECTION: NodeMap = BTreeMap::new();

/// A value in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Number(f64),
    Choices(Vec<String>),
    Map(Arc<NodeMap>),
}

impl Node {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Node::Choices(choices) => Some(choices),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Arc<NodeMap>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Leaf value assigned through [`WizardDocument::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Choices(Vec<String>),
}

impl From<FieldValue> for Node {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Node::Text(text),
            FieldValue::Number(n) => Node::Number(n),
            FieldValue::Choices(choices) => Node::Choices(choices),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Text(text) => serializer.serialize_str(text),
            // Integral values are written without a fraction, as they were typed.
            Node::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Node::Number(n) => serializer.serialize_f64(*n),
            Node::Choices(choices) => choices.serialize(serializer),
            Node::Map(map) => (**map).serialize(serializer),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be an object")]
    NotAnObject,
    #[error("section `{0}` must be an object")]
    SectionNotAnObject(String),
    #[error("unsupported value at `{0}`")]
    UnsupportedValue(String),
}

fn node_from_json(value: Value, at: &str) -> Result<Option<Node>, DocumentError> {
    match value {
        // `null` is how a lost or never-set answer comes back; treat it as absent.
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(Node::Text(text))),
        Value::Number(n) => n
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| Some(Node::Number(n)))
            .ok_or_else(|| DocumentError::UnsupportedValue(at.to_string())),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                _ => Err(DocumentError::UnsupportedValue(at.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|choices| Some(Node::Choices(choices))),
        Value::Object(object) => map_from_json(object, at).map(|map| Some(Node::Map(map))),
        Value::Bool(_) => Err(DocumentError::UnsupportedValue(at.to_string())),
    }
}

fn map_from_json(
    object: serde_json::Map<String, Value>,
    at: &str,
) -> Result<Arc<NodeMap>, DocumentError> {
    let mut map = NodeMap::new();
    for (key, value) in object {
        let child_at = if at.is_empty() {
            key.clone()
        } else {
            format!("{at}.{key}")
        };
        if let Some(node) = node_from_json(value, &child_at)? {
            map.insert(key, node);
        }
    }
    Ok(Arc::new(map))
}

/// Answers to the onboarding wizard.
///
/// Every [`Section`] key is always present as a map. Values are never mutated in
/// place: [`WizardDocument::update`] returns a new document that shares every
/// untouched subtree with `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardDocument {
    root: Arc<NodeMap>,
}

impl Default for WizardDocument {
    fn default() -> Self {
        let root = Section::ALL
            .into_iter()
            .map(|section| {
                (
                    section.key().to_string(),
                    Node::Map(Arc::new(NodeMap::new())),
                )
            })
            .collect();
        Self {
            root: Arc::new(root),
        }
    }
}

impl WizardDocument {
    /// Build from a JSON value, filling in missing sections.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(object) = value else {
            return Err(DocumentError::NotAnObject);
        };
        let parsed = map_from_json(object, "")?;
        let mut root = parsed.as_ref().clone();
        for section in Section::ALL {
            match root.get(section.key()) {
                Some(Node::Map(_)) => {}
                None => {
                    root.insert(
                        section.key().to_string(),
                        Node::Map(Arc::new(NodeMap::new())),
                    );
                }
                Some(_) => {
                    return Err(DocumentError::SectionNotAnObject(
                        section.key().to_string(),
                    ));
                }
            }
        }
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn section(&self, section: Section) -> &NodeMap {
        self.section_handle(section).map_or(&EMPTY_SECTION, |map| &**map)
    }

    /// Shared handle to a section map, for identity checks.
    #[must_use]
    pub fn section_handle(&self, section: Section) -> Option<&Arc<NodeMap>> {
        self.root.get(section.key()).and_then(Node::as_map)
    }

    /// True when both documents hold the very same section map.
    #[must_use]
    pub fn shares_section(&self, other: &Self, section: Section) -> bool {
        match (self.section_handle(section), other.section_handle(section)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Node> {
        let keys = path.keys();
        let (last, parents) = keys.split_last()?;
        let mut map: &NodeMap = &self.root;
        for key in parents {
            let next = map.get(*key).and_then(Node::as_map)?;
            map = &**next;
        }
        map.get(*last)
    }

    /// Return a new document with `value` at `path` (`None` clears the field).
    #[must_use]
    pub fn update(&self, path: &FieldPath, value: Option<FieldValue>) -> Self {
        Self {
            root: assign(&self.root, &path.keys(), value.map(Node::from)),
        }
    }

    /// Number of answered fields in a section (nested maps count their leaves).
    #[must_use]
    pub fn answered(&self, section: Section) -> usize {
        fn count(map: &NodeMap) -> usize {
            map.values()
                .map(|node| match node {
                    Node::Map(inner) => count(inner),
                    Node::Choices(choices) if choices.is_empty() => 0,
                    _ => 1,
                })
                .sum()
        }
        count(self.section(section))
    }
}

impl Serialize for WizardDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WizardDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).expect("catalog path")
    }

    fn choices(items: &[&str]) -> FieldValue {
        FieldValue::Choices(items.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn default_has_every_section_empty() {
        let doc = WizardDocument::default();
        for section in Section::ALL {
            assert!(doc.section_handle(section).is_some());
            assert!(doc.section(section).is_empty());
        }
    }

    #[test]
    fn update_leaves_original_untouched() {
        let before = WizardDocument::default()
            .update(&path("etp.reuse_pct"), Some(FieldValue::Number(40.0)));
        let snapshot = before.to_json_string().expect("serialize");

        let after = before.update(&path("etp.reuse_pct"), Some(FieldValue::Number(55.0)));

        assert_eq!(before.to_json_string().expect("serialize"), snapshot);
        assert_eq!(
            before.get(&path("etp.reuse_pct")),
            Some(&Node::Number(40.0))
        );
        assert_eq!(after.get(&path("etp.reuse_pct")), Some(&Node::Number(55.0)));
    }

    #[test]
    fn untouched_sections_are_shared() {
        let doc = WizardDocument::default();
        let next = doc.update(
            &path("footprints.energy_mix_grid_pct"),
            Some(FieldValue::Number(60.0)),
        );
        for section in Section::ALL {
            let shared = next.shares_section(&doc, section);
            assert_eq!(shared, section != Section::Footprints, "{section}");
        }
    }

    #[test]
    fn identical_writes_are_idempotent() {
        let p = path("shade_finish.target_shade");
        let v = Some(FieldValue::Text("Deep indigo".to_string()));
        let once = WizardDocument::default().update(&p, v.clone());
        let twice = once.update(&p, v);
        assert_eq!(once, twice);
    }

    #[test]
    fn etp_blocks_scenario() {
        let d = WizardDocument::default();
        let next = d
            .update(&path("etp.blocks"), Some(choices(&["Physical"])))
            .update(&path("etp.blocks"), Some(choices(&["Physical", "Biological"])));

        assert_eq!(
            next.get(&path("etp.blocks")).and_then(Node::as_choices),
            Some(&["Physical".to_string(), "Biological".to_string()][..])
        );
        assert!(next.shares_section(&d, Section::WarpRange));
    }

    #[test]
    fn clearing_a_field_removes_it() {
        let p = path("handover.contact_name");
        let doc = WizardDocument::default().update(&p, Some(FieldValue::Text("Asha".into())));
        let cleared = doc.update(&p, None);
        assert!(cleared.get(&p).is_none());
        assert_eq!(cleared.answered(Section::Handover), 0);
    }

    #[test]
    fn json_round_trip() {
        let doc = WizardDocument::default()
            .update(&path("warp_range.dye_range"), Some(FieldValue::Text("Rope".into())))
            .update(&path("warp_range.yarn_count_ne"), Some(FieldValue::Number(10.0)))
            .update(&path("indigo_control.ph_target"), Some(FieldValue::Number(11.2)))
            .update(&path("etp.blocks"), Some(choices(&["Physical", "ZLD"])))
            .update(
                &FieldPath::nested(Section::Etp, ["lab", "cod"]).expect("nested"),
                Some(FieldValue::Number(180.0)),
            );

        let raw = doc.to_json_string().expect("serialize");
        let parsed = WizardDocument::from_json_str(&raw).expect("parse");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn integral_numbers_serialize_without_fraction() {
        let doc = WizardDocument::default()
            .update(&path("etp.reuse_pct"), Some(FieldValue::Number(40.0)))
            .update(&path("etp.cod_outlet_mg_l"), Some(FieldValue::Number(212.5)));
        let value = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(value["etp"]["reuse_pct"], json!(40));
        assert_eq!(value["etp"]["cod_outlet_mg_l"], json!(212.5));
    }

    #[test]
    fn missing_sections_are_filled_in() {
        let doc = WizardDocument::from_value(json!({ "etp": { "reuse_pct": 30 } }))
            .expect("valid");
        assert_eq!(doc.answered(Section::Etp), 1);
        for section in Section::ALL {
            assert!(doc.section_handle(section).is_some());
        }
    }

    #[test]
    fn nulls_load_as_absent() {
        let doc = WizardDocument::from_value(json!({ "footprints": { "water_l_per_m": null } }))
            .expect("valid");
        assert_eq!(doc.answered(Section::Footprints), 0);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            WizardDocument::from_value(json!([1, 2])),
            Err(DocumentError::NotAnObject)
        ));
        assert!(matches!(
            WizardDocument::from_value(json!({ "etp": "yes" })),
            Err(DocumentError::SectionNotAnObject(_))
        ));
        assert!(matches!(
            WizardDocument::from_value(json!({ "safety": { "ppe": [1] } })),
            Err(DocumentError::UnsupportedValue(at)) if at == "safety.ppe"
        ));
        assert!(WizardDocument::from_json_str("{not json").is_err());
    }

    #[test]
    fn unknown_top_level_keys_survive() {
        let doc = WizardDocument::from_value(json!({ "dyehouse": { "lines": 3 } }))
            .expect("valid");
        let raw = doc.to_json_string().expect("serialize");
        assert!(raw.contains("\"dyehouse\""));
    }
}
