//! Form field model and normalization into name/value pairs

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// Value written for field kinds the extractor does not recognize
pub const UNSUPPORTED_FIELD_TYPE: &str = "Unsupported field type";

// ============================================================================
// Form Field Types
// ============================================================================

/// A form field as reported by the PDF library, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Fully qualified field name
    pub name: String,
    /// Field kind with its current state
    pub kind: FieldKind,
}

/// Kind-specific state of a form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Text input field
    Text { text: Option<String> },
    /// Checkbox field
    Checkbox { checked: bool },
    /// Radio button group
    RadioGroup { selected: Option<String> },
    /// Single-choice dropdown (combo box)
    Dropdown { selected: Option<String> },
    /// Multi-select option list (list box)
    MultiSelect { selected: Vec<String> },
    /// Anything else (push buttons, signatures, unknown types)
    Other { kind: String },
}

impl FormField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl FieldKind {
    /// Short type label used in logs (e.g. "text", "checkbox")
    pub fn label(&self) -> &str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Checkbox { .. } => "checkbox",
            FieldKind::RadioGroup { .. } => "radio_group",
            FieldKind::Dropdown { .. } => "dropdown",
            FieldKind::MultiSelect { .. } => "multi_select",
            FieldKind::Other { kind } => kind,
        }
    }

    /// Normalize the field state into its extracted value
    pub fn normalize(&self) -> ExtractedValue {
        match self {
            FieldKind::Text { text } => text_value(text.as_deref()),
            FieldKind::Checkbox { checked } => ExtractedValue::Checked(*checked),
            FieldKind::RadioGroup { selected } => single_choice_value(selected.as_deref()),
            FieldKind::Dropdown { selected } => single_choice_value(selected.as_deref()),
            FieldKind::MultiSelect { selected } => ExtractedValue::Selection(selected.clone()),
            FieldKind::Other { .. } => ExtractedValue::Unsupported,
        }
    }
}

fn text_value(text: Option<&str>) -> ExtractedValue {
    ExtractedValue::Text(text.unwrap_or_default().to_string())
}

/// No selection reads as an empty string
fn single_choice_value(selected: Option<&str>) -> ExtractedValue {
    ExtractedValue::Text(selected.unwrap_or_default().to_string())
}

// ============================================================================
// Extraction Output
// ============================================================================

/// Normalized value of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    /// Text, radio and dropdown values
    Text(String),
    /// Checkbox state
    Checked(bool),
    /// Multi-select options, in list order
    Selection(Vec<String>),
    /// Unrecognized field kind
    Unsupported,
}

impl Serialize for ExtractedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ExtractedValue::Text(text) => serializer.serialize_str(text),
            ExtractedValue::Checked(checked) => serializer.serialize_bool(*checked),
            ExtractedValue::Selection(options) => options.serialize(serializer),
            ExtractedValue::Unsupported => serializer.serialize_str(UNSUPPORTED_FIELD_TYPE),
        }
    }
}

/// Field values keyed by name, plus every field name in document order.
///
/// `data` behaves like a JSON object: a repeated name keeps its first
/// position but takes the later value. `fields` keeps every occurrence.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ExtractionResult {
    pub data: IndexMap<String, ExtractedValue>,
    pub fields: Vec<String>,
}

impl ExtractionResult {
    /// Compact JSON form: `{"data":{...},"fields":[...]}`
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Map form fields to a name/value table
pub fn extract(fields: &[FormField]) -> ExtractionResult {
    let mut result = ExtractionResult {
        data: IndexMap::with_capacity(fields.len()),
        fields: Vec::with_capacity(fields.len()),
    };

    for field in fields {
        result.fields.push(field.name.clone());
        result.data.insert(field.name.clone(), field.kind.normalize());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(name: &str, value: Option<&str>) -> FormField {
        FormField::new(
            name,
            FieldKind::Text {
                text: value.map(str::to_string),
            },
        )
    }

    #[rstest]
    #[case(FieldKind::Text { text: Some("Ada".into()) }, serde_json::json!("Ada"))]
    #[case(FieldKind::Text { text: None }, serde_json::json!(""))]
    #[case(FieldKind::Checkbox { checked: true }, serde_json::json!(true))]
    #[case(FieldKind::Checkbox { checked: false }, serde_json::json!(false))]
    #[case(FieldKind::RadioGroup { selected: Some("Blue".into()) }, serde_json::json!("Blue"))]
    #[case(FieldKind::RadioGroup { selected: None }, serde_json::json!(""))]
    #[case(FieldKind::Dropdown { selected: Some("CA".into()) }, serde_json::json!("CA"))]
    #[case(FieldKind::Dropdown { selected: None }, serde_json::json!(""))]
    #[case(
        FieldKind::MultiSelect { selected: vec!["a".into(), "c".into()] },
        serde_json::json!(["a", "c"])
    )]
    #[case(FieldKind::MultiSelect { selected: vec![] }, serde_json::json!([]))]
    #[case(FieldKind::Other { kind: "signature".into() }, serde_json::json!("Unsupported field type"))]
    fn test_normalize_per_kind(#[case] kind: FieldKind, #[case] expected: serde_json::Value) {
        let value = serde_json::to_value(kind.normalize()).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_extract_empty() {
        let result = extract(&[]);
        assert!(result.data.is_empty());
        assert!(result.fields.is_empty());
        assert_eq!(result.to_json().unwrap(), r#"{"data":{},"fields":[]}"#);
    }

    #[test]
    fn test_single_text_field_json() {
        let result = extract(&[text("FirstName", Some("Ada"))]);
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"data":{"FirstName":"Ada"},"fields":["FirstName"]}"#
        );
    }

    #[test]
    fn test_unchecked_checkbox_json() {
        let result = extract(&[FormField::new("Agree", FieldKind::Checkbox { checked: false })]);
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"data":{"Agree":false},"fields":["Agree"]}"#
        );
    }

    #[test]
    fn test_field_order_is_document_order() {
        let result = extract(&[
            text("zeta", Some("1")),
            text("alpha", Some("2")),
            text("mid", None),
        ]);
        assert_eq!(result.fields, vec!["zeta", "alpha", "mid"]);
        let keys: Vec<&String> = result.data.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_name_last_value_wins() {
        let result = extract(&[
            text("name", Some("first")),
            FormField::new("other", FieldKind::Checkbox { checked: true }),
            text("name", Some("second")),
        ]);

        assert_eq!(result.fields, vec!["name", "other", "name"]);
        assert_eq!(result.data.len(), 2);
        assert_eq!(
            result.data.get("name"),
            Some(&ExtractedValue::Text("second".to_string()))
        );
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"data":{"name":"second","other":true},"fields":["name","other","name"]}"#
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let fields = vec![
            text("a", Some("x")),
            FormField::new(
                "b",
                FieldKind::MultiSelect {
                    selected: vec!["1".into()],
                },
            ),
            FormField::new(
                "c",
                FieldKind::Other {
                    kind: "push_button".into(),
                },
            ),
        ];
        assert_eq!(extract(&fields), extract(&fields));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FieldKind::Text { text: None }.label(), "text");
        assert_eq!(
            FieldKind::Other {
                kind: "signature".into()
            }
            .label(),
            "signature"
        );
    }
}
