//! Typed field values and their wire encoding.

use crate::pb;

/// A natively typed field value.
///
/// The wire protocol only carries text and double-precision numeric values,
/// so the two cases are fixed here at construction time rather than checked
/// against an open-ended value type at encode time.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Carried verbatim into the wire text variant.
    Text(String),
    /// Carried verbatim into the wire double variant.
    Numeric(f64),
}

impl FieldValue {
    fn into_wire(self) -> pb::field_value::Value {
        match self {
            FieldValue::Text(text) => pb::field_value::Value::Text(text),
            FieldValue::Numeric(number) => pb::field_value::Value::Double(number),
        }
    }
}

/// A named, typed, flagged unit of document content.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub value: FieldValue,
    /// Tokenize the value for full-text search.
    pub analyzed: bool,
    /// Make the value available for aggregation.
    pub facet: bool,
}

impl FieldSpec {
    /// A text field.
    pub fn text(
        name: impl Into<String>,
        value: impl Into<String>,
        analyzed: bool,
        facet: bool,
    ) -> Self {
        FieldSpec {
            name: name.into(),
            value: FieldValue::Text(value.into()),
            analyzed,
            facet,
        }
    }

    /// A numeric field.
    pub fn numeric(name: impl Into<String>, value: f64, analyzed: bool, facet: bool) -> Self {
        FieldSpec {
            name: name.into(),
            value: FieldValue::Numeric(value),
            analyzed,
            facet,
        }
    }
}

impl From<FieldSpec> for pb::DocumentField {
    fn from(spec: FieldSpec) -> Self {
        pb::DocumentField {
            name: spec.name,
            value: Some(pb::FieldValue {
                value: Some(spec.value.into_wire()),
            }),
            analyzed: spec.analyzed,
            // Every benchmark field is retained in the index.
            stored: true,
            facet: spec.facet,
        }
    }
}
