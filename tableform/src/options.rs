//! Field options.
//!
//! [`FieldOptions`] is used both for what a caller asks for and for what a
//! field ends up with. Every key is optional: `None` means "not specified",
//! which lets inference fill the gap and lets a later redefinition override
//! only the keys it names (see [`FieldOptions::merged_with`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single choice of a select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Options of a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// `Some(Value::Null)` is an explicit null default, distinct from `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "explicit_value"
    )]
    pub default: Option<Value>,
    /// Initial value; the resolved default is used when absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "explicit_value"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multilang: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depending_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_attributes: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<SelectOption>>,
    /// Label of the blank choice of enum selects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_option: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn multilang(mut self, multilang: bool) -> Self {
        self.multilang = Some(multilang);
        self
    }

    pub fn depending_on(mut self, field: impl Into<String>) -> Self {
        self.depending_on = Some(field.into());
        self
    }

    pub fn maxlength(mut self, maxlength: u32) -> Self {
        self.maxlength = Some(maxlength);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Add one HTML attribute, keeping the ones already set.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add one attribute of the label element.
    pub fn label_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.label_attributes
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn choices(mut self, choices: Vec<SelectOption>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn empty_option(mut self, label: impl Into<String>) -> Self {
        self.empty_option = Some(label.into());
        self
    }

    /// Overlay `overrides` on top of `self`.
    ///
    /// Keys set in `overrides` win; keys it leaves unset keep their current
    /// value. Map-valued keys are replaced as a whole, not merged entry-wise.
    pub fn merged_with(self, overrides: FieldOptions) -> FieldOptions {
        FieldOptions {
            field_type: overrides.field_type.or(self.field_type),
            nullable: overrides.nullable.or(self.nullable),
            default: overrides.default.or(self.default),
            value: overrides.value.or(self.value),
            multilang: overrides.multilang.or(self.multilang),
            depending_on: overrides.depending_on.or(self.depending_on),
            maxlength: overrides.maxlength.or(self.maxlength),
            step: overrides.step.or(self.step),
            attributes: overrides.attributes.or(self.attributes),
            label_attributes: overrides.label_attributes.or(self.label_attributes),
            required: overrides.required.or(self.required),
            label: overrides.label.or(self.label),
            choices: overrides.choices.or(self.choices),
            empty_option: overrides.empty_option.or(self.empty_option),
        }
    }
}

/// A bare type name is shorthand for options that only set the type.
impl From<&str> for FieldOptions {
    fn from(field_type: &str) -> Self {
        FieldOptions::new().field_type(field_type)
    }
}

impl From<String> for FieldOptions {
    fn from(field_type: String) -> Self {
        FieldOptions::new().field_type(field_type)
    }
}

/// Serde adapter that keeps a present `null` as `Some(Value::Null)`.
mod explicit_value {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<Value>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
        Value::deserialize(deserializer).map(Some)
    }
}
