//! A named, typed value holder.
//!
//! A field's value is either a single value or, for multilang fields, one
//! value per language code. The active language is never looked up behind
//! the caller's back: accessors take a [`LanguageSource`] explicitly.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::kinds::FieldKind;
use crate::multilang::{Lang, LanguageSource};
use crate::options::{FieldOptions, SelectOption};
use crate::provider::type_names;

/// What a field holds internally.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Single(Value),
    PerLanguage(IndexMap<String, Value>),
}

/// A form field.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    options: FieldOptions,
    kind: Arc<dyn FieldKind>,
    value: StoredValue,
}

impl Field {
    /// Build a field from resolved options.
    ///
    /// The initial value is the `value` option, else the `default` option,
    /// else null. A multilang field built without an active language is
    /// downgraded to a single-value field.
    pub fn new<L>(
        name: impl Into<String>,
        mut options: FieldOptions,
        kind: Arc<dyn FieldKind>,
        languages: &L,
    ) -> Self
    where
        L: LanguageSource + ?Sized,
    {
        let name = name.into();
        kind.prepare(&mut options);

        let mut multilang = options.multilang.unwrap_or(false);
        if multilang && languages.active_language().is_none() {
            warn!(field = %name, "multilang field without a language source; storing a single value");
            multilang = false;
        }
        options.multilang = Some(multilang);

        let initial = options
            .value
            .clone()
            .or_else(|| options.default.clone())
            .unwrap_or(Value::Null);
        let value = if multilang {
            StoredValue::PerLanguage(IndexMap::new())
        } else {
            StoredValue::Single(Value::Null)
        };

        let mut field = Self {
            name,
            options,
            kind,
            value,
        };
        field.set_value(initial, Lang::Active, languages);
        field
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn kind(&self) -> &Arc<dyn FieldKind> {
        &self.kind
    }

    pub fn field_type(&self) -> &str {
        self.options.field_type.as_deref().unwrap_or_default()
    }

    pub fn is_multilang(&self) -> bool {
        self.options.multilang.unwrap_or(false)
    }

    pub fn is_nullable(&self) -> bool {
        self.options.nullable.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        self.options.required.unwrap_or(false)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.options.default.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.options.label.as_deref()
    }

    pub fn maxlength(&self) -> Option<u32> {
        self.options.maxlength
    }

    pub fn depending_on(&self) -> Option<&str> {
        self.options.depending_on.as_deref()
    }

    /// Enumerated choices; empty for non-select fields.
    pub fn choices(&self) -> &[SelectOption] {
        self.options.choices.as_deref().unwrap_or_default()
    }

    /// Label of the choice whose value is `value`.
    pub fn choice_label(&self, value: &str) -> Option<&str> {
        self.choices()
            .iter()
            .find(|choice| choice.value == value)
            .map(|choice| choice.label.as_str())
    }

    /// Whether reads always come back empty (password fields).
    pub fn conceals_value(&self) -> bool {
        self.kind.conceals_value() || self.field_type() == type_names::PASSWORD
    }

    /// Store a value.
    ///
    /// For multilang fields, [`Lang::Code`] sets one language only. Otherwise
    /// an object value replaces the whole per-language map, and any other
    /// value goes into the active language's slot. [`Lang::All`] behaves
    /// like [`Lang::Active`] here.
    pub fn set_value<L>(&mut self, value: impl Into<Value>, lang: Lang<'_>, languages: &L)
    where
        L: LanguageSource + ?Sized,
    {
        let value = value.into();
        if !self.is_multilang() {
            self.value = StoredValue::Single(value);
            return;
        }

        let target = match (lang, &value) {
            (Lang::Code(code), _) => Some(code.to_string()),
            (_, Value::Object(_)) => None,
            (_, _) => match languages.active_language() {
                Some(active) => Some(active),
                None => {
                    warn!(field = %self.name, "no active language; value not stored");
                    return;
                }
            },
        };

        let mut slots = match std::mem::replace(&mut self.value, StoredValue::Single(Value::Null)) {
            StoredValue::PerLanguage(slots) => slots,
            StoredValue::Single(_) => IndexMap::new(),
        };
        match (target, value) {
            (Some(language), value) => {
                slots.insert(language, value);
            }
            (None, Value::Object(map)) => {
                slots = map.into_iter().collect();
            }
            (None, _) => {}
        }
        self.value = StoredValue::PerLanguage(slots);
    }

    /// Read the value.
    ///
    /// Password fields always read as `None`. For multilang fields,
    /// [`Lang::All`] returns every language as an object, [`Lang::Active`]
    /// the active language's value and [`Lang::Code`] that language's value.
    /// Null reads as `None`.
    pub fn get_value<L>(&self, lang: Lang<'_>, languages: &L) -> Option<Value>
    where
        L: LanguageSource + ?Sized,
    {
        if self.conceals_value() {
            return None;
        }

        match &self.value {
            StoredValue::Single(value) => present(value),
            StoredValue::PerLanguage(slots) => match lang {
                Lang::All => Some(Value::Object(
                    slots.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                )),
                Lang::Active => languages
                    .active_language()
                    .and_then(|language| slots.get(&language))
                    .and_then(present),
                Lang::Code(code) => slots.get(code).and_then(present),
            },
        }
    }

    /// The stored value, bypassing concealment.
    ///
    /// Meant for code that must process credentials (hashing, re-submission),
    /// never for display.
    pub fn raw_value(&self) -> &StoredValue {
        &self.value
    }

    /// Take over the value of the field this one redefines.
    ///
    /// Every language is kept when both fields are multilang. Moving between
    /// single and per-language storage goes through the active language;
    /// without one, the first non-null language value is kept.
    pub(crate) fn adopt_value<L>(&mut self, previous: &Field, languages: &L)
    where
        L: LanguageSource + ?Sized,
    {
        match (&previous.value, self.is_multilang()) {
            (StoredValue::PerLanguage(slots), true) => {
                self.value = StoredValue::PerLanguage(slots.clone());
            }
            (StoredValue::PerLanguage(slots), false) => {
                let value = match languages.active_language() {
                    Some(language) => slots.get(&language).cloned(),
                    None => {
                        let first = slots.iter().find(|(_, value)| !value.is_null());
                        warn!(
                            field = %self.name,
                            language = first.map(|(code, _)| code.as_str()),
                            "no active language; keeping the first translated value"
                        );
                        first.map(|(_, value)| value.clone())
                    }
                };
                self.value = StoredValue::Single(value.unwrap_or(Value::Null));
            }
            (StoredValue::Single(value), _) => {
                self.set_value(value.clone(), Lang::Active, languages);
            }
        }
    }
}

fn present(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}
