//! Column type resolution.
//!
//! Turns a field name plus the caller's options into finalized options with a
//! concrete `type`, using the backing table's column metadata when there is
//! one. Resolution order:
//!
//! 1. decide whether the field is multilang
//! 2. pick the physical table (the translation table for multilang fields)
//! 3. look the column up
//! 4. infer the type from the column family, unless the caller named one
//! 5. fill nullability and default from the column where not given
//! 6. look the type up in the registry

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tableform_config::FormConfig;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::kinds::FieldKind;
use crate::logging::Pretty;
use crate::multilang::{MultilangCatalog, TranslatedTable};
use crate::options::{FieldOptions, SelectOption};
use crate::provider::type_names;
use crate::registry::FieldTypeRegistry;
use crate::schema::{ColumnFamily, ColumnLength, ColumnMeta, ForeignKey, SchemaLookup};

/// Options after resolution, with the type they resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub options: FieldOptions,
    pub kind: Arc<dyn FieldKind>,
}

impl ResolvedField {
    pub fn type_name(&self) -> &str {
        self.options.field_type.as_deref().unwrap_or_default()
    }
}

/// Resolves field options against a schema and a multilang catalog.
///
/// Either collaborator may be absent; resolution then falls back to the
/// configured fallback type and monolingual fields.
pub struct ColumnTypeResolver<'a> {
    schema: Option<&'a dyn SchemaLookup>,
    multilang: Option<&'a dyn MultilangCatalog>,
    registry: &'a FieldTypeRegistry,
    config: &'a FormConfig,
}

impl<'a> ColumnTypeResolver<'a> {
    pub fn new(registry: &'a FieldTypeRegistry, config: &'a FormConfig) -> Self {
        Self {
            schema: None,
            multilang: None,
            registry,
            config,
        }
    }

    pub fn with_schema(mut self, schema: Option<&'a dyn SchemaLookup>) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_multilang(mut self, multilang: Option<&'a dyn MultilangCatalog>) -> Self {
        self.multilang = multilang;
        self
    }

    /// Resolve the options of field `name` of `table`.
    pub fn resolve(
        &self,
        table: Option<&str>,
        name: &str,
        mut options: FieldOptions,
    ) -> Result<ResolvedField> {
        let translated = match self.multilang {
            Some(catalog) => Some(catalog.translated_tables()?),
            None => None,
        };

        let multilang = effective_multilang(table, name, options.multilang, translated.as_ref());
        options.multilang = Some(multilang);

        let physical_table = table.map(|table| {
            match translated.as_ref().and_then(|t| t.get(table)) {
                Some(entry) if multilang => format!("{table}{}", entry.table_suffix),
                _ => table.to_string(),
            }
        });

        let column = match (self.schema, physical_table.as_deref()) {
            (Some(schema), Some(physical)) => schema
                .column(physical, name)?
                .map(|column| (schema, column)),
            _ => None,
        };

        let inferred = match column {
            Some((schema, column)) => {
                if options.nullable.is_none() {
                    options.nullable = Some(column.nullable);
                }
                if options.default.is_none() {
                    options.default = Some(column.default.clone().unwrap_or(Value::Null));
                }
                if options.field_type.is_some() {
                    None
                } else {
                    Some(self.infer_type(schema, name, &column, &mut options))
                }
            }
            None => {
                trace!(field = name, table = ?physical_table, "no column metadata");
                None
            }
        };

        let type_name = options
            .field_type
            .get_or_insert_with(|| inferred.unwrap_or_else(|| self.config.fallback_type.clone()))
            .clone();
        let kind = self.registry.resolve(&type_name)?;

        trace!("resolved field '{}': {}", name, Pretty(&options));
        Ok(ResolvedField { options, kind })
    }

    fn infer_type(
        &self,
        schema: &dyn SchemaLookup,
        name: &str,
        column: &ColumnMeta,
        options: &mut FieldOptions,
    ) -> String {
        match column.family() {
            ColumnFamily::Integer | ColumnFamily::Float => match column.foreign_keys.first() {
                Some(fk) => self.match_link_field(schema, column, fk, options),
                None => type_names::NUMBER.to_string(),
            },
            ColumnFamily::Decimal => {
                if let ColumnLength::Decimal { precision, scale } = column.length {
                    options.step.get_or_insert(decimal_step(precision, scale));
                }
                type_names::NUMBER.to_string()
            }
            ColumnFamily::Enum => {
                if options.choices.is_none() {
                    options.choices = Some(self.enum_choices(column, options));
                }
                type_names::SELECT.to_string()
            }
            ColumnFamily::Date => type_names::DATE.to_string(),
            ColumnFamily::Time => type_names::TIME.to_string(),
            ColumnFamily::DateTime => type_names::DATETIME.to_string(),
            ColumnFamily::LongText => type_names::TEXTAREA.to_string(),
            ColumnFamily::String => {
                if let ColumnLength::Size { size } = column.length {
                    options.maxlength.get_or_insert(size);
                }
                if name == self.config.password_field {
                    type_names::PASSWORD.to_string()
                } else {
                    type_names::TEXT.to_string()
                }
            }
            ColumnFamily::Spatial => type_names::POINT.to_string(),
            ColumnFamily::Other => self.config.fallback_type.clone(),
        }
    }

    /// First registered link field accepting the column, else the fallback.
    fn match_link_field(
        &self,
        schema: &dyn SchemaLookup,
        column: &ColumnMeta,
        fk: &ForeignKey,
        options: &FieldOptions,
    ) -> String {
        for (type_name, link) in self.registry.link_fields() {
            if link.match_column(schema, column, fk, options) {
                debug!(type_name, ref_table = %fk.ref_table, "link field matched");
                return type_name.to_string();
            }
        }
        debug!(
            ref_table = %fk.ref_table,
            fallback = %self.config.link_fallback_type,
            "no link field matched"
        );
        self.config.link_fallback_type.clone()
    }

    fn enum_choices(&self, column: &ColumnMeta, options: &FieldOptions) -> Vec<SelectOption> {
        let empty_label = options
            .empty_option
            .clone()
            .unwrap_or_else(|| self.config.empty_option_label.clone());
        let mut choices = vec![SelectOption::new("", empty_label)];
        if let ColumnLength::Values { values } = &column.length {
            choices.extend(values.iter().map(|v| SelectOption::new(v, title_case(v))));
        }
        choices
    }
}

/// Whether field `name` of `table` stores one value per language.
///
/// Without a catalog the answer is always no. An explicit request is honored
/// unless the form's table is missing from the catalog, in which case it is
/// downgraded with a warning.
fn effective_multilang(
    table: Option<&str>,
    name: &str,
    requested: Option<bool>,
    translated: Option<&IndexMap<String, TranslatedTable>>,
) -> bool {
    let Some(translated) = translated else {
        if requested == Some(true) {
            warn!(field = name, "multilang requested without multilang support; ignoring");
        }
        return false;
    };

    let multilang = requested.unwrap_or_else(|| {
        table
            .and_then(|table| translated.get(table))
            .is_some_and(|entry| entry.is_translated(name))
    });

    match table {
        Some(table) if multilang && !translated.contains_key(table) => {
            warn!(
                field = name,
                table, "table is not in the multilang catalog; treating field as monolingual"
            );
            false
        }
        _ => multilang,
    }
}

/// Largest scale a decimal column may declare.
pub const MAX_DECIMAL_SCALE: u32 = 30;

/// Input step for a `decimal(precision, scale)` column.
///
/// The nearest `f64` to `10^-scale`, or 1 when `precision` is 0. Scales
/// above [`MAX_DECIMAL_SCALE`] are clamped.
pub fn decimal_step(precision: u32, scale: u32) -> f64 {
    if precision == 0 {
        return 1.0;
    }
    let scale = i32::try_from(scale.min(MAX_DECIMAL_SCALE)).unwrap_or_default();
    10f64.powi(scale).recip()
}

/// Upper-case the first letter of every whitespace-separated word.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c');
    }
    out
}
