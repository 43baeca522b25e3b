//! Property tests for type inference and the multilang value model.

use std::sync::Arc;

use indexmap::IndexMap;
use proptest::prelude::*;
use serde_json::{json, Value};
use tableform::test_support::{InMemoryCatalog, InMemorySchema};
use tableform::{
    ColumnMeta, Field, FieldOptions, Form, Lang, Monolingual, MultilangCatalog, PasswordKind,
    PlainKind, TranslatedTable,
};

fn numeric_sql_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "tinyint", "smallint", "int", "integer", "mediumint", "bigint", "float", "double",
        "real",
    ])
}

fn language_code() -> impl Strategy<Value = String> {
    "[a-z]{2}"
}

fn language_map() -> impl Strategy<Value = IndexMap<String, String>> {
    prop::collection::vec((language_code(), "[A-Za-z ]{0,12}"), 1..5)
        .prop_map(|entries| entries.into_iter().collect())
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}"
}

fn form_with_column(name: &str, column: ColumnMeta) -> Form {
    let schema = InMemorySchema::new().table("items", [(name, column)]);
    Form::builder().table("items").schema(Arc::new(schema)).build()
}

fn multilang_field(catalog: &InMemoryCatalog) -> Field {
    Field::new(
        "title",
        FieldOptions::new().field_type("text").multilang(true),
        Arc::new(PlainKind),
        catalog,
    )
}

proptest! {
    #[test]
    fn numeric_columns_without_foreign_key_are_numbers(sql_type in numeric_sql_type(), name in field_name()) {
        let mut form = form_with_column(&name, ColumnMeta::new(sql_type));
        let field = form.add(name.as_str(), FieldOptions::new()).unwrap();
        prop_assert_eq!(field.field_type(), "number");
    }

    #[test]
    fn enum_columns_get_blank_plus_one_choice_per_value(
        values in prop::collection::vec("[a-z]{1,8}", 0..8),
    ) {
        let mut form = form_with_column("status", ColumnMeta::new("enum").values(values.clone()));
        let field = form.add("status", FieldOptions::new()).unwrap();

        prop_assert_eq!(field.field_type(), "select");
        prop_assert_eq!(field.choices().len(), values.len() + 1);
        prop_assert_eq!(field.choices()[0].value.as_str(), "");
        let declared: Vec<&str> = field.choices()[1..].iter().map(|c| c.value.as_str()).collect();
        let expected: Vec<&str> = values.iter().map(String::as_str).collect();
        prop_assert_eq!(declared, expected);
    }

    #[test]
    fn string_columns_carry_their_length(
        size in 1u32..65_535,
        sql_type in prop::sample::select(vec!["varchar", "char"]),
        name in field_name(),
    ) {
        let mut form = form_with_column(&name, ColumnMeta::new(sql_type).size(size));
        let field = form.add(name.as_str(), FieldOptions::new()).unwrap();

        prop_assert_eq!(field.maxlength(), Some(size));
        let expected = if name == "password" { "password" } else { "text" };
        prop_assert_eq!(field.field_type(), expected);
    }

    #[test]
    fn decimal_step_follows_scale(precision in 1u32..30, scale in 0u32..8) {
        let mut form = form_with_column("amount", ColumnMeta::new("decimal").decimal(precision, scale));
        let field = form.add("amount", FieldOptions::new()).unwrap();

        let step = field.options().step.unwrap();
        let expected = 10f64.powi(-(scale as i32));
        prop_assert!((step - expected).abs() <= expected * 1e-9);
    }

    #[test]
    fn setting_all_languages_back_is_a_no_op(entries in language_map(), active in language_code()) {
        let catalog = InMemoryCatalog::new(&active);
        let mut field = multilang_field(&catalog);
        let map: serde_json::Map<String, Value> =
            entries.into_iter().map(|(k, v)| (k, json!(v))).collect();
        field.set_value(Value::Object(map), Lang::Active, &catalog);

        let before = field.raw_value().clone();
        let all = field.get_value(Lang::All, &catalog).unwrap();
        field.set_value(all, Lang::Active, &catalog);
        prop_assert_eq!(field.raw_value(), &before);
    }

    #[test]
    fn languages_are_independent(
        first in language_code(),
        second in language_code(),
        a in "[a-z]{1,10}",
        b in "[a-z]{1,10}",
    ) {
        prop_assume!(first != second);
        let catalog = InMemoryCatalog::new(&first);
        let mut field = multilang_field(&catalog);

        field.set_value(a.as_str(), Lang::Active, &catalog);
        field.set_value(b.as_str(), Lang::Code(&second), &catalog);

        prop_assert_eq!(field.get_value(Lang::Code(&first), &catalog), Some(json!(a)));
        prop_assert_eq!(field.get_value(Lang::Code(&second), &catalog), Some(json!(b)));
    }

    #[test]
    fn password_fields_never_read_back(secret in ".*", multilang in any::<bool>(), code in language_code()) {
        let catalog = InMemoryCatalog::new("en");
        let mut field = Field::new(
            "password",
            FieldOptions::new().field_type("password").multilang(multilang),
            Arc::new(PasswordKind),
            &catalog,
        );
        field.set_value(secret.as_str(), Lang::Active, &catalog);
        field.set_value(secret.as_str(), Lang::Code(&code), &catalog);

        prop_assert_eq!(field.get_value(Lang::Active, &catalog), None);
        prop_assert_eq!(field.get_value(Lang::All, &catalog), None);
        prop_assert_eq!(field.get_value(Lang::Code(&code), &catalog), None);
    }

    #[test]
    fn redefinition_preserves_value(value in "[a-z0-9@.]{1,20}", label in "[A-Za-z ]{1,12}") {
        let mut form = form_with_column("email", ColumnMeta::new("varchar").size(190));
        form.add("email", FieldOptions::new().required(true)).unwrap();
        form.set_value("email", value.as_str(), Lang::Active).unwrap();

        let field = form.add("email", FieldOptions::new().label(label.as_str())).unwrap();
        prop_assert_eq!(field.label(), Some(label.as_str()));
        prop_assert!(field.is_required());
        prop_assert_eq!(field.maxlength(), Some(190));
        prop_assert_eq!(form.value("email", Lang::Active).unwrap(), Some(json!(value)));
    }

    #[test]
    fn no_catalog_means_no_multilang(name in field_name(), requested in any::<Option<bool>>()) {
        let mut form = form_with_column(&name, ColumnMeta::new("varchar").size(50));
        let mut options = FieldOptions::new();
        options.multilang = requested;
        let field = form.add(name.as_str(), options).unwrap();
        prop_assert!(!field.is_multilang());

        let standalone = Field::new(name.as_str(), FieldOptions::new().multilang(true), Arc::new(PlainKind), &Monolingual);
        prop_assert!(!standalone.is_multilang());
    }
}

#[test]
fn translated_columns_are_multilang_only_with_catalog() {
    let schema = Arc::new(
        InMemorySchema::new()
            .table("pages", [("slug", ColumnMeta::new("varchar").size(80))])
            .table("pages_texts", [("title", ColumnMeta::new("varchar").size(200))]),
    );
    let catalog: Arc<dyn MultilangCatalog> = Arc::new(
        InMemoryCatalog::new("en").table("pages", TranslatedTable::new(["title"], "_texts")),
    );

    let mut with_catalog = Form::builder()
        .table("pages")
        .schema(schema.clone())
        .multilang(catalog)
        .build();
    assert!(with_catalog.add("title", FieldOptions::new()).unwrap().is_multilang());

    let mut without = Form::builder().table("pages").schema(schema).build();
    let title = without.add("title", FieldOptions::new()).unwrap();
    assert!(!title.is_multilang());
    assert_eq!(title.maxlength(), None);
}
