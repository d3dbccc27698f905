//! Tests for the naming rules and generated-source syntactic validity of
//! the CRUD/query code generator.

use portsql::builder::add_table;
use portsql::codegen::{
    generate_runner, pascal_case, singularize, CompiledQuery, HostType, Param, QuerySql, ResultColumn, ReturnShape, GENERATED_SENTINEL,
};
use portsql::crud::CrudOptions;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_splits_on_underscore_and_capitalizes_each_part() {
        assert_eq!(pascal_case("list_active_widgets"), "ListActiveWidgets");
        assert_eq!(pascal_case("id"), "Id");
        assert_eq!(pascal_case(""), "X");
    }

    #[test]
    fn pascal_case_prefixes_digit_leading_results() {
        assert_eq!(pascal_case("2fa_codes"), "X2faCodes");
    }

    #[test]
    fn singularize_handles_ies_es_and_s_suffixes() {
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("widgets"), "widget");
        assert_eq!(singularize("data"), "data");
    }

    fn widgets_table() -> portsql::ddl::Table {
        add_table("widgets", |t| {
            t.string("name");
            t.decimal("price", 10, 2);
        })
        .unwrap()
    }

    fn sample_query() -> CompiledQuery {
        CompiledQuery {
            name: "find_widget_by_name".to_string(),
            sql: QuerySql {
                postgres: "SELECT id, name FROM widgets WHERE name = $1".to_string(),
                mysql: "SELECT id, name FROM widgets WHERE name = ?".to_string(),
                sqlite: "SELECT id, name FROM widgets WHERE name = ?".to_string(),
            },
            params: vec![Param {
                name: "name".to_string(),
                host_type: HostType::String,
            }],
            results: vec![
                ResultColumn {
                    name: "id".to_string(),
                    host_type: HostType::I64,
                    nested: None,
                },
                ResultColumn {
                    name: "name".to_string(),
                    host_type: HostType::String,
                    nested: None,
                },
            ],
            shape: ReturnShape::One,
        }
    }

    #[test]
    fn generated_source_begins_with_the_sentinel_line() {
        let table = widgets_table();
        let source = generate_runner(&[], std::slice::from_ref(&table), |_| CrudOptions::default()).unwrap();
        assert!(source.starts_with(GENERATED_SENTINEL));
    }

    #[test]
    fn generated_source_for_crud_and_queries_is_syntactically_valid_rust() {
        let table = widgets_table();
        let query = sample_query();
        let source = generate_runner(&[query], std::slice::from_ref(&table), |_| CrudOptions::default()).unwrap();
        if let Err(e) = syn::parse_file(&source) {
            panic!("generated source failed to parse: {e}\n---\n{source}");
        }
    }

    #[test]
    fn generated_source_with_no_tables_or_queries_still_parses() {
        let source = generate_runner(&[], &[], |_| CrudOptions::default()).unwrap();
        syn::parse_file(&source).expect("empty runner should still be valid Rust");
    }

    #[test]
    fn column_host_type_wraps_nullable_columns_in_option() {
        use portsql::codegen::query::column_host_type;
        use portsql::ddl::ColumnType;
        assert_eq!(column_host_type(&ColumnType::Integer, false), HostType::I32);
        assert_eq!(column_host_type(&ColumnType::Integer, true), HostType::Option(Box::new(HostType::I32)));
    }
}
