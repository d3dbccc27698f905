//! JSON round-trip and builder-invariant tests for the DDL IR.

use portsql::ddl::{Column, ColumnType, ForeignKeyRef, Index, Table};
use proptest::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut id = Column::new("id", ColumnType::Bigint);
        id.primary_key = true;

        let mut name = Column::new("name", ColumnType::String { length: Some(120) });
        name.unique = true;

        let mut price = Column::new("price", ColumnType::Decimal { precision: 10, scale: 2 });
        price.default = Some("0".to_string());

        let mut note = Column::new("note", ColumnType::Text);
        note.nullable = true;
        note.foreign_key = Some(ForeignKeyRef {
            table: "categories".to_string(),
            column: "id".to_string(),
        });

        Table {
            name: "widgets".to_string(),
            columns: vec![id, name, price, note],
            indexes: vec![Index::new("widgets", vec!["name".to_string()], true)],
        }
    }

    #[test]
    fn table_round_trips_through_json() {
        let table = sample_table();
        let json = serde_json::to_string(&table).unwrap();
        let restored: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(table, restored);
    }

    #[test]
    fn column_json_flattens_length_and_precision_by_type() {
        let mut col = Column::new("name", ColumnType::String { length: Some(64) });
        col.nullable = true;
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["length"], 64);
        assert!(json.get("precision").is_none());

        let decimal = Column::new("amount", ColumnType::Decimal { precision: 12, scale: 4 });
        let json = serde_json::to_value(&decimal).unwrap();
        assert_eq!(json["precision"], 12);
        assert_eq!(json["scale"], 4);
        assert!(json.get("length").is_none());
    }

    #[test]
    fn unknown_column_type_tag_is_rejected() {
        let bad = r#"{"name":"x","type":"enum","nullable":false,"default":null,"unique":false,"primary_key":false,"index":false,"foreign_key":null}"#;
        let result: Result<Column, _> = serde_json::from_str(bad);
        assert!(result.is_err());
    }

    #[test]
    fn primary_key_column_is_never_effectively_nullable() {
        let mut id = Column::new("id", ColumnType::Bigint);
        id.primary_key = true;
        id.nullable = true;
        assert!(!id.is_effectively_nullable());
    }

    #[test]
    fn index_default_name_joins_table_and_columns() {
        let idx = Index::new("widgets", vec!["a".to_string(), "b".to_string()], false);
        assert_eq!(idx.name, "idx_widgets_a_b");
    }

    fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        prop_oneof![
            Just(ColumnType::Integer),
            Just(ColumnType::Bigint),
            (1u32..20, 0u32..6).prop_map(|(precision, scale)| ColumnType::Decimal { precision, scale }),
            Just(ColumnType::Float),
            Just(ColumnType::Boolean),
            proptest::option::of(1u32..255).prop_map(|length| ColumnType::String { length }),
            Just(ColumnType::Text),
            Just(ColumnType::Datetime),
            Just(ColumnType::Timestamp),
            Just(ColumnType::Binary),
            Just(ColumnType::Json),
        ]
    }

    proptest! {
        #[test]
        fn column_round_trips_through_json_for_any_type(
            name in "[a-z][a-z0-9_]{0,15}",
            col_type in arb_column_type(),
            nullable in any::<bool>(),
            unique in any::<bool>(),
            primary_key in any::<bool>(),
            index in any::<bool>(),
        ) {
            let mut col = Column::new(name, col_type);
            col.nullable = nullable;
            col.unique = unique;
            col.primary_key = primary_key;
            col.index = index;

            let json = serde_json::to_string(&col).unwrap();
            let restored: Column = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(col, restored);
        }
    }
}
