//! Tests for table construction, analysis, and the per-dialect CRUD
//! SQL builder.

use portsql::analyzer::analyze;
use portsql::builder::{add_empty_table, add_table};
use portsql::crud::{self, CrudOptions};
use portsql::dialect::Dialect;

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> portsql::ddl::Table {
        add_table("widgets", |t| {
            t.string("name").indexed();
            t.decimal("price", 10, 2).default_value("0");
        })
        .unwrap()
    }

    #[test]
    fn add_table_prepends_standard_columns() {
        let table = widgets();
        for name in ["id", "public_id", "created_at", "updated_at", "deleted_at"] {
            assert!(table.has_column(name), "missing standard column {name}");
        }
        assert_eq!(table.columns.last().unwrap().name, "price");
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let err = add_empty_table("widgets", |t| {
            t.string("name");
            t.string("name");
        })
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn index_on_unknown_column_is_rejected() {
        let err = add_empty_table("widgets", |t| {
            t.string("name");
            t.index(&["missing"], false);
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown column"));
    }

    #[test]
    fn analyzer_reports_standard_columns_and_crud_eligibility() {
        let table = widgets();
        let analysis = analyze(&table);
        assert!(analysis.is_crud_eligible());
        assert!(analysis.user_columns.iter().all(|c| c.name != "id" && c.name != "public_id"));
        assert_eq!(analysis.addressing_column().unwrap().name, "public_id");
    }

    #[test]
    fn table_without_public_id_is_not_crud_eligible() {
        let table = add_empty_table("events", |t| {
            t.bigint("id").primary_key();
            t.string("kind");
        })
        .unwrap();
        let analysis = analyze(&table);
        assert!(!analysis.is_crud_eligible());
        assert_eq!(analysis.addressing_column().unwrap().name, "id");
    }

    #[test]
    fn postgres_insert_returns_public_id_mysql_does_not() {
        let table = widgets();
        let analysis = analyze(&table);
        let pg = crud::build(&analysis, Dialect::Postgres, &CrudOptions::default()).unwrap();
        let mysql = crud::build(&analysis, Dialect::MySql, &CrudOptions::default()).unwrap();
        assert!(pg.insert.contains("RETURNING \"public_id\""));
        assert!(!mysql.insert.contains("RETURNING"));
    }

    #[test]
    fn soft_delete_table_gets_update_not_delete_and_a_hard_delete_statement() {
        let table = widgets();
        let analysis = analyze(&table);
        let sql = crud::build(&analysis, Dialect::Sqlite, &CrudOptions::default()).unwrap();
        assert!(sql.delete.starts_with("UPDATE"));
        assert!(sql.delete.contains("\"deleted_at\""));
        let hard = sql.hard_delete.expect("soft-delete table must also offer a hard delete");
        assert!(hard.starts_with("DELETE FROM"));
    }

    #[test]
    fn get_and_list_exclude_soft_deleted_rows() {
        let table = widgets();
        let analysis = analyze(&table);
        let sql = crud::build(&analysis, Dialect::Postgres, &CrudOptions::default()).unwrap();
        assert!(sql.get.contains("\"deleted_at\" IS NULL"));
        assert!(sql.list.contains("\"deleted_at\" IS NULL"));
    }

    #[test]
    fn scope_column_is_added_to_every_statement() {
        let table = widgets();
        let analysis = analyze(&table);
        let options = CrudOptions {
            scope_column: Some("tenant_id".to_string()),
        };
        let sql = crud::build(&analysis, Dialect::Postgres, &options).unwrap();
        assert!(sql.get.contains("\"tenant_id\" = $2"));
        assert!(sql.list.contains("\"tenant_id\" = $1"));
        assert!(sql.insert.contains("\"tenant_id\""));
        assert!(sql.update.contains("\"tenant_id\""));
    }

    #[test]
    fn hard_delete_table_without_public_id_is_rejected_by_get() {
        let table = add_empty_table("events", |t| {
            t.string("kind");
        })
        .unwrap();
        let analysis = analyze(&table);
        let err = crud::build(&analysis, Dialect::Sqlite, &CrudOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no public_id and no primary key"));
    }
}
