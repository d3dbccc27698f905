//! Determinism and per-dialect shape tests for the DDL emitters.

use portsql::builder::add_empty_table;
use portsql::ddl::{AlterOp, Column, ColumnType};
use portsql::dialect::{mysql, postgres, sqlite, Dialect};

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> portsql::ddl::Table {
        add_empty_table("accounts", |t| {
            t.bigint("id").primary_key();
            t.string_with_length("email", 200).unique();
            t.boolean("active").default_value("true");
            t.text("bio").nullable();
        })
        .unwrap()
    }

    #[test]
    fn create_table_is_deterministic() {
        let table = accounts();
        let a = postgres::create_table(&table);
        let b = postgres::create_table(&table);
        assert_eq!(a, b);
    }

    #[test]
    fn postgres_and_sqlite_double_quote_identifiers_mysql_backticks() {
        let table = accounts();
        assert!(postgres::create_table(&table).contains("\"accounts\""));
        assert!(sqlite::create_table(&table).contains("\"accounts\""));
        assert!(mysql::create_table(&table).contains("`accounts`"));
    }

    #[test]
    fn mysql_table_carries_engine_suffix_others_do_not() {
        let table = accounts();
        assert!(mysql::create_table(&table).contains("ENGINE=InnoDB"));
        assert!(!postgres::create_table(&table).contains("ENGINE"));
        assert!(!sqlite::create_table(&table).contains("ENGINE"));
    }

    #[test]
    fn boolean_default_literal_differs_by_dialect() {
        let table = accounts();
        assert!(postgres::create_table(&table).contains("DEFAULT TRUE"));
        assert!(mysql::create_table(&table).contains("DEFAULT 1"));
        assert!(sqlite::create_table(&table).contains("DEFAULT TRUE"));
    }

    #[test]
    fn nullable_column_omits_not_null_non_nullable_carries_it() {
        let table = accounts();
        let sql = postgres::create_table(&table);
        let bio_line = sql.lines().find(|l| l.contains("\"bio\"")).unwrap();
        assert!(!bio_line.contains("NOT NULL"));
        let email_line = sql.lines().find(|l| l.contains("\"email\"")).unwrap();
        assert!(email_line.contains("NOT NULL"));
    }

    #[test]
    fn placeholder_style_is_positional_dollar_for_postgres_and_bare_question_elsewhere() {
        assert_eq!(portsql::dialect::placeholder(Dialect::Postgres, 3), "$3");
        assert_eq!(portsql::dialect::placeholder(Dialect::MySql, 3), "?");
        assert_eq!(portsql::dialect::placeholder(Dialect::Sqlite, 3), "?");
    }

    #[test]
    fn alter_add_and_drop_column_lowers_for_every_dialect() {
        let ops = vec![
            AlterOp::AddColumn {
                column: Column::new("nickname", ColumnType::String { length: None }),
            },
            AlterOp::DropColumn { name: "bio".to_string() },
        ];
        for dialect in [Dialect::Postgres, Dialect::MySql, Dialect::Sqlite] {
            let sql = portsql::dialect::alter_table_sql(dialect, "accounts", &ops).unwrap();
            assert!(sql.contains("ADD COLUMN"));
            assert!(sql.contains("DROP COLUMN"));
        }
    }

    #[test]
    fn sqlite_rejects_change_type_and_change_nullability() {
        let change_type = [AlterOp::ChangeType {
            name: "bio".to_string(),
            new_type: ColumnType::Text,
        }];
        assert!(portsql::dialect::alter_table_sql(Dialect::Sqlite, "accounts", &change_type).is_err());

        let change_nullability = [AlterOp::ChangeNullability {
            name: "bio".to_string(),
            nullable: false,
        }];
        assert!(portsql::dialect::alter_table_sql(Dialect::Sqlite, "accounts", &change_nullability).is_err());
    }

    #[test]
    fn drop_index_requires_table_name_only_on_mysql() {
        assert!(!portsql::dialect::drop_index_sql(Dialect::Postgres, "accounts", "idx_accounts_email").contains("accounts\" ON"));
        assert!(portsql::dialect::drop_index_sql(Dialect::MySql, "accounts", "idx_accounts_email").contains("ON `accounts`"));
    }

    #[test]
    fn drop_table_adds_cascade_only_on_postgres() {
        assert!(postgres::drop_table("accounts").ends_with("CASCADE"));
        assert!(!mysql::drop_table("accounts").ends_with("CASCADE"));
        assert!(!sqlite::drop_table("accounts").ends_with("CASCADE"));
    }
}
