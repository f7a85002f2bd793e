//! SQL text for the MySQL sink

use crate::dataset::{Column, ColumnType};

/// MySQL rejects statements with more placeholders than this
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Upper bound on rows per INSERT regardless of width
pub const MAX_BATCH_ROWS: usize = 1_000;

pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn column_sql_type(data_type: ColumnType) -> &'static str {
    match data_type {
        ColumnType::Integer => "BIGINT",
        ColumnType::Float => "DOUBLE",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Text => "TEXT",
    }
}

pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let definitions = columns
        .iter()
        .map(|c| format!("{} {} NULL", quote_identifier(&c.name), column_sql_type(c.data_type)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table),
        definitions
    )
}

/// `INSERT INTO ... (cols) ` ready for `QueryBuilder::push_values`
pub fn insert_prefix(table: &str, columns: &[Column]) -> String {
    let names = columns
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO {} ({}) ", quote_identifier(table), names)
}

pub fn rows_per_batch(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).clamp(1, MAX_BATCH_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column {
                name: "id".to_string(),
                data_type: ColumnType::Integer,
            },
            Column {
                name: "amount".to_string(),
                data_type: ColumnType::Float,
            },
            Column {
                name: "odd`name".to_string(),
                data_type: ColumnType::Text,
            },
        ]
    }

    #[test]
    fn test_quote_identifier_escapes_backticks() {
        assert_eq!(quote_identifier("orders"), "`orders`");
        assert_eq!(quote_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            create_table_sql("orders", &columns()),
            "CREATE TABLE IF NOT EXISTS `orders` (`id` BIGINT NULL, `amount` DOUBLE NULL, `odd``name` TEXT NULL)"
        );
    }

    #[test]
    fn test_insert_prefix() {
        assert_eq!(
            insert_prefix("orders", &columns()),
            "INSERT INTO `orders` (`id`, `amount`, `odd``name`) "
        );
    }

    #[test]
    fn test_rows_per_batch_respects_bind_limit() {
        assert_eq!(rows_per_batch(2), MAX_BATCH_ROWS);
        assert_eq!(rows_per_batch(100), 655);
        assert_eq!(rows_per_batch(70_000), 1);
        assert_eq!(rows_per_batch(0), MAX_BATCH_ROWS);
    }
}
