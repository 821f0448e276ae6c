use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);

    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|col| {
            let pk = if col.primary_key { " PRIMARY KEY" } else { "" };
            let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
            format!(
                "    {} {}{}{}",
                col.name,
                col.col_type.sql_type(),
                pk,
                null_constraint
            )
        })
        .collect();

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate the parameterized INSERT statement for a table schema
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{SALES_BY_CITY, SELLER_RFM};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&SALES_BY_CITY);
        assert!(sql.contains("CREATE TABLE sales_by_city"));
        assert!(sql.contains("geolocation_city TEXT PRIMARY KEY NOT NULL"));
        assert!(sql.contains("geolocation_lat REAL,"));
        assert!(sql.contains("normalized_order REAL NOT NULL"));
    }

    #[test]
    fn test_generate_insert() {
        let sql = generate_insert(&SELLER_RFM);
        assert_eq!(
            sql,
            "INSERT INTO seller_rfm (seller_id, identifier, recency, frequency, monetary) \
             VALUES (?, ?, ?, ?, ?)"
        );
    }
}
