use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

use super::schema_gen::{generate_create_table, generate_insert};
use crate::aggregate::Dashboard;
use crate::error::Result;
use crate::schema::{tables, TableSchema};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<usize> for SqlValue {
    fn from(v: usize) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<Option<f64>> for SqlValue {
    fn from(v: Option<f64>) -> Self {
        v.map(SqlValue::Real).unwrap_or(SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Rows of one summary table, in the column order of its schema
pub fn table_rows(dashboard: &Dashboard, schema: &TableSchema) -> Vec<Vec<SqlValue>> {
    match schema.name {
        name if name == tables::CATEGORY_ORDERS.name => dashboard
            .categories
            .rows
            .iter()
            .map(|r| vec![r.category.as_str().into(), r.total_order.into()])
            .collect(),
        name if name == tables::MONTHLY_ORDERS.name => dashboard
            .monthly
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.month.as_str().into(),
                    r.total_order.into(),
                    r.revenue.into(),
                ]
            })
            .collect(),
        name if name == tables::SELLER_RFM.name => dashboard
            .rfm
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.seller_id.as_str().into(),
                    r.identifier.into(),
                    r.recency.into(),
                    r.frequency.into(),
                    r.monetary.into(),
                ]
            })
            .collect(),
        name if name == tables::SALES_BY_STATE.name => dashboard
            .states
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.state.as_str().into(),
                    r.total_order.into(),
                    r.lat.into(),
                    r.lng.into(),
                ]
            })
            .collect(),
        name if name == tables::SALES_BY_CITY.name => dashboard
            .cities
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.city.as_str().into(),
                    r.state.as_str().into(),
                    r.total_order.into(),
                    r.lat.into(),
                    r.lng.into(),
                    r.normalized_order.into(),
                ]
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    pub fn new(db_path: &Path) -> Result<Self> {
        // Remove existing database if present
        if db_path.exists() {
            std::fs::remove_file(db_path)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        debug!("Creating {} tables", schemas.len());

        for schema in schemas {
            self.conn.execute(&generate_create_table(schema), [])?;
        }

        Ok(())
    }

    /// Insert all rows of one table in a single transaction
    pub fn insert_table(&mut self, schema: &TableSchema, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let sql = generate_insert(schema);
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in rows {
                for (idx, value) in row.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()?;
            }
        }

        tx.commit()?;
        debug!(table = schema.name, rows = rows.len(), "Inserted table");
        Ok(rows.len() as u64)
    }

    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

/// Write the selected summary tables to a fresh SQLite database
pub fn export_to_sqlite(
    dashboard: &Dashboard,
    output_db: &Path,
    schemas: &[&TableSchema],
) -> Result<u64> {
    let mut writer = SqliteWriter::new(output_db)?;
    writer.create_tables(schemas)?;

    let mut total_records: u64 = 0;
    for schema in schemas {
        let rows = table_rows(dashboard, schema);
        total_records += writer.insert_table(schema, &rows)?;
    }

    writer.finalize()?;
    info!(
        path = %output_db.display(),
        tables = schemas.len(),
        records = total_records,
        "Exported dashboard tables"
    );

    Ok(total_records)
}
