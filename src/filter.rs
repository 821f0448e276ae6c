use crate::error::{DashboardError, Result};
use crate::schema::{get_table, TableSchema, ALL_TABLES};
use tracing::info;

/// Resolves which summary tables to export based on include/exclude filters
pub fn resolve_tables(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static TableSchema>> {
    match (include, exclude) {
        (Some(_), Some(_)) => Err(DashboardError::ConflictingTableFilters),
        (Some(include_list), None) => {
            let included = lookup_all(&include_list)?;
            // keep export order stable regardless of argument order
            let tables: Vec<_> = ALL_TABLES
                .iter()
                .copied()
                .filter(|t| included.iter().any(|i| i.name == t.name))
                .collect();

            info!("Including {} tables: {:?}", tables.len(), names(&tables));
            Ok(tables)
        }
        (None, Some(exclude_list)) => {
            let excluded = lookup_all(&exclude_list)?;
            let tables: Vec<_> = ALL_TABLES
                .iter()
                .copied()
                .filter(|t| !excluded.iter().any(|e| e.name == t.name))
                .collect();

            info!("Including {} tables (after exclusions)", tables.len());
            Ok(tables)
        }
        (None, None) => Ok(ALL_TABLES.to_vec()),
    }
}

fn lookup_all(requested: &[String]) -> Result<Vec<&'static TableSchema>> {
    requested
        .iter()
        .map(|name| {
            let name = name.trim();
            get_table(name).ok_or_else(|| DashboardError::UnknownTable(name.to_string()))
        })
        .collect()
}

fn names(tables: &[&TableSchema]) -> Vec<&'static str> {
    tables.iter().map(|t| t.name).collect()
}
