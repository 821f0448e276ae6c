//! Schema definitions for the exported summary tables

use super::types::*;

pub static CATEGORY_ORDERS: TableSchema = TableSchema {
    name: "category_orders",
    description: "Distinct orders per product category, highest first",
    columns: &[
        Column::key("category", ColumnType::Text),
        Column::required("total_order", ColumnType::Integer),
    ],
};

pub static MONTHLY_ORDERS: TableSchema = TableSchema {
    name: "monthly_orders",
    description: "Distinct orders and revenue per calendar month",
    columns: &[
        Column::key("month", ColumnType::Text),
        Column::required("total_order", ColumnType::Integer),
        Column::required("revenue", ColumnType::Real),
    ],
};

pub static SELLER_RFM: TableSchema = TableSchema {
    name: "seller_rfm",
    description: "Recency, frequency and monetary value per seller",
    columns: &[
        Column::key("seller_id", ColumnType::Text),
        Column::required("identifier", ColumnType::Integer),
        Column::required("recency", ColumnType::Integer),
        Column::required("frequency", ColumnType::Integer),
        Column::required("monetary", ColumnType::Real),
    ],
};

pub static SALES_BY_STATE: TableSchema = TableSchema {
    name: "sales_by_state",
    description: "Top states by distinct orders with median coordinates",
    columns: &[
        Column::key("geolocation_state", ColumnType::Text),
        Column::required("total_order", ColumnType::Integer),
        Column::new("geolocation_lat", ColumnType::Real),
        Column::new("geolocation_lng", ColumnType::Real),
    ],
};

pub static SALES_BY_CITY: TableSchema = TableSchema {
    name: "sales_by_city",
    description: "Cities in the top states with normalized order volume",
    columns: &[
        Column::key("geolocation_city", ColumnType::Text),
        Column::required("geolocation_state", ColumnType::Text),
        Column::required("total_order", ColumnType::Integer),
        Column::new("geolocation_lat", ColumnType::Real),
        Column::new("geolocation_lng", ColumnType::Real),
        Column::required("normalized_order", ColumnType::Real),
    ],
};

/// Every exportable table, in export order
pub static ALL_TABLES: &[&TableSchema] = &[
    &CATEGORY_ORDERS,
    &MONTHLY_ORDERS,
    &SELLER_RFM,
    &SALES_BY_STATE,
    &SALES_BY_CITY,
];

pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
