use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::{DashboardError, Result};

/// One order-item-seller-geolocation line of the joined export
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub order_id: String,
    pub customer_id: Option<String>,
    pub seller_id: Option<String>,
    pub category: Option<String>,
    pub purchased_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_carrier_at: Option<NaiveDateTime>,
    pub delivered_customer_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    pub shipping_limit_at: Option<NaiveDateTime>,
    /// `None` for a blank cell; contributes nothing to revenue or monetary sums
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Transaction {
    /// Create a row with only the required fields set
    pub fn new(
        order_id: impl Into<String>,
        seller_id: impl Into<String>,
        purchased_at: NaiveDateTime,
        price: f64,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: None,
            seller_id: Some(seller_id.into()),
            category: None,
            purchased_at,
            approved_at: None,
            delivered_carrier_at: None,
            delivered_customer_at: None,
            estimated_delivery_at: None,
            shipping_limit_at: None,
            price: Some(price),
            state: None,
            city: None,
            lat: None,
            lng: None,
        }
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..self
        }
    }

    pub fn with_location(
        self,
        state: impl Into<String>,
        city: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            state: Some(state.into()),
            city: Some(city.into()),
            lat: Some(lat),
            lng: Some(lng),
            ..self
        }
    }

    /// Calendar date of the purchase timestamp
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

pub const ORDER_ID: &str = "order_id";
pub const CUSTOMER_ID: &str = "customer_id";
pub const SELLER_ID: &str = "seller_id";
pub const CATEGORY: &str = "product_category_name_english";
pub const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const APPROVED_AT: &str = "order_approved_at";
pub const DELIVERED_CARRIER: &str = "order_delivered_carrier_date";
pub const DELIVERED_CUSTOMER: &str = "order_delivered_customer_date";
pub const ESTIMATED_DELIVERY: &str = "order_estimated_delivery_date";
pub const SHIPPING_LIMIT: &str = "shipping_limit_date";
pub const PRICE: &str = "price";
pub const STATE: &str = "geolocation_state";
pub const CITY: &str = "geolocation_city";
pub const LAT: &str = "geolocation_lat";
pub const LNG: &str = "geolocation_lng";

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    ORDER_ID,
    SELLER_ID,
    CATEGORY,
    PURCHASE_TIMESTAMP,
    PRICE,
    STATE,
    CITY,
    LAT,
    LNG,
];

/// Column positions resolved once from the header row
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    order_id: usize,
    seller_id: usize,
    category: usize,
    purchased_at: usize,
    price: usize,
    state: usize,
    city: usize,
    lat: usize,
    lng: usize,
    customer_id: Option<usize>,
    approved_at: Option<usize>,
    delivered_carrier_at: Option<usize>,
    delivered_customer_at: Option<usize>,
    estimated_delivery_at: Option<usize>,
    shipping_limit_at: Option<usize>,
}

impl ColumnIndex {
    /// Locate every column; fails on the first required column that is absent
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| {
            find(name).ok_or(DashboardError::MissingColumn { column: name })
        };

        Ok(Self {
            order_id: require(ORDER_ID)?,
            seller_id: require(SELLER_ID)?,
            category: require(CATEGORY)?,
            purchased_at: require(PURCHASE_TIMESTAMP)?,
            price: require(PRICE)?,
            state: require(STATE)?,
            city: require(CITY)?,
            lat: require(LAT)?,
            lng: require(LNG)?,
            customer_id: find(CUSTOMER_ID),
            approved_at: find(APPROVED_AT),
            delivered_carrier_at: find(DELIVERED_CARRIER),
            delivered_customer_at: find(DELIVERED_CUSTOMER),
            estimated_delivery_at: find(ESTIMATED_DELIVERY),
            shipping_limit_at: find(SHIPPING_LIMIT),
        })
    }
}

/// Parse one CSV record into a transaction
pub fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<Transaction> {
    let cell = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let text = |idx: usize| cell(idx).map(str::to_string);
    let required = |idx: usize, column: &'static str| {
        text(idx).ok_or(DashboardError::MissingValue { line, column })
    };
    let timestamp = |idx: Option<usize>, column: &'static str| -> Result<Option<NaiveDateTime>> {
        match idx.and_then(cell) {
            None => Ok(None),
            Some(value) => parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| DashboardError::InvalidTimestamp {
                    line,
                    column,
                    value: value.to_string(),
                }),
        }
    };
    let number = |idx: usize, column: &'static str| -> Result<Option<f64>> {
        match cell(idx) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .map(|v| Some(v).filter(|v| v.is_finite()))
                .map_err(|_| DashboardError::InvalidNumber {
                    line,
                    column,
                    value: value.to_string(),
                }),
        }
    };

    let purchased_at = timestamp(Some(columns.purchased_at), PURCHASE_TIMESTAMP)?
        .ok_or(DashboardError::MissingValue {
            line,
            column: PURCHASE_TIMESTAMP,
        })?;

    let price = match cell(columns.price) {
        None => None,
        Some(value) => Some(
            value
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| DashboardError::InvalidNumber {
                    line,
                    column: PRICE,
                    value: value.to_string(),
                })?,
        ),
    };

    Ok(Transaction {
        order_id: required(columns.order_id, ORDER_ID)?,
        customer_id: columns.customer_id.and_then(text),
        seller_id: text(columns.seller_id),
        category: text(columns.category),
        purchased_at,
        approved_at: timestamp(columns.approved_at, APPROVED_AT)?,
        delivered_carrier_at: timestamp(columns.delivered_carrier_at, DELIVERED_CARRIER)?,
        delivered_customer_at: timestamp(columns.delivered_customer_at, DELIVERED_CUSTOMER)?,
        estimated_delivery_at: timestamp(columns.estimated_delivery_at, ESTIMATED_DELIVERY)?,
        shipping_limit_at: timestamp(columns.shipping_limit_at, SHIPPING_LIMIT)?,
        price,
        state: text(columns.state),
        city: text(columns.city),
        lat: number(columns.lat, LAT)?,
        lng: number(columns.lng, LNG)?,
    })
}

/// Parse `YYYY-MM-DD HH:MM:SS[.fff]`, the `T`-separated form, or a bare date
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
