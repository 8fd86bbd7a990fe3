//! # Ingestion Mapping
//!
//! Maps raw import rows onto the canonical [`SalesRecord`].
//!
//! Import files come from spreadsheets, CSV exports and older API dumps, so
//! the same column shows up under many names. Names are folded once here and
//! the query engine only ever sees one record shape.
//!
//! ## Column Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Customer Name" ─┐                                                     │
//! │  "customer_name" ─┼─► fold_key ─► "customername" ─► customer_name       │
//! │  "CustomerName"  ─┘                                                     │
//! │                                                                         │
//! │  Short legacy headers are aliases:                                      │
//! │  "Region" → customerRegion, "Category" → productCategory,               │
//! │  "Price" → pricePerUnit, "Total" → totalAmount, "Status" → orderStatus  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Rules
//! - Numbers may arrive as JSON numbers or numeric strings
//! - Age is clamped to 0..=150, quantity to ≥ 1, discount to 0..=100,
//!   amounts to ≥ 0
//! - Missing totals are derived from quantity, unit price and discount
//! - Unknown enum labels fall back to the enum default
//! - Tags may be an array, a JSON-array string or comma-separated text
//! - An unparseable date is kept verbatim (see [`RecordDate`])

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};
use crate::normalize::fold_key;
use crate::types::RecordDate;
use crate::types::SalesRecord;
use crate::validation::{clamp_age, clamp_quantity, require_text};

/// Folded column names accepted for each canonical field.
mod columns {
    pub const TRANSACTION_ID: &[&str] = &["transactionid"];
    pub const CUSTOMER_ID: &[&str] = &["customerid"];
    pub const CUSTOMER_NAME: &[&str] = &["customername"];
    pub const PHONE_NUMBER: &[&str] = &["phonenumber", "phone"];
    pub const GENDER: &[&str] = &["gender"];
    pub const AGE: &[&str] = &["age"];
    pub const CUSTOMER_REGION: &[&str] = &["customerregion", "region"];
    pub const CUSTOMER_TYPE: &[&str] = &["customertype", "type"];
    pub const PRODUCT_ID: &[&str] = &["productid"];
    pub const PRODUCT_NAME: &[&str] = &["productname"];
    pub const BRAND: &[&str] = &["brand"];
    pub const PRODUCT_CATEGORY: &[&str] = &["productcategory", "category"];
    pub const TAGS: &[&str] = &["tags"];
    pub const QUANTITY: &[&str] = &["quantity"];
    pub const PRICE_PER_UNIT: &[&str] = &["priceperunit", "price"];
    pub const DISCOUNT: &[&str] = &["discountpercentage", "discount"];
    pub const TOTAL_AMOUNT: &[&str] = &["totalamount", "total"];
    pub const FINAL_AMOUNT: &[&str] = &["finalamount"];
    pub const DATE: &[&str] = &["date", "orderdate"];
    pub const PAYMENT_METHOD: &[&str] = &["paymentmethod"];
    pub const ORDER_STATUS: &[&str] = &["orderstatus", "status"];
    pub const DELIVERY_TYPE: &[&str] = &["deliverytype"];
    pub const STORE_ID: &[&str] = &["storeid"];
    pub const STORE_LOCATION: &[&str] = &["storelocation", "location"];
    pub const SALESPERSON_ID: &[&str] = &["salespersonid"];
    pub const EMPLOYEE_NAME: &[&str] = &["employeename"];
}

// =============================================================================
// Import Report
// =============================================================================

/// Outcome of mapping a batch of rows.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub records: Vec<SalesRecord>,
    /// One entry per row that could not be mapped.
    pub rejected: Vec<CoreError>,
}

impl ImportReport {
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Parses an import document and maps every row.
///
/// Accepts a top-level array, or an object wrapping the array under
/// `records`, `data` or `sales`.
///
/// ## Example
/// ```rust
/// use salesdesk_core::ingest::parse_document;
///
/// let json = r#"[{"Customer ID": "C1", "Customer Name": "Ada", "Product ID": "P1",
///                 "Quantity": "2", "Price per Unit": 10, "Discount": 50}]"#;
/// let report = parse_document(json).unwrap();
///
/// assert_eq!(report.records[0].final_amount.cents(), 1000);
/// ```
pub fn parse_document(json: &str) -> CoreResult<ImportReport> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| CoreError::InvalidDocument(e.to_string()))?;

    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut wrapper) => ["records", "data", "sales"]
            .iter()
            .find_map(|key| match wrapper.remove(*key) {
                Some(Value::Array(rows)) => Some(rows),
                _ => None,
            })
            .ok_or_else(|| {
                CoreError::InvalidDocument("expected an array of rows".to_string())
            })?,
        _ => {
            return Err(CoreError::InvalidDocument(
                "expected an array of rows".to_string(),
            ))
        }
    };

    Ok(map_rows(&rows))
}

/// Maps each row independently. A bad row never aborts the batch.
pub fn map_rows(rows: &[Value]) -> ImportReport {
    let mut report = ImportReport::default();
    for (index, row) in rows.iter().enumerate() {
        match map_row(index, row) {
            Ok(record) => report.records.push(record),
            Err(err) => report.rejected.push(err),
        }
    }
    report
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps one raw row onto a canonical record.
///
/// ## Errors
/// - The row is not a JSON object
/// - `customerId` or `productId` is missing or blank
/// - A text column holds an array or object
pub fn map_row(index: usize, row: &Value) -> CoreResult<SalesRecord> {
    let object = row.as_object().ok_or_else(|| CoreError::InvalidImportRow {
        index,
        reason: "expected an object".to_string(),
    })?;
    let row = Row::new(index, object);

    let customer_id = row.required(columns::CUSTOMER_ID, "customerId")?;
    let product_id = row.required(columns::PRODUCT_ID, "productId")?;

    let quantity = row
        .number(columns::QUANTITY)
        .map(|q| clamp_quantity(q.trunc() as i64))
        .unwrap_or(1);
    let price_per_unit = row.money(columns::PRICE_PER_UNIT).unwrap_or_default();
    let discount = row
        .number(columns::DISCOUNT)
        .map(DiscountRate::from_percentage)
        .unwrap_or_default();

    let total_amount = row
        .money(columns::TOTAL_AMOUNT)
        .unwrap_or_else(|| price_per_unit.multiply_quantity(quantity as i64));
    let final_amount = row
        .money(columns::FINAL_AMOUNT)
        .unwrap_or_else(|| total_amount.apply_discount(discount));

    Ok(SalesRecord {
        transaction_id: row.text(columns::TRANSACTION_ID)?,
        customer_id,
        customer_name: row.text_or(columns::CUSTOMER_NAME, "Unknown")?,
        phone_number: row.text_or(columns::PHONE_NUMBER, "")?,
        gender: row.label(columns::GENDER)?,
        age: row
            .number(columns::AGE)
            .map(|age| clamp_age(age.trunc() as i64))
            .unwrap_or(0),
        customer_region: row.text_or(columns::CUSTOMER_REGION, "Unknown")?,
        customer_type: row.label(columns::CUSTOMER_TYPE)?,
        product_id,
        product_name: row.text_or(columns::PRODUCT_NAME, "Unknown Product")?,
        brand: row.text_or(columns::BRAND, "Unknown")?,
        product_category: row.text_or(columns::PRODUCT_CATEGORY, "General")?,
        tags: row.tags(columns::TAGS),
        quantity,
        price_per_unit,
        discount_percentage: discount,
        total_amount,
        final_amount,
        date: row
            .text(columns::DATE)?
            .map(|raw| RecordDate::parse(&raw))
            .unwrap_or_default(),
        payment_method: row.label(columns::PAYMENT_METHOD)?,
        order_status: row.label(columns::ORDER_STATUS)?,
        delivery_type: row.label(columns::DELIVERY_TYPE)?,
        store_id: row.text_or(columns::STORE_ID, "STORE001")?,
        store_location: row.text_or(columns::STORE_LOCATION, "Unknown")?,
        salesperson_id: row.text_or(columns::SALESPERSON_ID, "EMP001")?,
        employee_name: row.text_or(columns::EMPLOYEE_NAME, "Unknown")?,
    })
}

/// A raw row indexed by folded column name.
struct Row<'a> {
    index: usize,
    columns: HashMap<String, &'a Value>,
}

impl<'a> Row<'a> {
    fn new(index: usize, object: &'a Map<String, Value>) -> Self {
        let mut columns = HashMap::with_capacity(object.len());
        for (key, value) in object {
            // First spelling wins when a row carries the same column twice.
            columns.entry(fold_key(key)).or_insert(value);
        }
        Self { index, columns }
    }

    /// First present, non-null value among the aliases.
    fn get(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| self.columns.get(*alias).copied())
            .find(|value| !value.is_null())
    }

    fn invalid(&self, reason: String) -> CoreError {
        CoreError::InvalidImportRow {
            index: self.index,
            reason,
        }
    }

    /// Trimmed text; blank is absent.
    fn text(&self, aliases: &[&str]) -> CoreResult<Option<String>> {
        let text = match self.get(aliases) {
            None => return Ok(None),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => {
                return Err(self.invalid(format!("{} must be text", aliases[0])));
            }
        };
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    fn text_or(&self, aliases: &[&str], fallback: &str) -> CoreResult<String> {
        Ok(self
            .text(aliases)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    fn required(&self, aliases: &[&str], field: &str) -> CoreResult<String> {
        let text = self.text(aliases)?.unwrap_or_default();
        require_text(field, &text).map_err(|e| self.invalid(e.to_string()))
    }

    /// Numeric value from a number or numeric string. Garbage is absent.
    fn number(&self, aliases: &[&str]) -> Option<f64> {
        let value = match self.get(aliases)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Non-negative money amount.
    fn money(&self, aliases: &[&str]) -> Option<Money> {
        self.number(aliases)
            .map(|amount| Money::from_decimal(amount).non_negative())
    }

    /// Enum label; unknown or missing labels give the default variant.
    fn label<T>(&self, aliases: &[&str]) -> CoreResult<T>
    where
        T: std::str::FromStr + Default,
    {
        Ok(self
            .text(aliases)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    fn tags(&self, aliases: &[&str]) -> Vec<String> {
        let raw: Vec<String> = match self.get(aliases) {
            Some(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
            Some(Value::String(s)) => split_tags(s),
            _ => Vec::new(),
        };
        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `["a","b"]` or `a, b`.
fn split_tags(raw: &str) -> Vec<String> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw.trim()) {
        return items.iter().filter_map(value_as_text).collect();
    }
    raw.split(',').map(str::to_string).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerType, DeliveryType, Gender, OrderStatus, PaymentMethod};
    use serde_json::json;

    #[test]
    fn test_maps_spreadsheet_headers() {
        let row = json!({
            "Transaction ID": "TXN-9",
            "Customer ID": "CUST010",
            "Customer Name": "  Ada Lovelace ",
            "Phone Number": "+44-20-0000",
            "Gender": "f",
            "Age": "36",
            "Customer Region": "Europe",
            "Customer Type": "vip",
            "Product ID": "PROD010",
            "Product Name": "Analytical Engine",
            "Brand": "Babbage",
            "Product Category": "Electronics",
            "Tags": "gears, steam ,",
            "Quantity": 2,
            "Price per Unit": "150.50",
            "Discount Percentage": 10,
            "Date": "2024-11-30T08:00:00Z",
            "Payment Method": "bank",
            "Order Status": "canceled",
            "Delivery Type": "next",
            "Store ID": "STORE009",
            "Store Location": "London",
            "Salesperson ID": "EMP009",
            "Employee Name": "Charles"
        });

        let record = map_row(0, &row).unwrap();

        assert_eq!(record.transaction_id.as_deref(), Some("TXN-9"));
        assert_eq!(record.customer_name, "Ada Lovelace");
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.age, 36);
        assert_eq!(record.customer_type, CustomerType::Vip);
        assert_eq!(record.tags, vec!["gears", "steam"]);
        assert_eq!(record.total_amount.cents(), 30_100);
        assert_eq!(record.final_amount.cents(), 27_090);
        assert_eq!(record.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(record.order_status, OrderStatus::Cancelled);
        assert_eq!(record.delivery_type, DeliveryType::NextDay);
        assert!(record.timestamp().is_some());
    }

    #[test]
    fn test_snake_and_camel_case_columns() {
        let snake = json!({"customer_id": "C1", "product_id": "P1", "customer_name": "Bo"});
        let camel = json!({"customerId": "C1", "productId": "P1", "customerName": "Bo"});
        let pascal = json!({"CustomerID": "C1", "ProductID": "P1", "CustomerName": "Bo"});

        for row in [snake, camel, pascal] {
            let record = map_row(0, &row).unwrap();
            assert_eq!(record.customer_id, "C1");
            assert_eq!(record.customer_name, "Bo");
        }
    }

    #[test]
    fn test_values_are_clamped() {
        let row = json!({
            "customerId": "C1",
            "productId": "P1",
            "age": 212,
            "quantity": 0,
            "discountPercentage": 140,
            "pricePerUnit": -5,
            "finalAmount": -1
        });

        let record = map_row(0, &row).unwrap();
        assert_eq!(record.age, 150);
        assert_eq!(record.quantity, 1);
        assert_eq!(record.discount_percentage.bps(), 10_000);
        assert!(record.price_per_unit.is_zero());
        assert!(record.final_amount.is_zero());
    }

    #[test]
    fn test_oversized_price_saturates_derived_totals() {
        let row = json!({
            "customerId": "C1",
            "productId": "P1",
            "pricePerUnit": 1.0e17,
            "quantity": 1000,
            "discountPercentage": 10
        });

        let record = map_row(0, &row).unwrap();
        assert_eq!(record.price_per_unit.cents(), i64::MAX);
        assert_eq!(record.total_amount.cents(), i64::MAX);
        assert!(record.final_amount.cents() > 0);
        assert!(record.final_amount < record.total_amount);
    }

    #[test]
    fn test_defaults_for_missing_columns() {
        let record = map_row(3, &json!({"customerId": "C1", "productId": "P1"})).unwrap();

        assert_eq!(record.customer_name, "Unknown");
        assert_eq!(record.product_category, "General");
        assert_eq!(record.gender, Gender::Other);
        assert_eq!(record.payment_method, PaymentMethod::Cash);
        assert_eq!(record.order_status, OrderStatus::Delivered);
        assert!(record.tags.is_empty());
        assert!(record.timestamp().is_none());
    }

    #[test]
    fn test_tags_from_json_array_string_and_array() {
        let from_string = json!({"customerId": "C", "productId": "P", "tags": "[\"a\", \"b\"]"});
        let from_array = json!({"customerId": "C", "productId": "P", "tags": ["a", " ", "b"]});

        assert_eq!(map_row(0, &from_string).unwrap().tags, vec!["a", "b"]);
        assert_eq!(map_row(0, &from_array).unwrap().tags, vec!["a", "b"]);
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        let row = json!({"customerId": "C", "productId": "P", "date": "13/13/2024"});
        let record = map_row(0, &row).unwrap();
        assert_eq!(record.date, RecordDate::Unparsed("13/13/2024".to_string()));
    }

    #[test]
    fn test_rejects_rows_without_ids_or_objects() {
        let err = map_row(2, &json!({"customerName": "No Id"})).unwrap_err();
        assert!(err.to_string().contains("customerId is required"));

        let err = map_row(5, &json!("just text")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidImportRow { index: 5, .. }));

        let err = map_row(0, &json!({"customerId": {"nested": 1}, "productId": "P"})).unwrap_err();
        assert!(err.to_string().contains("must be text"));
    }

    #[test]
    fn test_bad_rows_do_not_abort_batch() {
        let rows = vec![
            json!({"customerId": "C1", "productId": "P1"}),
            json!(42),
            json!({"customerId": "C3", "productId": "P3"}),
        ];
        let report = map_rows(&rows);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.total_rows(), 3);
    }

    #[test]
    fn test_parse_document_shapes() {
        let bare = r#"[{"customerId": "C1", "productId": "P1"}]"#;
        let wrapped = r#"{"records": [{"customerId": "C1", "productId": "P1"}]}"#;

        assert_eq!(parse_document(bare).unwrap().records.len(), 1);
        assert_eq!(parse_document(wrapped).unwrap().records.len(), 1);
        assert!(matches!(
            parse_document(r#"{"rows": 1}"#),
            Err(CoreError::InvalidDocument(_))
        ));
        assert!(parse_document("not json").is_err());
    }

    #[test]
    fn test_sample_records_survive_json_import() {
        let records = crate::sample::sample_records();
        let json = serde_json::to_string(&records).unwrap();

        let report = parse_document(&json).unwrap();
        assert!(report.rejected.is_empty());
        assert_eq!(report.records, records);
    }
}
