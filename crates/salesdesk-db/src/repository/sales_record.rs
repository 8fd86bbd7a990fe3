//! # Sales Record Repository
//!
//! Database operations for sales records.
//!
//! ## Key Operations
//! - Read the whole table as one consistent snapshot for the query engine
//! - Batched, transactional imports
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales_records row                      SalesRecord                     │
//! │  ──────────────────                     ───────────                     │
//! │  gender 'Female'           ── Decode ──► Gender::Female                 │
//! │  price_per_unit_cents 2500 ────────────► Money(2500)                    │
//! │  discount_bps 500          ────────────► DiscountRate(500)              │
//! │  tags '["mouse","wireless"]' ── JSON ──► Vec<String>                    │
//! │  date '2024-12-02T14:15:00.000Z' ──────► RecordDate::Parsed             │
//! │                                                                         │
//! │  A row that fails any step is logged and skipped; the rest of the       │
//! │  snapshot is still returned.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use salesdesk_core::{
    CustomerType, DeliveryType, DiscountRate, Gender, Money, OrderStatus, PaymentMethod,
    RecordDate, SalesRecord,
};
use sqlx::{FromRow, SqlitePool};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Rows per import transaction.
pub const INSERT_BATCH_SIZE: usize = 1000;

const SELECT_RECORDS: &str = r#"
    SELECT
        id, transaction_id,
        customer_id, customer_name, phone_number, gender, age,
        customer_region, customer_type,
        product_id, product_name, brand, product_category, tags,
        quantity, price_per_unit_cents, discount_bps,
        total_amount_cents, final_amount_cents,
        date, payment_method, order_status, delivery_type,
        store_id, store_location, salesperson_id, employee_name
    FROM sales_records
    ORDER BY rowid
"#;

const INSERT_RECORD: &str = r#"
    INSERT INTO sales_records (
        id, transaction_id,
        customer_id, customer_name, phone_number, gender, age,
        customer_region, customer_type,
        product_id, product_name, brand, product_category, tags,
        quantity, price_per_unit_cents, discount_bps,
        total_amount_cents, final_amount_cents,
        date, payment_method, order_status, delivery_type,
        store_id, store_location, salesperson_id, employee_name,
        imported_at
    ) VALUES (
        ?1, ?2,
        ?3, ?4, ?5, ?6, ?7,
        ?8, ?9,
        ?10, ?11, ?12, ?13, ?14,
        ?15, ?16, ?17,
        ?18, ?19,
        ?20, ?21, ?22, ?23,
        ?24, ?25, ?26, ?27,
        ?28
    )
"#;

// =============================================================================
// Row Type
// =============================================================================

/// One `sales_records` row as stored.
#[derive(Debug, FromRow)]
struct SalesRecordRow {
    id: String,
    transaction_id: Option<String>,
    customer_id: String,
    customer_name: String,
    phone_number: String,
    gender: Gender,
    age: i64,
    customer_region: String,
    customer_type: CustomerType,
    product_id: String,
    product_name: String,
    brand: String,
    product_category: String,
    tags: String,
    quantity: i64,
    price_per_unit_cents: i64,
    discount_bps: i64,
    total_amount_cents: i64,
    final_amount_cents: i64,
    date: String,
    payment_method: PaymentMethod,
    order_status: OrderStatus,
    delivery_type: DeliveryType,
    store_id: String,
    store_location: String,
    salesperson_id: String,
    employee_name: String,
}

impl TryFrom<SalesRecordRow> for SalesRecord {
    type Error = DbError;

    fn try_from(row: SalesRecordRow) -> Result<Self, Self::Error> {
        let tags: Vec<String> = serde_json::from_str(&row.tags)
            .map_err(|e| DbError::invalid_row(&row.id, format!("tags: {e}")))?;
        let age = u32::try_from(row.age)
            .map_err(|_| DbError::invalid_row(&row.id, format!("age {}", row.age)))?;
        let quantity = u32::try_from(row.quantity)
            .map_err(|_| DbError::invalid_row(&row.id, format!("quantity {}", row.quantity)))?;
        let discount_bps = u32::try_from(row.discount_bps)
            .map_err(|_| DbError::invalid_row(&row.id, format!("discount {}", row.discount_bps)))?;

        Ok(SalesRecord {
            transaction_id: row.transaction_id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            phone_number: row.phone_number,
            gender: row.gender,
            age,
            customer_region: row.customer_region,
            customer_type: row.customer_type,
            product_id: row.product_id,
            product_name: row.product_name,
            brand: row.brand,
            product_category: row.product_category,
            tags,
            quantity,
            price_per_unit: Money::from_cents(row.price_per_unit_cents),
            discount_percentage: DiscountRate::from_bps(discount_bps),
            total_amount: Money::from_cents(row.total_amount_cents),
            final_amount: Money::from_cents(row.final_amount_cents),
            date: RecordDate::parse(&row.date),
            payment_method: row.payment_method,
            order_status: row.order_status,
            delivery_type: row.delivery_type,
            store_id: row.store_id,
            store_location: row.store_location,
            salesperson_id: row.salesperson_id,
            employee_name: row.employee_name,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sales record database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.sales_records();
///
/// repo.insert_many(&records).await?;
/// let snapshot = repo.snapshot().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesRecordRepository {
    pool: SqlitePool,
}

impl SalesRecordRepository {
    /// Creates a new SalesRecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRecordRepository { pool }
    }

    /// Reads every record, in insertion order.
    ///
    /// A single SELECT, so the result never reflects a partially-applied
    /// import batch. Rows that do not decode are logged and skipped.
    pub async fn snapshot(&self) -> DbResult<Vec<SalesRecord>> {
        let started = Instant::now();
        let rows = sqlx::query(SELECT_RECORDS).fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for row in &rows {
            let decoded = SalesRecordRow::from_row(row)
                .map_err(DbError::from)
                .and_then(SalesRecord::try_from);

            match decoded {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "Skipping undecodable sales record row");
                }
            }
        }

        debug!(
            count = records.len(),
            skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded sales record snapshot"
        );
        Ok(records)
    }

    /// Inserts records in batches of [`INSERT_BATCH_SIZE`], one transaction
    /// per batch. Returns the number of rows written.
    ///
    /// A failing batch is rolled back and the error returned; earlier batches
    /// stay committed.
    pub async fn insert_many(&self, records: &[SalesRecord]) -> DbResult<usize> {
        let mut inserted = 0usize;

        for (batch_no, batch) in records.chunks(INSERT_BATCH_SIZE).enumerate() {
            let imported_at = Utc::now();
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            for record in batch {
                let tags = serde_json::to_string(&record.tags)
                    .map_err(|e| DbError::Internal(e.to_string()))?;

                sqlx::query(INSERT_RECORD)
                    .bind(Uuid::new_v4().to_string())
                    .bind(&record.transaction_id)
                    .bind(&record.customer_id)
                    .bind(&record.customer_name)
                    .bind(&record.phone_number)
                    .bind(record.gender)
                    .bind(record.age)
                    .bind(&record.customer_region)
                    .bind(record.customer_type)
                    .bind(&record.product_id)
                    .bind(&record.product_name)
                    .bind(&record.brand)
                    .bind(&record.product_category)
                    .bind(tags)
                    .bind(record.quantity)
                    .bind(record.price_per_unit.cents())
                    .bind(record.discount_percentage.bps())
                    .bind(record.total_amount.cents())
                    .bind(record.final_amount.cents())
                    .bind(record.date.to_wire())
                    .bind(record.payment_method)
                    .bind(record.order_status)
                    .bind(record.delivery_type)
                    .bind(&record.store_id)
                    .bind(&record.store_location)
                    .bind(&record.salesperson_id)
                    .bind(&record.employee_name)
                    .bind(imported_at)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            inserted += batch.len();
            debug!(batch = batch_no + 1, rows = batch.len(), "Committed import batch");
        }

        info!(inserted, "Sales records imported");
        Ok(inserted)
    }

    /// Number of stored rows (including any that would fail to decode).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Deletes every row. Returns the number removed.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sales_records")
            .execute(&self.pool)
            .await?;

        info!(deleted = result.rows_affected(), "Sales records cleared");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use salesdesk_core::sample::sample_records;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.sales_records()
            .insert_many(&sample_records())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_snapshot_round_trips_records_in_order() {
        let db = seeded().await;

        let snapshot = db.sales_records().snapshot().await.unwrap();
        assert_eq!(snapshot, sample_records());
    }

    #[tokio::test]
    async fn test_unparseable_date_survives_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut records = sample_records();
        records[0].date = RecordDate::parse("sometime in december");
        records[1].transaction_id = Some("TXN-2".to_string());

        db.sales_records().insert_many(&records).await.unwrap();

        let snapshot = db.sales_records().snapshot().await.unwrap();
        assert_eq!(snapshot[0].date.to_wire(), "sometime in december");
        assert!(snapshot[0].timestamp().is_none());
        assert_eq!(snapshot[1].transaction_id.as_deref(), Some("TXN-2"));
    }

    #[tokio::test]
    async fn test_undecodable_rows_are_skipped() {
        let db = seeded().await;

        sqlx::query("UPDATE sales_records SET gender = 'Robot' WHERE customer_id = 'CUST002'")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE sales_records SET tags = 'not json' WHERE customer_id = 'CUST005'")
            .execute(db.pool())
            .await
            .unwrap();

        let snapshot = db.sales_records().snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 6);
        assert!(snapshot
            .iter()
            .all(|r| r.customer_id != "CUST002" && r.customer_id != "CUST005"));
        assert_eq!(db.sales_records().count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_insert_spans_multiple_batches() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let template = sample_records();
        let records: Vec<SalesRecord> = (0..INSERT_BATCH_SIZE + 250)
            .map(|i| {
                let mut record = template[i % template.len()].clone();
                record.customer_id = format!("CUST{i:05}");
                record
            })
            .collect();

        let inserted = db.sales_records().insert_many(&records).await.unwrap();

        assert_eq!(inserted, INSERT_BATCH_SIZE + 250);
        assert_eq!(db.sales_records().count().await.unwrap(), 1250);
        let snapshot = db.sales_records().snapshot().await.unwrap();
        assert_eq!(snapshot.last().unwrap().customer_id, "CUST01249");
    }

    #[tokio::test]
    async fn test_clear() {
        let db = seeded().await;

        assert_eq!(db.sales_records().clear().await.unwrap(), 8);
        assert_eq!(db.sales_records().count().await.unwrap(), 0);
        assert!(db.sales_records().snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_insert_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.sales_records().insert_many(&[]).await.unwrap(), 0);
    }
}
