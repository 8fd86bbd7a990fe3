//! # Sample Data
//!
//! The built-in eight-record data set. Used by the `seed` binary when no
//! import file is given, and as the shared fixture for engine tests.
//!
//! | # | Customer       | Age | Region        | Category    | Date       |
//! |---|----------------|-----|---------------|-------------|------------|
//! | 1 | John Smith     | 32  | North America | Electronics | 2024-12-01 |
//! | 2 | Sarah Williams | 28  | Europe        | Accessories | 2024-12-02 |
//! | 3 | Michael Chen   | 45  | Asia          | Accessories | 2024-12-03 |
//! | 4 | Emily Brown    | 24  | South America | Accessories | 2024-12-04 |
//! | 5 | James Anderson | 35  | North America | Electronics | 2024-12-05 |
//! | 6 | Lisa Zhang     | 29  | Asia          | Electronics | 2024-12-06 |
//! | 7 | Robert Johnson | 52  | Europe        | Accessories | 2024-12-07 |
//! | 8 | Jessica Davis  | 31  | North America | Electronics | 2024-12-08 |

use crate::money::{DiscountRate, Money};
use crate::types::{
    CustomerType, DeliveryType, Gender, OrderStatus, PaymentMethod, RecordDate, SalesRecord,
};

/// One row of the sample table; amounts in whole cents.
struct Row {
    n: u32,
    name: &'static str,
    gender: Gender,
    age: u32,
    region: &'static str,
    customer_type: CustomerType,
    product: &'static str,
    brand: &'static str,
    category: &'static str,
    tags: [&'static str; 3],
    quantity: u32,
    unit_cents: i64,
    discount_pct: f64,
    date: &'static str,
    payment: PaymentMethod,
    status: OrderStatus,
    delivery: DeliveryType,
    store: (&'static str, &'static str),
    employee: (&'static str, &'static str),
}

impl Row {
    fn into_record(self) -> SalesRecord {
        let price = Money::from_cents(self.unit_cents);
        let discount = DiscountRate::from_percentage(self.discount_pct);
        let total = price.multiply_quantity(self.quantity as i64);

        SalesRecord {
            transaction_id: None,
            customer_id: format!("CUST{:03}", self.n),
            customer_name: self.name.to_string(),
            phone_number: format!("+1-555-{:04}", self.n),
            gender: self.gender,
            age: self.age,
            customer_region: self.region.to_string(),
            customer_type: self.customer_type,
            product_id: format!("PROD{:03}", self.n),
            product_name: self.product.to_string(),
            brand: self.brand.to_string(),
            product_category: self.category.to_string(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            quantity: self.quantity,
            price_per_unit: price,
            discount_percentage: discount,
            total_amount: total,
            final_amount: total.apply_discount(discount),
            date: RecordDate::parse(self.date),
            payment_method: self.payment,
            order_status: self.status,
            delivery_type: self.delivery,
            store_id: self.store.0.to_string(),
            store_location: self.store.1.to_string(),
            salesperson_id: self.employee.0.to_string(),
            employee_name: self.employee.1.to_string(),
        }
    }
}

const NEW_YORK: (&str, &str) = ("STORE001", "New York");
const LONDON: (&str, &str) = ("STORE002", "London");
const TOKYO: (&str, &str) = ("STORE003", "Tokyo");
const SAO_PAULO: (&str, &str) = ("STORE004", "São Paulo");

const ALICE: (&str, &str) = ("EMP001", "Alice Johnson");
const BOB: (&str, &str) = ("EMP002", "Bob Wilson");
const CAROL: (&str, &str) = ("EMP003", "Carol Lee");
const DAVID: (&str, &str) = ("EMP004", "David Martinez");

/// Returns the eight sample records in insertion order.
pub fn sample_records() -> Vec<SalesRecord> {
    use CustomerType::{Premium, Regular};
    use DeliveryType::{Express, Standard};
    use Gender::{Female, Male};
    use OrderStatus::{Delivered, Processing, Shipped};
    use PaymentMethod::{BankTransfer, CreditCard, DebitCard, PayPal};

    let rows = [
        Row {
            n: 1, name: "John Smith", gender: Male, age: 32, region: "North America",
            customer_type: Premium, product: "Laptop Pro", brand: "TechCorp",
            category: "Electronics", tags: ["computer", "laptop", "professional"],
            quantity: 1, unit_cents: 120_000, discount_pct: 10.0,
            date: "2024-12-01T10:30:00Z", payment: CreditCard, status: Delivered,
            delivery: Express, store: NEW_YORK, employee: ALICE,
        },
        Row {
            n: 2, name: "Sarah Williams", gender: Female, age: 28, region: "Europe",
            customer_type: Regular, product: "Wireless Mouse", brand: "TechCorp",
            category: "Accessories", tags: ["mouse", "wireless", "affordable"],
            quantity: 3, unit_cents: 2_500, discount_pct: 5.0,
            date: "2024-12-02T14:15:00Z", payment: PayPal, status: Delivered,
            delivery: Standard, store: LONDON, employee: BOB,
        },
        Row {
            n: 3, name: "Michael Chen", gender: Male, age: 45, region: "Asia",
            customer_type: Premium, product: "USB-C Cable", brand: "ProTech",
            category: "Accessories", tags: ["cable", "usb", "charging"],
            quantity: 10, unit_cents: 1_500, discount_pct: 15.0,
            date: "2024-12-03T09:00:00Z", payment: BankTransfer, status: Processing,
            delivery: Express, store: TOKYO, employee: CAROL,
        },
        Row {
            n: 4, name: "Emily Brown", gender: Female, age: 24, region: "South America",
            customer_type: Regular, product: "Monitor Stand", brand: "DeskPro",
            category: "Accessories", tags: ["monitor", "stand", "ergonomic"],
            quantity: 2, unit_cents: 5_000, discount_pct: 0.0,
            date: "2024-12-04T16:45:00Z", payment: CreditCard, status: Delivered,
            delivery: Standard, store: SAO_PAULO, employee: DAVID,
        },
        Row {
            n: 5, name: "James Anderson", gender: Male, age: 35, region: "North America",
            customer_type: Regular, product: "Mechanical Keyboard", brand: "KeyMaster",
            category: "Electronics", tags: ["keyboard", "mechanical", "gaming"],
            quantity: 1, unit_cents: 15_000, discount_pct: 20.0,
            date: "2024-12-05T11:20:00Z", payment: DebitCard, status: Delivered,
            delivery: Express, store: NEW_YORK, employee: ALICE,
        },
        Row {
            n: 6, name: "Lisa Zhang", gender: Female, age: 29, region: "Asia",
            customer_type: Premium, product: "4K Webcam", brand: "VisionPro",
            category: "Electronics", tags: ["webcam", "video", "4k"],
            quantity: 1, unit_cents: 20_000, discount_pct: 10.0,
            date: "2024-12-06T13:30:00Z", payment: CreditCard, status: Shipped,
            delivery: Standard, store: TOKYO, employee: CAROL,
        },
        Row {
            n: 7, name: "Robert Johnson", gender: Male, age: 52, region: "Europe",
            customer_type: Regular, product: "Desk Lamp", brand: "LightWorks",
            category: "Accessories", tags: ["lamp", "lighting", "desk"],
            quantity: 2, unit_cents: 4_500, discount_pct: 5.0,
            date: "2024-12-07T10:00:00Z", payment: PayPal, status: Delivered,
            delivery: Standard, store: LONDON, employee: BOB,
        },
        Row {
            n: 8, name: "Jessica Davis", gender: Female, age: 31, region: "North America",
            customer_type: Premium, product: "Portable SSD", brand: "StoragePro",
            category: "Electronics", tags: ["storage", "ssd", "portable"],
            quantity: 1, unit_cents: 30_000, discount_pct: 15.0,
            date: "2024-12-08T15:30:00Z", payment: CreditCard, status: Processing,
            delivery: Express, store: NEW_YORK, employee: ALICE,
        },
    ];

    rows.into_iter().map(Row::into_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_amounts_match_source_data() {
        let records = sample_records();
        assert_eq!(records.len(), 8);

        let finals: Vec<i64> = records.iter().map(|r| r.final_amount.cents()).collect();
        assert_eq!(
            finals,
            vec![108_000, 7_125, 12_750, 10_000, 12_000, 18_000, 8_550, 25_500]
        );
    }

    #[test]
    fn test_sample_dates_all_parse() {
        assert!(sample_records().iter().all(|r| r.timestamp().is_some()));
    }
}
