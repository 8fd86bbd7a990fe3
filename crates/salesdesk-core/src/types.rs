//! # Domain Types
//!
//! Core domain types used throughout Salesdesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           SalesRecord                                   │
//! │                                                                         │
//! │  ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐           │
//! │  │    Customer     │ │    Product      │ │  Transaction    │           │
//! │  │  ─────────────  │ │  ─────────────  │ │  ─────────────  │           │
//! │  │  customerId     │ │  productId      │ │  quantity       │           │
//! │  │  customerName   │ │  productName    │ │  pricePerUnit   │           │
//! │  │  phoneNumber    │ │  brand          │ │  discount %     │           │
//! │  │  gender         │ │  category       │ │  totalAmount    │           │
//! │  │  age, region    │ │  tags[]         │ │  finalAmount    │           │
//! │  │  customerType   │ └─────────────────┘ └─────────────────┘           │
//! │  └─────────────────┘                                                   │
//! │  ┌───────────────────────────────────────────────────────────┐         │
//! │  │  Operational: date, paymentMethod, orderStatus,           │         │
//! │  │  deliveryType, storeId, storeLocation, salesperson        │         │
//! │  └───────────────────────────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Labelled Enums
//! Categorical fields with a closed domain are enums whose wire form is the
//! human label (`"Credit Card"`, `"Next Day"`). Parsing is forgiving: casing,
//! spaces, hyphens and underscores are ignored, and the short aliases older
//! exports used (`"m"`, `"credit"`, `"same"`) are accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{DiscountRate, Money};
use crate::normalize::{fold_key, format_timestamp, parse_timestamp};

// =============================================================================
// Labelled Enum Macro
// =============================================================================

/// Declares a closed set of labelled values.
///
/// Generates the enum (with sqlx/ts-rs attributes), `ALL`, `as_str`,
/// `Display`, a forgiving `FromStr`, and label-based serde impls. Exactly
/// one variant carries `#[default]`.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[ts(export)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "sqlx", sqlx(rename = $label))]
                #[ts(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The display label, which is also the wire form.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = fold_key(s);
                $(
                    if key == fold_key($label) $(|| key == fold_key($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(ValidationError::not_allowed($field, &[$($label),+]))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// =============================================================================
// Customer Enums
// =============================================================================

labelled_enum! {
    /// Customer gender as recorded at the point of sale.
    Gender ("gender") {
        Male => "Male" | "m",
        Female => "Female" | "f",
        #[default]
        Other => "Other" | "o",
    }
}

labelled_enum! {
    /// Loyalty tier of the customer.
    CustomerType ("customerType") {
        #[default]
        Regular => "Regular",
        Premium => "Premium",
        Vip => "VIP",
    }
}

// =============================================================================
// Operational Enums
// =============================================================================

labelled_enum! {
    /// How the customer paid.
    PaymentMethod ("paymentMethod") {
        CreditCard => "Credit Card" | "credit",
        DebitCard => "Debit Card" | "debit",
        #[default]
        Cash => "Cash",
        PayPal => "PayPal",
        BankTransfer => "Bank Transfer" | "bank",
    }
}

labelled_enum! {
    /// Fulfilment state of the order.
    OrderStatus ("orderStatus") {
        Pending => "Pending",
        Processing => "Processing",
        Shipped => "Shipped",
        #[default]
        Delivered => "Delivered",
        /// Both spellings show up in exports.
        Cancelled => "Cancelled" | "canceled",
    }
}

labelled_enum! {
    /// Shipping speed chosen for the order.
    DeliveryType ("deliveryType") {
        #[default]
        Standard => "Standard",
        Express => "Express",
        NextDay => "Next Day" | "next",
        SameDay => "Same Day" | "same",
    }
}

// =============================================================================
// Record Date
// =============================================================================

/// The transaction timestamp of a record.
///
/// Import sources occasionally carry dates that cannot be parsed. Rather than
/// rejecting the record, the raw text is kept so the record stays visible in
/// unfiltered listings while being excluded from date-range filters and date
/// facets.
///
/// ## Wire Form
/// - Parsed: `"2024-12-01T10:30:00.000Z"`
/// - Unparsed: the imported text, verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    /// A valid UTC timestamp.
    Parsed(DateTime<Utc>),
    /// Text that did not parse as a date (possibly empty).
    Unparsed(String),
}

impl RecordDate {
    /// Parses raw text, keeping it verbatim on failure.
    pub fn parse(raw: &str) -> Self {
        match parse_timestamp(raw) {
            Some(ts) => RecordDate::Parsed(ts),
            None => RecordDate::Unparsed(raw.to_string()),
        }
    }

    /// Returns the timestamp when the date is valid.
    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordDate::Parsed(ts) => Some(*ts),
            RecordDate::Unparsed(_) => None,
        }
    }

    /// Returns the wire/storage form of the date.
    pub fn to_wire(&self) -> String {
        match self {
            RecordDate::Parsed(ts) => format_timestamp(*ts),
            RecordDate::Unparsed(raw) => raw.clone(),
        }
    }
}

impl Default for RecordDate {
    fn default() -> Self {
        RecordDate::Unparsed(String::new())
    }
}

impl From<DateTime<Utc>> for RecordDate {
    fn from(ts: DateTime<Utc>) -> Self {
        RecordDate::Parsed(ts)
    }
}

impl Serialize for RecordDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(RecordDate::parse).unwrap_or_default())
    }
}

// =============================================================================
// Sales Record
// =============================================================================

/// One sales transaction: customer, product, amounts and fulfilment data.
///
/// This is the single canonical shape the query engine sees. Column-name
/// variants from import sources are resolved once in [`crate::ingest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesRecord {
    /// Source transaction identifier, when the import carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub transaction_id: Option<String>,

    // --- Customer ---------------------------------------------------------
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub gender: Gender,
    pub age: u32,
    pub customer_region: String,
    pub customer_type: CustomerType,

    // --- Product ----------------------------------------------------------
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    pub product_category: String,
    /// Never null, possibly empty.
    #[serde(default)]
    pub tags: Vec<String>,

    // --- Transaction ------------------------------------------------------
    pub quantity: u32,
    #[ts(type = "number")]
    pub price_per_unit: Money,
    #[ts(type = "number")]
    pub discount_percentage: DiscountRate,
    /// quantity × pricePerUnit, before discount.
    #[ts(type = "number")]
    pub total_amount: Money,
    /// totalAmount after discount.
    #[ts(type = "number")]
    pub final_amount: Money,

    // --- Operational ------------------------------------------------------
    #[serde(default)]
    #[ts(type = "string")]
    pub date: RecordDate,
    pub payment_method: PaymentMethod,
    pub order_status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub store_id: String,
    pub store_location: String,
    pub salesperson_id: String,
    pub employee_name: String,
}

impl SalesRecord {
    /// Returns the transaction timestamp when it parsed.
    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.timestamp()
    }

    /// Discount granted on this transaction (totalAmount - finalAmount).
    #[inline]
    pub fn discount_amount(&self) -> Money {
        self.total_amount - self.final_amount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_round_trip_through_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), *method);
        }
    }

    #[test]
    fn test_enum_parsing_is_forgiving() {
        assert_eq!("credit_card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("PAYPAL".parse::<PaymentMethod>().unwrap(), PaymentMethod::PayPal);
        assert_eq!("bank".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
        assert_eq!(" f ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("vip".parse::<CustomerType>().unwrap(), CustomerType::Vip);
        assert_eq!("next-day".parse::<DeliveryType>().unwrap(), DeliveryType::NextDay);
        assert_eq!("canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_enum_rejects_unknown_label() {
        let err = "barter".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
        assert!(err.to_string().starts_with("paymentMethod must be one of"));
    }

    #[test]
    fn test_enum_serializes_as_label() {
        let json = serde_json::to_string(&DeliveryType::SameDay).unwrap();
        assert_eq!(json, "\"Same Day\"");
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(Gender::default(), Gender::Other);
        assert_eq!(CustomerType::default(), CustomerType::Regular);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(OrderStatus::default(), OrderStatus::Delivered);
        assert_eq!(DeliveryType::default(), DeliveryType::Standard);
    }

    #[test]
    fn test_record_date_keeps_unparseable_text() {
        let date = RecordDate::parse("31/31/2024");
        assert_eq!(date, RecordDate::Unparsed("31/31/2024".to_string()));
        assert!(date.timestamp().is_none());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"31/31/2024\"");
    }

    #[test]
    fn test_record_date_null_is_unparsed() {
        let date: RecordDate = serde_json::from_str("null").unwrap();
        assert_eq!(date, RecordDate::default());
    }

    #[test]
    fn test_record_date_wire_form() {
        let date = RecordDate::parse("2024-12-01T10:30:00Z");
        assert_eq!(date.to_wire(), "2024-12-01T10:30:00.000Z");
    }

    #[test]
    fn test_sales_record_camel_case_json() {
        let record = crate::sample::sample_records().remove(1);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["customerName"], "Sarah Williams");
        assert_eq!(value["paymentMethod"], "PayPal");
        assert_eq!(value["finalAmount"], 71.25);
        assert_eq!(value["date"], "2024-12-02T14:15:00.000Z");
        assert!(value.get("transactionId").is_none());

        let back: SalesRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_discount_amount() {
        let record = crate::sample::sample_records().remove(0);
        assert_eq!(record.discount_amount().cents(), 12_000);
    }
}
