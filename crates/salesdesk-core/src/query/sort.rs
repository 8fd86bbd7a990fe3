//! # Sort Stage
//!
//! Orders the filtered set by one key. The sort is stable, so records with
//! equal keys keep their filtered (input) order, and re-sorting a sorted
//! sequence by the same key and order is a no-op.
//!
//! Records whose date did not parse always sort after every dated record,
//! in both directions.

use std::cmp::Ordering;

use super::{SortField, SortOrder};
use crate::types::SalesRecord;

/// Sorts a sequence of record references. The records themselves are not
/// touched; only the returned vector is reordered.
pub fn apply(
    mut records: Vec<&SalesRecord>,
    field: SortField,
    order: SortOrder,
) -> Vec<&SalesRecord> {
    records.sort_by(|a, b| compare(a, b, field, order));
    records
}

/// Full comparison for one sort key and direction.
pub fn compare(a: &SalesRecord, b: &SalesRecord, field: SortField, order: SortOrder) -> Ordering {
    match field {
        SortField::Date => match (a.timestamp(), b.timestamp()) {
            (Some(x), Some(y)) => directed(x.cmp(&y), order),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::Quantity => directed(a.quantity.cmp(&b.quantity), order),
        SortField::CustomerName => {
            directed(compare_names(&a.customer_name, &b.customer_name), order)
        }
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Case-insensitive, whitespace-trimmed name comparison without allocating.
fn compare_names(a: &str, b: &str) -> Ordering {
    let a = a.trim().chars().flat_map(char::to_lowercase);
    let b = b.trim().chars().flat_map(char::to_lowercase);
    a.cmp(b)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_records;
    use crate::types::RecordDate;

    fn ids(records: &[&SalesRecord]) -> Vec<String> {
        records.iter().map(|r| r.customer_id.clone()).collect()
    }

    #[test]
    fn test_date_ascending_and_descending() {
        let records = sample_records();

        let asc = apply(records.iter().collect(), SortField::Date, SortOrder::Asc);
        assert_eq!(asc[0].customer_id, "CUST001");

        let desc = apply(records.iter().collect(), SortField::Date, SortOrder::Desc);
        assert_eq!(desc[0].customer_id, "CUST008");
    }

    #[test]
    fn test_unparseable_dates_sort_last_both_ways() {
        let mut records = sample_records();
        records[3].date = RecordDate::parse("n/a");

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sorted = apply(records.iter().collect(), SortField::Date, order);
            assert_eq!(sorted[7].customer_id, "CUST004");
        }
    }

    #[test]
    fn test_quantity_ties_keep_input_order() {
        let records = sample_records();
        let sorted = apply(records.iter().collect(), SortField::Quantity, SortOrder::Desc);

        // 10, 3, the two 2s, then the four 1s; ties in input order.
        assert_eq!(
            ids(&sorted),
            vec![
                "CUST003", "CUST002", "CUST004", "CUST007", "CUST001", "CUST005", "CUST006",
                "CUST008",
            ]
        );
    }

    #[test]
    fn test_customer_name_ignores_case() {
        let mut records = sample_records();
        records[0].customer_name = "  aaron smith".to_string();

        let sorted = apply(records.iter().collect(), SortField::CustomerName, SortOrder::Asc);
        assert_eq!(sorted[0].customer_id, "CUST001");

        let sorted = apply(records.iter().collect(), SortField::CustomerName, SortOrder::Desc);
        assert_eq!(sorted[0].customer_name, "Sarah Williams");
    }

    #[test]
    fn test_resorting_is_a_fixed_point() {
        let records = sample_records();
        for field in [SortField::Date, SortField::Quantity, SortField::CustomerName] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let once = apply(records.iter().collect(), field, order);
                let twice = apply(once.clone(), field, order);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_input_vector_order_is_not_shared() {
        let records = sample_records();
        let input: Vec<&SalesRecord> = records.iter().collect();
        let sorted = apply(input.clone(), SortField::Date, SortOrder::Desc);

        assert_eq!(input[0].customer_id, "CUST001");
        assert_eq!(sorted[0].customer_id, "CUST008");
    }
}
