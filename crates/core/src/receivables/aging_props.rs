//! Property-based tests for aging classification and snapshots.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use charak_shared::types::PatientId;

use super::aging::AgingBucket;
use super::invoice::{OutstandingInvoice, RecordInvoiceInput};
use super::snapshot::SnapshotService;

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

fn days_past_due() -> impl Strategy<Value = i64> {
    -100i64..2000i64
}

fn bucket_index(bucket: AgingBucket) -> usize {
    AgingBucket::ALL
        .iter()
        .position(|b| *b == bucket)
        .unwrap_or(usize::MAX)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every day count lands in exactly one bucket.
    #[test]
    fn prop_every_day_count_has_a_bucket(days in days_past_due()) {
        let bucket = AgingBucket::for_days_past_due(days);
        prop_assert!(AgingBucket::ALL.contains(&bucket));
    }

    /// The bucket never gets younger as the invoice gets older.
    #[test]
    fn prop_bucket_monotonic_in_days(days in days_past_due()) {
        let today = bucket_index(AgingBucket::for_days_past_due(days));
        let tomorrow = bucket_index(AgingBucket::for_days_past_due(days + 1));
        prop_assert!(tomorrow >= today);
    }

    /// A snapshot's grand total always equals the sum of open invoice
    /// outstandings, regardless of how they bucket.
    #[test]
    fn prop_snapshot_total_equals_open_outstanding(
        specs in prop::collection::vec((days_past_due(), positive_amount()), 0..20),
    ) {
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let patient_id = PatientId::new();
        let invoices: Vec<OutstandingInvoice> = specs
            .iter()
            .map(|(days, amount)| {
                OutstandingInvoice::record(RecordInvoiceInput {
                    patient_id,
                    invoice_date: as_of - chrono::Duration::days(days + 30),
                    due_date: as_of - chrono::Duration::days(*days),
                    amount: *amount,
                    bill_ref: None,
                })
                .unwrap()
            })
            .collect();

        let expected: Decimal = invoices.iter().map(|i| i.outstanding).sum();
        let snapshot = SnapshotService::take_snapshot(&invoices, as_of);
        prop_assert_eq!(snapshot.total_outstanding, expected);

        let row_total: Decimal = snapshot.rows.iter().map(|r| r.total_outstanding).sum();
        prop_assert_eq!(row_total, expected);
    }

    /// Bucket totals within a row always sum to the row total.
    #[test]
    fn prop_row_buckets_sum_to_row_total(
        specs in prop::collection::vec((days_past_due(), positive_amount()), 1..20),
    ) {
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let patient_id = PatientId::new();
        let invoices: Vec<OutstandingInvoice> = specs
            .iter()
            .map(|(days, amount)| {
                OutstandingInvoice::record(RecordInvoiceInput {
                    patient_id,
                    invoice_date: as_of - chrono::Duration::days(days + 30),
                    due_date: as_of - chrono::Duration::days(*days),
                    amount: *amount,
                    bill_ref: None,
                })
                .unwrap()
            })
            .collect();

        let snapshot = SnapshotService::take_snapshot(&invoices, as_of);
        for row in &snapshot.rows {
            let bucket_sum: Decimal = AgingBucket::ALL
                .iter()
                .map(|bucket| row.bucket_total(*bucket))
                .sum();
            prop_assert_eq!(bucket_sum, row.total_outstanding);
        }
    }
}
