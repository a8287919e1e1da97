//! Aging snapshot generation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{AgingSnapshotId, PatientId};

use super::aging::AgingBucket;
use super::invoice::OutstandingInvoice;

/// Per-patient rollup within one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAgingRow {
    /// The patient.
    pub patient_id: PatientId,
    /// Outstanding 0-30 days past due (including not yet due).
    pub days_0_30: Decimal,
    /// Outstanding 31-60 days past due.
    pub days_31_60: Decimal,
    /// Outstanding 61-90 days past due.
    pub days_61_90: Decimal,
    /// Outstanding 91-180 days past due.
    pub days_91_180: Decimal,
    /// Outstanding 181-365 days past due.
    pub days_181_365: Decimal,
    /// Outstanding more than 365 days past due.
    pub days_over_365: Decimal,
    /// Total outstanding across all buckets.
    pub total_outstanding: Decimal,
}

impl PatientAgingRow {
    fn new(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            days_0_30: Decimal::ZERO,
            days_31_60: Decimal::ZERO,
            days_61_90: Decimal::ZERO,
            days_91_180: Decimal::ZERO,
            days_181_365: Decimal::ZERO,
            days_over_365: Decimal::ZERO,
            total_outstanding: Decimal::ZERO,
        }
    }

    fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        match bucket {
            AgingBucket::Days0To30 => self.days_0_30 += amount,
            AgingBucket::Days31To60 => self.days_31_60 += amount,
            AgingBucket::Days61To90 => self.days_61_90 += amount,
            AgingBucket::Days91To180 => self.days_91_180 += amount,
            AgingBucket::Days181To365 => self.days_181_365 += amount,
            AgingBucket::Over365 => self.days_over_365 += amount,
        }
        self.total_outstanding += amount;
    }

    /// Returns the total for one bucket.
    #[must_use]
    pub const fn bucket_total(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Days0To30 => self.days_0_30,
            AgingBucket::Days31To60 => self.days_31_60,
            AgingBucket::Days61To90 => self.days_61_90,
            AgingBucket::Days91To180 => self.days_91_180,
            AgingBucket::Days181To365 => self.days_181_365,
            AgingBucket::Over365 => self.days_over_365,
        }
    }
}

/// Point-in-time aging rollup. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingSnapshot {
    /// Unique identifier.
    pub id: AgingSnapshotId,
    /// The reporting date the buckets were computed against.
    pub snapshot_date: NaiveDate,
    /// One row per patient with outstanding invoices.
    pub rows: Vec<PatientAgingRow>,
    /// Total outstanding across all patients.
    pub total_outstanding: Decimal,
}

/// Service deriving aging snapshots from the invoice set.
pub struct SnapshotService;

impl SnapshotService {
    /// Buckets every invoice with a positive outstanding amount.
    ///
    /// Fully paid invoices are excluded; they never increment a bucket.
    /// Rows are ordered by patient id for deterministic output.
    #[must_use]
    pub fn take_snapshot(invoices: &[OutstandingInvoice], as_of: NaiveDate) -> AgingSnapshot {
        let mut rows: BTreeMap<PatientId, PatientAgingRow> = BTreeMap::new();
        let mut total = Decimal::ZERO;

        for invoice in invoices {
            if invoice.is_settled() {
                continue;
            }
            let row = rows
                .entry(invoice.patient_id)
                .or_insert_with(|| PatientAgingRow::new(invoice.patient_id));
            row.add(invoice.bucket(as_of), invoice.outstanding);
            total += invoice.outstanding;
        }

        AgingSnapshot {
            id: AgingSnapshotId::new(),
            snapshot_date: as_of,
            rows: rows.into_values().collect(),
            total_outstanding: total,
        }
    }
}
