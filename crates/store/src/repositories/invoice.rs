//! Outstanding invoice repository.

use chrono::NaiveDate;

use charak_core::ledger::LedgerError;
use charak_core::receivables::{OutstandingInvoice, RecordInvoiceInput};
use charak_shared::types::{InvoiceId, PatientId};

use crate::mem::MemStore;

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by patient.
    pub patient_id: Option<PatientId>,
    /// Invoice date range start (inclusive).
    pub from: Option<NaiveDate>,
    /// Invoice date range end (inclusive).
    pub to: Option<NaiveDate>,
    /// Only invoices with a positive outstanding amount.
    pub open_only: bool,
}

/// Repository for outstanding invoices.
#[derive(Clone)]
pub struct InvoiceRepository {
    store: MemStore,
}

impl InvoiceRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Records a new invoice with its full amount outstanding.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts.
    pub fn record(&self, input: RecordInvoiceInput) -> Result<OutstandingInvoice, LedgerError> {
        let invoice = OutstandingInvoice::record(input)?;
        self.store
            .write()
            .invoices
            .insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    /// Fetches an invoice by id.
    #[must_use]
    pub fn get(&self, id: InvoiceId) -> Option<OutstandingInvoice> {
        self.store.read().invoices.get(&id).cloned()
    }

    /// Lists invoices matching a filter, ordered by invoice date.
    #[must_use]
    pub fn list(&self, filter: &InvoiceFilter) -> Vec<OutstandingInvoice> {
        let state = self.store.read();
        let mut invoices: Vec<OutstandingInvoice> = state
            .invoices
            .values()
            .filter(|invoice| {
                filter
                    .patient_id
                    .is_none_or(|patient| invoice.patient_id == patient)
                    && filter.from.is_none_or(|from| invoice.invoice_date >= from)
                    && filter.to.is_none_or(|to| invoice.invoice_date <= to)
                    && (!filter.open_only || !invoice.is_settled())
            })
            .cloned()
            .collect();
        invoices.sort_by_key(|invoice| (invoice.invoice_date, invoice.id));
        invoices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charak_core::sync::ExternalSyncConfig;
    use charak_shared::config::ExternalConfig;
    use rust_decimal_macros::dec;

    fn make_store() -> MemStore {
        MemStore::new(ExternalSyncConfig::from_defaults(&ExternalConfig {
            host: "localhost".to_string(),
            port: 9000,
            company: String::new(),
            sync_enabled: false,
            sync_frequency: "manual".to_string(),
            update_existing: false,
        }))
    }

    fn input(patient_id: PatientId, day: u32) -> RecordInvoiceInput {
        RecordInvoiceInput {
            patient_id,
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            amount: dec!(500),
            bill_ref: None,
        }
    }

    #[test]
    fn test_record_and_filter() {
        let repo = InvoiceRepository::new(make_store());
        let patient = PatientId::new();
        repo.record(input(patient, 1)).unwrap();
        repo.record(input(PatientId::new(), 2)).unwrap();

        let all = repo.list(&InvoiceFilter::default());
        assert_eq!(all.len(), 2);
        assert!(all[0].invoice_date < all[1].invoice_date);

        let mine = repo.list(&InvoiceFilter {
            patient_id: Some(patient),
            ..InvoiceFilter::default()
        });
        assert_eq!(mine.len(), 1);
    }

    #[test]
    fn test_open_only_excludes_settled() {
        let store = make_store();
        let repo = InvoiceRepository::new(store.clone());
        let patient = PatientId::new();
        let invoice = repo.record(input(patient, 1)).unwrap();

        {
            let mut state = store.write();
            let row = state.invoices.get_mut(&invoice.id).unwrap();
            row.apply_allocation(dec!(500));
        }

        let open = repo.list(&InvoiceFilter {
            open_only: true,
            ..InvoiceFilter::default()
        });
        assert!(open.is_empty());
    }
}
