//! Payment repository: recording, status changes and allocation.

use charak_core::payments::{
    PaymentAllocation, PaymentError, PaymentService, PaymentStatus, PaymentTransaction,
    RecordPaymentInput,
};
use charak_shared::types::{AllocationId, InvoiceId, PatientId, PaymentId};
use rust_decimal::Decimal;

use crate::mem::MemStore;
use crate::repositories::voucher::post_voucher;

/// Repository for payment transactions and allocations.
#[derive(Clone)]
pub struct PaymentRepository {
    store: MemStore,
}

impl PaymentRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Records a payment in its mode's initial status.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts.
    pub fn record(&self, input: RecordPaymentInput) -> Result<PaymentTransaction, PaymentError> {
        let payment = PaymentTransaction::record(input)?;
        self.store
            .write()
            .payments
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    /// Fetches a payment by id.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if missing.
    pub fn get(&self, id: PaymentId) -> Result<PaymentTransaction, PaymentError> {
        self.store
            .read()
            .payments
            .get(&id)
            .cloned()
            .ok_or(PaymentError::PaymentNotFound(id))
    }

    /// Lists payments, optionally for one patient, newest first.
    #[must_use]
    pub fn list(&self, patient_id: Option<PatientId>) -> Vec<PaymentTransaction> {
        let state = self.store.read();
        let mut payments: Vec<PaymentTransaction> = state
            .payments
            .values()
            .filter(|payment| patient_id.is_none_or(|patient| payment.patient_id == patient))
            .cloned()
            .collect();
        payments.sort_by_key(|payment| std::cmp::Reverse((payment.payment_date, payment.id)));
        payments
    }

    /// Manually clears or bounces a pending cheque.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusChange` for transitions the state machine
    /// forbids.
    pub fn update_status(
        &self,
        id: PaymentId,
        to: PaymentStatus,
    ) -> Result<PaymentTransaction, PaymentError> {
        let mut state = self.store.write();
        let payment = state
            .payments
            .get_mut(&id)
            .ok_or(PaymentError::PaymentNotFound(id))?;
        PaymentService::validate_status_change(payment.status, to)?;
        payment.status = to;
        Ok(payment.clone())
    }

    /// Allocates part of a payment against an outstanding invoice.
    ///
    /// The allocation itself is a receipt voucher, posted through the same
    /// path as every other mutation, then the invoice outstanding and the
    /// payment's unallocated remainder are decremented. Validation happens
    /// first, so a rejected allocation leaves everything untouched.
    ///
    /// # Errors
    ///
    /// Returns `OverAllocation` when either limit is exceeded; any voucher
    /// posting error propagates with no state change.
    pub fn allocate(
        &self,
        payment_id: PaymentId,
        invoice_id: InvoiceId,
        amount: Decimal,
    ) -> Result<PaymentAllocation, PaymentError> {
        let mut state = self.store.write();

        let payment = state
            .payments
            .get(&payment_id)
            .cloned()
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;
        let invoice = state
            .invoices
            .get(&invoice_id)
            .cloned()
            .ok_or(PaymentError::InvoiceNotFound(invoice_id))?;

        PaymentService::validate_allocation(&payment, &invoice, amount)?;

        let settlement_account = state
            .settings
            .settlement_for(payment.mode)
            .ok_or(PaymentError::SettlementAccountNotConfigured)?;
        let receivable_account = state
            .settings
            .receivable_account_id
            .ok_or(PaymentError::SettlementAccountNotConfigured)?;

        let voucher_input = PaymentService::build_allocation_voucher(
            &payment,
            &invoice,
            amount,
            settlement_account,
            receivable_account,
        );
        let voucher = post_voucher(&mut state, voucher_input)?;

        // Voucher posted; now the derived quantities.
        if let Some(row) = state.invoices.get_mut(&invoice_id) {
            row.apply_allocation(amount);
        }
        if let Some(row) = state.payments.get_mut(&payment_id) {
            row.unallocated -= amount;
        }

        let allocation = PaymentAllocation {
            id: AllocationId::new(),
            payment_id,
            invoice_id,
            amount,
            voucher_id: voucher.id,
        };
        state.allocations.push(allocation.clone());
        Ok(allocation)
    }

    /// Lists allocations, optionally for one payment.
    #[must_use]
    pub fn list_allocations(&self, payment_id: Option<PaymentId>) -> Vec<PaymentAllocation> {
        self.store
            .read()
            .allocations
            .iter()
            .filter(|allocation| {
                payment_id.is_none_or(|payment| allocation.payment_id == payment)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charak_core::accounts::{AccountType, NewAccount};
    use charak_core::payments::PaymentMode;
    use charak_core::receivables::RecordInvoiceInput;
    use charak_core::sync::ExternalSyncConfig;
    use charak_shared::config::ExternalConfig;
    use charak_shared::types::{AccountId, BalanceSide};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::repositories::{AccountRepository, InvoiceRepository};

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

    fn make_account(store: &MemStore, code: &str, name: &str, account_type: AccountType) -> AccountId {
        AccountRepository::new(store.clone())
            .create(NewAccount {
                code: code.to_string(),
                name: name.to_string(),
                account_type,
                opening_balance: Decimal::ZERO,
                opening_side: account_type.normal_side(),
                correlation_key: None,
            })
            .unwrap()
            .id
    }

    fn configure_settlement(store: &MemStore) {
        let cash = make_account(store, "1000", "Cash", AccountType::Asset);
        let bank = make_account(store, "1100", "Bank", AccountType::Asset);
        let receivable = make_account(store, "1200", "Patient Receivables", AccountType::Asset);
        let mut state = store.write();
        state.settings.cash_account_id = Some(cash);
        state.settings.bank_account_id = Some(bank);
        state.settings.receivable_account_id = Some(receivable);
    }

    fn payment_input(patient_id: PatientId, mode: PaymentMode, amount: Decimal) -> RecordPaymentInput {
        RecordPaymentInput {
            patient_id,
            payment_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            mode,
            amount,
            bank_name: None,
            cheque_number: None,
            cheque_date: None,
        }
    }

    fn invoice_input(patient_id: PatientId, amount: Decimal) -> RecordInvoiceInput {
        RecordInvoiceInput {
            patient_id,
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            amount,
            bill_ref: None,
        }
    }

    #[test]
    fn test_allocate_settles_invoice_and_posts_voucher() {
        let store = make_store();
        configure_settlement(&store);
        let patient = PatientId::new();

        let invoice = InvoiceRepository::new(store.clone())
            .record(invoice_input(patient, dec!(500)))
            .unwrap();
        let repo = PaymentRepository::new(store.clone());
        let payment = repo
            .record(payment_input(patient, PaymentMode::Cash, dec!(500)))
            .unwrap();

        let allocation = repo.allocate(payment.id, invoice.id, dec!(500)).unwrap();
        assert_eq!(allocation.amount, dec!(500));

        let state = store.read();
        assert!(state.invoices.get(&invoice.id).unwrap().is_settled());
        assert_eq!(state.payments.get(&payment.id).unwrap().unallocated, dec!(0));

        let voucher = state.vouchers.get(&allocation.voucher_id).unwrap();
        assert!(voucher.number.starts_with("RV-"));
        assert_eq!(voucher.total_amount, dec!(500));

        // The patient's receivable ledger was credited through the voucher.
        let ledger = state
            .patient_ledgers
            .values()
            .find(|l| l.patient_id == patient)
            .unwrap();
        assert_eq!(ledger.display_balance(), (dec!(500), BalanceSide::Credit));
    }

    #[test]
    fn test_over_allocation_leaves_everything_unchanged() {
        let store = make_store();
        configure_settlement(&store);
        let patient = PatientId::new();

        let invoice = InvoiceRepository::new(store.clone())
            .record(invoice_input(patient, dec!(500)))
            .unwrap();
        let repo = PaymentRepository::new(store.clone());
        let payment = repo
            .record(payment_input(patient, PaymentMode::Cash, dec!(1000)))
            .unwrap();

        assert!(matches!(
            repo.allocate(payment.id, invoice.id, dec!(600)),
            Err(PaymentError::OverAllocation { .. })
        ));

        let state = store.read();
        assert_eq!(state.invoices.get(&invoice.id).unwrap().outstanding, dec!(500));
        assert_eq!(
            state.payments.get(&payment.id).unwrap().unallocated,
            dec!(1000)
        );
        assert!(state.allocations.is_empty());
        assert!(state.vouchers.is_empty());
    }

    #[test]
    fn test_allocation_requires_settlement_accounts() {
        let store = make_store();
        let patient = PatientId::new();

        let invoice = InvoiceRepository::new(store.clone())
            .record(invoice_input(patient, dec!(500)))
            .unwrap();
        let repo = PaymentRepository::new(store);
        let payment = repo
            .record(payment_input(patient, PaymentMode::Cash, dec!(500)))
            .unwrap();

        assert!(matches!(
            repo.allocate(payment.id, invoice.id, dec!(500)),
            Err(PaymentError::SettlementAccountNotConfigured)
        ));
    }

    #[test]
    fn test_payment_fans_out_over_invoices() {
        let store = make_store();
        configure_settlement(&store);
        let patient = PatientId::new();
        let invoices = InvoiceRepository::new(store.clone());
        let first = invoices.record(invoice_input(patient, dec!(300))).unwrap();
        let second = invoices.record(invoice_input(patient, dec!(400))).unwrap();

        let repo = PaymentRepository::new(store.clone());
        let payment = repo
            .record(payment_input(patient, PaymentMode::Upi, dec!(600)))
            .unwrap();

        repo.allocate(payment.id, first.id, dec!(300)).unwrap();
        repo.allocate(payment.id, second.id, dec!(300)).unwrap();

        let state = store.read();
        assert!(state.invoices.get(&first.id).unwrap().is_settled());
        assert_eq!(state.invoices.get(&second.id).unwrap().outstanding, dec!(100));
        assert_eq!(state.payments.get(&payment.id).unwrap().unallocated, dec!(0));
        assert_eq!(state.allocations.len(), 2);
    }

    #[test]
    fn test_cheque_lifecycle() {
        let store = make_store();
        configure_settlement(&store);
        let patient = PatientId::new();
        let repo = PaymentRepository::new(store);

        let cheque = repo
            .record(payment_input(patient, PaymentMode::Cheque, dec!(500)))
            .unwrap();
        assert_eq!(cheque.status, PaymentStatus::Pending);

        let bounced = repo
            .update_status(cheque.id, PaymentStatus::Bounced)
            .unwrap();
        assert_eq!(bounced.status, PaymentStatus::Bounced);

        assert!(matches!(
            repo.update_status(cheque.id, PaymentStatus::Cleared),
            Err(PaymentError::InvalidStatusChange { .. })
        ));
    }
}
