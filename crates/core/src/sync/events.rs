//! Push events from the external system.
//!
//! The external system emits typed change notifications over a persistent
//! connection. They invalidate cached read views and may trigger a targeted
//! re-sync; they never mutate the ledger directly.

use serde::{Deserialize, Serialize};

/// What changed on the external side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushEventKind {
    /// A ledger (account) was created.
    LedgerCreated,
    /// A ledger was updated.
    LedgerUpdated,
    /// A ledger was deleted.
    LedgerDeleted,
    /// A voucher was created.
    VoucherCreated,
    /// A voucher was updated.
    VoucherUpdated,
    /// A voucher was deleted.
    VoucherDeleted,
}

impl PushEventKind {
    /// Returns true for ledger-side events.
    #[must_use]
    pub const fn is_ledger(self) -> bool {
        matches!(
            self,
            Self::LedgerCreated | Self::LedgerUpdated | Self::LedgerDeleted
        )
    }

    /// The cached read view this event invalidates.
    #[must_use]
    pub const fn cache_scope(self) -> &'static str {
        if self.is_ledger() { "ledgers" } else { "vouchers" }
    }
}

/// A single push notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// What changed.
    pub kind: PushEventKind,
    /// Name or number identifying the changed record.
    pub identifier: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_scopes() {
        assert_eq!(PushEventKind::LedgerUpdated.cache_scope(), "ledgers");
        assert_eq!(PushEventKind::VoucherCreated.cache_scope(), "vouchers");
    }

    #[test]
    fn test_event_wire_format() {
        let event: PushEvent =
            serde_json::from_str(r#"{"kind":"voucher_deleted","identifier":"EXT-9"}"#).unwrap();
        assert_eq!(event.kind, PushEventKind::VoucherDeleted);
        assert_eq!(event.identifier, "EXT-9");
    }
}
