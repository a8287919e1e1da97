//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PatientId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(PatientId, "Unique identifier for a patient.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(
    PatientLedgerId,
    "Unique identifier for a per-patient ledger row."
);
typed_id!(VoucherId, "Unique identifier for a voucher.");
typed_id!(VoucherEntryId, "Unique identifier for a voucher entry.");
typed_id!(InvoiceId, "Unique identifier for an outstanding invoice.");
typed_id!(PaymentId, "Unique identifier for a payment transaction.");
typed_id!(AllocationId, "Unique identifier for a payment allocation.");
typed_id!(AgingSnapshotId, "Unique identifier for an aging snapshot.");
typed_id!(SyncConfigId, "Unique identifier for a sync configuration.");
typed_id!(SyncRunId, "Unique identifier for an external sync run.");
