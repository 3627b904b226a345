//! Domain layer: pure ledger logic with no I/O.

pub mod entities;
pub mod errors;
pub mod history;
pub mod ledger;
pub mod name_index;
pub mod roles;
pub mod transitions;

pub use entities::{Batch, CertificateRecord, StatusChange, TransferRecord};
pub use errors::{ErrorKind, LedgerError, LedgerResult};
pub use history::{BatchHistory, HistoryLogs};
pub use ledger::BatchLedger;
pub use name_index::NameIndex;
pub use roles::{Persona, RoleAction, RoleChange, RoleRegistry};
pub use transitions::Operation;
