//! # Command Script Replay
//!
//! A script is a JSON array of authenticated requests:
//!
//! ```json
//! [
//!   {"caller": "0xadad…", "payload": {"op": "grant_role", "role": "producer", "principal": "0x0101…"}},
//!   {"caller": "0x0101…", "payload": {"op": "create_batch", "name": "Wagyu"}}
//! ]
//! ```
//!
//! `version` and `request_id` may be omitted. Requests are applied in order;
//! a rejected request is logged and replay continues with the next one.

use std::path::Path;

use anyhow::{Context, Result};
use hc_01_batch_ledger::{
    Batch, BatchHistory, BatchLedgerApi, CertificateRecord, CommandOutcome, LedgerCommand,
    LedgerStats, StatusChange, TransferRecord,
};
use serde::Serialize;
use shared_types::{AuthenticatedRequest, Principal};
use tracing::{info, warn};

/// One scripted request.
pub type ScriptRequest = AuthenticatedRequest<LedgerCommand>;

/// Parses a script from JSON text.
///
/// # Errors
///
/// Returns `Err` if the text is not a JSON array of requests.
pub fn parse_script(json: &str) -> Result<Vec<ScriptRequest>> {
    serde_json::from_str(json).context("Failed to parse command script")
}

/// Reads and parses a script file.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> Result<Vec<ScriptRequest>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read command script {}", path.display()))?;
    parse_script(&text)
}

/// A request the ledger refused.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// Position in the script, from 0.
    pub index: usize,
    /// The operation name.
    pub op: &'static str,
    /// Error kind.
    pub kind: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Outcomes of the requests that committed, in script order.
    pub applied: Vec<CommandOutcome>,
    /// Requests that were refused.
    pub rejected: Vec<Rejection>,
}

/// Submits every request to `ledger`, in order.
pub fn replay<L: BatchLedgerApi + ?Sized>(ledger: &L, requests: Vec<ScriptRequest>) -> ReplayReport {
    let total = requests.len();
    let mut report = ReplayReport::default();

    for (index, request) in requests.into_iter().enumerate() {
        let op = request.payload.name();
        match ledger.submit(request) {
            Ok(outcome) => report.applied.push(outcome),
            Err(err) => {
                warn!(index, op, kind = %err.kind(), "Scripted request rejected: {err}");
                report.rejected.push(Rejection {
                    index,
                    op,
                    kind: err.kind().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        total,
        applied = report.applied.len(),
        rejected = report.rejected.len(),
        "Script replay finished"
    );
    report
}

/// One batch with its full history, as printed after replay.
#[derive(Debug, Clone, Serialize)]
pub struct BatchView {
    pub label: String,
    pub status_label: &'static str,
    #[serde(flatten)]
    pub batch: Batch,
    pub status_history: Vec<StatusChange>,
    pub certificate_history: Vec<CertificateRecord>,
    pub transfer_history: Vec<TransferRecord>,
}

/// The whole ledger, as printed after replay.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub admin: Principal,
    pub stats: LedgerStats,
    pub batches: Vec<BatchView>,
}

/// Builds a view of `batch` from its logs.
#[must_use]
pub fn batch_view(batch: Batch, history: &BatchHistory) -> BatchView {
    BatchView {
        label: batch.label(),
        status_label: batch.status().label(),
        status_history: history.status().to_vec(),
        certificate_history: history.certificates().to_vec(),
        transfer_history: history.transfers().to_vec(),
        batch,
    }
}
