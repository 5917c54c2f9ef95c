// crates/lettergrid-server/src/audit.rs
// ============================================================================
// Module: Request Audit Sink
// Description: JSON-line request auditing for the HTTP boundary.
// Purpose: Record request outcomes without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every handled request emits one [`RequestAuditEvent`] through an
//! [`AuditSink`]. The default sink serializes events as JSON lines on stderr
//! so deployments can collect them with standard log shipping; tests use
//! [`NoopAuditSink`]. Events carry identifiers and outcomes only, never
//! payload bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// One audited request.
///
/// # Invariants
/// - Events carry identifiers and status only; request bodies are never
///   embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestAuditEvent {
    /// Event time in unix milliseconds.
    pub time_ms: i64,
    /// HTTP method.
    pub method: String,
    /// Matched route path.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Activity identifier, when the request carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Stable error label for failed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Receives audit events from the HTTP boundary.
pub trait AuditSink: Send + Sync {
    /// Records one audit event. Sink failures are swallowed; auditing never
    /// fails a request.
    fn record(&self, event: &RequestAuditEvent);
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

/// Sink writing one JSON line per event to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            #[allow(clippy::print_stderr, reason = "Stderr is the audit transport.")]
            {
                eprintln!("{line}");
            }
        }
    }
}

/// Sink discarding all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}
