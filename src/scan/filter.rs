//! Scan confirmation filter
//!
//! Turns a noisy stream of per-frame decode attempts into one confirmed
//! barcode. A single-frame decode is not trusted: the same text has to be
//! read `CONFIRMATIONS_REQUIRED` times in a row. Thirteen-digit reads must
//! also pass the EAN-13 check digit.
//!
//! Once confirmed, the filter ignores everything until it is reset, so
//! frames that arrive after the result fires (before the camera is
//! released) cannot produce a second emission.

use serde::{Deserialize, Serialize};

use super::ean13;

/// Consecutive identical reads needed to confirm a code
pub const CONFIRMATIONS_REQUIRED: u32 = 2;

/// One decode attempt from the capture device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecodeEvent {
    /// A barcode was decoded from the frame
    Decoded(String),
    /// No barcode in the frame; the common case
    NotFound,
    /// The decoder failed for another reason
    Failed(String),
}

/// Filter state for one scanning session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Accumulating { code: String, count: u32 },
    Confirmed { code: String },
}

/// What a single event did to the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStep {
    /// Nothing to report
    Pending,
    /// The code is confirmed; emitted exactly once per session
    Confirmed(String),
    /// A 13-digit read failed its check digit and was dropped
    ChecksumRejected(String),
    /// A decoder failure worth surfacing, not fatal
    Diagnostic(String),
    /// The session is already confirmed; the event was ignored
    Ignored,
}

/// Debounce and checksum filter over decode events
#[derive(Debug, Clone, Default)]
pub struct ScanConfirmationFilter {
    state: ScanState,
}

impl ScanConfirmationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, ScanState::Confirmed { .. })
    }

    /// Feed one decode event
    pub fn feed(&mut self, event: DecodeEvent) -> ScanStep {
        if self.is_confirmed() {
            return ScanStep::Ignored;
        }

        match event {
            DecodeEvent::NotFound => ScanStep::Pending,
            DecodeEvent::Failed(message) => ScanStep::Diagnostic(message),
            DecodeEvent::Decoded(text) => self.observe(text),
        }
    }

    fn observe(&mut self, text: String) -> ScanStep {
        if ean13::looks_like_ean13(&text) && !ean13::is_valid(&text) {
            tracing::debug!(code = %text, "Dropping EAN-13 read with bad check digit");
            return ScanStep::ChecksumRejected(text);
        }

        let count = match &self.state {
            ScanState::Accumulating { code, count } if *code == text => count + 1,
            _ => 1,
        };

        if count >= CONFIRMATIONS_REQUIRED {
            self.state = ScanState::Confirmed { code: text.clone() };
            ScanStep::Confirmed(text)
        } else {
            self.state = ScanState::Accumulating { code: text, count };
            ScanStep::Pending
        }
    }

    /// Take the confirmed code and start a new session
    pub fn take_confirmed(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            ScanState::Confirmed { code } => Some(code),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandon the current session
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
    }
}

/// Free-text barcode entry; bypasses the checksum and confirmation
///
/// Manual entry is confirmed by the user's own action. Returns `None`
/// for blank input.
pub fn manual_entry(text: &str) -> Option<String> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
