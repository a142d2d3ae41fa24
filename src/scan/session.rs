//! Scan session driver
//!
//! Connects a capture device to a [`ScanConfirmationFilter`]. The device
//! pushes decode events into a channel; the driver feeds them through the
//! filter and releases the device as soon as a code is confirmed.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::filter::{DecodeEvent, ScanConfirmationFilter, ScanStep};

/// Why the capture device could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Camera access was denied")]
    PermissionDenied,

    #[error("No camera found")]
    NotFound,

    #[error("Camera does not support the requested settings")]
    UnsupportedConstraints,

    #[error("Camera unavailable: {0}")]
    Other(String),
}

impl DeviceError {
    /// Classify a platform error name into a device error
    pub fn classify(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDenied" => DeviceError::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => DeviceError::NotFound,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                DeviceError::UnsupportedConstraints
            }
            _ => DeviceError::Other(message.to_string()),
        }
    }

    /// Hint shown alongside the manual-entry fallback
    pub fn hint(&self) -> &'static str {
        match self {
            DeviceError::PermissionDenied => "Allow camera access in the browser or system settings, or enter the barcode by hand.",
            DeviceError::NotFound => "Connect a camera, or enter the barcode by hand.",
            DeviceError::UnsupportedConstraints => "Try another camera, or enter the barcode by hand.",
            DeviceError::Other(_) => "Enter the barcode by hand.",
        }
    }
}

/// A source of decode events
pub trait CaptureDevice {
    /// Acquire the device and start decoding frames
    fn start(&mut self) -> Result<mpsc::Receiver<DecodeEvent>, DeviceError>;

    /// Release the device; must be safe to call more than once
    fn stop(&mut self);
}

/// How a scan session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "code", rename_all = "snake_case")]
pub enum ScanOutcome {
    Confirmed(String),
    /// The event stream closed without a confirmation
    Ended,
}

/// Outcome of a session plus what was filtered out along the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    pub events_seen: usize,
    /// 13-digit reads dropped for a bad check digit
    pub rejected_reads: Vec<String>,
    /// Non-fatal decoder failures
    pub diagnostics: Vec<String>,
}

impl ScanReport {
    pub fn confirmed_code(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Confirmed(code) => Some(code),
            ScanOutcome::Ended => None,
        }
    }
}

/// Run one scanning session
///
/// A device error is returned once, unretried, so the caller can fall back
/// to manual entry.
pub async fn run_scan_session<D>(
    device: &mut D,
    filter: &mut ScanConfirmationFilter,
) -> Result<ScanReport, DeviceError>
where
    D: CaptureDevice + ?Sized,
{
    filter.reset();

    let mut events = match device.start() {
        Ok(events) => events,
        Err(e) => {
            warn!("Capture device unavailable: {}", e);
            return Err(e);
        }
    };

    let mut report = ScanReport {
        outcome: ScanOutcome::Ended,
        events_seen: 0,
        rejected_reads: Vec::new(),
        diagnostics: Vec::new(),
    };

    while let Some(event) = events.recv().await {
        report.events_seen += 1;
        match filter.feed(event) {
            ScanStep::Confirmed(code) => {
                info!("Barcode confirmed: {}", code);
                report.outcome = ScanOutcome::Confirmed(code);
                break;
            }
            ScanStep::Diagnostic(message) => {
                debug!("Decoder diagnostic: {}", message);
                report.diagnostics.push(message);
            }
            ScanStep::ChecksumRejected(code) => report.rejected_reads.push(code),
            ScanStep::Pending | ScanStep::Ignored => {}
        }
    }

    device.stop();
    events.close();
    Ok(report)
}

/// Replays recorded decode events as if they came from a camera
#[derive(Debug, Default)]
pub struct ReplayDevice {
    events: Vec<DecodeEvent>,
}

impl ReplayDevice {
    pub fn new(events: Vec<DecodeEvent>) -> Self {
        Self { events }
    }
}

impl CaptureDevice for ReplayDevice {
    fn start(&mut self) -> Result<mpsc::Receiver<DecodeEvent>, DeviceError> {
        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in self.events.drain(..) {
            tx.try_send(event)
                .map_err(|e| DeviceError::Other(e.to_string()))?;
        }
        Ok(rx)
    }

    fn stop(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of events, then closes the stream
    struct ScriptedDevice {
        events: Vec<DecodeEvent>,
        fail_with: Option<DeviceError>,
        starts: u32,
        stops: u32,
    }

    impl ScriptedDevice {
        fn new(events: Vec<DecodeEvent>) -> Self {
            Self { events, fail_with: None, starts: 0, stops: 0 }
        }

        fn failing(error: DeviceError) -> Self {
            Self { events: Vec::new(), fail_with: Some(error), starts: 0, stops: 0 }
        }
    }

    impl CaptureDevice for ScriptedDevice {
        fn start(&mut self) -> Result<mpsc::Receiver<DecodeEvent>, DeviceError> {
            self.starts += 1;
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            let (tx, rx) = mpsc::channel(self.events.len().max(1));
            for event in self.events.drain(..) {
                tx.try_send(event).unwrap();
            }
            Ok(rx)
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn decoded(text: &str) -> DecodeEvent {
        DecodeEvent::Decoded(text.to_string())
    }

    #[tokio::test]
    async fn test_session_confirms_and_stops_device() {
        let mut device = ScriptedDevice::new(vec![
            DecodeEvent::NotFound,
            decoded("4006381333931"),
            DecodeEvent::Failed("blurry".to_string()),
            decoded("4006381333931"),
            decoded("5901234123457"),
            decoded("5901234123457"),
        ]);
        let mut filter = ScanConfirmationFilter::new();

        let report = run_scan_session(&mut device, &mut filter).await.unwrap();
        assert_eq!(report.outcome, ScanOutcome::Confirmed("4006381333931".to_string()));
        assert_eq!(report.events_seen, 4);
        assert_eq!(report.diagnostics, vec!["blurry".to_string()]);
        assert_eq!(device.stops, 1);
        assert!(filter.is_confirmed());
    }

    #[tokio::test]
    async fn test_session_ends_without_confirmation() {
        let mut device = ScriptedDevice::new(vec![decoded("A"), decoded("B"), decoded("A")]);
        let mut filter = ScanConfirmationFilter::new();

        let report = run_scan_session(&mut device, &mut filter).await.unwrap();
        assert_eq!(report.outcome, ScanOutcome::Ended);
        assert_eq!(report.confirmed_code(), None);
        assert_eq!(device.stops, 1);
    }

    #[tokio::test]
    async fn test_device_error_is_reported_once() {
        let mut device = ScriptedDevice::failing(DeviceError::PermissionDenied);
        let mut filter = ScanConfirmationFilter::new();

        let result = run_scan_session(&mut device, &mut filter).await;
        assert_eq!(result, Err(DeviceError::PermissionDenied));
        assert_eq!(device.starts, 1);
    }

    #[tokio::test]
    async fn test_new_session_resets_previous_confirmation() {
        let mut filter = ScanConfirmationFilter::new();
        let mut first = ScriptedDevice::new(vec![decoded("A"), decoded("A")]);
        run_scan_session(&mut first, &mut filter).await.unwrap();

        let mut second = ScriptedDevice::new(vec![decoded("B"), decoded("B")]);
        let report = run_scan_session(&mut second, &mut filter).await.unwrap();
        assert_eq!(report.confirmed_code(), Some("B"));
    }

    #[tokio::test]
    async fn test_replay_device_reports_rejected_reads() {
        let mut device = ReplayDevice::new(vec![
            decoded("4006381333932"),
            decoded("4006381333931"),
            decoded("4006381333931"),
        ]);
        let mut filter = ScanConfirmationFilter::new();

        let report = run_scan_session(&mut device, &mut filter).await.unwrap();
        assert_eq!(report.rejected_reads, vec!["4006381333932".to_string()]);
        assert_eq!(report.confirmed_code(), Some("4006381333931"));
    }

    #[test]
    fn test_classify_device_errors() {
        assert_eq!(DeviceError::classify("NotAllowedError", ""), DeviceError::PermissionDenied);
        assert_eq!(DeviceError::classify("NotFoundError", ""), DeviceError::NotFound);
        assert_eq!(
            DeviceError::classify("OverconstrainedError", ""),
            DeviceError::UnsupportedConstraints
        );
        assert_eq!(
            DeviceError::classify("AbortError", "device busy"),
            DeviceError::Other("device busy".to_string())
        );
    }
}
