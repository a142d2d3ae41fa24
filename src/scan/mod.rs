//! Barcode scanning
//!
//! EAN-13 validation, the confirmation filter and the capture-session driver.

pub mod ean13;
pub mod filter;
pub mod session;

pub use filter::{
    manual_entry, DecodeEvent, ScanConfirmationFilter, ScanState, ScanStep, CONFIRMATIONS_REQUIRED,
};
pub use session::{run_scan_session, CaptureDevice, DeviceError, ReplayDevice, ScanOutcome, ScanReport};
