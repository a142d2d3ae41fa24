//! Product Tools
//!
//! Barcode lookup, scan confirmation and name search against the product
//! database.

use serde::Serialize;

use crate::lookup::{ProductSource, SearchOutcome};
use crate::nutrition::NutritionRecord;
use crate::scan::{
    ean13, manual_entry, run_scan_session, DecodeEvent, ReplayDevice, ScanConfirmationFilter,
    ScanReport,
};

// ============================================================================
// Response Structs
// ============================================================================

/// Response for lookup_barcode
#[derive(Debug, Serialize)]
pub struct LookupBarcodeResponse {
    pub code: String,
    pub found: bool,
    pub product: Option<NutritionRecord>,
    /// Set when the product database could not be reached
    pub lookup_error: Option<String>,
}

/// Response for confirm_scan
#[derive(Debug, Serialize)]
pub struct ConfirmScanResponse {
    pub scan: ScanReport,
    /// Product lookup for the confirmed code
    pub lookup: Option<LookupBarcodeResponse>,
}

/// Response for search_products
#[derive(Debug, Serialize)]
pub struct SearchProductsResponse {
    pub query: String,
    pub count: usize,
    pub result: SearchOutcome,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Look up a barcode
///
/// Scanned codes that look like EAN-13 must carry a valid check digit;
/// codes the user typed (`manual`) are only trimmed.
pub async fn lookup_barcode<S>(
    source: &S,
    code: &str,
    manual: bool,
) -> Result<LookupBarcodeResponse, String>
where
    S: ProductSource + ?Sized,
{
    let code = manual_entry(code).ok_or_else(|| "Barcode must not be empty".to_string())?;

    if !manual && ean13::looks_like_ean13(&code) && !ean13::is_valid(&code) {
        return Err(format!("Barcode {} has an invalid EAN-13 check digit", code));
    }

    Ok(fetch(source, code).await)
}

/// Run submitted decode frames through the confirmation filter
///
/// When a code is confirmed the product is looked up straight away.
pub async fn confirm_scan<S>(
    source: &S,
    frames: Vec<DecodeEvent>,
) -> Result<ConfirmScanResponse, String>
where
    S: ProductSource + ?Sized,
{
    let mut device = ReplayDevice::new(frames);
    let mut filter = ScanConfirmationFilter::new();

    let scan = run_scan_session(&mut device, &mut filter)
        .await
        .map_err(|e| format!("{} {}", e, e.hint()))?;

    let lookup = match scan.confirmed_code() {
        Some(code) => Some(fetch(source, code.to_string()).await),
        None => None,
    };

    Ok(ConfirmScanResponse { scan, lookup })
}

/// Search the product database by name
pub async fn search_products<S>(
    source: &S,
    query: &str,
    limit: u32,
) -> Result<SearchProductsResponse, String>
where
    S: ProductSource + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchProductsResponse {
            query: String::new(),
            count: 0,
            result: SearchOutcome::NoMatch,
        });
    }

    let records = source
        .search(query, limit)
        .await
        .map_err(|e| format!("Product search failed: {}", e))?;

    let result = SearchOutcome::from(records);
    Ok(SearchProductsResponse {
        query: query.to_string(),
        count: result.len(),
        result,
    })
}

/// Look up a code; a failed request is reported but not fatal
async fn fetch<S>(source: &S, code: String) -> LookupBarcodeResponse
where
    S: ProductSource + ?Sized,
{
    match source.by_barcode(&code).await {
        Ok(product) => LookupBarcodeResponse {
            found: product.is_some(),
            code,
            product,
            lookup_error: None,
        },
        Err(e) => {
            tracing::error!("Product lookup for {} failed: {}", code, e);
            LookupBarcodeResponse {
                code,
                found: false,
                product: None,
                lookup_error: Some(e.to_string()),
            }
        }
    }
}
