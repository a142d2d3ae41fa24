//! Kcal MCP Server Implementation
//!
//! Implements the MCP server with all Kcal Tracker tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::models::ProfileUpdate;
use crate::lookup::ProductSource;
use crate::nutrition::NutritionRecord;
use crate::scan::DecodeEvent;
use crate::tools::activities::{self, ActivitySource};
use crate::tools::status::StatusTracker;
use crate::tools::{days, meals, products, profile, water};

/// Kcal MCP Service
#[derive(Clone)]
pub struct KcalService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    products: Arc<dyn ProductSource>,
    search_limit: u32,
    tool_router: ToolRouter<KcalService>,
}

impl KcalService {
    pub fn new(config: &Config, database: Database, products: Arc<dyn ProductSource>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.product_api_url.clone(),
            ))),
            database,
            products,
            search_limit: config.search_limit,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(result: Result<T, String>) -> Result<CallToolResult, McpError> {
    let value = result.map_err(|e| McpError::internal_error(e, None))?;
    let json = serde_json::to_string_pretty(&value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Product Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupBarcodeParams {
    /// Barcode digits
    pub code: String,
    /// True when the user typed the code; skips the check digit
    #[serde(default)]
    pub manual: bool,
}

/// One decode attempt from the camera
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScanFrameParams {
    /// "decoded", "not_found" or "failed"
    pub kind: String,
    /// Decoded text, or the failure message
    pub value: Option<String>,
}

impl ScanFrameParams {
    fn into_event(self) -> Result<DecodeEvent, String> {
        match (self.kind.trim(), self.value) {
            ("decoded", Some(text)) => Ok(DecodeEvent::Decoded(text)),
            ("decoded", None) => Err("A decoded frame needs a value".to_string()),
            ("not_found", _) => Ok(DecodeEvent::NotFound),
            ("failed", message) => Ok(DecodeEvent::Failed(message.unwrap_or_default())),
            (other, _) => Err(format!(
                "Invalid frame kind '{}'. Use decoded, not_found or failed",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConfirmScanParams {
    pub frames: Vec<ScanFrameParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchProductsParams {
    pub query: String,
    pub limit: Option<u32>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

/// Per-100 g/ml nutrition of a product
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductParams {
    pub name: String,
    pub brand: Option<String>,
    pub kcal_per_100: f64,
    #[serde(default)]
    pub protein_per_100: f64,
    #[serde(default)]
    pub fat_per_100: f64,
    #[serde(default)]
    pub carbs_per_100: f64,
    pub quantity_label: Option<String>,
}

impl From<ProductParams> for NutritionRecord {
    fn from(p: ProductParams) -> Self {
        NutritionRecord {
            name: p.name,
            brand: p.brand,
            kcal_per_100: p.kcal_per_100,
            protein_per_100: p.protein_per_100,
            fat_per_100: p.fat_per_100,
            carbs_per_100: p.carbs_per_100,
            quantity_label: p.quantity_label,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub product: ProductParams,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub note: Option<String>,
}

fn default_unit() -> String { "g".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogManualMealParams {
    pub name: String,
    pub kcal: f64,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteByIdParams {
    pub id: i64,
}

// ============================================================================
// Activity Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListActivityTypesParams {
    /// Filter by activity name or category
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateActivityParams {
    pub activity_id: String,
    pub duration_minutes: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogActivityParams {
    /// Catalog id; omit to log a manual activity
    pub activity_id: Option<String>,
    /// Name of a manual activity
    pub activity_name: Option<String>,
    /// Calories of a manual activity
    pub calories: Option<f64>,
    pub duration_minutes: f64,
    pub date: Option<String>,
    pub time: Option<String>,
}

// ============================================================================
// Water, Day and Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWaterParams {
    pub amount_ml: f64,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayBalanceParams {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub height_cm: Option<f64>,
    pub start_weight_kg: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub calorie_goal: Option<f64>,
    pub water_goal_ml: Option<f64>,
}

impl From<SetProfileParams> for ProfileUpdate {
    fn from(p: SetProfileParams) -> Self {
        Self {
            height_cm: p.height_cm,
            start_weight_kg: p.start_weight_kg,
            current_weight_kg: p.current_weight_kg,
            goal_weight_kg: p.goal_weight_kg,
            calorie_goal: p.calorie_goal,
            water_goal_ml: p.water_goal_ml,
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl KcalService {
    // --- Status ---

    #[tool(description = "Get the current status of the Kcal Tracker service including build info, database status, and process information")]
    async fn kcal_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(Ok(status))
    }

    #[tool(description = "Get step-by-step instructions for logging food, activity and water. Call this when starting a new tracking session or when unsure how to use the tools.")]
    fn tracker_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKER_INSTRUCTIONS)]))
    }

    // --- Products ---

    #[tool(description = "Look up a product by barcode and return its per-100 g/ml nutrition. Scanned EAN-13 codes must have a valid check digit; set manual=true for typed codes.")]
    async fn lookup_barcode(&self, Parameters(p): Parameters<LookupBarcodeParams>) -> Result<CallToolResult, McpError> {
        json_result(products::lookup_barcode(self.products.as_ref(), &p.code, p.manual).await)
    }

    #[tool(description = "Confirm a barcode from camera decode frames. A code is accepted after two identical reads in a row, then looked up.")]
    async fn confirm_scan(&self, Parameters(p): Parameters<ConfirmScanParams>) -> Result<CallToolResult, McpError> {
        let frames = p
            .frames
            .into_iter()
            .map(ScanFrameParams::into_event)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(products::confirm_scan(self.products.as_ref(), frames).await)
    }

    #[tool(description = "Search the product database by name. Returns no_match, a single product, or choices for the user to pick from.")]
    async fn search_products(&self, Parameters(p): Parameters<SearchProductsParams>) -> Result<CallToolResult, McpError> {
        let limit = p.limit.unwrap_or(self.search_limit);
        json_result(products::search_products(self.products.as_ref(), &p.query, limit).await)
    }

    // --- Meals ---

    #[tool(description = "Log an eaten amount of a product. Per-100 values are scaled to the amount (g, kg, oz, lb, ml, l, cup, tbsp, tsp).")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let product = NutritionRecord::from(p.product);
        json_result(meals::log_meal(
            &self.database,
            &product,
            p.amount,
            &p.unit,
            p.date.as_deref(),
            p.time.as_deref(),
            p.note.as_deref(),
        ))
    }

    #[tool(description = "Log a meal from manually entered kcal and optional macros (grams)")]
    fn log_manual_meal(&self, Parameters(p): Parameters<LogManualMealParams>) -> Result<CallToolResult, McpError> {
        json_result(meals::log_manual_meal(
            &self.database,
            &p.name,
            p.kcal,
            p.protein,
            p.fat,
            p.carbs,
            p.date.as_deref(),
            p.time.as_deref(),
            p.note.as_deref(),
        ))
    }

    #[tool(description = "Delete a logged meal")]
    fn delete_meal(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        json_result(meals::delete_meal(&self.database, p.id))
    }

    // --- Activities ---

    #[tool(description = "List activity types with their MET values, grouped by category")]
    fn list_activity_types(&self, Parameters(p): Parameters<ListActivityTypesParams>) -> Result<CallToolResult, McpError> {
        json_result(Ok(activities::list_activity_types(p.query.as_deref())))
    }

    #[tool(description = "Estimate calories burned for a catalog activity using the profile weight (70 kg if unknown)")]
    fn estimate_activity(&self, Parameters(p): Parameters<EstimateActivityParams>) -> Result<CallToolResult, McpError> {
        json_result(activities::estimate_activity(&self.database, &p.activity_id, p.duration_minutes))
    }

    #[tool(description = "Log an activity. Pass activity_id for a catalog activity, or activity_name and calories for a manual one.")]
    fn log_activity(&self, Parameters(p): Parameters<LogActivityParams>) -> Result<CallToolResult, McpError> {
        let source = match (p.activity_id.as_deref(), p.activity_name.as_deref(), p.calories) {
            (Some(activity_id), _, _) => ActivitySource::Catalog { activity_id },
            (None, Some(name), Some(calories)) => ActivitySource::Manual { name, calories },
            _ => {
                return Err(McpError::invalid_params(
                    "Provide activity_id, or activity_name together with calories",
                    None,
                ))
            }
        };
        json_result(activities::log_activity(
            &self.database,
            source,
            p.duration_minutes,
            p.date.as_deref(),
            p.time.as_deref(),
        ))
    }

    #[tool(description = "Delete a logged activity")]
    fn delete_activity(&self, Parameters(p): Parameters<DeleteByIdParams>) -> Result<CallToolResult, McpError> {
        json_result(activities::delete_activity(&self.database, p.id))
    }

    // --- Water ---

    #[tool(description = "Add water to a day's intake in ml (typical glasses: 100, 200, 300)")]
    fn add_water(&self, Parameters(p): Parameters<AddWaterParams>) -> Result<CallToolResult, McpError> {
        json_result(water::add_water(&self.database, p.amount_ml, p.date.as_deref()))
    }

    // --- Days ---

    #[tool(description = "Get a day's energy balance: consumed, burned, balance against the calorie goal, status band, water progress, and the day's meals and activities")]
    fn get_day_balance(&self, Parameters(p): Parameters<GetDayBalanceParams>) -> Result<CallToolResult, McpError> {
        json_result(days::get_day_balance(&self.database, p.date.as_deref()))
    }

    // --- Profile ---

    #[tool(description = "Get height, weights, distance to the goal weight and daily goals, with defaults filled in")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        json_result(profile::get_profile(&self.database))
    }

    #[tool(description = "Set any of height (cm), start/current/goal weight (kg), daily calorie goal (kcal) and water goal (ml). Omitted fields are kept.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        json_result(profile::set_profile(&self.database, p.into()))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for KcalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "kcal".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Kcal Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Kcal Tracker - daily energy balance, activity and water tracking. \
                 IMPORTANT: Call tracker_instructions before logging. \
                 Products: lookup_barcode, confirm_scan, search_products. \
                 Meals: log_meal, log_manual_meal, delete_meal. \
                 Activities: list_activity_types, estimate_activity, log_activity, delete_activity. \
                 Water: add_water. Days: get_day_balance. \
                 Profile: get_profile, set_profile."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(kind: &str, value: Option<&str>) -> ScanFrameParams {
        ScanFrameParams {
            kind: kind.to_string(),
            value: value.map(String::from),
        }
    }

    #[test]
    fn test_scan_frame_conversion() {
        assert_eq!(
            frame("decoded", Some("4006381333931")).into_event(),
            Ok(DecodeEvent::Decoded("4006381333931".to_string()))
        );
        assert_eq!(frame("not_found", None).into_event(), Ok(DecodeEvent::NotFound));
        assert_eq!(
            frame("failed", None).into_event(),
            Ok(DecodeEvent::Failed(String::new()))
        );
        assert!(frame("decoded", None).into_event().is_err());
        assert!(frame("blurry", None).into_event().is_err());
    }

    #[test]
    fn test_product_params_convert() {
        let params: ProductParams = serde_json::from_value(serde_json::json!({
            "name": "Skyr",
            "kcal_per_100": 63.0,
            "protein_per_100": 11.0
        }))
        .unwrap();
        let record = NutritionRecord::from(params);
        assert_eq!(record.fat_per_100, 0.0);
        assert_eq!(record.protein_per_100, 11.0);
    }

    #[test]
    fn test_set_profile_params_convert() {
        let params: SetProfileParams = serde_json::from_value(serde_json::json!({
            "height_cm": 168.0,
            "goal_weight_kg": 60.0
        }))
        .unwrap();
        let update = ProfileUpdate::from(params);
        assert_eq!(update.height_cm, Some(168.0));
        assert_eq!(update.goal_weight_kg, Some(60.0));
        assert_eq!(update.current_weight_kg, None);
    }
}
