//! Kcal Tracker
//!
//! An MCP server for daily energy balance, activity and water tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use kcal::build_info;
use kcal::config::Config;
use kcal::db::{self, Database};
use kcal::lookup::OpenFoodFacts;
use kcal::mcp::KcalService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kcal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            eprintln!("Migrating database schema...");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let products = Arc::new(OpenFoodFacts::new(&config.product_api_url)?);

    // Create the Kcal service
    let service = KcalService::new(&config, database, products);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
