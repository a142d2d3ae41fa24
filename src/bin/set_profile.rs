//! Utility to set body measurements and daily goals in the database
//!
//! Usage: set_profile [--height CM] [--start-weight KG] [--weight KG]
//!                    [--goal-weight KG] [--calories KCAL] [--water ML]

use kcal::config::database_path;
use kcal::db::{migrations, Database};
use kcal::models::ProfileUpdate;
use kcal::tools::profile::{get_profile, set_profile};

fn parse_args() -> Result<ProfileUpdate, String> {
    let mut args = ProfileUpdate::default();
    let mut iter = std::env::args().skip(1);

    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--height" => &mut args.height_cm,
            "--start-weight" => &mut args.start_weight_kg,
            "--weight" => &mut args.current_weight_kg,
            "--goal-weight" => &mut args.goal_weight_kg,
            "--calories" => &mut args.calorie_goal,
            "--water" => &mut args.water_goal_ml,
            other => return Err(format!("Unknown argument '{}'", other)),
        };
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        let parsed = value
            .parse::<f64>()
            .map_err(|_| format!("Invalid number for {}: '{}'", flag, value))?;
        *slot = Some(parsed);
    }

    Ok(args)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let db_path = database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;

    // Run migrations
    database.with_conn(migrations::run_migrations)?;

    let nothing_given = std::env::args().len() <= 1;
    let profile = if nothing_given {
        get_profile(&database)?
    } else {
        set_profile(&database, args)?
    };

    println!("Profile:");
    if let Some(cm) = profile.height_cm {
        println!("  Height: {} cm", cm);
    }
    if let Some(kg) = profile.start_weight_kg {
        println!("  Start weight: {} kg", kg);
    }
    match profile.current_weight_kg {
        Some(kg) => println!("  Weight: {} kg", kg),
        None => println!("  Weight: not set ({} kg reference)", profile.effective_weight_kg),
    }
    if let Some(kg) = profile.goal_weight_kg {
        match profile.to_goal_kg {
            Some(left) => println!("  Goal weight: {} kg ({} kg to go)", kg, left),
            None => println!("  Goal weight: {} kg", kg),
        }
    }
    println!("  Calorie goal: {} kcal", profile.calorie_goal);
    println!("  Water goal: {} ml", profile.water_goal_ml);
    if let Some(updated_at) = profile.updated_at {
        println!("  Updated: {}", updated_at);
    }

    Ok(())
}
