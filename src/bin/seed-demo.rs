//! Demo seed script
//!
//! Seeds the teacher directory and a spread of announcements covering every
//! display state:
//! - 3 teacher accounts
//! - 1 currently visible announcement
//! - 1 scheduled announcement (start date in the future)
//! - 1 expired announcement
//! - 1 manually deactivated announcement
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL — PostgreSQL connection string (required)

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use std::env;

use hsms_api::db;

fn iso(offset: Duration) -> String {
    (Utc::now() + offset)
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;

    println!("=== Seed Demo Data ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Cleaning existing demo data...");
    sqlx::query("DELETE FROM announcements WHERE created_by LIKE 'demo.%'")
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM teachers WHERE username LIKE 'demo.%'")
        .execute(&pool)
        .await?;

    println!("Creating teachers...");
    for (username, display_name) in [
        ("demo.mrodriguez", "Ms. Rodriguez"),
        ("demo.mchen", "Mr. Chen"),
        ("demo.principal", "Principal Martin"),
    ] {
        sqlx::query("INSERT INTO teachers (username, display_name) VALUES ($1, $2)")
            .bind(username)
            .bind(display_name)
            .execute(&pool)
            .await?;
    }

    println!("Creating announcements...");
    let rows: [(&str, Option<String>, String, Option<bool>, &str); 4] = [
        (
            "School assembly Friday at 10am in the main gym.",
            None,
            iso(Duration::days(7)),
            Some(true),
            "demo.principal",
        ),
        (
            "Spring break begins next month — see the office for the calendar.",
            Some(iso(Duration::days(14))),
            iso(Duration::days(30)),
            Some(true),
            "demo.mrodriguez",
        ),
        (
            "Science fair sign-ups close today!",
            None,
            iso(Duration::days(-1)),
            Some(true),
            "demo.mchen",
        ),
        (
            "Draft: cafeteria menu changes.",
            None,
            iso(Duration::days(21)),
            Some(false),
            "demo.mrodriguez",
        ),
    ];

    for (message, start_date, end_date, active, created_by) in rows {
        sqlx::query(
            "INSERT INTO announcements
                 (message, start_date, end_date, active, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message)
        .bind(start_date)
        .bind(end_date)
        .bind(active)
        .bind(created_by)
        .bind(iso(Duration::zero()))
        .execute(&pool)
        .await?;
    }

    println!("Done. 3 teachers, 4 announcements (1 visible now).");
    Ok(())
}
