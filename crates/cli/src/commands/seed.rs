//! Seed data: a starter catalog and the seven-day schedule.
//!
//! Idempotent by construction: products are matched on name within their
//! category and working-hours rows on day of week, so re-running updates
//! nothing and inserts nothing that already exists.

use chrono::NaiveTime;
use rust_decimal::Decimal;

use super::{CliError, connect};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    category: &'static str,
}

const fn product(
    name: &'static str,
    description: &'static str,
    price_cents: u32,
    category: &'static str,
) -> SeedProduct {
    SeedProduct {
        name,
        description,
        price: Decimal::from_parts(price_cents, 0, 0, false, 2),
        category,
    }
}

const CATALOG: &[SeedProduct] = &[
    product("Brigadeiro", "Classic chocolate truffle rolled in sprinkles", 250, "Doces"),
    product("Beijinho", "Coconut truffle topped with a clove", 250, "Doces"),
    product("Quindim", "Golden coconut and egg-yolk custard", 400, "Doces"),
    product("Palha Italiana", "Chocolate fudge squares with crushed biscuit", 600, "Doces"),
    product("Bolo de Cenoura", "Carrot cake with chocolate ganache", 3500, "Bolos"),
    product("Bolo de Chocolate", "Layered chocolate cake", 4200, "Bolos"),
    product("Torta de Limão", "Lime pie with toasted meringue", 4800, "Tortas"),
    product("Pão de Mel", "Honey-spice cake dipped in chocolate", 550, "Doces"),
    product("Croissant", "Laminated butter croissant", 1000, "Salgados"),
];

/// Opening schedule: closed Sunday and Monday, open 9-18 otherwise.
const OPEN_DAYS: &[i16] = &[2, 3, 4, 5, 6];

/// Insert the starter catalog and schedule.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Seeding catalog...");
    let mut inserted = 0_u32;
    for item in CATALOG {
        let result = sqlx::query(
            "INSERT INTO products (name, description, price, category)
             SELECT $1, $2, $3, $4
             WHERE NOT EXISTS (
                 SELECT 1 FROM products WHERE name = $1 AND category = $4
             )",
        )
        .bind(item.name)
        .bind(item.description)
        .bind(item.price)
        .bind(item.category)
        .execute(&pool)
        .await?;
        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }
    tracing::info!("Catalog seeded ({inserted} new products)");

    tracing::info!("Seeding working hours...");
    let open = NaiveTime::from_hms_opt(9, 0, 0);
    let close = NaiveTime::from_hms_opt(18, 0, 0);
    for day in 0_i16..7 {
        let is_closed = !OPEN_DAYS.contains(&day);
        sqlx::query(
            "INSERT INTO working_hours (day_of_week, open_time, close_time, is_closed)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (day_of_week) DO NOTHING",
        )
        .bind(day)
        .bind(if is_closed { None } else { open })
        .bind(if is_closed { None } else { close })
        .bind(is_closed)
        .execute(&pool)
        .await?;
    }
    tracing::info!("Working hours seeded");

    Ok(())
}
