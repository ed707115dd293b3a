use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_core::roles::RoleKind;
use campus_db::models::audit::Audit;
use campus_db::models::user::CreateUser;
use campus_db::repositories::{RoleRepo, UserRepo};
use campus_db::DbConfig;

/// Actor recorded in audit columns for rows written by this binary.
const BOOTSTRAP_ACTOR: &str = "bootstrap";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // --- Configuration ---
    let config = DbConfig::from_env().context("Invalid database configuration")?;
    tracing::info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Loaded database configuration"
    );

    // --- Database ---
    let pool = campus_db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    campus_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    campus_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Seed data ---
    let inserted = RoleRepo::seed_well_known(&pool, BOOTSTRAP_ACTOR, chrono::Utc::now()).await?;
    tracing::info!(inserted, "Role table ready");

    seed_admin(&pool).await?;

    pool.close().await;
    tracing::info!("Bootstrap complete");
    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_bootstrap=debug,campus_db=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the initial administrator when `BOOTSTRAP_ADMIN_LOGIN` and
/// `BOOTSTRAP_ADMIN_PASSWORD` are both set and the login is free.
async fn seed_admin(pool: &campus_db::DbPool) -> anyhow::Result<()> {
    let (Ok(login), Ok(password)) = (
        std::env::var("BOOTSTRAP_ADMIN_LOGIN"),
        std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) else {
        tracing::debug!("No bootstrap administrator configured");
        return Ok(());
    };

    if UserRepo::find_by_login(pool, &login).await?.is_some() {
        tracing::info!(%login, "Administrator already present");
        return Ok(());
    }

    let id = UserRepo::create(
        pool,
        &CreateUser {
            first_name: "System".into(),
            last_name: "Administrator".into(),
            login: login.clone(),
            password,
            dob: None,
            mobile_no: String::new(),
            role_id: RoleKind::Admin.id(),
            gender: String::new(),
            audit: Audit::now(BOOTSTRAP_ACTOR),
        },
    )
    .await?;
    tracing::info!(id, %login, "Administrator created");
    Ok(())
}
