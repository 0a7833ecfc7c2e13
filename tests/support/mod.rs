#![allow(dead_code)]

use shopfront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::auth::RegisterRequest,
    middleware::auth::AuthUser,
    models::UserRole,
    services::auth_service,
    state::AppState,
};
use uuid::Uuid;

/// State backed by a real database, or `None` when none is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(None);
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        database_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "flow-test-secret".into(),
        jwt_ttl_hours: 1,
    };
    Ok(Some(AppState::new(pool, config)))
}

/// Register a fresh account and return it as an authenticated caller.
pub async fn register(state: &AppState, role: UserRole) -> anyhow::Result<AuthUser> {
    let email = format!("{}-{}@example.com", role.as_str(), Uuid::new_v4());
    let user = auth_service::register_user(
        state,
        RegisterRequest {
            email,
            password: "secret123".into(),
            name: format!("Test {}", role.as_str()),
            role: Some(role),
        },
    )
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub fn money(value: &str) -> rust_decimal::Decimal {
    value.parse().expect("decimal literal")
}
