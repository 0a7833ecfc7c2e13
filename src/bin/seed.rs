use rust_decimal::Decimal;
use shopfront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    models::UserRole,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", UserRole::Admin).await?;
    let vendor_id =
        ensure_user(&pool, "vendor@example.com", "vendor123", "Demo Vendor", UserRole::Vendor).await?;
    let customer_id =
        ensure_user(&pool, "customer@example.com", "customer123", "Demo Customer", UserRole::Customer)
            .await?;
    seed_products(&pool, vendor_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Vendor ID: {vendor_id}, Customer ID: {customer_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    name: &str,
    role: UserRole,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={})", role.as_str());
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool, vendor_id: Uuid) -> anyhow::Result<()> {
    let products = [
        ("Wireless Headphones", "Over-ear, 30h battery", Decimal::new(7999, 2), "Electronics", 25, Decimal::new(10, 0)),
        ("Ferris Mug", "Coffee tastes better with Ferris", Decimal::new(1250, 2), "Home", 100, Decimal::ZERO),
        ("Trail Running Shoes", "Lightweight with a grippy sole", Decimal::new(11900, 2), "Sports", 12, Decimal::new(15, 0)),
        ("Async Rust Handbook", "Patterns for async services", Decimal::new(3000, 2), "Books", 40, Decimal::ZERO),
        ("Sold Out Poster", "Limited print", Decimal::new(1500, 2), "Other", 0, Decimal::ZERO),
    ];

    for (name, description, price, category, stock, discount) in products {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, category, in_stock, stock_quantity, vendor_id, discount_percentage)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2 AND vendor_id = $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(stock > 0)
        .bind(stock)
        .bind(vendor_id)
        .bind(discount)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
