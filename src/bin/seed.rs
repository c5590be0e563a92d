use catalog_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{categories::CreateCategoryRequest, products::CreateProductRequest},
    error::AppError,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let state = AppState::postgres(create_orm_conn(pool));

    seed_categories(&state).await?;
    seed_products(&state).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_categories(state: &AppState) -> anyhow::Result<()> {
    let categories = vec![
        ("Electronics", "ELEC", "Phones, laptops and accessories"),
        ("Merchandise", "MERCH", "Hoodies, mugs and stickers"),
        ("Books", "BOOK", "Printed and digital books"),
    ];

    for (name, code, description) in categories {
        let request = CreateCategoryRequest {
            name: name.into(),
            code: code.into(),
            description: Some(description.into()),
        };
        match state.categories.create(request).await {
            Ok(category) => println!("Created category {} ({})", category.code, category.id),
            // Already seeded.
            Err(AppError::Validation(_)) => println!("Category {code} exists, skipping"),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

async fn seed_products(state: &AppState) -> anyhow::Result<()> {
    let products = vec![
        ("Laptop", "LAP-001", "14 inch ultrabook", 999.99, 10, "Electronics"),
        ("Smartphone", "PHN-001", "Unlocked phone, 128 GB", 599.0, 25, "Electronics"),
        ("Phone Case", "PHN-CASE-01", "Shock absorbing case", 19.9, 200, "Electronics"),
        ("Ferris Mug", "MUG-001", "Coffee tastes better with Ferris", 12.0, 100, "Merchandise"),
        ("E-book: Async Rust", "BOOK-ASYNC", "Learn async Rust patterns", 25.0, 75, "Books"),
    ];

    for (name, sku, description, price, stock, category) in products {
        let request = CreateProductRequest {
            name: name.into(),
            description: Some(description.into()),
            sku: sku.into(),
            price,
            stock_quantity: Some(stock),
            category: Some(category.into()),
            available: true,
        };
        match state.products.create(request).await {
            Ok(product) => println!("Created product {} ({})", product.sku, product.id),
            Err(AppError::Validation(_)) => println!("Product {sku} exists, skipping"),
            Err(err) => return Err(err.into()),
        }
    }

    println!("Seeded products");
    Ok(())
}
