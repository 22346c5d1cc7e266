use product_admin_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::products,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let existing = products::Entity::find().count(&orm).await?;
    if existing > 0 {
        println!("Catalog already has {existing} products, skipping seed");
        return Ok(());
    }

    let samples = [
        (
            "Classic Leather Wallet",
            "Hand-stitched wallet in full-grain leather",
            249000,
            10,
            120,
            "active",
        ),
        (
            "Canvas Tote Bag",
            "Everyday tote with reinforced straps",
            99000,
            0,
            300,
            "active",
        ),
        (
            "Stainless Water Bottle",
            "Keeps drinks cold for 24 hours",
            159000,
            15,
            80,
            "active",
        ),
        (
            "Wool Beanie",
            "Seasonal stock, waiting for winter",
            79000,
            0,
            45,
            "inactive",
        ),
    ];
    let seeded = samples.len();

    for (index, (title, description, price, discount, stock, status)) in
        samples.into_iter().enumerate()
    {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(Some(description.to_string())),
            price: Set(price),
            discount_percentage: Set(discount),
            stock: Set(stock),
            thumbnail: NotSet,
            status: Set(status.to_string()),
            position: Set(index as i32 + 1),
            deleted: NotSet,
            deleted_at: NotSet,
            created_at: NotSet,
        }
        .insert(&orm)
        .await?;
    }

    println!("Seeded {seeded} products");
    Ok(())
}
