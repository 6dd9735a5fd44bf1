use anyhow::Result;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{db::connect, news};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

fn draft(url: &str) -> news::ActiveModel {
    let now = Utc::now().into();
    news::ActiveModel {
        title: Set("Race report".into()),
        author: Set("Ana".into()),
        description: Set("Summary".into()),
        content: Set("Body".into()),
        url: Set(url.to_string()),
        url_image: Set("https://img.example.com/a.png".into()),
        published_at: Set("2024-01-01T23:30:00-05:00".into()),
        category: Set("Tech".into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_news_insert_and_find() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() { return Ok(()); }
    let db = setup_test_db().await?;

    let url = format!("https://news.example.com/{}", Uuid::new_v4());
    let created = draft(&url).insert(&db).await?;
    assert!(created.id > 0);

    let found = news::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|n| n.url.as_str()), Some(url.as_str()));

    let ordered = news::Entity::find().order_by_asc(news::Column::Id).all(&db).await?;
    assert!(ordered.windows(2).all(|w| w[0].id < w[1].id));

    news::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(news::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_url_unique_index() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() { return Ok(()); }
    let db = setup_test_db().await?;

    let url = format!("https://news.example.com/{}", Uuid::new_v4());
    let first = draft(&url).insert(&db).await?;
    // same url must violate the unique index
    let dup = draft(&url).insert(&db).await;
    assert!(dup.is_err());

    news::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}
