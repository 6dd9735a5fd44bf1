use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;
use server::startup::build_repository;

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
}

async fn spawn(state: ServerState) -> anyhow::Result<TestApp> {
    let app: Router = routes::build_router(cors(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

/// Postgres-backed app, or `None` when no database is configured.
async fn spawn_postgres() -> anyhow::Result<Option<TestApp>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip postgres e2e tests.");
        return Ok(None);
    }
    // prefer env over any config file in the working directory
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");
    let mut cfg = configs::AppConfig::default();
    cfg.normalize_and_validate()?;
    let repo = build_repository(&cfg).await?;
    Ok(Some(spawn(ServerState::new(repo)).await?))
}

fn article(url: &str) -> Value {
    json!({
        "title": "Qualifying recap",
        "author": "Ana",
        "description": "Pole by a tenth",
        "content": "Full story",
        "url": url,
        "url_image": "https://img.example.com/q.png",
        "published_at": "2024-05-18 16:00:00",
        "category": "Sport"
    })
}

#[tokio::test]
async fn e2e_memory_round_trip() -> anyhow::Result<()> {
    let app = spawn(ServerState::in_memory()).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/news", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.post(format!("{}/news", app.base_url)).json(&article("https://news.example.com/q")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["published_at"], "2024-05-18 16:00:00");
    let id = body["data"]["id"].as_i64().unwrap_or_default();

    let res = c.patch(format!("{}/news/{}", app.base_url, id)).json(&json!({"published_at": "2024-13-01"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"]["published_at"], json!(["The published at field must be a valid date."]));

    let res = c.delete(format!("{}/news/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_postgres_crud() -> anyhow::Result<()> {
    let Some(app) = spawn_postgres().await? else { return Ok(()) };
    let c = reqwest::Client::new();
    let url = format!("https://news.example.com/{}", Uuid::new_v4());

    let res = c.post(format!("{}/news", app.base_url)).json(&article(&url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["data"]["id"].as_i64().unwrap_or_default();
    assert!(id > 0);

    // unique index and pre-check agree
    let res = c.post(format!("{}/news", app.base_url)).json(&article(&url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["errors"]["url"].is_array());

    let res = c.put(format!("{}/news/{}", app.base_url, id)).json(&article(&url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.patch(format!("{}/news/{}", app.base_url, id)).json(&json!({"title": "Updated"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["title"], "Updated");
    assert_eq!(body["data"]["url"], url.as_str());

    let res = c.get(format!("{}/news", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.delete(format!("{}/news/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(format!("{}/news/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_creates_same_url_one_wins() -> anyhow::Result<()> {
    let Some(app) = spawn_postgres().await? else { return Ok(()) };
    let c = reqwest::Client::new();
    let url = format!("https://news.example.com/race-{}", Uuid::new_v4());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let c = c.clone();
        let endpoint = format!("{}/news", app.base_url);
        let body = article(&url);
        handles.push(tokio::spawn(async move { c.post(endpoint).json(&body).send().await.map(|r| r.status()) }));
    }
    let mut created = 0;
    for h in handles {
        let status = h.await??;
        assert!(status == HttpStatusCode::CREATED || status == HttpStatusCode::BAD_REQUEST, "{status}");
        if status == HttpStatusCode::CREATED { created += 1; }
    }
    assert_eq!(created, 1);
    Ok(())
}

#[tokio::test]
async fn serve_returns_once_shutdown_resolves() -> anyhow::Result<()> {
    let mut cfg = configs::AppConfig::default();
    cfg.store.backend = configs::StoreBackend::Memory;
    cfg.server.port = 0;
    let finished = tokio::time::timeout(std::time::Duration::from_secs(5), server::serve(cfg, async {})).await;
    assert!(matches!(finished, Ok(Ok(()))));
    Ok(())
}
