use super::*;
use std::sync::Arc;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use shared::domain::CharacterId;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: u32,
}

async fn spawn_api_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

fn character_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Character {id}"),
        "status": "Alive",
        "species": "Human",
        "gender": "Unknown",
        "image": format!("https://example.test/{id}.jpeg"),
    })
}

#[tokio::test]
async fn sends_page_as_query_parameter() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_handler = seen.clone();
    let app = Router::new().route(
        "/api/character/",
        get(move |Query(query): Query<PageQuery>| {
            let seen = seen_by_handler.clone();
            async move {
                seen.lock().await.push(query.page);
                Json(serde_json::json!({
                    "info": {"count": 2, "pages": 7, "next": null, "prev": null},
                    "results": [character_json(1), character_json(2)],
                }))
            }
        }),
    );
    let base_url = spawn_api_server(app).await;

    let api = HttpCharacterApi::new(&format!("{base_url}/")).expect("client");
    let page = api.fetch_page(3).await.expect("fetch");

    assert_eq!(*seen.lock().await, vec![3]);
    assert_eq!(page.info.pages, 7);
    assert_eq!(
        page.results.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![CharacterId(1), CharacterId(2)]
    );
}

#[tokio::test]
async fn error_status_is_reported() {
    let app = Router::new().route(
        "/api/character/",
        get(|| async { (StatusCode::NOT_FOUND, "There is nothing here") }),
    );
    let base_url = spawn_api_server(app).await;

    let api = HttpCharacterApi::new(&base_url).expect("client");
    let err = api.fetch_page(99).await.expect_err("must fail");
    assert!(err.to_string().contains("404"), "unexpected error: {err}");
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let app = Router::new().route(
        "/api/character/",
        get(|| async { Json(serde_json::json!({"info": {"pages": 1}})) }),
    );
    let base_url = spawn_api_server(app).await;

    let api = HttpCharacterApi::new(&base_url).expect("client");
    let err = api.fetch_page(1).await.expect_err("must fail");
    assert!(
        format!("{err:#}").contains("malformed character page body"),
        "unexpected error: {err:#}"
    );
}

#[tokio::test]
async fn slow_server_times_out() {
    let app = Router::new().route(
        "/api/character/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!({"info": {"pages": 1}, "results": []}))
        }),
    );
    let base_url = spawn_api_server(app).await;

    let api = HttpCharacterApi::with_timeout(&base_url, Duration::from_millis(100)).expect("client");
    let err = api.fetch_page(1).await.expect_err("must time out");
    let timed_out = err
        .downcast_ref::<reqwest::Error>()
        .map(reqwest::Error::is_timeout)
        .unwrap_or(false);
    assert!(timed_out, "unexpected error: {err:#}");
}

#[test]
fn rejects_non_http_base_url() {
    assert!(HttpCharacterApi::new("not a url").is_err());
    assert!(HttpCharacterApi::new("ftp://example.test/api").is_err());
    assert!(HttpCharacterApi::new("file:///tmp/api").is_err());
    assert!(HttpCharacterApi::new("rickandmortyapi.com").is_err());
    HttpCharacterApi::new(DEFAULT_API_BASE_URL).expect("https");
    HttpCharacterApi::new("http://127.0.0.1:8080/api").expect("http");
}
