use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rickdex_core::model::{CharacterQuery, CharacterStatus, PageIndex};
use rickdex_core::{ApiClient, CharacterApi, FetchError};
use rickdex_config::ApiConfig;
use serde_json::json;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn character(id: u32, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        "episode": [
            "https://rickandmortyapi.com/api/episode/1",
            "https://rickandmortyapi.com/api/episode/2"
        ],
        "url": format!("https://rickandmortyapi.com/api/character/{id}"),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

async fn characters(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    seen.lock().unwrap().push(params.clone());
    let name = params.get("name").map(String::as_str).unwrap_or_default();

    match name {
        "nobody" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "There is nothing here" })),
        )
            .into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbled" => "definitely not json".into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({})).into_response()
        }
        _ => Json(json!({
            "info": {
                "count": 107,
                "pages": 6,
                "next": "https://rickandmortyapi.com/api/character?page=4&name=rick",
                "prev": "https://rickandmortyapi.com/api/character?page=2&name=rick"
            },
            "results": [
                character(1, "Rick Sanchez", "Alive"),
                character(8, "Adjudicator Rick", "Dead"),
                character(15, "Alien Rick", "unknown"),
            ]
        }))
        .into_response(),
    }
}

/// Serve a fake `/api/character` on an ephemeral port.
async fn spawn_server() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/character", get(characters))
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api"), seen)
}

#[tokio::test]
async fn decodes_page_and_sends_one_based_page() {
    let (base, seen) = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    let query = CharacterQuery::new("rick", PageIndex::new(2))
        .with_status(Some(CharacterStatus::Alive));
    let page = client.fetch_characters(&query).await.unwrap();

    assert_eq!(page.total_count, 107);
    assert_eq!(page.page_count, 6);
    assert_eq!(page.len(), 3);
    assert_eq!(page.records[1].name, "Adjudicator Rick");
    assert_eq!(page.records[1].status, CharacterStatus::Dead);
    assert_eq!(page.records[2].status, CharacterStatus::Unknown);
    assert_eq!(page.records[0].episode_count(), 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["name"], "rick");
    assert_eq!(seen[0]["status"], "Alive");
    assert_eq!(seen[0]["page"], "3");
}

#[tokio::test]
async fn empty_term_and_status_are_sent_blank() {
    let (base, seen) = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    client
        .fetch_characters(&CharacterQuery::default())
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0]["name"], "");
    assert_eq!(seen[0]["status"], "");
    assert_eq!(seen[0]["page"], "1");
}

#[tokio::test]
async fn not_found_carries_api_message() {
    let (base, _) = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    let err = client
        .fetch_characters(&CharacterQuery::new("nobody", PageIndex::FIRST))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err,
        FetchError::Status {
            status: 404,
            message: "There is nothing here".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_error_body_falls_back_to_reason() {
    let (base, _) = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    let err = client
        .fetch_characters(&CharacterQuery::new("broken", PageIndex::FIRST))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base, _) = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    let err = client
        .fetch_characters(&CharacterQuery::new("garbled", PageIndex::FIRST))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let (base, _) = spawn_server().await;
    let config = ApiConfig {
        base_url: rickdex_config::normalize_base_url(&base).unwrap(),
        request_timeout: Duration::from_millis(100),
        ..ApiConfig::default()
    };
    let client = ApiClient::from_config(&config).unwrap();

    let err = client
        .fetch_characters(&CharacterQuery::new("slow", PageIndex::FIRST))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("{addr}/api")).unwrap();
    let err = client
        .fetch_characters(&CharacterQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}
