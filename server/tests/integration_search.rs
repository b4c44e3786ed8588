use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use phrasebook_core::{PhraseBook, Record, SearchEngine};
use serde_json::Value;
use tower::ServiceExt;

fn record(id: &str, keywords: &[&str], question: &str, category: &str) -> Record {
    Record {
        id: Some(id.to_string()),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        question: Some(question.to_string()),
        answer: None,
        category: Some(category.to_string()),
        level: Some("beginner".to_string()),
    }
}

fn test_app() -> Router {
    let engine = SearchEngine::new(vec![
        record("1", &["hei"], "hei", "greetings"),
        record("2", &["takk"], "takk for hjelpen", "greetings"),
    ]);
    let phrases = PhraseBook::new(
        [("hello".to_string(), "hei [хай]".to_string())].into_iter().collect(),
    );
    phrasebook_server::build_app(engine, phrases)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let resp = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, json) = get_json(test_app(), "/search?q=hei&k=5").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "1");
    assert!(results[0]["score"].as_u64().unwrap() >= 100);
}

#[tokio::test]
async fn search_unknown_query_is_empty_not_error() {
    let (status, json) = get_json(test_app(), "/search?q=xyz123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn search_respects_category_filter_and_limit() {
    let (status, json) = get_json(test_app(), "/search?q=greetings&category=greetings&k=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);

    let (_, json) = get_json(test_app(), "/search?q=hei&category=food").await;
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn suggest_completes_prefixes() {
    let (status, json) = get_json(test_app(), "/suggest?q=he").await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = json["suggestions"].as_array().unwrap();
    assert!(suggestions.iter().any(|s| s.as_str() == Some("hei")));
}

#[tokio::test]
async fn translate_looks_up_phrasebook() {
    let (status, json) = get_json(test_app(), "/translate?q=hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["translation"], "hei [хай]");

    let (_, json) = get_json(test_app(), "/translate?q=nope").await;
    assert!(json["translation"].is_null());
}

#[tokio::test]
async fn stats_reports_index_sizes() {
    let app = test_app();
    let (_, _) = get_json(app.clone(), "/search?q=hei").await;
    let (status, json) = get_json(app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_records"], 2);
    assert_eq!(json["total_searches"], 1);
}
