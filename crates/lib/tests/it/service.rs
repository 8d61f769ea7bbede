//! Tests for the HTTP service layer, run against a real bound listener.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use taxa::TreeStore;

use crate::helpers::test_store;

/// Binds the service router on an ephemeral port and returns its base URL
/// together with the shared store.
async fn start_service() -> (String, Arc<TreeStore>) {
    let store = Arc::new(test_store().await);
    let app = taxa::service::router(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (format!("http://{addr}"), store)
}

fn json_names(items: &[serde_json::Value]) -> HashSet<String> {
    items
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (base, _store) = start_service().await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_fetch_subtree() {
    let (base, _store) = start_service().await;
    let client = reqwest::Client::new();

    let spec = json!({
        "name": "Electronics",
        "children": [
            {"name": "Phones", "children": [{"name": "Smartphones"}]},
            {"name": "Laptops"},
        ],
    });
    let response = client
        .post(format!("{base}/api/v0/categories"))
        .json(&spec)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let root: serde_json::Value = response.json().await.unwrap();
    assert_eq!(root["name"], "Electronics");
    assert_eq!(root["parentId"], serde_json::Value::Null);
    let root_id = root["id"].as_str().unwrap();

    let response = client
        .get(format!("{base}/api/v0/categories/{root_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let info: serde_json::Value = response.json().await.unwrap();
    assert_eq!(info["name"], "Electronics");
    assert_eq!(
        json_names(info["children"].as_array().unwrap()),
        HashSet::from(["Phones".to_string(), "Laptops".to_string()])
    );
    assert!(info["parents"].as_array().unwrap().is_empty());
    assert!(info["siblings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_includes_parents_and_siblings() {
    let (base, store) = start_service().await;
    let client = reqwest::Client::new();

    let spec = json!({
        "name": "Electronics",
        "children": [
            {"name": "Phones", "children": [{"name": "Smartphones"}]},
            {"name": "Laptops"},
        ],
    });
    let response = client
        .post(format!("{base}/api/v0/categories"))
        .json(&spec)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Resolve the Phones id through the library to exercise the GET path.
    let root_id = response.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    let phones = store
        .get_descendants(&root_id.as_str().into())
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Phones")
        .unwrap();

    let info: serde_json::Value = client
        .get(format!("{base}/api/v0/categories/{}", phones.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        json_names(info["parents"].as_array().unwrap()),
        HashSet::from(["Electronics".to_string()])
    );
    assert_eq!(
        json_names(info["children"].as_array().unwrap()),
        HashSet::from(["Smartphones".to_string()])
    );
    assert_eq!(
        json_names(info["siblings"].as_array().unwrap()),
        HashSet::from(["Laptops".to_string()])
    );
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let (base, _store) = start_service().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/api/v0/categories/never-assigned"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_invalid_specs_are_400() {
    let (base, store) = start_service().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/v0/categories");

    // Missing name key.
    let response = client
        .post(&url)
        .json(&json!({"title": "category"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Empty name.
    let response = client
        .post(&url)
        .json(&json!({"name": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Over-length name.
    let response = client
        .post(&url)
        .json(&json!({"name": "x".repeat(256)}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // children must be list-shaped.
    let response = client
        .post(&url)
        .json(&json!({"name": "category", "children": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_name_is_400_and_leaves_count_unchanged() {
    let (base, store) = start_service().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/v0/categories");

    let first = client
        .post(&url)
        .json(&json!({"name": "Books"}))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = client
        .post(&url)
        .json(&json!({"name": "Books"}))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 400);

    assert_eq!(store.count().await.unwrap(), 1);
}
