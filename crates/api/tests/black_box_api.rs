use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use millstock_api::app;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let router = app::build_app(Arc::new(app::services::AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn cotton_a() -> serde_json::Value {
    json!({
        "name": "Cotton A",
        "category": "cotton_fabric",
        "stock": 5.0,
        "unit": "kg",
        "unit_price": 2.0,
        "reorder_level": 10.0,
        "supplier": "Meridian Textiles",
        "specifications": { "color": "Navy Blue", "quality": "Premium" }
    })
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn material_lifecycle_keeps_derived_fields_consistent() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create: derived fields come back computed.
    let res = client
        .post(format!("{}/materials", server.base_url))
        .json(&cotton_a())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["total_value"], json!(10.0));
    assert_eq!(created["stock_status"], json!("Low Stock"));
    let id = created["id"].as_str().unwrap().to_string();

    // Over-draining stock fails with the offending field and changes nothing.
    let res = client
        .post(format!("{}/materials/{}/adjust", server.base_url, id))
        .json(&json!({ "delta": -6.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], json!("validation_error"));
    assert_eq!(err["field"], json!("stock"));

    // Restock: status flips, last_restocked is stamped.
    let res = client
        .post(format!("{}/materials/{}/adjust", server.base_url, id))
        .json(&json!({ "delta": 5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let adjusted: serde_json::Value = res.json().await.unwrap();
    assert_eq!(adjusted["stock"], json!(10.0));
    assert_eq!(adjusted["stock_status"], json!("In Stock"));
    assert!(adjusted["last_restocked"].is_string());

    // Update: derived values track the patched fields.
    let res = client
        .put(format!("{}/materials/{}", server.base_url, id))
        .json(&json!({ "unit_price": 3.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["total_value"], json!(30.0));

    // Delete, then the record is gone.
    let res = client
        .delete(format!("{}/materials/{}", server.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: serde_json::Value = res.json().await.unwrap();
    assert_eq!(deleted["deleted"], json!(true));
    assert!(deleted["asset_error"].is_null());

    let res = client
        .get(format!("{}/materials/{}", server.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_sort_and_fail_open() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (name, stock, price) in [("Cotton A", 5.0, 2.0), ("Cotton B", 0.0, 3.0), ("Linen", 20.0, 4.0)] {
        let mut body = cotton_a();
        body["name"] = json!(name);
        body["stock"] = json!(stock);
        body["unit_price"] = json!(price);
        if name == "Linen" {
            body["category"] = json!("linen_fabric");
        }
        let res = client
            .post(format!("{}/materials", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Bucket filter: low -> only Cotton A; out -> only Cotton B.
    let res: serde_json::Value = client
        .get(format!("{}/materials?stock_level=low", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["count"], json!(1));
    assert_eq!(res["materials"][0]["name"], json!("Cotton A"));

    let res: serde_json::Value = client
        .get(format!("{}/materials?stock_level=out", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["count"], json!(1));
    assert_eq!(res["materials"][0]["name"], json!("Cotton B"));

    // Descending price sort.
    let res: serde_json::Value = client
        .get(format!(
            "{}/materials?sort=unit_price&direction=descending",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["materials"][0]["name"], json!("Linen"));

    // Malformed bounds and unknown buckets degrade to no-op criteria.
    let res: serde_json::Value = client
        .get(format!(
            "{}/materials?min_price=banana&stock_level=garbage&sort=velocity",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["count"], json!(3));

    // Search hits supplier and spec fields too.
    let res: serde_json::Value = client
        .get(format!("{}/materials?search=premium", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["count"], json!(3));
}

#[tokio::test]
async fn create_validation_names_the_offending_field() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = cotton_a();
    body["name"] = json!("   ");
    let res = client
        .post(format!("{}/materials", server.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["field"], json!("name"));
}
