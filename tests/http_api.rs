//! Black-box HTTP tests: the full router served on an ephemeral port,
//! backed by a stub catalog server, exercised with reqwest.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::StatusCode as AxumStatus;
use axum::routing::get;
use axum::{Json, Router};
use reqwest::StatusCode;

use inventario_service::adapters::catalog::{CatalogClient, CatalogClientConfig, RetryPolicy};
use inventario_service::adapters::http::{build_router, ApiKeyGuard, AppState, InventoryDocument};
use inventario_service::adapters::metrics::{HealthState, MetricsRegistry};
use inventario_service::adapters::persistence::MemoryStockStore;
use inventario_service::ports::stock_store::StockStore;
use inventario_service::usecases::InventoryService;

const API_KEY: &str = "test-key";

// ---- Stub catalog ----

#[derive(Clone, Default)]
struct CatalogStub {
    calls: Arc<AtomicU32>,
    down: Arc<AtomicBool>,
}

async fn catalog_lookup(
    State(stub): State<CatalogStub>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AxumStatus> {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    if stub.down.load(Ordering::SeqCst) {
        return Err(AxumStatus::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(serde_json::json!({
        "data": { "id": id, "attributes": { "name": "Teclado", "price": 19.99 } }
    })))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ---- Test server ----

struct TestServer {
    base_url: String,
    http: reqwest::Client,
    catalog: CatalogStub,
    store: Arc<MemoryStockStore>,
    health: HealthState,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(Duration::from_millis(10), Duration::from_secs(10)).await
    }

    async fn spawn_with(retry_delay: Duration, request_timeout: Duration) -> Self {
        let catalog = CatalogStub::default();
        let catalog_url = serve(
            Router::new()
                .route("/productos/:id", get(catalog_lookup))
                .with_state(catalog.clone()),
        )
        .await;

        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let client = CatalogClient::new(CatalogClientConfig {
            base_url: format!("{catalog_url}/productos"),
            api_key: API_KEY.to_string(),
            timeout: Duration::from_secs(2),
            retry: RetryPolicy::fixed(3, retry_delay),
        })
        .unwrap()
        .with_metrics(Arc::clone(&metrics));

        let store = Arc::new(MemoryStockStore::new());
        let service = Arc::new(InventoryService::new(Arc::new(client), Arc::clone(&store)));
        let health = HealthState::new(store.clone(), Some(Arc::clone(&metrics)));
        let app = build_router(
            AppState {
                service,
                metrics: Some(metrics),
                request_timeout,
            },
            ApiKeyGuard::new(API_KEY),
            health.clone(),
        );

        Self {
            base_url: serve(app).await,
            http: reqwest::Client::new(),
            catalog,
            store,
            health,
        }
    }

    fn catalog_calls(&self) -> u32 {
        self.catalog.calls.load(Ordering::SeqCst)
    }

    fn take_catalog_down(&self) {
        self.catalog.down.store(true, Ordering::SeqCst);
    }

    async fn get(&self, path: &str, key: Option<&str>) -> reqwest::Response {
        let mut req = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(key) = key {
            req = req.header("x-api-key", key);
        }
        req.send().await.unwrap()
    }

    async fn put(&self, path: &str, key: Option<&str>) -> reqwest::Response {
        let mut req = self.http.put(format!("{}{}", self.base_url, path));
        if let Some(key) = key {
            req = req.header("x-api-key", key);
        }
        req.send().await.unwrap()
    }
}

async fn document(resp: reqwest::Response) -> InventoryDocument {
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

// ---- Tests ----

#[tokio::test]
async fn test_set_sell_get_scenario() {
    let server = TestServer::spawn().await;

    let created = document(
        server
            .put("/inventarios/crearActualizar/42?cantidad=10", Some(API_KEY))
            .await,
    )
    .await;
    assert_eq!(created.data.kind, "inventarios");
    assert_eq!(created.data.attributes.product_id, 42);
    assert_eq!(created.data.attributes.quantity, 10);
    assert!(created.data.id.is_some());

    let sold = document(
        server
            .put("/inventarios/vender/42?cantidadVendida=3", Some(API_KEY))
            .await,
    )
    .await;
    assert_eq!(sold.data.id, created.data.id);
    assert_eq!(sold.data.attributes.quantity, 7);

    let oversell = server
        .put("/inventarios/vender/42?cantidadVendida=100", Some(API_KEY))
        .await;
    assert_eq!(oversell.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = oversell.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    let current = document(server.get("/inventarios/obtener/42", Some(API_KEY)).await).await;
    assert_eq!(current.data.attributes.quantity, 7);
}

#[tokio::test]
async fn test_bad_or_missing_key_is_401_without_catalog_calls() {
    let server = TestServer::spawn().await;

    for key in [None, Some("wrong")] {
        let resp = server.get("/inventarios/obtener/42", key).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = server
            .put("/inventarios/crearActualizar/42?cantidad=10", key)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = server.put("/inventarios/vender/42", key).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    assert_eq!(server.catalog_calls(), 0);
    assert!(server.store.is_empty().await);
}

#[tokio::test]
async fn test_get_unknown_record_is_404() {
    let server = TestServer::spawn().await;
    let resp = server.get("/inventarios/obtener/5", Some(API_KEY)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.catalog_calls(), 1);
}

#[tokio::test]
async fn test_catalog_down_exhausts_attempts_without_mutation() {
    let server = TestServer::spawn().await;
    server
        .store
        .upsert_quantity(42, 5)
        .await
        .unwrap();
    server.take_catalog_down();

    let resp = server.get("/inventarios/obtener/42", Some(API_KEY)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.catalog_calls(), 3);

    let resp = server
        .put("/inventarios/crearActualizar/42?cantidad=99", Some(API_KEY))
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.catalog_calls(), 6);

    let resp = server
        .put("/inventarios/vender/42?cantidadVendida=1", Some(API_KEY))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.catalog_calls(), 9);

    let record = server.store.find_by_product_id(42).await.unwrap().unwrap();
    assert_eq!(record.quantity, 5);
}

#[tokio::test]
async fn test_opaque_500_body() {
    let server = TestServer::spawn().await;
    server.take_catalog_down();

    let resp = server.get("/inventarios/obtener/1", Some(API_KEY)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("500"));
    assert!(!body.contains("attempt"));
}

#[tokio::test]
async fn test_invalid_inputs_are_400() {
    let server = TestServer::spawn().await;

    let cases = [
        server.put("/inventarios/crearActualizar/42", Some(API_KEY)).await,
        server
            .put("/inventarios/crearActualizar/42?cantidad=abc", Some(API_KEY))
            .await,
        server
            .put("/inventarios/crearActualizar/42?cantidad=-1", Some(API_KEY))
            .await,
        server
            .put("/inventarios/vender/42?cantidadVendida=-2", Some(API_KEY))
            .await,
        server.get("/inventarios/obtener/not-a-number", Some(API_KEY)).await,
    ];

    for resp in cases {
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(server.catalog_calls(), 0);
}

#[tokio::test]
async fn test_request_deadline_cancels_retry_wait() {
    let server =
        TestServer::spawn_with(Duration::from_secs(30), Duration::from_millis(200)).await;
    server.take_catalog_down();

    let started = Instant::now();
    let resp = server.get("/inventarios/obtener/1", Some(API_KEY)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(server.catalog_calls(), 1);
}

#[tokio::test]
async fn test_health_and_metrics_are_public() {
    let server = TestServer::spawn().await;

    assert_eq!(server.get("/live", None).await.status(), StatusCode::OK);
    assert_eq!(server.get("/ready", None).await.status(), StatusCode::OK);

    server
        .put("/inventarios/crearActualizar/1?cantidad=1", Some(API_KEY))
        .await;
    let metrics = server.get("/metrics", None).await.text().await.unwrap();
    assert!(metrics.contains("inventario_requests_total"));
    assert!(metrics.contains(r#"operation="set_quantity""#));

    server.health.begin_shutdown();
    assert_eq!(
        server.get("/ready", None).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}
