//! Fulfillment workflow integration tests
//!
//! In-memory SQLite plus wiremock standing in for the catalog, messaging
//! and invoicing APIs.

use sqlx::sqlite::SqlitePoolOptions;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backoffice_server::core::{CatalogConfig, Config, InvoicingConfig, MessagingConfig, ServerState};
use backoffice_server::db::repository::{invoice, order, product, settings};
use backoffice_server::invoicing::InvoicingClient;
use backoffice_server::orders;
use backoffice_server::utils::AppError;
use shared::models::{
    DeliveryMethod, InvoiceStatus, OrderCreate, OrderItemInput, OrderStatus, ProductCreate,
    SettingsUpdate,
};

struct TestEnv {
    state: ServerState,
    catalog: MockServer,
    messaging: MockServer,
    invoicing: MockServer,
    _work_dir: tempfile::TempDir,
}

async fn test_env() -> TestEnv {
    let catalog = MockServer::start().await;
    let messaging = MockServer::start().await;
    let invoicing = MockServer::start().await;
    let work_dir = tempfile::tempdir().expect("tempdir");

    let config = Config {
        work_dir: work_dir.path().to_string_lossy().into_owned(),
        http_port: 0,
        environment: "test".to_string(),
        catalog: CatalogConfig {
            base_url: catalog.uri(),
            key: "ck_test".to_string(),
            secret: "cs_test".to_string(),
        },
        messaging: MessagingConfig {
            base_url: messaging.uri(),
            account_sid: "AC_test".to_string(),
            auth_token: "token".to_string(),
            from: "+34600000000".to_string(),
            channel_prefix: "whatsapp:".to_string(),
        },
        invoicing: InvoicingConfig {
            base_url: invoicing.uri(),
            api_key: "key_test".to_string(),
        },
    };
    config.ensure_work_dir_structure().expect("work dirs");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    TestEnv {
        state: ServerState::with_pool(config, pool),
        catalog,
        messaging,
        invoicing,
        _work_dir: work_dir,
    }
}

async fn seed_product(env: &TestEnv, name: &str, price: f64, stock: i64) -> i64 {
    product::create(
        &env.state.pool,
        ProductCreate {
            name: name.to_string(),
            description: None,
            category: None,
            price,
            size: None,
            color: None,
            stock: Some(stock),
            stock_min: Some(1),
            image: None,
            external_id: None,
        },
        2,
    )
    .await
    .expect("seed product")
    .id
}

fn order_input(product_id: i64, quantity: i64, unit_price: f64, total: f64) -> OrderCreate {
    OrderCreate {
        customer_name: "Carmen Ruiz".to_string(),
        customer_phone: "612345678".to_string(),
        customer_email: None,
        delivery_method: DeliveryMethod::Pickup,
        delivery_date: None,
        total,
        notes: None,
        items: vec![OrderItemInput {
            product_id,
            quantity,
            unit_price,
            notes: None,
        }],
    }
}

#[tokio::test]
async fn order_create_decrements_stock() {
    let env = test_env().await;
    let pid = seed_product(&env, "Traje lunares rojo", 120.0, 5).await;

    let outcome = orders::create_order(&env.state, order_input(pid, 2, 120.0, 240.0))
        .await
        .expect("create order");

    assert_eq!(outcome.order.order.status, OrderStatus::Pending);
    assert_eq!(outcome.order.order.total, 240.0);
    assert!(outcome.order.order.order_number.starts_with("ENC-"));

    let p = product::find_by_id(&env.state.pool, pid).await.unwrap().unwrap();
    assert_eq!(p.stock, 3);
}

#[tokio::test]
async fn insufficient_line_rejects_whole_order_without_stock_mutation() {
    let env = test_env().await;
    let ok_pid = seed_product(&env, "Mantoncillo", 25.0, 10).await;
    let scarce_pid = seed_product(&env, "Peineta", 15.0, 1).await;

    let mut data = order_input(ok_pid, 2, 25.0, 80.0);
    data.items.push(OrderItemInput {
        product_id: scarce_pid,
        quantity: 2,
        unit_price: 15.0,
        notes: None,
    });

    let err = orders::create_order(&env.state, data).await.unwrap_err();
    match err {
        AppError::BusinessRule(msg) => assert!(msg.contains("Peineta"), "got: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }

    // Neither line touched stock
    let p1 = product::find_by_id(&env.state.pool, ok_pid).await.unwrap().unwrap();
    let p2 = product::find_by_id(&env.state.pool, scarce_pid).await.unwrap().unwrap();
    assert_eq!(p1.stock, 10);
    assert_eq!(p2.stock, 1);

    assert!(
        order::find(&env.state.pool, None, None, None, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn total_mismatch_is_rejected() {
    let env = test_env().await;
    let pid = seed_product(&env, "Falda flamenca", 80.0, 5).await;

    let err = orders::create_order(&env.state, order_input(pid, 2, 80.0, 150.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got: {err:?}");

    let p = product::find_by_id(&env.state.pool, pid).await.unwrap().unwrap();
    assert_eq!(p.stock, 5);
}

#[tokio::test]
async fn cancel_restores_stock_and_creates_no_invoice() {
    let env = test_env().await;
    let pid = seed_product(&env, "Traje lunares blanco", 100.0, 5).await;

    let outcome = orders::create_order(&env.state, order_input(pid, 2, 100.0, 200.0))
        .await
        .expect("create order");
    let order_id = outcome.order.order.id;

    let p = product::find_by_id(&env.state.pool, pid).await.unwrap().unwrap();
    assert_eq!(p.stock, 3);

    orders::change_status(&env.state, order_id, OrderStatus::Cancelled)
        .await
        .expect("cancel");

    let p = product::find_by_id(&env.state.pool, pid).await.unwrap().unwrap();
    assert_eq!(p.stock, 5);
    assert!(invoice::find_by_order(&env.state.pool, order_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delivered_creates_paid_invoice_and_settles_remotely() {
    let env = test_env().await;

    Mock::given(method("POST"))
        .and(path("/documents/invoice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "doc-123", "invoiceNum": "F-0001" })),
        )
        .expect(1)
        .mount(&env.invoicing)
        .await;
    Mock::given(method("POST"))
        .and(path("/documents/invoice/doc-123/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&env.invoicing)
        .await;

    let pid = seed_product(&env, "Traje lunares verde", 150.0, 5).await;
    let outcome = orders::create_order(&env.state, order_input(pid, 2, 150.0, 300.0))
        .await
        .expect("create order");
    let order_id = outcome.order.order.id;

    orders::change_status(&env.state, order_id, OrderStatus::Delivered)
        .await
        .expect("deliver");

    let inv = invoice::find_by_order(&env.state.pool, order_id)
        .await
        .unwrap()
        .expect("invoice created");
    assert_eq!(inv.status, InvoiceStatus::Paid);
    assert_eq!(inv.total, 300.0);
    assert_eq!(inv.external_id.as_deref(), Some("doc-123"));
    assert_eq!(inv.doc_number, "F-0001");
}

#[tokio::test]
async fn ready_then_delivered_pays_the_same_invoice() {
    let env = test_env().await;

    Mock::given(method("POST"))
        .and(path("/documents/invoice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "doc-9", "invoiceNum": "F-0009" })),
        )
        .expect(1)
        .mount(&env.invoicing)
        .await;
    Mock::given(method("POST"))
        .and(path("/documents/invoice/doc-9/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&env.invoicing)
        .await;

    let pid = seed_product(&env, "Bata de cola", 400.0, 2).await;
    let outcome = orders::create_order(&env.state, order_input(pid, 1, 400.0, 400.0))
        .await
        .expect("create order");
    let order_id = outcome.order.order.id;

    orders::change_status(&env.state, order_id, OrderStatus::Ready)
        .await
        .expect("ready");
    let inv = invoice::find_by_order(&env.state.pool, order_id).await.unwrap().unwrap();
    assert_eq!(inv.status, InvoiceStatus::Issued);

    orders::change_status(&env.state, order_id, OrderStatus::Delivered)
        .await
        .expect("deliver");
    let paid = invoice::find_by_order(&env.state.pool, order_id).await.unwrap().unwrap();
    assert_eq!(paid.id, inv.id);
    assert_eq!(paid.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn illegal_transition_is_rejected() {
    let env = test_env().await;
    let pid = seed_product(&env, "Flor de pelo", 8.0, 20).await;
    let outcome = orders::create_order(&env.state, order_input(pid, 1, 8.0, 8.0))
        .await
        .expect("create order");
    let order_id = outcome.order.order.id;

    orders::change_status(&env.state, order_id, OrderStatus::Cancelled)
        .await
        .expect("cancel");

    let err = orders::change_status(&env.state, order_id, OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got: {err:?}");
}

#[tokio::test]
async fn pdf_fetch_exhausts_retries_with_not_ready() {
    let env = test_env().await;

    // Always HTML, never a PDF
    Mock::given(method("GET"))
        .and(path("/documents/invoice/doc-7/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>still rendering</html>"),
        )
        .expect(5)
        .mount(&env.invoicing)
        .await;

    let client = InvoicingClient::new(env.state.config.invoicing.clone());
    let err = client.fetch_pdf("doc-7").await.unwrap_err();
    assert!(err.to_string().contains("not ready"), "got: {err}");
}

#[tokio::test]
async fn pdf_fetch_accepts_a_real_document() {
    let env = test_env().await;

    let body = vec![0x25u8; 2048]; // %%%... well above the size floor
    Mock::given(method("GET"))
        .and(path("/documents/invoice/doc-8/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(body.clone()),
        )
        .mount(&env.invoicing)
        .await;

    let client = InvoicingClient::new(env.state.config.invoicing.clone());
    let bytes = client.fetch_pdf("doc-8").await.expect("pdf");
    assert_eq!(bytes.len(), 2048);
}

#[tokio::test]
async fn catalog_reconcile_upserts_and_mirrors_images() {
    let env = test_env().await;

    let webp_src = format!("{}/img/dress-7.webp", env.catalog.uri());
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("consumer_key", "ck_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 7,
                "name": "Traje lunares azul",
                "description": "Talla 40",
                "regular_price": "135.50",
                "stock_quantity": 4,
                "status": "publish",
                "categories": [{ "id": 3, "name": "Trajes" }],
                "images": [{ "src": webp_src }],
                "attributes": [
                    { "name": "size", "options": ["40"] },
                    { "name": "color", "options": ["azul"] }
                ]
            }
        ])))
        .mount(&env.catalog)
        .await;

    // The .jpg sibling is preferred over the webp original
    Mock::given(method("GET"))
        .and(path("/img/dress-7.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFFu8, 0xD8, 0xFF, 0xE0]),
        )
        .mount(&env.catalog)
        .await;

    let report = backoffice_server::catalog::run_full_sync(&env.state)
        .await
        .expect("sync");
    assert_eq!(report.pulled, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.images_mirrored, 1);
    assert_eq!(report.failures, 0);

    let local = product::find_by_external_id(&env.state.pool, 7)
        .await
        .unwrap()
        .expect("upserted");
    assert_eq!(local.name, "Traje lunares azul");
    assert_eq!(local.price, 135.5);
    assert_eq!(local.stock, 4);
    assert_eq!(local.size.as_deref(), Some("40"));
    assert_eq!(local.color.as_deref(), Some("azul"));
    let image = local.image.expect("image mirrored");
    assert!(image.ends_with(".jpg"), "got: {image}");
    assert!(std::path::Path::new(&image).exists());
}

#[tokio::test]
async fn catalog_push_captures_external_id() {
    let env = test_env().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 42,
            "name": "Traje lunares negro",
            "regular_price": "99.00",
            "status": "publish"
        })))
        .expect(1)
        .mount(&env.catalog)
        .await;

    let pid = seed_product(&env, "Traje lunares negro", 99.0, 3).await;
    let pushed = backoffice_server::catalog::push_one(&env.state, pid)
        .await
        .expect("push");
    assert_eq!(pushed.external_id, Some(42));
}

#[tokio::test]
async fn notifications_fan_out_per_recipient() {
    let env = test_env().await;

    settings::update(
        &env.state.pool,
        SettingsUpdate {
            recipients: Some(vec!["612345678".to_string(), "698765432".to_string()]),
            ..Default::default()
        },
    )
    .await
    .expect("settings");

    Mock::given(method("POST"))
        .and(path("/Messages"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM001" })),
        )
        .expect(2)
        .mount(&env.messaging)
        .await;

    let outcome = backoffice_server::notify::notify(
        &env.state,
        &["612345678".to_string(), "698765432".to_string()],
        "Nuevo encargo",
    )
    .await;
    assert!(outcome.success);
    assert_eq!(outcome.sent_count(), 2);
}

#[tokio::test]
async fn item_replacement_moves_stock_by_the_difference() {
    let env = test_env().await;
    let pid_a = seed_product(&env, "Traje talla 38", 100.0, 5).await;
    let pid_b = seed_product(&env, "Traje talla 42", 100.0, 5).await;

    let outcome = orders::create_order(&env.state, order_input(pid_a, 2, 100.0, 200.0))
        .await
        .expect("create order");
    let order_id = outcome.order.order.id;

    // Swap to the other size
    let updated = orders::update_order(
        &env.state,
        order_id,
        shared::models::OrderUpdate {
            items: Some(vec![OrderItemInput {
                product_id: pid_b,
                quantity: 1,
                unit_price: 100.0,
                notes: None,
            }]),
            ..Default::default()
        },
    )
    .await
    .expect("update order");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.order.total, 100.0);

    let a = product::find_by_id(&env.state.pool, pid_a).await.unwrap().unwrap();
    let b = product::find_by_id(&env.state.pool, pid_b).await.unwrap().unwrap();
    assert_eq!(a.stock, 5);
    assert_eq!(b.stock, 4);
}
