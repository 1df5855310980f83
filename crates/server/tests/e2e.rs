use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    upload_dir: PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.database.max_connections = 1;
    cfg.database.min_connections = 1;
    let upload_dir = std::env::temp_dir().join(format!("catalog-e2e-{}", Uuid::new_v4()));
    cfg.storage.upload_dir = upload_dir.display().to_string();

    let state = startup::build_state(&cfg).await?;
    let app = routes::build_router(state, startup::build_cors(&cfg.cors), &cfg.storage);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, upload_dir })
}

fn product_form(name: &str, price: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("description", format!("{name} description"))
        .text("price", price.to_string())
        .text("partNumber", format!("PN-{name}"))
}

fn png_part() -> Part {
    Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("photo.png")
        .mime_str("image/png")
        .expect("valid mime")
}

async fn create(app: &TestApp, form: Form) -> anyhow::Result<Value> {
    let res = reqwest::Client::new().post(app.url("/products")).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json().await?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(app.url("/health")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_get_round_trip_with_image() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = product_form("Widget", "9.99")
        .text("discountedPrice", "7.5")
        .part("imageUrl", png_part());
    let created = create(&app, form).await?;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], 9.99);
    assert_eq!(created["discountedPrice"], 7.5);
    assert_eq!(created["partNumber"], "PN-Widget");
    let image_url = created["imageUrl"].as_str().expect("image stored").to_string();
    assert!(image_url.starts_with("/uploads/product-"));
    assert!(image_url.ends_with(".png"));

    let fetched: Value = reqwest::get(app.url(&format!("/products/{id}"))).await?.json().await?;
    for key in ["id", "name", "description", "price", "discountedPrice", "partNumber", "imageUrl"] {
        assert_eq!(fetched[key], created[key], "{key}");
    }

    let img = reqwest::get(app.url(&image_url)).await?;
    assert_eq!(img.status(), HttpStatusCode::OK);
    assert!(img.bytes().await?.starts_with(b"\x89PNG"));
    Ok(())
}

#[tokio::test]
async fn e2e_second_page_of_fifteen() -> anyhow::Result<()> {
    let app = start_server().await?;
    for c in ('A'..='O').rev() {
        create(&app, product_form(&format!("Item {c}"), "1")).await?;
    }
    let res = reqwest::get(app.url("/products?page=2&limit=10&sort=name&order=ASC")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["page"], 2);
    assert_eq!(body["total"], 15);
    assert_eq!(body["next"], false);
    assert_eq!(body["previous"], true);
    let names: Vec<&str> = body["products"].as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Item K", "Item L", "Item M", "Item N", "Item O"]);
    Ok(())
}

#[tokio::test]
async fn e2e_search_and_price_sort() -> anyhow::Result<()> {
    let app = start_server().await?;
    create(&app, product_form("Blue Lamp", "30")).await?;
    create(&app, product_form("Red Lamp", "10")).await?;
    create(&app, product_form("Chair", "20")).await?;

    let body: Value = reqwest::get(app.url("/products?search=lamp&sort=price&order=DESC")).await?.json().await?;
    assert_eq!(body["total"], 2);
    assert_eq!(body["products"][0]["name"], "Blue Lamp");
    assert_eq!(body["products"][1]["name"], "Red Lamp");
    Ok(())
}

#[tokio::test]
async fn e2e_partial_update_and_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, product_form("Widget", "9.99").part("imageUrl", png_part())).await?;
    let id = created["id"].as_i64().unwrap();
    let client = reqwest::Client::new();

    let res = client
        .put(app.url(&format!("/products/{id}")))
        .multipart(Form::new().text("price", "19.5"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["price"], 19.5);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["imageUrl"], created["imageUrl"]);

    let res = client.delete(app.url(&format!("/products/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = client.get(app.url(&format!("/products/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Product with ID {id} not found"));
    let res = client.delete(app.url(&format!("/products/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_rejects_bad_input() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let pdf = Part::bytes(b"%PDF-1.4".to_vec()).file_name("doc.pdf").mime_str("application/pdf")?;
    let res = client.post(app.url("/products")).multipart(product_form("Doc", "1").part("imageUrl", pdf)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().contains("Only image files are allowed!"));

    let res = client.post(app.url("/products")).multipart(product_form("Cheap", "free")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let long = Form::new()
        .text("name", "Long")
        .text("description", "long part number")
        .text("price", "1")
        .text("partNumber", "P".repeat(256));
    let res = client.post(app.url("/products")).multipart(long).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client.get(app.url("/products?sort=password")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client.get(app.url("/products/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let empty: Value = client.get(app.url("/products")).send().await?.json().await?;
    assert_eq!(empty["total"], 0);
    Ok(())
}

#[tokio::test]
async fn e2e_rejects_oversize_image() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let big = Part::bytes(vec![0u8; 5 * 1024 * 1024 + 1]).file_name("huge.png").mime_str("image/png")?;
    let res = client.post(app.url("/products")).multipart(product_form("Huge", "1").part("imageUrl", big)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().contains("byte limit"));

    let mut entries = tokio::fs::read_dir(&app.upload_dir).await?;
    assert!(entries.next_entry().await?.is_none(), "no file should be stored");

    let listed: Value = client.get(app.url("/products")).send().await?.json().await?;
    assert_eq!(listed["total"], 0);
    Ok(())
}
