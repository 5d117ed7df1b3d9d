use crate::common::{Mail, TestApp, TestOptions, routes};

#[tokio::test]
async fn reports_connected_dependencies() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"], "connected");
    assert_eq!(res.body["mailgun"], "configured");
    assert!(res.body["timestamp"].is_string());
    assert!(res.body["version"].is_string());
}

#[tokio::test]
async fn stays_healthy_without_dependencies() {
    let app = TestApp::spawn_with(TestOptions {
        database: false,
        mail: Mail::Unconfigured,
        ..Default::default()
    })
    .await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["database"], "disconnected");
    assert_eq!(res.body["mailgun"], "not configured");
}

#[tokio::test]
async fn unknown_routes_return_json_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get("/api/nope").await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "Site API");
    assert!(res.body["paths"]["/api/health"].is_object());
}
