use serde_json::json;

use crate::common::{TestApp, TestOptions, routes};

async fn admin_app() -> TestApp {
    TestApp::spawn_with(TestOptions {
        admin: true,
        ..Default::default()
    })
    .await
}

#[tokio::test]
async fn triage_routes_are_hidden_by_default() {
    let app = TestApp::spawn().await;
    let id = app.submit_contact("Jane Doe", "consulting").await;

    let res = app.get(&routes::contact(&id)).await;
    assert_eq!(res.status, 404);

    let res = app.get(routes::CONTACT_SUMMARY).await;
    assert_eq!(res.status, 404);
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_newest_first_without_client_metadata() {
        let app = admin_app().await;
        let first = app.submit_contact("First Person", "other").await;
        let second = app.submit_contact("Second Person", "other").await;

        let res = app.get(routes::CONTACTS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let contacts = res.body["data"]["contacts"].as_array().unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0]["id"], second.as_str());
        assert_eq!(contacts[1]["id"], first.as_str());
        assert!(contacts[0].get("ipAddress").is_none());
        assert!(contacts[0].get("userAgent").is_none());

        let pagination = &res.body["data"]["pagination"];
        assert_eq!(pagination["total"], 2);
        assert_eq!(pagination["limit"], 50);
        assert_eq!(pagination["skip"], 0);
        assert_eq!(pagination["hasMore"], false);
    }

    #[tokio::test]
    async fn paginates_with_limit_and_skip() {
        let app = admin_app().await;
        for name in ["Alpha Person", "Beta Person", "Gamma Person"] {
            app.submit_contact(name, "other").await;
        }

        let res = app.get(&format!("{}?limit=2&skip=0", routes::CONTACTS)).await;
        assert_eq!(res.body["data"]["contacts"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["data"]["pagination"]["hasMore"], true);

        let res = app.get(&format!("{}?limit=2&skip=2", routes::CONTACTS)).await;
        assert_eq!(res.body["data"]["contacts"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["data"]["pagination"]["hasMore"], false);
    }

    #[tokio::test]
    async fn filters_by_priority_and_interest() {
        let app = admin_app().await;
        app.submit_contact("High Person", "ai-ml").await;
        app.submit_contact("Medium Person", "data-engineering").await;

        let res = app.get(&format!("{}?priority=high", routes::CONTACTS)).await;
        let contacts = res.body["data"]["contacts"].as_array().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0]["name"], "High Person");

        let res = app
            .get(&format!("{}?serviceInterest=data-engineering", routes::CONTACTS))
            .await;
        assert_eq!(res.body["data"]["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn sorts_by_priority() {
        let app = admin_app().await;
        app.submit_contact("Medium Person", "other").await;
        app.submit_contact("High Person", "consulting").await;

        let res = app.get(&format!("{}?sort=-priority", routes::CONTACTS)).await;
        let contacts = res.body["data"]["contacts"].as_array().unwrap();
        assert_eq!(contacts[0]["priority"], "high");
        assert_eq!(contacts[1]["priority"], "medium");
    }

    #[tokio::test]
    async fn rejects_unknown_filters_and_sorts() {
        let app = admin_app().await;

        let res = app.get(&format!("{}?status=archived", routes::CONTACTS)).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app.get(&format!("{}?sort=email", routes::CONTACTS)).await;
        assert_eq!(res.status, 400);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn returns_full_record() {
        let app = admin_app().await;
        let id = app.submit_contact("Jane Doe", "consulting").await;

        let res = app.get(&routes::contact(&id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["id"], id.as_str());
        assert_eq!(res.body["data"]["ipAddress"], "127.0.0.1");
        assert_eq!(res.body["data"]["emailSent"], true);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids() {
        let app = admin_app().await;

        let res = app
            .get(&routes::contact("0190a8c4-0000-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get(&routes::contact("not-a-uuid")).await;
        assert_eq!(res.status, 400);
    }
}

mod triage {
    use super::*;

    #[tokio::test]
    async fn updates_status_priority_and_notes() {
        let app = admin_app().await;
        let id = app.submit_contact("Jane Doe", "other").await;

        let res = app
            .patch_json(
                &routes::contact_status(&id),
                &json!({"status": "qualified", "priority": "high", "notes": "Budget confirmed"}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["status"], "qualified");
        assert_eq!(res.body["data"]["priority"], "high");
        assert_eq!(res.body["data"]["notes"], "Budget confirmed");

        let stored = app.store.get(id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.status.as_str(), "qualified");
        assert!(stored.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn status_only_keeps_priority() {
        let app = admin_app().await;
        let id = app.submit_contact("Jane Doe", "ai-ml").await;

        let res = app
            .patch_json(&routes::contact_status(&id), &json!({"status": "contacted"}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["priority"], "high");
    }

    #[tokio::test]
    async fn rejects_invalid_status() {
        let app = admin_app().await;
        let id = app.submit_contact("Jane Doe", "other").await;

        let res = app
            .patch_json(&routes::contact_status(&id), &json!({"status": "won"}))
            .await;

        assert_eq!(res.status, 400);
        assert!(res.body["message"].as_str().unwrap().contains("new, contacted, qualified, closed"));
    }

    #[tokio::test]
    async fn unknown_contact_is_not_found() {
        let app = admin_app().await;

        let res = app
            .patch_json(
                &routes::contact_status("0190a8c4-0000-7000-8000-000000000000"),
                &json!({"status": "closed"}),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

#[tokio::test]
async fn summary_counts_by_status_and_interest() {
    let app = admin_app().await;
    let id = app.submit_contact("One Person", "consulting").await;
    app.submit_contact("Two Person", "consulting").await;
    app.submit_contact("Three Person", "ai-ml").await;
    app.patch_json(&routes::contact_status(&id), &json!({"status": "closed"}))
        .await;

    let res = app.get(routes::CONTACT_SUMMARY).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let data = &res.body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["newContacts"], 2);
    assert_eq!(data["closed"], 1);
    assert_eq!(data["contacted"], 0);
    assert_eq!(data["serviceInterest"][0]["serviceInterest"], "consulting");
    assert_eq!(data["serviceInterest"][0]["count"], 2);
}

#[tokio::test]
async fn listing_without_database_is_unavailable() {
    let app = TestApp::spawn_with(TestOptions {
        admin: true,
        database: false,
        ..Default::default()
    })
    .await;

    let res = app.get(routes::CONTACTS).await;

    assert_eq!(res.status, 503);
    assert_eq!(res.body["code"], "SERVICE_UNAVAILABLE");
}
