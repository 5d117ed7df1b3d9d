use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, TestOptions, routes};

mod messages {
    use super::*;

    #[tokio::test]
    async fn stores_visitor_turn_and_reply() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CHAT_MESSAGE,
                &json!({
                    "message": "Hello there",
                    "sessionId": "session-1",
                    "userInfo": { "name": "Jane Doe", "email": "Jane@Example.com" }
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let reply = &res.body["response"];
        assert_eq!(reply["type"], "welcome");
        assert_eq!(reply["sessionId"], "session-1");
        assert_eq!(reply["quickActions"].as_array().unwrap().len(), 4);
        assert!(reply["messageId"].is_string());

        let res = app.get(&routes::conversation("session-1")).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let turns = res.body["conversations"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["isAI"], false);
        assert_eq!(turns[0]["sender"], "Jane Doe");
        assert_eq!(turns[0]["type"], "text");
        assert_eq!(turns[0]["id"], reply["messageId"]);
        assert_eq!(turns[1]["isAI"], true);
        assert_eq!(turns[1]["type"], "welcome");
        assert_eq!(turns[1]["quickActions"], reply["quickActions"]);
    }

    #[tokio::test]
    async fn keywords_pick_the_menu() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "Our API is down" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["response"]["type"], "support_menu");
        assert_eq!(res.body["response"]["quickActions"][0], "System Down");
    }

    #[tokio::test]
    async fn anonymous_visitor_gets_new_session() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "purple elephants" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let session = res.body["response"]["sessionId"].as_str().unwrap().to_string();
        assert!(!session.is_empty());
        assert_eq!(res.body["response"]["type"], "clarification");

        let id: Uuid = res.body["response"]["messageId"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        let stored = app.store.get(id).await.unwrap();
        assert_eq!(stored.name, "Anonymous User");
        assert_eq!(stored.email, format!("anonymous_{session}@chat.local"));
        assert_eq!(stored.source, "chat_widget");
        assert_eq!(stored.session_id.as_deref(), Some(session.as_str()));
        // Chat turns never trigger email.
        assert_eq!(app.notifier.attempts(), 0);
    }

    #[tokio::test]
    async fn message_text_is_escaped() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CHAT_MESSAGE,
                &json!({ "message": "<script>hi</script>", "sessionId": "s2" }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get(&routes::conversation("s2")).await;
        let text = res.body["conversations"][0]["message"].as_str().unwrap();
        assert!(!text.contains('<'));
    }

    #[tokio::test]
    async fn rejects_empty_message() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "   " }))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["errors"][0]["field"], "message");
    }

    #[tokio::test]
    async fn rejects_bad_visitor_email_and_session() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CHAT_MESSAGE,
                &json!({
                    "message": "hello",
                    "sessionId": "not a session",
                    "userInfo": { "email": "nope" }
                }),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        let fields: Vec<_> = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["sessionId", "email"]);
    }

    #[tokio::test]
    async fn replies_without_storage_when_best_effort() {
        let app = TestApp::spawn_with(TestOptions {
            database: false,
            ..Default::default()
        })
        .await;

        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "hello" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["response"]["messageId"].is_null());
        assert_eq!(res.body["response"]["type"], "welcome");
    }

    #[tokio::test]
    async fn refuses_without_storage_when_required() {
        let app = TestApp::spawn_with(TestOptions {
            database: false,
            durability_required: true,
            ..Default::default()
        })
        .await;

        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "hello" }))
            .await;

        assert_eq!(res.status, 503, "{}", res.text);
        assert_eq!(res.body["code"], "SERVICE_UNAVAILABLE");
    }
}

mod conversation {
    use super::*;

    #[tokio::test]
    async fn only_returns_chat_turns_of_the_session() {
        let app = TestApp::spawn().await;
        for (session, text) in [("a1", "hello"), ("b1", "invoice please"), ("a1", "talk to someone")] {
            let res = app
                .post_json(
                    routes::CHAT_MESSAGE,
                    &json!({ "message": text, "sessionId": session }),
                )
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }
        let res = app
            .post_json(
                routes::CHAT_TICKET,
                &json!({ "subject": "Help", "description": "Broken", "sessionId": "a1" }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get(&routes::conversation("a1")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["sessionId"], "a1");
        let kinds: Vec<_> = res.body["conversations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["text", "welcome", "text", "agent_transfer"]);
    }

    #[tokio::test]
    async fn unknown_session_is_empty() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::conversation("nobody")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["conversations"], json!([]));
    }

    #[tokio::test]
    async fn rejects_malformed_session() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::conversation("bad%20id")).await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["errors"][0]["field"], "sessionId");
    }

    #[tokio::test]
    async fn needs_storage() {
        let app = TestApp::spawn_with(TestOptions {
            database: false,
            ..Default::default()
        })
        .await;

        let res = app.get(&routes::conversation("a1")).await;

        assert_eq!(res.status, 503, "{}", res.text);
    }
}

mod tickets {
    use super::*;

    #[tokio::test]
    async fn creates_ticket_as_lead() {
        let app = TestApp::spawn_with(TestOptions {
            admin: true,
            ..Default::default()
        })
        .await;

        let res = app
            .post_json(
                routes::CHAT_TICKET,
                &json!({
                    "subject": "Dashboard not loading",
                    "description": "The reports page times out since this morning.",
                    "priority": "urgent",
                    "sessionId": "s-9",
                    "userInfo": { "name": "Jane Doe", "email": "jane@example.com" }
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let ticket = &res.body["ticket"];
        assert!(ticket["id"].as_str().unwrap().starts_with("SUP-"));
        assert_eq!(ticket["status"], "created");
        assert_eq!(ticket["priority"], "urgent");
        assert_eq!(ticket["category"], "technical");
        assert_eq!(ticket["estimatedResponse"], "< 1 hour");

        let res = app
            .get(&format!("{}?source=chat_support_ticket", routes::CONTACTS))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let leads = res.body["data"]["contacts"].as_array().unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0]["id"], ticket["contactId"]);
        assert_eq!(leads[0]["priority"], "high");
        assert_eq!(leads[0]["emailSent"], true);
        assert!(
            leads[0]["message"]
                .as_str()
                .unwrap()
                .starts_with("[SUPPORT TICKET]")
        );

        let sent = app.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].to_staff);
        assert_eq!(sent[0].email, "jane@example.com");
    }

    #[tokio::test]
    async fn defaults_to_medium_priority() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CHAT_TICKET,
                &json!({ "subject": "Question", "description": "How do I export?", "category": "billing" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["ticket"]["priority"], "medium");
        assert_eq!(res.body["ticket"]["category"], "billing");
        assert_eq!(res.body["ticket"]["estimatedResponse"], "4-8 hours");
    }

    #[tokio::test]
    async fn rejects_unknown_priority_and_missing_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::CHAT_TICKET, &json!({ "priority": "critical" }))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        let fields: Vec<_> = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["subject", "description", "priority"]);
    }

    #[tokio::test]
    async fn share_the_submission_quota() {
        let app = TestApp::spawn_with(TestOptions {
            contact_limit: 1,
            ..Default::default()
        })
        .await;
        let ticket = json!({ "subject": "Help", "description": "Export fails" });

        assert_eq!(app.post_json(routes::CHAT_TICKET, &ticket).await.status, 200);
        let res = app.post_json(routes::CHAT_TICKET, &ticket).await;
        assert_eq!(res.status, 429, "{}", res.text);
        assert!(res.retry_after.is_some());

        // Chat messages only count against the general quota.
        let res = app
            .post_json(routes::CHAT_MESSAGE, &json!({ "message": "hello" }))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn refused_without_storage_even_when_best_effort() {
        let app = TestApp::spawn_with(TestOptions {
            database: false,
            ..Default::default()
        })
        .await;

        let res = app
            .post_json(
                routes::CHAT_TICKET,
                &json!({ "subject": "Help", "description": "Everything is down" }),
            )
            .await;

        assert_eq!(res.status, 503, "{}", res.text);
        assert_eq!(app.notifier.attempts(), 0);
    }
}
