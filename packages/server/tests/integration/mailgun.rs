use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use ::common::{ContactStatus, ServiceInterest};
use serde_json::json;
use uuid::Uuid;

use site_server::models::contact::ContactDraft;
use site_server::notify::{MailgunNotifier, Notice, Notifier, NotifyError};

use crate::common::{TestOptions, test_config};

#[derive(Debug, Clone)]
struct Delivery {
    domain: String,
    authorization: Option<String>,
    fields: HashMap<String, String>,
}

#[derive(Clone)]
struct Provider {
    status: StatusCode,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

async fn messages(
    State(provider): State<Provider>,
    Path(domain): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    provider.deliveries.lock().unwrap().push(Delivery {
        domain,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        fields,
    });
    (provider.status, Json(json!({"message": "Queued. Thank you."})))
}

/// Starts a stand-in for the Mailgun messages API and returns its base URL.
async fn spawn_provider(status: StatusCode) -> (String, Arc<Mutex<Vec<Delivery>>>) {
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v3/{domain}/messages", post(messages))
        .with_state(Provider {
            status,
            deliveries: deliveries.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), deliveries)
}

fn notifier(base_url: &str) -> MailgunNotifier {
    let mut mail = test_config(&TestOptions::default()).mail;
    mail.api_key = Some("key-test".into());
    mail.domain = Some("mg.example.com".into());
    mail.base_url = base_url.to_string();
    MailgunNotifier::new(&mail).unwrap()
}

fn draft() -> ContactDraft {
    ContactDraft {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        message: "We need help with a forecasting model.".into(),
        phone: None,
        company: Some("Acme".into()),
        service_interest: ServiceInterest::PredictiveAnalytics,
        source: "website".into(),
        status: ContactStatus::New,
        priority: ServiceInterest::PredictiveAnalytics.lead_priority(),
        ip_address: None,
        user_agent: None,
        session_id: None,
        metadata: None,
    }
}

#[tokio::test]
async fn staff_alert_goes_to_recipient_with_reply_to() {
    let (base_url, deliveries) = spawn_provider(StatusCode::OK).await;
    let draft = draft();
    let notice = Notice {
        draft: &draft,
        contact_id: Some(Uuid::now_v7()),
        submitted_at: Utc::now(),
    };

    notifier(&base_url).notify_staff(&notice).await.unwrap();

    let deliveries = deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 1);
    let sent = &deliveries[0];
    assert_eq!(sent.domain, "mg.example.com");
    // base64("api:key-test")
    assert_eq!(sent.authorization.as_deref(), Some("Basic YXBpOmtleS10ZXN0"));
    assert_eq!(sent.fields["to"], "team@example.com");
    assert_eq!(sent.fields["h:Reply-To"], "jane@example.com");
    assert_eq!(sent.fields["subject"], "New Contact Form Submission - Jane Doe");
    assert!(sent.fields["text"].contains("Acme"));
    assert!(sent.fields["html"].contains("Jane Doe"));
}

#[tokio::test]
async fn confirmation_goes_to_submitter() {
    let (base_url, deliveries) = spawn_provider(StatusCode::OK).await;
    let draft = draft();
    let notice = Notice {
        draft: &draft,
        contact_id: None,
        submitted_at: Utc::now(),
    };

    notifier(&base_url).notify_user(&notice).await.unwrap();

    let deliveries = deliveries.lock().unwrap();
    let sent = &deliveries[0];
    assert_eq!(sent.fields["to"], "jane@example.com");
    assert_eq!(sent.fields["subject"], "Thank you for contacting us");
    assert!(!sent.fields.contains_key("h:Reply-To"));
}

#[tokio::test]
async fn provider_rejection_is_reported() {
    let (base_url, _) = spawn_provider(StatusCode::UNAUTHORIZED).await;
    let draft = draft();
    let notice = Notice {
        draft: &draft,
        contact_id: None,
        submitted_at: Utc::now(),
    };

    let err = notifier(&base_url).notify_staff(&notice).await.unwrap_err();

    match err {
        NotifyError::Provider { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Queued"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let draft = draft();
    let notice = Notice {
        draft: &draft,
        contact_id: None,
        submitted_at: Utc::now(),
    };

    let err = notifier("http://127.0.0.1:9")
        .notify_staff(&notice)
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Transport(_) | NotifyError::Timeout));
}

#[tokio::test]
async fn missing_credentials_short_circuit() {
    let (base_url, deliveries) = spawn_provider(StatusCode::OK).await;
    let mut mail = test_config(&TestOptions::default()).mail;
    mail.base_url = base_url;
    let notifier = MailgunNotifier::new(&mail).unwrap();
    let draft = draft();
    let notice = Notice {
        draft: &draft,
        contact_id: None,
        submitted_at: Utc::now(),
    };

    let err = notifier.notify_user(&notice).await.unwrap_err();

    assert!(matches!(err, NotifyError::NotConfigured));
    assert!(deliveries.lock().unwrap().is_empty());
}
