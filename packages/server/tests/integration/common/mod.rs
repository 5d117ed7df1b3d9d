use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use site_server::config::{
    AdminConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, MailConfig, RateLimitConfig,
    RunMode, SeedConfig, ServerConfig,
};
use site_server::database::{self, DbHandle};
use site_server::notify::{Notice, Notifier, NotifyError};
use site_server::state::AppState;
use site_server::store::{ContactStore, SeaOrmContactStore};

pub mod routes {
    pub const HEALTH: &str = "/api/health";
    pub const CONTACTS: &str = "/api/contacts";
    pub const CONTACT_SUMMARY: &str = "/api/contacts/stats/summary";
    pub const TEAM: &str = "/api/team";
    pub const SERVICES: &str = "/api/services";
    pub const CHAT_MESSAGE: &str = "/api/chat/message";
    pub const CHAT_TICKET: &str = "/api/chat/ticket";

    pub fn conversation(session_id: &str) -> String {
        format!("/api/chat/conversation/{session_id}")
    }

    pub fn contact(id: &str) -> String {
        format!("/api/contacts/{id}")
    }

    pub fn contact_status(id: &str) -> String {
        format!("/api/contacts/{id}/status")
    }

    pub fn team_member(id: &str) -> String {
        format!("/api/team/{id}")
    }

    pub fn service(id: &str) -> String {
        format!("/api/services/{id}")
    }

    pub fn service_category(category: &str) -> String {
        format!("/api/services/category/{category}")
    }
}

/// How the fake email gateway behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mail {
    Working,
    Failing,
    Unconfigured,
}

/// One notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to_staff: bool,
    pub email: String,
    pub contact_id: Option<Uuid>,
}

/// Email gateway double that records every call.
pub struct RecordingNotifier {
    mode: Mail,
    pub sent: Mutex<Vec<SentMail>>,
    pub attempts: Mutex<u32>,
    staff_down: AtomicBool,
}

impl RecordingNotifier {
    fn new(mode: Mail) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
            staff_down: AtomicBool::new(mode == Mail::Failing),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }

    fn record(&self, notice: &Notice<'_>, to_staff: bool) -> Result<(), NotifyError> {
        *self.attempts.lock().unwrap() += 1;
        if self.mode == Mail::Unconfigured {
            return Err(NotifyError::NotConfigured);
        }
        if to_staff && self.staff_down.load(Ordering::SeqCst) {
            return Err(NotifyError::Provider {
                status: 503,
                body: "provider down".into(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            to_staff,
            email: notice.draft.email.clone(),
            contact_id: notice.contact_id,
        });
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn is_configured(&self) -> bool {
        self.mode != Mail::Unconfigured
    }

    async fn notify_staff(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        self.record(notice, true)
    }

    async fn notify_user(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        self.record(notice, false)
    }
}

/// Knobs for [`TestApp::spawn_with`].
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Connect an in-memory SQLite database. Otherwise run degraded.
    pub database: bool,
    pub durability_required: bool,
    pub mail: Mail,
    pub admin: bool,
    pub seed: bool,
    pub contact_limit: u32,
    pub environment: RunMode,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            database: true,
            durability_required: false,
            mail: Mail::Working,
            admin: false,
            seed: false,
            contact_limit: 100,
            environment: RunMode::Test,
        }
    }
}

pub fn test_config(options: &TestOptions) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: options.environment,
            trust_proxy: false,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            required: options.durability_required,
            allow_local: true,
            timeout_secs: 5,
            max_connections: 1,
        },
        mail: MailConfig {
            api_key: None,
            domain: None,
            base_url: "http://127.0.0.1:9".to_string(),
            recipient: "team@example.com".to_string(),
            from: "Website <noreply@example.com>".to_string(),
            timeout_secs: 2,
        },
        auth: AuthConfig {
            session_secret: "session-secret-for-integration-tests".to_string(),
            jwt_secret: "jwt-secret-for-integration-tests-00".to_string(),
        },
        rate_limit: RateLimitConfig {
            enabled: true,
            window_secs: 900,
            max_requests: 1000,
            contact_window_secs: 3600,
            contact_max_requests: options.contact_limit,
        },
        admin: AdminConfig {
            enabled: options.admin,
        },
        seed: SeedConfig {
            enabled: options.seed,
        },
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DbHandle,
    pub store: Arc<dyn ContactStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Retry-After` header, if any.
    pub retry_after: Option<String>,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let retry_after = res
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            retry_after,
        }
    }

    /// The `data.id` of a successful submission.
    pub fn contact_id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .unwrap_or_else(|| panic!("Response has no contact id: {}", self.text))
            .to_string()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let config = test_config(&options);

        let db = if options.database {
            let conn = database::init_db(&config.database)
                .await
                .expect("Failed to initialize test database");
            DbHandle::connected(conn, config.database.timeout())
        } else {
            DbHandle::disconnected()
        };

        let store: Arc<dyn ContactStore> = Arc::new(SeaOrmContactStore::new(db.clone()));
        if options.database {
            store
                .ensure_indexes()
                .await
                .expect("Failed to create indexes");
        }
        if options.seed {
            site_server::seed::seed_catalogue(db.conn().expect("seeding needs a database"))
                .await
                .expect("Failed to seed catalogue");
        }

        let notifier = Arc::new(RecordingNotifier::new(options.mail));
        let state = AppState::new(config, db.clone(), store.clone(), notifier.clone());
        let app = site_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            store,
            notifier,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send form POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    /// Submit a valid contact form and return the stored id.
    pub async fn submit_contact(&self, name: &str, interest: &str) -> String {
        let res = self
            .post_json(
                routes::CONTACTS,
                &serde_json::json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                    "message": "We would like to discuss a new analytics project.",
                    "serviceInterest": interest,
                }),
            )
            .await;
        assert_eq!(res.status, 200, "submit_contact failed: {}", res.text);
        res.contact_id()
    }
}
