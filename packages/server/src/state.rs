use std::sync::Arc;

use crate::chat::ChatDesk;
use crate::config::AppConfig;
use crate::database::DbHandle;
use crate::intake::{DurabilityPolicy, Orchestrator};
use crate::notify::Notifier;
use crate::rate_limit::RateLimits;
use crate::store::ContactStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbHandle,
    pub contacts: Arc<dyn ContactStore>,
    pub notifier: Arc<dyn Notifier>,
    pub intake: Arc<Orchestrator>,
    pub chat: Arc<ChatDesk>,
    pub limits: RateLimits,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DbHandle,
        contacts: Arc<dyn ContactStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let policy = DurabilityPolicy::from_required(config.database.required);
        let intake = Orchestrator::new(contacts.clone(), notifier.clone(), policy);
        let chat = ChatDesk::new(contacts.clone(), notifier.clone(), policy);
        let limits = RateLimits::new(&config.rate_limit);

        Self {
            config: Arc::new(config),
            db,
            contacts,
            notifier,
            intake: Arc::new(intake),
            chat: Arc::new(chat),
            limits,
        }
    }

    /// Staff inbox quoted to visitors when something goes wrong.
    pub fn support_email(&self) -> &str {
        &self.config.mail.recipient
    }
}
