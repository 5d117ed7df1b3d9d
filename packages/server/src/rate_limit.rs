//! Per-client request limits.
//!
//! Two keyed limiters share one middleware: a general one for every `/api`
//! request and a stricter one for contact submissions. Both are checked before
//! the handler runs, so rejected requests never reach validation.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::extractors::client::client_ip;
use crate::state::AppState;

type ClientLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// `max` requests per `window`, refilled evenly across the window.
fn quota(window_secs: u64, max: u32) -> Quota {
    let max = NonZeroU32::new(max).unwrap_or(NonZeroU32::MIN);
    let period = Duration::from_secs(window_secs.max(1)) / max.get();
    Quota::with_period(period.max(Duration::from_millis(1)))
        .unwrap_or_else(|| Quota::per_second(max))
        .allow_burst(max)
}

#[derive(Clone)]
pub struct RateLimits {
    enabled: bool,
    general: Arc<ClientLimiter>,
    contact: Arc<ClientLimiter>,
}

impl RateLimits {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            general: Arc::new(RateLimiter::keyed(quota(
                config.window_secs,
                config.max_requests,
            ))),
            contact: Arc::new(RateLimiter::keyed(quota(
                config.contact_window_secs,
                config.contact_max_requests,
            ))),
        }
    }

    fn check(limiter: &ClientLimiter, ip: &IpAddr) -> Result<(), u64> {
        limiter.check_key(ip).map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            // Round up so clients never retry early.
            (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
        })
    }

    /// Returns seconds until retry when the client is over the general limit.
    pub fn check_general(&self, ip: &IpAddr) -> Result<(), u64> {
        if !self.enabled {
            return Ok(());
        }
        Self::check(&self.general, ip)
    }

    pub fn check_contact(&self, ip: &IpAddr) -> Result<(), u64> {
        if !self.enabled {
            return Ok(());
        }
        Self::check(&self.contact, ip)
    }

    /// Applies the general limit and, for submissions, the contact limit.
    /// Requests without a client address are not limited.
    pub fn check_request(&self, ip: Option<IpAddr>, submission: bool) -> Result<(), u64> {
        let Some(ip) = ip else {
            return Ok(());
        };
        self.check_general(&ip)?;
        if submission {
            self.check_contact(&ip)?;
        }
        Ok(())
    }

    /// Drops state for clients whose quota has fully refilled.
    pub fn retain_recent(&self) {
        self.general.retain_recent();
        self.contact.retain_recent();
    }

    /// Periodically prunes idle client entries until the runtime shuts down.
    pub fn spawn_cleanup(&self, every: Duration) {
        let limits = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                limits.retain_recent();
            }
        });
    }
}

/// Lead-creating routes share the stricter contact quota.
const SUBMISSION_PATHS: &[&str] = &["/api/contacts", "/api/chat/ticket"];

fn is_submission(req: &Request) -> bool {
    req.method() == Method::POST
        && SUBMISSION_PATHS.contains(&req.uri().path().trim_end_matches('/'))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !req.uri().path().starts_with("/api/") {
        return next.run(req).await;
    }

    let ip = client_ip(
        req.headers(),
        req.extensions(),
        state.config.server.trust_proxy,
    );

    match state.limits.check_request(ip, is_submission(&req)) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(
                client = ?ip,
                path = %req.uri().path(),
                retry_after,
                "Rate limit exceeded"
            );
            AppError::RateLimited { retry_after }.into_response()
        }
    }
}
