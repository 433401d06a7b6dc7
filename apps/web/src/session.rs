//! Per-browser page state.
//!
//! Each browser gets its own `RootContainer`, found through the
//! `portfolio_session` cookie. A missing or unknown cookie starts a fresh
//! session with an empty form and result slot; the server never adopts an id
//! it did not issue. Sessions idle for longer than the configured window are
//! dropped on the next lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::ui::upload_form::FormVariant;
use crate::ui::RootContainer;

pub const SESSION_COOKIE: &str = "portfolio_session";

struct Session {
    root: Arc<Mutex<RootContainer>>,
    last_seen: Instant,
}

/// One browser's page state, as resolved for a single request.
pub struct SessionHandle {
    pub id: Uuid,
    pub root: Arc<Mutex<RootContainer>>,
    /// Set when the request carried no usable cookie.
    pub is_new: bool,
}

impl SessionHandle {
    /// Adds `Set-Cookie` for a session the browser does not know about yet.
    pub fn attach_cookie(&self, mut response: Response) -> Response {
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

pub struct SessionStore {
    variant: FormVariant,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(variant: FormVariant, idle_timeout: Duration) -> Self {
        Self {
            variant,
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Finds the caller's session, or starts a new one.
    pub async fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!("Dropped {} idle session(s)", before - sessions.len());
        }

        if let Some(id) = session_id(headers) {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = now;
                return SessionHandle {
                    id,
                    root: session.root.clone(),
                    is_new: false,
                };
            }
        }

        let id = Uuid::new_v4();
        let root = Arc::new(Mutex::new(RootContainer::new(self.variant)));
        sessions.insert(
            id,
            Session {
                root: root.clone(),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "Started session");
        SessionHandle {
            id,
            root,
            is_new: true,
        }
    }

    #[cfg(test)]
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<RootContainer>>> {
        self.sessions.lock().await.get(&id).map(|s| s.root.clone())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// The session id from the request's `Cookie` headers, if it parses.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}
