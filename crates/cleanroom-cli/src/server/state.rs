//! Application state for the web server.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cleanroom::{Dataset, SourceMetadata};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::ApiError;

/// Characters used in session ids.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a session id.
const ID_LENGTH: usize = 7;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// How long an uploaded dataset stays available.
    pub session_ttl: Duration,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3141,
            session_ttl: Duration::minutes(30),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the session lifetime in minutes.
    pub fn with_session_ttl_minutes(mut self, minutes: u32) -> Self {
        self.session_ttl = Duration::minutes(i64::from(minutes));
        self
    }

    /// Set the upload limit in MiB.
    pub fn with_max_upload_mb(mut self, mb: usize) -> Self {
        self.max_upload_bytes = mb.saturating_mul(1024 * 1024);
        self
    }
}

/// An uploaded dataset and its current snapshot.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current snapshot; replaced after every clean or edit.
    pub dataset: Dataset,
    /// Name of the uploaded file, which picks the download format.
    pub original_file_name: String,
    /// Metadata from the upload.
    pub source: SourceMetadata,
    /// Upload time. Expiry is measured from here.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for a freshly parsed upload.
    pub fn new(dataset: Dataset, source: SourceMetadata) -> Self {
        Self {
            dataset,
            original_file_name: source.file.clone(),
            created_at: source.uploaded_at,
            source,
        }
    }

    /// Whether the session has outlived `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

/// In-memory session storage with expiry.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a session under a fresh id and return the id.
    pub async fn insert(&self, session: Session) -> String {
        let mut sessions = self.sessions.write().await;

        let mut id = new_session_id();
        while sessions.contains_key(&id) {
            id = new_session_id();
        }

        sessions.insert(id.clone(), session);
        id
    }

    /// Run `f` on a live session.
    ///
    /// Unknown ids are 404. An expired session is dropped and reported as 410.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get(id) {
            Some(session) => session.is_expired(Utc::now(), self.ttl),
            None => return Err(ApiError::NotFound(format!("Data not found: {}", id))),
        };

        if expired {
            sessions.remove(id);
            info!(session = id, "session expired");
            return Err(ApiError::Gone("Data session expired".to_string()));
        }

        match sessions.get_mut(id) {
            Some(session) => f(session),
            None => Err(ApiError::NotFound(format!("Data not found: {}", id))),
        }
    }

    /// Drop every expired session. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));

        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, remaining = sessions.len(), "purged expired sessions");
        }
        purged
    }

    /// Number of stored sessions, expired or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Random base-36 session id.
fn new_session_id() -> String {
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[fastrand::usize(..ID_ALPHABET.len())]))
        .collect()
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Uploaded datasets by session id.
    pub sessions: SessionStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: SessionStore::new(config.session_ttl),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanroom::FileFormat;

    fn session(age: Duration) -> Session {
        let source = SourceMetadata::new("a.csv", FileFormat::Csv, b"a\n1\n", 1, 1);
        let mut session = Session::new(Dataset::default(), source);
        session.created_at = Utc::now() - age;
        session
    }

    #[test]
    fn test_session_id_shape() {
        let id = new_session_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_config_builders() {
        let config = ServerConfig::default()
            .with_port(8080)
            .with_session_ttl_minutes(5)
            .with_max_upload_mb(2);
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl, Duration::minutes(5));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_live_session_lookup() {
        let store = SessionStore::new(Duration::minutes(30));
        let id = store.insert(session(Duration::minutes(1))).await;

        let name = store
            .with_session(&id, |s| Ok(s.original_file_name.clone()))
            .await
            .unwrap();
        assert_eq!(name, "a.csv");
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new(Duration::minutes(30));
        let result = store.with_session("missing", |_| Ok(())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_session_is_gone_then_unknown() {
        let store = SessionStore::new(Duration::minutes(30));
        let id = store.insert(session(Duration::minutes(31))).await;

        let first = store.with_session(&id, |_| Ok(())).await;
        assert!(matches!(first, Err(ApiError::Gone(_))));

        let second = store.with_session(&id, |_| Ok(())).await;
        assert!(matches!(second, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new(Duration::minutes(30));
        store.insert(session(Duration::minutes(45))).await;
        store.insert(session(Duration::minutes(5))).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}
