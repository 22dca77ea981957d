//! Per-client ledgers.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use poem::web::cookie::CookieJar;
use tokio::sync::Mutex;

use crate::ledger::Ledger;
use crate::prelude::*;
use crate::web::cookies;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u128);

impl SessionId {
    pub const COOKIE_NAME: &'static str = "session";

    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl Display for SessionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:032x}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.len() != 32 {
            anyhow::bail!("expected 32 hex digits, got {:?}", value);
        }
        Ok(Self(u128::from_str_radix(value, 16)?))
    }
}

struct Session {
    last_seen: Instant,
    ledger: Arc<Mutex<Ledger>>,
}

/// Sessions are never shared between clients and are forgotten after the TTL of inactivity.
pub struct SessionStore {
    ttl: StdDuration,
    sessions: Mutex<AHashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new(ttl: StdDuration) -> Self {
        Self {
            ttl,
            sessions: Mutex::default(),
        }
    }

    /// Ledger of the client, starting a new session when the client has none.
    ///
    /// The cookie is sent on every call so that its expiry follows the last activity.
    pub async fn ledger(&self, jar: &CookieJar) -> Arc<Mutex<Ledger>> {
        let session_id = match jar
            .get(SessionId::COOKIE_NAME)
            .map(|cookie| SessionId::from_str(cookie.value_str()))
        {
            Some(Ok(session_id)) => session_id,
            Some(Err(error)) => {
                debug!("{:#}", error);
                Self::new_session_id()
            }
            None => Self::new_session_id(),
        };
        cookies::Builder::new(SessionId::COOKIE_NAME)
            .value(session_id.to_string())
            .max_age(self.ttl)
            .http_only()
            .add_to(jar);
        self.get(session_id).await
    }

    pub async fn get(&self, session_id: SessionId) -> Arc<Mutex<Ledger>> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let n_sessions = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < self.ttl);
        if sessions.len() != n_sessions {
            debug!(n_evicted = n_sessions - sessions.len(), n_sessions = sessions.len());
        }

        let session = sessions.entry(session_id).or_insert_with(|| Session {
            last_seen: now,
            ledger: Arc::default(),
        });
        session.last_seen = now;
        Arc::clone(&session.ledger)
    }

    fn new_session_id() -> SessionId {
        let session_id = SessionId::random();
        info!(%session_id, "new session");
        session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Prediction;
    use crate::property::PropertyInput;

    fn prediction(price: f64) -> Prediction {
        Prediction {
            price,
            price_per_sqft: 300,
            lot_to_living_ratio: 5.0,
            input: PropertyInput::default(),
        }
    }

    #[test]
    fn session_id_round_trip_ok() -> Result {
        let session_id = SessionId::random();
        assert_eq!(session_id.to_string().len(), 32);
        assert_eq!(SessionId::from_str(&session_id.to_string())?, session_id);
        Ok(())
    }

    #[test]
    fn session_id_invalid_fails() {
        assert!(SessionId::from_str("").is_err());
        assert!(SessionId::from_str("xyz").is_err());
        assert!(SessionId::from_str(&"g".repeat(32)).is_err());
    }

    #[tokio::test]
    async fn sessions_are_isolated_ok() {
        let store = SessionStore::new(StdDuration::from_secs(60));
        let (alice, bob) = (SessionId::random(), SessionId::random());

        store.get(alice).await.lock().await.append(prediction(1.0));
        assert_eq!(store.get(alice).await.lock().await.len(), 1);
        assert!(store.get(bob).await.lock().await.is_empty());
        assert_eq!(store.sessions.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_ok() {
        let store = SessionStore::new(StdDuration::ZERO);
        let session_id = SessionId::random();
        store.get(session_id).await.lock().await.append(prediction(1.0));
        assert!(store.get(session_id).await.lock().await.is_empty());
    }

    #[tokio::test]
    async fn ledger_issues_cookie_ok() {
        let store = SessionStore::new(StdDuration::from_secs(60));
        let jar = CookieJar::default();
        store.ledger(&jar).await.lock().await.append(prediction(1.0));

        let cookie = jar.get(SessionId::COOKIE_NAME).expect("the session cookie must be set");
        let session_id = SessionId::from_str(cookie.value_str()).unwrap();
        assert_eq!(store.get(session_id).await.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn ledger_refreshes_cookie_ok() {
        let store = SessionStore::new(StdDuration::from_secs(60));
        let session_id = SessionId::random();
        store.get(session_id).await.lock().await.append(prediction(1.0));

        let jar = CookieJar::default();
        jar.add(poem::web::cookie::Cookie::new_with_str(
            SessionId::COOKIE_NAME,
            session_id.to_string(),
        ));
        assert_eq!(store.ledger(&jar).await.lock().await.len(), 1);

        let cookie = jar.get(SessionId::COOKIE_NAME).expect("the session cookie must be set");
        assert_eq!(cookie.value_str(), session_id.to_string());
        assert_eq!(cookie.max_age(), Some(StdDuration::from_secs(60)));
        assert!(cookie.http_only());
    }
}
