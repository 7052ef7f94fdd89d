pub mod recovery;

pub use recovery::{RecoveryError, RecoveryFlow, RecoveryStep};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;

use crate::common::lock;
use crate::storage::{SharedSlots, SlotStore, slots};

/// A registered account. There is no backend; the whole record,
/// credentials included, lives in the local slot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    pub recovery_word: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
}

/// Simulated sign-in/sign-up over locally persisted accounts. Every
/// call sleeps for the configured latency to mimic a backend round
/// trip. The open session survives restarts through the `session`
/// slot.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    store: SharedSlots,
    current: Mutex<Option<Account>>,
    latency: Duration,
}

impl AuthService {
    /// Restore the previous session, if any, from the store.
    pub fn new(store: SharedSlots, latency: Duration) -> Self {
        let current = {
            let guard = lock(&store);
            let session: Option<String> = guard.load(slots::SESSION);
            session.and_then(|email| {
                let accounts: Vec<Account> = guard.load(slots::ACCOUNTS);
                accounts.into_iter().find(|a| a.email == email)
            })
        };

        Self {
            inner: Arc::new(AuthInner {
                store,
                current: Mutex::new(current),
                latency,
            }),
        }
    }

    /// Create an account and open a session for it.
    pub async fn register(&self, account: Account) -> Result<Account, AuthError> {
        sleep(self.inner.latency).await;

        {
            let guard = lock(&self.inner.store);
            let mut accounts: Vec<Account> = guard.load(slots::ACCOUNTS);
            if accounts
                .iter()
                .any(|a| a.email.eq_ignore_ascii_case(&account.email))
            {
                return Err(AuthError::EmailTaken);
            }
            accounts.push(account.clone());
            persist_accounts(&guard, &accounts);
            persist_session(&guard, &account.email);
        }

        *lock(&self.inner.current) = Some(account.clone());
        log::info!("Registered account {}", account.email);
        Ok(account)
    }

    /// Check the credentials against the stored accounts and open a
    /// session. Unknown email and wrong password are indistinguishable
    /// to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        sleep(self.inner.latency).await;

        let account = {
            let guard = lock(&self.inner.store);
            let accounts: Vec<Account> = guard.load(slots::ACCOUNTS);
            let found = accounts
                .into_iter()
                .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            persist_session(&guard, &found.email);
            found
        };

        *lock(&self.inner.current) = Some(account.clone());
        Ok(account)
    }

    /// Close the session. Registered accounts stay on disk.
    pub fn logout(&self) {
        *lock(&self.inner.current) = None;
        if let Err(err) = lock(&self.inner.store).clear(slots::SESSION) {
            log::warn!("Failed to clear session slot: {err}");
        }
    }

    /// The signed-in account, if any.
    pub fn current_user(&self) -> Option<Account> {
        lock(&self.inner.current).clone()
    }
}

fn persist_accounts(store: &SlotStore, accounts: &[Account]) {
    if let Err(err) = store.save(slots::ACCOUNTS, accounts) {
        log::warn!("Failed to persist accounts: {err}");
    }
}

fn persist_session(store: &SlotStore, email: &str) {
    if let Err(err) = store.save(slots::SESSION, email) {
        log::warn!("Failed to persist session: {err}");
    }
}
