use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;

use crate::common::lock;
use crate::storage::{SharedSlots, slots};

use super::Account;

/// Where the wizard currently is. Steps only ever advance forward;
/// `restart` is the single way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    EnterEmail,
    VerifyCode,
    ResetPassword,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("operation does not apply to the current step")]
    WrongStep,
    #[error("verification code must be six digits")]
    InvalidCode,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Password-recovery wizard: email, six-digit code, new password,
/// done. The backend is simulated; submissions sleep for the
/// configured latency and any well-formed code passes verification.
pub struct RecoveryFlow {
    store: SharedSlots,
    latency: Duration,
    step: RecoveryStep,
    email: String,
}

impl RecoveryFlow {
    pub fn new(store: SharedSlots, latency: Duration) -> Self {
        Self {
            store,
            latency,
            step: RecoveryStep::EnterEmail,
            email: String::new(),
        }
    }

    pub fn step(&self) -> RecoveryStep {
        self.step
    }

    /// Request a verification code for the given address.
    pub async fn submit_email(&mut self, email: &str) -> Result<(), RecoveryError> {
        if self.step != RecoveryStep::EnterEmail {
            return Err(RecoveryError::WrongStep);
        }
        sleep(self.latency).await;
        self.email = email.trim().to_string();
        self.step = RecoveryStep::VerifyCode;
        Ok(())
    }

    /// Check the emailed code. The simulated backend accepts any
    /// six-digit value; a malformed code leaves the step unchanged.
    pub async fn verify_code(&mut self, code: &str) -> Result<(), RecoveryError> {
        if self.step != RecoveryStep::VerifyCode {
            return Err(RecoveryError::WrongStep);
        }
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(RecoveryError::InvalidCode);
        }
        sleep(self.latency).await;
        self.step = RecoveryStep::ResetPassword;
        Ok(())
    }

    /// Set the new password. When the email belongs to a stored
    /// account its password is rewritten; the simulated flow succeeds
    /// either way.
    pub async fn reset_password(
        &mut self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), RecoveryError> {
        if self.step != RecoveryStep::ResetPassword {
            return Err(RecoveryError::WrongStep);
        }
        if new_password != confirm_password {
            return Err(RecoveryError::PasswordMismatch);
        }
        sleep(self.latency).await;

        {
            let guard = lock(&self.store);
            let mut accounts: Vec<Account> = guard.load(slots::ACCOUNTS);
            if let Some(account) = accounts
                .iter_mut()
                .find(|a| a.email.eq_ignore_ascii_case(&self.email))
            {
                account.password = new_password.to_string();
                if let Err(err) = guard.save(slots::ACCOUNTS, &accounts) {
                    log::warn!("Failed to persist recovered password: {err}");
                }
            }
        }

        self.step = RecoveryStep::Done;
        Ok(())
    }

    /// Back to the first step, for "resend code" and "change email".
    pub fn restart(&mut self) {
        self.step = RecoveryStep::EnterEmail;
        self.email.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{self, SlotStore};

    fn flow_with_account() -> (RecoveryFlow, SharedSlots) {
        let store = storage::shared(SlotStore::in_memory().unwrap());
        let account = Account {
            name: "Ana Costa".to_string(),
            email: "ana@esporteon.com".to_string(),
            password: "antiga".to_string(),
            recovery_word: "natação".to_string(),
            avatar_url: None,
        };
        lock(&store).save(slots::ACCOUNTS, &vec![account]).unwrap();
        (
            RecoveryFlow::new(store.clone(), Duration::from_millis(1)),
            store,
        )
    }

    #[tokio::test]
    async fn test_full_walk_rewrites_password() {
        let (mut flow, store) = flow_with_account();
        assert_eq!(flow.step(), RecoveryStep::EnterEmail);

        flow.submit_email("ana@esporteon.com").await.unwrap();
        assert_eq!(flow.step(), RecoveryStep::VerifyCode);

        flow.verify_code("123456").await.unwrap();
        assert_eq!(flow.step(), RecoveryStep::ResetPassword);

        flow.reset_password("nova123", "nova123").await.unwrap();
        assert_eq!(flow.step(), RecoveryStep::Done);

        let accounts: Vec<Account> = lock(&store).load(slots::ACCOUNTS);
        assert_eq!(accounts[0].password, "nova123");
    }

    #[tokio::test]
    async fn test_malformed_code_keeps_step() {
        let (mut flow, _store) = flow_with_account();
        flow.submit_email("ana@esporteon.com").await.unwrap();

        assert_eq!(
            flow.verify_code("12345").await.unwrap_err(),
            RecoveryError::InvalidCode
        );
        assert_eq!(
            flow.verify_code("12345a").await.unwrap_err(),
            RecoveryError::InvalidCode
        );
        assert_eq!(flow.step(), RecoveryStep::VerifyCode);
    }

    #[tokio::test]
    async fn test_password_mismatch_keeps_step() {
        let (mut flow, _store) = flow_with_account();
        flow.submit_email("ana@esporteon.com").await.unwrap();
        flow.verify_code("000000").await.unwrap();

        assert_eq!(
            flow.reset_password("uma", "outra").await.unwrap_err(),
            RecoveryError::PasswordMismatch
        );
        assert_eq!(flow.step(), RecoveryStep::ResetPassword);
    }

    #[tokio::test]
    async fn test_unknown_email_still_completes() {
        let (mut flow, store) = flow_with_account();
        flow.submit_email("ninguem@esporteon.com").await.unwrap();
        flow.verify_code("654321").await.unwrap();
        flow.reset_password("nova", "nova").await.unwrap();
        assert_eq!(flow.step(), RecoveryStep::Done);

        // the stored account is untouched
        let accounts: Vec<Account> = lock(&store).load(slots::ACCOUNTS);
        assert_eq!(accounts[0].password, "antiga");
    }

    #[tokio::test]
    async fn test_out_of_order_calls_are_rejected() {
        let (mut flow, _store) = flow_with_account();
        assert_eq!(
            flow.verify_code("123456").await.unwrap_err(),
            RecoveryError::WrongStep
        );
        assert_eq!(
            flow.reset_password("a", "a").await.unwrap_err(),
            RecoveryError::WrongStep
        );
    }

    #[tokio::test]
    async fn test_restart_returns_to_first_step() {
        let (mut flow, _store) = flow_with_account();
        flow.submit_email("ana@esporteon.com").await.unwrap();
        flow.restart();
        assert_eq!(flow.step(), RecoveryStep::EnterEmail);
        flow.submit_email("ana@esporteon.com").await.unwrap();
        assert_eq!(flow.step(), RecoveryStep::VerifyCode);
    }
}
