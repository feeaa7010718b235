//! Notification toggle
//!
//! Negotiates the OS notification permission behind the settings switch.
//! Turning the switch on asks for permission when it has not been granted;
//! a refusal leaves the switch off.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors reported by the platform permission service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Permission service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to schedule notification: {0}")]
    Schedule(String),
}

/// OS notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// User allowed notifications
    Granted,
    /// User refused notifications
    Denied,
    /// User has not been asked yet
    Undetermined,
}

/// Platform notification service
pub trait NotificationPermissions {
    /// Current permission without prompting
    fn status(&self) -> impl Future<Output = Result<PermissionStatus, NotificationError>> + Send;

    /// Prompt the user for permission
    fn request(&self) -> impl Future<Output = Result<PermissionStatus, NotificationError>> + Send;

    /// Fire the "notifications are on" confirmation immediately
    fn schedule_confirmation(&self) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Result of flipping the switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Notifications are on
    Enabled,
    /// Notifications are off at the user's request
    Disabled,
    /// The user refused permission; the switch stays off
    PermissionRequired,
}

/// State of the notification switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationToggle {
    enabled: bool,
    status: PermissionStatus,
    confirm_on_enable: bool,
}

impl NotificationToggle {
    /// Read the current permission; the switch starts on iff it is granted
    pub async fn load<P: NotificationPermissions>(
        provider: &P,
        confirm_on_enable: bool,
    ) -> Result<Self, NotificationError> {
        let status = provider.status().await?;
        debug!(?status, "notification permission loaded");
        Ok(Self {
            enabled: status == PermissionStatus::Granted,
            status,
            confirm_on_enable,
        })
    }

    /// Whether the switch is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last known permission
    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    /// Flip the switch
    pub async fn set_enabled<P: NotificationPermissions>(
        &mut self,
        provider: &P,
        enabled: bool,
    ) -> Result<ToggleOutcome, NotificationError> {
        if !enabled {
            self.enabled = false;
            return Ok(ToggleOutcome::Disabled);
        }

        if self.status != PermissionStatus::Granted {
            self.status = provider.request().await?;
            if self.status != PermissionStatus::Granted {
                info!(status = ?self.status, "notification permission refused");
                self.enabled = false;
                return Ok(ToggleOutcome::PermissionRequired);
            }
        }

        if self.confirm_on_enable {
            provider.schedule_confirmation().await?;
        }
        self.enabled = true;
        info!("notifications enabled");
        Ok(ToggleOutcome::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakePermissions {
        current: PermissionStatus,
        answer: PermissionStatus,
        requests: AtomicUsize,
        confirmations: AtomicUsize,
    }

    impl FakePermissions {
        fn new(current: PermissionStatus, answer: PermissionStatus) -> Self {
            Self {
                current,
                answer,
                requests: AtomicUsize::new(0),
                confirmations: AtomicUsize::new(0),
            }
        }
    }

    impl NotificationPermissions for FakePermissions {
        async fn status(&self) -> Result<PermissionStatus, NotificationError> {
            Ok(self.current)
        }

        async fn request(&self) -> Result<PermissionStatus, NotificationError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }

        async fn schedule_confirmation(&self) -> Result<(), NotificationError> {
            self.confirmations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_reflects_permission() {
        let granted = FakePermissions::new(PermissionStatus::Granted, PermissionStatus::Granted);
        assert!(NotificationToggle::load(&granted, false).await.unwrap().is_enabled());

        let unknown =
            FakePermissions::new(PermissionStatus::Undetermined, PermissionStatus::Granted);
        assert!(!NotificationToggle::load(&unknown, false).await.unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_enable_requests_permission() {
        let provider =
            FakePermissions::new(PermissionStatus::Undetermined, PermissionStatus::Granted);
        let mut toggle = NotificationToggle::load(&provider, true).await.unwrap();

        let outcome = toggle.set_enabled(&provider, true).await.unwrap();
        assert_eq!(outcome, ToggleOutcome::Enabled);
        assert!(toggle.is_enabled());
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
        assert_eq!(provider.confirmations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refusal_keeps_switch_off() {
        let provider = FakePermissions::new(PermissionStatus::Undetermined, PermissionStatus::Denied);
        let mut toggle = NotificationToggle::load(&provider, true).await.unwrap();

        let outcome = toggle.set_enabled(&provider, true).await.unwrap();
        assert_eq!(outcome, ToggleOutcome::PermissionRequired);
        assert!(!toggle.is_enabled());
        assert_eq!(toggle.status(), PermissionStatus::Denied);
        assert_eq!(provider.confirmations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_granted_skips_prompt() {
        let provider = FakePermissions::new(PermissionStatus::Granted, PermissionStatus::Denied);
        let mut toggle = NotificationToggle::load(&provider, false).await.unwrap();
        toggle.set_enabled(&provider, false).await.unwrap();
        assert!(!toggle.is_enabled());

        let outcome = toggle.set_enabled(&provider, true).await.unwrap();
        assert_eq!(outcome, ToggleOutcome::Enabled);
        assert_eq!(provider.requests.load(Ordering::SeqCst), 0);
        assert_eq!(provider.confirmations.load(Ordering::SeqCst), 0);
    }
}
