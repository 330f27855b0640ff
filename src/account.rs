//! Administrator account actions outside the listing forms: profile
//! settings and the contact inbox.
//!
//! Every call carries the session credential. An expired credential clears
//! the session the same way a listing submission does.

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::{Contact, ProfileUpdate};
use crate::service::{ListingService, ServiceError, ServiceResult};
use crate::session::SessionStore;
use crate::submission::Notice;

/// Result of an account action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountOutcome<T> {
    Done { value: T, notice: Option<Notice> },
    /// The session has been cleared; the caller must go to login
    SessionExpired,
    Failed(Notice),
}

impl<T> AccountOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            AccountOutcome::Done { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            AccountOutcome::Done { notice, .. } => notice.as_ref(),
            AccountOutcome::Failed(notice) => Some(notice),
            AccountOutcome::SessionExpired => None,
        }
    }
}

/// How a failure is worded for the user
enum Wording {
    /// Prefer the service's message, else the fallback
    ServerFirst(&'static str),
    /// Always the fixed text
    Fixed(&'static str),
}

pub struct AccountDesk {
    service: Arc<dyn ListingService>,
    session: Arc<dyn SessionStore>,
}

impl AccountDesk {
    pub fn new(service: Arc<dyn ListingService>, session: Arc<dyn SessionStore>) -> Self {
        Self { service, session }
    }

    /// Save profile settings and refresh the session's name and email from
    /// the echoed user
    pub async fn update_profile(&self, update: ProfileUpdate) -> AccountOutcome<()> {
        let result = match self.session.credential() {
            Some(token) => self.service.update_profile(&update, &token).await,
            None => Err(ServiceError::SessionExpired),
        };
        let result = result.map(|echoed| {
            if let Some(profile) = echoed {
                self.session.update_user(&profile);
            }
        });
        self.settle(
            result,
            Some("Profile Updated Successfully!"),
            Wording::ServerFirst("Update Failed"),
        )
    }

    pub async fn contacts(&self) -> AccountOutcome<Vec<Contact>> {
        let result = match self.session.credential() {
            Some(token) => self.service.list_contacts(&token).await,
            None => Err(ServiceError::SessionExpired),
        };
        self.settle(result, None, Wording::Fixed("Failed to load contacts"))
    }

    pub async fn delete_contact(&self, id: &str) -> AccountOutcome<()> {
        let result = match self.session.credential() {
            Some(token) => self.service.delete_contact(id, &token).await,
            None => Err(ServiceError::SessionExpired),
        };
        self.settle(
            result,
            Some("Message deleted"),
            Wording::Fixed("Failed to delete message"),
        )
    }

    fn settle<T>(
        &self,
        result: ServiceResult<T>,
        success: Option<&'static str>,
        wording: Wording,
    ) -> AccountOutcome<T> {
        match result {
            Ok(value) => {
                if let Some(message) = success {
                    info!("{}", message);
                }
                AccountOutcome::Done {
                    value,
                    notice: success.map(Notice::success),
                }
            }
            Err(ServiceError::SessionExpired) => {
                warn!("Session expired, clearing credential");
                self.session.clear();
                AccountOutcome::SessionExpired
            }
            Err(err) => {
                warn!("Account action failed: {}", err);
                let message = match wording {
                    Wording::ServerFirst(fallback) => err.server_message().unwrap_or(fallback),
                    Wording::Fixed(text) => text,
                };
                AccountOutcome::Failed(Notice::error(message))
            }
        }
    }
}
