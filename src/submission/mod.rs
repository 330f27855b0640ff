//! Sends encoded listings to the Listing Service and turns the result into
//! what the caller should do next.
//!
//! An expired credential clears the session and asks for a redirect to
//! login without producing an error notice. Any other failure produces a
//! notice and returns the guard to `Idle` so the user can retry with the
//! same draft.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::encoder::{Target, WirePayload};
use crate::service::{ListingService, ServiceError, ServiceResult};
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded { property_id: String },
    /// Terminal: the session expired during a submission
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where the caller should go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    PropertyDetail(String),
    Dashboard,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is in flight or already finished; nothing was sent
    Ignored,
    Succeeded { redirect: Redirect, notice: Notice },
    /// The session has been cleared; the caller must go to login
    SessionExpired,
    Failed(Notice),
    /// The result arrived after the form was torn down and was dropped
    Discarded,
}

impl SubmitOutcome {
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            SubmitOutcome::Succeeded { redirect, .. } => Some(redirect),
            SubmitOutcome::SessionExpired => Some(&Redirect::Login),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            SubmitOutcome::Succeeded { notice, .. } | SubmitOutcome::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

enum Action<'a> {
    Save(&'a Target, WirePayload),
    Delete(&'a str),
}

impl Action<'_> {
    fn fallback_message(&self) -> &'static str {
        match self {
            Action::Save(Target::Create, _) => "Failed to create property",
            Action::Save(Target::Update(_), _) => "Update failed",
            Action::Delete(_) => "delete failed",
        }
    }
}

/// Single-flight submission state machine
pub struct SubmissionGuard {
    service: Arc<dyn ListingService>,
    session: Arc<dyn SessionStore>,
    state: Mutex<SubmissionState>,
}

impl SubmissionGuard {
    pub fn new(service: Arc<dyn ListingService>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            service,
            session,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    /// Send a create or update payload
    pub async fn submit(&self, target: &Target, payload: WirePayload) -> SubmitOutcome {
        self.run(Action::Save(target, payload)).await
    }

    /// Delete a listing, with the same session-expiry handling as submit
    pub async fn delete(&self, id: &str) -> SubmitOutcome {
        self.run(Action::Delete(id)).await
    }

    async fn run(&self, action: Action<'_>) -> SubmitOutcome {
        let Some(flight) = self.begin() else {
            debug!("Submission already in progress, ignoring trigger");
            return SubmitOutcome::Ignored;
        };

        let fallback = action.fallback_message();
        let result = match self.session.credential() {
            Some(token) => self.dispatch(action, &token).await,
            None => Err(ServiceError::SessionExpired),
        };

        match result {
            Ok((property_id, redirect, notice)) => {
                info!("{}", notice.message);
                flight.settle(SubmissionState::Succeeded { property_id });
                SubmitOutcome::Succeeded { redirect, notice }
            }
            Err(ServiceError::SessionExpired) => {
                warn!("Session expired, clearing credential");
                self.session.clear();
                flight.settle(SubmissionState::Failed);
                SubmitOutcome::SessionExpired
            }
            Err(err) => {
                warn!("Submission failed: {}", err);
                flight.settle(SubmissionState::Idle);
                let message = err.server_message().unwrap_or(fallback).to_string();
                SubmitOutcome::Failed(Notice::error(message))
            }
        }
    }

    async fn dispatch(
        &self,
        action: Action<'_>,
        token: &str,
    ) -> ServiceResult<(String, Redirect, Notice)> {
        match action {
            Action::Save(Target::Create, payload) => {
                let id = self.service.create_property(payload, token).await?;
                let notice = Notice::success("Property created successfully");
                Ok((id.clone(), Redirect::PropertyDetail(id), notice))
            }
            Action::Save(Target::Update(id), payload) => {
                let id = self.service.update_property(id, payload, token).await?;
                let notice = Notice::success("Property updated successfully");
                Ok((id.clone(), Redirect::PropertyDetail(id), notice))
            }
            Action::Delete(id) => {
                self.service.delete_property(id, token).await?;
                let notice = Notice::success("Property deleted successfully");
                Ok((id.to_string(), Redirect::Dashboard, notice))
            }
        }
    }

    /// Move `Idle → Submitting`; any other state refuses
    fn begin(&self) -> Option<InFlight<'_>> {
        let mut state = self.lock();
        if *state != SubmissionState::Idle {
            return None;
        }
        *state = SubmissionState::Submitting;
        Some(InFlight {
            state: &self.state,
            settled: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        lock_state(&self.state)
    }
}

/// Marks one submission in flight. Dropped without [`InFlight::settle`]
/// (the submitting future was cancelled) it puts the guard back to `Idle`.
struct InFlight<'a> {
    state: &'a Mutex<SubmissionState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, next: SubmissionState) {
        *lock_state(self.state) = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock_state(self.state);
        if *state == SubmissionState::Submitting {
            debug!("Submission cancelled, guard back to idle");
            *state = SubmissionState::Idle;
        }
    }
}

fn lock_state(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
