//! One create or update form session: the draft, its staged media, the
//! reference options shown next to it and the submission guard.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::draft::{DraftCommand, DraftModel};
use crate::encoder::{encode, EncodeOptions, LocationStyle, Target, WirePayload};
use crate::media::{MediaError, MediaKind, MediaStagingArea, PreviewProvider, StagedFile};
use crate::models::ReferenceItem;
use crate::service::{ListingService, ServiceError};
use crate::session::SessionStore;
use crate::submission::{Notice, SubmissionGuard, SubmitOutcome};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("not signed in")]
    SignedOut,

    #[error("failed to load property: {0}")]
    Hydration(#[source] ServiceError),

    #[error("form was closed before loading finished")]
    Cancelled,

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Shared flag telling late results whether their form still exists
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark the hosting view as gone
    pub fn end(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Collaborators every form session needs
#[derive(Clone)]
pub struct FormContext {
    pub service: Arc<dyn ListingService>,
    pub session: Arc<dyn SessionStore>,
    pub previews: Arc<dyn PreviewProvider>,
    pub config: ClientConfig,
}

impl FormContext {
    pub fn new(
        config: &ClientConfig,
        service: Arc<dyn ListingService>,
        session: Arc<dyn SessionStore>,
        previews: Arc<dyn PreviewProvider>,
    ) -> Self {
        Self {
            service,
            session,
            previews,
            config: config.clone(),
        }
    }
}

/// Amenities and services offered as checkboxes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceOptions {
    pub amenities: Vec<ReferenceItem>,
    pub services: Vec<ReferenceItem>,
}

pub struct FormSession {
    target: Target,
    draft: DraftModel,
    staging: MediaStagingArea,
    options: ReferenceOptions,
    location_style: LocationStyle,
    guard: SubmissionGuard,
    liveness: Liveness,
    revision: watch::Sender<u64>,
    notices: Vec<Notice>,
    closed: bool,
}

impl FormSession {
    /// Open a create form. Reference lists load in parallel; if either
    /// fails the form still opens with empty options and an error notice.
    pub async fn create(ctx: &FormContext, liveness: Liveness) -> Result<Self, FormError> {
        if !ctx.session.is_logged_in() {
            return Err(FormError::SignedOut);
        }

        let (amenities, services) =
            tokio::join!(ctx.service.list_amenities(), ctx.service.list_services());
        if !liveness.is_alive() {
            return Err(FormError::Cancelled);
        }

        let mut notices = Vec::new();
        let options = match (amenities, services) {
            (Ok(amenities), Ok(services)) => ReferenceOptions {
                amenities,
                services,
            },
            (a, s) => {
                let err = a.err().or(s.err());
                warn!("Failed to load amenities/services: {:?}", err);
                notices.push(Notice::error("Failed to load amenities/services."));
                ReferenceOptions::default()
            }
        };

        Ok(Self::open(
            ctx,
            Target::Create,
            DraftModel::new_listing(),
            options,
            liveness,
            notices,
        ))
    }

    /// Open an update form. The listing and both reference lists load in
    /// parallel and any failure fails the whole hydration.
    pub async fn update(ctx: &FormContext, id: &str, liveness: Liveness) -> Result<Self, FormError> {
        if !ctx.session.is_logged_in() {
            return Err(FormError::SignedOut);
        }

        let result = tokio::try_join!(
            ctx.service.get_property(id),
            ctx.service.list_amenities(),
            ctx.service.list_services(),
        );
        if !liveness.is_alive() {
            return Err(FormError::Cancelled);
        }

        let (property, amenities, services) = result.map_err(FormError::Hydration)?;
        info!("Loaded property {} for editing", property.id);

        Ok(Self::open(
            ctx,
            Target::Update(id.to_string()),
            DraftModel::from_property(&property),
            ReferenceOptions {
                amenities,
                services,
            },
            liveness,
            Vec::new(),
        ))
    }

    fn open(
        ctx: &FormContext,
        target: Target,
        draft: DraftModel,
        options: ReferenceOptions,
        liveness: Liveness,
        notices: Vec<Notice>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            location_style: ctx.config.location_style(&target),
            target,
            draft,
            staging: MediaStagingArea::new(Arc::clone(&ctx.previews)),
            options,
            guard: SubmissionGuard::new(Arc::clone(&ctx.service), Arc::clone(&ctx.session)),
            liveness,
            revision,
            notices,
            closed: false,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn draft(&self) -> &DraftModel {
        &self.draft
    }

    pub fn staging(&self) -> &MediaStagingArea {
        &self.staging
    }

    pub fn options(&self) -> &ReferenceOptions {
        &self.options
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current revision; bumps after every change to the draft or media
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Observe revisions without polling
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Notices produced while loading the form
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the editable fields with a prepared draft. Media the
    /// Listing Service already stores stay as hydrated.
    pub fn load_draft(&mut self, mut draft: DraftModel) {
        draft.persisted_images = std::mem::take(&mut self.draft.persisted_images);
        draft.persisted_videos = std::mem::take(&mut self.draft.persisted_videos);
        self.draft = draft;
        self.bump();
    }

    pub fn apply(&mut self, command: DraftCommand) -> bool {
        let changed = self.draft.apply(command);
        if changed {
            self.bump();
        }
        changed
    }

    pub fn stage(&mut self, kind: MediaKind, files: impl IntoIterator<Item = StagedFile>) {
        self.staging.stage(kind, files);
        self.bump();
    }

    pub async fn stage_path(
        &mut self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<(), FormError> {
        self.staging.stage_path(kind, path).await?;
        self.bump();
        Ok(())
    }

    pub fn unstage(&mut self, kind: MediaKind, index: usize) -> Option<StagedFile> {
        let removed = self.staging.unstage(kind, index);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Snapshot of what [`FormSession::submit`] would send
    pub fn payload(&self) -> WirePayload {
        let options =
            EncodeOptions::new(self.location_style).with_food_menu(self.draft.has_food_menu());
        encode(&self.draft, &self.staging, options)
    }

    /// Encode and send the draft.
    ///
    /// On success staged previews are released and the session closes. On an
    /// ordinary failure the draft and staged media are kept for a retry.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.closed {
            debug!("Form already closed, ignoring submit");
            return SubmitOutcome::Ignored;
        }
        if !self.liveness.is_alive() {
            debug!("Form torn down before submission, nothing sent");
            self.close();
            return SubmitOutcome::Discarded;
        }

        let payload = self.payload();
        let outcome = self.guard.submit(&self.target, payload).await;

        if !self.liveness.is_alive() {
            debug!("Form torn down during submission, discarding result");
            self.close();
            return SubmitOutcome::Discarded;
        }

        if matches!(
            outcome,
            SubmitOutcome::Succeeded { .. } | SubmitOutcome::SessionExpired
        ) {
            self.close();
        }
        outcome
    }

    /// End the session: late results are discarded and previews released
    pub fn teardown(&mut self) {
        self.liveness.end();
        self.close();
    }

    fn close(&mut self) {
        self.staging.release_all();
        self.closed = true;
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        self.liveness.end();
    }
}
