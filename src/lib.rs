//! Administrative client for the NEST Listing Service.
//!
//! Listings are edited as a [`draft::DraftModel`], staged media live in a
//! [`media::MediaStagingArea`], and [`encoder::encode`] flattens both into
//! the multipart body the service expects. [`form::FormSession`] ties these
//! together with the [`submission::SubmissionGuard`]. Profile settings and
//! the contact inbox go through [`account::AccountDesk`].

pub mod account;
pub mod config;
pub mod draft;
pub mod encoder;
pub mod form;
pub mod media;
pub mod models;
pub mod service;
pub mod session;
pub mod submission;

pub use account::{AccountDesk, AccountOutcome};
pub use config::ClientConfig;
pub use draft::{DraftCommand, DraftModel};
pub use encoder::{encode, EncodeOptions, LocationStyle, Target, WirePayload};
pub use form::{FormContext, FormError, FormSession, Liveness};
pub use media::{LocalPreviewProvider, MediaKind, MediaStagingArea, StagedFile};
pub use service::{HttpListingService, ListingService, ServiceError};
pub use session::{MemorySessionStore, SessionStore};
pub use submission::{Notice, Redirect, SubmissionGuard, SubmitOutcome};
