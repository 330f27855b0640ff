//! Client configuration

use anyhow::{Context, Result};

use crate::encoder::{LocationStyle, Target};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error messages the Listing Service uses for a dead bearer credential
pub const DEFAULT_SESSION_EXPIRED_MARKERS: [&str; 4] =
    ["jwt expired", "token expired", "invalid token", "jwt malformed"];

/// Connection and encoding settings for the Listing Service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Location key style for `POST /api/properties`
    pub create_location_style: LocationStyle,

    /// Location key style for `PUT /api/properties/{id}`
    pub update_location_style: LocationStyle,

    /// Case-insensitive fragments of an error message that mean the
    /// credential is no longer valid
    pub session_expired_markers: Vec<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("nest-admin/{}", env!("CARGO_PKG_VERSION")),
            create_location_style: LocationStyle::Bracket,
            update_location_style: LocationStyle::Dot,
            session_expired_markers: DEFAULT_SESSION_EXPIRED_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    /// Load `.env` if present, then read `NEST_*` variables
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine.
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("NEST_API_URL").context("NEST_API_URL is not set")?;
        let mut config = Self::new(base_url);

        if let Some(timeout) = lookup("NEST_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid NEST_TIMEOUT_SECS: {timeout}"))?;
        }
        if let Some(style) = lookup("NEST_CREATE_LOCATION_STYLE") {
            config.create_location_style = style
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid NEST_CREATE_LOCATION_STYLE")?;
        }
        if let Some(style) = lookup("NEST_UPDATE_LOCATION_STYLE") {
            config.update_location_style = style
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid NEST_UPDATE_LOCATION_STYLE")?;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_location_styles(mut self, create: LocationStyle, update: LocationStyle) -> Self {
        self.create_location_style = create;
        self.update_location_style = update;
        self
    }

    pub fn with_session_expired_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session_expired_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Location style used for a given endpoint
    pub fn location_style(&self, target: &Target) -> LocationStyle {
        match target {
            Target::Create => self.create_location_style,
            Target::Update(_) => self.update_location_style,
        }
    }

    /// Join a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
