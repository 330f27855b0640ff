use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::traits::ListingService;
use super::types::{classify_failure, ServiceError, ServiceResult};
use crate::config::ClientConfig;
use crate::encoder::WirePayload;
use crate::models::{
    ApiEnvelope, Contact, LoginEnvelope, LoginUser, ProfileEnvelope, ProfileUpdate, Property,
    ReferenceItem, UserProfile,
};

/// Listing Service client over HTTP
pub struct HttpListingService {
    client: Client,
    config: ClientConfig,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    #[serde(rename = "_id")]
    id: String,
}

impl HttpListingService {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn bearer(request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
    }

    /// Send a request and return the body, classifying non-2xx responses
    async fn execute(&self, request: RequestBuilder) -> ServiceResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_failure(status, &body, &self.config.session_expired_markers);
            warn!("Listing service returned {}: {}", status, err);
            return Err(err);
        }

        debug!("Received {} bytes", body.len());
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }

    async fn fetch_data<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<T> {
        let url = self.config.endpoint(path);
        debug!("Fetching URL: {}", url);

        self.send::<ApiEnvelope<T>>(self.client.get(&url))
            .await?
            .data
            .ok_or_else(|| ServiceError::InvalidResponse(format!("missing data from {path}")))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<Vec<T>> {
        let url = self.config.endpoint(path);
        debug!("Fetching URL: {}", url);

        let envelope = self.send::<ApiEnvelope<Vec<T>>>(self.client.get(&url)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    fn multipart(payload: WirePayload) -> ServiceResult<reqwest::multipart::Form> {
        payload.into_form().map_err(ServiceError::from)
    }
}

#[async_trait]
impl ListingService for HttpListingService {
    async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginUser> {
        let url = self.config.endpoint("/users");
        info!("Signing in as {}", email);

        let envelope: LoginEnvelope = self
            .send(
                self.client
                    .post(&url)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;

        envelope.user.ok_or_else(|| {
            ServiceError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "missing user in login response".to_string()),
            )
        })
    }

    async fn list_amenities(&self) -> ServiceResult<Vec<ReferenceItem>> {
        self.fetch_list("/api/amenities").await
    }

    async fn list_services(&self) -> ServiceResult<Vec<ReferenceItem>> {
        self.fetch_list("/api/services").await
    }

    async fn list_properties(&self) -> ServiceResult<Vec<Property>> {
        self.fetch_list("/api/properties").await
    }

    async fn get_property(&self, id: &str) -> ServiceResult<Property> {
        self.fetch_data(&format!("/api/properties/{id}")).await
    }

    async fn create_property(&self, payload: WirePayload, token: &str) -> ServiceResult<String> {
        let url = self.config.endpoint("/api/properties");
        info!("Creating property ({} fields)", payload.len());

        let form = Self::multipart(payload)?;
        let envelope: ApiEnvelope<IdOnly> = self
            .send(Self::bearer(self.client.post(&url), token).multipart(form))
            .await?;

        envelope
            .data
            .map(|created| created.id)
            .ok_or_else(|| ServiceError::InvalidResponse("missing id of created property".into()))
    }

    async fn update_property(
        &self,
        id: &str,
        payload: WirePayload,
        token: &str,
    ) -> ServiceResult<String> {
        let url = self.config.endpoint(&format!("/api/properties/{id}"));
        info!("Updating property {} ({} fields)", id, payload.len());

        let form = Self::multipart(payload)?;
        let envelope: ApiEnvelope<IdOnly> = self
            .send(Self::bearer(self.client.put(&url), token).multipart(form))
            .await?;

        Ok(envelope
            .data
            .map(|updated| updated.id)
            .unwrap_or_else(|| id.to_string()))
    }

    async fn delete_property(&self, id: &str, token: &str) -> ServiceResult<()> {
        let url = self.config.endpoint(&format!("/api/properties/{id}"));
        info!("Deleting property {}", id);

        self.execute(Self::bearer(self.client.delete(&url), token))
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        token: &str,
    ) -> ServiceResult<Option<UserProfile>> {
        let url = self.config.endpoint("/api/users/update");
        info!("Updating profile of {}", update.email);

        let envelope: ProfileEnvelope = self
            .send(Self::bearer(self.client.put(&url), token).json(update))
            .await?;
        Ok(envelope.user)
    }

    async fn list_contacts(&self, token: &str) -> ServiceResult<Vec<Contact>> {
        let url = self.config.endpoint("/api/contact");
        debug!("Fetching URL: {}", url);

        let envelope: ApiEnvelope<Vec<Contact>> =
            self.send(Self::bearer(self.client.get(&url), token)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn delete_contact(&self, id: &str, token: &str) -> ServiceResult<()> {
        let url = self.config.endpoint(&format!("/api/contact/{id}"));
        info!("Deleting contact {}", id);

        self.execute(Self::bearer(self.client.delete(&url), token))
            .await?;
        Ok(())
    }
}
