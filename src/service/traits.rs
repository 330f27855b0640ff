use async_trait::async_trait;

use super::types::ServiceResult;
use crate::encoder::WirePayload;
use crate::models::{Contact, LoginUser, ProfileUpdate, Property, ReferenceItem, UserProfile};

/// Operations the console needs from the Listing Service.
/// Implemented over HTTP by `HttpListingService`; tests use in-memory fakes.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Exchange credentials for a signed-in user with a bearer token
    async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginUser>;

    async fn list_amenities(&self) -> ServiceResult<Vec<ReferenceItem>>;

    async fn list_services(&self) -> ServiceResult<Vec<ReferenceItem>>;

    async fn list_properties(&self) -> ServiceResult<Vec<Property>>;

    async fn get_property(&self, id: &str) -> ServiceResult<Property>;

    /// Create a listing; returns the new listing's id
    async fn create_property(&self, payload: WirePayload, token: &str) -> ServiceResult<String>;

    /// Update a listing; returns the listing's id
    async fn update_property(
        &self,
        id: &str,
        payload: WirePayload,
        token: &str,
    ) -> ServiceResult<String>;

    async fn delete_property(&self, id: &str, token: &str) -> ServiceResult<()>;

    /// Change the signed-in administrator's name, email or password.
    /// Returns the user as echoed by the service, if it sent one back.
    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        token: &str,
    ) -> ServiceResult<Option<UserProfile>>;

    async fn list_contacts(&self, token: &str) -> ServiceResult<Vec<Contact>>;

    async fn delete_contact(&self, id: &str, token: &str) -> ServiceResult<()>;
}
