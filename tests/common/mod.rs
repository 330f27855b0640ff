// Shared fakes for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nest_admin::config::ClientConfig;
use nest_admin::encoder::WirePayload;
use nest_admin::form::FormContext;
use nest_admin::media::LocalPreviewProvider;
use nest_admin::models::{
    Contact, LoginUser, ProfileUpdate, Property, ReferenceItem, UserProfile,
};
use nest_admin::service::{ListingService, ServiceError, ServiceResult};
use nest_admin::session::MemorySessionStore;
use tokio::sync::Notify;

/// Scripted answer for a mutating call
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(String),
    Expired,
    Rejected(u16, Option<String>),
    Invalid(Option<String>),
}

impl Reply {
    fn into_result(self) -> ServiceResult<String> {
        match self {
            Reply::Ok(id) => Ok(id),
            Reply::Expired => Err(ServiceError::SessionExpired),
            Reply::Rejected(status, message) => Err(ServiceError::ServerRejected { status, message }),
            Reply::Invalid(message) => Err(ServiceError::ValidationGap { message }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sent {
    pub method: &'static str,
    pub id: Option<String>,
    pub token: String,
    pub payload: Option<WirePayload>,
}

#[derive(Default)]
pub struct FakeListingService {
    pub amenities: Vec<ReferenceItem>,
    pub services: Vec<ReferenceItem>,
    pub property: Option<Property>,
    pub fail_amenities: bool,
    pub contacts: Vec<Contact>,
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<Sent>>,
    mutating_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl FakeListingService {
    pub fn new() -> Self {
        Self {
            amenities: vec![item("a1", "WiFi"), item("a2", "AC")],
            services: vec![item("s1", "Laundry")],
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = Some(property);
        self
    }

    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn failing_amenities(mut self) -> Self {
        self.fail_amenities = true;
        self
    }

    /// Hold every mutating call until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn mutating_calls(&self) -> usize {
        self.mutating_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    async fn mutate(&self, sent: Sent) -> ServiceResult<String> {
        self.mutating_calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(sent);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Ok("generated".into()));
        reply.into_result()
    }
}

#[async_trait]
impl ListingService for FakeListingService {
    async fn login(&self, email: &str, _password: &str) -> ServiceResult<LoginUser> {
        Ok(LoginUser {
            id: "u1".into(),
            name: "Admin".into(),
            email: email.into(),
            token: "fresh-token".into(),
        })
    }

    async fn list_amenities(&self) -> ServiceResult<Vec<ReferenceItem>> {
        if self.fail_amenities {
            return Err(ServiceError::ServerRejected {
                status: 500,
                message: None,
            });
        }
        Ok(self.amenities.clone())
    }

    async fn list_services(&self) -> ServiceResult<Vec<ReferenceItem>> {
        Ok(self.services.clone())
    }

    async fn list_properties(&self) -> ServiceResult<Vec<Property>> {
        Ok(self.property.iter().cloned().collect())
    }

    async fn get_property(&self, id: &str) -> ServiceResult<Property> {
        self.property
            .clone()
            .filter(|p| p.id == id)
            .ok_or_else(|| ServiceError::ServerRejected {
                status: 404,
                message: Some("Property not found".into()),
            })
    }

    async fn create_property(&self, payload: WirePayload, token: &str) -> ServiceResult<String> {
        self.mutate(Sent {
            method: "POST",
            id: None,
            token: token.into(),
            payload: Some(payload),
        })
        .await
    }

    async fn update_property(
        &self,
        id: &str,
        payload: WirePayload,
        token: &str,
    ) -> ServiceResult<String> {
        self.mutate(Sent {
            method: "PUT",
            id: Some(id.into()),
            token: token.into(),
            payload: Some(payload),
        })
        .await
    }

    async fn delete_property(&self, id: &str, token: &str) -> ServiceResult<()> {
        self.mutate(Sent {
            method: "DELETE",
            id: Some(id.into()),
            token: token.into(),
            payload: None,
        })
        .await
        .map(|_| ())
    }

    /// Echoes the submitted name and email back on success
    async fn update_profile(
        &self,
        update: &ProfileUpdate,
        token: &str,
    ) -> ServiceResult<Option<UserProfile>> {
        self.mutate(Sent {
            method: "PUT_PROFILE",
            id: None,
            token: token.into(),
            payload: None,
        })
        .await
        .map(|_| {
            Some(UserProfile {
                name: Some(update.name.clone()),
                email: Some(update.email.clone()),
            })
        })
    }

    /// A token of "expired" is rejected the way the service would
    async fn list_contacts(&self, token: &str) -> ServiceResult<Vec<Contact>> {
        if token == "expired" {
            return Err(ServiceError::SessionExpired);
        }
        Ok(self.contacts.clone())
    }

    async fn delete_contact(&self, id: &str, token: &str) -> ServiceResult<()> {
        self.mutate(Sent {
            method: "DELETE_CONTACT",
            id: Some(id.into()),
            token: token.into(),
            payload: None,
        })
        .await
        .map(|_| ())
    }
}

pub fn item(id: &str, name: &str) -> ReferenceItem {
    ReferenceItem {
        id: id.into(),
        name: name.into(),
        image_url: None,
    }
}

pub fn stored_property() -> Property {
    serde_json::from_value(serde_json::json!({
        "_id": "p42",
        "name": "Green Nest",
        "description": "Near campus",
        "gender": "co-ed",
        "propertyType": "flat",
        "status": "available",
        "location": { "city": "Pune", "area": "Kothrud", "address": "7 Hill Rd", "latitude": 18.5, "longitude": 73.8 },
        "roomTypes": [
            { "type": "single", "pricePerMonth": 5000, "capacity": 1, "availableRooms": 3 },
            { "type": "double", "pricePerMonth": 9000, "capacity": 2, "availableRooms": 1 }
        ],
        "amenities": [{ "_id": "a1", "name": "WiFi" }],
        "services": [],
        "images": ["/uploads/front.jpg"],
        "videos": ["/uploads/tour.mp4"]
    }))
    .unwrap()
}

pub fn contact(id: &str, name: &str) -> Contact {
    Contact {
        id: id.into(),
        name: name.into(),
        phone: "9820000000".into(),
        message: "Is a room free next month?".into(),
        property_id: "p42".into(),
        created_at: None,
    }
}

pub struct Harness {
    pub service: Arc<FakeListingService>,
    pub session: Arc<MemorySessionStore>,
    pub previews: Arc<LocalPreviewProvider>,
    pub ctx: FormContext,
}

pub fn harness(service: FakeListingService) -> Harness {
    let service = Arc::new(service);
    let session = Arc::new(MemorySessionStore::with_token("tok-123"));
    let previews = Arc::new(LocalPreviewProvider::new());
    let ctx = FormContext::new(
        &ClientConfig::new("http://listing.test"),
        service.clone(),
        session.clone(),
        previews.clone(),
    );
    Harness {
        service,
        session,
        previews,
        ctx,
    }
}
