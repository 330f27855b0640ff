use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope used by every Listing Service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Location of a listing as stored by the Listing Service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default, deserialize_with = "text_or_number")]
    pub city: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub area: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub latitude: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub longitude: String,
}

/// A bookable room category of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    #[serde(rename = "type", default, deserialize_with = "text_or_number")]
    pub kind: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub price_per_month: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub capacity: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub available_rooms: String,
}

/// One day of the weekly food menu
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FoodMenuDay {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
}

/// Amenity or service offered by the Listing Service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Reference as it appears inside a fetched listing: populated or bare id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReferenceRef {
    Populated(ReferenceItem),
    Id(String),
}

impl ReferenceRef {
    pub fn id(&self) -> &str {
        match self {
            ReferenceRef::Populated(item) => &item.id,
            ReferenceRef::Id(id) => id,
        }
    }
}

/// Core listing entity as returned by the Listing Service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub food_menu: Vec<FoodMenuDay>,
    #[serde(default)]
    pub amenities: Vec<ReferenceRef>,
    #[serde(default)]
    pub services: Vec<ReferenceRef>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Signed-in administrator returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Login responses carry the user under `user` rather than `data`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginEnvelope {
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Changes submitted from the profile settings
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    /// Blank keeps the current password
    pub password: String,
}

/// User as echoed back by a profile update; missing fields keep their
/// current value
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile update responses carry the user under `user`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Enquiry left by a visitor about a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub property_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// The service stores numeric fields as numbers but the draft keeps text.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
