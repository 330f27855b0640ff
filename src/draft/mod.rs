//! In-memory draft of a listing being created or edited.
//!
//! The draft keeps every field as text; numeric coercion is left to the
//! Listing Service. It is changed only through the typed operations in
//! [`mutator`].

pub mod mutator;
pub mod types;

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{FoodMenuDay, Location, Property, RoomType};

pub use types::{
    DraftCommand, LocationField, MealField, ReferenceKind, RoomField, RoomPolicy, ScalarField,
    ValidationGap, Weekday,
};

/// One entry of the weekly food menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDay {
    pub day: Weekday,
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
}

impl MenuDay {
    pub fn empty(day: Weekday) -> Self {
        Self {
            day,
            breakfast: String::new(),
            lunch: String::new(),
            dinner: String::new(),
        }
    }

    pub fn meal(&self, field: MealField) -> &str {
        match field {
            MealField::Breakfast => &self.breakfast,
            MealField::Lunch => &self.lunch,
            MealField::Dinner => &self.dinner,
        }
    }
}

/// Set of selected reference ids (amenities or services)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceSelection(BTreeSet<String>);

impl ReferenceSelection {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Add the id when absent, remove it when present
    pub fn toggle(&mut self, id: &str) {
        if !self.0.remove(id) {
            self.0.insert(id.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Draft of a listing: scalars, location, rooms, menu, references and
/// media already stored by the Listing Service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftModel {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) gender: String,
    pub(crate) property_type: String,
    pub(crate) status: String,
    pub(crate) location: Location,
    pub(crate) room_types: Vec<RoomType>,
    #[serde(deserialize_with = "calendar_menu")]
    pub(crate) food_menu: Vec<MenuDay>,
    pub(crate) amenities: ReferenceSelection,
    pub(crate) services: ReferenceSelection,
    pub(crate) persisted_images: Vec<String>,
    pub(crate) persisted_videos: Vec<String>,
}

impl DraftModel {
    /// Draft for a new listing with the form's initial selections
    pub fn new_listing() -> Self {
        Self {
            gender: "boys".to_string(),
            property_type: "pg".to_string(),
            status: "available".to_string(),
            room_types: vec![RoomType {
                kind: "single".to_string(),
                ..RoomType::default()
            }],
            ..Self::default()
        }
    }

    /// Hydrate a draft from a listing fetched for editing
    pub fn from_property(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            description: property.description.clone(),
            gender: property.gender.clone(),
            property_type: property.property_type.clone(),
            status: property.status.clone(),
            location: property.location.clone(),
            room_types: property.room_types.clone(),
            food_menu: menu_from_wire(&property.food_menu),
            amenities: property.amenities.iter().map(|a| a.id()).collect(),
            services: property.services.iter().map(|s| s.id()).collect(),
            persisted_images: property.images.clone(),
            persisted_videos: property.videos.clone(),
        }
    }

    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Description => &self.description,
            ScalarField::Gender => &self.gender,
            ScalarField::PropertyType => &self.property_type,
            ScalarField::Status => &self.status,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_field(&self, field: LocationField) -> &str {
        match field {
            LocationField::City => &self.location.city,
            LocationField::Area => &self.location.area,
            LocationField::Address => &self.location.address,
            LocationField::Latitude => &self.location.latitude,
            LocationField::Longitude => &self.location.longitude,
        }
    }

    pub fn room_types(&self) -> &[RoomType] {
        &self.room_types
    }

    pub fn food_menu(&self) -> &[MenuDay] {
        &self.food_menu
    }

    pub fn has_food_menu(&self) -> bool {
        !self.food_menu.is_empty()
    }

    pub fn references(&self, kind: ReferenceKind) -> &ReferenceSelection {
        match kind {
            ReferenceKind::Amenity => &self.amenities,
            ReferenceKind::Service => &self.services,
        }
    }

    pub fn persisted_images(&self) -> &[String] {
        &self.persisted_images
    }

    pub fn persisted_videos(&self) -> &[String] {
        &self.persisted_videos
    }

    /// Gaps a reviewer would flag; submission does not depend on them
    pub fn gaps(&self) -> Vec<ValidationGap> {
        let mut gaps = Vec::new();
        if self.name.trim().is_empty() {
            gaps.push(ValidationGap::MissingName);
        }
        if self.room_types.is_empty() {
            gaps.push(ValidationGap::NoRoomTypes);
        }
        if self.location.city.trim().is_empty() {
            gaps.push(ValidationGap::MissingCity);
        }
        if self.location.address.trim().is_empty() {
            gaps.push(ValidationGap::MissingAddress);
        }
        gaps
    }
}

pub(crate) fn room_field(room: &RoomType, field: RoomField) -> &str {
    match field {
        RoomField::Type => &room.kind,
        RoomField::PricePerMonth => &room.price_per_month,
        RoomField::Capacity => &room.capacity,
        RoomField::AvailableRooms => &room.available_rooms,
    }
}

/// Seven empty days in calendar order
pub(crate) fn blank_week() -> Vec<MenuDay> {
    Weekday::ALL.into_iter().map(MenuDay::empty).collect()
}

/// Place known days at their calendar slot; unknown day names are dropped
/// and missing days are filled with empty meals. No days at all means no menu.
fn normalize_menu(days: Vec<MenuDay>) -> Vec<MenuDay> {
    if days.is_empty() {
        return days;
    }
    let mut week = blank_week();
    for entry in days {
        let slot = entry.day as usize;
        week[slot] = entry;
    }
    week
}

fn menu_from_wire(days: &[FoodMenuDay]) -> Vec<MenuDay> {
    let parsed = days
        .iter()
        .filter_map(|d| {
            Weekday::parse(&d.day).map(|day| MenuDay {
                day,
                breakfast: d.breakfast.clone(),
                lunch: d.lunch.clone(),
                dinner: d.dinner.clone(),
            })
        })
        .collect();
    normalize_menu(parsed)
}

fn calendar_menu<'de, D>(deserializer: D) -> Result<Vec<MenuDay>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<MenuDay>::deserialize(deserializer).map(normalize_menu)
}
