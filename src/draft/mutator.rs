//! Typed update operations over [`DraftModel`].
//!
//! Index arguments must be in range; an out-of-range index is a caller bug
//! and panics.

use tracing::debug;

use super::{
    blank_week, DraftCommand, DraftModel, LocationField, MealField, ReferenceKind, RoomField,
    RoomPolicy, ScalarField,
};
use crate::models::RoomType;

impl DraftModel {
    /// Replace one top-level text field
    pub fn set_scalar(&mut self, field: ScalarField, value: impl Into<String>) {
        let slot = match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Description => &mut self.description,
            ScalarField::Gender => &mut self.gender,
            ScalarField::PropertyType => &mut self.property_type,
            ScalarField::Status => &mut self.status,
        };
        *slot = value.into();
    }

    /// Replace one location field, leaving the others untouched
    pub fn set_location_field(&mut self, field: LocationField, value: impl Into<String>) {
        let location = &mut self.location;
        let slot = match field {
            LocationField::City => &mut location.city,
            LocationField::Area => &mut location.area,
            LocationField::Address => &mut location.address,
            LocationField::Latitude => &mut location.latitude,
            LocationField::Longitude => &mut location.longitude,
        };
        *slot = value.into();
    }

    /// # Panics
    /// If `index >= room_types().len()`.
    pub fn set_room_field(&mut self, index: usize, field: RoomField, value: impl Into<String>) {
        let len = self.room_types.len();
        assert!(index < len, "room type index {index} out of range (len {len})");

        let room = &mut self.room_types[index];
        let slot = match field {
            RoomField::Type => &mut room.kind,
            RoomField::PricePerMonth => &mut room.price_per_month,
            RoomField::Capacity => &mut room.capacity,
            RoomField::AvailableRooms => &mut room.available_rooms,
        };
        *slot = value.into();
    }

    /// Append an empty room type at the end
    pub fn add_room_type(&mut self) {
        self.room_types.push(RoomType::default());
    }

    /// Remove a room type; later entries shift down by one.
    ///
    /// Returns `false` without changing anything when `policy` forbids
    /// removing the last remaining entry.
    ///
    /// # Panics
    /// If `index >= room_types().len()`.
    pub fn remove_room_type(&mut self, index: usize, policy: RoomPolicy) -> bool {
        let len = self.room_types.len();
        assert!(index < len, "room type index {index} out of range (len {len})");

        if policy == RoomPolicy::AtLeastOne && len == 1 {
            debug!("Keeping last room type");
            return false;
        }
        self.room_types.remove(index);
        true
    }

    /// Start a weekly menu with seven empty days; no-op if already active
    pub fn enable_food_menu(&mut self) {
        if self.food_menu.is_empty() {
            self.food_menu = blank_week();
        }
    }

    pub fn disable_food_menu(&mut self) {
        self.food_menu.clear();
    }

    /// # Panics
    /// If the menu is not active or `index >= 7`.
    pub fn set_food_menu_field(&mut self, index: usize, field: MealField, value: impl Into<String>) {
        assert!(
            index < self.food_menu.len(),
            "food menu index {index} out of range (menu active: {})",
            self.has_food_menu()
        );

        let day = &mut self.food_menu[index];
        let slot = match field {
            MealField::Breakfast => &mut day.breakfast,
            MealField::Lunch => &mut day.lunch,
            MealField::Dinner => &mut day.dinner,
        };
        *slot = value.into();
    }

    /// Add the id to the selection if absent, remove it if present
    pub fn toggle_reference(&mut self, kind: ReferenceKind, id: &str) {
        let selection = match kind {
            ReferenceKind::Amenity => &mut self.amenities,
            ReferenceKind::Service => &mut self.services,
        };
        selection.toggle(id);
    }

    /// Apply a command. Returns whether the draft changed.
    pub fn apply(&mut self, command: DraftCommand) -> bool {
        let before = self.clone();
        match command {
            DraftCommand::SetScalar(field, value) => self.set_scalar(field, value),
            DraftCommand::SetLocation(field, value) => self.set_location_field(field, value),
            DraftCommand::SetRoomField { index, field, value } => {
                self.set_room_field(index, field, value)
            }
            DraftCommand::AddRoomType => self.add_room_type(),
            DraftCommand::RemoveRoomType { index, policy } => {
                self.remove_room_type(index, policy);
            }
            DraftCommand::EnableFoodMenu => self.enable_food_menu(),
            DraftCommand::DisableFoodMenu => self.disable_food_menu(),
            DraftCommand::SetMealField { index, field, value } => {
                self.set_food_menu_field(index, field, value)
            }
            DraftCommand::ToggleReference(kind, id) => self.toggle_reference(kind, &id),
        }
        *self != before
    }

    /// Consuming form of [`DraftModel::apply`]
    pub fn with(mut self, command: DraftCommand) -> Self {
        self.apply(command);
        self
    }
}
