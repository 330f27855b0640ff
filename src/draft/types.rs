use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level text fields of a listing draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Name,
    Description,
    Gender,
    PropertyType,
    Status,
}

impl ScalarField {
    pub const ALL: [ScalarField; 5] = [
        ScalarField::Name,
        ScalarField::Description,
        ScalarField::Gender,
        ScalarField::PropertyType,
        ScalarField::Status,
    ];

    /// Field name on the wire
    pub fn key(self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Description => "description",
            ScalarField::Gender => "gender",
            ScalarField::PropertyType => "propertyType",
            ScalarField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    City,
    Area,
    Address,
    Latitude,
    Longitude,
}

impl LocationField {
    pub const ALL: [LocationField; 5] = [
        LocationField::City,
        LocationField::Area,
        LocationField::Address,
        LocationField::Latitude,
        LocationField::Longitude,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LocationField::City => "city",
            LocationField::Area => "area",
            LocationField::Address => "address",
            LocationField::Latitude => "latitude",
            LocationField::Longitude => "longitude",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    Type,
    PricePerMonth,
    Capacity,
    AvailableRooms,
}

impl RoomField {
    pub const ALL: [RoomField; 4] = [
        RoomField::Type,
        RoomField::PricePerMonth,
        RoomField::Capacity,
        RoomField::AvailableRooms,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RoomField::Type => "type",
            RoomField::PricePerMonth => "pricePerMonth",
            RoomField::Capacity => "capacity",
            RoomField::AvailableRooms => "availableRooms",
        }
    }
}

/// Editable meals of a food menu day; the day itself is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealField {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealField {
    pub const ALL: [MealField; 3] = [MealField::Breakfast, MealField::Lunch, MealField::Dinner];

    pub fn key(self) -> &'static str {
        match self {
            MealField::Breakfast => "breakfast",
            MealField::Lunch => "lunch",
            MealField::Dinner => "dinner",
        }
    }
}

/// Which reference-data set an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Amenity,
    Service,
}

impl ReferenceKind {
    pub fn key(self) -> &'static str {
        match self {
            ReferenceKind::Amenity => "amenities",
            ReferenceKind::Service => "services",
        }
    }
}

/// Canonical weekday names in calendar order (Monday first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Case-insensitive lookup by full name
    pub fn parse(name: &str) -> Option<Weekday> {
        let name = name.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(name))
    }
}

/// Whether removing a room type may leave the list empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomPolicy {
    /// The form always keeps at least one room type
    #[default]
    AtLeastOne,
    Unrestricted,
}

/// Advisory gaps in a draft; the Listing Service remains the validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationGap {
    #[error("property name is empty")]
    MissingName,
    #[error("no room types defined")]
    NoRoomTypes,
    #[error("location city is empty")]
    MissingCity,
    #[error("location address is empty")]
    MissingAddress,
}

/// A single mutation of a draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftCommand {
    SetScalar(ScalarField, String),
    SetLocation(LocationField, String),
    SetRoomField {
        index: usize,
        field: RoomField,
        value: String,
    },
    AddRoomType,
    RemoveRoomType {
        index: usize,
        policy: RoomPolicy,
    },
    EnableFoodMenu,
    DisableFoodMenu,
    SetMealField {
        index: usize,
        field: MealField,
        value: String,
    },
    ToggleReference(ReferenceKind, String),
}
