//! Flattens a draft and its staged media into the bracket-indexed
//! multipart fields the Listing Service parses back into nested objects.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::draft::{
    room_field, DraftModel, LocationField, MealField, ReferenceKind, RoomField, ScalarField,
};
use crate::media::{MediaKind, MediaStagingArea, StagedFile};

/// How location subfields are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStyle {
    /// `location.city`
    Dot,
    /// `location[city]`
    Bracket,
}

impl LocationStyle {
    pub fn key(self, field: LocationField) -> String {
        match self {
            LocationStyle::Dot => format!("location.{}", field.key()),
            LocationStyle::Bracket => format!("location[{}]", field.key()),
        }
    }
}

impl std::str::FromStr for LocationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" => Ok(LocationStyle::Dot),
            "bracket" => Ok(LocationStyle::Bracket),
            other => Err(format!("unknown location style '{other}' (expected dot or bracket)")),
        }
    }
}

/// Endpoint a payload is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Create,
    Update(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub location_style: LocationStyle,
    pub include_food_menu: bool,
}

impl EncodeOptions {
    pub fn new(location_style: LocationStyle) -> Self {
        Self {
            location_style,
            include_food_menu: false,
        }
    }

    pub fn with_food_menu(mut self, include: bool) -> Self {
        self.include_food_menu = include;
        self
    }
}

/// Value of a single multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Text(String),
    File(StagedFile),
}

impl WireValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WireValue::Text(text) => Some(text),
            WireValue::File(_) => None,
        }
    }
}

/// Ordered key/value pairs of a multipart body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WirePayload {
    fields: Vec<(String, WireValue)>,
}

impl WirePayload {
    fn text(&mut self, key: impl Into<String>, value: &str) {
        self.fields
            .push((key.into(), WireValue::Text(value.to_string())));
    }

    fn file(&mut self, key: &str, file: &StagedFile) {
        self.fields
            .push((key.to_string(), WireValue::File(file.clone())));
    }

    pub fn fields(&self) -> &[(String, WireValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First text value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .find_map(|(_, v)| v.as_text())
    }

    /// Every text value stored under `key`, in payload order
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .filter_map(|(_, v)| v.as_text())
    }

    /// Files stored under `key`, in payload order
    pub fn files<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a StagedFile> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .filter_map(|(_, v)| match v {
                WireValue::File(file) => Some(file),
                WireValue::Text(_) => None,
            })
    }

    /// Build the multipart body sent by reqwest
    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = match value {
                WireValue::Text(text) => form.text(key, text),
                WireValue::File(file) => {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)?;
                    form.part(key, part)
                }
            };
        }
        Ok(form)
    }
}

/// Snapshot a draft and its staged media into a wire payload.
///
/// Media already stored by the Listing Service is not re-sent; only staged
/// files are included. Numeric fields stay text.
pub fn encode(
    draft: &DraftModel,
    staging: &MediaStagingArea,
    options: EncodeOptions,
) -> WirePayload {
    let mut payload = WirePayload::default();

    for field in ScalarField::ALL {
        payload.text(field.key(), draft.scalar(field));
    }

    for field in LocationField::ALL {
        payload.text(
            options.location_style.key(field),
            draft.location_field(field),
        );
    }

    for (i, room) in draft.room_types().iter().enumerate() {
        for field in RoomField::ALL {
            payload.text(
                format!("roomTypes[{i}][{}]", field.key()),
                room_field(room, field),
            );
        }
    }

    if options.include_food_menu {
        for (i, day) in draft.food_menu().iter().enumerate() {
            payload.text(format!("foodMenu[{i}][day]"), day.day.as_str());
            for meal in MealField::ALL {
                payload.text(format!("foodMenu[{i}][{}]", meal.key()), day.meal(meal));
            }
        }
    }

    for kind in [ReferenceKind::Amenity, ReferenceKind::Service] {
        for id in draft.references(kind).iter() {
            payload.text(kind.key(), id);
        }
    }

    for kind in [MediaKind::Image, MediaKind::Video] {
        for file in staging.files(kind) {
            payload.file(kind.key(), file);
        }
    }

    payload
}
