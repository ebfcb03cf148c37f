//! Property listing records.
//!
//! The record is the unit handed to the structured translator: a fixed set
//! of human-readable text fields (title, description, image captions)
//! surrounded by identifiers, measurements, enumerations and relational
//! references that must survive translation byte for byte. The per-type
//! attributes live in a tagged `PropertyDetails` variant, so which fields a
//! record carries is decided by its declared shape, not probed at runtime.

use serde::{Deserialize, Serialize};

/// Whether the listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    Sale,
    Rent,
}

/// Relational reference to a city. The name is a database value shared
/// across listings and is never translated per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRef {
    pub id: i64,
    pub name: String,
}

/// Relational reference to a state/region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRef {
    pub id: i64,
    pub name: String,
}

/// A listing photo with its optional human-readable texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyImage {
    pub id: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Per-type attributes. All of these are non-text (counts, measurements)
/// and pass through translation untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property_type", rename_all = "snake_case")]
pub enum PropertyDetails {
    House {
        bedrooms: u32,
        bathrooms: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        floors: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lot_area: Option<f64>,
    },
    Apartment {
        bedrooms: u32,
        bathrooms: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        floor: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_floors: Option<u32>,
    },
    Commercial {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rooms: Option<u32>,
    },
    Land,
}

/// A property listing record.
///
/// Unknown top-level JSON keys are captured in `extra` and re-emitted
/// unchanged, so clients can round-trip fields this service does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: u64,
    pub area: f64,
    pub listing_type: ListingType,
    pub details: PropertyDetails,
    pub city: CityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<PropertyImage>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
