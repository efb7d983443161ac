use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, Attachment};
use crate::error::DomainError;

/// Kind of real-estate unit being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Office,
    Retail,
    Warehouse,
    Industrial,
    Condo,
    Apartment,
    Plot,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        Self::Office,
        Self::Retail,
        Self::Warehouse,
        Self::Industrial,
        Self::Condo,
        Self::Apartment,
        Self::Plot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Retail => "retail",
            Self::Warehouse => "warehouse",
            Self::Industrial => "industrial",
            Self::Condo => "condo",
            Self::Apartment => "apartment",
            Self::Plot => "plot",
        }
    }

    /// Human-readable label shown on listing cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Office => "Office Space",
            Self::Retail => "Retail Space",
            Self::Warehouse => "Warehouse",
            Self::Industrial => "Industrial Property",
            Self::Condo => "Condominium",
            Self::Apartment => "Apartment",
            Self::Plot => "Plot for Sale",
        }
    }

    /// Plots have no bedrooms or bathrooms.
    pub fn has_rooms(&self) -> bool {
        !matches!(self, Self::Plot)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| DomainError::validation(format!("unknown property type `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sale" => Ok(Self::Sale),
            "rent" => Ok(Self::Rent),
            other => Err(DomainError::validation(format!("unknown listing type `{other}`"))),
        }
    }
}

/// Pricing, tagged by `listingType` in the stored record.
///
/// A sale carries a price and nothing else; a rental carries a monthly rent
/// and an optional service charge. The two can never coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "listingType", rename_all = "lowercase")]
pub enum Listing {
    Sale {
        price: u64,
    },
    #[serde(rename_all = "camelCase")]
    Rent {
        rent: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        service_charge: Option<u64>,
    },
}

impl Listing {
    pub fn listing_type(&self) -> ListingType {
        match self {
            Self::Sale { .. } => ListingType::Sale,
            Self::Rent { .. } => ListingType::Rent,
        }
    }

    /// Sale price, or monthly rent for rentals. Used for sorting and filtering.
    pub fn headline_amount(&self) -> u64 {
        match *self {
            Self::Sale { price } => price,
            Self::Rent { rent, .. } => rent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// The seller a listing belongs to. Matched by email, not by pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRef {
    pub name: String,
    pub email: String,
}

/// A listed real-estate unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(flatten)]
    pub listing: Listing,
    /// Floor area in square feet
    pub area: f64,
    pub address: String,
    pub city: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baths: Option<u32>,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub images: Vec<Attachment>,
    #[serde(default)]
    pub documents: Vec<Attachment>,
    pub seller: SellerRef,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    pub fn is_listed_by(&self, email: &str) -> bool {
        self.seller.email == email
    }
}

/// Seller input for a new listing.
///
/// Every field is optional here so a half-filled form is representable;
/// the property service decides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDraft {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub price: Option<u64>,
    pub rent: Option<u64>,
    pub service_charge: Option<u64>,
    pub area: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub location: Option<GeoPoint>,
    pub images: Vec<Attachment>,
    pub documents: Vec<Attachment>,
}

/// Seller edit of an existing listing. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub price: Option<u64>,
    pub rent: Option<u64>,
    pub service_charge: Option<u64>,
    pub area: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub features: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub location: Option<GeoPoint>,
    /// Indices into the current image list to drop
    pub removed_images: Vec<usize>,
    /// Appended after the surviving images, in order
    pub new_images: Vec<Attachment>,
    pub new_documents: Vec<Attachment>,
}
