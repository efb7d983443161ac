//! # Property Lifecycle Manager
//!
//! Seller submission and edits, admin approval, and the read-side filters
//! used by the buyer, seller and admin dashboards.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    ApprovalStatus, Attachment, Clock, Collection, DomainError, Listing, ListingType, Property,
    PropertyDraft, PropertyPatch, PropertyType, Result, SellerRef, Session,
};
use tracing::info;

use crate::ids;
use crate::store::Store;

/// Buyer-side search over approved listings. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub kind: Option<PropertyType>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    pub price: Option<PriceRange>,
}

/// Inclusive bounds on the sale price or monthly rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    /// The four bands offered by the listing search form.
    pub const BANDS: [PriceRange; 4] = [
        PriceRange { min: 0, max: Some(10_000_000) },
        PriceRange { min: 10_000_000, max: Some(20_000_000) },
        PriceRange { min: 20_000_000, max: Some(30_000_000) },
        PriceRange { min: 30_000_000, max: None },
    ];

    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && self.max.map_or(true, |max| amount <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    AreaAsc,
}

/// Orders a seller's listings; prices compare rent for rentals.
pub fn sort_listings(properties: &mut [Property], order: ListingSort) {
    match order {
        ListingSort::Newest => properties.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ListingSort::PriceAsc => properties.sort_by_key(|p| p.listing.headline_amount()),
        ListingSort::PriceDesc => {
            properties.sort_by_key(|p| std::cmp::Reverse(p.listing.headline_amount()))
        }
        ListingSort::AreaAsc => properties.sort_by(|a, b| a.area.total_cmp(&b.area)),
    }
}

#[derive(Clone)]
pub struct PropertyService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl PropertyService {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validates a seller's draft and stores it as a pending listing.
    pub fn submit(&self, session: &Session, draft: PropertyDraft) -> Result<Property> {
        let mut properties = self.load();
        let now = self.clock.now();
        let id = ids::stamped_id("prop", now, |candidate| {
            properties.iter().any(|p| p.id == candidate)
        });

        let property = build_property(id, session, draft, now)?;
        properties.push(property.clone());
        self.store.save(Collection::Properties, &properties)?;

        info!(property_id = %property.id, seller = %property.seller.email, "property submitted for approval");
        Ok(property)
    }

    /// Applies a seller's edit. Approved listings go back to review.
    pub fn edit(&self, id: &str, patch: PropertyPatch) -> Result<Property> {
        let mut properties = self.load();
        let index = position(&properties, id)?;
        let updated = apply_patch(&properties[index], patch, self.clock.now())?;
        let previous_status = properties[index].status;
        properties[index] = updated.clone();
        self.store.save(Collection::Properties, &properties)?;

        info!(
            property_id = id,
            from = %previous_status,
            to = %updated.status,
            "property edited"
        );
        Ok(updated)
    }

    /// Admin approval. No notification is sent to the seller.
    pub fn approve(&self, id: &str) -> Result<Property> {
        let now = self.clock.now();
        let approved = self.update_with(id, |p| {
            p.status = ApprovalStatus::Approved;
            p.approved_at = Some(now);
        })?;
        info!(property_id = id, "property approved");
        Ok(approved)
    }

    /// Admin rejection. No notification is sent to the seller.
    pub fn reject(&self, id: &str) -> Result<Property> {
        let rejected = self.update_with(id, |p| p.status = ApprovalStatus::Rejected)?;
        info!(property_id = id, "property rejected");
        Ok(rejected)
    }

    pub fn set_featured(&self, id: &str, featured: bool) -> Result<Property> {
        let property = self.update_with(id, |p| p.featured = featured)?;
        info!(property_id = id, featured, "featured flag changed");
        Ok(property)
    }

    /// Removes a listing. Returns `false` if it was already gone.
    ///
    /// Requests, saved entries and messages pointing at it are left in
    /// place and must tolerate the dangling id.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut properties = self.load();
        let before = properties.len();
        properties.retain(|p| p.id != id);
        if properties.len() == before {
            return Ok(false);
        }
        self.store.save(Collection::Properties, &properties)?;
        info!(property_id = id, "property deleted");
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Result<Property> {
        self.find(id)
            .ok_or_else(|| DomainError::not_found("Property", id))
    }

    pub fn find(&self, id: &str) -> Option<Property> {
        self.load().into_iter().find(|p| p.id == id)
    }

    pub fn list_all(&self) -> Vec<Property> {
        self.load()
    }

    pub fn list_approved(&self) -> Vec<Property> {
        self.filtered(|p| p.status == ApprovalStatus::Approved)
    }

    pub fn list_pending(&self) -> Vec<Property> {
        self.filtered(|p| p.status == ApprovalStatus::Pending)
    }

    pub fn list_by_seller(&self, email: &str) -> Vec<Property> {
        self.filtered(|p| p.is_listed_by(email))
    }

    /// Approved listings matching every set field of `filter`.
    pub fn search(&self, filter: &PropertyFilter) -> Vec<Property> {
        let city = filter.city.as_deref().map(str::to_lowercase);
        self.filtered(|p| {
            p.is_approved()
                && filter.kind.map_or(true, |kind| p.kind == kind)
                && city
                    .as_deref()
                    .map_or(true, |c| p.city.to_lowercase().contains(c))
                && filter
                    .price
                    .map_or(true, |range| range.contains(p.listing.headline_amount()))
        })
    }

    fn load(&self) -> Vec<Property> {
        self.store.load(Collection::Properties)
    }

    fn filtered(&self, keep: impl Fn(&Property) -> bool) -> Vec<Property> {
        self.load().into_iter().filter(|p| keep(p)).collect()
    }

    fn update_with(&self, id: &str, change: impl FnOnce(&mut Property)) -> Result<Property> {
        let mut properties = self.load();
        let index = position(&properties, id)?;
        change(&mut properties[index]);
        let updated = properties[index].clone();
        self.store.save(Collection::Properties, &properties)?;
        Ok(updated)
    }
}

fn position(properties: &[Property], id: &str) -> Result<usize> {
    properties
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| DomainError::not_found("Property", id))
}

fn build_property(
    id: String,
    session: &Session,
    draft: PropertyDraft,
    now: DateTime<Utc>,
) -> Result<Property> {
    let title = required_text("title", draft.title)?;
    let kind = draft
        .kind
        .ok_or_else(|| DomainError::validation("type is required"))?;
    let listing_type = draft
        .listing_type
        .ok_or_else(|| DomainError::validation("listing type is required"))?;
    let listing = listing_for(listing_type, draft.price, draft.rent, draft.service_charge)?;
    let area = required_area(draft.area)?;
    let address = required_text("address", draft.address)?;
    let city = required_text("city", draft.city)?;
    let description = required_text("description", draft.description)?;
    require_images(&draft.images)?;

    let (beds, baths) = if kind.has_rooms() {
        (draft.beds, draft.baths)
    } else {
        (None, None)
    };

    Ok(Property {
        id,
        title,
        kind,
        listing,
        area,
        address,
        city,
        description,
        beds,
        baths,
        features: to_set(draft.features),
        amenities: to_set(draft.amenities),
        location: draft.location,
        images: draft.images,
        documents: draft.documents,
        seller: SellerRef {
            name: session.name.clone(),
            email: session.email.clone(),
        },
        status: ApprovalStatus::Pending,
        featured: false,
        created_at: now,
        updated_at: None,
        approved_at: None,
    })
}

/// Merges a seller edit into `existing`.
///
/// Images: survivors of `removed_images` keep their order, then new images
/// are appended. Only an approved listing is sent back to pending (and
/// stamped); pending and rejected listings keep their status.
fn apply_patch(existing: &Property, patch: PropertyPatch, now: DateTime<Utc>) -> Result<Property> {
    let mut next = existing.clone();
    next.listing = merge_listing(&existing.listing, &patch)?;

    if let Some(title) = patch.title {
        next.title = required_text("title", Some(title))?;
    }
    if let Some(kind) = patch.kind {
        next.kind = kind;
    }
    if patch.area.is_some() {
        next.area = required_area(patch.area)?;
    }
    if let Some(address) = patch.address {
        next.address = required_text("address", Some(address))?;
    }
    if let Some(city) = patch.city {
        next.city = required_text("city", Some(city))?;
    }
    if let Some(description) = patch.description {
        next.description = required_text("description", Some(description))?;
    }

    if patch.beds.is_some() {
        next.beds = patch.beds;
    }
    if patch.baths.is_some() {
        next.baths = patch.baths;
    }
    if !next.kind.has_rooms() {
        next.beds = None;
        next.baths = None;
    }

    if let Some(features) = patch.features {
        next.features = to_set(features);
    }
    if let Some(amenities) = patch.amenities {
        next.amenities = to_set(amenities);
    }
    if patch.location.is_some() {
        next.location = patch.location;
    }

    require_images(&patch.new_images)?;
    let removed: HashSet<usize> = patch.removed_images.into_iter().collect();
    next.images = existing
        .images
        .iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .map(|(_, image)| image.clone())
        .chain(patch.new_images)
        .collect();
    next.documents.extend(patch.new_documents);

    if existing.status == ApprovalStatus::Approved {
        next.status = ApprovalStatus::Pending;
        next.updated_at = Some(now);
    }

    Ok(next)
}

/// Recomputes pricing after an edit. Amounts not supplied in the patch are
/// carried over only when the listing type is unchanged.
fn merge_listing(existing: &Listing, patch: &PropertyPatch) -> Result<Listing> {
    let listing_type = patch.listing_type.unwrap_or(existing.listing_type());
    match (listing_type, *existing) {
        (ListingType::Sale, Listing::Sale { price }) => {
            listing_for(ListingType::Sale, patch.price.or(Some(price)), None, None)
        }
        (ListingType::Rent, Listing::Rent { rent, service_charge }) => listing_for(
            ListingType::Rent,
            None,
            patch.rent.or(Some(rent)),
            patch.service_charge.or(service_charge),
        ),
        (listing_type, _) => {
            listing_for(listing_type, patch.price, patch.rent, patch.service_charge)
        }
    }
}

fn listing_for(
    listing_type: ListingType,
    price: Option<u64>,
    rent: Option<u64>,
    service_charge: Option<u64>,
) -> Result<Listing> {
    match listing_type {
        ListingType::Sale => Ok(Listing::Sale {
            price: required_amount("price", price)?,
        }),
        ListingType::Rent => Ok(Listing::Rent {
            rent: required_amount("rent", rent)?,
            service_charge,
        }),
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn required_amount(field: &str, value: Option<u64>) -> Result<u64> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(_) => Err(DomainError::validation(format!("{field} must be positive"))),
        None => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn required_area(value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(DomainError::validation("area must be positive")),
        None => Err(DomainError::validation("area is required")),
    }
}

fn require_images(images: &[Attachment]) -> Result<()> {
    match images.iter().find(|image| !image.is_image()) {
        Some(bad) => Err(DomainError::validation(format!(
            "`{}` is not an image ({})",
            bad.name, bad.mime
        ))),
        None => Ok(()),
    }
}

fn to_set(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
