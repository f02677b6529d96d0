use std::fmt::Write as _;
use tracing::warn;

use crate::api::{EstateApi, PropertyFilter};
use crate::error::ApiError;
use crate::models::{Category, ListingStatus, Property};
use crate::views::{price_tag, resolve_media_url};

pub const ALL_CATEGORIES: &str = "All";
pub const NO_AMENITIES: &str = "No amenities listed.";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const LOAD_FAILED: &str = "Failed to load property details.";
pub const NOT_FOUND: &str = "Property not found.";

const SIMILAR_LIMIT: usize = 3;

/// Keep properties in the selected category; "All" keeps everything.
///
/// The selection matches a category's slug or name, case-insensitively.
pub fn filter_by_category<'p>(
    properties: &'p [Property],
    categories: &[Category],
    selection: &str,
) -> Vec<&'p Property> {
    if selection.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return properties.iter().collect();
    }

    let Some(category) = selected_category(categories, selection) else {
        return Vec::new();
    };

    properties.iter().filter(|p| p.category == category.id).collect()
}

/// Category whose slug or name matches `selection`, ignoring case
pub fn selected_category<'c>(categories: &'c [Category], selection: &str) -> Option<&'c Category> {
    categories
        .iter()
        .find(|c| c.slug.eq_ignore_ascii_case(selection) || c.name.eq_ignore_ascii_case(selection))
}

/// Fetch the listing for a category selection and optional status.
///
/// A chosen category is sent to the server as `category=<id>` and applied
/// again to the answer. An unknown category yields an empty listing without
/// querying properties.
pub async fn load_listing<A: EstateApi + ?Sized>(
    api: &A,
    selection: &str,
    status: Option<ListingStatus>,
) -> Result<Vec<Property>, ApiError> {
    if selection.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return api.list_properties(&PropertyFilter { category: None, status }).await;
    }

    let categories = api.list_categories().await?;
    let Some(category) = selected_category(&categories, selection) else {
        warn!("Unknown category {:?}", selection);
        return Ok(Vec::new());
    };

    let filter = PropertyFilter {
        category: Some(category.id),
        status,
    };
    let properties = api.list_properties(&filter).await?;
    Ok(properties.into_iter().filter(|p| p.category == category.id).collect())
}

pub fn area_label(property: &Property) -> String {
    match property.area {
        Some(area) if area > 0 => format!("{area} sqft"),
        _ => "N/A".to_string(),
    }
}

pub fn availability_label(property: &Property) -> &'static str {
    if property.is_available {
        "Available"
    } else {
        "Booked"
    }
}

/// One card per property, as on the listing page
pub fn render_property_list(properties: &[&Property]) -> String {
    if properties.is_empty() {
        return "No properties found.\n".to_string();
    }

    let mut out = String::new();
    for (i, property) in properties.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, property.title, price_tag(&property.price));
        let _ = writeln!(out, "   {}", property.location);
        let _ = writeln!(
            out,
            "   {} bd · {} ba · {} · {}",
            property.bedrooms,
            property.bathrooms,
            area_label(property),
            availability_label(property)
        );
        let _ = writeln!(out, "   /properties/{}", property.slug);
        out.push('\n');
    }
    out
}

/// State of the property detail page after loading
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyPage {
    Loaded {
        property: Property,
        similar: Vec<Property>,
    },
    NotFound,
    Error(String),
}

impl PropertyPage {
    /// Fetch the property and, best-effort, similar listings from its
    /// category tree.
    pub async fn load<A: EstateApi + ?Sized>(api: &A, slug: &str) -> Self {
        let property = match api.get_property(slug).await {
            Ok(property) => property,
            Err(e) if e.is_not_found() => return PropertyPage::NotFound,
            Err(e) => {
                warn!("Failed to fetch property {}: {}", slug, e);
                return PropertyPage::Error(LOAD_FAILED.to_string());
            }
        };

        let similar = match api.recommended_properties(property.category).await {
            Ok(list) => list
                .into_iter()
                .filter(|p| p.id != property.id)
                .take(SIMILAR_LIMIT)
                .collect(),
            Err(e) => {
                warn!("Failed to fetch similar properties for {}: {}", slug, e);
                Vec::new()
            }
        };

        PropertyPage::Loaded { property, similar }
    }

    /// `booking_error` and `booking_in_progress` reflect the booking control
    /// state of the surrounding flow.
    pub fn render(&self, base_url: &str, booking_in_progress: bool, booking_error: Option<&str>) -> String {
        match self {
            PropertyPage::NotFound => format!("{NOT_FOUND}\nBrowse all listings at /properties\n"),
            PropertyPage::Error(message) => format!("{message}\nRun the command again to retry.\n"),
            PropertyPage::Loaded { property, similar } => {
                render_detail(property, similar, base_url, booking_in_progress, booking_error)
            }
        }
    }
}

fn render_detail(
    property: &Property,
    similar: &[Property],
    base_url: &str,
    booking_in_progress: bool,
    booking_error: Option<&str>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", property.title);
    let _ = writeln!(out, "{}  [{}]", property.location, availability_label(property));
    if let Some(image) = resolve_media_url(property.image_ref(), base_url) {
        let _ = writeln!(out, "Image: {image}");
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Bedrooms: {}   Bathrooms: {}   Area: {}",
        property.bedrooms,
        property.bathrooms,
        area_label(property)
    );
    out.push('\n');

    out.push_str("Overview\n");
    let description = property.description.trim();
    let _ = writeln!(out, "{}", if description.is_empty() { NO_DESCRIPTION } else { description });
    out.push('\n');

    out.push_str("Amenities\n");
    if property.amenities.is_empty() {
        let _ = writeln!(out, "{NO_AMENITIES}");
    } else {
        for amenity in &property.amenities {
            let _ = writeln!(out, "  • {amenity}");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "Listing Price: {}", price_tag(&property.price));
    if !property.is_available {
        out.push_str("Currently Unavailable\n");
    } else if booking_in_progress {
        out.push_str("Processing...\n");
    } else {
        let _ = writeln!(out, "Book Now: luxe book {}", property.id);
    }
    if let Some(error) = booking_error {
        let _ = writeln!(out, "{error}");
    }

    if !similar.is_empty() {
        out.push_str("\nSimilar Properties\n");
        for other in similar {
            let _ = writeln!(out, "  {} ({}) /properties/{}", other.title, price_tag(&other.price), other.slug);
        }
    }

    out
}
