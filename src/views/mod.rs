//! Plain-text renderings of the site's pages.
//!
//! Each page loads its own data and turns failures into an inline state
//! instead of an error, so one broken request never takes down the process.

pub mod booking;
pub mod property;

use rust_decimal::Decimal;

pub use booking::{BookingDetailPage, BookingsPage, SuccessPage};
pub use property::{
    filter_by_category, load_listing, render_property_list, selected_category, PropertyPage, ALL_CATEGORIES,
};

/// Turn an image reference from the API into an absolute URL.
pub fn resolve_media_url(path: Option<&str>, base_url: &str) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

/// Dollar amount with thousands separators and at most two decimals.
pub(crate) fn price_tag(amount: &Decimal) -> String {
    let text = amount.abs().round_dp(2).normalize().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}
