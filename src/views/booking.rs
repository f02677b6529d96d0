use std::fmt::Write as _;
use tracing::warn;

use crate::api::EstateApi;
use crate::models::{Booking, BookingId, BookingStatus};
use crate::routes::Route;
use crate::views::{price_tag, resolve_media_url};

pub const BOOKINGS_FAILED: &str = "Failed to load bookings.";
pub const BOOKING_NOT_FOUND: &str = "Booking not found.";

fn property_line(booking: &Booking) -> String {
    match booking.property.summary() {
        Some(summary) => format!("{} ({})", summary.title, summary.location),
        None => format!("Property #{}", booking.property.id()),
    }
}

fn next_step(booking: &Booking) -> Option<String> {
    match booking.status {
        BookingStatus::Pending => Some(format!("Complete payment: {}", Route::Payment { booking_id: booking.id })),
        _ => None,
    }
}

/// The signed-in user's bookings, newest first as the API orders them
#[derive(Debug, Clone, PartialEq)]
pub enum BookingsPage {
    LoginRequired(Route),
    Loaded(Vec<Booking>),
    Error(String),
}

impl BookingsPage {
    pub async fn load<A: EstateApi + ?Sized>(api: &A) -> Self {
        if !api.is_authenticated() {
            return BookingsPage::LoginRequired(Route::Login { redirect: None });
        }
        match api.list_bookings().await {
            Ok(bookings) => BookingsPage::Loaded(bookings),
            Err(e) => {
                warn!("Failed to fetch bookings: {}", e);
                BookingsPage::Error(BOOKINGS_FAILED.to_string())
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            BookingsPage::LoginRequired(route) => format!("Please log in to view your bookings ({route}).\n"),
            BookingsPage::Error(message) => format!("{message}\nRun the command again to retry.\n"),
            BookingsPage::Loaded(bookings) if bookings.is_empty() => {
                "You have no bookings yet. Browse listings at /properties\n".to_string()
            }
            BookingsPage::Loaded(bookings) => {
                let mut out = String::new();
                for booking in bookings {
                    let _ = writeln!(
                        out,
                        "#{} {} [{}] {} on {}",
                        booking.id,
                        property_line(booking),
                        booking.status,
                        price_tag(&booking.total_amount),
                        booking.created_at.format("%Y-%m-%d")
                    );
                    if let Some(step) = next_step(booking) {
                        let _ = writeln!(out, "    {step}");
                    }
                }
                out
            }
        }
    }
}

/// A single booking
#[derive(Debug, Clone, PartialEq)]
pub enum BookingDetailPage {
    LoginRequired(Route),
    Loaded(Booking),
    NotFound,
    Error(String),
}

impl BookingDetailPage {
    pub async fn load<A: EstateApi + ?Sized>(api: &A, id: BookingId) -> Self {
        if !api.is_authenticated() {
            return BookingDetailPage::LoginRequired(Route::login_returning_to(Route::Booking { id }.path()));
        }
        match api.get_booking(id).await {
            Ok(booking) => BookingDetailPage::Loaded(booking),
            Err(e) if e.is_not_found() => BookingDetailPage::NotFound,
            Err(e) => {
                warn!("Failed to fetch booking {}: {}", id, e);
                BookingDetailPage::Error("Failed to load booking details.".to_string())
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            BookingDetailPage::LoginRequired(route) => format!("Please log in to view this booking ({route}).\n"),
            BookingDetailPage::NotFound => format!("{BOOKING_NOT_FOUND}\n"),
            BookingDetailPage::Error(message) => format!("{message}\nRun the command again to retry.\n"),
            BookingDetailPage::Loaded(booking) => {
                let mut out = String::new();
                let _ = writeln!(out, "Booking #{}  [{}]", booking.id, booking.status);
                let _ = writeln!(out, "{}", property_line(booking));
                let _ = writeln!(out, "Booked on {}", booking.created_at.format("%Y-%m-%d %H:%M UTC"));
                let _ = writeln!(out, "Total: {}", price_tag(&booking.total_amount));
                if let Some(step) = next_step(booking) {
                    let _ = writeln!(out, "{step}");
                }
                out
            }
        }
    }
}

/// Confirmation shown once a booking is paid
#[derive(Debug, Clone, PartialEq)]
pub enum SuccessPage {
    LoginRequired(Route),
    Loaded(Booking),
    NotFound,
}

impl SuccessPage {
    pub async fn load<A: EstateApi + ?Sized>(api: &A, booking_id: BookingId) -> Self {
        if !api.is_authenticated() {
            return SuccessPage::LoginRequired(Route::Login { redirect: None });
        }
        match api.get_booking(booking_id).await {
            Ok(booking) => SuccessPage::Loaded(booking),
            Err(e) => {
                warn!("Failed to fetch booking {}: {}", booking_id, e);
                SuccessPage::NotFound
            }
        }
    }

    pub fn render(&self, base_url: &str) -> String {
        match self {
            SuccessPage::LoginRequired(route) => format!("Please log in first ({route}).\n"),
            SuccessPage::NotFound => format!("{BOOKING_NOT_FOUND}\nReturn home: /\n"),
            SuccessPage::Loaded(booking) => {
                let mut out = String::new();
                out.push_str("Payment Successful!\nYour booking has been confirmed.\n\n");
                out.push_str("Booking Summary\n");
                let _ = writeln!(out, "{}", property_line(booking));
                if let Some(image) = booking
                    .property
                    .summary()
                    .and_then(|s| resolve_media_url(s.image.as_deref(), base_url))
                {
                    let _ = writeln!(out, "Image: {image}");
                }
                let _ = writeln!(out, "Date: {}", booking.created_at.format("%Y-%m-%d"));
                let _ = writeln!(out, "Amount Paid: {}", price_tag(&booking.total_amount));
                out.push_str("\nView my bookings: /bookings\n");
                out
            }
        }
    }
}
