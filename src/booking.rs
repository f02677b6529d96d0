//! Booking handoff: create a PENDING booking and route the user to payment.

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::api::EstateApi;
use crate::models::PropertyId;
use crate::routes::Route;

pub const BOOKING_FAILED_MESSAGE: &str = "Failed to create booking. Please try again.";

/// Result of asking to book a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// No credential; nothing was sent
    LoginRequired(Route),
    /// Booking created, continue to payment
    Navigate(Route),
    /// Another booking request is still in flight
    AlreadyPending(PropertyId),
    /// Message to show next to the booking control
    Failed(String),
}

/// Booking-to-payment handoff for one view
pub struct BookingFlow<'a, A: EstateApi + ?Sized> {
    api: &'a A,
    current_path: String,
    in_flight: Mutex<Option<PropertyId>>,
}

impl<'a, A: EstateApi + ?Sized> BookingFlow<'a, A> {
    /// `current_path` is where login sends the user back when no explicit
    /// return path is given.
    pub fn new(api: &'a A, current_path: impl Into<String>) -> Self {
        Self {
            api,
            current_path: current_path.into(),
            in_flight: Mutex::new(None),
        }
    }

    /// Property whose booking request is currently pending, if any
    pub fn loading_id(&self) -> Option<PropertyId> {
        *self.in_flight.lock()
    }

    pub async fn create_booking(&self, property_id: PropertyId, redirect_path: Option<&str>) -> BookingOutcome {
        if !self.api.is_authenticated() {
            let back = redirect_path.unwrap_or(self.current_path.as_str());
            info!("Booking property {} requires login", property_id);
            return BookingOutcome::LoginRequired(Route::login_returning_to(back));
        }

        let _guard = match InFlight::acquire(&self.in_flight, property_id) {
            Ok(guard) => guard,
            Err(pending) => {
                warn!("Booking for property {} still pending; ignoring request", pending);
                return BookingOutcome::AlreadyPending(pending);
            }
        };

        match self.api.create_booking(property_id).await {
            Ok(booking) => {
                info!("Created booking {} for property {}", booking.id, property_id);
                BookingOutcome::Navigate(Route::Payment { booking_id: booking.id })
            }
            Err(e) => {
                warn!("Booking property {} failed: {}", property_id, e);
                let message = e.detail().unwrap_or(BOOKING_FAILED_MESSAGE).to_string();
                BookingOutcome::Failed(message)
            }
        }
    }
}

/// Occupies the in-flight slot until dropped
struct InFlight<'m> {
    slot: &'m Mutex<Option<PropertyId>>,
}

impl<'m> InFlight<'m> {
    fn acquire(slot: &'m Mutex<Option<PropertyId>>, property_id: PropertyId) -> Result<Self, PropertyId> {
        let mut current = slot.lock();
        if let Some(pending) = *current {
            return Err(pending);
        }
        *current = Some(property_id);
        Ok(Self { slot })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}
