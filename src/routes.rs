use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use crate::models::BookingId;

/// Views a flow can send the user to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login { redirect: Option<String> },
    Property { slug: String },
    Bookings,
    Booking { id: BookingId },
    Payment { booking_id: BookingId },
    PaymentSuccess { booking_id: BookingId },
}

impl Route {
    pub fn login_returning_to(path: impl Into<String>) -> Self {
        Route::Login {
            redirect: Some(path.into()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { redirect: None } => "/login".to_string(),
            Route::Login { redirect: Some(back) } => with_query("/login", "redirect", back),
            Route::Property { slug } => format!("/properties/{slug}"),
            Route::Bookings => "/bookings".to_string(),
            Route::Booking { id } => format!("/bookings/{id}"),
            Route::Payment { booking_id } => format!("/payment?booking_id={booking_id}"),
            Route::PaymentSuccess { booking_id } => format!("/payment/success?booking_id={booking_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Characters `encodeURIComponent` leaves as they are
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Append one percent-encoded query parameter to a local path
fn with_query(path: &str, key: &str, value: &str) -> String {
    format!(
        "{path}?{}={}",
        utf8_percent_encode(key, COMPONENT),
        utf8_percent_encode(value, COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_encodes_return_path() {
        let route = Route::login_returning_to("/properties/the-modern-villa");
        assert_eq!(route.path(), "/login?redirect=%2Fproperties%2Fthe-modern-villa");
    }

    #[test]
    fn redirect_is_encoded_like_a_uri_component() {
        let route = Route::login_returning_to("/properties?q=sea view&max=5");
        assert_eq!(route.path(), "/login?redirect=%2Fproperties%3Fq%3Dsea%20view%26max%3D5");

        let route = Route::login_returning_to("/a-b_c.d~e!f*g'h(i)");
        assert_eq!(route.path(), "/login?redirect=%2Fa-b_c.d~e!f*g'h(i)");

        let route = Route::login_returning_to("/properties/château");
        assert_eq!(route.path(), "/login?redirect=%2Fproperties%2Fch%C3%A2teau");
    }

    #[test]
    fn payment_routes_carry_booking_id() {
        assert_eq!(Route::Payment { booking_id: 42 }.path(), "/payment?booking_id=42");
        assert_eq!(
            Route::PaymentSuccess { booking_id: 42 }.to_string(),
            "/payment/success?booking_id=42"
        );
        assert_eq!(Route::Login { redirect: None }.path(), "/login");
    }
}
