//! Payment handoff: initiate with a provider, optionally simulate the
//! provider callback, then wait for the booking to turn PAID.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{EstateApi, WebhookPayload};
use crate::error::ConfigError;
use crate::models::{Booking, BookingId, BookingStatus, PaymentStatus, Provider};
use crate::routes::Route;

pub const PAYMENT_TIMEOUT_MESSAGE: &str =
    "Payment confirmation is taking longer than expected. Please refresh the page to check your booking status.";
pub const PAYMENT_FAILED_MESSAGE: &str = "Failed to process payment. Please try again.";
pub const PAYMENT_CANCELED_MESSAGE: &str = "The payment was declined and the booking has been canceled.";

/// Fixed-budget status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Paid(Booking),
    /// Backend gave up on the booking (provider reported failure)
    Canceled(Booking),
    /// Budget exhausted without reaching PAID
    TimedOut,
    /// Caller went away
    Cancelled,
}

/// Re-fetch the booking until it is PAID, the budget runs out, or `cancel`
/// fires.
///
/// Each attempt waits one interval first, so an unpaid booking times out
/// after `interval * max_attempts`. Fetch errors use up an attempt.
pub async fn wait_for_paid<A: EstateApi + ?Sized>(
    api: &A,
    booking_id: BookingId,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> PollOutcome {
    for attempt in 1..=policy.max_attempts {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Status poll for booking {} cancelled", booking_id);
                return PollOutcome::Cancelled;
            }
            _ = tokio::time::sleep(policy.interval) => {}
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Status poll for booking {} cancelled mid-request", booking_id);
                return PollOutcome::Cancelled;
            }
            fetched = api.get_booking(booking_id) => fetched,
        };

        match fetched {
            Ok(booking) if booking.status == BookingStatus::Paid => {
                info!("Booking {} is PAID after {} check(s)", booking_id, attempt);
                return PollOutcome::Paid(booking);
            }
            Ok(booking) if booking.status == BookingStatus::Canceled => {
                warn!("Booking {} was canceled while awaiting payment", booking_id);
                return PollOutcome::Canceled(booking);
            }
            Ok(booking) => {
                debug!(
                    "Booking {} still {} ({}/{})",
                    booking_id, booking.status, attempt, policy.max_attempts
                );
            }
            Err(e) => {
                warn!(
                    "Status check {}/{} for booking {} failed: {}",
                    attempt, policy.max_attempts, booking_id, e
                );
            }
        }
    }

    warn!("Booking {} not PAID after {} checks", booking_id, policy.max_attempts);
    PollOutcome::TimedOut
}

/// Result of a checkout attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    LoginRequired(Route),
    Confirmed { booking: Booking, next: Route },
    Failed(String),
    TimedOut(String),
    Cancelled,
}

/// Payment view logic for one booking
pub struct PaymentFlow<'a, A: EstateApi + ?Sized> {
    api: &'a A,
    policy: PollPolicy,
    simulation: bool,
}

impl<'a, A: EstateApi + ?Sized> PaymentFlow<'a, A> {
    pub fn new(api: &'a A, policy: PollPolicy) -> Self {
        Self {
            api,
            policy,
            simulation: false,
        }
    }

    /// Let the client fire the provider webhook itself. Only meaningful
    /// against development backends whose providers are mocked.
    pub fn with_simulation(mut self, enabled: bool) -> Self {
        self.simulation = enabled;
        self
    }

    /// Post a successful provider callback for `booking_id`
    pub async fn simulate_webhook(
        &self,
        booking_id: BookingId,
        provider: Provider,
        transaction_id: Option<String>,
    ) -> anyhow::Result<()> {
        if !self.simulation {
            return Err(ConfigError::SimulationDisabled.into());
        }

        let payload = WebhookPayload {
            booking_id,
            status: PaymentStatus::Success,
            transaction_id: transaction_id
                .unwrap_or_else(|| format!("{}_test_txn_{}", provider.webhook_segment(), booking_id)),
        };
        info!("Simulating {} webhook for booking {}", provider, booking_id);
        self.api.send_webhook(provider, &payload).await?;
        Ok(())
    }

    /// Initiate payment, trigger the simulated callback when enabled, and
    /// wait for the backend to confirm.
    pub async fn checkout(
        &self,
        booking_id: BookingId,
        provider: Provider,
        cancel: &CancellationToken,
    ) -> CheckoutOutcome {
        if !self.api.is_authenticated() {
            return CheckoutOutcome::LoginRequired(Route::login_returning_to(
                Route::Payment { booking_id }.path(),
            ));
        }

        let payment = match self.api.initiate_payment(booking_id, provider).await {
            Ok(payment) => payment,
            Err(e) => {
                warn!("Initiating {} payment for booking {} failed: {}", provider, booking_id, e);
                return CheckoutOutcome::Failed(e.detail().unwrap_or(PAYMENT_FAILED_MESSAGE).to_string());
            }
        };
        info!(
            "Payment {} initiated via {} (status {:?})",
            payment.id, provider, payment.status
        );

        if payment.status == PaymentStatus::Failed {
            return CheckoutOutcome::Failed(PAYMENT_FAILED_MESSAGE.to_string());
        }

        if self.simulation && payment.status != PaymentStatus::Success {
            if let Err(e) = self
                .simulate_webhook(booking_id, provider, payment.transaction_id.clone())
                .await
            {
                warn!("Simulated webhook for booking {} failed: {:#}", booking_id, e);
                return CheckoutOutcome::Failed(PAYMENT_FAILED_MESSAGE.to_string());
            }
        }

        match wait_for_paid(self.api, booking_id, self.policy, cancel).await {
            PollOutcome::Paid(booking) => CheckoutOutcome::Confirmed {
                booking,
                next: Route::PaymentSuccess { booking_id },
            },
            PollOutcome::Canceled(_) => CheckoutOutcome::Failed(PAYMENT_CANCELED_MESSAGE.to_string()),
            PollOutcome::TimedOut => CheckoutOutcome::TimedOut(PAYMENT_TIMEOUT_MESSAGE.to_string()),
            PollOutcome::Cancelled => CheckoutOutcome::Cancelled,
        }
    }
}
