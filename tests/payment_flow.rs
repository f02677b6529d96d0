mod common;

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use common::FakeApi;
use luxe_estates::models::{BookingStatus, PaymentStatus, Provider};
use luxe_estates::payment::{wait_for_paid, PAYMENT_CANCELED_MESSAGE, PAYMENT_TIMEOUT_MESSAGE};
use luxe_estates::{CheckoutOutcome, PaymentFlow, PollOutcome, PollPolicy, Route};

#[tokio::test(start_paused = true)]
async fn poll_times_out_after_five_spaced_checks() {
    let api = FakeApi::default();
    let cancel = CancellationToken::new();
    let started = Instant::now();

    let outcome = wait_for_paid(&api, 42, PollPolicy::default(), &cancel).await;

    assert_eq!(outcome, PollOutcome::TimedOut);
    assert_eq!(api.count("GET /api/bookings/42/"), 5);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_millis(5100));
}

#[tokio::test(start_paused = true)]
async fn poll_stops_as_soon_as_booking_is_paid() {
    let api = FakeApi::with_statuses([BookingStatus::Pending, BookingStatus::Paid]);
    let cancel = CancellationToken::new();
    let started = Instant::now();

    let outcome = wait_for_paid(&api, 42, PollPolicy::default(), &cancel).await;

    match outcome {
        PollOutcome::Paid(booking) => assert_eq!(booking.status, BookingStatus::Paid),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(api.count("GET /api/bookings/42/"), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_millis(2100));
}

#[tokio::test(start_paused = true)]
async fn fetch_errors_use_up_attempts() {
    let api = FakeApi::with_statuses([BookingStatus::Paid]);
    *api.fail_fetches.lock() = 2;
    let cancel = CancellationToken::new();

    let outcome = wait_for_paid(&api, 42, PollPolicy::default(), &cancel).await;

    assert!(matches!(outcome, PollOutcome::Paid(_)));
    assert_eq!(api.count("GET /api/bookings/42/"), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_poll_issues_no_more_requests() {
    let api = FakeApi::default();
    let cancel = CancellationToken::new();
    *api.cancel_on_fetch.lock() = Some((2, cancel.clone()));

    let outcome = wait_for_paid(&api, 42, PollPolicy::default(), &cancel).await;

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(api.count("GET /api/bookings/42/"), 2);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_poll_does_nothing() {
    let api = FakeApi::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = wait_for_paid(&api, 42, PollPolicy::default(), &cancel).await;

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn simulated_checkout_confirms_and_routes_to_success() {
    let api = FakeApi::with_statuses([BookingStatus::Paid]);
    let flow = PaymentFlow::new(&api, PollPolicy::default()).with_simulation(true);

    let outcome = flow.checkout(42, Provider::Bkash, &CancellationToken::new()).await;

    match outcome {
        CheckoutOutcome::Confirmed { booking, next } => {
            assert_eq!(booking.id, 42);
            assert_eq!(next, Route::PaymentSuccess { booking_id: 42 });
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let webhooks = api.webhooks.lock().clone();
    assert_eq!(webhooks.len(), 1);
    assert_eq!(webhooks[0].0, Provider::Bkash);
    assert_eq!(webhooks[0].1.status, PaymentStatus::Success);
    assert_eq!(webhooks[0].1.transaction_id, "bkash_test_txn_42");
    assert_eq!(
        api.calls()[..2],
        [
            "POST /api/payments/initiate/ booking_id=42".to_string(),
            "POST /api/payments/webhook/bkash/".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn checkout_without_simulation_never_fires_webhook() {
    let api = FakeApi::default();
    api.sign_in("token");
    let flow = PaymentFlow::new(&api, PollPolicy::default());

    let outcome = flow.checkout(42, Provider::Stripe, &CancellationToken::new()).await;

    assert_eq!(outcome, CheckoutOutcome::TimedOut(PAYMENT_TIMEOUT_MESSAGE.to_string()));
    assert!(api.webhooks.lock().is_empty());
    assert!(flow.simulate_webhook(42, Provider::Stripe, None).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn declined_payment_reports_cancellation() {
    let api = FakeApi::with_statuses([BookingStatus::Canceled]);
    let flow = PaymentFlow::new(&api, PollPolicy::default());

    let outcome = flow.checkout(42, Provider::Stripe, &CancellationToken::new()).await;

    assert_eq!(outcome, CheckoutOutcome::Failed(PAYMENT_CANCELED_MESSAGE.to_string()));
}

#[tokio::test]
async fn checkout_requires_login() {
    let api = FakeApi::default();
    let flow = PaymentFlow::new(&api, PollPolicy::default()).with_simulation(true);

    let outcome = flow.checkout(42, Provider::Stripe, &CancellationToken::new()).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::LoginRequired(Route::login_returning_to("/payment?booking_id=42"))
    );
    assert!(api.calls().is_empty());
}
