//! Luxe Estates command-line client
//!
//! ```bash
//! luxe properties --category villas --status active
//! luxe property the-modern-villa
//! luxe login jack@example.com --password secret
//! luxe book 7 --from /properties/the-modern-villa
//! luxe pay 42 --provider stripe
//! luxe bookings
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use luxe_estates::api::{Credentials, Registration};
use luxe_estates::models::{BookingId, ListingStatus, PropertyId, Provider};
use luxe_estates::session::shared;
use luxe_estates::views::{
    load_listing, render_property_list, BookingDetailPage, BookingsPage, PropertyPage, SuccessPage, ALL_CATEGORIES,
};
use luxe_estates::{BookingFlow, BookingOutcome, CheckoutOutcome, Config, EstateApi, HttpApi, PaymentFlow, SessionStore};

/// Browse and book luxury properties
#[derive(Parser)]
#[command(name = "luxe")]
#[command(version)]
#[command(about = "Browse and book luxury properties")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List properties
    Properties {
        /// Category slug or name ("All" for everything)
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
        /// Only listings with this publication status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Show one property
    Property { slug: String },

    /// List categories
    Categories,

    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long, env = "LUXE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "LUXE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Book a property
    Book {
        property_id: PropertyId,
        /// Where login should return to when not signed in
        #[arg(long)]
        from: Option<String>,
    },

    /// List your bookings
    Bookings,

    /// Show one booking
    Booking { id: BookingId },

    /// Pay for a booking and wait for confirmation
    Pay {
        booking_id: BookingId,
        #[arg(short, long, value_enum)]
        provider: ProviderArg,
    },

    /// Show the payment confirmation for a booking
    Success { booking_id: BookingId },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    /// Card payment
    Stripe,
    /// Mobile money
    Bkash,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Active,
    Inactive,
}

impl From<StatusArg> for ListingStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => ListingStatus::Draft,
            StatusArg::Active => ListingStatus::Active,
            StatusArg::Inactive => ListingStatus::Inactive,
        }
    }
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Stripe => Provider::Stripe,
            ProviderArg::Bkash => Provider::Bkash,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    let store = SessionStore::new(config.session_path.clone());
    let api = HttpApi::new(&config, shared(store.load().await?))?;

    info!("🏠 Luxe Estates client for {}", config.api_url);

    match cli.command {
        Commands::Properties { category, status } => {
            let properties = load_listing(&api, &category, status.map(Into::into))
                .await
                .context("Failed to load properties")?;
            let selected: Vec<_> = properties.iter().collect();
            print!("{}", render_property_list(&selected));
        }

        Commands::Property { slug } => {
            let page = PropertyPage::load(&api, &slug).await;
            print!("{}", page.render(api.base_url(), false, None));
        }

        Commands::Categories => {
            let categories = api.list_categories().await.context("Failed to load categories")?;
            println!("{ALL_CATEGORIES}");
            for category in categories {
                println!("{} ({})", category.name, category.slug);
            }
        }

        Commands::Login { email, password } => {
            let tokens = api
                .login(&Credentials { email, password })
                .await
                .context("Login failed")?;
            api.session().write().login(tokens);
            if api.session().read().user.is_none() {
                match api.me().await {
                    Ok(user) => api.session().write().user = Some(user),
                    Err(e) => warn!("Could not fetch profile: {}", e),
                }
            }
            let session = api.session().read().clone();
            store.save(&session).await?;
            match &session.user {
                Some(user) => println!("Signed in as {}", user.display_name()),
                None => println!("Signed in"),
            }
        }

        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let user = api
                .register(&Registration {
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await
                .context("Registration failed")?;
            println!("Registered {}. Sign in with `luxe login {}`", user.display_name(), user.email);
        }

        Commands::Logout => {
            api.session().write().logout();
            store.clear().await?;
            println!("Signed out");
        }

        Commands::Whoami => {
            if !api.is_authenticated() {
                println!("Not signed in");
            } else {
                let user = api.me().await.context("Failed to load profile")?;
                println!("{} <{}>", user.display_name(), user.email);
            }
        }

        Commands::Book { property_id, from } => {
            let flow = BookingFlow::new(&api, "/properties");
            match flow.create_booking(property_id, from.as_deref()).await {
                BookingOutcome::LoginRequired(route) => println!("Please log in first: {route}"),
                BookingOutcome::Navigate(route) => println!("Booking created. Continue to {route}"),
                BookingOutcome::AlreadyPending(id) => println!("A booking for property {id} is already in progress"),
                BookingOutcome::Failed(message) => println!("{message}"),
            }
        }

        Commands::Bookings => {
            print!("{}", BookingsPage::load(&api).await.render());
        }

        Commands::Booking { id } => {
            print!("{}", BookingDetailPage::load(&api, id).await.render());
        }

        Commands::Pay { booking_id, provider } => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let flow = PaymentFlow::new(&api, config.poll).with_simulation(config.payment_simulation);
            println!("Processing booking {booking_id}...");
            match flow.checkout(booking_id, provider.into(), &cancel).await {
                CheckoutOutcome::LoginRequired(route) => println!("Please log in first: {route}"),
                CheckoutOutcome::Confirmed { next, .. } => {
                    print!("{}", SuccessPage::load(&api, booking_id).await.render(api.base_url()));
                    info!("Continue at {}", next);
                }
                CheckoutOutcome::Failed(message) | CheckoutOutcome::TimedOut(message) => println!("{message}"),
                CheckoutOutcome::Cancelled => println!("Stopped waiting for payment confirmation"),
            }
            cancel.cancel();
        }

        Commands::Success { booking_id } => {
            print!("{}", SuccessPage::load(&api, booking_id).await.render(api.base_url()));
        }
    }

    Ok(())
}
