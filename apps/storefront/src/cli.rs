//! # Command Line
//!
//! `roda` drives the same commands the storefront pages call. Every
//! subcommand prints its result as JSON on stdout; failures print a
//! [`Notice`] on stderr.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  roda [--config FILE] [-v] <command>                                    │
//! │                                                                         │
//! │  Account     sign-in, sign-up, sign-out, whoami, refresh,              │
//! │              forgot-password, reset-password                           │
//! │  Customer    establishments, menu, checkout                            │
//! │  Admin       products, product-new, categories, orders, order-status,  │
//! │              manual-order, profile ...                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart lives only as long as one `checkout` run: items are given with
//! repeated `--item PRODUCT_ID[:QTY]` and checked against the live menu.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use roda_client::{ClientConfig, SignUpRequest};
use roda_core::{
    Address, AddressForm, ApprovalStatus, CheckoutForm, DeliveryStatus, DeliveryType,
    EstablishmentUpdate, Money, NewProduct, OrderFilter, PageRequest, PaymentMethod,
    PaymentStatus, ProductFilter, DEFAULT_PAGE_SIZE,
};

use crate::commands::{auth, cart, catalog, checkout, establishment, orders};
use crate::error::{ErrorCode, Notice, NoticeLevel};
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "roda", version, about = "Roda Já storefront and admin console")]
pub struct Cli {
    /// Path to storefront.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "RODA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RODA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new establishment account
    SignUp {
        /// Establishment name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "RODA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    SignOut,
    /// Show the current session
    Whoami,
    /// Exchange the refresh token for new tokens
    Refresh,
    /// Ask for a password reset e-mail
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the token from the reset e-mail
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "RODA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List open establishments
    Establishments,
    /// Show an establishment's menu
    Menu {
        establishment_id: String,
        #[command(flatten)]
        filter: ProductFilterArgs,
    },
    /// Place an order as a customer
    Checkout {
        establishment_id: String,
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<ItemArg>,
        #[command(flatten)]
        form: CheckoutArgs,
    },
    /// List the establishment's products
    Products {
        #[command(flatten)]
        filter: ProductFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a product
    ProductNew {
        #[arg(long)]
        name: String,
        /// Price in reais, e.g. 24.90 or 24,90
        #[arg(long)]
        price: Money,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        /// Create the product as unavailable
        #[arg(long)]
        unavailable: bool,
    },
    /// List product categories
    Categories,
    /// List orders
    Orders {
        #[arg(long)]
        approval: Option<ApprovalStatus>,
        #[arg(long)]
        delivery: Option<DeliveryStatus>,
        #[arg(long)]
        payment: Option<PaymentStatus>,
        /// Customer name or e-mail, substring match
        #[arg(long)]
        customer: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Change one status of an order
    #[command(group(
        ArgGroup::new("change")
            .required(true)
            .args(["approval", "delivery", "payment"])
    ))]
    OrderStatus {
        order_id: String,
        #[arg(long)]
        approval: Option<ApprovalStatus>,
        #[arg(long)]
        delivery: Option<DeliveryStatus>,
        #[arg(long)]
        payment: Option<PaymentStatus>,
    },
    /// Key in an order for a phone or counter customer
    ManualOrder {
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<ItemArg>,
        #[command(flatten)]
        form: CheckoutArgs,
    },
    /// The signed-in admin's establishment
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        logo_url: Option<String>,
        #[arg(long)]
        open: Option<bool>,
    },
    Addresses,
    AddAddress {
        #[command(flatten)]
        address: AddressArgs,
    },
    UpdateAddress {
        id: String,
        #[command(flatten)]
        address: AddressArgs,
    },
    DeleteAddress {
        id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProductFilterArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub only_available: bool,
}

impl From<ProductFilterArgs> for ProductFilter {
    fn from(args: ProductFilterArgs) -> Self {
        ProductFilter {
            category: args.category,
            search: args.search,
            only_available: args.only_available,
        }
    }
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub per_page: usize,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.page, args.per_page)
    }
}

/// Customer, payment and delivery inputs shared by `checkout` and
/// `manual-order`. Missing values are left empty for form validation to
/// report.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Customer name
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// pix, credit_card, debit_card or cash
    #[arg(long)]
    pub payment: Option<PaymentMethod>,
    /// Pick up at the counter instead of delivery
    #[arg(long)]
    pub pickup: bool,
    #[arg(long)]
    pub notes: Option<String>,
    #[command(flatten)]
    pub address: AddressArgs,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        CheckoutForm {
            name: args.name,
            email: args.email,
            phone: args.phone,
            delivery_type: if args.pickup {
                DeliveryType::Pickup
            } else {
                DeliveryType::Delivery
            },
            payment_method: args.payment,
            address: AddressForm {
                street: args.address.street,
                number: args.address.number,
                complement: args.address.complement.unwrap_or_default(),
                neighborhood: args.address.neighborhood,
                city: args.address.city,
                state: args.address.state,
                zip_code: args.address.zip_code,
            },
            notes: args.notes,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AddressArgs {
    #[arg(long, default_value = "")]
    pub street: String,
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long)]
    pub complement: Option<String>,
    #[arg(long, default_value = "")]
    pub neighborhood: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub zip_code: String,
}

impl From<AddressArgs> for Address {
    fn from(args: AddressArgs) -> Self {
        Address {
            id: None,
            street: args.street,
            number: args.number,
            complement: args.complement,
            neighborhood: args.neighborhood,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
        }
    }
}

/// `PRODUCT_ID[:QTY]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemArg {
    pub product_id: String,
    pub quantity: u32,
}

pub fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let (id, quantity) = match raw.rsplit_once(':') {
        Some((id, qty)) => {
            let quantity = qty
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid quantity in '{raw}'"))?;
            (id, quantity)
        }
        None => (raw, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in '{raw}'"));
    }
    if quantity == 0 {
        return Err(format!("quantity must be at least 1 in '{raw}'"));
    }
    Ok(ItemArg {
        product_id: id.to_string(),
        quantity,
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Loads config, rehydrates the session and runs one command.
pub async fn run(cli: Cli) -> Result<Value, Notice> {
    let config = ClientConfig::load(cli.config)?;
    let state = AppState::new(config)?;
    execute(&state, cli.command).await
}

pub async fn execute(state: &AppState, command: Command) -> Result<Value, Notice> {
    let client = &state.client;

    match command {
        Command::SignIn { email, password } => json(auth::sign_in(client, &email, &password).await?),
        Command::SignUp {
            name,
            email,
            phone,
            password,
        } => {
            let request = SignUpRequest {
                name,
                email,
                phone,
                password,
            };
            json(auth::sign_up(client, &request).await?)
        }
        Command::SignOut => json(auth::sign_out(client).await?),
        Command::Whoami => json(auth::whoami(client).await),
        Command::Refresh => json(auth::refresh_session(client).await?),
        Command::ForgotPassword { email } => json(auth::forgot_password(client, &email).await?),
        Command::ResetPassword { token, password } => {
            json(auth::reset_password(client, &token, &password).await?)
        }

        Command::Establishments => json(catalog::list_establishments(client).await?),
        Command::Menu {
            establishment_id,
            filter,
        } => json(catalog::get_menu(client, &establishment_id, &filter.into()).await?),
        Command::Checkout {
            establishment_id,
            items,
            form,
        } => {
            let menu = catalog::get_menu(client, &establishment_id, &ProductFilter::default()).await?;
            for item in &items {
                cart::add_from_menu(&state.cart, &menu, &item.product_id, item.quantity)?;
            }
            let totals = cart::get_cart(&state.cart).totals;
            info!(
                establishment_id = %establishment_id,
                total = %totals.formatted_total,
                "Submitting checkout"
            );
            json(checkout::submit_checkout(client, &state.cart, &establishment_id, &form.into()).await?)
        }

        Command::Products { filter, page } => {
            json(catalog::list_products(client, &filter.into(), page.into()).await?)
        }
        Command::ProductNew {
            name,
            price,
            description,
            image_url,
            category_id,
            unavailable,
        } => {
            let product = NewProduct {
                name,
                description,
                price,
                image_url,
                category_id,
                is_available: !unavailable,
            };
            json(catalog::create_product(client, &product).await?)
        }
        Command::Categories => json(catalog::list_categories(client).await?),

        Command::Orders {
            approval,
            delivery,
            payment,
            customer,
            page,
        } => {
            let filter = OrderFilter {
                approval_status: approval,
                delivery_status: delivery,
                payment_status: payment,
                customer,
            };
            json(orders::list_orders(client, &filter, page.into()).await?)
        }
        Command::OrderStatus {
            order_id,
            approval,
            delivery,
            payment,
        } => {
            let change = match (approval, delivery, payment) {
                (Some(status), _, _) => orders::StatusChange::Approval(status),
                (_, Some(status), _) => orders::StatusChange::Delivery(status),
                (_, _, Some(status)) => orders::StatusChange::Payment(status),
                (None, None, None) => {
                    return Err(Notice::validation(
                        "Pick one of --approval, --delivery or --payment",
                    ))
                }
            };
            json(orders::update_order_status(client, &order_id, change).await?)
        }
        Command::ManualOrder { items, form } => {
            let products = client.products().list().await?;
            for item in &items {
                orders::manual_order_add(&state.manual_order, &products, &item.product_id, item.quantity)?;
            }
            orders::manual_order_set_form(&state.manual_order, form.into());
            json(orders::submit_manual_order(client, &state.manual_order).await?)
        }

        Command::Profile { action } => match action {
            ProfileCommand::Show => json(establishment::get_profile(client).await?),
            ProfileCommand::Update {
                name,
                description,
                phone,
                email,
                logo_url,
                open,
            } => {
                let update = EstablishmentUpdate {
                    name,
                    description,
                    phone,
                    email,
                    logo_url,
                    is_open: open,
                };
                json(establishment::update_profile(client, &update).await?)
            }
            ProfileCommand::Addresses => json(establishment::list_addresses(client).await?),
            ProfileCommand::AddAddress { address } => {
                json(establishment::add_address(client, &address.into()).await?)
            }
            ProfileCommand::UpdateAddress { id, address } => {
                json(establishment::update_address(client, &id, &address.into()).await?)
            }
            ProfileCommand::DeleteAddress { id } => {
                json(establishment::delete_address(client, &id).await?)
            }
        },
    }
}

fn json<T: Serialize>(value: T) -> Result<Value, Notice> {
    serde_json::to_value(value).map_err(|e| {
        Notice::new(NoticeLevel::Error, ErrorCode::Internal, format!("Could not render output: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(
            parse_item("p-1:3").unwrap(),
            ItemArg {
                product_id: "p-1".into(),
                quantity: 3
            }
        );
        assert_eq!(parse_item("p-2").unwrap().quantity, 1);
        assert!(parse_item("p-1:0").is_err());
        assert!(parse_item(":2").is_err());
        assert!(parse_item("p-1:many").is_err());
    }

    #[test]
    fn test_checkout_args_build_form() {
        let cli = Cli::try_parse_from([
            "roda",
            "checkout",
            "e-1",
            "--item",
            "p-1:2",
            "--name",
            "Ana",
            "--payment",
            "credit-card",
            "--pickup",
        ])
        .unwrap();

        let Command::Checkout { items, form, .. } = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(items.len(), 1);

        let form = CheckoutForm::from(form);
        assert_eq!(form.delivery_type, DeliveryType::Pickup);
        assert_eq!(form.payment_method, Some(PaymentMethod::CreditCard));
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_order_status_requires_exactly_one_axis() {
        assert!(Cli::try_parse_from(["roda", "order-status", "o-1"]).is_err());
        assert!(Cli::try_parse_from([
            "roda",
            "order-status",
            "o-1",
            "--approval",
            "approved",
            "--payment",
            "paid"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["roda", "order-status", "o-1", "--delivery", "ready"]).is_ok());
    }

    #[test]
    fn test_product_price_accepts_comma() {
        let cli = Cli::try_parse_from(["roda", "product-new", "--name", "Pastel", "--price", "7,50"])
            .unwrap();
        let Command::ProductNew { price, .. } = cli.command else {
            panic!("expected product-new");
        };
        assert_eq!(price, Money::from_cents(750));
    }
}
