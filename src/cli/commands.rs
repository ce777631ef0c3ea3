//! Subcommands and their handlers.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::{Timestamp, tz::TimeZone};
use rusty_money::iso::Currency;
use storefront::prelude::*;
use tracing::info;

use super::config::Config;

/// Storefront commands
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List products, optionally filtered
    Products {
        /// Case-insensitive search in names and descriptions
        #[arg(long)]
        search: Option<String>,

        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },

    /// List product categories
    Categories,

    /// Show a single product
    Product {
        /// Product identifier
        id: String,
    },

    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartCommand>,
    },

    /// Place an order for the cart using the default address
    Checkout(CheckoutArgs),

    /// List placed orders
    Orders {
        /// Only show orders with this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },

    /// Show an order and its timeline
    Order {
        /// Order identifier
        id: String,
    },

    /// Move an order to its next status
    Advance {
        /// Order identifier
        id: String,
    },

    /// Cancel a pending or confirmed order
    Cancel {
        /// Order identifier
        id: String,

        /// Why the order is cancelled
        #[arg(long)]
        reason: Option<String>,
    },

    /// Manage delivery addresses
    Address {
        #[command(subcommand)]
        action: AddressCommand,
    },

    /// Show or change theme colours
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },
}

/// Cart actions
#[derive(Debug, Default, Subcommand)]
pub(crate) enum CartCommand {
    /// Show the cart contents and totals
    #[default]
    Show,

    /// Add one unit of a product
    Add {
        /// Product identifier
        id: String,
    },

    /// Remove a product from the cart
    Remove {
        /// Product identifier
        id: String,
    },

    /// Add one more unit of a product already in the cart
    Increase {
        /// Product identifier
        id: String,
    },

    /// Take one unit of a product off the cart
    Decrease {
        /// Product identifier
        id: String,
    },

    /// Empty the cart
    Clear,
}

/// Checkout options
#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// How the order is paid
    #[arg(long, value_enum, default_value_t = Payment::Online)]
    payment: Payment,

    /// Notes for the courier
    #[arg(long)]
    notes: Option<String>,
}

/// Payment choices offered at checkout
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Payment {
    /// Pay online
    Online,

    /// Pay the courier
    CashOnDelivery,
}

impl From<Payment> for PaymentMethod {
    fn from(payment: Payment) -> Self {
        match payment {
            Payment::Online => Self::Online,
            Payment::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}

/// Address actions
#[derive(Debug, Subcommand)]
pub(crate) enum AddressCommand {
    /// List saved addresses
    List,

    /// Save a new address
    Add(AddressArgs),

    /// Make an address the default
    Default {
        /// Address identifier
        id: String,
    },

    /// Delete an address
    Remove {
        /// Address identifier
        id: String,
    },
}

#[derive(Debug, Args)]
pub(crate) struct AddressArgs {
    /// Short label such as "Home"
    #[arg(long)]
    title: String,

    #[arg(long)]
    province: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    postal_code: String,

    /// Street address
    #[arg(long)]
    address: String,

    #[arg(long)]
    receiver_name: String,

    #[arg(long)]
    receiver_phone: String,
}

impl From<AddressArgs> for NewAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            title: args.title,
            province_id: slug(&args.province),
            province_name: args.province,
            city_id: slug(&args.city),
            city_name: args.city,
            postal_code: args.postal_code,
            address: args.address,
            receiver_name: args.receiver_name,
            receiver_phone: args.receiver_phone,
        }
    }
}

/// Theme actions
#[derive(Debug, Default, Subcommand)]
pub(crate) enum ThemeCommand {
    /// Show the current colours
    #[default]
    Show,

    /// Change one or more colours
    Set(ThemeArgs),

    /// Restore the default colours
    Reset,
}

#[derive(Debug, Args)]
pub(crate) struct ThemeArgs {
    #[arg(long, value_parser = parse_colour)]
    primary: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    primary_dark: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    secondary: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    accent: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    background: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    surface: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    error: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    success: Option<String>,

    #[arg(long, value_parser = parse_colour)]
    warning: Option<String>,
}

impl From<ThemeArgs> for ThemePatch {
    fn from(args: ThemeArgs) -> Self {
        Self {
            primary: args.primary,
            primary_dark: args.primary_dark,
            secondary: args.secondary,
            accent: args.accent,
            background: args.background,
            surface: args.surface,
            error: args.error,
            success: args.success,
            warning: args.warning,
        }
    }
}

fn parse_colour(value: &str) -> Result<String, String> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| format!("`{value}` is not a #rrggbb colour"))?;

    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(format!("`{value}` is not a #rrggbb colour"))
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Run the configured command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, an identifier is unknown,
/// an order rule is broken or output cannot be written.
pub(crate) fn run(config: Config, out: &mut impl Write) -> Result<()> {
    let catalog = match &config.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::bundled().context("bundled catalog is invalid")?,
    };

    let storage = FileStorage::new(config.data_dir);

    match config.command {
        Command::Products { search, category } => list_products(out, &catalog, search, category),
        Command::Categories => {
            for category in catalog.categories() {
                writeln!(out, "{category}")?;
            }

            Ok(())
        }
        Command::Product { id } => show_product(out, &catalog, &id),
        Command::Cart { action } => cart(out, &catalog, storage, action.unwrap_or_default()),
        Command::Checkout(args) => checkout(out, catalog.currency(), storage, args),
        Command::Orders { status } => list_orders(out, catalog.currency(), &storage, status),
        Command::Order { id } => {
            let book = OrderBook::load(&storage);
            let order = book
                .get(&id)
                .with_context(|| format!("unknown order: {id}"))?;

            write_order(out, order, catalog.currency())
        }
        Command::Advance { id } => advance(out, storage, &id),
        Command::Cancel { id, reason } => cancel(out, storage, &id, reason),
        Command::Address { action } => address(out, storage, action),
        Command::Theme { action } => theme(out, storage, action.unwrap_or_default()),
    }
}

fn list_products(
    out: &mut impl Write,
    catalog: &Catalog,
    search: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let mut query = ProductQuery::new();

    if let Some(term) = search {
        query = query.search(term);
    }

    if let Some(category) = category {
        query = query.category(category);
    }

    let products = catalog.filter(&query);

    if products.is_empty() {
        writeln!(out, "No products found")?;
    }

    for product in products {
        writeln!(
            out,
            "{:>4}  {:<36} {:>10}  {}",
            product.id.as_str(),
            product.name,
            to_money(product.price, catalog.currency()).to_string(),
            stock_label(product),
        )?;
    }

    Ok(())
}

fn stock_label(product: &Product) -> String {
    if !product.is_in_stock() {
        "out of stock".to_string()
    } else if product.is_low_stock() {
        format!("only {} left", product.stock)
    } else {
        format!("{} in stock", product.stock)
    }
}

fn show_product(out: &mut impl Write, catalog: &Catalog, id: &str) -> Result<()> {
    let product = catalog
        .get(id)
        .with_context(|| format!("unknown product: {id}"))?;
    let currency = catalog.currency();

    writeln!(out, "{} ({})", product.name, product.id)?;
    writeln!(out, "Category: {}", product.category)?;
    writeln!(out, "Price:    {}", to_money(product.price, currency))?;

    if let (Some(original), Some(saved)) = (product.original_price, product.savings()) {
        writeln!(
            out,
            "Was:      {} (save {})",
            to_money(original, currency),
            to_money(saved, currency)
        )?;
    }

    if let Some(rating) = product.rating {
        writeln!(
            out,
            "Rating:   {rating:.1} ({} reviews)",
            product.review_count.unwrap_or_default()
        )?;
    }

    writeln!(out, "Stock:    {}", stock_label(product))?;

    if !product.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", product.description)?;
    }

    Ok(())
}

fn cart(
    out: &mut impl Write,
    catalog: &Catalog,
    storage: FileStorage,
    action: CartCommand,
) -> Result<()> {
    let mut cart = CartStore::open(storage, catalog.currency());

    match action {
        CartCommand::Show => {}
        CartCommand::Add { id } => {
            let product = catalog
                .get(&id)
                .with_context(|| format!("unknown product: {id}"))?;

            if !product.is_in_stock() {
                writeln!(out, "{} is out of stock", product.name)?;
            }

            cart.add(product);
        }
        CartCommand::Remove { id } => cart.remove(&id),
        CartCommand::Increase { id } => cart.increase_quantity(&id),
        CartCommand::Decrease { id } => cart.decrease_quantity(&id),
        CartCommand::Clear => cart.clear(),
    }

    write_cart(out, &cart)
}

fn write_cart<S: Storage>(out: &mut impl Write, cart: &CartStore<S>) -> Result<()> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for item in cart.items() {
        writeln!(
            out,
            "{:>4}  {:<36} {:>3} x {:>10} = {:>10}{}",
            item.id().as_str(),
            item.product().name,
            item.quantity(),
            to_money(item.product().price, cart.currency()).to_string(),
            to_money(item.line_total(), cart.currency()).to_string(),
            if cart.can_increase(item.id().as_str()) {
                ""
            } else {
                "  (max)"
            },
        )?;
    }

    writeln!(
        out,
        "Items: {}  Total: {}",
        cart.total_item_count(),
        cart.total_price_money()
    )?;

    Ok(())
}

fn checkout(
    out: &mut impl Write,
    currency: &'static Currency,
    mut storage: FileStorage,
    args: CheckoutArgs,
) -> Result<()> {
    let address = AddressBook::load(&storage)
        .default_address()
        .cloned()
        .context("no default delivery address, add one with `storefront address add`")?;

    let mut cart = CartStore::open(storage.clone(), currency);
    let mut book = OrderBook::load(&storage);
    let now = Timestamp::now();

    let order = Order::place(
        NewOrder {
            id: book.next_id(),
            order_number: book.next_order_number(now.to_zoned(TimeZone::UTC).year()),
            items: cart.items().to_vec(),
            address,
            payment_method: args.payment.into(),
            delivery_fee: DELIVERY_FEE,
            notes: args.notes,
        },
        now,
    )?;

    book.push(order.clone());
    book.save(&mut storage)?;
    cart.clear();

    info!(order = %order.order_number, total = order.total_price, "order placed");

    writeln!(out, "Placed order {}", order.order_number)?;
    writeln!(out)?;
    write_order(out, &order, currency)
}

fn list_orders(
    out: &mut impl Write,
    currency: &'static Currency,
    storage: &FileStorage,
    status: Option<OrderStatus>,
) -> Result<()> {
    let book = OrderBook::load(storage);
    let orders = book.filter(status);

    if orders.is_empty() {
        writeln!(out, "No orders")?;
    }

    for order in orders {
        writeln!(
            out,
            "{:>4}  {:<14} {:<22} {:>3} items {:>10}",
            order.id,
            order.order_number,
            order.status.label(),
            order.item_count(),
            to_money(order.total_price, currency).to_string(),
        )?;

        if let Some(code) = &order.tracking_code {
            writeln!(out, "      Tracking: {code}")?;
        }
    }

    if status.is_none() && !book.is_empty() {
        let counts = book.count_by_status();
        let summary = OrderStatus::ALL
            .iter()
            .filter_map(|status| {
                counts
                    .get(status)
                    .map(|count| format!("{}: {count}", status.label()))
            })
            .collect::<Vec<_>>();

        writeln!(out)?;
        writeln!(out, "{}", summary.join(", "))?;
    }

    Ok(())
}

fn write_order(out: &mut impl Write, order: &Order, currency: &'static Currency) -> Result<()> {
    writeln!(out, "Order {} ({})", order.order_number, order.status.label())?;
    writeln!(out, "Placed {}", order.created_at.strftime("%Y-%m-%d %H:%M"))?;
    writeln!(out, "Payment: {}", order.payment_method.label())?;

    if let Some(code) = &order.tracking_code {
        writeln!(out, "Tracking: {code}")?;
    }
    writeln!(
        out,
        "Deliver to: {}, {}, {}, {} {}",
        order.address.receiver_name,
        order.address.address,
        order.address.city_name,
        order.address.province_name,
        order.address.postal_code,
    )?;

    if let Some(notes) = &order.notes {
        writeln!(out, "Notes: {notes}")?;
    }

    writeln!(out)?;

    for item in &order.items {
        writeln!(
            out,
            "  {:<36} {:>3} x {:>10}",
            item.product().name,
            item.quantity(),
            to_money(item.product().price, currency).to_string(),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Subtotal: {}", to_money(order.subtotal, currency))?;
    writeln!(out, "Delivery: {}", to_money(order.delivery_fee, currency))?;
    writeln!(out, "Total:    {}", to_money(order.total_price, currency))?;

    if let Some(cancelled_at) = order.cancelled_at {
        writeln!(out)?;
        writeln!(out, "Cancelled {}", cancelled_at.strftime("%Y-%m-%d %H:%M"))?;

        if let Some(reason) = &order.cancel_reason {
            writeln!(out, "Reason: {reason}")?;
        }
    }

    let timeline = order.timeline();

    if !timeline.is_empty() {
        writeln!(out)?;
    }

    for step in timeline {
        let marker = if step.current {
            ">"
        } else if step.completed {
            "x"
        } else {
            " "
        };
        let at = step
            .at
            .map(|at| at.strftime("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        writeln!(out, "  [{marker}] {:<22} {at}", step.status.label())?;
    }

    Ok(())
}

fn advance(out: &mut impl Write, mut storage: FileStorage, id: &str) -> Result<()> {
    let mut book = OrderBook::load(&storage);
    let order = book
        .get_mut(id)
        .with_context(|| format!("unknown order: {id}"))?;

    let status = order.advance(Timestamp::now())?;
    let number = order.order_number.clone();

    book.save(&mut storage)?;

    info!(order = %number, %status, "order advanced");
    writeln!(out, "Order {number} is now {}", status.label())?;

    Ok(())
}

fn cancel(
    out: &mut impl Write,
    mut storage: FileStorage,
    id: &str,
    reason: Option<String>,
) -> Result<()> {
    let mut book = OrderBook::load(&storage);
    let order = book
        .get_mut(id)
        .with_context(|| format!("unknown order: {id}"))?;

    order.cancel(Timestamp::now(), reason)?;
    let number = order.order_number.clone();

    book.save(&mut storage)?;

    info!(order = %number, "order cancelled");
    writeln!(out, "Order {number} cancelled")?;

    Ok(())
}

fn address(out: &mut impl Write, mut storage: FileStorage, action: AddressCommand) -> Result<()> {
    let mut book = AddressBook::load(&storage);

    match action {
        AddressCommand::List => {}
        AddressCommand::Add(args) => {
            let id = book.add(args.into());
            writeln!(out, "Saved address {id}")?;
        }
        AddressCommand::Default { id } => book.set_default(&id)?,
        AddressCommand::Remove { id } => {
            book.remove(&id)?;
        }
    }

    book.save(&mut storage)?;

    if book.is_empty() {
        writeln!(out, "No saved addresses")?;
    }

    for address in book.addresses() {
        writeln!(
            out,
            "{} {:>3}  {:<12} {}, {}, {} {}",
            if address.is_default { "*" } else { " " },
            address.id,
            address.title,
            address.address,
            address.city_name,
            address.province_name,
            address.postal_code,
        )?;
    }

    Ok(())
}

fn theme(out: &mut impl Write, storage: FileStorage, action: ThemeCommand) -> Result<()> {
    let mut store = ThemeStore::open(storage);

    match action {
        ThemeCommand::Show => {}
        ThemeCommand::Set(args) => store.set_colors(args.into()),
        ThemeCommand::Reset => store.reset(),
    }

    for (name, value) in store.colors().css_variables() {
        writeln!(out, "{name}: {value}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    fn run_in(dir: &Path, args: &[&str]) -> Result<String> {
        let data_dir = dir.to_string_lossy().into_owned();
        let argv = ["storefront", "--data-dir", data_dir.as_str()]
            .into_iter()
            .chain(args.iter().copied());

        let config = Config::try_parse_from(argv)?;
        let mut out = Vec::new();

        run(config, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    fn add_home_address(dir: &Path) -> Result<String> {
        run_in(
            dir,
            &[
                "address",
                "add",
                "--title",
                "Home",
                "--province",
                "Greater London",
                "--city",
                "London",
                "--postal-code",
                "N1 9GU",
                "--address",
                "1 Example Street",
                "--receiver-name",
                "Sam Taylor",
                "--receiver-phone",
                "07700 900000",
            ],
        )
    }

    #[test]
    fn cart_survives_between_invocations() -> TestResult {
        let dir = tempfile::tempdir()?;

        run_in(dir.path(), &["cart", "add", "1"])?;
        run_in(dir.path(), &["cart", "add", "1"])?;
        let output = run_in(dir.path(), &["cart"])?;

        assert!(output.contains("Items: 2"), "unexpected output: {output}");

        Ok(())
    }

    #[test]
    fn unknown_product_is_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = run_in(dir.path(), &["cart", "add", "missing"]);

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn checkout_requires_a_default_address() -> TestResult {
        let dir = tempfile::tempdir()?;

        run_in(dir.path(), &["cart", "add", "1"])?;
        let result = run_in(dir.path(), &["checkout"]);

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn checkout_places_order_and_empties_cart() -> TestResult {
        let dir = tempfile::tempdir()?;

        add_home_address(dir.path())?;
        run_in(dir.path(), &["cart", "add", "1"])?;
        run_in(dir.path(), &["cart", "add", "2"])?;

        let placed = run_in(dir.path(), &["checkout", "--payment", "cash-on-delivery"])?;
        assert!(
            placed.contains("Placed order ORD-"),
            "unexpected output: {placed}"
        );
        assert!(
            placed.contains("Payment: Cash on delivery"),
            "unexpected output: {placed}"
        );
        assert!(placed.contains("Total:"), "unexpected output: {placed}");

        let cart = run_in(dir.path(), &["cart"])?;
        assert!(cart.contains("Cart is empty"), "unexpected output: {cart}");

        let orders = run_in(dir.path(), &["orders", "--status", "pending"])?;
        assert!(orders.contains("ORD-"), "unexpected output: {orders}");

        Ok(())
    }

    #[test]
    fn order_detail_shows_notes_and_tracking_code() -> TestResult {
        let dir = tempfile::tempdir()?;

        add_home_address(dir.path())?;
        run_in(dir.path(), &["cart", "add", "3"])?;
        run_in(dir.path(), &["checkout", "--notes", "Leave at the door"])?;

        let pending = run_in(dir.path(), &["order", "1"])?;
        assert!(
            pending.contains("Notes: Leave at the door"),
            "unexpected output: {pending}"
        );
        assert!(!pending.contains("Tracking:"), "unexpected output: {pending}");

        for _ in 0..3 {
            run_in(dir.path(), &["advance", "1"])?;
        }

        let shipped = run_in(dir.path(), &["order", "1"])?;
        assert!(shipped.contains("Tracking: TRK-"), "unexpected output: {shipped}");

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() -> TestResult {
        let dir = tempfile::tempdir()?;

        add_home_address(dir.path())?;
        let result = run_in(dir.path(), &["checkout"]);

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn theme_set_and_reset() -> TestResult {
        let dir = tempfile::tempdir()?;

        let changed = run_in(dir.path(), &["theme", "set", "--primary", "#123ABC"])?;
        assert!(
            changed.contains("--color-primary: #123abc"),
            "unexpected output: {changed}"
        );

        let reset = run_in(dir.path(), &["theme", "reset"])?;
        assert!(
            reset.contains("--color-primary: #667eea"),
            "unexpected output: {reset}"
        );

        Ok(())
    }

    #[test]
    fn colour_values_are_validated() {
        assert!(parse_colour("#a1b2c3").is_ok());
        assert!(parse_colour("a1b2c3").is_err());
        assert!(parse_colour("#a1b2").is_err());
        assert!(parse_colour("#zzzzzz").is_err());
    }

    #[test]
    fn slugs_join_lowercase_words() {
        assert_eq!(slug("  Greater   London "), "greater-london");
    }
}
