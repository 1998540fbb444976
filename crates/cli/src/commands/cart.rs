//! Cart commands.
//!
//! Every command runs against a [`CartContext`] opened over file storage, so
//! consecutive invocations see each other's changes.

use storefront_cart::{
    AddOutcome, CartConfig, CartContext, CartError, CartStore, FileStorage, UpdateOutcome,
};
use storefront_cart_core::{NewLineItem, PriceInput, format_amount};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// `remove` or `update` named a product that is not in the cart.
    #[error("No item named {0:?} in the cart")]
    NotInCart(String),
}

/// Open the session cart described by `config`.
#[must_use]
pub fn open(config: &CartConfig) -> CartContext<FileStorage> {
    let storage = FileStorage::new(&config.storage_dir);
    CartContext::provide(CartStore::from_config(storage, config))
}

/// Add a product.
///
/// # Errors
///
/// Returns an error if the name, price or quantity is invalid.
pub fn add(
    cart: &CartContext<FileStorage>,
    name: &str,
    price: String,
    quantity: u32,
    image: Option<String>,
) -> Result<(), CommandError> {
    let mut item = NewLineItem::new(name, PriceInput::Text(price), quantity);
    item.image = image;

    match cart.add_to_cart(item)? {
        AddOutcome::Added => info!(name, quantity, "Added to cart"),
        AddOutcome::Merged { quantity } => {
            info!(name, quantity = quantity.get(), "Updated quantity in cart");
        }
    }
    log_total(cart);
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove(cart: &CartContext<FileStorage>, name: &str) -> Result<(), CommandError> {
    if !cart.remove_from_cart(name)? {
        return Err(CommandError::NotInCart(name.to_string()));
    }
    info!(name, "Removed from cart");
    log_total(cart);
    Ok(())
}

/// Set a product's quantity. Zero removes it.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn update(
    cart: &CartContext<FileStorage>,
    name: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    match cart.update_quantity(name, quantity)? {
        UpdateOutcome::Updated => info!(name, quantity, "Updated quantity in cart"),
        UpdateOutcome::Removed => info!(name, "Removed from cart"),
        UpdateOutcome::Missing => return Err(CommandError::NotInCart(name.to_string())),
    }
    log_total(cart);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart rejects the operation.
pub fn clear(cart: &CartContext<FileStorage>) -> Result<(), CommandError> {
    cart.clear_cart()?;
    info!("Cart cleared");
    Ok(())
}

/// Log the checkout summary.
pub fn show(cart: &CartContext<FileStorage>) {
    let summary = cart.summary();

    if summary.is_empty() {
        info!("Your cart is empty");
        return;
    }

    info!("Order Summary");
    info!("=============");
    for line in &summary.lines {
        info!(
            "  {} × {} @ {} = {}",
            line.name, line.quantity, line.unit_price, line.line_total
        );
    }
    info!("Items: {}", summary.item_count);
    info!("Total: {}", summary.total);
}

/// Log the cart total.
pub fn total(cart: &CartContext<FileStorage>) {
    log_total(cart);
}

fn log_total(cart: &CartContext<FileStorage>) {
    info!(
        items = cart.item_count(),
        "Total: {}",
        format_amount(cart.total())
    );
}
