//! Storefront Cart Core - Shared cart domain types.
//!
//! This crate provides the types every cart consumer agrees on:
//! - `storefront-cart` - The session cart store and its durable storage
//! - `cli` - Command-line tool for inspecting and editing a cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no logging. This keeps it lightweight and allows it to be used
//! anywhere a line item has to be built or checked.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for product names, prices, quantities and line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
