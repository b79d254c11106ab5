//! Dora Pâtisserie Core - Shared domain types.
//!
//! This crate provides the common types used across the bakery's components:
//! - `server` - Storefront + admin HTTP service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and the
//!   order status workflow
//! - [`cart`] - The cart aggregate backing the storefront checkout flow

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLine, ProductSnapshot};
pub use types::*;
