//! CapsuleHaus Core - Shared domain logic.
//!
//! This crate provides the domain model used across all CapsuleHaus
//! components:
//! - `server` - Storefront and back-office HTTP API
//! - `cli` - Command-line tools for seeding and statistics
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no HTTP, no
//! persistence. Every operation here is a pure function over in-memory
//! state; the server crate decides when results are persisted or sent
//! over the wire. This keeps the crate lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails,
//!   phone numbers, and order statuses
//! - [`catalog`] - Product model and the filter/sort/paginate query engine
//! - [`cart`] - Shopping cart aggregate with merge-by-id line items
//! - [`order`] - Order ledger and the order status state machine
//! - [`content`] - Per-page content blocks and typed page data
//! - [`brochure`] - Downloadable PDF brochure records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod brochure;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod order;
pub mod types;

pub use types::*;
