//! # crossborder
//!
//! Client library for a cross-border e-commerce shipping and customs SOAP
//! service: product catalog upload, landed cost quotes, order placement,
//! tracking updates, order removal and SKU status.
//!
//! All monetary values use [`rust_decimal::Decimal`] and are sent with
//! exactly four decimal places.
//!
//! ## Quick Start
//!
//! ```rust
//! use crossborder::core::*;
//! use rust_decimal_macros::dec;
//!
//! let carton = CartonDimensions::weight(dec!(2.5)).unwrap();
//! let entry = ProductInfoEntry::new(
//!     "SKU-1", "Widget", dec!(9.99), "usd", "TPA", "DE", carton, &Fields::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(entry.price.to_string(), "9.9900");
//! assert_eq!(entry.export_hub_country, "US");
//! assert_eq!(entry.hazard_flag(), 0);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`core`] | Lookup tables, field rules, request records, errors |
//! | [`soap`] | Envelope builder, XML tree, response normalizer |
//! | [`client`] | Async and callback clients over a pluggable transport |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `http` (default) | [`client::HttpTransport`] backed by `reqwest` |

pub mod client;
pub mod core;
pub mod soap;

pub use crate::client::{CallbackClient, Client, ClientConfig, Outcome};
pub use crate::core::CrossBorderError;
pub use crate::soap::Operation;
