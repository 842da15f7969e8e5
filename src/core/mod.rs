//! Reference tables, field rules, and request records.
//!
//! Everything here is pure: no I/O, no shared state. The lookup tables are
//! static and the records normalize their inputs on construction.

mod carriers;
mod countries;
mod currencies;
mod error;
mod hubs;
mod languages;
mod rules;
mod types;
mod value;

pub use carriers::*;
pub use countries::*;
pub use currencies::*;
pub use error::*;
pub use hubs::*;
pub use languages::*;
pub use rules::*;
pub use types::*;
pub use value::*;
