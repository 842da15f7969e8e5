//! Client façade: async methods returning a result, and a callback variant
//! over the same pipeline.
//!
//! ```no_run
//! use crossborder::core::ProductIdEntry;
//! use crossborder::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), crossborder::CrossBorderError> {
//! let client = Client::new(&ClientConfig::new("my-partner-key").language("en"))?;
//! let outcome = client.sku_status(&[ProductIdEntry::new("SKU-1")]).await?;
//! println!("{:?}", outcome.body().sku_statuses());
//! # Ok(())
//! # }
//! ```

mod api;
mod callback;
mod config;
mod requests;
mod transport;

pub use api::{Client, Outcome, WrappedResult};
pub use callback::{Callback, CallbackClient};
pub use config::{ClientConfig, MAX_MERCHANT_KEY_LEN, Settings};
pub use requests::{
    LandedCostRequest, OrderRequest, PreparedCall, Recipient, TrackingUpdateRequest,
    prepare_landed_cost, prepare_order, prepare_order_remove, prepare_product_info,
    prepare_sku_status, prepare_tracking_update,
};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{Transport, TransportResponse};
