//! Callback calling convention over the async [`Client`].
//!
//! Every method validates and prepares the request on the caller's thread,
//! returning contract violations directly. The network round trip then runs
//! as a task on the current tokio runtime and its outcome is handed to the
//! callback exactly once.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::api::{Client, Outcome};
use super::config::ClientConfig;
use super::requests::{LandedCostRequest, OrderRequest, PreparedCall, TrackingUpdateRequest};
use super::transport::Transport;
use crate::core::{CrossBorderError, ProductIdEntry, ProductInfoEntry};

/// Receives the single outcome of one call.
pub trait Callback: FnOnce(Result<Outcome, CrossBorderError>) + Send + 'static {}

impl<F> Callback for F where F: FnOnce(Result<Outcome, CrossBorderError>) + Send + 'static {}

pub struct CallbackClient<T: Transport + 'static> {
    inner: Arc<Client<T>>,
}

impl<T: Transport + 'static> Clone for CallbackClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "http")]
impl CallbackClient<super::transport::HttpTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self, CrossBorderError> {
        Ok(Self::from_client(Client::new(config)?))
    }
}

impl<T: Transport + 'static> CallbackClient<T> {
    pub fn from_client(client: Client<T>) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, CrossBorderError> {
        Ok(Self::from_client(Client::with_transport(config, transport)?))
    }

    /// The async client underneath.
    pub fn client(&self) -> &Client<T> {
        &self.inner
    }

    pub fn product_info(
        &self,
        items: &[ProductInfoEntry],
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_product_info(items)?;
        self.dispatch(call, callback)
    }

    pub fn landed_cost(
        &self,
        request: &LandedCostRequest,
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_landed_cost(request)?;
        self.dispatch(call, callback)
    }

    pub fn order(
        &self,
        request: &OrderRequest,
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_order(request)?;
        self.dispatch(call, callback)
    }

    pub fn order_tracking_update(
        &self,
        request: &TrackingUpdateRequest,
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_order_tracking_update(request)?;
        self.dispatch(call, callback)
    }

    pub fn order_remove(
        &self,
        order_number: &str,
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_order_remove(order_number)?;
        self.dispatch(call, callback)
    }

    pub fn sku_status(
        &self,
        items: &[ProductIdEntry],
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let call = self.inner.prepare_sku_status(items)?;
        self.dispatch(call, callback)
    }

    fn dispatch(
        &self,
        call: PreparedCall,
        callback: impl Callback,
    ) -> Result<JoinHandle<()>, CrossBorderError> {
        let handle = Handle::try_current().map_err(|_| {
            CrossBorderError::invalid("callback calls must be made inside a tokio runtime")
        })?;
        let client = Arc::clone(&self.inner);
        Ok(handle.spawn(async move {
            let outcome = client.execute(call).await;
            callback(outcome);
        }))
    }
}
