use serde::Serialize;
use tracing::{debug, warn};

use super::config::{ClientConfig, Settings};
use super::requests::{
    LandedCostRequest, OrderRequest, PreparedCall, TrackingUpdateRequest, prepare_landed_cost,
    prepare_order, prepare_order_remove, prepare_product_info, prepare_sku_status,
    prepare_tracking_update,
};
use super::transport::{Transport, TransportResponse};
use crate::core::{CrossBorderError, Fields, ProductIdEntry, ProductInfoEntry};
use crate::soap::{
    NormalizedResult, build_envelope, locate_result, normalize, parse_xml, soap_header_json,
    soap_headers,
};

/// A normalized result with its call diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedResult {
    pub body: NormalizedResult,
    pub status_code: u16,
    pub request: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soap_header: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<TransportResponse>,
}

/// What a successful call yields: the flat result when `stripWrapper` is
/// set, otherwise the result wrapped with diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Flat(NormalizedResult),
    Wrapped(Box<WrappedResult>),
}

impl Outcome {
    pub fn body(&self) -> &NormalizedResult {
        match self {
            Outcome::Flat(body) => body,
            Outcome::Wrapped(wrapped) => &wrapped.body,
        }
    }

    pub fn into_body(self) -> NormalizedResult {
        match self {
            Outcome::Flat(body) => body,
            Outcome::Wrapped(wrapped) => wrapped.body,
        }
    }

    pub fn wrapped(&self) -> Option<&WrappedResult> {
        match self {
            Outcome::Flat(_) => None,
            Outcome::Wrapped(wrapped) => Some(wrapped),
        }
    }
}

/// Async client. Holds only validated settings and the transport, so one
/// instance can serve any number of concurrent calls.
#[cfg(feature = "http")]
pub struct Client<T: Transport = super::transport::HttpTransport> {
    settings: Settings,
    transport: T,
}

#[cfg(not(feature = "http"))]
pub struct Client<T: Transport> {
    settings: Settings,
    transport: T,
}

#[cfg(feature = "http")]
impl Client<super::transport::HttpTransport> {
    /// Client over HTTPS using the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, CrossBorderError> {
        let settings = config.resolve()?;
        let transport = super::transport::HttpTransport::new(settings.timeout_secs)?;
        Ok(Self {
            settings,
            transport,
        })
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, CrossBorderError> {
        Ok(Self {
            settings: config.resolve()?,
            transport,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prepare_product_info(
        &self,
        items: &[ProductInfoEntry],
    ) -> Result<PreparedCall, CrossBorderError> {
        prepare_product_info(&self.settings, items)
    }

    pub fn prepare_landed_cost(
        &self,
        request: &LandedCostRequest,
    ) -> Result<PreparedCall, CrossBorderError> {
        prepare_landed_cost(&self.settings, request)
    }

    pub fn prepare_order(&self, request: &OrderRequest) -> Result<PreparedCall, CrossBorderError> {
        prepare_order(&self.settings, request)
    }

    pub fn prepare_order_tracking_update(
        &self,
        request: &TrackingUpdateRequest,
    ) -> Result<PreparedCall, CrossBorderError> {
        prepare_tracking_update(&self.settings, request)
    }

    pub fn prepare_order_remove(&self, order_number: &str) -> Result<PreparedCall, CrossBorderError> {
        prepare_order_remove(&self.settings, order_number)
    }

    pub fn prepare_sku_status(
        &self,
        items: &[ProductIdEntry],
    ) -> Result<PreparedCall, CrossBorderError> {
        prepare_sku_status(&self.settings, items)
    }

    /// Upload product catalog entries.
    pub async fn product_info(
        &self,
        items: &[ProductInfoEntry],
    ) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_product_info(items)?;
        self.execute(call).await
    }

    /// Quote duties, taxes and shipping for a basket.
    pub async fn landed_cost(&self, request: &LandedCostRequest) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_landed_cost(request)?;
        self.execute(call).await
    }

    /// Place an order against a landed cost quote.
    pub async fn order(&self, request: &OrderRequest) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_order(request)?;
        self.execute(call).await
    }

    pub async fn order_tracking_update(
        &self,
        request: &TrackingUpdateRequest,
    ) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_order_tracking_update(request)?;
        self.execute(call).await
    }

    pub async fn order_remove(&self, order_number: &str) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_order_remove(order_number)?;
        self.execute(call).await
    }

    pub async fn sku_status(&self, items: &[ProductIdEntry]) -> Result<Outcome, CrossBorderError> {
        let call = self.prepare_sku_status(items)?;
        self.execute(call).await
    }

    /// Send a prepared call and interpret the answer.
    ///
    /// The envelope is parsed once before sending; a failure there is a
    /// `Parse` error and nothing is posted.
    pub async fn execute(&self, call: PreparedCall) -> Result<Outcome, CrossBorderError> {
        let PreparedCall {
            operation,
            body,
            request,
        } = call;

        let envelope = build_envelope(operation, &body)?;
        parse_xml(&envelope).map_err(|e| {
            warn!(%operation, error = %e, "request envelope failed self-check");
            e
        })?;

        let headers = soap_headers(operation, &envelope);
        debug!(
            %operation,
            endpoint = %self.settings.endpoint,
            bytes = envelope.len(),
            "sending request"
        );
        let response = self
            .transport
            .post(&self.settings.endpoint, envelope, headers)
            .await?;
        debug!(%operation, status = response.status_code, "received response");

        let document = parse_xml(&response.body).map_err(|e| {
            warn!(%operation, error = %e, "response is not well-formed XML");
            e
        })?;
        let result = locate_result(&document, operation)?;
        let normalized = normalize(operation, result)?;

        if self.settings.strip_wrapper {
            return Ok(Outcome::Flat(normalized));
        }

        let soap_header = if self.settings.return_soap_header {
            Some(soap_header_json(&document)?)
        } else {
            None
        };
        Ok(Outcome::Wrapped(Box::new(WrappedResult {
            body: normalized,
            status_code: response.status_code,
            request,
            raw: self.settings.return_raw.then(|| response.body.clone()),
            soap_header,
            response: self.settings.return_full_response.then_some(response),
        })))
    }
}
