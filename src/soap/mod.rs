//! SOAP envelope construction and response interpretation.
//!
//! # Example
//!
//! ```
//! use crossborder::soap::{BodyBuilder, Operation, build_envelope};
//! use crossborder::core::ProductIdEntry;
//!
//! let mut body = BodyBuilder::new("my-partner-key", "en").unwrap();
//! body.items("items", &[ProductIdEntry::new("SKU-1")]).unwrap();
//! let xml = build_envelope(Operation::SkuStatus, &body.finish().unwrap()).unwrap();
//! assert!(xml.contains(r#"<request xsi:type="v4:ConnectSkuStatusRequest">"#));
//! ```

mod envelope;
mod response;
mod tree;
pub(crate) mod xml_utils;

use std::fmt;

use serde::Serialize;

use crate::core::{CrossBorderError, FieldValue, Fields};

pub use envelope::{BodyBuilder, build_envelope, soap_headers};
pub use response::{
    LandedCostItemResult, NormalizedResult, ResponseRow, ResultItems, RowKind, RowSlots,
    SkuStatusResult, bind_rows, copy_rows, locate_result, normalize, response_fields,
    row_matches_schema, soap_header_json,
};
pub use tree::{XmlElement, parse_xml};
pub use xml_utils::{XmlResult, XmlWriter};

/// Base URI of the service. Also the `v4` namespace and the prefix of every
/// `SOAPAction` header.
pub const SERVICE_URI: &str = "https://api.crossborder.fedex.com/services/v4.4";

/// Namespace URIs declared on the envelope.
pub mod ns {
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";
    pub const SOAPENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";
    pub const SOAPENC: &str = "http://schemas.xmlsoap.org/soap/encoding/";
}

/// The remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    ProductInfo,
    LandedCost,
    Order,
    OrderTrackingUpdate,
    OrderRemove,
    SkuStatus,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::ProductInfo,
        Operation::LandedCost,
        Operation::Order,
        Operation::OrderTrackingUpdate,
        Operation::OrderRemove,
        Operation::SkuStatus,
    ];

    /// Wire name, e.g. `ConnectProductInfo`.
    pub fn name(self) -> &'static str {
        match self {
            Operation::ProductInfo => "ConnectProductInfo",
            Operation::LandedCost => "ConnectLandedCost",
            Operation::Order => "ConnectOrder",
            Operation::OrderTrackingUpdate => "ConnectOrderTrackingUpdate",
            Operation::OrderRemove => "ConnectOrderRemove",
            Operation::SkuStatus => "ConnectSkuStatus",
        }
    }

    /// `xsi:type` of the `<request>` element.
    pub fn request_type(self) -> String {
        format!("v4:{}Request", self.name())
    }

    /// Local name of the body element holding the result.
    pub fn response_element(self) -> String {
        format!("{}Response", self.name())
    }

    /// `SOAPAction` header value.
    pub fn soap_action(self) -> String {
        format!("{SERVICE_URI}#{}", self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request record that renders itself as one `<item>` of a SOAP array.
pub trait SoapItem {
    /// Schema type name without prefix, e.g. `ProductInfoDat`.
    const SCHEMA: &'static str;

    /// Currently set fields, in schema order, keyed by wire name.
    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)>;

    /// Write the record as `<tag xsi:type="v4:SCHEMA">` with one child per
    /// set field.
    fn write_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), CrossBorderError> {
        let xsi_type = format!("v4:{}", Self::SCHEMA);
        w.start_element_with_attrs(tag, &[("xsi:type", xsi_type.as_str())])?;
        for (name, value) in self.wire_fields() {
            w.text_element(name, &value.to_string())?;
        }
        w.end_element(tag)?;
        Ok(())
    }

    /// The record as a standalone `<item>` fragment.
    fn to_xml(&self) -> XmlResult {
        let mut w = XmlWriter::new();
        self.write_xml(&mut w, "item")?;
        w.into_string()
    }

    /// The record as a field map, used for request summaries.
    fn to_fields(&self) -> Fields {
        self.wire_fields().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names() {
        assert_eq!(Operation::LandedCost.name(), "ConnectLandedCost");
        assert_eq!(
            Operation::ProductInfo.request_type(),
            "v4:ConnectProductInfoRequest"
        );
        assert_eq!(
            Operation::SkuStatus.response_element(),
            "ConnectSkuStatusResponse"
        );
        assert_eq!(
            Operation::Order.soap_action(),
            "https://api.crossborder.fedex.com/services/v4.4#ConnectOrder"
        );
    }

    #[test]
    fn service_uri_is_https() {
        assert!(SERVICE_URI.starts_with("https://"));
    }
}
