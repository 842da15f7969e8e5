//! Request body and envelope assembly.

use super::xml_utils::{XmlResult, XmlWriter};
use super::{Operation, SERVICE_URI, SoapItem, ns};
use crate::core::{CrossBorderError, FieldSpec, FieldValue};

/// Writes the children of a `<request>` element.
///
/// Authentication fields come first, then whatever the operation adds in
/// call order.
pub struct BodyBuilder {
    w: XmlWriter,
}

impl BodyBuilder {
    pub fn new(partner_key: &str, language: &str) -> Result<Self, CrossBorderError> {
        let mut w = XmlWriter::new();
        w.typed_element("partnerKey", "xsd:string", partner_key)?;
        w.typed_element("language", "xsd:string", language)?;
        Ok(Self { w })
    }

    /// A scalar field with an explicit `xsi:type`.
    pub fn field(
        &mut self,
        name: &str,
        value: &FieldValue,
        xsd: &str,
    ) -> Result<&mut Self, CrossBorderError> {
        self.w.typed_element(name, xsd, &value.to_string())?;
        Ok(self)
    }

    /// Fields produced by [`crate::core::apply_specs`], typed by their rule.
    pub fn spec_fields(
        &mut self,
        fields: &[(FieldSpec, FieldValue)],
    ) -> Result<&mut Self, CrossBorderError> {
        for (spec, value) in fields {
            self.field(spec.wire, value, spec.rule.xsd_type())?;
        }
        Ok(self)
    }

    /// A SOAP-encoded array of records, one `<item>` each.
    pub fn items<T: SoapItem>(
        &mut self,
        element: &str,
        items: &[T],
    ) -> Result<&mut Self, CrossBorderError> {
        let array_type = format!("v4:ArrayOf{}", T::SCHEMA);
        let item_type = format!("v4:{}[]", T::SCHEMA);
        self.w.start_element_with_attrs(
            element,
            &[
                ("xsi:type", array_type.as_str()),
                ("soapenc:arrayType", item_type.as_str()),
            ],
        )?;
        for item in items {
            item.write_xml(&mut self.w, "item")?;
        }
        self.w.end_element(element)?;
        Ok(self)
    }

    pub fn finish(self) -> XmlResult {
        self.w.into_string()
    }
}

/// Wrap a request body in the SOAP envelope for `op`.
pub fn build_envelope(op: Operation, body: &str) -> XmlResult {
    let mut w = XmlWriter::new();
    w.start_element_with_attrs(
        "soapenv:Envelope",
        &[
            ("xmlns:xsi", ns::XSI),
            ("xmlns:xsd", ns::XSD),
            ("xmlns:soapenv", ns::SOAPENV),
            ("xmlns:v4", SERVICE_URI),
            ("xmlns:soapenc", ns::SOAPENC),
        ],
    )?;
    w.empty_element("soapenv:Header")?;
    w.start_element("soapenv:Body")?;

    let op_tag = format!("v4:{}", op.name());
    w.start_element_with_attrs(&op_tag, &[("soapenv:encodingStyle", ns::SOAPENC)])?;
    w.start_element_with_attrs("request", &[("xsi:type", op.request_type().as_str())])?;
    w.raw(body)?;
    w.end_element("request")?;
    w.end_element(&op_tag)?;

    w.end_element("soapenv:Body")?;
    w.end_element("soapenv:Envelope")?;
    w.into_string()
}

/// HTTP headers for posting `envelope` as `op`.
pub fn soap_headers(op: Operation, envelope: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Content-Type", "text/xml;charset=UTF-8".to_string()),
        ("Accept-Encoding", "gzip,deflate".to_string()),
        ("Content-Length", envelope.len().to_string()),
        ("SOAPAction", op.soap_action()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProductIdEntry, Rule};

    #[test]
    fn body_starts_with_credentials() {
        let body = BodyBuilder::new("key&1", "es").unwrap().finish().unwrap();
        assert_eq!(
            body,
            r#"<partnerKey xsi:type="xsd:string">key&amp;1</partnerKey><language xsi:type="xsd:string">es</language>"#
        );
    }

    #[test]
    fn items_are_soap_encoded_arrays() {
        let mut b = BodyBuilder::new("k", "en").unwrap();
        b.items("items", &[ProductIdEntry::new("A"), ProductIdEntry::new("B")])
            .unwrap();
        let body = b.finish().unwrap();
        assert!(body.contains(
            r#"<items xsi:type="v4:ArrayOfProductsIdDat" soapenc:arrayType="v4:ProductsIdDat[]">"#
        ));
        assert!(body.contains(
            r#"<item xsi:type="v4:ProductsIdDat"><productID>B</productID></item></items>"#
        ));
    }

    #[test]
    fn spec_fields_use_rule_types() {
        let mut b = BodyBuilder::new("k", "en").unwrap();
        b.spec_fields(&[(FieldSpec::new("service", Rule::IntRangeLow), 2.into())])
            .unwrap();
        assert!(b
            .finish()
            .unwrap()
            .ends_with(r#"<service xsi:type="xsd:int">2</service>"#));
    }

    #[test]
    fn envelope_wraps_body() {
        let xml = build_envelope(Operation::OrderRemove, "<x>1</x>").unwrap();
        assert!(xml.starts_with(r#"<soapenv:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains(r#"<soapenv:Header/><soapenv:Body><v4:ConnectOrderRemove soapenv:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#));
        assert!(xml.ends_with(
            r#"<request xsi:type="v4:ConnectOrderRemoveRequest"><x>1</x></request></v4:ConnectOrderRemove></soapenv:Body></soapenv:Envelope>"#
        ));
    }

    #[test]
    fn headers_carry_action_and_length() {
        let headers = soap_headers(Operation::SkuStatus, "abcd");
        assert!(headers.contains(&("Content-Length", "4".to_string())));
        assert!(headers.contains(&(
            "SOAPAction",
            "https://api.crossborder.fedex.com/services/v4.4#ConnectSkuStatus".to_string()
        )));
    }
}
