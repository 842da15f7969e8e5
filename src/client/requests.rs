//! Per-operation request assembly.
//!
//! Each `prepare_*` function turns caller data into a [`PreparedCall`]: the
//! serialized request body plus a field summary of what was sent. Nothing
//! here touches client state beyond the read-only [`Settings`].

use serde::Serialize;

use super::config::Settings;
use crate::core::{
    CrossBorderError, FieldSpec, FieldValue, Fields, OrderLineItem,
    ProductIdEntry, ProductInfoEntry, Rule, ShipmentLineItem, TrackingEntry, apply_specs,
    country_or_default, truncate_chars,
};
use crate::soap::{BodyBuilder, Operation, SoapItem};

/// A request ready to be wrapped in an envelope and sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedCall {
    pub operation: Operation,
    /// Children of the `<request>` element.
    pub body: String,
    /// What was sent, keyed by wire name.
    pub request: Fields,
}

/// Keeps the XML body and the request summary in step.
struct CallBuilder {
    operation: Operation,
    body: BodyBuilder,
    summary: Fields,
}

impl CallBuilder {
    fn new(operation: Operation, settings: &Settings) -> Result<Self, CrossBorderError> {
        let body = BodyBuilder::new(&settings.merchant_key, settings.language)?;
        let summary = Fields::new()
            .with("partnerKey", settings.merchant_key.as_str())
            .with("language", settings.language);
        Ok(Self {
            operation,
            body,
            summary,
        })
    }

    fn text(&mut self, name: &str, value: &str) -> Result<(), CrossBorderError> {
        let value = FieldValue::from(value);
        self.body.field(name, &value, "xsd:string")?;
        self.summary.insert(name, value);
        Ok(())
    }

    fn spec_fields(&mut self, fields: &[(FieldSpec, FieldValue)]) -> Result<(), CrossBorderError> {
        self.body.spec_fields(fields)?;
        for (spec, value) in fields {
            self.summary.insert(spec.wire, value.clone());
        }
        Ok(())
    }

    fn items<T: SoapItem>(&mut self, element: &str, items: &[T]) -> Result<(), CrossBorderError> {
        if items.is_empty() {
            return Err(CrossBorderError::invalid(format!(
                "{} requires at least one entry in '{element}'",
                self.operation
            )));
        }
        self.body.items(element, items)?;
        let rows: Vec<FieldValue> = items.iter().map(|i| i.to_fields().into()).collect();
        self.summary.insert(element, rows);
        Ok(())
    }

    fn finish(self) -> Result<PreparedCall, CrossBorderError> {
        Ok(PreparedCall {
            operation: self.operation,
            body: self.body.finish()?,
            request: self.summary,
        })
    }
}

fn required_key(value: &str, name: &str, max: usize) -> Result<String, CrossBorderError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CrossBorderError::invalid(format!("'{name}' must not be empty")));
    }
    Ok(truncate_chars(value, max))
}

fn list_of<T>(
    fields: &Fields,
    key: &str,
    owner: &str,
    build: impl Fn(&Fields) -> Result<T, CrossBorderError>,
) -> Result<Vec<T>, CrossBorderError> {
    let Some(list) = fields.get(key).and_then(FieldValue::as_list) else {
        return Err(CrossBorderError::invalid(format!(
            "{owner} requires '{key}' as a list"
        )));
    };
    list.iter()
        .map(|entry| {
            entry
                .as_map()
                .ok_or_else(|| {
                    CrossBorderError::invalid(format!("{owner} '{key}' entries must be maps"))
                })
                .and_then(&build)
        })
        .collect()
}

fn text_of<'a>(fields: &'a Fields, key: &str, owner: &str) -> Result<&'a str, CrossBorderError> {
    fields
        .text(key)
        .ok_or_else(|| CrossBorderError::invalid(format!("{owner} requires '{key}' as a string")))
}

fn optional_args(fields: &Fields, owner: &str) -> Result<Fields, CrossBorderError> {
    match fields.get("optionalArgs") {
        None => Ok(Fields::new()),
        Some(FieldValue::Map(map)) => Ok(map.clone()),
        Some(_) => Err(CrossBorderError::invalid(format!(
            "{owner} 'optionalArgs' must be a map"
        ))),
    }
}

/// `ConnectProductInfo`.
pub fn prepare_product_info(
    settings: &Settings,
    items: &[ProductInfoEntry],
) -> Result<PreparedCall, CrossBorderError> {
    let mut call = CallBuilder::new(Operation::ProductInfo, settings)?;
    call.items("items", items)?;
    call.finish()
}

/// `ConnectSkuStatus`.
pub fn prepare_sku_status(
    settings: &Settings,
    items: &[ProductIdEntry],
) -> Result<PreparedCall, CrossBorderError> {
    let mut call = CallBuilder::new(Operation::SkuStatus, settings)?;
    call.items("items", items)?;
    call.finish()
}

/// `ConnectOrderRemove`.
pub fn prepare_order_remove(
    settings: &Settings,
    order_number: &str,
) -> Result<PreparedCall, CrossBorderError> {
    let order_number = required_key(order_number, "orderNumber", 100)?;
    let mut call = CallBuilder::new(Operation::OrderRemove, settings)?;
    call.text("orderNumber", &order_number)?;
    call.finish()
}

const LANDED_COST_OPTIONAL: &[FieldSpec] = &[
    FieldSpec::new("privateIndividuals", Rule::StringYOrN),
    FieldSpec::new("shipmentDestinationAddress1", Rule::StringMax(250)),
    FieldSpec::new("shipmentDestinationAddress2", Rule::StringMax(250)),
    FieldSpec::new("shipmentDestinationCity", Rule::StringMax(50)),
    FieldSpec::new("shipmentDestinationStateOrProvince", Rule::StringMax(50)),
    FieldSpec::new("shipmentDestinationZip", Rule::StringMax(50)),
    FieldSpec::new("domesticShippingCost", Rule::Float4),
    FieldSpec::new("insuranceFlag", Rule::IntBool),
    FieldSpec::new("orderValuationCurrency", Rule::ValidCurrency),
    FieldSpec::new("requestedCostReturnedCurrency", Rule::ValidCurrency),
    FieldSpec::new("service", Rule::IntRangeLow),
];

/// A landed cost quote request.
#[derive(Debug, Clone, PartialEq)]
pub struct LandedCostRequest {
    pub destination_country: String,
    pub items: Vec<ShipmentLineItem>,
    /// `privateIndividuals`, `shipmentDestination*`, `domesticShippingCost`,
    /// `insuranceFlag`, `orderValuationCurrency`,
    /// `requestedCostReturnedCurrency`, `service`.
    pub optional: Fields,
}

impl LandedCostRequest {
    pub fn new(destination_country: &str, items: Vec<ShipmentLineItem>) -> Self {
        Self {
            destination_country: destination_country.to_string(),
            items,
            optional: Fields::new(),
        }
    }

    pub fn optional(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.optional.insert(key, value);
        self
    }

    /// Keys `shipmentDestinationCountry`, `items`, `optionalArgs`.
    pub fn from_fields(fields: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "LandedCostRequest";
        Ok(Self {
            destination_country: text_of(fields, "shipmentDestinationCountry", OWNER)?.to_string(),
            items: list_of(fields, "items", OWNER, ShipmentLineItem::from_fields)?,
            optional: optional_args(fields, OWNER)?,
        })
    }
}

/// `ConnectLandedCost`.
pub fn prepare_landed_cost(
    settings: &Settings,
    request: &LandedCostRequest,
) -> Result<PreparedCall, CrossBorderError> {
    let mut call = CallBuilder::new(Operation::LandedCost, settings)?;
    call.text(
        "shipmentDestinationCountry",
        &country_or_default(&request.destination_country),
    )?;
    call.items("items", &request.items)?;
    call.spec_fields(&apply_specs(&request.optional, LANDED_COST_OPTIONAL)?)?;
    call.finish()
}

/// Where an order ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub city: String,
    pub country: String,
}

impl Recipient {
    pub fn new(first_name: &str, last_name: &str, address1: &str, city: &str, country: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address1: address1.to_string(),
            city: city.to_string(),
            country: country.to_string(),
        }
    }
}

const ORDER_OPTIONAL: &[FieldSpec] = &[
    FieldSpec::new("shipToBusiness", Rule::StringMax(250)),
    FieldSpec::new("shipToAddress2", Rule::StringMax(250)),
    FieldSpec::new("shipToState", Rule::StringMax(50)),
    FieldSpec::new("shipToZip", Rule::StringMax(50)),
    FieldSpec::new("shipToPhone", Rule::StringMax(50)),
    FieldSpec::new("shipToEmail", Rule::StringMax(250)),
    FieldSpec::new("shipToTaxID", Rule::StringMax(250)),
    FieldSpec::new("repackage", Rule::IntBool),
    FieldSpec::new("dutyPaid", Rule::IntBool),
    FieldSpec::new("insurance", Rule::IntBool),
    FieldSpec::new("emailCustomerTracking", Rule::IntBool),
    FieldSpec::new("bongoCustomerService", Rule::IntBool),
    FieldSpec::new("sellingStoreName", Rule::StringMax(100)),
    FieldSpec::new("sellingStoreURL", Rule::StringMax(250)),
    FieldSpec::new("sellingStoreURLCS", Rule::StringMax(250)),
    FieldSpec::new("sellingStoreURLImage", Rule::StringMax(250)),
];

/// An order placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub order_number: String,
    pub landed_cost_transaction_id: String,
    pub ship_to: Recipient,
    pub lines: Vec<OrderLineItem>,
    pub optional: Fields,
}

impl OrderRequest {
    pub fn new(
        order_number: &str,
        landed_cost_transaction_id: &str,
        ship_to: Recipient,
        lines: Vec<OrderLineItem>,
    ) -> Self {
        Self {
            order_number: order_number.to_string(),
            landed_cost_transaction_id: landed_cost_transaction_id.to_string(),
            ship_to,
            lines,
            optional: Fields::new(),
        }
    }

    pub fn optional(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.optional.insert(key, value);
        self
    }

    /// Keys `orderNumber`, `landedCostTransactionID`, `shipToFirstName`,
    /// `shipToLastName`, `shipToAddress1`, `shipToCity`, `shipToCountry`,
    /// `ordersInfo`, `optionalArgs`.
    pub fn from_fields(fields: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "OrderRequest";
        let text = |key: &str| text_of(fields, key, OWNER);
        let ship_to = Recipient::new(
            text("shipToFirstName")?,
            text("shipToLastName")?,
            text("shipToAddress1")?,
            text("shipToCity")?,
            text("shipToCountry")?,
        );
        Ok(Self {
            order_number: text("orderNumber")?.to_string(),
            landed_cost_transaction_id: text("landedCostTransactionID")?.to_string(),
            ship_to,
            lines: list_of(fields, "ordersInfo", OWNER, OrderLineItem::from_fields)?,
            optional: optional_args(fields, OWNER)?,
        })
    }
}

/// `ConnectOrder`.
pub fn prepare_order(
    settings: &Settings,
    request: &OrderRequest,
) -> Result<PreparedCall, CrossBorderError> {
    let ship_to = &request.ship_to;
    let mut call = CallBuilder::new(Operation::Order, settings)?;
    call.text("orderNumber", &required_key(&request.order_number, "orderNumber", 100)?)?;
    call.text(
        "landedCostTransactionID",
        &required_key(&request.landed_cost_transaction_id, "landedCostTransactionID", 255)?,
    )?;
    call.text("shipToFirstName", &truncate_chars(ship_to.first_name.trim(), 100))?;
    call.text("shipToLastName", &truncate_chars(ship_to.last_name.trim(), 100))?;
    call.text("shipToAddress1", &truncate_chars(ship_to.address1.trim(), 250))?;
    call.text("shipToCity", &truncate_chars(ship_to.city.trim(), 100))?;
    call.text("shipToCountry", &country_or_default(&ship_to.country))?;
    call.items("ordersInfo", &request.lines)?;
    call.spec_fields(&apply_specs(&request.optional, ORDER_OPTIONAL)?)?;
    call.finish()
}

/// A tracking update for the shipments of one order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingUpdateRequest {
    pub order_number: String,
    pub entries: Vec<TrackingEntry>,
}

impl TrackingUpdateRequest {
    pub fn new(order_number: &str, entries: Vec<TrackingEntry>) -> Self {
        Self {
            order_number: order_number.to_string(),
            entries,
        }
    }

    /// Keys `orderNumber`, `trackingList`.
    pub fn from_fields(fields: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "TrackingUpdateRequest";
        Ok(Self {
            order_number: text_of(fields, "orderNumber", OWNER)?.to_string(),
            entries: list_of(fields, "trackingList", OWNER, TrackingEntry::from_fields)?,
        })
    }
}

/// `ConnectOrderTrackingUpdate`.
pub fn prepare_tracking_update(
    settings: &Settings,
    request: &TrackingUpdateRequest,
) -> Result<PreparedCall, CrossBorderError> {
    let mut call = CallBuilder::new(Operation::OrderTrackingUpdate, settings)?;
    call.text("orderNumber", &required_key(&request.order_number, "orderNumber", 100)?)?;
    call.items("trackingList", &request.entries)?;
    call.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use rust_decimal_macros::dec;

    fn settings() -> Settings {
        ClientConfig::new("pk").resolve().unwrap()
    }

    #[test]
    fn empty_item_lists_are_rejected() {
        let err = prepare_sku_status(&settings(), &[]).unwrap_err();
        assert!(matches!(err, CrossBorderError::InvalidArgument(_)));
    }

    #[test]
    fn landed_cost_writes_destination_items_then_options() {
        let line = ShipmentLineItem::new("A", 2, dec!(5), "LON").unwrap();
        let request = LandedCostRequest::new("xx", vec![line])
            .optional("service", 1)
            .optional("privateIndividuals", "yes")
            .optional("insuranceFlag", 7);
        let call = prepare_landed_cost(&settings(), &request).unwrap();
        let dest = call.body.find("shipmentDestinationCountry").unwrap();
        let items = call.body.find("<items ").unwrap();
        let service = call.body.find("<service").unwrap();
        assert!(dest < items && items < service);
        assert!(call.body.contains(r#"<shipmentDestinationCountry xsi:type="xsd:string">US</shipmentDestinationCountry>"#));
        assert!(call.body.contains("<itemExportHubCountry>GB</itemExportHubCountry>"));
        assert!(call.body.contains(r#"<privateIndividuals xsi:type="xsd:string">Y</privateIndividuals>"#));
        assert!(!call.body.contains("insuranceFlag"));
        assert_eq!(call.request.text("partnerKey"), Some("pk"));
    }

    #[test]
    fn order_remove_requires_number() {
        assert!(prepare_order_remove(&settings(), "  ").is_err());
        let call = prepare_order_remove(&settings(), "ORD-1").unwrap();
        assert!(call.body.ends_with(r#"<orderNumber xsi:type="xsd:string">ORD-1</orderNumber>"#));
    }

    #[test]
    fn order_from_fields() {
        let json = r#"{
            "orderNumber": "ORD-9",
            "landedCostTransactionID": "LC-1",
            "shipToFirstName": "Ada",
            "shipToLastName": "Lovelace",
            "shipToAddress1": "1 Main St",
            "shipToCity": "London",
            "shipToCountry": "gb",
            "ordersInfo": [{"id": "A", "quantity": 1, "price": 10, "currency": "GBP",
                            "optionalArgs": {"carrier": "DHL"}}],
            "optionalArgs": {"dutyPaid": true, "shipToPhone": "555"}
        }"#;
        let fields: Fields = serde_json::from_str(json).unwrap();
        let request = OrderRequest::from_fields(&fields).unwrap();
        let call = prepare_order(&settings(), &request).unwrap();
        assert!(call.body.contains(r#"<shipToCountry xsi:type="xsd:string">GB</shipToCountry>"#));
        assert!(call.body.contains("<carrier>3</carrier>"));
        assert!(call.body.contains(r#"<dutyPaid xsi:type="xsd:int">1</dutyPaid>"#));
        assert!(call.body.contains(r#"soapenc:arrayType="v4:OrderInformation[]""#));
    }

    #[test]
    fn order_from_fields_rejects_wrong_kinds() {
        let fields = Fields::new().with("orderNumber", 5);
        assert!(OrderRequest::from_fields(&fields).is_err());
    }

    #[test]
    fn tracking_update_joins_carriers() {
        let request = TrackingUpdateRequest::new(
            "ORD-1",
            vec![TrackingEntry::new("A", 1, "1Z999", "UPS,FedEx,bogus")],
        );
        let call = prepare_tracking_update(&settings(), &request).unwrap();
        assert!(call.body.contains("<carrier>1,2,6</carrier>"));
        assert!(call.body.contains(r#"<trackingList xsi:type="v4:ArrayOfTrackingList""#));
    }
}
