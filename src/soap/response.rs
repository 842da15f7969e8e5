//! Response interpretation: locate the result node, surface service errors,
//! and copy the per-operation fields and rows into a [`NormalizedResult`].

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::Operation;
use super::tree::XmlElement;
use crate::core::{CrossBorderError, FieldSpec, FieldValue, Fields, Rule, apply_specs, fixed4};

/// Walk `Envelope/Body/<Op>Response/return`, matching by local name so the
/// server's namespace prefixes do not matter.
///
/// # Errors
///
/// `Fault` when the body holds a SOAP fault, `UnexpectedResponse` when any
/// step of the path is missing.
pub fn locate_result(envelope: &XmlElement, op: Operation) -> Result<&XmlElement, CrossBorderError> {
    if envelope.local_name() != "Envelope" {
        return Err(CrossBorderError::UnexpectedResponse(format!(
            "expected a SOAP Envelope, found <{}>",
            envelope.name
        )));
    }
    let body = envelope
        .child("Body")
        .ok_or_else(|| CrossBorderError::UnexpectedResponse("envelope has no Body".into()))?;

    if let Some(fault) = body.child("Fault") {
        let code = fault.get("faultcode").unwrap_or_default().to_string();
        let message = fault.get("faultstring").unwrap_or_default().to_string();
        warn!(operation = %op, %code, %message, "service returned a SOAP fault");
        return Err(CrossBorderError::Fault { code, message });
    }

    let element = op.response_element();
    body.child(&element)
        .ok_or_else(|| CrossBorderError::UnexpectedResponse(format!("body has no {element}")))?
        .child("return")
        .ok_or_else(|| CrossBorderError::UnexpectedResponse(format!("{element} has no return")))
}

/// Fields copied from a successful result, per operation.
pub fn response_fields(op: Operation) -> &'static [FieldSpec] {
    const LANDED_COST: &[FieldSpec] = &[
        FieldSpec::new("dutyCost", Rule::Float4),
        FieldSpec::new("taxCost", Rule::Float4),
        FieldSpec::new("shippingCost", Rule::Float4),
        FieldSpec::new("insuranceCost", Rule::Float4),
        FieldSpec::new("ddpAvailable", Rule::Int),
        FieldSpec::new("landedCostTransactionId", Rule::String),
        FieldSpec::new("orderValuationCurrencyCode", Rule::ValidCurrency),
        FieldSpec::new("orderValuationCurrencyExchangeRate", Rule::String),
        FieldSpec::new("requestedCostReturnedCurrencyCode", Rule::ValidCurrency),
        FieldSpec::new("requestedCostReturnedCurrencyExchangeRate", Rule::String),
    ];
    const ORDER: &[FieldSpec] = &[FieldSpec::new("orderNumber", Rule::StringMax(100))];

    match op {
        Operation::LandedCost => LANDED_COST,
        Operation::Order => ORDER,
        _ => &[],
    }
}

/// How the rows under `items` are bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Generic,
    LandedCost,
    SkuStatus,
}

impl RowKind {
    pub fn for_operation(op: Operation) -> Self {
        match op {
            Operation::LandedCost => RowKind::LandedCost,
            Operation::SkuStatus => RowKind::SkuStatus,
            _ => RowKind::Generic,
        }
    }
}

/// The result rows of one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultItems {
    LandedCost(Vec<LandedCostItemResult>),
    SkuStatus(Vec<SkuStatusResult>),
    Generic(Vec<Fields>),
}

impl ResultItems {
    pub fn len(&self) -> usize {
        match self {
            ResultItems::LandedCost(rows) => rows.len(),
            ResultItems::SkuStatus(rows) => rows.len(),
            ResultItems::Generic(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A successful, normalized response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub error_code: i64,
    pub error_message: String,
    pub error_detail: String,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ResultItems>,
}

impl NormalizedResult {
    /// An operation-specific field by wire name.
    pub fn get(&self, wire: &str) -> Option<&FieldValue> {
        self.fields.get(wire)
    }

    pub fn landed_cost_items(&self) -> Option<&[LandedCostItemResult]> {
        match &self.items {
            Some(ResultItems::LandedCost(rows)) => Some(rows),
            _ => None,
        }
    }

    pub fn sku_statuses(&self) -> Option<&[SkuStatusResult]> {
        match &self.items {
            Some(ResultItems::SkuStatus(rows)) => Some(rows),
            _ => None,
        }
    }
}

/// Interpret a located result node.
///
/// # Errors
///
/// `Service` for a non-zero error code (no partial result is produced),
/// `UnexpectedResponse` for a non-numeric one.
pub fn normalize(op: Operation, result: &XmlElement) -> Result<NormalizedResult, CrossBorderError> {
    let error_code = match result.get("error").map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            CrossBorderError::UnexpectedResponse(format!("non-numeric error code '{raw}'"))
        })?,
    };
    let error_message = result.get("errorMessage").unwrap_or_default().to_string();

    if error_code != 0 {
        warn!(operation = %op, code = error_code, message = %error_message, "service reported an error");
        return Err(CrossBorderError::Service {
            code: error_code,
            message: (!error_message.is_empty()).then_some(error_message),
        });
    }

    let source = result.to_fields();
    let mut fields = Fields::new();
    for (spec, value) in apply_specs(&source, response_fields(op))? {
        fields.insert(spec.wire, value);
    }

    let items = match result.child("items") {
        None => None,
        Some(rows) => Some(match RowKind::for_operation(op) {
            RowKind::LandedCost => ResultItems::LandedCost(bind_rows(rows)?),
            RowKind::SkuStatus => ResultItems::SkuStatus(bind_rows(rows)?),
            RowKind::Generic => ResultItems::Generic(copy_rows(rows)),
        }),
    };

    debug!(
        operation = %op,
        fields = fields.len(),
        rows = items.as_ref().map_or(0, ResultItems::len),
        "normalized response"
    );

    Ok(NormalizedResult {
        error_code,
        error_message,
        error_detail: result.get("errorMessageDetail").unwrap_or_default().to_string(),
        fields,
        items,
    })
}

/// Values bound from one response row, keyed by wire name.
#[derive(Debug, Clone, Default)]
pub struct RowSlots(Fields);

impl RowSlots {
    pub fn text(&self, wire: &str) -> String {
        self.0
            .get(wire)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn int(&self, wire: &str) -> i64 {
        self.0.get(wire).and_then(FieldValue::as_int).unwrap_or(0)
    }

    pub fn decimal(&self, wire: &str) -> Decimal {
        self.0
            .get(wire)
            .and_then(FieldValue::as_decimal)
            .and_then(fixed4)
            .unwrap_or(Decimal::new(0, 4))
    }
}

/// A row type bound from `<item>` elements through a field table.
pub trait ResponseRow: Sized {
    /// Schema type name of the row, e.g. `LandedProduct`.
    const SCHEMA: &'static str;
    /// Wire field to slot binding, in slot order.
    const BINDING: &'static [FieldSpec];

    fn from_slots(slots: RowSlots) -> Self;
}

/// Whether a row's `xsi:type`, when present, names schema `R`.
pub fn row_matches_schema<R: ResponseRow>(item: &XmlElement) -> bool {
    item.attribute("type")
        .is_none_or(|t| t.rsplit(':').next() == Some(R::SCHEMA))
}

/// Bind every `<item>` under `items` as `R`. Rows typed as another schema
/// are still bound by wire name, with a warning.
pub fn bind_rows<R: ResponseRow>(items: &XmlElement) -> Result<Vec<R>, CrossBorderError> {
    items
        .children_named("item")
        .map(|item| -> Result<R, CrossBorderError> {
            if !row_matches_schema::<R>(item) {
                warn!(
                    expected = R::SCHEMA,
                    found = item.attribute("type").unwrap_or_default(),
                    "response row has an unexpected schema type"
                );
            }
            let source = item.to_fields();
            let mut slots = Fields::new();
            for (spec, value) in apply_specs(&source, R::BINDING)? {
                slots.insert(spec.wire, value);
            }
            Ok(R::from_slots(RowSlots(slots)))
        })
        .collect()
}

/// Copy every `<item>` under `items` into a plain map. Type attributes are
/// dropped.
pub fn copy_rows(items: &XmlElement) -> Vec<Fields> {
    items.children_named("item").map(XmlElement::to_fields).collect()
}

/// One product of a landed cost quote (`LandedProduct`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandedCostItemResult {
    pub error_message: String,
    #[serde(rename = "productID")]
    pub product_id: String,
    pub item_export_hub_country: String,
    pub order_valuation_currency_code: String,
    pub calculated: i64,
    pub duty_cost: Decimal,
    pub tax_cost: Decimal,
    pub ddp_available: i64,
}

impl ResponseRow for LandedCostItemResult {
    const SCHEMA: &'static str = "LandedProduct";
    const BINDING: &'static [FieldSpec] = &[
        FieldSpec::new("errorMessage", Rule::String),
        FieldSpec::new("productID", Rule::StringMax(255)),
        FieldSpec::new("itemExportHubCountry", Rule::StringMax(2)),
        FieldSpec::new("orderValuationCurrencyCode", Rule::StringMax(3)),
        FieldSpec::new("calculated", Rule::Int).or(0),
        FieldSpec::new("dutyCost", Rule::Float4).or(0),
        FieldSpec::new("taxCost", Rule::Float4).or(0),
        FieldSpec::new("ddpAvailable", Rule::Int).or(0),
    ];

    fn from_slots(slots: RowSlots) -> Self {
        Self {
            error_message: slots.text("errorMessage"),
            product_id: slots.text("productID"),
            item_export_hub_country: slots.text("itemExportHubCountry"),
            order_valuation_currency_code: slots.text("orderValuationCurrencyCode"),
            calculated: slots.int("calculated"),
            duty_cost: slots.decimal("dutyCost"),
            tax_cost: slots.decimal("taxCost"),
            ddp_available: slots.int("ddpAvailable"),
        }
    }
}

/// Catalog status of one SKU (`SkuStatusDat`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuStatusResult {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub sku_hs_code: String,
    pub product_status: String,
}

impl ResponseRow for SkuStatusResult {
    const SCHEMA: &'static str = "SkuStatusDat";
    const BINDING: &'static [FieldSpec] = &[
        FieldSpec::new("productID", Rule::StringMax(255)),
        FieldSpec::new("skuHsCode", Rule::StringMax(10)),
        FieldSpec::new("productStatus", Rule::String),
    ];

    fn from_slots(slots: RowSlots) -> Self {
        Self {
            product_id: slots.text("productID"),
            sku_hs_code: slots.text("skuHsCode"),
            product_status: slots.text("productStatus"),
        }
    }
}

/// The envelope with its Body removed, as JSON.
pub fn soap_header_json(envelope: &XmlElement) -> Result<serde_json::Value, CrossBorderError> {
    let mut header = envelope.clone();
    header.children.retain(|c| c.local_name() != "Body");
    serde_json::to_value(&header).map_err(|e| CrossBorderError::Xml(e.to_string()))
}
