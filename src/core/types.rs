//! Request records: one per array item shape the service accepts.
//!
//! Every record normalizes on construction: strings are cut to their wire
//! width, money is pinned to 4 decimals, and reference codes that fail
//! lookup are replaced by their defaults. Only structural problems (a
//! required key of the wrong kind, a carton with no measurements) fail.

use rust_decimal::Decimal;
use serde::Serialize;

use super::carriers::{
    OTHER_CARRIER, carrier_from_number, join_carriers, resolve_carrier, resolve_carrier_csv,
};
use super::countries::is_valid_country;
use super::currencies::is_valid_currency;
use super::error::CrossBorderError;
use super::hubs::hub_country;
use super::rules::{DEFAULT_COUNTRY, DEFAULT_CURRENCY, FieldSpec, Rule, apply_specs};
use super::value::{FieldValue, Fields, normalize_code, required_fixed4, truncate_chars};
use crate::soap::{SoapItem, XmlWriter};

/// Carton measurements: inches and pounds, 4 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartonDimensions {
    /// Length (`l`), 4 decimals.
    pub length: Option<Decimal>,
    /// Width (`w`), 4 decimals.
    pub width: Option<Decimal>,
    /// Height (`h`), 4 decimals.
    pub height: Option<Decimal>,
    /// Weight (`wt`), 4 decimals.
    pub weight: Option<Decimal>,
}

impl CartonDimensions {
    /// Requires all three dimensions, or the weight, or both.
    pub fn new(
        length: Option<Decimal>,
        width: Option<Decimal>,
        height: Option<Decimal>,
        weight: Option<Decimal>,
    ) -> Result<Self, CrossBorderError> {
        let has_dimensions = length.is_some() && width.is_some() && height.is_some();
        if !has_dimensions && weight.is_none() {
            return Err(CrossBorderError::invalid(
                "CartonDimensions requires length, width and height, or weight",
            ));
        }
        let measure = |value: Option<Decimal>, name: &str| {
            value.map(|v| required_fixed4(v, name)).transpose()
        };
        Ok(Self {
            length: measure(length, "l")?,
            width: measure(width, "w")?,
            height: measure(height, "h")?,
            weight: measure(weight, "wt")?,
        })
    }

    /// Weight only.
    pub fn weight(weight: Decimal) -> Result<Self, CrossBorderError> {
        Ok(Self {
            length: None,
            width: None,
            height: None,
            weight: Some(required_fixed4(weight, "wt")?),
        })
    }

    /// Build from a map with keys `l`, `w`, `h`, `wt` (either case).
    pub fn from_fields(fields: &Fields) -> Result<Self, CrossBorderError> {
        let measure = |key: &str| -> Result<Option<Decimal>, CrossBorderError> {
            let value = fields
                .get(key)
                .or_else(|| fields.get(&key.to_ascii_uppercase()));
            match value {
                None => Ok(None),
                Some(v) => v.as_decimal().map(Some).ok_or_else(|| {
                    CrossBorderError::invalid(format!("carton field '{key}' must be numeric"))
                }),
            }
        };
        Self::new(measure("l")?, measure("w")?, measure("h")?, measure("wt")?)
    }
}

impl SoapItem for CartonDimensions {
    const SCHEMA: &'static str = "CartonsDat";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        [
            ("l", self.length),
            ("w", self.width),
            ("h", self.height),
            ("wt", self.weight),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|d| (name, FieldValue::Decimal(d))))
        .collect()
    }
}

/// Optional arguments of a product info entry. Keys double as wire names.
const PRODUCT_INFO_OPTIONAL: &[FieldSpec] = &[
    FieldSpec::new("productName", Rule::StringMax(255)),
    FieldSpec::new("url", Rule::StringMax(255)),
    FieldSpec::new("imageUrl", Rule::StringMax(255)),
    FieldSpec::new("hsCode", Rule::StringMax(10)),
    FieldSpec::new("eccn", Rule::StringMax(15)),
    FieldSpec::new("hazFlag", Rule::IntBool).or(0),
    FieldSpec::new("licenseFlag", Rule::CsvCountryList),
    FieldSpec::new("importFlag", Rule::CsvCountryList),
    FieldSpec::new("productType", Rule::StringMax(255)),
];

/// One product of a `ConnectProductInfo` request (`ProductInfoDat`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInfoEntry {
    /// Merchant SKU, at most 255 characters.
    pub product_id: String,
    /// Catalog description, at most 245 characters.
    pub description: String,
    /// Unit price, 4 decimals.
    pub price: Decimal,
    /// Currency of `price`; unknown codes become `USD`.
    pub valuation_currency: String,
    /// Country of the export hub the item ships from.
    pub export_hub_country: String,
    /// Country of manufacture; unknown codes become `US`.
    pub country_of_origin: String,
    /// Shipping carton measurements.
    pub cartons: CartonDimensions,
    optional: Vec<(&'static str, FieldValue)>,
}

impl ProductInfoEntry {
    /// `optional` may carry `productName`, `url`, `imageUrl`, `hsCode`,
    /// `eccn`, `hazFlag`, `licenseFlag`, `importFlag` and `productType`.
    /// Unknown keys and unusable values are ignored.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        description: &str,
        price: Decimal,
        currency: &str,
        export_hub: &str,
        origin: &str,
        cartons: CartonDimensions,
        optional: &Fields,
    ) -> Result<Self, CrossBorderError> {
        let optional = apply_specs(optional, PRODUCT_INFO_OPTIONAL)?
            .into_iter()
            .map(|(spec, value)| (spec.wire, value))
            .collect();
        Ok(Self {
            product_id: truncate_chars(id, 255),
            description: truncate_chars(description, 245),
            price: required_fixed4(price, "price")?,
            valuation_currency: currency_or_default(currency),
            export_hub_country: hub_country(export_hub)
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string(),
            country_of_origin: country_or_default(origin),
            cartons,
            optional,
        })
    }

    /// Build from caller data with keys `id`, `description`, `price`,
    /// `currency`, `exportHub`, `origin`, `itemInformation` (carton map) and
    /// `optionalArgs`.
    pub fn from_fields(item: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "ProductInfoEntry";
        let cartons = match item.get("itemInformation") {
            Some(FieldValue::Map(carton)) => CartonDimensions::from_fields(carton)?,
            Some(_) => {
                return Err(CrossBorderError::invalid(
                    "ProductInfoEntry itemInformation must be a map",
                ));
            }
            None => CartonDimensions::from_fields(&Fields::new())?,
        };
        Self::new(
            required_text(item, "id", OWNER)?,
            required_text(item, "description", OWNER)?,
            required_price(item, "price", OWNER)?,
            required_text(item, "currency", OWNER)?,
            required_text(item, "exportHub", OWNER)?,
            required_text(item, "origin", OWNER)?,
            cartons,
            &optional_map(item, "optionalArgs", OWNER)?,
        )
    }

    /// An optional field as it will be sent, by wire name.
    pub fn optional(&self, wire: &str) -> Option<&FieldValue> {
        self.optional
            .iter()
            .find(|(name, _)| *name == wire)
            .map(|(_, v)| v)
    }

    /// Hazardous-material flag (0 or 1).
    pub fn hazard_flag(&self) -> i64 {
        self.optional("hazFlag")
            .and_then(FieldValue::as_int)
            .unwrap_or(0)
    }
}

impl SoapItem for ProductInfoEntry {
    const SCHEMA: &'static str = "ProductInfoDat";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = vec![
            ("productID", FieldValue::from(self.product_id.as_str())),
            ("description", self.description.as_str().into()),
            ("price", self.price.into()),
            ("itemValuationCurrency", self.valuation_currency.as_str().into()),
            ("itemExportHubCountry", self.export_hub_country.as_str().into()),
            ("countryOfOrigin", self.country_of_origin.as_str().into()),
            ("itemInformation", self.cartons.to_fields().into()),
        ];
        fields.extend(self.optional.iter().cloned());
        fields
    }

    fn write_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), CrossBorderError> {
        let xsi_type = format!("v4:{}", Self::SCHEMA);
        w.start_element_with_attrs(tag, &[("xsi:type", xsi_type.as_str())])?;
        for (name, value) in self.wire_fields() {
            if name == "itemInformation" {
                self.cartons.write_xml(w, name)?;
            } else {
                w.text_element(name, &value.to_string())?;
            }
        }
        w.end_element(tag)?;
        Ok(())
    }
}

/// One product of a `ConnectLandedCost` request (`ProductInfo`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentLineItem {
    /// Merchant SKU, at most 255 characters.
    pub product_id: String,
    /// Units in the basket.
    pub quantity: u32,
    /// Unit price, 4 decimals.
    pub price: Decimal,
    /// Country of the export hub the item ships from.
    pub export_hub_country: String,
}

impl ShipmentLineItem {
    pub fn new(
        id: &str,
        quantity: u32,
        price: Decimal,
        export_hub: &str,
    ) -> Result<Self, CrossBorderError> {
        Ok(Self {
            product_id: truncate_chars(id, 255),
            quantity,
            price: required_fixed4(price, "price")?,
            export_hub_country: hub_country(export_hub)
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string(),
        })
    }

    /// Keys `id`, `quantity`, `price`, `exportHub`.
    pub fn from_fields(item: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "ShipmentLineItem";
        Self::new(
            required_text(item, "id", OWNER)?,
            required_quantity(item, "quantity", OWNER)?,
            required_price(item, "price", OWNER)?,
            required_text(item, "exportHub", OWNER)?,
        )
    }
}

impl SoapItem for ShipmentLineItem {
    const SCHEMA: &'static str = "ProductInfo";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("productID", self.product_id.as_str().into()),
            ("quantity", self.quantity.into()),
            ("price", self.price.into()),
            ("itemExportHubCountry", self.export_hub_country.as_str().into()),
        ]
    }
}

const ORDER_LINE_OPTIONAL: &[FieldSpec] = &[
    FieldSpec::renamed("exportHub", "itemExportHubCountry", Rule::ExportHub),
    FieldSpec::new("carrier", Rule::CarrierCode),
    FieldSpec::new("trackingNumber", Rule::StringMax(100)),
];

/// One line of a `ConnectOrder` request (`OrderInformation`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineItem {
    /// Merchant SKU, at most 255 characters.
    pub product_id: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price, 4 decimals.
    pub price: Decimal,
    /// Currency of `price`; unknown codes become `USD`.
    pub valuation_currency: String,
    optional: Vec<(&'static str, FieldValue)>,
}

impl OrderLineItem {
    /// `optional` may carry `exportHub`, `carrier` and `trackingNumber`.
    pub fn new(
        id: &str,
        quantity: u32,
        price: Decimal,
        currency: &str,
        optional: &Fields,
    ) -> Result<Self, CrossBorderError> {
        let optional = apply_specs(optional, ORDER_LINE_OPTIONAL)?
            .into_iter()
            .map(|(spec, value)| (spec.wire, value))
            .collect();
        Ok(Self {
            product_id: truncate_chars(id, 255),
            quantity,
            price: required_fixed4(price, "price")?,
            valuation_currency: currency_or_default(currency),
            optional,
        })
    }

    /// Keys `id`, `quantity`, `price`, `currency`, `optionalArgs`.
    pub fn from_fields(item: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "OrderLineItem";
        Self::new(
            required_text(item, "id", OWNER)?,
            required_quantity(item, "quantity", OWNER)?,
            required_price(item, "price", OWNER)?,
            required_text(item, "currency", OWNER)?,
            &optional_map(item, "optionalArgs", OWNER)?,
        )
    }

    pub fn export_hub_country(&self) -> Option<&str> {
        self.optional("itemExportHubCountry")
            .and_then(FieldValue::as_str)
    }

    pub fn carrier(&self) -> Option<u8> {
        self.optional("carrier")
            .and_then(FieldValue::as_int)
            .map(carrier_from_number)
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.optional("trackingNumber").and_then(FieldValue::as_str)
    }

    fn optional(&self, wire: &str) -> Option<&FieldValue> {
        self.optional
            .iter()
            .find(|(name, _)| *name == wire)
            .map(|(_, v)| v)
    }
}

impl SoapItem for OrderLineItem {
    const SCHEMA: &'static str = "OrderInformation";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = vec![
            ("productID", FieldValue::from(self.product_id.as_str())),
            ("quantity", self.quantity.into()),
            ("price", self.price.into()),
            ("orderValuationCurrency", self.valuation_currency.as_str().into()),
        ];
        fields.extend(self.optional.iter().cloned());
        fields
    }
}

/// Carrier argument of a tracking entry: a code, a name or comma-separated
/// list of names/codes, or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum CarrierInput {
    Code(i64),
    Text(String),
    List(Vec<String>),
}

impl CarrierInput {
    /// Resolve to one or more codes in 1..=6.
    pub fn resolve(&self) -> Vec<u8> {
        let codes: Vec<u8> = match self {
            CarrierInput::Code(code) => vec![carrier_from_number(*code)],
            CarrierInput::Text(text) => resolve_carrier_csv(text),
            CarrierInput::List(items) => items.iter().map(|i| resolve_carrier(i)).collect(),
        };
        if codes.is_empty() {
            vec![OTHER_CARRIER]
        } else {
            codes
        }
    }
}

impl From<i64> for CarrierInput {
    fn from(value: i64) -> Self {
        Self::Code(value)
    }
}

impl From<i32> for CarrierInput {
    fn from(value: i32) -> Self {
        Self::Code(i64::from(value))
    }
}

impl From<&str> for CarrierInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CarrierInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<&str>> for CarrierInput {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for CarrierInput {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl TryFrom<&FieldValue> for CarrierInput {
    type Error = CrossBorderError;

    fn try_from(value: &FieldValue) -> Result<Self, Self::Error> {
        match value {
            FieldValue::Text(s) => Ok(Self::Text(s.clone())),
            FieldValue::List(items) => Ok(Self::List(items.iter().map(|i| i.to_string()).collect())),
            other => other.as_int().map(Self::Code).ok_or_else(|| {
                CrossBorderError::invalid("carrier must be a code, a name or a list")
            }),
        }
    }
}

/// One shipment of a `ConnectOrderTrackingUpdate` request (`TrackingList`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingEntry {
    /// Merchant SKU, at most 255 characters.
    pub product_id: String,
    /// Units covered by this tracking number.
    pub quantity: u32,
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier codes in 1..=6, never empty.
    pub carriers: Vec<u8>,
}

impl TrackingEntry {
    pub fn new(
        id: &str,
        quantity: u32,
        tracking_number: &str,
        carrier: impl Into<CarrierInput>,
    ) -> Self {
        Self {
            product_id: truncate_chars(id, 255),
            quantity,
            tracking_number: truncate_chars(tracking_number, 255),
            carriers: carrier.into().resolve(),
        }
    }

    /// Keys `id`, `quantity`, `trackingNumber`, `carrier`.
    pub fn from_fields(item: &Fields) -> Result<Self, CrossBorderError> {
        const OWNER: &str = "TrackingEntry";
        let tracking_number = match item.get("trackingNumber") {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(FieldValue::Int(i)) => i.to_string(),
            _ => {
                return Err(CrossBorderError::invalid(format!(
                    "{OWNER} requires 'trackingNumber'"
                )));
            }
        };
        let carrier = item
            .get("carrier")
            .ok_or_else(|| CrossBorderError::invalid(format!("{OWNER} requires 'carrier'")))
            .and_then(CarrierInput::try_from)?;
        Ok(Self::new(
            required_text(item, "id", OWNER)?,
            required_quantity(item, "quantity", OWNER)?,
            &tracking_number,
            carrier,
        ))
    }

    /// Carrier codes as sent, e.g. `"1,2,6"`.
    pub fn carrier_string(&self) -> String {
        join_carriers(&self.carriers)
    }
}

impl SoapItem for TrackingEntry {
    const SCHEMA: &'static str = "TrackingList";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("productID", self.product_id.as_str().into()),
            ("quantity", self.quantity.into()),
            ("trackingNumber", self.tracking_number.as_str().into()),
            ("carrier", self.carrier_string().into()),
        ]
    }
}

/// A bare product reference (`ProductsIdDat`), used by `ConnectSkuStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductIdEntry {
    /// Merchant SKU, at most 255 characters.
    pub product_id: String,
}

impl ProductIdEntry {
    pub fn new(id: &str) -> Self {
        Self {
            product_id: truncate_chars(id, 255),
        }
    }

    /// Key `id`.
    pub fn from_fields(item: &Fields) -> Result<Self, CrossBorderError> {
        Ok(Self::new(required_text(item, "id", "ProductIdEntry")?))
    }
}

impl SoapItem for ProductIdEntry {
    const SCHEMA: &'static str = "ProductsIdDat";

    fn wire_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![("productID", self.product_id.as_str().into())]
    }
}

/// Uppercase/truncate a currency, falling back to USD when unknown.
pub fn currency_or_default(code: &str) -> String {
    let code = normalize_code(code, 3);
    if is_valid_currency(&code) {
        code
    } else {
        DEFAULT_CURRENCY.to_string()
    }
}

/// Uppercase/truncate a country, falling back to US when unknown.
pub fn country_or_default(code: &str) -> String {
    let code = normalize_code(code, 2);
    if is_valid_country(&code) {
        code
    } else {
        DEFAULT_COUNTRY.to_string()
    }
}

pub(crate) fn required_text<'a>(
    fields: &'a Fields,
    key: &str,
    owner: &str,
) -> Result<&'a str, CrossBorderError> {
    fields
        .text(key)
        .ok_or_else(|| CrossBorderError::invalid(format!("{owner} requires '{key}' as a string")))
}

pub(crate) fn required_price(
    fields: &Fields,
    key: &str,
    owner: &str,
) -> Result<Decimal, CrossBorderError> {
    match fields.get(key) {
        Some(FieldValue::Decimal(d)) => Ok(*d),
        Some(FieldValue::Int(i)) => Ok(Decimal::from(*i)),
        _ => Err(CrossBorderError::invalid(format!(
            "{owner} requires '{key}' as a number"
        ))),
    }
}

pub(crate) fn required_quantity(
    fields: &Fields,
    key: &str,
    owner: &str,
) -> Result<u32, CrossBorderError> {
    fields
        .get(key)
        .filter(|v| !matches!(v, FieldValue::Bool(_)))
        .and_then(FieldValue::as_int)
        .and_then(|q| u32::try_from(q).ok())
        .ok_or_else(|| {
            CrossBorderError::invalid(format!(
                "{owner} requires '{key}' as a non-negative integer"
            ))
        })
}

pub(crate) fn optional_map(
    fields: &Fields,
    key: &str,
    owner: &str,
) -> Result<Fields, CrossBorderError> {
    match fields.get(key) {
        None => Ok(Fields::new()),
        Some(FieldValue::Map(map)) => Ok(map.clone()),
        Some(_) => Err(CrossBorderError::invalid(format!(
            "{owner} '{key}' must be a map"
        ))),
    }
}
