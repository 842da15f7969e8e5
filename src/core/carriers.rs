//! Carrier name to service carrier code mapping.
//!
//! Codes: 1 UPS, 2 FedEx, 3 DHL, 4 USPS, 5 EMS, 6 Other.

/// Code used for any carrier the service does not know.
pub const OTHER_CARRIER: u8 = 6;

static CARRIERS: &[(&str, u8)] = &[
    ("UPS", 1),
    ("FedEx", 2),
    ("DHL", 3),
    ("USPS", 4),
    ("EMS", 5),
    ("Other", OTHER_CARRIER),
];

/// Carrier names and their codes.
pub fn carriers() -> &'static [(&'static str, u8)] {
    CARRIERS
}

/// Code for a carrier name (case-insensitive), [`OTHER_CARRIER`] when unknown.
pub fn carrier_code(name: &str) -> u8 {
    let name = name.trim();
    CARRIERS
        .iter()
        .find(|(carrier, _)| carrier.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
        .unwrap_or(OTHER_CARRIER)
}

/// Clamp a numeric carrier code into the valid range.
pub fn carrier_from_number(code: i64) -> u8 {
    match u8::try_from(code) {
        Ok(c @ 1..=6) => c,
        _ => OTHER_CARRIER,
    }
}

/// Resolve one carrier token: a number is range-checked, anything else is
/// looked up by name.
pub fn resolve_carrier(token: &str) -> u8 {
    match token.trim().parse::<i64>() {
        Ok(n) => carrier_from_number(n),
        Err(_) => carrier_code(token),
    }
}

/// Resolve a comma-separated carrier list. Always yields at least one code.
pub fn resolve_carrier_csv(csv: &str) -> Vec<u8> {
    csv.split(',').map(resolve_carrier).collect()
}

/// Render codes the way the service expects them (`"1,2,6"`).
pub fn join_carriers(codes: &[u8]) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
