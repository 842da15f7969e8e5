//! Export hub facilities and the country each one ships from.

use serde::Serialize;

use super::value::normalize_code;

/// An export facility and its country of departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportHub {
    /// Three-letter facility code.
    pub facility: &'static str,
    /// Two-letter country code.
    pub country: &'static str,
}

static EXPORT_HUBS: &[ExportHub] = &[
    ExportHub { facility: "TPA", country: "US" },
    ExportHub { facility: "LGB", country: "US" },
    ExportHub { facility: "BRU", country: "BE" },
    ExportHub { facility: "LON", country: "GB" },
    ExportHub { facility: "LIM", country: "PE" },
];

/// All export hubs.
pub fn export_hubs() -> &'static [ExportHub] {
    EXPORT_HUBS
}

/// Country served by a facility code, or `None` if the facility is unknown.
///
/// The code is trimmed, cut to three characters and uppercased before
/// lookup, so `"Brussels"` resolves as `BRU`.
pub fn hub_country(facility: &str) -> Option<&'static str> {
    let facility = normalize_code(facility, 3);
    EXPORT_HUBS
        .iter()
        .find(|hub| hub.facility == facility)
        .map(|hub| hub.country)
}
