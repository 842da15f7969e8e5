//! Country reference table used by the service.
//!
//! Two-character codes as the service accepts them. Most are ISO 3166-1
//! alpha-2, a handful are service-specific pseudo-codes for territories
//! (e.g. `1A` Barbuda, `X2` Canary Islands). The attached currency is the
//! one the service associates with the destination, not necessarily the
//! legal tender.

use serde::Serialize;

/// One entry of the country table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Two-character country code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Three-letter currency code, if the service lists one.
    pub currency: Option<&'static str>,
}

impl Country {
    const fn new(code: &'static str, name: &'static str, currency: Option<&'static str>) -> Self {
        Self {
            code,
            name,
            currency,
        }
    }
}

/// Look up a country by its exact (uppercase) code.
pub fn country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code == code)
}

/// Check whether `code` is in the country table. Matching is exact:
/// callers normalize case and width first.
pub fn is_valid_country(code: &str) -> bool {
    country(code).is_some()
}

/// All countries known to the service, in the service's listing order.
pub fn countries() -> &'static [Country] {
    COUNTRIES
}

static COUNTRIES: &[Country] = &[
    Country::new("AF", "Afghanistan", Some("AFN")),
    Country::new("AL", "Albania", Some("ALL")),
    Country::new("DZ", "Algeria", Some("DZD")),
    Country::new("AS", "American Samoa", Some("USD")),
    Country::new("AD", "Andorra", Some("EUR")),
    Country::new("AO", "Angola", Some("AOA")),
    Country::new("AI", "Anguilla", Some("XCD")),
    Country::new("AG", "Antigua", Some("XCD")),
    Country::new("AR", "Argentina", Some("ARS")),
    Country::new("AM", "Armenia", Some("AMD")),
    Country::new("AW", "Aruba", Some("AWG")),
    Country::new("AU", "Australia", Some("AUD")),
    Country::new("AT", "Austria", Some("EUR")),
    Country::new("AZ", "Azerbaijan", Some("AZN")),
    Country::new("1F", "Azores (Portugal)", Some("EUR")),
    Country::new("BS", "Bahamas", Some("BSD")),
    Country::new("BH", "Bahrain", Some("BHD")),
    Country::new("BD", "Bangladesh", Some("BDT")),
    Country::new("BB", "Barbados", Some("BBD")),
    Country::new("1A", "Barbuda", Some("XCD")),
    Country::new("BY", "Belarus", Some("EUR")),
    Country::new("BE", "Belgium", Some("EUR")),
    Country::new("BZ", "Belize", Some("BZD")),
    Country::new("BJ", "Benin", Some("XAF")),
    Country::new("BM", "Bermuda", Some("BMD")),
    Country::new("BT", "Bhutan", Some("BTN")),
    Country::new("BO", "Bolivia", Some("BOB")),
    Country::new("X1", "Bonaire", None),
    Country::new("BA", "Bosnia and Herzegovina", Some("BHD")),
    Country::new("BW", "Botswana", Some("BWP")),
    Country::new("BR", "Brazil", Some("BRL")),
    Country::new("BN", "Brunei", Some("BND")),
    Country::new("BG", "Bulgaria", Some("BGN")),
    Country::new("BF", "Burkina Faso", Some("XAF")),
    Country::new("BI", "Burundi", Some("BIF")),
    Country::new("KH", "Cambodia", Some("KHR")),
    Country::new("CM", "Cameroon", Some("XAF")),
    Country::new("CA", "Canada", Some("CAD")),
    Country::new("X2", "Canary Islands", Some("EUR")),
    Country::new("CV", "Cape Verde", Some("CVE")),
    Country::new("KY", "Cayman Islands", Some("KYD")),
    Country::new("CF", "Central African Republic", Some("XAF")),
    Country::new("TD", "Chad", Some("XAF")),
    Country::new("CL", "Chile", Some("CLP")),
    Country::new("CN", "China", Some("CNY")),
    Country::new("CO", "Colombia", Some("COP")),
    Country::new("MP", "Commonwealth No. Mariana Islands", Some("USD")),
    Country::new("KM", "Comoros Islands", Some("KMF")),
    Country::new("CG", "Congo", Some("XAF")),
    Country::new("CD", "Congo, Democratic Republic", Some("XAF")),
    Country::new("CK", "Cook Islands", Some("NZD")),
    Country::new("CR", "Costa Rica", Some("CRC")),
    Country::new("HR", "Croatia", Some("HRK")),
    Country::new("CW", "Curacao", None),
    Country::new("CY", "Cyprus", Some("EUR")),
    Country::new("CZ", "Czech Republic", Some("CZK")),
    Country::new("DK", "Denmark", Some("DKK")),
    Country::new("DJ", "Djibouti", Some("DJF")),
    Country::new("DM", "Dominica", Some("XCD")),
    Country::new("DO", "Dominican Republic", Some("DOP")),
    Country::new("TP", "East Timor", Some("USD")),
    Country::new("EC", "Ecuador", Some("USD")),
    Country::new("EG", "Egypt", Some("EGP")),
    Country::new("SV", "El Salvador", Some("SVC")),
    Country::new("1D", "England (U.K)", Some("GBP")),
    Country::new("GQ", "Equatorial Guinea", Some("XAF")),
    Country::new("ER", "Eritrea", Some("RUB")),
    Country::new("EE", "Estonia", Some("EEK")),
    Country::new("ET", "Ethiopia", Some("ETB")),
    Country::new("FK", "Falkland Islands", Some("FKP")),
    Country::new("FO", "Faroe Islands", Some("DKK")),
    Country::new("FJ", "Fiji Islands", Some("FJD")),
    Country::new("FI", "Finland", Some("EUR")),
    Country::new("FR", "France", Some("EUR")),
    Country::new("GF", "French Guiana", Some("EUR")),
    Country::new("PF", "French Polynesia", Some("EUR")),
    Country::new("GA", "Gabon", Some("XAF")),
    Country::new("GM", "Gambia", Some("GMD")),
    Country::new("GE", "Georgia", Some("GEL")),
    Country::new("DE", "Germany", Some("EUR")),
    Country::new("GH", "Ghana", Some("GHS")),
    Country::new("GI", "Gibraltar", Some("GBP")),
    Country::new("GR", "Greece", Some("EUR")),
    Country::new("GL", "Greenland", Some("DKK")),
    Country::new("GD", "Grenada", Some("XCD")),
    Country::new("GP", "Guadeloupe", Some("EUR")),
    Country::new("GU", "Guam", Some("USD")),
    Country::new("GT", "Guatemala", Some("GTQ")),
    Country::new("GG", "Guernsey", Some("GBP")),
    Country::new("GN", "Guinea", Some("GNF")),
    Country::new("GW", "Guinea-Bissau", Some("XAF")),
    Country::new("GY", "Guyana", Some("GYD")),
    Country::new("HT", "Haiti", Some("HTG")),
    Country::new("HN", "Honduras", Some("HNL")),
    Country::new("HK", "Hong Kong", Some("HKD")),
    Country::new("HU", "Hungary", Some("HUF")),
    Country::new("IS", "Iceland", Some("ISK")),
    Country::new("IN", "India", Some("INR")),
    Country::new("ID", "Indonesia", Some("IDR")),
    Country::new("IR", "Iran", Some("IRR")),
    Country::new("IQ", "Iraq", Some("IQD")),
    Country::new("1E", "Ireland, Northern (U.K.)", Some("EUR")),
    Country::new("IE", "Ireland, Republic of", Some("EUR")),
    Country::new("IL", "Israel", Some("ILS")),
    Country::new("IT", "Italy", Some("EUR")),
    Country::new("CI", "Ivory Coast", None),
    Country::new("JM", "Jamaica", Some("JMD")),
    Country::new("JP", "Japan", Some("JPY")),
    Country::new("JE", "Jersey", Some("GBP")),
    Country::new("JO", "Jordan", Some("JOD")),
    Country::new("KZ", "Kazakhstan", Some("EUR")),
    Country::new("KE", "Kenya", Some("KES")),
    Country::new("KI", "Kiribati", Some("AUD")),
    Country::new("KR", "Korea, Republic of", Some("KRW")),
    Country::new("KP", "Korea, The D.P.R of (North K.)", Some("KPW")),
    Country::new("KV", "Kosovo", Some("EUR")),
    Country::new("KW", "Kuwait", Some("KWD")),
    Country::new("KG", "Kyrgyzstan", Some("KGS")),
    Country::new("LA", "Laos", Some("LAK")),
    Country::new("LV", "Latvia", Some("EUR")),
    Country::new("LB", "Lebanon", Some("LBP")),
    Country::new("LS", "Lesotho", Some("LSL")),
    Country::new("LR", "Liberia", Some("LRD")),
    Country::new("LY", "Libya", Some("LYD")),
    Country::new("LI", "Liechtenstein", Some("CHF")),
    Country::new("LT", "Lithuania", Some("LTL")),
    Country::new("LU", "Luxembourg", Some("EUR")),
    Country::new("MO", "Macau", Some("MOP")),
    Country::new("MK", "Macedonia", Some("MKD")),
    Country::new("MG", "Madagascar", Some("MYR")),
    Country::new("1G", "Madeira (Portugal)", Some("EUR")),
    Country::new("MW", "Malawi", Some("MWK")),
    Country::new("MY", "Malaysia", Some("MYR")),
    Country::new("MV", "Maldives", Some("MVR")),
    Country::new("ML", "Mali", Some("XAF")),
    Country::new("MT", "Malta", Some("EUR")),
    Country::new("MH", "Marshall Islands", Some("USD")),
    Country::new("MQ", "Martinique", Some("EUR")),
    Country::new("MR", "Mauritania", Some("MRO")),
    Country::new("MU", "Mauritius", Some("MUR")),
    Country::new("YT", "Mayotte", Some("EUR")),
    Country::new("MX", "Mexico", Some("MXN")),
    Country::new("FM", "Micronesia", Some("USD")),
    Country::new("MD", "Moldova", Some("MDL")),
    Country::new("MC", "Monaco", Some("EUR")),
    Country::new("MN", "Mongolia", Some("MNT")),
    Country::new("ME", "Montenegro, Republica of", Some("EUR")),
    Country::new("MS", "Montserrat", Some("XCD")),
    Country::new("MA", "Morocco", Some("MAD")),
    Country::new("MZ", "Mozambique", Some("MZN")),
    Country::new("MM", "Myanmar (Burma)", Some("MMK")),
    Country::new("NA", "Namibia", Some("ZAR")),
    Country::new("NR", "Nauru, Republic of", Some("AUD")),
    Country::new("NP", "Nepal", Some("NPR")),
    Country::new("NL", "Netherlands, The", Some("EUR")),
    Country::new("NK", "Nevis", Some("XCD")),
    Country::new("NC", "New Caledonia", Some("XPF")),
    Country::new("NZ", "New Zealand", Some("NZD")),
    Country::new("NI", "Nicaragua", Some("NIO")),
    Country::new("NE", "Niger", Some("XAF")),
    Country::new("NG", "Nigeria", Some("NGN")),
    Country::new("NU", "Niue Island", Some("NZD")),
    Country::new("NO", "Norway", Some("NOK")),
    Country::new("OM", "Oman", Some("OMR")),
    Country::new("PK", "Pakistan", Some("PKR")),
    Country::new("PW", "Palau", Some("USD")),
    Country::new("PS", "Palestine", Some("ILS")),
    Country::new("PA", "Panama", Some("PAB")),
    Country::new("PG", "Papua New Guinea", Some("PGK")),
    Country::new("PY", "Paraguay", Some("PYG")),
    Country::new("PE", "Peru", Some("PEN")),
    Country::new("PH", "Philippines", Some("PHP")),
    Country::new("PL", "Poland", Some("PLN")),
    Country::new("PT", "Portugal", Some("EUR")),
    Country::new("PR", "Puerto Rico", Some("USD")),
    Country::new("QA", "Qatar", Some("QAR")),
    Country::new("RE", "Reunion Island", Some("EUR")),
    Country::new("RO", "Romania", Some("EUR")),
    Country::new("RU", "Russia", Some("RUB")),
    Country::new("RW", "Rwanda", Some("RWF")),
    Country::new("AN", "Saba", Some("USD")),
    Country::new("X8", "Saipan", None),
    Country::new("1M", "Samoa", Some("WST")),
    Country::new("SM", "San Marino", Some("EUR")),
    Country::new("ST", "Sao Tome and Principe", Some("STD")),
    Country::new("SA", "Saudi Arabia", Some("SAR")),
    Country::new("1C", "Scotland (U.K)", Some("GBP")),
    Country::new("SN", "Senegal", Some("XAF")),
    Country::new("RS", "Serbia, Republic of", Some("RSD")),
    Country::new("SC", "Seychelles", Some("SCR")),
    Country::new("SL", "Sierra Leone", Some("SLL")),
    Country::new("SG", "Singapore", Some("SGD")),
    Country::new("SK", "Slovakia", Some("SKK")),
    Country::new("SI", "Slovenia", Some("EUR")),
    Country::new("SB", "Solomon Islands", Some("AUD")),
    Country::new("SO", "Somalia", Some("SOS")),
    Country::new("X9", "Somaliland", None),
    Country::new("ZA", "South Africa", Some("ZAR")),
    Country::new("ES", "Spain", Some("EUR")),
    Country::new("LK", "Sri Lanka", Some("LKR")),
    Country::new("BL", "St. Barthelemy", Some("EUR")),
    Country::new("1L", "St. Croix", Some("USD")),
    Country::new("XB", "St. Eustatius", None),
    Country::new("1J", "St. John", Some("USD")),
    Country::new("KN", "St. Kitts", Some("XCD")),
    Country::new("LC", "St. Lucia", None),
    Country::new("MF", "St. Maarten", Some("ANG")),
    Country::new("1K", "St. Thomas", Some("USD")),
    Country::new("VC", "St. Vincent", Some("XCD")),
    Country::new("SR", "Suriname", Some("USD")),
    Country::new("SZ", "Swaziland", Some("ZAR")),
    Country::new("SE", "Sweden", Some("SEK")),
    Country::new("CH", "Switzerland", Some("CHF")),
    Country::new("SY", "Syria", Some("SYP")),
    Country::new("XG", "Tahiti", None),
    Country::new("TW", "Taiwan", Some("TWD")),
    Country::new("TJ", "Tajikistan", Some("TJS")),
    Country::new("TZ", "Tanzania", Some("TZS")),
    Country::new("TH", "Thailand", Some("THB")),
    Country::new("TG", "Togo", Some("XAF")),
    Country::new("TO", "Tonga", Some("TOP")),
    Country::new("TT", "Trinidad and Tobago", Some("TTD")),
    Country::new("TN", "Tunisia", Some("TND")),
    Country::new("TR", "Turkey", Some("TRY")),
    Country::new("TM", "Turkmenistan", Some("TMM")),
    Country::new("TC", "Turks and Caicos Islands", Some("USD")),
    Country::new("TV", "Tuvalu", Some("AUD")),
    Country::new("UG", "Uganda", Some("UGX")),
    Country::new("UA", "Ukraine", Some("EUR")),
    Country::new("AE", "United Arab Emirates", Some("AED")),
    Country::new("GB", "United Kingdom", Some("GBP")),
    Country::new("US", "United States", Some("USD")),
    Country::new("AK", "United States - Alaska", Some("USD")),
    Country::new("HI", "United States - Hawaii", Some("USD")),
    Country::new("UY", "Uruguay", Some("UYU")),
    Country::new("UZ", "Uzbekistan", Some("UZS")),
    Country::new("VU", "Vanuatu", Some("VUV")),
    Country::new("VE", "Venezuela", Some("VEF")),
    Country::new("VN", "Vietnam", Some("VND")),
    Country::new("VG", "Virgin Islands (BR)", Some("USD")),
    Country::new("VI", "Virgin Islands (US)", Some("USD")),
    Country::new("1B", "Wales (U.K.)", None),
    Country::new("WF", "Wallis and Futuna", Some("CFP")),
    Country::new("WS", "Western Samoa", Some("WST")),
    Country::new("YE", "Yemen", Some("YER")),
    Country::new("YU", "Yugoslavia", Some("YUN")),
    Country::new("ZM", "Zambia", Some("ZMK")),
    Country::new("ZW", "Zimbabwe", Some("ZWD")),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_countries() {
        assert!(is_valid_country("US"));
        assert!(is_valid_country("CO"));
        assert!(is_valid_country("DE"));
        assert!(is_valid_country("GB"));
        assert!(is_valid_country("1A"));
    }

    #[test]
    fn unknown_countries() {
        assert!(!is_valid_country("Zambia"));
        assert!(!is_valid_country("XX"));
        assert!(!is_valid_country(""));
        assert!(!is_valid_country("us"));
    }

    #[test]
    fn codes_are_unique_and_two_chars() {
        let mut seen = HashSet::new();
        for c in countries() {
            assert_eq!(c.code.len(), 2, "bad code {}", c.code);
            assert!(seen.insert(c.code), "duplicate code {}", c.code);
        }
    }

    #[test]
    fn lookup_carries_currency() {
        assert_eq!(country("JP").and_then(|c| c.currency), Some("JPY"));
        assert_eq!(country("CW").and_then(|c| c.currency), None);
        assert_eq!(country("US").map(|c| c.name), Some("United States"));
    }
}
