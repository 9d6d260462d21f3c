use serde::{Deserialize, Serialize};

/// Public Frankfurter endpoint (ECB reference rates).
pub const DEFAULT_RATE_API_URL: &str = "https://api.frankfurter.dev/v1";

/// Base currency used when the locale gives no usable hint.
pub const FALLBACK_BASE_CURRENCY: &str = "USD";

/// Locale environment variables, in POSIX precedence order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MONETARY", "LANG"];

/// Eurozone members (ISO 3166 alpha-2).
const EURO_REGIONS: [&str; 21] = [
    "AT", "BE", "BG", "HR", "CY", "EE", "FI", "FR", "DE", "GR", "IE", "IT", "LV", "LT", "LU", "MT",
    "NL", "PT", "SK", "SI", "ES",
];

/// Region → currency for countries outside the eurozone.
const REGION_CURRENCIES: [(&str, &str); 33] = [
    ("US", "USD"),
    ("GB", "GBP"),
    ("TR", "TRY"),
    ("JP", "JPY"),
    ("CH", "CHF"),
    ("PL", "PLN"),
    ("CZ", "CZK"),
    ("HU", "HUF"),
    ("RO", "RON"),
    ("DK", "DKK"),
    ("SE", "SEK"),
    ("NO", "NOK"),
    ("IS", "ISK"),
    ("CA", "CAD"),
    ("AU", "AUD"),
    ("NZ", "NZD"),
    ("CN", "CNY"),
    ("HK", "HKD"),
    ("SG", "SGD"),
    ("KR", "KRW"),
    ("IN", "INR"),
    ("ID", "IDR"),
    ("MY", "MYR"),
    ("PH", "PHP"),
    ("TH", "THB"),
    ("IL", "ILS"),
    ("ZA", "ZAR"),
    ("BR", "BRL"),
    ("MX", "MXN"),
    ("RU", "RUB"),
    ("UA", "UAH"),
    ("AE", "AED"),
    ("SA", "SAR"),
];

/// User-configurable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// The currency in which all portfolio values are expressed (e.g., "EUR").
    pub base_currency: String,

    /// Root URL of the Frankfurter-compatible rate API.
    pub rate_api_url: String,
}

impl Default for Settings {
    /// Base currency comes from the host locale, falling back to USD.
    fn default() -> Self {
        Self {
            base_currency: locale_currency_code(),
            rate_api_url: DEFAULT_RATE_API_URL.to_string(),
        }
    }
}

impl Settings {
    pub fn with_base_currency(base_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into().to_uppercase(),
            rate_api_url: DEFAULT_RATE_API_URL.to_string(),
        }
    }
}

/// Currency code for the host locale, read from `LC_ALL`, `LC_MONETARY`
/// and `LANG` in that order.
pub fn locale_currency_code() -> String {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| currency_for_locale(&value))
        .unwrap_or(FALLBACK_BASE_CURRENCY)
        .to_string()
}

/// Map a POSIX locale string (`lang_REGION[.encoding][@modifier]`) to the
/// currency of its region. `C`, `POSIX` and region-less locales yield `None`.
pub fn currency_for_locale(locale: &str) -> Option<&'static str> {
    let without_modifier = locale.split('@').next()?;
    let without_encoding = without_modifier.split('.').next()?;
    let region = without_encoding
        .split(|c: char| c == '_' || c == '-')
        .nth(1)?
        .to_ascii_uppercase();

    if EURO_REGIONS.contains(&region.as_str()) {
        return Some("EUR");
    }

    REGION_CURRENCIES
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, currency)| *currency)
}
