use crate::errors::CoreError;
use crate::models::currency::CurrencyInfo;
use super::traits::CurrencyMetadata;

/// (code, name, symbol) for every currency in the ECB reference set.
const ECB_CURRENCIES: [(&str, &str, &str); 31] = [
    ("AUD", "Australian Dollar", "A$"),
    ("BRL", "Brazilian Real", "R$"),
    ("CAD", "Canadian Dollar", "CA$"),
    ("CHF", "Swiss Franc", "CHF"),
    ("CNY", "Chinese Yuan", "CN¥"),
    ("CZK", "Czech Koruna", "Kč"),
    ("DKK", "Danish Krone", "kr."),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("HKD", "Hong Kong Dollar", "HK$"),
    ("HUF", "Hungarian Forint", "Ft"),
    ("IDR", "Indonesian Rupiah", "Rp"),
    ("ILS", "Israeli New Shekel", "₪"),
    ("INR", "Indian Rupee", "₹"),
    ("ISK", "Icelandic Króna", "kr"),
    ("JPY", "Japanese Yen", "¥"),
    ("KRW", "South Korean Won", "₩"),
    ("MXN", "Mexican Peso", "MX$"),
    ("MYR", "Malaysian Ringgit", "RM"),
    ("NOK", "Norwegian Krone", "kr"),
    ("NZD", "New Zealand Dollar", "NZ$"),
    ("PHP", "Philippine Peso", "₱"),
    ("PLN", "Polish Złoty", "zł"),
    ("RON", "Romanian Leu", "lei"),
    ("SEK", "Swedish Krona", "kr"),
    ("SGD", "Singapore Dollar", "S$"),
    ("THB", "Thai Baht", "฿"),
    ("TRY", "Turkish Lira", "₺"),
    ("USD", "US Dollar", "$"),
    ("ZAR", "South African Rand", "R"),
    ("BGN", "Bulgarian Lev", "лв."),
];

/// Static metadata table for the currencies Frankfurter publishes.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCurrencyMetadata;

impl BuiltinCurrencyMetadata {
    pub fn new() -> Self {
        Self
    }

    /// Every known currency, sorted by code.
    pub fn all(&self) -> Vec<CurrencyInfo> {
        let mut all: Vec<CurrencyInfo> = ECB_CURRENCIES.iter().map(to_info).collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }
}

impl CurrencyMetadata for BuiltinCurrencyMetadata {
    fn lookup(&self, currency_code: &str) -> Result<CurrencyInfo, CoreError> {
        let upper = currency_code.trim().to_uppercase();
        ECB_CURRENCIES
            .iter()
            .find(|(code, _, _)| *code == upper)
            .map(to_info)
            .ok_or(CoreError::CurrencyNotFound(upper))
    }
}

fn to_info(entry: &(&str, &str, &str)) -> CurrencyInfo {
    let (code, name, symbol) = entry;
    CurrencyInfo {
        code: code.to_string(),
        display_name: name.to_string(),
        symbol: symbol.to_string(),
    }
}
