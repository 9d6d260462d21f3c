// ═══════════════════════════════════════════════════════════════════
// Model Tests — currency codes, holdings, settings/locale, outcomes
// ═══════════════════════════════════════════════════════════════════

use currency_portfolio_core::errors::CoreError;
use currency_portfolio_core::models::currency::normalize_currency_code;
use currency_portfolio_core::models::holding::Holding;
use currency_portfolio_core::models::outcome::{Committed, RebaseOutcome};
use currency_portfolio_core::models::portfolio::StoredPortfolio;
use currency_portfolio_core::models::settings::{
    currency_for_locale, Settings, DEFAULT_RATE_API_URL,
};

mod currency_code {
    use super::*;

    #[test]
    fn normalizes() {
        assert_eq!(normalize_currency_code(" eur ").unwrap(), "EUR");
        assert_eq!(normalize_currency_code("Try").unwrap(), "TRY");
    }

    #[test]
    fn rejects_malformed() {
        for code in ["", "US", "USDT", "U$D", "12 "] {
            assert!(
                matches!(normalize_currency_code(code), Err(CoreError::ValidationError(_))),
                "{code:?}"
            );
        }
    }
}

mod holding {
    use super::*;

    #[test]
    fn new_uppercases_and_assigns_id() {
        let a = Holding::new(1.0, " gbp", 0.8);
        let b = Holding::new(1.0, "GBP", 0.8);
        assert_eq!(a.currency_code, "GBP");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn stored_portfolio_json_without_base() {
        // Records written before the base currency was persisted
        let json = r#"{"holdings":[]}"#;
        let p: StoredPortfolio = serde_json::from_str(json).unwrap();
        assert!(p.holdings.is_empty());
        assert_eq!(p.base_currency, None);
    }
}

mod settings {
    use super::*;

    #[test]
    fn with_base_currency() {
        let s = Settings::with_base_currency("eur");
        assert_eq!(s.base_currency, "EUR");
        assert_eq!(s.rate_api_url, DEFAULT_RATE_API_URL);
    }

    #[test]
    fn default_base_is_valid_code() {
        let s = Settings::default();
        assert!(normalize_currency_code(&s.base_currency).is_ok());
    }

    #[test]
    fn serde_round_trip() {
        let s = Settings::with_base_currency("TRY");
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_currency, "TRY");
    }

    #[test]
    fn locale_regions() {
        assert_eq!(currency_for_locale("en_US.UTF-8"), Some("USD"));
        assert_eq!(currency_for_locale("en_GB"), Some("GBP"));
        assert_eq!(currency_for_locale("tr_TR.UTF-8"), Some("TRY"));
        assert_eq!(currency_for_locale("ja_JP"), Some("JPY"));
        assert_eq!(currency_for_locale("pl-PL"), Some("PLN"));
    }

    #[test]
    fn eurozone_locales() {
        assert_eq!(currency_for_locale("de_DE"), Some("EUR"));
        assert_eq!(currency_for_locale("fr_FR.UTF-8"), Some("EUR"));
        assert_eq!(currency_for_locale("ca_ES@euro"), Some("EUR"));
        assert_eq!(currency_for_locale("bg_BG"), Some("EUR"));
    }

    #[test]
    fn locales_without_region() {
        assert_eq!(currency_for_locale("C"), None);
        assert_eq!(currency_for_locale("POSIX"), None);
        assert_eq!(currency_for_locale("C.UTF-8"), None);
        assert_eq!(currency_for_locale("en"), None);
        assert_eq!(currency_for_locale(""), None);
    }

    #[test]
    fn unknown_region() {
        assert_eq!(currency_for_locale("xx_ZZ"), None);
    }
}

mod outcome {
    use super::*;

    #[test]
    fn committed_helpers() {
        let ok = Committed::persisted(5);
        assert!(ok.is_persisted());
        assert_eq!(ok.into_value(), 5);

        let failed = Committed {
            value: (),
            persist_error: Some(CoreError::Persist("x".into())),
        };
        assert!(!failed.is_persisted());
    }

    #[test]
    fn rebase_outcome_base_currency() {
        let stable = RebaseOutcome::Stable {
            base_currency: "EUR".into(),
        };
        let failed = RebaseOutcome::RateFetchFailed {
            base_currency: "TRY".into(),
            error: CoreError::NoProvider,
        };
        assert!(stable.is_stable());
        assert!(!failed.is_stable());
        assert_eq!(stable.base_currency(), "EUR");
        assert_eq!(failed.base_currency(), "TRY");
    }
}
