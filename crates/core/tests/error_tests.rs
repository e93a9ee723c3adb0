// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use household_finance_core::errors::{redact_query, CoreError};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: "symbol not found".into(),
        };
        assert_eq!(err.to_string(), "API error (Yahoo Finance): symbol not found");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection reset".into());
        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[test]
    fn timeout() {
        let err = CoreError::Timeout {
            provider: "Alpha Vantage".into(),
            ticker: "MSFT".into(),
        };
        assert_eq!(err.to_string(), "Timed out fetching MSFT from Alpha Vantage");
    }

    #[test]
    fn invalid_input() {
        let err = CoreError::InvalidInput("income must be a finite number".into());
        assert_eq!(err.to_string(), "Invalid input: income must be a finite number");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("fetch_timeout_secs must be positive".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: fetch_timeout_secs must be positive"
        );
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_converts_serde_error() {
        fn parse() -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str("[1, 2,")?)
        }
        assert!(matches!(parse(), Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<CoreError>();
    }
}

// ── API key redaction ───────────────────────────────────────────────

mod redaction {
    use super::*;

    #[test]
    fn strips_query_string() {
        let msg = "error sending request for url (https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&apikey=SECRET)";
        let redacted = redact_query(msg);
        assert!(!redacted.contains("SECRET"));
        assert_eq!(
            redacted,
            "error sending request for url (https://www.alphavantage.co/query?<query redacted>"
        );
    }

    #[test]
    fn leaves_plain_messages_untouched() {
        assert_eq!(redact_query("connection refused"), "connection refused");
    }
}
