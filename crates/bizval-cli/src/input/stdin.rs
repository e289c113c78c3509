use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a model document piped on stdin.
///
/// Returns `None` when stdin is a terminal or the pipe is empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let parsed = parse_piped(&buffer)?;
    if parsed.is_some() {
        tracing::debug!(bytes = buffer.len(), "loaded input document from stdin");
    }
    Ok(parsed)
}

/// Parse piped text as JSON when it opens like a JSON document, else as YAML.
fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| format!("Failed to parse JSON from stdin: {e}"))
    } else {
        serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|e| format!("Failed to parse YAML from stdin: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizval_core::model::FinancialModelRecord;
    use rust_decimal_macros::dec;

    #[test]
    fn test_json_and_yaml_yield_same_record() {
        let json = r#"{ "businessType": "saas", "customers": 1000, "monthlyChurnRate": 3 }"#;
        let yaml = "businessType: saas\ncustomers: 1000\nmonthlyChurnRate: 3\n";

        let from_json: FinancialModelRecord = parse_piped(json).unwrap().unwrap();
        let from_yaml: FinancialModelRecord = parse_piped(yaml).unwrap().unwrap();
        assert_eq!(from_json.business_type.as_deref(), Some("saas"));
        assert_eq!(from_yaml.business_type.as_deref(), Some("saas"));
        assert_eq!(from_json.customers, Some(dec!(1000)));
        assert_eq!(from_yaml.customers, from_json.customers);
        assert_eq!(from_yaml.monthly_churn_rate, Some(dec!(3)));
    }

    #[test]
    fn test_blank_pipe_is_no_input() {
        let parsed: Option<FinancialModelRecord> = parse_piped("  \n\t").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_json_names_the_format() {
        let err = parse_piped::<FinancialModelRecord>("{ \"customers\": ").unwrap_err();
        assert!(err.starts_with("Failed to parse JSON"), "{err}");
    }
}
