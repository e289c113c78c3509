use serde_json::Value;

/// Headline field for each result shape, checked in order.
const PRIORITY_KEYS: [&str; 7] = [
    "enterprise_value",
    "probability_weighted_value",
    "base_enterprise_value",
    "equity_value",
    "arr",
    "annual_revenue",
    "ltv_cac_ratio",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        // Scenario comparisons without weights: report the base case
        if let Some(ev) = map
            .get("base_case")
            .and_then(|c| c.get("valuation"))
            .and_then(|v| v.get("enterprise_value"))
        {
            return format_minimal(ev);
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
