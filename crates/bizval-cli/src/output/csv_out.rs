use serde_json::{Map, Value};
use std::io;

/// Result fields that hold one row per year or per scenario.
const ROW_KEYS: [&str; 2] = ["projections", "scenarios"];

/// Write output as CSV to stdout.
///
/// Year-by-year projections and sensitivity scenarios become one row each;
/// the grid becomes a growth x discount-rate matrix; anything else is written
/// as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(rows) = row_array(map) {
                write_array_csv(&mut wtr, rows);
            } else if let Some(Value::Array(matrix)) = map.get("matrix") {
                write_grid_csv(&mut wtr, map, matrix);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                write_fields(&mut wtr, "", map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn row_array(map: &Map<String, Value>) -> Option<&[Value]> {
    ROW_KEYS.iter().find_map(|k| match map.get(*k) {
        Some(Value::Array(rows)) => Some(rows.as_slice()),
        _ => None,
    })
}

/// Nested objects are flattened with dotted keys (`bear_case.valuation.enterprise_value`).
fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => write_fields(wtr, &name, inner),
            Value::Array(items) if items.iter().any(Value::is_object) => {}
            _ => {
                let _ = wtr.write_record([name.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

fn write_grid_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
    matrix: &[Value],
) {
    let labels = |key: &str| -> Vec<String> {
        map.get(key)
            .and_then(Value::as_array)
            .map(|a| a.iter().map(format_csv_value).collect())
            .unwrap_or_default()
    };
    let growth_labels = labels("growth_labels");

    let mut header = vec!["growth \\ discount_rate".to_string()];
    header.extend(labels("discount_rate_labels"));
    let _ = wtr.write_record(&header);

    for (i, row) in matrix.iter().enumerate() {
        let mut record = vec![growth_labels.get(i).cloned().unwrap_or_default()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_csv_value));
        }
        let _ = wtr.write_record(&record);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut csv::Writer<Vec<u8>>)) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_nested_fields_flattened() {
        let result = json!({"bear_case": {"valuation": {"enterprise_value": "10"}}, "name": "x"});
        let out = render(|w| write_fields(w, "", result.as_object().unwrap()));
        assert!(out.contains("bear_case.valuation.enterprise_value,10"));
        assert!(out.contains("name,x"));
    }

    #[test]
    fn test_grid_layout() {
        let result = json!({
            "growth_labels": ["-10%", "Base"],
            "discount_rate_labels": ["Base"],
            "matrix": [["1"], [null]]
        });
        let map = result.as_object().unwrap();
        let matrix = map["matrix"].as_array().unwrap().clone();
        let out = render(|w| write_grid_csv(w, map, &matrix));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "-10%,1");
        assert_eq!(lines[2], "Base,");
    }
}
