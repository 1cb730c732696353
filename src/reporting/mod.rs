use crate::models::Classification;

/// Render synthesized verdict counts as plain rows, one count per verdict.
pub fn format_counts(counts: &[(Classification, usize)]) -> String {
    let mut out = String::new();
    let mut total = 0usize;
    for (classification, count) in counts {
        out.push_str(&format!("{:>8}  {}\n", count, classification));
        total += count;
    }
    out.push_str(&format!("{:>8}  total\n", total));
    out
}

/// Counts as a `{verdict: count}` object for machine consumers.
pub fn counts_json(counts: &[(Classification, usize)]) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for (classification, count) in counts {
        object.insert(
            classification.as_str().to_string(),
            serde_json::json!(count),
        );
    }
    serde_json::Value::Object(object)
}
