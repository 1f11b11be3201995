//! Calculator provider: evaluates math expressions typed into the
//! search field.

use beacon_core::{BeaconResult, Query, ResultItem, SearchProvider};

pub struct CalcProvider;

impl CalcProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalcProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a math expression, returning None when the text is not a
/// valid (finite) expression.
fn evaluate(expr: &str) -> Option<f64> {
    let expr = expr.trim();
    if expr.is_empty() || !expr.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    match meval::eval_str(expr) {
        Ok(result) if result.is_finite() => Some(result),
        _ => None,
    }
}

/// Format a result for display, dropping a trailing ".0"
fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl SearchProvider for CalcProvider {
    fn title(&self) -> &str {
        "Calculator"
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn supports(&self, text: &str) -> bool {
        text.chars().any(|c| c.is_ascii_digit())
    }

    fn search(&self, query: &Query) -> BeaconResult<Vec<ResultItem>> {
        let Some(value) = evaluate(&query.text) else {
            return Ok(Vec::new());
        };
        let formatted = format_result(value);

        Ok(vec![ResultItem::new(format!("= {formatted}"))
            .with_identifier(formatted.clone())
            .with_context(query.text.trim().to_string())
            .with_property("Expression", query.text.trim().to_string())
            .with_property("Value", formatted)])
    }
}
