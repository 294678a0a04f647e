//! The regression equation string.
//!
//! Downstream consumers parse this text, so the layout is fixed:
//!
//! ```text
//! <target> = <intercept:.4> + (<coef:.4> * <feature1>) + (<coef:.4> * <feature2>) ...
//! ```

use crate::error::{BaselineError, Result};

const TERM_SEP: &str = " + ";

/// Render the equation for an intercept and ordered `(feature, coefficient)` pairs.
pub fn render_equation(target: &str, intercept: f64, coefficients: &[(String, f64)]) -> String {
    let mut out = format!("{target} = {intercept:.4}");
    for (name, coef) in coefficients {
        out.push_str(TERM_SEP);
        out.push_str(&format!("({coef:.4} * {name})"));
    }
    out
}

/// An equation read back from its text form (values carry four decimals).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEquation {
    pub target: String,
    pub intercept: f64,
    pub terms: Vec<(String, f64)>,
}

/// Parse text produced by [`render_equation`].
pub fn parse_equation(text: &str) -> Result<ParsedEquation> {
    let bad = |what: &str| BaselineError::Parse(format!("equation {what}: `{text}`"));

    let (target, rhs) = text.split_once(" = ").ok_or_else(|| bad("has no ` = `"))?;
    let target = target.trim();
    if target.is_empty() {
        return Err(bad("has no target"));
    }

    let mut parts = rhs.split(TERM_SEP);
    let intercept = parts
        .next()
        .and_then(|p| p.trim().parse::<f64>().ok())
        .ok_or_else(|| bad("has no numeric intercept"))?;

    let mut terms = Vec::new();
    for part in parts {
        let inner = part
            .trim()
            .strip_prefix('(')
            .and_then(|p| p.strip_suffix(')'))
            .ok_or_else(|| bad("term is not parenthesised"))?;
        let (coef, name) = inner.split_once(" * ").ok_or_else(|| bad("term has no ` * `"))?;
        let coef = coef
            .trim()
            .parse::<f64>()
            .map_err(|_| bad("term has a non-numeric coefficient"))?;
        terms.push((name.trim().to_string(), coef));
    }

    Ok(ParsedEquation {
        target: target.to_string(),
        intercept,
        terms,
    })
}
