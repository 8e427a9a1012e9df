//! Price and volume representation.
//!
//! Quotes arrive as JSON numbers from the ingestion pipeline and every figure
//! the engine derives from them is defined on binary floating point, so both
//! aliases are `f64`.

use serde::{Deserialize, Deserializer};

/// Price in quote currency.
pub type Price = f64;

/// Traded quantity in base currency.
pub type Volume = f64;

/// Serde default for numeric fields the ingestion side may omit.
pub(crate) fn nan() -> f64 {
    f64::NAN
}

/// Decode a JSON number, numeric string, `null` or anything else into an
/// `f64`. Unusable values become NaN so validity checks reject them one
/// record at a time instead of failing the whole list.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Relative comparison used by tests and by callers checking derived figures.
#[must_use]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
