use agent_tools::tool;
use serde_json::{Value, json};
use tracing::debug;

/// Compute the sum of two integers.
#[tool(describe(a = "first addend", b = "second addend"))]
pub fn add_numbers(a: i64, b: i64) -> Value {
    debug!(a, b, "adding");
    json!({ "result": a + b, "message": format!("{a} + {b} = {}", a + b) })
}

/// Divide `dividend` by `divisor`.
#[tool]
pub fn divide(dividend: f64, divisor: f64) -> Result<f64, String> {
    if divisor == 0.0 {
        return Err("division by zero".to_owned());
    }
    Ok(dividend / divisor)
}
