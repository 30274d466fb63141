//! Tools exposed by the demo. Every `#[tool]` below this module is picked up
//! by `ToolRegistry::load_tools("toolbox")`.

pub mod math;
pub mod users;
pub mod weather;
