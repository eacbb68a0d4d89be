//! Tool modules for the Stratus agent.

pub mod base;
pub mod registry;
pub mod weather;

pub use base::Tool;
pub use registry::ToolRegistry;
pub use weather::WeatherTool;
