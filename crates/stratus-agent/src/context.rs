//! Context builder — the system prompt that teaches the model the envelope
//! protocol and lists the available tools.

use crate::tools::ToolRegistry;

/// Worked exchange appended to the prompt. A hint at the shape of a turn,
/// not a script to copy.
const EXAMPLE_EXCHANGE: &str = r#"START
{"type": "user", "content": "What is the weather of Surat?"}
{"type": "plan", "plan": "I will check whether the city name needs correcting, then call getWeatherDetails with it"}
{"type": "action", "function": "getWeatherDetails", "input": "Surat"}
{"type": "observation", "observation": {"request": {"type": "City", "query": "Surat, India", "unit": "m"}, "location": {"name": "Surat", "country": "India", "region": "Gujarat", "localtime": "2025-03-06 12:28"}, "current": {"temperature": 32, "weather_descriptions": ["Sunny"], "wind_speed": 13, "wind_dir": "NNW", "humidity": 17, "feelslike": 30, "uv_index": 10}}}
{"type": "output", "output": "It's 32°C and sunny in Surat, India, with 17% humidity and a 13 km/h NNW wind."}"#;

/// Builds the system prompt for a session.
pub struct ContextBuilder {
    agent_name: String,
}

impl ContextBuilder {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
        }
    }

    /// Build the full system prompt for the given tools.
    pub fn build_system_prompt(&self, tools: &ToolRegistry) -> String {
        let catalogue = if tools.is_empty() {
            "(no tools are available; answer directly with an output)".to_string()
        } else {
            tools.describe()
        };

        format!(
            "You are {name}, an AI assistant that works in START, PLAN, ACTION, OBSERVATION and OUTPUT states.\n\
             Wait for the user prompt, then PLAN using the available tools.\n\
             After planning, take an ACTION with the appropriate tool and wait for the OBSERVATION it produces.\n\
             Once you have the observations, answer the START prompt with an OUTPUT based on them.\n\
             \n\
             Rules:\n\
             - Every reply is exactly one JSON object with a \"type\" field: \"plan\", \"action\" or \"output\".\n\
             - An action names a listed function in \"function\" and passes its argument as a string in \"input\".\n\
             - Observations arrive from the developer role; an observation with an \"error\" field means the call failed, so adapt (for example, ask the user for a valid city).\n\
             - Keep the output concise and simple.\n\
             \n\
             Available tools:\n\
             {catalogue}\n\
             \n\
             Example (a hint at the flow, not an exact transcript):\n\
             {example}",
            name = self.agent_name,
            catalogue = catalogue,
            example = EXAMPLE_EXCHANGE,
        )
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new("Stratus")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::WeatherTool;
    use std::sync::Arc;
    use stratus_core::config::WeatherConfig;
    use stratus_core::envelope::AgentEnvelope;

    #[test]
    fn prompt_lists_registered_tools() {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(WeatherTool::new(&WeatherConfig::default()).unwrap()));

        let prompt = ContextBuilder::default().build_system_prompt(&tools);
        assert!(prompt.starts_with("You are Stratus"));
        assert!(prompt.contains("- function getWeatherDetails(city: string): JSON"));
        assert!(prompt.contains("\"type\" field"));
    }

    #[test]
    fn prompt_without_tools() {
        let prompt = ContextBuilder::new("Nimbus").build_system_prompt(&ToolRegistry::new());
        assert!(prompt.starts_with("You are Nimbus"));
        assert!(prompt.contains("no tools are available"));
    }

    #[test]
    fn example_lines_are_valid_envelopes() {
        for line in EXAMPLE_EXCHANGE.lines().skip(1) {
            AgentEnvelope::parse(line).unwrap();
        }
    }
}
