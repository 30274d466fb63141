//! Function-calling demo: tool discovery, catalog generation and a mock round
//! of model-issued tool calls.

mod toolbox;

use agent_config::{ModelEndpoint, RegistryConfig, load_dotenv};
use agent_tools::{
    CallError, CallRequest, ParameterSpec, ParameterType, ToolBinding, ToolRegistry, merge_tools,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Value, json};
use tracing::{info, warn};

use toolbox::weather::{self, GetTimeParams, GetWeatherParams};

#[derive(Debug, Parser)]
#[command(
    name = "function-calling",
    about = "Registers tools, prints their catalog and replays mock tool calls"
)]
struct Args {
    /// Module path to discover tools under.
    #[arg(long, default_value = "toolbox")]
    package: String,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
    /// Print the catalog on a single line.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    load_dotenv()?;
    agent_telemetry::init_tracing(&args.log)?;

    info!("=== Function calling tools demo ===");

    let registry = ToolRegistry::with_config(RegistryConfig::from_env()?);
    let report = registry
        .load_tools(&args.package)
        .with_context(|| format!("failed to load tools from `{}`", args.package))?;
    info!(loaded = ?report.loaded, failed = ?report.failed, "tool discovery finished");

    // Hand-written binding; the function stays callable as before.
    let get_current_time = registry.agent_tool(weather::get_current_time, |f| {
        ToolBinding::explicit("get_current_time", move |params: GetTimeParams| {
            Ok::<_, CallError>(f(params))
        })
        .with_description("Get the current time at a location.")
    })?;

    for name in registry.tool_names() {
        if let Some(entry) = registry.get(&name) {
            info!(
                tool = %name,
                input = entry.parameter_type().name(),
                mode = ?entry.mode(),
                "registered tool"
            );
        }
    }

    reject_untyped(&registry);

    info!("--- Generated tools catalog ---");
    let catalog = registry.generate_tools();
    let rendered = if args.compact {
        serde_json::to_string(&catalog)?
    } else {
        serde_json::to_string_pretty(&catalog)?
    };
    println!("{rendered}");

    info!("--- Direct calls (functions are unaffected by registration) ---");
    println!("{}", toolbox::math::add_numbers(123, 456));
    println!(
        "{}",
        toolbox::users::greet_user("World".to_owned(), "Hello".to_owned())
    );
    println!(
        "{}",
        weather::get_current_weather(GetWeatherParams {
            city: "Beijing".to_owned(),
            unit: "celsius".to_owned(),
        })
    );
    println!(
        "{}",
        get_current_time(GetTimeParams {
            location: "Shanghai".to_owned(),
            format: "12h".to_owned(),
        })
    );

    info!("--- Mock tool calls ---");
    let mock_calls = [
        ("add_numbers", json!({ "a": 39, "b": 186 })),
        ("get_current_weather", json!({ "city": "Beijing", "unit": "celsius" })),
        ("greet_user", json!({ "name": "World" })),
        ("get_user_info", json!({ "user_id": 12345, "include_email": false })),
        ("create_user", json!({ "username": "testuser", "email": "test@test.com" })),
        ("get_current_time", json!({ "location": "Berlin" })),
        ("divide", json!({ "dividend": 1, "divisor": 0 })),
        ("create_user", json!({ "username": 7 })),
        ("get_weather", json!({})),
    ];
    for (index, (name, arguments)) in mock_calls.iter().enumerate() {
        let request = CallRequest::new(format!("call_{:03}", index + 1), *name, arguments.to_string());
        replay(&registry, &request)?;
    }

    // Same pipeline, starting from the wire shape a model returns.
    let wire: CallRequest = serde_json::from_value(json!({
        "id": "call_wire",
        "type": "function",
        "function": { "name": "add_numbers", "arguments": "{\"a\": 1, \"b\": 2}" }
    }))?;
    replay(&registry, &wire)?;

    let extras = ToolRegistry::new();
    extras.register(
        toolbox::math::add_numbers_tool().with_description("Shadowed by the primary registry."),
    )?;
    let merged = merge_tools(&[&registry, &extras]);
    info!(
        tools = merged.len(),
        add_numbers = merged
            .iter()
            .find(|spec| spec.name() == "add_numbers")
            .map(|spec| spec.description())
            .unwrap_or_default(),
        "merged catalog keeps the first declaration"
    );

    match ModelEndpoint::from_env() {
        Ok(endpoint) => info!(
            model = %endpoint.model,
            base_url = %endpoint.base_url,
            tools = catalog.len(),
            "endpoint configured; send the catalog above as `tools` in a chat-completions request"
        ),
        Err(err) => warn!(error = %err, "skipping online run; set API_KEY, BASE_URL and MODEL"),
    }

    info!("=== Demo complete ===");
    Ok(())
}

fn replay(registry: &ToolRegistry, request: &CallRequest) -> Result<()> {
    info!(
        call_id = request.call_id(),
        tool = request.tool_name(),
        arguments = request.arguments(),
        "calling tool"
    );

    let result = registry.call_tool(request);
    let content: Value = result
        .content_json()
        .context("tool message content is not JSON")?;
    if result.is_error() {
        warn!(call_id = result.call_id(), kind = ?result.error_kind(), "tool call failed");
    }
    println!("{}", serde_json::to_string_pretty(&content)?);
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

/// Shows that a parameter without a type is refused at registration.
fn reject_untyped(registry: &ToolRegistry) {
    let binding = ToolBinding::inferred(
        "bad_example",
        ParameterType::inferred("bad_example").field(ParameterSpec::untyped("no_type_annotation")),
        |_args| Ok(json!({ "error": true })),
    )
    .with_description("This tool can never be registered.");

    match registry.register(binding) {
        Ok(()) => warn!("untyped parameter was accepted"),
        Err(err) => info!(error = %err, "untyped parameter rejected as expected"),
    }
}
