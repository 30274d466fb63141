//! Discovery of `#[tool]` functions by module path.
//!
//! Every `#[tool]` function submits a [`DiscoveredTool`] record at link time.
//! [`load_tools`] picks the records whose module lives at or below a package
//! path and registers them module by module, the way importing every file of
//! a package would run its registrations.

use std::collections::BTreeMap;

use tracing::{error, info};

use crate::error::LoadError;
use crate::registry::{ToolBinding, ToolRegistry};

/// Link-time record emitted for every `#[tool]` function.
#[derive(Debug)]
pub struct DiscoveredTool {
    module_path: &'static str,
    name: &'static str,
    line: u32,
    build: fn() -> ToolBinding,
}

impl DiscoveredTool {
    /// Creates a record. Called from code generated by `#[tool]`.
    #[must_use]
    pub const fn new(
        module_path: &'static str,
        name: &'static str,
        line: u32,
        build: fn() -> ToolBinding,
    ) -> Self {
        Self {
            module_path,
            name,
            line,
            build,
        }
    }

    /// Module the tool was defined in, as `module_path!()` reports it.
    #[must_use]
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh binding for the tool.
    #[must_use]
    pub fn binding(&self) -> ToolBinding {
        (self.build)()
    }
}

inventory::collect!(DiscoveredTool);

/// Iterates over every discovered tool in the final binary.
pub fn discovered() -> impl Iterator<Item = &'static DiscoveredTool> {
    inventory::iter::<DiscoveredTool>.into_iter()
}

/// Outcome of a [`load_tools`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Modules registered by this run.
    pub loaded: Vec<String>,
    /// Modules this registry had already loaded.
    pub skipped: Vec<String>,
    /// Modules whose tools were rejected; nothing from them was registered.
    pub failed: Vec<String>,
}

/// Registers every discovered tool whose module is `package` or nested
/// below it.
///
/// `package` may use `.` or `::` separators and may omit the crate name
/// (`agent_tools.math` matches `my_app::agent_tools::math`). Modules are
/// visited in sorted order and tools within a module in source order, so the
/// resulting catalog order is stable. Loading is idempotent per registry: a
/// module already loaded is skipped. A module with an invalid tool is logged
/// and skipped as a whole; the remaining modules still load.
///
/// # Errors
///
/// Returns [`LoadError::EmptyPackage`] for a blank path and
/// [`LoadError::PackageNotFound`] when no discovered tool matches.
pub fn load_tools(registry: &ToolRegistry, package: &str) -> Result<LoadReport, LoadError> {
    let package = normalise_package(package)?;

    let mut modules: BTreeMap<&'static str, Vec<&'static DiscoveredTool>> = BTreeMap::new();
    for tool in discovered() {
        if in_package(tool.module_path, &package) {
            modules.entry(tool.module_path).or_default().push(tool);
        }
    }

    if modules.is_empty() {
        return Err(LoadError::PackageNotFound { package });
    }

    info!(%package, modules = modules.len(), "scanning tool package");

    let mut report = LoadReport::default();
    for (module, mut tools) in modules {
        if registry.is_module_loaded(module) {
            report.skipped.push(module.to_owned());
            continue;
        }

        tools.sort_by_key(|tool| (tool.line, tool.name));
        match registry.register_all(tools.iter().map(|tool| tool.binding())) {
            Ok(count) => {
                registry.mark_module_loaded(module);
                info!(module, tools = count, "loaded tool module");
                report.loaded.push(module.to_owned());
            }
            Err(err) => {
                error!(module, error = %err, "failed to load tool module");
                report.failed.push(module.to_owned());
            }
        }
    }

    Ok(report)
}

fn normalise_package(package: &str) -> Result<String, LoadError> {
    let normalised = package
        .split(['.', ':'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("::");

    if normalised.is_empty() {
        Err(LoadError::EmptyPackage)
    } else {
        Ok(normalised)
    }
}

fn in_package(module: &str, package: &str) -> bool {
    let under = |path: &str| {
        path.strip_prefix(package)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    };
    under(module) || module.split_once("::").is_some_and(|(_, rest)| under(rest))
}
