use agent_tools::{CallRequest, LoadError, ToolRegistry, discovered};
use serde_json::json;

mod catalog {
    pub mod math {
        use agent_tools::tool;

        /// Multiply two numbers.
        #[tool]
        pub fn multiply(x: f64, y: f64) -> f64 {
            x * y
        }

        /// Negate a number.
        #[tool]
        pub fn negate(x: i64) -> i64 {
            -x
        }
    }

    pub mod text {
        use agent_tools::tool;

        /// Uppercase a string.
        #[tool]
        pub fn shout(text: String) -> String {
            text.to_uppercase()
        }
    }

    pub mod broken {
        use agent_tools::tool;

        /// Declares a default its type rejects.
        #[tool(default(count = "many"))]
        pub fn count_things(count: u32) -> u32 {
            count
        }

        /// Valid on its own, but shares a module with an invalid tool.
        #[tool]
        pub fn innocent() -> bool {
            true
        }
    }
}

#[test]
fn loads_every_module_below_the_package() {
    let registry = ToolRegistry::new();
    let report = registry.load_tools("catalog").unwrap();

    assert_eq!(
        report.loaded,
        vec!["loader::catalog::math", "loader::catalog::text"]
    );
    assert_eq!(report.failed, vec!["loader::catalog::broken"]);
    assert!(report.skipped.is_empty());
    assert_eq!(registry.tool_names(), vec!["multiply", "negate", "shout"]);

    let result = registry.call_tool(&CallRequest::new(
        "call_1",
        "shout",
        json!({ "text": "hi" }).to_string(),
    ));
    assert_eq!(result.content_json().unwrap(), json!("HI"));
}

#[test]
fn loading_twice_is_idempotent() {
    let registry = ToolRegistry::new();
    registry.load_tools("catalog.math").unwrap();
    let before = registry.generate_tools();

    let report = registry.load_tools("catalog::math").unwrap();
    assert!(report.loaded.is_empty());
    assert_eq!(report.skipped, vec!["loader::catalog::math"]);
    assert_eq!(registry.generate_tools(), before);
    assert_eq!(registry.len(), 2);

    // Another registry starts from scratch.
    let other = ToolRegistry::new();
    let report = other.load_tools("catalog.math").unwrap();
    assert_eq!(report.loaded, vec!["loader::catalog::math"]);
}

#[test]
fn sub_packages_and_absolute_paths() {
    let registry = ToolRegistry::new();
    registry.load_tools("loader::catalog::text").unwrap();
    assert_eq!(registry.tool_names(), vec!["shout"]);

    registry.load_tools("catalog.math").unwrap();
    assert_eq!(registry.tool_names(), vec!["shout", "multiply", "negate"]);
}

#[test]
fn failed_module_registers_nothing() {
    let registry = ToolRegistry::new();
    let report = registry.load_tools("catalog.broken").unwrap();
    assert!(report.loaded.is_empty());
    assert_eq!(report.failed, vec!["loader::catalog::broken"]);
    assert!(registry.is_empty());
    assert!(!registry.contains("innocent"));
}

#[test]
fn unknown_or_blank_packages_are_errors() {
    let registry = ToolRegistry::new();
    assert_eq!(
        registry.load_tools("catalog.missing"),
        Err(LoadError::PackageNotFound {
            package: "catalog::missing".into()
        })
    );
    assert_eq!(registry.load_tools("  "), Err(LoadError::EmptyPackage));
    // Segment boundaries are respected.
    assert!(registry.load_tools("cat").is_err());
}

#[test]
fn discovery_records_carry_their_module() {
    let shout = discovered()
        .find(|tool| tool.name() == "shout")
        .expect("shout is discovered");
    assert_eq!(shout.module_path(), "loader::catalog::text");
    assert_eq!(shout.binding().name(), "shout");
}
