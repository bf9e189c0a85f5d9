pub mod perform;
pub mod resolver;
#[cfg(test)]
pub mod integration_tests;

pub use perform::{perform_complete, perform_start, perform_task, TaskOutcome};
pub use resolver::{DefinitionRegistry, DefinitionResolver};

/// Key a definition is registered, allow-listed and reported under.
pub fn qualified_name(module: &str, name: &str) -> String {
    format!("{}::{}", module, name)
}
