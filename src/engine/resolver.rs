// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Worker-side reconstruction of process definitions.
//!
//! A unit only carries the module and name of its definition. The worker turns
//! that pair back into a fresh definition instance through a
//! [`DefinitionResolver`]. This is a trust boundary: only definitions the host
//! application registered (and, when configured, allow-listed) can be
//! reconstructed.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::config::DefinitionsConfig;
use crate::engine::qualified_name;
use crate::errors::ResolveError;
use crate::traits::{LoadedDefinition, ProcessDefinition};

/// Produces a fresh definition instance for a `(module, name)` reference.
pub trait DefinitionResolver: Send + Sync {
    fn resolve(&self, module: &str, name: &str) -> Result<LoadedDefinition, ResolveError>;
}

type Constructor = Arc<dyn Fn() -> Box<dyn ProcessDefinition> + Send + Sync>;

/// Registry of definition constructors keyed by `module::name`.
///
/// Every successful `resolve` calls the constructor again, so no state is
/// shared between the instances handed out.
#[derive(Clone, Default)]
pub struct DefinitionRegistry {
    constructors: HashMap<String, Constructor>,
    allowed: Option<BTreeSet<String>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict resolution to the configured allow-list. An empty list keeps
    /// every registered definition resolvable.
    pub fn with_config(mut self, config: &DefinitionsConfig) -> Self {
        if !config.allowed.is_empty() {
            self.allowed = Some(config.allowed.iter().cloned().collect());
        }
        self
    }

    pub fn register<D>(&mut self) -> &mut Self
    where
        D: ProcessDefinition + Default + 'static,
    {
        let probe = D::default();
        let (module, name) = (probe.module(), probe.name());
        self.register_with(module, name, || Box::new(D::default()))
    }

    /// Register a constructor under an explicit module and name.
    pub fn register_with<F>(&mut self, module: &str, name: &str, constructor: F) -> &mut Self
    where
        F: Fn() -> Box<dyn ProcessDefinition> + Send + Sync + 'static,
    {
        let key = qualified_name(module, name);
        if self.constructors.contains_key(&key) {
            tracing::debug!(definition = %key, "Replacing previously registered definition");
        }
        self.constructors.insert(key, Arc::new(constructor));
        self
    }

    pub fn contains(&self, module: &str, name: &str) -> bool {
        self.constructors.contains_key(&qualified_name(module, name))
    }

    /// Registered qualified names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl DefinitionResolver for DefinitionRegistry {
    fn resolve(&self, module: &str, name: &str) -> Result<LoadedDefinition, ResolveError> {
        let key = qualified_name(module, name);

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(&key) {
                return Err(ResolveError::NotAllowed { definition: key });
            }
        }

        let constructor = self
            .constructors
            .get(&key)
            .ok_or(ResolveError::UnknownDefinition { definition: key })?;

        Ok(LoadedDefinition::from_boxed(constructor()))
    }
}

impl fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("definitions", &self.names())
            .field("allowed", &self.allowed)
            .finish()
    }
}
