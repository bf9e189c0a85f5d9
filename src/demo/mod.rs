// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sample definitions used by the demo binary and the documentation.
//!
//! `Onboarding` exercises most of the builder: argument checks, a transform,
//! iteration and a concurrent sub-process (`Notifications`).

use anyhow::anyhow;
use serde_json::Value;

use crate::engine::DefinitionRegistry;
use crate::errors::{BuildError, TaskError};
use crate::kwargs;
use crate::process::{ArgType, Builder, Context, Kwargs, Task, TaskRegistry};
use crate::traits::{ExecutionMode, ProcessDefinition};

pub const DEMO_MODULE: &str = module_path!();

/// Registry that can reconstruct every demo definition.
pub fn registry() -> DefinitionRegistry {
    let mut registry = DefinitionRegistry::new();
    registry.register::<Onboarding>().register::<Notifications>();
    registry
}

fn string_arg<'a>(kwargs: &'a Kwargs, name: &str) -> Result<&'a str, TaskError> {
    kwargs
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| TaskError::non_retryable(anyhow!("argument '{}' must be a string", name)))
}

fn create_account(context: &mut Context, kwargs: &Kwargs) -> Result<(), TaskError> {
    let name = string_arg(kwargs, "name")?;
    if name.trim().is_empty() {
        return Err(TaskError::non_retryable(anyhow!("cannot create an account without a name")));
    }
    context.insert("account", name);
    tracing::info!(account = name, "Account created");
    Ok(())
}

fn send_welcome(_: &mut Context, kwargs: &Kwargs) -> Result<(), TaskError> {
    let email = string_arg(kwargs, "email")?;
    tracing::info!(email, "Welcome mail sent");
    Ok(())
}

fn provision_seat(_: &mut Context, kwargs: &Kwargs) -> Result<(), TaskError> {
    let seat = kwargs.get("seat").and_then(Value::as_u64).unwrap_or_default();
    tracing::info!(seat, "Seat provisioned");
    Ok(())
}

/// Sequential customer onboarding.
///
/// Expects a `name` string and an optional `seats` count (default 1). The
/// `notify` option (default `true`) adds the [`Notifications`] sub-process.
#[derive(Debug, Default)]
pub struct Onboarding;

impl ProcessDefinition for Onboarding {
    fn module(&self) -> &'static str {
        DEMO_MODULE
    }

    fn name(&self) -> &'static str {
        "Onboarding"
    }

    fn description(&self) -> Option<&str> {
        Some("Customer onboarding")
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        tasks
            .register(Task::new("create_account", create_account))
            .register(Task::new("send_welcome", send_welcome).described("Send the welcome mail"))
            .register(Task::new("provision_seat", provision_seat));
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.expected_arguments([("name", Some(ArgType::String))])?;
        if builder.kwargs().contains_key("seats") {
            builder.expected_arguments([("seats", Some(ArgType::optional(ArgType::Integer)))])?;
        }

        builder.task("create_account")?;

        builder.transform(
            |kwargs| {
                let name = kwargs.get("name").and_then(Value::as_str).unwrap_or_default();
                Ok(kwargs! { "email" => format!("{}@example.com", name.to_lowercase()) })
            },
            None,
            |b| b.task("send_welcome"),
        )?;

        builder.each(
            |kwargs| {
                let seats = kwargs.get("seats").and_then(Value::as_u64).unwrap_or(1);
                Ok((1..=seats).map(|seat| (kwargs! { "seat" => seat }, format!("Provision seat {}", seat))))
            },
            Some("Provision seats"),
            |b| b.task("provision_seat"),
        )?;

        if builder.option_as::<bool>("notify").unwrap_or(true) {
            builder.sub_process::<Notifications>(Some("Notify the team"))?;
        }

        Ok(())
    }
}

/// Concurrent fan-out of notifications.
#[derive(Debug, Default)]
pub struct Notifications;

impl ProcessDefinition for Notifications {
    fn module(&self) -> &'static str {
        DEMO_MODULE
    }

    fn name(&self) -> &'static str {
        "Notifications"
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Concurrent
    }

    fn register_tasks(&self, tasks: &mut TaskRegistry) {
        for channel in ["email_team", "post_chat"] {
            tasks.register(Task::new(channel, move |_, kwargs| {
                let name = kwargs.get("name").and_then(Value::as_str).unwrap_or("someone");
                tracing::info!(channel, name, "Notification sent");
                Ok(())
            }));
        }
    }

    fn define_process(&self, builder: &mut Builder<'_>) -> Result<(), BuildError> {
        builder.task("email_team")?;
        builder.task("post_chat")
    }
}
