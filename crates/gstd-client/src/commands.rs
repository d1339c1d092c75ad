//! The ordered command table.

use std::collections::HashSet;

use crate::AppError;

/// What running a command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    Warranty,
    Quit,
    Help,
    Shell,
    Source,
    /// Forwarded to the daemon unchanged.
    Remote,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandSpec {
    pub(crate) name: &'static str,
    pub(crate) handler: Handler,
    pub(crate) doc: &'static str,
    pub(crate) usage: &'static str,
}

const fn command(
    name: &'static str,
    handler: Handler,
    doc: &'static str,
    usage: &'static str,
) -> CommandSpec {
    CommandSpec {
        name,
        handler,
        doc,
        usage,
    }
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    command("warranty", Handler::Warranty, "Prints Gstd warranty", "warranty"),
    command("quit", Handler::Quit, "Exits Gstd client", "quit"),
    command("exit", Handler::Quit, "Exits Gstd client", "exit"),
    command("help", Handler::Help, "Prints help information", "help [command]"),
    command(
        "create",
        Handler::Remote,
        "Creates a resource at the given URI",
        "create <URI> [property value ...]",
    ),
    command(
        "read",
        Handler::Remote,
        "Reads the resource at the given URI",
        "read <URI>",
    ),
    command(
        "update",
        Handler::Remote,
        "Updates the resource at the given URI",
        "update <URI> <value>",
    ),
    command(
        "delete",
        Handler::Remote,
        "Deletes the resource held at the given URI with the given name",
        "delete <URI> <name>",
    ),
    command("sh", Handler::Shell, "Executes a shell command", "sh <command>"),
    command(
        "source",
        Handler::Source,
        "Sources a file with commands",
        "source <file>",
    ),
    command(
        "pipeline_create",
        Handler::Remote,
        "Creates a new pipeline based on the name and description",
        "pipeline_create <name> <description>",
    ),
    command(
        "pipeline_delete",
        Handler::Remote,
        "Deletes the pipeline with the given name",
        "pipeline_delete <name>",
    ),
    command(
        "pipeline_play",
        Handler::Remote,
        "Sets the pipeline to playing",
        "pipeline_play <name>",
    ),
    command(
        "pipeline_pause",
        Handler::Remote,
        "Sets the pipeline to paused",
        "pipeline_pause <name>",
    ),
    command(
        "pipeline_stop",
        Handler::Remote,
        "Sets the pipeline to null",
        "pipeline_stop <name>",
    ),
    command(
        "element_set",
        Handler::Remote,
        "Sets a property in an element of a given pipeline",
        "element_set <pipe> <element> <property> <value>",
    ),
    command(
        "element_get",
        Handler::Remote,
        "Queries a property in an element of a given pipeline",
        "element_get <pipe> <element> <property>",
    ),
    command(
        "list_pipelines",
        Handler::Remote,
        "List the existing pipelines",
        "list_pipelines",
    ),
    command(
        "list_elements",
        Handler::Remote,
        "List the elements in a given pipeline",
        "list_elements <pipe>",
    ),
    command(
        "list_properties",
        Handler::Remote,
        "List the properties of an element in a given pipeline",
        "list_properties <pipe> <element>",
    ),
];

/// Name lookup over a duplicate-free command table, in table order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandRegistry {
    commands: &'static [CommandSpec],
}

impl CommandRegistry {
    /// Builds a registry over `commands`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCommand`] when two entries share a name.
    pub(crate) fn new(commands: &'static [CommandSpec]) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = commands.iter().find(|spec| !seen.insert(spec.name)) {
            return Err(AppError::DuplicateCommand(duplicate.name));
        }
        Ok(Self { commands })
    }

    pub(crate) fn standard() -> Result<Self, AppError> {
        Self::new(COMMANDS)
    }

    pub(crate) fn find(&self, name: &str) -> Option<&'static CommandSpec> {
        self.commands.iter().find(|spec| spec.name == name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'static CommandSpec> {
        self.commands.iter()
    }
}

/// Splits a line into its command name and the trimmed remainder.
pub(crate) fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (line, ""),
    }
}
