//! Line execution: local commands, scripts and remote requests.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::AppError;
use crate::commands::{CommandRegistry, CommandSpec, Handler, split_command};
use crate::history::History;
use crate::transport::{ConnectionStats, Transport};

/// Prompt shown before each interactive line and echoed for script lines.
pub(crate) const PROMPT: &str = "gstd> ";

/// Scripts may source other scripts up to this depth.
pub(crate) const MAX_SOURCE_DEPTH: usize = 16;

const HEADER_TITLE: &str = "COMMAND";
const HEADER_DOC: &str = "DESCRIPTION";
const COLUMN_GAP: usize = 4;

const BANNER: &str = "\
This program comes with ABSOLUTELY NO WARRANTY; for details type `warranty'.
This is free software, and you are welcome to redistribute it
under certain conditions; read the license for more details.
";

const WARRANTY: &str = "\
gst-launch under steroids

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
";

/// Whether the caller should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Shell<'io, W: Write, E: Write> {
    registry: CommandRegistry,
    transport: Transport,
    history: History,
    quiet: bool,
    depth: usize,
    stdout: &'io mut W,
    stderr: &'io mut E,
}

impl<'io, W: Write, E: Write> Shell<'io, W, E> {
    pub(crate) fn new(
        registry: CommandRegistry,
        transport: Transport,
        history: History,
        quiet: bool,
        stdout: &'io mut W,
        stderr: &'io mut E,
    ) -> Self {
        Self {
            registry,
            transport,
            history,
            quiet,
            depth: 0,
            stdout,
            stderr,
        }
    }

    /// Runs one line, reporting any failure on stderr.
    pub(crate) fn execute_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        match self.execute(line) {
            Ok(flow) => flow,
            Err(error) => {
                self.report(&error);
                Flow::Continue
            }
        }
    }

    /// Sources `path`, reporting a failure to open it on stderr.
    pub(crate) fn source_script(&mut self, path: &Path) -> Flow {
        match self.source(path) {
            Ok(flow) => flow,
            Err(error) => {
                self.report(&error);
                Flow::Continue
            }
        }
    }

    pub(crate) fn record(&mut self, line: &str) {
        self.history.push(line);
    }

    pub(crate) fn save_history(&self) -> Result<(), AppError> {
        self.history.save()
    }

    pub(crate) fn prompt(&mut self) -> Result<(), AppError> {
        write!(self.stdout, "{PROMPT}")
            .and_then(|()| self.stdout.flush())
            .map_err(AppError::Output)
    }

    pub(crate) fn print(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.stdout, "{text}").map_err(AppError::Output)
    }

    pub(crate) fn banner(&mut self) -> Result<(), AppError> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.stdout, "gstd-client {}", env!("CARGO_PKG_VERSION"))
            .and_then(|()| write!(self.stdout, "{BANNER}"))
            .map_err(AppError::Output)
    }

    pub(crate) fn report(&mut self, error: &AppError) {
        // Nowhere left to report a failing stderr.
        let _ = writeln!(self.stderr, "{error}");
    }

    #[cfg(test)]
    pub(crate) const fn connection_stats(&self) -> ConnectionStats {
        self.transport.stats()
    }

    fn execute(&mut self, line: &str) -> Result<Flow, AppError> {
        let (name, argument) = split_command(line);
        let command = self
            .registry
            .find(name)
            .ok_or_else(|| AppError::UnknownCommand(name.to_owned()))?;
        match command.handler {
            Handler::Quit => return Ok(Flow::Quit),
            Handler::Warranty => write!(self.stdout, "{WARRANTY}").map_err(AppError::Output)?,
            Handler::Help => self.help(argument)?,
            Handler::Shell => self.shell(command, argument)?,
            Handler::Source => return self.source(Path::new(required(command, argument)?)),
            Handler::Remote => {
                let body = self.transport.exchange(command.name, argument)?;
                self.print_response(&body)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn print_response(&mut self, body: &str) -> Result<(), AppError> {
        self.stdout
            .write_all(body.as_bytes())
            .map_err(AppError::Output)?;
        if !body.ends_with('\n') {
            writeln!(self.stdout).map_err(AppError::Output)?;
        }
        Ok(())
    }

    fn help(&mut self, filter: &str) -> Result<(), AppError> {
        let longest = self
            .registry
            .iter()
            .map(|spec| spec.usage.len())
            .chain([HEADER_TITLE.len()])
            .max()
            .unwrap_or_default();
        let width = longest + COLUMN_GAP;
        let mut table = format!("{HEADER_TITLE:<width$}{HEADER_DOC}\n");
        for spec in self
            .registry
            .iter()
            .filter(|spec| filter.is_empty() || spec.name == filter)
        {
            table.push_str(&format!("{:<width$}{}\n", spec.usage, spec.doc));
        }
        write!(self.stdout, "{table}").map_err(AppError::Output)
    }

    fn shell(&mut self, command: &CommandSpec, argument: &str) -> Result<(), AppError> {
        let mut words = required(command, argument)?.split_whitespace();
        let program = words.next().unwrap_or_default();
        let output = Command::new(program)
            .args(words)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|source| AppError::Shell {
                program: program.to_owned(),
                source,
            })?;
        self.stdout
            .write_all(&output.stdout)
            .and_then(|()| self.stderr.write_all(&output.stderr))
            .map_err(AppError::Output)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(AppError::ShellStatus {
                command: argument.to_owned(),
                status: output.status,
            })
        }
    }

    fn source(&mut self, path: &Path) -> Result<Flow, AppError> {
        if self.depth >= MAX_SOURCE_DEPTH {
            return Err(AppError::SourceDepth {
                limit: MAX_SOURCE_DEPTH,
            });
        }
        let script = fs::read_to_string(path).map_err(|source| AppError::Source {
            path: path.display().to_string(),
            source,
        })?;
        self.depth += 1;
        let mut flow = Flow::Continue;
        for line in script.lines().map(str::trim) {
            if !self.quiet {
                let _ = writeln!(self.stdout, "{PROMPT}{line}");
            }
            if line.is_empty() {
                continue;
            }
            self.history.push(line);
            flow = self.execute_line(line);
            if flow == Flow::Quit {
                break;
            }
        }
        self.depth -= 1;
        Ok(flow)
    }
}

fn required<'a>(command: &CommandSpec, argument: &'a str) -> Result<&'a str, AppError> {
    if argument.is_empty() {
        return Err(AppError::MissingArgument {
            usage: command.usage,
        });
    }
    Ok(argument)
}
