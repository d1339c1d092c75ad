//! Verb parsing, alias expansion and execution against the resource tree.

use std::sync::Arc;

use gstd_types::Response;
use serde_json::Value;
use tracing::{debug, warn};

use crate::lexer::{Lexer, tokenize};
use crate::object::{ResourceObject, Session, Target, resolve};

use super::errors::DispatchError;
use super::request::CommandRequest;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// A request reduced to one of the four primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a child through the collection property at `uri`.
    Create {
        /// Path of a collection property.
        uri: String,
        /// Child name followed by its construction argument.
        args: Vec<String>,
    },
    /// Read a property, or describe an object.
    Read {
        /// Path of a property or object.
        uri: String,
    },
    /// Replace a property value.
    Update {
        /// Path of a property.
        uri: String,
        /// New value as text.
        value: String,
    },
    /// Delete a child from the collection property at `uri`.
    Delete {
        /// Path of a collection property.
        uri: String,
        /// Name of the child to destroy.
        name: String,
    },
}

impl Command {
    /// Parses a request, expanding aliases into primitives.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] for unrecognised verbs,
    /// [`DispatchError::MissingArgument`] when a positional argument is absent,
    /// [`DispatchError::InvalidArguments`] for surplus or malformed arguments
    /// and [`DispatchError::Syntax`] for unbalanced quoting.
    pub fn parse(request: &CommandRequest) -> Result<Self, DispatchError> {
        let argument = request.argument();
        match request.verb() {
            "create" => {
                let mut args = Arguments::new("create", argument);
                let uri = args.required("a path")?;
                let mut values = Vec::new();
                if let Some(name) = args.optional()? {
                    values.push(name);
                    values.extend(args.optional_value()?);
                }
                Ok(Self::Create { uri, args: values })
            }
            "read" => {
                let mut args = Arguments::new("read", argument);
                let uri = args.required("a path")?;
                args.finish()?;
                Ok(Self::Read { uri })
            }
            "update" => {
                let mut args = Arguments::new("update", argument);
                let uri = args.required("a path")?;
                let value = args.value("a value")?;
                Ok(Self::Update { uri, value })
            }
            "delete" => {
                let mut args = Arguments::new("delete", argument);
                let uri = args.required("a path")?;
                let name = args.required("a name")?;
                args.finish()?;
                Ok(Self::Delete { uri, name })
            }
            "pipeline_create" => {
                let mut args = Arguments::new("pipeline_create", argument);
                let name = args.required("a pipeline name")?;
                let description = args.value("a pipeline description")?;
                Ok(Self::Create {
                    uri: "pipelines".to_owned(),
                    args: vec![name, description],
                })
            }
            "pipeline_delete" => {
                let mut args = Arguments::new("pipeline_delete", argument);
                let name = args.segment("a pipeline name")?;
                args.finish()?;
                Ok(Self::Delete {
                    uri: "pipelines".to_owned(),
                    name,
                })
            }
            "pipeline_play" => state_change("pipeline_play", argument, "playing"),
            "pipeline_pause" => state_change("pipeline_pause", argument, "paused"),
            "pipeline_stop" => state_change("pipeline_stop", argument, "null"),
            "element_set" => {
                let mut args = Arguments::new("element_set", argument);
                let pipeline = args.segment("a pipeline name")?;
                let element = args.segment("an element name")?;
                let property = args.segment("a property name")?;
                let value = args.value("a value")?;
                Ok(Self::Update {
                    uri: format!("{pipeline}/elements/{element}/{property}"),
                    value,
                })
            }
            "element_get" => {
                let mut args = Arguments::new("element_get", argument);
                let pipeline = args.segment("a pipeline name")?;
                let element = args.segment("an element name")?;
                let property = args.segment("a property name")?;
                args.finish()?;
                Ok(Self::Read {
                    uri: format!("{pipeline}/elements/{element}/{property}"),
                })
            }
            "list_pipelines" => {
                Arguments::new("list_pipelines", argument).finish()?;
                Ok(Self::Read {
                    uri: "pipelines".to_owned(),
                })
            }
            "list_elements" => {
                let mut args = Arguments::new("list_elements", argument);
                let pipeline = args.segment("a pipeline name")?;
                args.finish()?;
                Ok(Self::Read {
                    uri: format!("{pipeline}/elements"),
                })
            }
            "list_properties" => {
                let mut args = Arguments::new("list_properties", argument);
                let pipeline = args.segment("a pipeline name")?;
                let element = args.segment("an element name")?;
                args.finish()?;
                Ok(Self::Read {
                    uri: format!("{pipeline}/elements/{element}/properties"),
                })
            }
            other => Err(DispatchError::UnknownCommand {
                verb: other.to_owned(),
            }),
        }
    }
}

fn state_change(
    verb: &'static str,
    argument: &str,
    state: &str,
) -> Result<Command, DispatchError> {
    let mut args = Arguments::new(verb, argument);
    let name = args.segment("a pipeline name")?;
    args.finish()?;
    Ok(Command::Update {
        uri: format!("{name}/state"),
        value: state.to_owned(),
    })
}

/// Positional argument reader for one verb.
struct Arguments<'a> {
    verb: &'static str,
    lexer: Lexer<'a>,
}

impl<'a> Arguments<'a> {
    fn new(verb: &'static str, argument: &'a str) -> Self {
        Self {
            verb,
            lexer: Lexer::new(argument),
        }
    }

    fn optional(&mut self) -> Result<Option<String>, DispatchError> {
        Ok(self.lexer.next_token()?)
    }

    fn required(&mut self, what: &'static str) -> Result<String, DispatchError> {
        self.optional()?.ok_or(DispatchError::MissingArgument {
            verb: self.verb,
            what,
        })
    }

    /// A token that becomes a single path segment.
    fn segment(&mut self, what: &'static str) -> Result<String, DispatchError> {
        let token = self.required(what)?;
        if token.contains('/') {
            return Err(DispatchError::invalid_arguments(format!(
                "{} expects {what} without '/', got '{token}'",
                self.verb
            )));
        }
        Ok(token)
    }

    /// Everything left, as one value.
    ///
    /// A single token is unquoted; longer text is kept verbatim so launch
    /// descriptions keep their own quoting.
    fn optional_value(mut self) -> Result<Option<String>, DispatchError> {
        let raw = self.lexer.remainder();
        if raw.is_empty() {
            return Ok(None);
        }
        let tokens = tokenize(raw)?;
        Ok(Some(match <[String; 1]>::try_from(tokens) {
            Ok([single]) => single,
            Err(_) => raw.to_owned(),
        }))
    }

    fn value(self, what: &'static str) -> Result<String, DispatchError> {
        let verb = self.verb;
        self.optional_value()?
            .ok_or(DispatchError::MissingArgument { verb, what })
    }

    fn finish(mut self) -> Result<(), DispatchError> {
        match self.lexer.next_token()? {
            Some(extra) => Err(DispatchError::invalid_arguments(format!(
                "unexpected argument '{extra}' for {}",
                self.verb
            ))),
            None => Ok(()),
        }
    }
}

/// Executes commands against the session tree.
#[derive(Clone)]
pub struct CommandRouter {
    root: Arc<dyn ResourceObject>,
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CommandRouter")
            .field("root", &self.root.name())
            .finish()
    }
}

impl CommandRouter {
    /// Creates a router rooted at `session`.
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { root: session }
    }

    /// Parses, executes and wraps a request in a response envelope.
    #[must_use]
    pub fn dispatch(&self, request: &CommandRequest) -> Response {
        debug!(
            target: DISPATCH_TARGET,
            verb = request.verb(),
            argument = request.argument(),
            "dispatching request"
        );
        match Command::parse(request).and_then(|command| self.execute(&command)) {
            Ok(payload) => Response::success(payload),
            Err(error) => {
                let code = error.return_code();
                warn!(
                    target: DISPATCH_TARGET,
                    verb = request.verb(),
                    code = code.as_u8(),
                    %error,
                    "request failed"
                );
                Response::failure(code, &error.to_string())
            }
        }
    }

    /// Executes one primitive; reads yield their value, other verbs `null`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Resource`] for failures inside the tree and
    /// [`DispatchError::InvalidArguments`] when a mutating verb names an
    /// object instead of a property.
    pub fn execute(&self, command: &Command) -> Result<Value, DispatchError> {
        match command {
            Command::Create { uri, args } => {
                let (object, property) = self.property(uri, "create")?;
                object.create(&property, args)?;
                Ok(Value::Null)
            }
            Command::Read { uri } => match resolve(&self.root, uri)? {
                Target::Object(object) => Ok(object.describe()?),
                Target::Property(object, property) => Ok(object.read(&property)?),
            },
            Command::Update { uri, value } => {
                let (object, property) = self.property(uri, "update")?;
                object.update(&property, std::slice::from_ref(value))?;
                Ok(Value::Null)
            }
            Command::Delete { uri, name } => {
                let (object, property) = self.property(uri, "delete")?;
                object.delete(&property, name)?;
                Ok(Value::Null)
            }
        }
    }

    fn property(
        &self,
        uri: &str,
        verb: &str,
    ) -> Result<(Arc<dyn ResourceObject>, String), DispatchError> {
        match resolve(&self.root, uri)? {
            Target::Property(object, property) => Ok((object, property)),
            Target::Object(object) => Err(DispatchError::invalid_arguments(format!(
                "{verb} needs a property path, '{uri}' names {} '{}'",
                object.kind(),
                object.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use gstd_types::ReturnCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::engine::SimulatedEngine;

    fn request(line: &str) -> CommandRequest {
        CommandRequest::parse(line.as_bytes()).expect("request parses")
    }

    fn parse(line: &str) -> Result<Command, DispatchError> {
        Command::parse(&request(line))
    }

    #[fixture]
    fn router() -> CommandRouter {
        CommandRouter::new(Arc::new(Session::new(Arc::new(SimulatedEngine::new()))))
    }

    #[rstest]
    #[case("read p0/state", Command::Read { uri: "p0/state".to_owned() })]
    #[case("list_pipelines", Command::Read { uri: "pipelines".to_owned() })]
    #[case("list_elements p0", Command::Read { uri: "p0/elements".to_owned() })]
    #[case(
        "list_properties p0 src",
        Command::Read { uri: "p0/elements/src/properties".to_owned() }
    )]
    #[case(
        "element_get p0 src pattern",
        Command::Read { uri: "p0/elements/src/pattern".to_owned() }
    )]
    #[case(
        "pipeline_play p0",
        Command::Update { uri: "p0/state".to_owned(), value: "playing".to_owned() }
    )]
    #[case(
        "pipeline_pause p0",
        Command::Update { uri: "p0/state".to_owned(), value: "paused".to_owned() }
    )]
    #[case(
        "pipeline_stop p0",
        Command::Update { uri: "p0/state".to_owned(), value: "null".to_owned() }
    )]
    #[case(
        "element_set p0 src pattern \"ball\"",
        Command::Update { uri: "p0/elements/src/pattern".to_owned(), value: "ball".to_owned() }
    )]
    #[case(
        "pipeline_delete p0",
        Command::Delete { uri: "pipelines".to_owned(), name: "p0".to_owned() }
    )]
    #[case(
        "delete pipelines p0",
        Command::Delete { uri: "pipelines".to_owned(), name: "p0".to_owned() }
    )]
    fn expands_aliases(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse(line).expect("command parses"), expected);
    }

    #[rstest]
    #[case("pipeline_create p0 \"videotestsrc ! fakesink\"", "videotestsrc ! fakesink")]
    #[case("pipeline_create p0 videotestsrc ! fakesink", "videotestsrc ! fakesink")]
    #[case(
        "create pipelines p0 filesrc location=\"a b.ogg\" ! fakesink",
        "filesrc location=\"a b.ogg\" ! fakesink"
    )]
    fn keeps_descriptions_whole(#[case] line: &str, #[case] description: &str) {
        let Ok(Command::Create { uri, args }) = parse(line) else {
            panic!("expected a create command");
        };
        assert_eq!(uri, "pipelines");
        assert_eq!(args, vec!["p0".to_owned(), description.to_owned()]);
    }

    #[rstest]
    #[case("fly p0", ReturnCode::BadCommand)]
    #[case("read", ReturnCode::NullArgument)]
    #[case("pipeline_create p0", ReturnCode::NullArgument)]
    #[case("element_set p0 src", ReturnCode::NullArgument)]
    #[case("read p0/state extra", ReturnCode::BadArgument)]
    #[case("pipeline_play a/b", ReturnCode::BadArgument)]
    #[case("read \"p0", ReturnCode::BadCommand)]
    fn rejects_malformed_commands(#[case] line: &str, #[case] expected: ReturnCode) {
        let error = parse(line).expect_err("command is rejected");
        assert_eq!(error.return_code(), expected);
    }

    #[rstest]
    fn runs_the_pipeline_lifecycle(router: CommandRouter) {
        let steps = [
            ("pipeline_create p0 \"videotestsrc ! fakesink\"", ReturnCode::Ok, Value::Null),
            ("read p0/state", ReturnCode::Ok, json!("null")),
            ("pipeline_play p0", ReturnCode::Ok, Value::Null),
            ("read p0/state", ReturnCode::Ok, json!("playing")),
            ("pipeline_delete p0", ReturnCode::Ok, Value::Null),
            ("read p0/state", ReturnCode::NotFound, Value::Null),
        ];
        for (line, code, payload) in steps {
            let response = router.dispatch(&request(line));
            assert_eq!(response.code, code, "{line}: {}", response.description);
            assert_eq!(response.response, payload, "{line}");
        }
    }

    #[rstest]
    fn reading_an_object_describes_it(router: CommandRouter) {
        router.dispatch(&request("pipeline_create p0 fakesrc name=src ! fakesink"));
        let response = router.dispatch(&request("read p0/elements/src"));
        assert_eq!(response.code, ReturnCode::Ok);
        assert_eq!(response.response["type"], json!("element"));
        assert_eq!(response.response["properties"]["factory"], json!("fakesrc"));
    }

    #[rstest]
    fn mutating_an_object_path_is_a_bad_argument(router: CommandRouter) {
        router.dispatch(&request("pipeline_create p0 fakesrc ! fakesink"));
        let response = router.dispatch(&request("update p0 playing"));
        assert_eq!(response.code, ReturnCode::BadArgument);
    }

    #[rstest]
    fn read_only_properties_are_not_permitted(router: CommandRouter) {
        router.dispatch(&request("pipeline_create p0 fakesrc ! fakesink"));
        let response = router.dispatch(&request("update p0/name p1"));
        assert_eq!(response.code, ReturnCode::NotPermitted);
        let name = router.dispatch(&request("read p0/name"));
        assert_eq!(name.response, json!("p0"));
    }

    #[rstest]
    #[case("create p0/state a b")]
    #[case("create p0/elements x fakesrc")]
    #[case("update p0/name p1")]
    #[case("update p0/elements/fakesink0/factory fakesrc")]
    #[case("delete p0/elements fakesink0")]
    #[case("delete p0/state playing")]
    fn verbs_outside_the_flags_change_nothing(router: CommandRouter, #[case] line: &str) {
        router.dispatch(&request("pipeline_create p0 videotestsrc ! fakesink"));
        let pipeline_before = router.dispatch(&request("read p0"));
        let elements_before = router.dispatch(&request("list_elements p0"));

        let response = router.dispatch(&request(line));

        assert_eq!(response.code, ReturnCode::NotPermitted, "{line}: {}", response.description);
        assert_eq!(response.response, Value::Null);
        assert_eq!(router.dispatch(&request("read p0")).response, pipeline_before.response);
        assert_eq!(
            router.dispatch(&request("list_elements p0")).response,
            elements_before.response
        );
        assert_eq!(elements_before.response, json!(["videotestsrc0", "fakesink0"]));
    }

    #[rstest]
    fn element_properties_round_trip(router: CommandRouter) {
        router.dispatch(&request("pipeline_create p0 videotestsrc name=src ! fakesink"));
        let set = router.dispatch(&request("element_set p0 src pattern ball"));
        assert_eq!(set.code, ReturnCode::Ok, "{}", set.description);
        let get = router.dispatch(&request("element_get p0 src pattern"));
        assert_eq!(get.response, json!("ball"));
    }
}
