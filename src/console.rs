//! Interactive console session.
//!
//! The session keeps one controller per entity for its whole lifetime, so the selected id,
//! the form contents and the last fetched list survive between commands, the same way each
//! admin page kept its own state.

use lares_core::render::{form_listing, records_table};
use lares_core::{
    parse_input_value, ClearPolicy, EntityController, EntityKind, EntityService, Field,
    FormError,
};
use serde_json::Value;
use std::collections::BTreeMap;

pub const HELP: &str = "\
Commands:
  use <entity>                 switch entity and load its records
  list                         reload and show records
  show <id>                    load one record into the form
  form                         show the form
  set <field> <value>          set a field (JSON or plain text)
  link <field> <entity> <id>   set a field to a reference to another record
  toggle <field> <value>       add/remove a value in a list field
  has <field> <value>          check whether a list field holds a value
  reset                        clear the form
  add                          create a record from the form
  update <id>                  update a record from the form
  select <id>                  choose the record to delete
  delete                       delete the selected record
  help                         show this text
  quit                         leave";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Use(EntityKind),
    List,
    Show(String),
    Form,
    Set(Field, Value),
    Link(Field, EntityKind, String),
    Toggle(Field, Value),
    Has(Field, Value),
    Reset,
    Add,
    Update(String),
    Select(String),
    Delete,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command: {0} (type 'help')")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "use" => Command::Use(one_arg(rest, "use <entity>")?.parse()?),
        "list" | "ls" => Command::List,
        "show" => Command::Show(one_arg(rest, "show <id>")?.to_owned()),
        "form" => Command::Form,
        "set" => {
            let (field, value) = field_and_value(rest, "set <field> <value>")?;
            Command::Set(field, value)
        }
        "link" => {
            let mut parts = rest.split_whitespace();
            let usage = "link <field> <entity> <id>";
            let (Some(field), Some(entity), Some(id), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(ParseError::Usage(usage));
            };
            Command::Link(field.parse()?, entity.parse()?, id.to_owned())
        }
        "toggle" => {
            let (field, value) = field_and_value(rest, "toggle <field> <value>")?;
            Command::Toggle(field, value)
        }
        "has" => {
            let (field, value) = field_and_value(rest, "has <field> <value>")?;
            Command::Has(field, value)
        }
        "reset" => Command::Reset,
        "add" => Command::Add,
        "update" => Command::Update(one_arg(rest, "update <id>")?.to_owned()),
        "select" => Command::Select(one_arg(rest, "select <id>")?.to_owned()),
        "delete" => Command::Delete,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

fn one_arg<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(ParseError::Usage(usage));
    }
    Ok(rest)
}

fn field_and_value(rest: &str, usage: &'static str) -> Result<(Field, Value), ParseError> {
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .ok_or(ParseError::Usage(usage))?;
    Ok((field.parse()?, parse_input_value(value.trim())))
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S> {
    controllers: BTreeMap<EntityKind, EntityController<S>>,
    current: EntityKind,
}

impl<S: EntityService> Session<S> {
    /// Build a session with one controller per entity; `make_service` supplies each service.
    pub fn new(clear_policy: ClearPolicy, mut make_service: impl FnMut(EntityKind) -> S) -> Self {
        let controllers = EntityKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    EntityController::new(kind, make_service(kind), clear_policy),
                )
            })
            .collect();
        Self {
            controllers,
            current: EntityKind::Sample,
        }
    }

    pub fn current(&self) -> EntityKind {
        self.current
    }

    pub fn controller(&self, kind: EntityKind) -> Option<&EntityController<S>> {
        self.controllers.get(&kind)
    }

    /// Run one command and return the text to show.
    pub async fn execute(&mut self, command: Command) -> (Flow, String) {
        if let Command::Use(kind) = command {
            self.current = kind;
        }
        let Some(ctl) = self.controllers.get_mut(&self.current) else {
            return (Flow::Continue, format!("no controller for {}", self.current));
        };
        let kind = ctl.kind();

        let output = match command {
            Command::Use(_) | Command::List => {
                ctl.load_all().await;
                with_error(ctl, || records_table(kind, ctl.records()))
            }
            Command::Show(id) => {
                ctl.get_form(&id).await;
                with_error(ctl, || form_listing(ctl.form()))
            }
            Command::Form => form_listing(ctl.form()),
            Command::Set(field, value) => bound(ctl.set_field(field, value)),
            Command::Link(field, target, id) => match target.reference(&id) {
                Ok(reference) => bound(ctl.set_field(field, Value::String(reference.to_string()))),
                Err(err) => format!("{err}\n"),
            },
            Command::Toggle(field, value) => bound(ctl.change_array_value(field, value)),
            Command::Has(field, value) => format!("{}\n", ctl.has_array_value(field, &value)),
            Command::Reset => {
                ctl.reset_form();
                String::new()
            }
            Command::Add => {
                ctl.add().await;
                with_error(ctl, || format!("Created {kind}\n"))
            }
            Command::Update(id) => {
                ctl.update(&id).await;
                with_error(ctl, || format!("Updated {kind} {id}\n"))
            }
            Command::Select(id) => {
                ctl.set_id(id.as_str());
                format!("Selected {kind} {id}\n")
            }
            Command::Delete => {
                ctl.delete().await;
                with_error(ctl, || {
                    format!("Deleted {kind} {}\n", ctl.current_id().unwrap_or_default())
                })
            }
            Command::Help => format!("{HELP}\n"),
            Command::Quit => return (Flow::Quit, String::new()),
        };
        (Flow::Continue, output)
    }
}

/// The error line when the last operation failed, otherwise `ok()`.
fn with_error<S: EntityService>(
    ctl: &EntityController<S>,
    ok: impl FnOnce() -> String,
) -> String {
    match ctl.error_message() {
        Some(message) => format!("error: {message}\n"),
        None => ok(),
    }
}

fn bound(result: Result<(), FormError>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(err) => format!("{err}\n"),
    }
}
