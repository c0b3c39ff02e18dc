//! Line-oriented front end over a [`CrmStore`]: parses commands, dispatches
//! intents and renders the resulting state. Delete confirmation lives here,
//! not in the store.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{Authenticator, CrmStore};
use shared::{
    domain::{ClientFields, ClientId},
    error::{ErrorCode, ErrorPayload},
    protocol::{Intent, StoreEvent, ViewSnapshot},
};

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "crm", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ReplCommand {
    /// Sign in with a configured account
    Login { login: String, password: String },
    /// Return to the guest role
    Logout,
    /// Show the current role and permitted actions
    Whoami,
    /// List the client records visible to the current role
    List,
    /// Create a client record
    Add(NewClientArgs),
    /// Edit a client record; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: EditClientArgs,
    },
    /// Delete a client record
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct NewClientArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct EditClientArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a, A, R, W> {
    store: &'a mut CrmStore<A>,
    input: R,
    out: W,
    json: bool,
}

impl<'a, A, R, W> Console<'a, A, R, W>
where
    A: Authenticator,
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'a mut CrmStore<A>, input: R, out: W, json: bool) -> Self {
        Self {
            store,
            input,
            out,
            json,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        tracing::info!(json = self.json, "console session started");
        if !self.json {
            writeln!(
                self.out,
                "CRM console. Type \"help\" for commands and \"quit\" when finished."
            )?;
        }
        loop {
            self.prompt("crm> ")?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if self.handle_line(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(err) => {
                self.reject(ErrorCode::InvalidCommand, err.to_string())?;
                return Ok(Flow::Continue);
            }
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ReplLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) if self.json => {
                let message = err.render().to_string();
                self.reject(ErrorCode::InvalidCommand, message.trim_end())?;
                return Ok(Flow::Continue);
            }
            Err(err) => {
                write!(self.out, "{}", err.render())?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            ReplCommand::Login { login, password } => {
                self.dispatch(Intent::Login { login, password })?
            }
            ReplCommand::Logout => self.dispatch(Intent::Logout)?,
            ReplCommand::Whoami => self.render_whoami()?,
            ReplCommand::List => self.render_snapshot()?,
            ReplCommand::Add(args) => self.dispatch(Intent::CreateClient {
                fields: ClientFields::new(args.name, args.email, args.phone),
            })?,
            ReplCommand::Edit { id, fields } => {
                let id = ClientId(id);
                let fields = self.merge_edit(id, fields);
                self.dispatch(Intent::UpdateClient { id, fields })?
            }
            ReplCommand::Delete { id, yes } => {
                let id = ClientId(id);
                if yes || !self.needs_confirmation(id) {
                    self.dispatch(Intent::DeleteClient { id })?
                } else if self.json {
                    // No interactive prompt on a JSON stream.
                    self.reject(
                        ErrorCode::ConfirmationRequired,
                        format!("deleting client #{id} requires --yes"),
                    )?
                } else if self.confirm_delete(id)? {
                    self.dispatch(Intent::DeleteClient { id })?
                } else {
                    writeln!(self.out, "delete cancelled")?;
                }
            }
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, intent: Intent) -> Result<()> {
        let event = self.store.apply(intent);
        self.render_event(&event)
    }

    /// Reports a console-level failure the same way store rejections are
    /// reported.
    fn reject(&mut self, code: ErrorCode, message: impl Into<String>) -> Result<()> {
        let event = StoreEvent::Rejected {
            error: ErrorPayload::new(code, message),
        };
        self.render_event(&event)
    }

    /// Prefills omitted fields from the visible record, as an edit form would.
    fn merge_edit(&self, id: ClientId, args: EditClientArgs) -> ClientFields {
        let current = self
            .store
            .visible_clients()
            .iter()
            .find(|client| client.id == id)
            .map(|client| client.fields())
            .unwrap_or_default();
        ClientFields {
            name: args.name.unwrap_or(current.name),
            email: args.email.unwrap_or(current.email),
            phone: args.phone.unwrap_or(current.phone),
        }
    }

    fn needs_confirmation(&self, id: ClientId) -> bool {
        self.store.permissions().can_delete && self.store.registry().get(id).is_some()
    }

    fn confirm_delete(&mut self, id: ClientId) -> Result<bool> {
        let name = self
            .store
            .registry()
            .get(id)
            .map(|client| client.name.clone())
            .unwrap_or_default();
        self.prompt(&format!("delete client #{id} ({name})? [y/N] "))?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn render_event(&mut self, event: &StoreEvent) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(event)?)?;
            return Ok(());
        }
        match event {
            StoreEvent::LoggedIn { role } => writeln!(self.out, "logged in as {role}")?,
            StoreEvent::LoggedOut => writeln!(self.out, "logged out")?,
            StoreEvent::ClientCreated { client } => {
                writeln!(self.out, "created client #{} {}", client.id, client.name)?
            }
            StoreEvent::ClientUpdated { client } => {
                writeln!(self.out, "updated client #{} {}", client.id, client.name)?
            }
            StoreEvent::ClientDeleted { id, existed: true } => {
                writeln!(self.out, "deleted client #{id}")?
            }
            StoreEvent::ClientDeleted { id, existed: false } => {
                writeln!(self.out, "client #{id} was already absent")?
            }
            StoreEvent::Rejected { error } => {
                if error.field_errors.is_empty() {
                    writeln!(self.out, "error: {}", error.message)?;
                } else {
                    writeln!(self.out, "error: the record was not saved")?;
                    for field_error in &error.field_errors {
                        writeln!(self.out, "  {field_error}")?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render_whoami(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        if self.json {
            let value = serde_json::json!({
                "role": snapshot.role,
                "permissions": snapshot.permissions,
            });
            writeln!(self.out, "{value}")?;
            return Ok(());
        }
        writeln!(self.out, "role: {}", snapshot.role)?;
        writeln!(self.out, "actions: {}", action_names(&snapshot).join(", "))?;
        Ok(())
    }

    fn render_snapshot(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)?;
            return Ok(());
        }
        if !snapshot.permissions.can_view {
            writeln!(self.out, "log in to see client records")?;
            return Ok(());
        }
        if snapshot.clients.is_empty() {
            writeln!(self.out, "no client records")?;
            return Ok(());
        }
        writeln!(self.out, "{:>4}  {:<24}  {:<28}  {}", "id", "name", "email", "phone")?;
        for client in &snapshot.clients {
            writeln!(
                self.out,
                "{:>4}  {:<24}  {:<28}  {}",
                client.id, client.name, client.email, client.phone
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        if !self.json {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn action_names(snapshot: &ViewSnapshot) -> Vec<&'static str> {
    let permissions = snapshot.permissions;
    let mut actions = vec!["login", "logout"];
    if permissions.can_view {
        actions.push("list");
    }
    if permissions.can_create_or_edit {
        actions.extend(["add", "edit"]);
    }
    if permissions.can_delete {
        actions.push("delete");
    }
    actions
}

/// Splits a command line into words with POSIX shell quoting rules.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    shlex::split(line).ok_or_else(|| anyhow!("unbalanced quotes or trailing backslash"))
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
