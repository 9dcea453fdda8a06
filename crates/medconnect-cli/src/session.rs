//! Interactive chat session on stdin/stdout.
//!
//! Lines starting with `:` drive the session itself; everything else is
//! posted to the assistant as a user message.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use medconnect_assistant::{Assistant, MemoryForm, RequestState};
use medconnect_core::models::chat::{ChatMessage, ChatRole};
use medconnect_core::models::form::{FormField, FormSnapshot};

const SESSION_HELP: &str = "\
:set <campo> <valor>  cambia un campo del formulario (p. ej. :set motivoConsulta dolor lumbar)
:unset <campo>        vacía un campo
:form                 muestra el formulario actual
:clear                limpia el historial del chat
:quit                 termina la sesión";

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Set { field: FormField, value: String },
    Unset(FormField),
    ShowForm,
    Clear,
    Quit,
    SessionHelp,
    Message(String),
    Empty,
}

/// Parse a REPL line. Errors are user-facing and printed as-is.
pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(directive) = line.strip_prefix(':') else {
        return Ok(Input::Message(line.to_string()));
    };

    let (name, rest) = directive
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .unwrap_or((directive, ""));

    match name {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err("uso: :set <campo> <valor>".to_string());
            }
            let field = field.parse::<FormField>().map_err(|e| format!("{e}"))?;
            Ok(Input::Set {
                field,
                value: value.to_string(),
            })
        }
        "unset" => {
            let field = rest.parse::<FormField>().map_err(|e| format!("{e}"))?;
            Ok(Input::Unset(field))
        }
        "form" => Ok(Input::ShowForm),
        "clear" => Ok(Input::Clear),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        "help" | "?" => Ok(Input::SessionHelp),
        other => Err(format!("comando desconocido :{other} (usa :help)")),
    }
}

/// Terminal rendering of a transcript message.
pub fn format_message(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!("> {}", message.text),
        ChatRole::Warning | ChatRole::Error => format!("[{}] {}", message.role, message.text),
        _ => message.text.clone(),
    }
}

/// Filled form fields, one `label: value` per line.
pub fn format_form(snapshot: &FormSnapshot) -> String {
    let lines: Vec<String> = snapshot
        .filled()
        .map(|(field, value)| format!("{} ({}): {value}", field.label(), field.element_id()))
        .collect();
    if lines.is_empty() {
        return "(formulario vacío)".to_string();
    }
    lines.join("\n")
}

/// Print assistant output as it lands in the transcript. User messages are
/// skipped since the user just typed them.
fn spawn_printer(assistant: &Assistant) -> JoinHandle<()> {
    let mut events = assistant.transcript().subscribe();
    let mut status = assistant.status().subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(message) if message.role == ChatRole::User => {}
                    Ok(message) => println!("{}\n", format_message(&message)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "transcript printer lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = status.borrow_and_update().clone();
                    if current.state == RequestState::Processing {
                        println!("… {}", current.text);
                    }
                }
            }
        }
    })
}

/// Run the REPL until `:quit` or end of input.
pub async fn run_chat(assistant: Assistant, form: Arc<MemoryForm>) -> eyre::Result<()> {
    let printer = spawn_printer(&assistant);
    println!("MedConnect asistente. Escribe \"ayuda\" para ver los comandos, :help para la sesión.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        debug!(input = ?input, "session input");

        match input {
            Input::Empty => {}
            Input::Quit => break,
            Input::SessionHelp => println!("{SESSION_HELP}\n"),
            Input::ShowForm => println!("{}\n", format_form(&assistant.snapshot())),
            Input::Set { field, value } => {
                form.set(field, value);
                assistant.form_changed();
            }
            Input::Unset(field) => {
                form.clear(field);
                assistant.form_changed();
            }
            Input::Clear => {
                let removed = assistant.transcript().clear().await;
                println!("({removed} mensajes eliminados)\n");
            }
            Input::Message(text) => {
                assistant.post(&text, ChatRole::User).await;
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Post one message and return the assistant's replies.
pub async fn ask(assistant: &Assistant, text: &str) -> Vec<ChatMessage> {
    assistant.post(text, ChatRole::User).await;
    assistant
        .transcript()
        .messages()
        .await
        .into_iter()
        .filter(|m| m.role != ChatRole::User)
        .collect()
}
