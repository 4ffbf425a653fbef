use async_trait::async_trait;
use colored::Colorize;
use muse_agent::Agent;
use muse_brainstorm::{brainstorm_agent, SessionContext, BRAINSTORM_AGENT_NAME};
use muse_core::{Config, Role};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::sync::{mpsc as std_mpsc, Arc};
use tokio::sync::{mpsc, Notify};
use tracing::{info, warn};

use super::create_provider;

const FAREWELL: &str = "Thank you for brainstorming with me! Goodbye!";
const TERMINATED: &str = "Session terminated by user. Goodbye!";

pub enum Input {
    Line(String),
    Interrupted,
    Eof,
}

/// Where the session gets its lines from.
#[async_trait]
pub trait LineReader: Send {
    async fn read(&mut self, prompt: &str) -> anyhow::Result<Input>;

    fn add_history(&mut self, _line: &str) {}
}

enum Request {
    Read(String),
    AddHistory(String),
}

/// rustyline running on its own thread, so that waiting for a line can be
/// raced against an interrupt. A read abandoned that way stays blocked
/// until the process exits.
pub struct Terminal {
    requests: std_mpsc::Sender<Request>,
    lines: mpsc::UnboundedReceiver<anyhow::Result<Input>>,
}

impl Terminal {
    pub fn new() -> anyhow::Result<Self> {
        let (requests, pending) = std_mpsc::channel();
        let (replies, lines) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("muse-readline".to_string())
            .spawn(move || editor_loop(pending, replies))?;

        Ok(Self { requests, lines })
    }
}

fn editor_loop(
    requests: std_mpsc::Receiver<Request>,
    replies: mpsc::UnboundedSender<anyhow::Result<Input>>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = replies.send(Err(e.into()));
            return;
        }
    };

    for request in requests {
        match request {
            Request::Read(prompt) => {
                let input = match editor.readline(&prompt) {
                    Ok(line) => Ok(Input::Line(line)),
                    Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                    Err(ReadlineError::Eof) => Ok(Input::Eof),
                    Err(err) => Err(err.into()),
                };
                if replies.send(input).is_err() {
                    break;
                }
            }
            Request::AddHistory(line) => {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    warn!(error = %e, "Failed to add line to editor history");
                }
            }
        }
    }
}

#[async_trait]
impl LineReader for Terminal {
    async fn read(&mut self, prompt: &str) -> anyhow::Result<Input> {
        // If the editor thread is gone, the reason is already queued on `lines`.
        let _ = self.requests.send(Request::Read(prompt.to_string()));
        match self.lines.recv().await {
            Some(input) => input,
            None => Err(anyhow::anyhow!("line editor stopped")),
        }
    }

    fn add_history(&mut self, line: &str) {
        if self.requests.send(Request::AddHistory(line.to_string())).is_err() {
            warn!("Line editor stopped; history entry dropped");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Exited,
    Interrupted,
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let agent = brainstorm_agent(create_provider(config)?, config)?;
    let mut ctx = SessionContext::new();
    let mut terminal = Terminal::new()?;

    let interrupt = Arc::new(Notify::new());
    let notifier = Arc::clone(&interrupt);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            notifier.notify_one();
        }
    });

    info!(session = %ctx.id(), model = %agent.config().model, "Starting brainstorming session");

    let mut stdout = std::io::stdout();
    let end = run_session(&agent, &mut ctx, &mut terminal, &mut stdout, &interrupt).await?;

    info!(
        session = %ctx.id(),
        ?end,
        turns = ctx.entries().len() / 2,
        ideas = ctx.ideas().len(),
        elapsed_ms = ctx.started_at().elapsed().as_millis() as u64,
        "Brainstorming session ended"
    );

    Ok(())
}

/// Drops an interrupt raised before the line just read was handed over,
/// so it cannot cancel the turn that answers it.
async fn discard_pending(interrupt: &Notify) {
    tokio::select! {
        biased;
        _ = interrupt.notified() => {}
        _ = std::future::ready(()) => {}
    }
}

/// Drives the conversation until the user leaves.
///
/// A failed turn ends the session with its error. History entries for a
/// turn are only recorded once the turn has produced an answer.
pub async fn run_session<R, W>(
    agent: &Agent<SessionContext>,
    ctx: &mut SessionContext,
    reader: &mut R,
    out: &mut W,
    interrupt: &Notify,
) -> anyhow::Result<SessionEnd>
where
    R: LineReader,
    W: Write,
{
    writeln!(out, "\n\n{}", "==== Brainstorming Assistant ====".green().bold())?;
    writeln!(out, "Type {} or {} to end the session.", "'exit'".yellow(), "'quit'".yellow())?;
    writeln!(out, "Let's start brainstorming! What topic would you like to explore today?\n")?;

    let prompt = format!("\n{} ", "You:".cyan().bold());

    loop {
        out.flush()?;
        let input = tokio::select! {
            biased;
            input = reader.read(&prompt) => input?,
            _ = interrupt.notified() => Input::Interrupted,
        };
        let line = match input {
            Input::Line(line) => line,
            Input::Eof => {
                writeln!(out, "\n{}", FAREWELL.green())?;
                return Ok(SessionEnd::Exited);
            }
            Input::Interrupted => {
                writeln!(out, "\n\n{}", TERMINATED.yellow())?;
                return Ok(SessionEnd::Interrupted);
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            writeln!(out, "\n{}", FAREWELL.green())?;
            return Ok(SessionEnd::Exited);
        }

        reader.add_history(input);
        discard_pending(interrupt).await;

        let response = tokio::select! {
            result = agent.run(ctx, input) => result?,
            _ = interrupt.notified() => {
                writeln!(out, "\n\n{}", TERMINATED.yellow())?;
                return Ok(SessionEnd::Interrupted);
            }
        };

        info!(
            iterations = response.iterations,
            tool_calls = response.tool_call_count(),
            tokens = response.usage.total(),
            "Turn completed"
        );

        ctx.append_message(Role::User, input);
        ctx.append_message(Role::Assistant, response.text());

        let label = format!("{}:", BRAINSTORM_AGENT_NAME);
        writeln!(out, "\n{} {}", label.magenta().bold(), response.text())?;
    }
}
