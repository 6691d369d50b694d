//! Orchestration loop
//!
//! Top-level state machine: startup (connect + authenticate, fatal on
//! failure), then one turn at a time — typed text or push-to-talk voice —
//! each fault-isolated at the turn boundary, then shutdown with an
//! idempotent session close.

use crate::agent::Agent;
use crate::asr::Transcriber;
use crate::capture::CaptureGate;
use crate::config::Config;
use crate::error::YumiResult;
use crate::session::SessionManager;
use crate::tts::TtsEngine;
use crate::wav;
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Operator-facing I/O, abstracted so the loop can be driven in tests.
pub trait Console: Send {
    /// Show `prompt` and read one line, trimmed of the trailing newline.
    /// `None` signals end of input and behaves like the exit choice.
    fn read_line(&mut self, prompt: &str) -> YumiResult<Option<String>>;

    fn write_line(&mut self, line: &str);
}

/// Interactive stdin/stdout console
pub struct StdioConsole;

impl Console for StdioConsole {
    fn read_line(&mut self, prompt: &str) -> YumiResult<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = std::io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Input selected for one loop iteration; never persisted across turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    TypedText(String),
    VoiceInput,
}

/// Menu selection at `TurnReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Text,
    Voice,
    Exit,
}

/// Parse the turn menu entry. Anything but `1`/`2`/`3` is rejected and
/// re-prompted without advancing the loop.
pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Text),
        "2" => Some(MenuChoice::Voice),
        "3" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Composition root: owns every collaborator for the run.
pub struct App {
    config: Config,
    session: SessionManager,
    gate: Box<dyn CaptureGate>,
    transcriber: Box<dyn Transcriber>,
    agent: Box<dyn Agent>,
    tts: Arc<dyn TtsEngine>,
    console: Box<dyn Console>,
    shutdown: Arc<AtomicBool>,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        session: SessionManager,
        gate: Box<dyn CaptureGate>,
        transcriber: Box<dyn Transcriber>,
        agent: Box<dyn Agent>,
        tts: Arc<dyn TtsEngine>,
        console: Box<dyn Console>,
    ) -> Self {
        Self {
            config,
            session,
            gate,
            transcriber,
            agent,
            tts,
            console,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends the loop at the next turn boundary, used by the
    /// signal handler. The session still closes normally.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Run the session from startup to shutdown. Returns `Err` only for a
    /// startup failure; per-turn errors are reported and absorbed.
    pub async fn run(&mut self) -> YumiResult<()> {
        if let Err(e) = self.session.connect_and_authenticate().await {
            self.console
                .write_line(&format!("{} {}", "❌".red(), e.to_string().red()));
            return Err(e.into());
        }
        self.console.write_line(
            &"✅ Connected & authenticated to VTube Studio!"
                .green()
                .to_string(),
        );

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let prompt = format!("\n{}", "1=text  2=voice  3=exit → ".cyan());
            // A lost console ends the run like EOF so the session still
            // closes on the way out.
            let entry = match self.console.read_line(&prompt) {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("console read failed: {}", e);
                    break;
                }
            };

            let request = match parse_choice(&entry) {
                Some(MenuChoice::Text) => {
                    match self
                        .console
                        .read_line(&"Enter message: ".magenta().to_string())
                    {
                        Ok(Some(text)) => TurnRequest::TypedText(text),
                        Ok(None) => break,
                        Err(e) => {
                            warn!("console read failed: {}", e);
                            break;
                        }
                    }
                }
                Some(MenuChoice::Voice) => TurnRequest::VoiceInput,
                Some(MenuChoice::Exit) => {
                    self.console.write_line(&"Goodbye!".yellow().to_string());
                    break;
                }
                None => {
                    self.console.write_line(&"Invalid entry.".red().to_string());
                    continue;
                }
            };

            // Turn boundary: a failing collaborator never ends the session.
            if let Err(e) = self.take_turn(request).await {
                self.console.write_line(&e.to_string().red().to_string());
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn take_turn(&mut self, request: TurnRequest) -> YumiResult<()> {
        let text = match request {
            TurnRequest::TypedText(text) => {
                self.console
                    .write_line(&format!("{} {}", "You:".blue(), text));
                text
            }
            TurnRequest::VoiceInput => {
                self.console.write_line(
                    &format!("Hold {} to talk...", self.config.ptt_key)
                        .yellow()
                        .to_string(),
                );
                let buffer = self.gate.capture().await?;
                self.console
                    .write_line(&"Recording stopped.".yellow().to_string());

                wav::write_wav(Path::new(&self.config.record_path), &buffer)?;

                let transcript = self.transcriber.transcribe(&buffer)?;
                if transcript.is_empty() {
                    // Valid "no speech" outcome, never an error.
                    self.console.write_line(&format!(
                        "{} {}",
                        "You said:".blue(),
                        "[no speech]".yellow()
                    ));
                    if !self.config.dispatch_on_silence {
                        return Ok(());
                    }
                } else {
                    self.console
                        .write_line(&format!("{} {}", "You said:".blue(), transcript));
                }
                transcript
            }
        };

        let reply = self.agent.dispatch(&text).await?;
        self.console
            .write_line(&format!("{} {}", "Yumi:".blue(), reply));

        self.tts.speak(&reply).await?;
        Ok(())
    }

    async fn shutdown(&mut self) {
        match self.session.close().await {
            Ok(()) => self
                .console
                .write_line(&"Session closed.".yellow().to_string()),
            // A failed teardown never masks a clean exit.
            Err(e) => warn!("{}", e),
        }
    }
}
