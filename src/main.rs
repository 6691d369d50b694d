//! Yumi - Voice Companion for a VTube Studio Avatar
//!
//! Interactive text/voice front-end: push-to-talk capture, Vosk
//! transcription, a remote conversational agent, and spoken replies, all
//! sequenced around one avatar-control session.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use yumi::agent::HttpAgent;
use yumi::app::{App, StdioConsole};
use yumi::asr::VoskTranscriber;
use yumi::audio::SoundEngine;
use yumi::capture::PushToTalkGate;
use yumi::config::Config;
use yumi::session::SessionManager;
use yumi::vts::VtsClient;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path override
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging: --verbose wins, otherwise the configured level
    let level = resolve_level(args.verbose, &config.log_level);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    banner();

    info!("🎤 Yumi v{} starting...", env!("CARGO_PKG_VERSION"));

    let sound_engine = Arc::new(SoundEngine::new()?);
    let tts = yumi::tts::create_engine(&config, Arc::clone(&sound_engine))?;

    let gate = PushToTalkGate::new(&config)?;
    let capture_shutdown = gate.shutdown_handle();

    let transcriber = VoskTranscriber::new(&config)?;
    let agent = HttpAgent::new(&config);
    let session = SessionManager::new(Box::new(VtsClient::new(&config)));

    let mut app = App::new(
        config,
        session,
        Box::new(gate),
        Box::new(transcriber),
        Box::new(agent),
        tts,
        Box::new(StdioConsole),
    );

    // Ctrl-c cancels a pending capture, stops playback, and ends the loop
    // at the next turn boundary so the session still closes.
    let loop_shutdown = app.shutdown_handle();
    let playback = Arc::clone(&sound_engine);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received");
            capture_shutdown.store(true, Ordering::Relaxed);
            loop_shutdown.store(true, Ordering::Relaxed);
            let _ = playback.stop();
        }
    });

    // A startup session failure exits non-zero before any turn; a normal
    // exit (including a swallowed close failure) exits zero.
    app.run().await?;

    Ok(())
}

fn resolve_level(verbose: bool, configured: &str) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::INFO)
    }
}

fn banner() {
    let art = r#"
 __   __                _
 \ \ / /   _ _ __ ___  (_)
  \ V / | | | '_ ` _ \ | |
   | || |_| | | | | | || |
   |_| \__,_|_| |_| |_||_|
"#;
    println!("{}", art.cyan());
    println!("{}", "Welcome to Yumi".cyan().bold());
    println!("{}", "made with ❤️  by the Yumi contributors".green());
}
