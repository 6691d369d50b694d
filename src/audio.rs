//! Sound engine for reply playback
//!
//! Uses a channel-based architecture to handle rodio's non-Send stream.
//! The engine spawns a dedicated audio thread that owns the playback
//! infrastructure; blocking playback is requested with a reply channel so
//! no two utterances can ever overlap.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Commands sent to the audio thread
enum AudioCommand {
    PlayWait(PathBuf, mpsc::Sender<Result<(), String>>),
    Stop,
}

/// Thread-safe handle to the sound engine
#[derive(Clone)]
pub struct SoundEngine {
    sender: mpsc::Sender<AudioCommand>,
}

impl std::fmt::Debug for SoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundEngine").finish()
    }
}

impl SoundEngine {
    pub fn new() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<AudioCommand>();

        // Spawn dedicated audio thread
        thread::spawn(move || {
            Self::audio_thread(receiver);
        });

        Ok(Self { sender })
    }

    fn audio_thread(receiver: mpsc::Receiver<AudioCommand>) {
        use rodio::OutputStream;

        // Initialize audio output on this thread
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(s) => s,
            Err(e) => {
                warn!("🔇 Failed to initialize audio output: {}", e);
                // Drain commands so callers get an error instead of hanging
                while let Ok(cmd) = receiver.recv() {
                    if let AudioCommand::PlayWait(_, resp) = cmd {
                        let _ = resp.send(Err("no audio output device".to_string()));
                    }
                }
                return;
            }
        };

        // Keep stream alive
        let _stream = stream;
        let mut sink = match rodio::Sink::try_new(&stream_handle) {
            Ok(s) => s,
            Err(e) => {
                error!("❌ Failed to create audio sink: {}", e);
                return;
            }
        };

        info!("🔊 Audio thread started");

        while let Ok(cmd) = receiver.recv() {
            match cmd {
                AudioCommand::PlayWait(path, resp) => {
                    debug!("🔊 Playing file (blocking): {:?}", path);
                    let result = Self::queue_file(&sink, &path);
                    if result.is_ok() {
                        sink.sleep_until_end();
                    }
                    let _ = resp.send(result.map_err(|e| e.to_string()));
                }
                AudioCommand::Stop => {
                    debug!("🛑 Stopping playback");
                    sink.stop();
                    // Re-create sink after stop as it becomes unusable if we want to play again
                    if let Ok(new_sink) = rodio::Sink::try_new(&stream_handle) {
                        sink = new_sink;
                    }
                }
            }
        }

        info!("🔇 Audio thread stopped");
    }

    fn queue_file(sink: &rodio::Sink, path: &PathBuf) -> anyhow::Result<()> {
        use rodio::Decoder;
        use std::fs::File;
        use std::io::BufReader;

        if !path.exists() {
            anyhow::bail!("Audio file not found: {:?}", path);
        }

        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;

        sink.append(source);
        Ok(())
    }

    /// Play a single audio file and wait for completion (Sync/Blocking)
    pub fn play_file_sync<P: Into<PathBuf>>(&self, path: P) -> anyhow::Result<()> {
        let (tx, rx) = mpsc::channel();
        self.sender
            .send(AudioCommand::PlayWait(path.into(), tx))
            .map_err(|e| anyhow::anyhow!("Audio thread disconnected: {}", e))?;

        match rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(anyhow::anyhow!("playback failed: {}", e)),
            Err(_) => Err(anyhow::anyhow!("Audio thread disconnected mid-playback")),
        }
    }

    /// Stop all current playback and clear queue
    pub fn stop(&self) -> anyhow::Result<()> {
        self.sender
            .send(AudioCommand::Stop)
            .map_err(|e| anyhow::anyhow!("Audio thread disconnected: {}", e))
    }
}
