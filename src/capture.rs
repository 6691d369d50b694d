//! Push-to-talk capture gate
//!
//! A background thread watches global input events for the configured hold
//! key; `capture()` opens a scoped cpal input stream and collects audio
//! chunks for exactly the press-to-release window.

use crate::error::{YumiError, YumiResult};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rdev::{listen, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 1024;

/// PCM audio captured for one hold gesture.
///
/// Frames are contiguous and ordered by capture time. The buffer is owned by
/// the turn that captured it and consumed once by the transcriber.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    frames: Vec<Vec<i16>>,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl AudioBuffer {
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            frames: Vec::new(),
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub fn push_frame(&mut self, frame: Vec<i16>) {
        self.frames.push(frame);
    }

    /// Empty when the hold was released within one polling interval.
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    pub fn sample_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    pub fn duration_secs(&self) -> f32 {
        self.sample_count() as f32 / self.channels as f32 / self.sample_rate as f32
    }

    /// Samples in capture order.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.frames.iter().flatten().copied()
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }
}

/// Press/release edge of the hold key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Pressed,
    Released,
}

/// Produces one bounded audio buffer per hold gesture.
#[async_trait]
pub trait CaptureGate: Send + Sync {
    async fn capture(&self) -> YumiResult<AudioBuffer>;
}

/// Hold-to-talk gate backed by rdev key events and a cpal input stream.
pub struct PushToTalkGate {
    keys: Arc<Mutex<Receiver<KeyEdge>>>,
    shutdown: Arc<AtomicBool>,
    channels: u16,
    sample_rate: u32,
    poll_interval: Duration,
}

impl PushToTalkGate {
    pub fn new(config: &crate::config::Config) -> YumiResult<Self> {
        let key = parse_key(&config.ptt_key).ok_or_else(|| {
            YumiError::Capture(format!("unknown push-to-talk key '{}'", config.ptt_key))
        })?;

        let keys = start_key_listener(key);

        Ok(Self {
            keys: Arc::new(Mutex::new(keys)),
            shutdown: Arc::new(AtomicBool::new(false)),
            channels: config.channels,
            sample_rate: config.sample_rate,
            poll_interval: Duration::from_millis(config.poll_interval_ms.clamp(1, 100)),
        })
    }

    /// Flag checked on every polling tick; setting it unwinds a pending
    /// capture with a `CaptureError` instead of blocking forever.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }
}

#[async_trait]
impl CaptureGate for PushToTalkGate {
    async fn capture(&self) -> YumiResult<AudioBuffer> {
        let keys = Arc::clone(&self.keys);
        let shutdown = Arc::clone(&self.shutdown);
        let channels = self.channels;
        let sample_rate = self.sample_rate;
        let poll = self.poll_interval;

        tokio::task::spawn_blocking(move || {
            let keys = keys.lock()?;

            // Edges left over from a previous turn must not start this one.
            while keys.try_recv().is_ok() {}

            // The stream lives exactly as long as this closure, so it is
            // stopped and released on every exit path.
            let (_stream, audio_rx) = open_input_stream(channels, sample_rate)?;

            collect_held_audio(
                &keys,
                &audio_rx,
                AudioBuffer::new(channels, sample_rate),
                poll,
                &shutdown,
            )
        })
        .await
        .map_err(|e| YumiError::Capture(format!("capture task failed: {e}")))?
    }
}

/// Wait for the press edge, then append audio chunks until the release edge.
///
/// An immediate release yields an empty buffer, which is a legitimate
/// "no input" outcome rather than an error.
pub fn collect_held_audio(
    keys: &Receiver<KeyEdge>,
    audio: &Receiver<Vec<i16>>,
    mut buffer: AudioBuffer,
    poll: Duration,
    shutdown: &AtomicBool,
) -> YumiResult<AudioBuffer> {
    // Phase 1: bounded-interval wait for the press.
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Err(YumiError::Capture("capture cancelled by shutdown".into()));
        }
        match keys.recv_timeout(poll) {
            Ok(KeyEdge::Pressed) => break,
            Ok(KeyEdge::Released) => continue,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(YumiError::Capture("input listener stopped".into()));
            }
        }
    }

    // Chunks buffered before the press belong to the idle period.
    while audio.try_recv().is_ok() {}

    // Phase 2: record until release. The key edge is checked before each
    // audio read so an instant release returns before any chunk lands.
    loop {
        match keys.try_recv() {
            Ok(KeyEdge::Released) => break,
            Ok(KeyEdge::Pressed) => {}
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                return Err(YumiError::Capture("input listener stopped".into()));
            }
        }
        if shutdown.load(Ordering::Relaxed) {
            return Err(YumiError::Capture("capture cancelled by shutdown".into()));
        }
        match audio.recv_timeout(poll) {
            Ok(chunk) => buffer.push_frame(chunk),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(YumiError::Capture("audio stream closed mid-capture".into()));
            }
        }
    }

    debug!(
        "captured {} samples ({:.2}s)",
        buffer.sample_count(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Open the default input device and return the stream plus a chunk receiver.
fn open_input_stream(
    channels: u16,
    sample_rate: u32,
) -> YumiResult<(cpal::Stream, Receiver<Vec<i16>>)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| YumiError::Capture("no default input device".into()))?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    debug!("Using audio device: {}", device_name);

    let config = cpal::StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE as u32),
    };

    let (tx, rx) = mpsc::channel::<Vec<i16>>();

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if tx.send(data.to_vec()).is_err() {
                    warn!("Audio receiver dropped");
                }
            },
            |err| {
                warn!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| YumiError::Capture(format!("failed to open input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| YumiError::Capture(format!("failed to start input stream: {e}")))?;

    Ok((stream, rx))
}

/// Spawn the global key listener thread for the hold key.
fn start_key_listener(key: Key) -> Receiver<KeyEdge> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = listen(move |event: rdev::Event| match event.event_type {
            EventType::KeyPress(k) if k == key => {
                let _ = tx.send(KeyEdge::Pressed);
            }
            EventType::KeyRelease(k) if k == key => {
                let _ = tx.send(KeyEdge::Released);
            }
            _ => {}
        });
        if let Err(e) = result {
            warn!("Input listener stopped: {:?}", e);
        }
    });

    rx
}

/// Parse a key name string to an rdev Key
pub fn parse_key(name: &str) -> Option<Key> {
    match name.to_uppercase().as_str() {
        "RIGHT_SHIFT" | "RSHIFT" => Some(Key::ShiftRight),
        "LEFT_SHIFT" | "LSHIFT" | "SHIFT" => Some(Key::ShiftLeft),
        "RIGHT_CTRL" | "RCTRL" => Some(Key::ControlRight),
        "LEFT_CTRL" | "LCTRL" | "CTRL" | "CONTROL" => Some(Key::ControlLeft),
        "ALT" | "LALT" => Some(Key::Alt),
        "RIGHT_ALT" | "RALT" | "ALTGR" => Some(Key::AltGr),
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "CAPS_LOCK" | "CAPSLOCK" => Some(Key::CapsLock),
        "F1" => Some(Key::F1),
        "F2" => Some(Key::F2),
        "F3" => Some(Key::F3),
        "F4" => Some(Key::F4),
        "F5" => Some(Key::F5),
        "F6" => Some(Key::F6),
        "F7" => Some(Key::F7),
        "F8" => Some(Key::F8),
        "F9" => Some(Key::F9),
        "F10" => Some(Key::F10),
        "F11" => Some(Key::F11),
        "F12" => Some(Key::F12),
        _ => None,
    }
}
