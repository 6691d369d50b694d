//! Yumi Library
//!
//! Core modules for the Yumi voice companion application.

pub mod agent;
pub mod app;
pub mod asr;
pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod session;
pub mod tts;
pub mod vts;
pub mod wav;
