//! # Darah Bot
//!
//! Runs one Darah Report: optional upstream check, download, aggregation,
//! chart rendering and delivery to a Telegram chat.
//!
//! The `darah-report` binary wraps [`Pipeline`] with a small CLI.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod notifier;
pub mod pipeline;
pub mod telegram;

pub use error::*;
pub use notifier::{summary_text, Notifier};
pub use pipeline::{Pipeline, RunOptions, RunOutcome};
pub use telegram::{ChatSender, DryRunSender, Photo, TelegramClient};
