//! Automatic translation of user-authored Q&A content.
//!
//! Leaves first: [`language`] resolves the reader's language, [`policy`]
//! decides whether a text needs translating, [`provider`] talks to DeepL,
//! [`server`] exposes the translation endpoint and [`controller`] drives one
//! displayed text through all of it.

pub mod cache;
pub mod client;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod language;
pub mod metrics;
pub mod policy;
pub mod provider;
pub mod server;

pub use client::{EndpointClient, TranslateBackend, TranslationRequest};
pub use controller::{ControllerState, TranslationController};
pub use language::LanguageCode;
pub use provider::{ProviderClient, Translator};
