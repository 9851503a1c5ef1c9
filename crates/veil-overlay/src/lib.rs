//! # Dialogs and Messages
//!
//! Overlays are created on demand, outside the application's own view tree:
//! a call builds a fresh instance, attaches its root to the document body,
//! opens it, and tears it down once its exit transition has finished.
//!
//! - [`Overlays::dialog`] returns a [`Deferred<bool>`]: `true` on confirm,
//!   `false` on cancel. It resolves once.
//! - [`Overlays::message`] (and `success`, `error`, `warning`, `info`) returns a
//!   [`MessageHandle`] right away; the message closes itself after its
//!   duration (3 s by default) or when `close()` is called.
//!
//! ```rust
//! use futures::FutureExt;
//! use veil_core::{Duration, ManualClock, Timers};
//! use veil_overlay::*;
//!
//! let document = Document::new();
//! let clock = ManualClock::new();
//! let timers = Timers::manual(&clock);
//! let overlays = Overlays::for_document(&document, &timers, OverlaySettings::default());
//!
//! let toast = overlays.error("Save failed", None).unwrap();
//! assert!(toast.is_open());
//!
//! let answer = overlays.confirm(DialogOptions::new("Delete item?")).unwrap();
//! let dialog_root = document.children(document.body().unwrap())[1];
//!
//! // What the dialog's cancel button does when clicked.
//! overlays.instance_for(dialog_root).unwrap().cancel();
//! assert_eq!(answer.now_or_never(), Some(false));
//!
//! timers.advance(Duration::from_secs(5)).unwrap();
//! assert!(!toast.is_open());
//! assert_eq!(overlays.live_count(), 0);
//! ```
//!
//! Instances are built by an [`OverlayHost`]. [`DocumentHost`] renders into a
//! [`Document`]; other hosts can mount elsewhere as long as they honour the
//! exit continuation they are given.

pub mod controller;
pub mod deferred;
pub mod document;
pub mod error;
pub mod host;
pub mod instance;
pub mod options;
pub mod overlays;
pub mod settings;

pub use controller::{MessageHandle, OverlayController};
pub use deferred::{Deferred, Resolver, deferred};
pub use document::{Document, Element, ElementId};
pub use error::{OverlayError, Result};
pub use host::{DocumentHost, ExitHook, OverlayHost};
pub use instance::{Hook, InstanceParts, OverlayInstance, OverlayKind, OverlayPhase, OverlayProps};
pub use options::{DialogOptions, MessageOptions, MessageProps, Severity, UnknownSeverity};
pub use overlays::Overlays;
pub use settings::OverlaySettings;
