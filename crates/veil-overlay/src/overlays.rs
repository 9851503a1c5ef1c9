use std::rc::Rc;

use serde_json::Value;
use veil_core::{AnimationSpec, Easing, Timers};
use web_time::Duration;

use crate::controller::{MessageHandle, OverlayController};
use crate::deferred::Deferred;
use crate::document::{Document, ElementId};
use crate::error::Result;
use crate::host::{DocumentHost, OverlayHost};
use crate::instance::OverlayInstance;
use crate::options::{DialogOptions, MessageOptions, Severity};
use crate::settings::OverlaySettings;

/// The overlay API handed to application code.
///
/// Pass it to whatever needs to show dialogs or messages; clones share one
/// controller. There is no global instance.
#[derive(Clone)]
pub struct Overlays {
    controller: Rc<OverlayController>,
}

impl Overlays {
    pub fn new(host: Rc<dyn OverlayHost>, settings: OverlaySettings) -> Self {
        Self {
            controller: Rc::new(OverlayController::new(host, settings)),
        }
    }

    /// Overlays mounted into `document`'s body, with the exit transition from
    /// `settings`.
    pub fn for_document(document: &Document, timers: &Timers, settings: OverlaySettings) -> Self {
        let exit = AnimationSpec::tween(settings.exit_transition, Easing::EaseOut);
        let host = DocumentHost::new(document.clone(), timers.clone(), exit);
        Self::new(Rc::new(host), settings)
    }

    pub fn settings(&self) -> &OverlaySettings {
        self.controller.settings()
    }

    pub fn live_count(&self) -> usize {
        self.controller.live_count()
    }

    pub fn instance_for(&self, element: ElementId) -> Option<Rc<OverlayInstance>> {
        self.controller.instance_for(element)
    }

    pub fn dialog(&self, options: DialogOptions) -> Result<Deferred<bool>> {
        self.controller.dialog(options)
    }

    /// Same as [`Overlays::dialog`].
    pub fn confirm(&self, options: DialogOptions) -> Result<Deferred<bool>> {
        self.dialog(options)
    }

    /// Dialog from a loose property bag; malformed fields use defaults.
    pub fn dialog_value(&self, options: &Value) -> Result<Deferred<bool>> {
        self.dialog(DialogOptions::from_value(options))
    }

    pub fn message(&self, options: MessageOptions) -> Result<MessageHandle> {
        self.controller.message(options)
    }

    /// Message from a loose property bag; malformed fields use defaults.
    pub fn message_value(&self, options: &Value) -> Result<MessageHandle> {
        self.message(MessageOptions::from_value(options))
    }

    pub fn success(&self, text: impl Into<String>, duration: Option<Duration>) -> Result<MessageHandle> {
        self.with_severity(Severity::Success, text, duration)
    }

    pub fn error(&self, text: impl Into<String>, duration: Option<Duration>) -> Result<MessageHandle> {
        self.with_severity(Severity::Error, text, duration)
    }

    pub fn warning(&self, text: impl Into<String>, duration: Option<Duration>) -> Result<MessageHandle> {
        self.with_severity(Severity::Warning, text, duration)
    }

    pub fn info(&self, text: impl Into<String>, duration: Option<Duration>) -> Result<MessageHandle> {
        self.with_severity(Severity::Info, text, duration)
    }

    fn with_severity(
        &self,
        severity: Severity,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.message(MessageOptions {
            message: Some(text.into()),
            severity: Some(severity),
            duration,
        })
    }
}
