//! Overlay factories.
//!
//! A host builds an isolated instance for some props, attaches its root to the
//! page, and wires the exit continuation that tears it down again. The rest of
//! the crate only talks to [`OverlayHost`], never to the document directly.

use std::rc::Rc;

use veil_core::{AnimationSpec, Timers};

use crate::document::{Document, ElementId};
use crate::error::{OverlayError, Result};
use crate::instance::{InstanceParts, OverlayInstance, OverlayProps};
use crate::options::DialogOptions;

/// Runs once after an instance's exit transition, after it was unmounted.
pub type ExitHook = Box<dyn FnOnce()>;

pub trait OverlayHost {
    /// Creates and attaches a new instance in the `created` phase. The caller
    /// opens it.
    fn create(&self, props: OverlayProps, on_exit_complete: ExitHook)
    -> Result<Rc<OverlayInstance>>;
}

/// Mounts overlays as direct children of a [`Document`] body.
pub struct DocumentHost {
    document: Document,
    timers: Timers,
    exit: AnimationSpec,
}

impl DocumentHost {
    pub fn new(document: Document, timers: Timers, exit: AnimationSpec) -> Self {
        Self {
            document,
            timers,
            exit,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn render(&self, props: &OverlayProps) -> Result<ElementId> {
        let doc = &self.document;
        let root = doc.create_element("div");
        match props {
            OverlayProps::Message(p) => {
                doc.add_class(root, "veil-message")?;
                doc.add_class(root, format!("veil-message--{}", p.severity))?;
                doc.set_text(root, p.message.clone())?;
            }
            OverlayProps::Dialog(opts) => {
                doc.add_class(root, "veil-dialog")?;
                self.render_dialog(root, opts)?;
            }
        }
        Ok(root)
    }

    fn render_dialog(&self, root: ElementId, opts: &DialogOptions) -> Result<()> {
        let doc = &self.document;
        if let Some(title) = &opts.title {
            let h = doc.create_element("h2");
            doc.add_class(h, "veil-dialog__title")?;
            doc.set_text(h, title.clone())?;
            doc.append_child(root, h)?;
        }

        let body = doc.create_element("p");
        doc.add_class(body, "veil-dialog__message")?;
        doc.set_text(body, opts.message.clone().unwrap_or_default())?;
        doc.append_child(root, body)?;

        let actions = doc.create_element("div");
        doc.add_class(actions, "veil-dialog__actions")?;
        for (class, text) in [
            ("veil-dialog__cancel", opts.cancel_text.as_deref().unwrap_or("Cancel")),
            ("veil-dialog__confirm", opts.confirm_text.as_deref().unwrap_or("Confirm")),
        ] {
            let button = doc.create_element("button");
            doc.add_class(button, class)?;
            doc.set_text(button, text)?;
            doc.append_child(actions, button)?;
        }
        doc.append_child(root, actions)?;
        Ok(())
    }
}

impl OverlayHost for DocumentHost {
    fn create(
        &self,
        props: OverlayProps,
        on_exit_complete: ExitHook,
    ) -> Result<Rc<OverlayInstance>> {
        let doc = &self.document;
        let body = doc.body().ok_or(OverlayError::NoAttachPoint)?;

        // Mount into a detached container first, then move the root to the
        // body; the container only exists for the mount.
        let container = doc.create_element("div");
        let root = self.render(&props)?;
        doc.append_child(container, root)?;
        doc.append_child(body, root)?;
        doc.remove(container);

        let kind = props.kind();
        let instance = OverlayInstance::new(
            InstanceParts {
                props,
                document: doc.clone(),
                root,
                timers: self.timers.clone(),
                exit: self.exit,
            },
            on_exit_complete,
        );

        let document = doc.clone();
        instance.scope().add_disposer(move || {
            if document.remove(root) {
                log::debug!("overlay {root:?} detached");
            }
        });
        log::debug!("created {kind:?} overlay {root:?}");
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::OverlayPhase;
    use crate::options::{MessageOptions, Severity};
    use crate::settings::OverlaySettings;
    use std::cell::Cell;
    use veil_core::{Duration, ManualClock};

    fn host(doc: &Document) -> (DocumentHost, Timers) {
        let clock = ManualClock::new();
        let timers = Timers::manual(&clock);
        (
            DocumentHost::new(doc.clone(), timers.clone(), AnimationSpec::default()),
            timers,
        )
    }

    fn message_props(text: &str, severity: Severity) -> OverlayProps {
        OverlayProps::Message(
            MessageOptions::new(text)
                .severity(severity)
                .resolve(&OverlaySettings::default()),
        )
    }

    #[test]
    fn attaches_root_to_body_without_touching_app_tree() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        let app = doc.create_element("div");
        doc.append_child(body, app).unwrap();
        let (host, _timers) = host(&doc);

        let instance = host
            .create(message_props("Saved", Severity::Success), Box::new(|| {}))
            .unwrap();

        assert_eq!(instance.phase(), OverlayPhase::Created);
        assert!(!instance.is_open());
        assert_eq!(doc.children(body), vec![app, instance.root()]);
        let el = doc.element(instance.root()).unwrap();
        assert!(el.has_class("veil-message--success"));
        assert_eq!(el.text.as_deref(), Some("Saved"));
        // body, app, and the overlay root; the mount container is gone.
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn dialog_renders_message_and_actions() {
        let doc = Document::new();
        let (host, _timers) = host(&doc);
        let instance = host
            .create(
                OverlayProps::Dialog(DialogOptions::new("Delete item?").confirm_text("Delete")),
                Box::new(|| {}),
            )
            .unwrap();

        let children = doc.children(instance.root());
        assert_eq!(children.len(), 2);
        let message = doc.element(children[0]).unwrap();
        assert_eq!(message.text.as_deref(), Some("Delete item?"));
        let buttons: Vec<_> = doc
            .children(children[1])
            .into_iter()
            .filter_map(|b| doc.element(b).and_then(|e| e.text))
            .collect();
        assert_eq!(buttons, vec!["Cancel", "Delete"]);
    }

    #[test]
    fn missing_body_is_a_configuration_error() {
        let doc = Document::headless();
        let (host, _timers) = host(&doc);
        let err = host.create(message_props("x", Severity::Info), Box::new(|| {}));
        assert!(matches!(err, Err(OverlayError::NoAttachPoint)));
        assert!(doc.is_empty());
    }

    #[test]
    fn exit_hook_runs_once_after_detach() {
        let doc = Document::new();
        let (host, timers) = host(&doc);
        let calls = Rc::new(Cell::new(0));
        let detached_first = Rc::new(Cell::new(false));

        let instance = host
            .create(message_props("bye", Severity::Info), {
                let calls = calls.clone();
                let detached_first = detached_first.clone();
                let doc = doc.clone();
                Box::new(move || {
                    calls.set(calls.get() + 1);
                    detached_first.set(doc.children(doc.body().unwrap()).is_empty());
                })
            })
            .unwrap();
        let root = instance.root();

        assert!(instance.open());
        assert!(instance.close());
        assert!(!instance.close());
        assert!(doc.contains(root));

        timers.advance(Duration::from_millis(299)).unwrap();
        assert!(doc.contains(root));
        timers.advance(Duration::from_millis(1)).unwrap();

        assert!(!doc.contains(root));
        assert_eq!(instance.phase(), OverlayPhase::Destroyed);
        assert_eq!(calls.get(), 1);
        assert!(detached_first.get());

        timers.advance(Duration::from_secs(10)).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dropping_an_unfinished_instance_detaches_it() {
        let doc = Document::new();
        let (host, timers) = host(&doc);
        let instance = host
            .create(message_props("x", Severity::Info), Box::new(|| {}))
            .unwrap();
        let root = instance.root();
        instance.show();
        assert!(instance.has_pending_timer());
        drop(instance);
        assert!(!doc.contains(root));
        assert_eq!(timers.pending(), 0);
    }
}
