//! A live overlay and its state machine.
//!
//! ```text
//! created --open()/show()--> open --close()--> closing --exit timer--> destroyed
//! ```
//!
//! Every transition happens at most once; a closed instance is never reopened.
//! An instance owns at most one pending timer (auto-dismiss or exit) and a
//! [`Scope`] that releases its timer, hooks and document nodes on teardown.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use veil_core::{AnimationSpec, Dispose, Scope, Signal, TimerId, Timers, Transition, signal};
use web_time::Duration;

use crate::document::{Document, ElementId};
use crate::options::{DialogOptions, MessageProps};

pub type Hook = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Dialog,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Created,
    Open,
    Closing,
    Destroyed,
}

/// The kind of overlay together with its configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayProps {
    Dialog(DialogOptions),
    Message(MessageProps),
}

impl OverlayProps {
    pub fn kind(&self) -> OverlayKind {
        match self {
            OverlayProps::Dialog(_) => OverlayKind::Dialog,
            OverlayProps::Message(_) => OverlayKind::Message,
        }
    }
}

/// What a host hands over when it builds an instance.
pub struct InstanceParts {
    pub props: OverlayProps,
    pub document: Document,
    pub root: ElementId,
    pub timers: Timers,
    pub exit: AnimationSpec,
}

pub struct OverlayInstance {
    this: Weak<OverlayInstance>,
    props: OverlayProps,
    document: Document,
    root: ElementId,
    timers: Timers,
    open: Signal<bool>,
    phase: Cell<OverlayPhase>,
    pub(crate) on_confirm: RefCell<Option<Hook>>,
    pub(crate) on_cancel: RefCell<Option<Hook>>,
    timer: Rc<Cell<Option<TimerId>>>,
    fade: RefCell<Transition<f32>>,
    after_exit: Dispose,
    scope: Scope,
}

impl OverlayInstance {
    /// Builds an instance whose exit continuation unmounts it and then calls
    /// `on_exit_complete`. The continuation runs exactly once, when the exit
    /// transition finishes.
    pub fn new(parts: InstanceParts, on_exit_complete: impl FnOnce() + 'static) -> Rc<Self> {
        let InstanceParts {
            props,
            document,
            root,
            timers,
            exit,
        } = parts;

        let instance = Rc::new_cyclic(|this: &Weak<OverlayInstance>| {
            let weak = this.clone();
            let after_exit = Dispose::new(move || {
                if let Some(instance) = weak.upgrade() {
                    instance.unmount();
                }
                on_exit_complete();
            });
            OverlayInstance {
                this: this.clone(),
                props,
                document,
                root,
                timers,
                open: signal(false),
                phase: Cell::new(OverlayPhase::Created),
                on_confirm: RefCell::new(None),
                on_cancel: RefCell::new(None),
                timer: Rc::new(Cell::new(None)),
                fade: RefCell::new(Transition::new(1.0, 0.0, exit)),
                after_exit,
                scope: Scope::new(),
            }
        });

        // Holds the timer slot itself: this also runs from the instance's own
        // drop, when the instance can no longer be upgraded.
        let weak = Rc::downgrade(&instance);
        let timers = instance.timers.clone();
        let timer = instance.timer.clone();
        instance.scope.add_disposer(move || {
            if let Some(id) = timer.take() {
                timers.clear(id);
            }
            if let Some(instance) = weak.upgrade() {
                instance.on_confirm.borrow_mut().take();
                instance.on_cancel.borrow_mut().take();
            }
        });
        instance
    }

    pub fn props(&self) -> &OverlayProps {
        &self.props
    }

    pub fn kind(&self) -> OverlayKind {
        self.props.kind()
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether `element` is this instance's root or sits somewhere under it.
    pub fn contains_element(&self, element: ElementId) -> bool {
        let mut cur = Some(element);
        while let Some(id) = cur {
            if id == self.root {
                return true;
            }
            cur = self.document.element(id).and_then(|e| e.parent());
        }
        false
    }

    /// Reactive visibility flag, for components that render the overlay.
    pub fn open_signal(&self) -> Signal<bool> {
        self.open.clone()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase.get()
    }

    /// Cleanups registered here run when the instance is unmounted.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer
            .get()
            .is_some_and(|id| self.timers.is_scheduled(id))
    }

    /// Opacity for rendering: 1 while open, fading to 0 during the exit.
    pub fn opacity(&self) -> f32 {
        self.fade.borrow().value_at(self.timers.now())
    }

    /// `created → open`. Returns false if the instance was opened before.
    pub fn open(&self) -> bool {
        if self.phase.get() != OverlayPhase::Created {
            log::warn!("overlay {:?}: open ignored in {:?}", self.root, self.phase.get());
            return false;
        }
        self.phase.set(OverlayPhase::Open);
        self.open.set(true);
        log::debug!("overlay {:?} ({:?}) open", self.root, self.kind());
        true
    }

    /// Opens the instance and, for messages with a non-zero duration, arms
    /// the auto-dismiss timer.
    pub fn show(&self) -> bool {
        if !self.open() {
            return false;
        }
        if let OverlayProps::Message(props) = &self.props
            && !props.duration.is_zero()
        {
            self.schedule(props.duration, |instance| {
                log::debug!("overlay {:?} auto-dismissed", instance.root);
                instance.close();
            });
        }
        true
    }

    /// `open → closing`: hides the overlay, drops any pending timer and starts
    /// the exit transition. Returns false if it was not open.
    pub fn close(&self) -> bool {
        if self.phase.get() != OverlayPhase::Open {
            return false;
        }
        self.phase.set(OverlayPhase::Closing);
        self.cancel_timer();
        self.open.set(false);

        let exit = {
            let mut fade = self.fade.borrow_mut();
            fade.start(self.timers.now());
            fade.spec().total()
        };
        log::debug!("overlay {:?} closing ({exit:?} exit)", self.root);
        self.schedule(exit, |instance| instance.finish_exit());
        true
    }

    pub fn set_on_confirm(&self, f: impl Fn() + 'static) {
        *self.on_confirm.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_on_cancel(&self, f: impl Fn() + 'static) {
        *self.on_cancel.borrow_mut() = Some(Rc::new(f));
    }

    /// What the confirm button does. Inert unless the instance is open.
    pub fn confirm(&self) -> bool {
        self.fire(&self.on_confirm, "confirm")
    }

    /// What the cancel button (or the scrim) does. Inert unless open.
    pub fn cancel(&self) -> bool {
        self.fire(&self.on_cancel, "cancel")
    }

    fn fire(&self, slot: &RefCell<Option<Hook>>, name: &str) -> bool {
        if self.phase.get() != OverlayPhase::Open {
            log::debug!("overlay {:?}: {name} ignored in {:?}", self.root, self.phase.get());
            return false;
        }
        let hook = slot.borrow().clone();
        match hook {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }

    /// Replaces the pending timer with `f` after `delay`.
    fn schedule(&self, delay: Duration, f: impl FnOnce(&OverlayInstance) + 'static) {
        self.cancel_timer();
        let weak = self.this.clone();
        let id = self.timers.set_timeout(delay, move || {
            if let Some(instance) = weak.upgrade() {
                instance.timer.set(None);
                f(&instance);
            }
        });
        self.timer.set(Some(id));
    }

    fn cancel_timer(&self) {
        if let Some(id) = self.timer.take() {
            self.timers.clear(id);
        }
    }

    /// `closing → destroyed`.
    fn finish_exit(&self) {
        if self.phase.get() != OverlayPhase::Closing {
            return;
        }
        self.phase.set(OverlayPhase::Destroyed);
        log::debug!("overlay {:?} destroyed", self.root);
        self.after_exit.run();
    }

    fn unmount(&self) {
        self.scope.dispose();
    }
}

impl fmt::Debug for OverlayInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayInstance")
            .field("kind", &self.kind())
            .field("root", &self.root)
            .field("phase", &self.phase.get())
            .field("open", &self.is_open())
            .finish()
    }
}
