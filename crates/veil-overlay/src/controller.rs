use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use web_time::Duration;

use crate::deferred::{Deferred, Resolver, deferred};
use crate::document::ElementId;
use crate::error::Result;
use crate::host::OverlayHost;
use crate::instance::{OverlayInstance, OverlayPhase, OverlayProps};
use crate::options::{DialogOptions, MessageOptions, MessageProps, Severity};
use crate::settings::OverlaySettings;

type Live = RefCell<HashMap<u64, Rc<OverlayInstance>>>;

/// Owns every live overlay from creation until its exit completes, then lets
/// it go. Callers only ever get a [`Deferred`] or a weak [`MessageHandle`].
pub struct OverlayController {
    host: Rc<dyn OverlayHost>,
    settings: OverlaySettings,
    live: Rc<Live>,
    next_id: Cell<u64>,
}

impl OverlayController {
    pub fn new(host: Rc<dyn OverlayHost>, settings: OverlaySettings) -> Self {
        Self {
            host,
            settings,
            live: Rc::new(RefCell::new(HashMap::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Overlays created and not yet torn down.
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    /// The live overlay that owns `element`, for routing clicks on its
    /// buttons back to [`OverlayInstance::confirm`] / [`OverlayInstance::cancel`].
    pub fn instance_for(&self, element: ElementId) -> Option<Rc<OverlayInstance>> {
        self.live
            .borrow()
            .values()
            .find(|i| i.contains_element(element))
            .cloned()
    }

    fn adopt(&self, props: OverlayProps) -> Result<Rc<OverlayInstance>> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let live: Weak<Live> = Rc::downgrade(&self.live);
        let instance = self.host.create(
            props,
            Box::new(move || {
                if let Some(live) = live.upgrade() {
                    live.borrow_mut().remove(&id);
                }
            }),
        )?;
        self.live.borrow_mut().insert(id, instance.clone());
        Ok(instance)
    }

    /// Opens a confirmation dialog. The result is `true` if the user confirms
    /// and `false` if they cancel; whichever happens first wins.
    pub fn dialog(&self, options: DialogOptions) -> Result<Deferred<bool>> {
        let (resolver, result) = deferred();
        let instance = self.adopt(OverlayProps::Dialog(options))?;

        let resolver = Rc::new(resolver);
        let weak = Rc::downgrade(&instance);
        instance.set_on_confirm(settle(weak.clone(), resolver.clone(), true));
        instance.set_on_cancel(settle(weak, resolver, false));
        instance.open();
        Ok(result)
    }

    /// Shows a toast message and hands back its handle right away.
    pub fn message(&self, options: MessageOptions) -> Result<MessageHandle> {
        let props = options.resolve(&self.settings);
        let instance = self.adopt(OverlayProps::Message(props.clone()))?;
        let handle = MessageHandle {
            instance: Rc::downgrade(&instance),
            root: instance.root(),
            props,
        };
        handle.show();
        Ok(handle)
    }
}

fn settle(instance: Weak<OverlayInstance>, resolver: Rc<Resolver<bool>>, answer: bool) -> impl Fn() {
    move || {
        if !resolver.resolve(answer) {
            log::debug!("dialog already answered; ignoring {answer}");
            return;
        }
        if let Some(instance) = instance.upgrade() {
            instance.close();
        }
    }
}

/// Caller's view of a message. Holds no ownership: once the message has been
/// torn down every method is a harmless no-op.
#[derive(Debug, Clone)]
pub struct MessageHandle {
    instance: Weak<OverlayInstance>,
    root: ElementId,
    props: MessageProps,
}

impl MessageHandle {
    pub fn message(&self) -> &str {
        &self.props.message
    }

    pub fn severity(&self) -> Severity {
        self.props.severity
    }

    pub fn duration(&self) -> Duration {
        self.props.duration
    }

    pub fn props(&self) -> &MessageProps {
        &self.props
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn instance(&self) -> Option<Rc<OverlayInstance>> {
        self.instance.upgrade()
    }

    pub fn is_open(&self) -> bool {
        self.instance().is_some_and(|i| i.is_open())
    }

    pub fn phase(&self) -> OverlayPhase {
        self.instance()
            .map_or(OverlayPhase::Destroyed, |i| i.phase())
    }

    /// Opens the message and arms auto-dismiss. Only the first call does
    /// anything; the controller already makes it.
    pub fn show(&self) -> bool {
        self.instance().is_some_and(|i| i.show())
    }

    /// Closes early. Clears the auto-dismiss timer so it cannot fire later.
    pub fn close(&self) -> bool {
        self.instance().is_some_and(|i| i.close())
    }
}
