use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use serde_json::json;
use veil_core::{Duration, ManualClock, Timers};
use veil_overlay::*;

struct Page {
    document: Document,
    timers: Timers,
    overlays: Overlays,
    app: ElementId,
}

fn page() -> Page {
    let document = Document::new();
    let body = document.body().unwrap();
    let app = document.create_element("div");
    document.append_child(body, app).unwrap();

    let clock = ManualClock::new();
    let timers = Timers::manual(&clock);
    let overlays = Overlays::for_document(&document, &timers, OverlaySettings::default());
    Page {
        document,
        timers,
        overlays,
        app,
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn error_message_scenario() {
    let p = page();
    let toast = p.overlays.error("Save failed", None).unwrap();

    assert_eq!(toast.severity(), Severity::Error);
    assert_eq!(toast.message(), "Save failed");
    assert_eq!(toast.duration(), ms(3000));
    assert!(toast.is_open());

    let instance = toast.instance().unwrap();
    let changes = Rc::new(RefCell::new(Vec::new()));
    instance.open_signal().subscribe({
        let changes = changes.clone();
        move |open| changes.borrow_mut().push(*open)
    });
    drop(instance);

    p.timers.advance(ms(2999)).unwrap();
    assert!(toast.is_open());
    p.timers.advance(ms(1)).unwrap();
    assert!(!toast.is_open());

    p.timers.advance(ms(10_000)).unwrap();
    assert!(!toast.is_open());
    assert_eq!(*changes.borrow(), vec![false]);
    assert!(!p.document.contains(toast.root()));
}

#[test]
fn cancelled_dialog_scenario() {
    let p = page();
    let body = p.document.body().unwrap();
    let answer = p
        .overlays
        .dialog_value(&json!({ "message": "Delete item?" }))
        .unwrap();

    let children = p.document.children(body);
    assert_eq!(children.len(), 2);
    let root = children[1];
    assert!(p.document.is_attached(root));

    let instance = p.overlays.instance_for(root).unwrap();
    assert!(instance.is_open());
    assert!(instance.cancel());
    drop(instance);

    assert_eq!(answer.now_or_never(), Some(false));
    // Still mounted while the exit transition runs.
    assert!(p.document.contains(root));

    p.timers.advance(ms(300)).unwrap();
    assert!(!p.document.contains(root));
    assert_eq!(p.document.children(body), vec![p.app]);
    assert_eq!(p.overlays.live_count(), 0);
}

#[test]
fn clicks_on_dialog_buttons_route_to_the_owner() {
    let p = page();
    let answer = p.overlays.confirm(DialogOptions::new("Proceed?")).unwrap();
    let root = p.document.children(p.document.body().unwrap())[1];

    let actions = *p.document.children(root).last().unwrap();
    let confirm_button = p.document.children(actions)[1];
    assert!(
        p.document
            .element(confirm_button)
            .unwrap()
            .has_class("veil-dialog__confirm")
    );

    let owner = p.overlays.instance_for(confirm_button).unwrap();
    assert!(owner.confirm());
    assert!(!owner.cancel());
    assert_eq!(answer.now_or_never(), Some(true));
    assert!(p.overlays.instance_for(p.app).is_none());
}

#[test]
fn manual_close_prevents_auto_dismiss() {
    let p = page();
    let toast = p.overlays.info("Copied", Some(ms(1000))).unwrap();
    let instance = toast.instance().unwrap();
    assert!(instance.has_pending_timer());

    p.timers.advance(ms(400)).unwrap();
    assert!(toast.close());
    assert!(!toast.close());
    assert_eq!(instance.phase(), OverlayPhase::Closing);

    // Only the exit transition is left; the dismiss timer is gone.
    assert_eq!(p.timers.pending(), 1);
    p.timers.advance(ms(300)).unwrap();
    assert_eq!(instance.phase(), OverlayPhase::Destroyed);
    drop(instance);

    p.timers.advance(ms(5000)).unwrap();
    assert_eq!(toast.phase(), OverlayPhase::Destroyed);
    assert_eq!(p.timers.pending(), 0);
}

#[test]
fn message_defaults_and_overrides() {
    let p = page();

    let plain = p.overlays.message(MessageOptions::default()).unwrap();
    assert_eq!(plain.message(), "Message");
    assert_eq!(plain.severity(), Severity::Info);
    assert_eq!(plain.duration(), ms(3000));

    for (handle, sev) in [
        (p.overlays.success("ok", None).unwrap(), Severity::Success),
        (p.overlays.warning("hmm", Some(ms(5000))).unwrap(), Severity::Warning),
        (p.overlays.info("fyi", None).unwrap(), Severity::Info),
        (p.overlays.error("no", Some(ms(10))).unwrap(), Severity::Error),
    ] {
        assert_eq!(handle.severity(), sev);
        let el = p.document.element(handle.root()).unwrap();
        assert!(el.has_class(&format!("veil-message--{sev}")));
    }

    let loose = p
        .overlays
        .message_value(&json!({ "type": "nope", "duration": "3s", "message": "Loose" }))
        .unwrap();
    assert_eq!(loose.message(), "Loose");
    assert_eq!(loose.severity(), Severity::Info);
    assert_eq!(loose.duration(), ms(3000));
}

#[test]
fn simultaneous_overlays_are_independent() {
    let p = page();
    let first = p.overlays.success("one", Some(ms(100))).unwrap();
    let second = p.overlays.success("two", Some(ms(200))).unwrap();

    p.timers.advance(ms(150)).unwrap();
    assert!(!first.is_open());
    assert!(second.is_open());

    second.close();
    p.timers.advance(ms(1000)).unwrap();
    assert_eq!(p.overlays.live_count(), 0);
    assert_eq!(p.document.children(p.document.body().unwrap()), vec![p.app]);
}

#[test]
fn opacity_fades_during_exit() {
    let p = page();
    let toast = p.overlays.info("fading", None).unwrap();
    let instance = toast.instance().unwrap();
    assert!((instance.opacity() - 1.0).abs() < f32::EPSILON);

    toast.close();
    p.timers.advance(ms(150)).unwrap();
    let mid = instance.opacity();
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn missing_body_fails_fast() {
    let document = Document::headless();
    let clock = ManualClock::new();
    let timers = Timers::manual(&clock);
    let overlays = Overlays::for_document(&document, &timers, OverlaySettings::default());

    assert!(matches!(
        overlays.dialog(DialogOptions::default()),
        Err(OverlayError::NoAttachPoint)
    ));
    assert!(matches!(
        overlays.error("x", None),
        Err(OverlayError::NoAttachPoint)
    ));
    assert_eq!(overlays.live_count(), 0);
}

#[test]
fn dropping_overlays_releases_open_dialog() {
    let p = page();
    let answer = p.overlays.dialog(DialogOptions::default()).unwrap();
    let root = p.document.children(p.document.body().unwrap())[1];

    drop(p.overlays);
    assert!(!p.document.contains(root));
    assert_eq!(answer.now_or_never(), Some(false));
}

#[test]
fn dropping_overlays_clears_pending_timers() {
    let p = page();
    let toast = p.overlays.info("x", None).unwrap();
    let closing = p.overlays.warning("y", None).unwrap();
    closing.close();
    assert_eq!(p.timers.pending(), 2);

    drop(p.overlays);
    assert!(toast.instance().is_none());
    assert!(!p.document.contains(toast.root()));
    assert!(!p.document.contains(closing.root()));
    assert_eq!(p.timers.pending(), 0);
    assert_eq!(p.timers.run_until_idle(), 0);
}

#[test]
fn unbounded_durations_do_not_crash() {
    let p = page();
    let sticky = p.overlays.info("sticky", Some(Duration::MAX)).unwrap();
    let loose = p
        .overlays
        .message_value(&json!({ "message": "huge", "duration": 1e300 }))
        .unwrap();
    assert_eq!(loose.duration(), ms(3000));

    p.timers.advance(ms(3000)).unwrap();
    assert!(sticky.is_open());
    assert!(!loose.is_open());
    assert!(sticky.close());
    p.timers.advance(ms(300)).unwrap();
    assert_eq!(p.overlays.live_count(), 0);
}
