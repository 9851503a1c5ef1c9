//! Drives a dialog, a few toasts and a throttled resize handler on a real
//! clock. Run with `RUST_LOG=debug` to watch the overlay lifecycle.
//!
//! Optional first argument: path to a JSON settings file, e.g.
//! `{ "exit_transition_ms": 150, "message_duration_ms": 1500 }`.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use serde_json::json;
use veil_core::{Duration, Timers, debounce, throttle};
use veil_overlay::{DialogOptions, Document, Overlays, OverlaySettings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => OverlaySettings::load(&path)
            .with_context(|| format!("loading overlay settings from {path}"))?,
        None => OverlaySettings::default(),
    };

    let document = Document::new();
    let body = document.body().context("document has no body")?;
    let app = document.create_element("div");
    document.append_child(body, app)?;

    let timers = Timers::system();
    let overlays = Overlays::for_document(&document, &timers, settings);

    // Resize bursts: the throttled handler runs at most every 100ms, the
    // debounced one once things settle.
    let layouts = Rc::new(Cell::new(0u32));
    let on_resize = throttle(&timers, Duration::from_millis(100), {
        let layouts = layouts.clone();
        move |(w, h): (u32, u32)| {
            layouts.set(layouts.get() + 1);
            log::info!("relayout at {w}x{h}");
        }
    });
    let save_size = debounce(&timers, Duration::from_millis(250), |(w, h): (u32, u32)| {
        log::info!("persisting window size {w}x{h}");
    });
    for step in 0..20u32 {
        let (on_resize, save_size) = (on_resize.clone(), save_size.clone());
        timers.set_timeout(Duration::from_millis(u64::from(step) * 10), move || {
            let size = (800 + step * 4, 600);
            on_resize.call(size);
            save_size.call(size);
        });
    }

    overlays.info("Loading hosts file", Some(Duration::from_millis(800)))?;

    let answer = overlays.confirm(
        DialogOptions::new("Apply the new hosts group?")
            .title("Confirm")
            .confirm_text("Apply"),
    )?;
    let dialog_root = *document
        .children(body)
        .last()
        .context("dialog was not attached")?;

    // Stand-in for the user clicking "Apply" after a moment.
    timers.set_timeout(Duration::from_millis(600), {
        let overlays = overlays.clone();
        move || {
            if let Some(dialog) = overlays.instance_for(dialog_root) {
                dialog.confirm();
            }
        }
    });

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local({
        let overlays = overlays.clone();
        async move {
            let applied = answer.await;
            let shown = if applied {
                overlays.success("Hosts group applied", None)
            } else {
                overlays.message_value(&json!({ "message": "Nothing changed", "type": "warning" }))
            };
            if let Err(e) = shown {
                log::error!("could not show result: {e}");
            }
        }
    })?;

    loop {
        pool.run_until_stalled();
        if timers.run_due() > 0 {
            continue;
        }
        let Some(deadline) = timers.next_deadline() else {
            break;
        };
        std::thread::sleep(deadline.saturating_duration_since(timers.now()));
    }

    log::info!(
        "done: {} relayouts, {} overlays still mounted",
        layouts.get(),
        overlays.live_count()
    );
    Ok(())
}
