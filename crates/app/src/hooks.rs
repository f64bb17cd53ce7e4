use dioxus::prelude::*;

use crate::bridge;

/// Debounce delay of the list search boxes.
pub const SEARCH_DEBOUNCE_MS: u32 = 220;

/// Follow `source` with a copy that only changes once `source` has been
/// quiet for `delay_ms`. Each change restarts the wait.
pub fn use_debounced(source: Signal<String>, delay_ms: u32) -> Signal<String> {
    let mut settled = use_signal(|| source.peek().clone());

    // A new value drops the pending resource future, so only the last one lands.
    let _pending = use_resource(move || {
        let value = source();
        async move {
            if *settled.peek() == value {
                return;
            }
            bridge::sleep_ms(delay_ms).await;
            settled.set(value);
        }
    });

    settled
}

/// Call `on_visible` whenever the element `sentinel_id` scrolls into reach.
pub fn use_infinite_scroll(sentinel_id: &'static str, on_visible: Callback<()>) {
    use_future(move || async move {
        let mut watcher = bridge::watch_sentinel(sentinel_id);
        while let Ok(true) = watcher.recv::<bool>().await {
            on_visible.call(());
        }
    });
}
