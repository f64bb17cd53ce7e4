//! Small JavaScript bridges for browser features the router does not cover.

use dioxus::prelude::*;
use shared_types::ExportFile;

const DOWNLOAD_JS: &str = r#"
    const file = await dioxus.recv();
    const bytes = Uint8Array.from(atob(file.base64), (c) => c.charCodeAt(0));
    const url = URL.createObjectURL(new Blob([bytes], { type: file.mime }));
    const a = document.createElement('a');
    a.href = url;
    a.download = file.filename;
    document.body.appendChild(a);
    a.click();
    a.remove();
    setTimeout(() => URL.revokeObjectURL(url), 1000);
    return true;
"#;

/// Hand a server-built file to the browser as a download.
pub async fn download(file: &ExportFile) {
    let eval = document::eval(DOWNLOAD_JS);
    if let Err(err) = eval.send(file) {
        tracing::warn!(?err, "download bridge unavailable");
        return;
    }
    if let Err(err) = eval.await {
        tracing::warn!(?err, file = %file.filename, "download failed");
    }
}

/// Resolve after `ms` milliseconds on the browser clock.
pub async fn sleep_ms(ms: u32) {
    let _ = document::eval(&format!(
        "await new Promise((r) => setTimeout(r, {ms})); return true;"
    ))
    .await;
}

/// Start watching the element with `id`. The returned handle yields `true`
/// whenever the element is within reach of the viewport; a periodic check
/// covers pages too short to scroll. The script ends, and the handle closes,
/// once the element it watched leaves the page without a replacement.
pub fn watch_sentinel(id: &str) -> document::Eval {
    document::eval(&sentinel_script(id))
}

fn sentinel_script(id: &str) -> String {
    format!(
        r#"
        const id = {id:?};
        const near = (el) => el.getBoundingClientRect().top < window.innerHeight + 200;
        const io = new IntersectionObserver((entries) => {{
            if (entries.some((e) => e.isIntersecting)) dioxus.send(true);
        }}, {{ rootMargin: '200px' }});
        let watched = null;
        for (;;) {{
            const el = document.getElementById(id);
            if (!el && watched && !watched.isConnected) {{
                io.disconnect();
                return false;
            }}
            if (el && el !== watched) {{
                io.disconnect();
                io.observe(el);
                watched = el;
            }}
            if (el && near(el)) dioxus.send(true);
            await new Promise((r) => setTimeout(r, 400));
        }}
        "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_script_stops_once_the_element_is_gone() {
        let js = sentinel_script("people-sentinel");
        assert!(js.contains(r#"const id = "people-sentinel";"#));
        assert!(!js.contains("while (true)"));

        let exit = js.find("!watched.isConnected").unwrap();
        let disconnect = js[exit..].find("io.disconnect();").unwrap();
        let stop = js[exit..].find("return false;").unwrap();
        assert!(disconnect < stop);
    }

    #[test]
    fn sentinel_id_is_a_js_string_literal() {
        let js = sentinel_script(r#"odd"id"#);
        assert!(js.contains(r#"const id = "odd\"id";"#));
    }
}
