//! Live reload for serve mode.
//!
//! File watching, debounced rebuilds and WebSocket reload notifications.

mod debouncer;
mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::ws_handler;

/// WebSocket route for reload notifications.
pub(crate) const LIVE_RELOAD_PATH: &str = "/__pedia/live-reload";

/// Client script injected into served HTML pages.
pub(crate) const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(() => {
  const scheme = location.protocol === "https:" ? "wss" : "ws";
  const socket = new WebSocket(`${scheme}://${location.host}/__pedia/live-reload`);
  socket.addEventListener("message", () => location.reload());
})();
</script>
"#;
