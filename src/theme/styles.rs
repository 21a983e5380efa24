//! Global CSS styles for ClinicDesk.
//!
//! Media frames keep a fixed minimum size in every phase so the thread does
//! not jump while attachments load.

pub const GLOBAL_STYLES: &str = r#"
/* === CSS Custom Properties === */
:root {
  --bg: #efeae2;
  --panel: #ffffff;
  --header: #075e54;
  --accent: #25d366;
  --bubble-in: #ffffff;
  --bubble-out: #d9fdd3;
  --text-primary: #111b21;
  --text-muted: #667781;
  --danger: #c0392b;
  --border: #d1d7db;

  --frame-min-width: 220px;
  --frame-min-height: 140px;
  --radius: 8px;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  background: var(--bg);
  color: var(--text-primary);
  font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
  font-size: 14px;
}

/* === Shell === */
.app-shell {
  display: flex;
  flex-direction: column;
  min-height: 100vh;
}

.nav-header {
  position: sticky;
  top: 0;
  z-index: 10;
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 10px 16px;
  background: var(--header);
  color: #ffffff;
}

.nav-title {
  display: flex;
  align-items: baseline;
  gap: 10px;
}

.app-title {
  margin: 0;
  font-size: 18px;
  font-weight: 600;
}

.nav-contact { font-weight: 500; }
.nav-contact-phone { opacity: 0.75; font-size: 12px; }

.nav-links { display: flex; gap: 12px; }

.nav-link {
  color: rgba(255, 255, 255, 0.75);
  text-decoration: none;
}

.nav-link.active,
.nav-link:hover { color: #ffffff; text-decoration: underline; }

/* === Conversation === */
.conversation {
  flex: 1;
  display: flex;
  flex-direction: column;
  gap: 6px;
  padding: 16px 6%;
}

.conversation-empty {
  margin: 40px auto;
  color: var(--text-muted);
}

.message-row { display: flex; }
.message-row-received { justify-content: flex-start; }
.message-row-sent { justify-content: flex-end; }

.message-bubble {
  max-width: 70%;
  padding: 6px 8px 4px;
  border-radius: var(--radius);
  box-shadow: 0 1px 0.5px rgba(11, 20, 26, 0.13);
}

.message-bubble-received { background: var(--bubble-in); }
.message-bubble-sent { background: var(--bubble-out); }

.message-bubble-content {
  white-space: pre-wrap;
  word-wrap: break-word;
}

.message-bubble-time {
  margin-top: 2px;
  text-align: right;
  font-size: 11px;
  color: var(--text-muted);
}

.message-attachment { margin-bottom: 4px; }

.message-attachment__caption {
  margin-top: 4px;
  font-size: 12px;
  color: var(--text-muted);
}

/* === Media frame === */
.media-frame {
  position: relative;
  min-width: var(--frame-min-width);
  border-radius: var(--radius);
  overflow: hidden;
}

.media-frame--placeholder,
.media-frame--loading,
.media-frame--error {
  min-height: var(--frame-min-height);
  display: flex;
  align-items: center;
  justify-content: center;
  background: rgba(0, 0, 0, 0.05);
}

.media-frame--audio,
.media-frame--document { min-height: 0; }

.media-frame__image,
.media-frame__video {
  display: block;
  max-width: 100%;
  max-height: 360px;
}

.media-frame__audio { width: 100%; }

.media-frame__loading { display: flex; }

.loading-spinner {
  width: 28px;
  height: 28px;
  border: 3px solid var(--border);
  border-top-color: var(--header);
  border-radius: 50%;
  animation: spin 0.9s linear infinite;
}

@keyframes spin { to { transform: rotate(360deg); } }

.media-frame__error {
  display: flex;
  align-items: center;
  gap: 6px;
  color: var(--danger);
  font-size: 13px;
}

.media-frame__document {
  display: flex;
  align-items: center;
  gap: 8px;
  padding: 8px;
  background: rgba(0, 0, 0, 0.04);
}

.media-frame__document-name {
  flex: 1;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.media-frame__document-note {
  font-size: 12px;
  color: var(--text-muted);
}

/* === Buttons === */
.btn {
  padding: 4px 10px;
  border-radius: 4px;
  border: 1px solid var(--border);
  cursor: pointer;
  font: inherit;
}

.btn--secondary { background: var(--panel); color: var(--header); }
.btn:disabled { opacity: 0.5; cursor: default; }

/* === Diagnostics === */
.diagnostics { padding: 24px; }

.diagnostics-table {
  border-collapse: collapse;
  background: var(--panel);
  border-radius: var(--radius);
}

.diagnostics-table th,
.diagnostics-table td {
  padding: 8px 14px;
  border-bottom: 1px solid var(--border);
  text-align: left;
}

.diagnostics-table th { color: var(--text-muted); font-weight: 500; }
"#;
