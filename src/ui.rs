//! Terminal output helpers
//!
//! Output decoration is suppressed when stdout is not a terminal or when
//! `PROVIS_NO_COLOR` is set, so piped and CI output stays plain.

use std::io::stdout;

use is_terminal::IsTerminal;

/// Whether output should skip decorative glyphs
pub fn plain() -> bool {
    std::env::var_os("PROVIS_NO_COLOR").is_some() || !stdout().is_terminal()
}

/// Pick the decorated or plain form of a status glyph
pub fn glyph(decorated: &'static str, fallback: &'static str) -> &'static str {
    if plain() {
        fallback
    } else {
        decorated
    }
}

/// Compact human rendering of a millisecond duration
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}m{:02}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}
