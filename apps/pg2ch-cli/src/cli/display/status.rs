//! Status indicators for per-item lines, such as one line per conversion
//! warning.

pub const STATUS_WARNING: &str = "⚠️";

/// `⚠️  users.payload: ...` (the warning glyph renders wide, hence two spaces)
pub fn format_warning(item: &str, message: &str) -> String {
    format!("{}  {}: {}", STATUS_WARNING, item, message)
}
