use crate::formatting::{FormatError, checked_byte_range};

/// Emoji offered by the editor's picker, in display order.
pub const EMOJI_PALETTE: [&str; 32] = [
    "😊", "👍", "🎉", "💡", "🚀", "💪", "✨", "🔥", "📈", "💼", "🎯", "⚡", "👏", "🌟", "💯", "📊",
    "🏆", "🤝", "💰", "📱", "⏰", "✅", "❌", "⭐", "🎓", "🌍", "📝", "🔑", "💬", "📢", "🎨", "🤖",
];

/// Splice `text` in at the caret and return the new buffer with the caret
/// moved past the inserted text.
pub fn insert_at(buffer: &str, caret: usize, text: &str) -> Result<(String, usize), FormatError> {
    replace_range(buffer, caret, caret, text)
}

/// Replace the scalar-value span `[start, end)` with `text`.
///
/// The returned caret sits right after the replacement.
pub fn replace_range(
    buffer: &str,
    start: usize,
    end: usize,
    text: &str,
) -> Result<(String, usize), FormatError> {
    let bytes = checked_byte_range(buffer, start, end)?;

    let mut out = String::with_capacity(buffer.len() - bytes.len() + text.len());
    out.push_str(&buffer[..bytes.start]);
    out.push_str(text);
    out.push_str(&buffer[bytes.end..]);

    Ok((out, start + text.chars().count()))
}
