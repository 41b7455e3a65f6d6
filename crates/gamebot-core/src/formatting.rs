/// Split `text` into chunks of at most `limit` UTF-16 code units, the unit
/// Telegram measures message length in.
///
/// Prefers breaking after a newline inside the window; falls back to a hard
/// cut on a char boundary. Concatenating the chunks yields `text` again.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if utf16_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = window_end(rest, limit);
        if end == rest.len() {
            out.push(rest.to_string());
            break;
        }

        let cut = match rest[..end].rfind('\n') {
            Some(nl) if nl > 0 => nl + 1,
            _ => end,
        };
        out.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    out
}

pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Byte offset of the longest prefix that fits in `limit` UTF-16 units.
/// Always covers at least one char so the split makes progress.
fn window_end(text: &str, limit: usize) -> usize {
    let mut units = 0;
    for (i, c) in text.char_indices() {
        units += c.len_utf16();
        if units > limit {
            return if i == 0 { c.len_utf8() } else { i };
        }
    }
    text.len()
}
