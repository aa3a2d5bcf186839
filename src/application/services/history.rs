use chrono::FixedOffset;

use crate::domain::entities::QrRecord;

/// Telegram's cap on photo captions, the tighter of its two length limits
pub const CAPTION_LIMIT: usize = 1024;
/// Payload excerpt shown per entry, in characters
const DATA_PREVIEW_CHARS: usize = 100;
const COLOR_PREVIEW_CHARS: usize = 32;

/// Render a user's history as a Markdown message.
///
/// Long payloads are shortened and trailing entries dropped so the result
/// always fits into a caption edit.
pub fn format_history(records: &[QrRecord], offset: FixedOffset) -> String {
    if records.is_empty() {
        return "🚫 У вас пока нет истории.".to_string();
    }

    let mut used = telegram_len(&header(records.len()));
    let mut entries = Vec::new();
    for record in records {
        let entry = format_entry(record, offset);
        let len = telegram_len(&entry);
        if used + len > CAPTION_LIMIT {
            break;
        }
        used += len;
        entries.push(entry);
    }

    let mut msg = header(entries.len());
    for entry in entries {
        msg.push_str(&entry);
    }
    msg
}

fn header(count: usize) -> String {
    format!("📜 Ваша история последних {} QR-кодов:\n\n", count)
}

fn format_entry(record: &QrRecord, offset: FixedOffset) -> String {
    let when = record.created_at.with_timezone(&offset).format("%d.%m %H:%M");
    format!(
        "🔗 `{}`\n🎨 {} | {}\n🕒 {}\n\n",
        shorten(&record.data.replace('`', "'"), DATA_PREVIEW_CHARS),
        shorten(&record.fill_color, COLOR_PREVIEW_CHARS),
        shorten(&record.bg_color, COLOR_PREVIEW_CHARS),
        when
    )
}

fn shorten(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Length as Telegram counts it, in UTF-16 code units
pub fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}
