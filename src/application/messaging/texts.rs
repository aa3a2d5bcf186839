//! User-facing texts

pub const COLOR_PROMPT: &str = "Выберите цвета:";
pub const COLOR_CHOSEN: &str = "✅ Цвет выбран. Отправьте текст для QR-кода.";
pub const QR_CAPTION: &str = "Вот ваш QR-код!";
pub const EMPTY_PAYLOAD: &str = "Пришлите текст или ссылку, которую нужно закодировать.";
pub const TOO_LONG: &str = "😔 Слишком много данных для одного QR-кода. Попробуйте текст покороче.";
pub const RENDER_FAILED: &str = "😔 Не получилось создать QR-код. Попробуйте ещё раз.";

pub const HELP: &str = "
📝 Как использовать:

1. Нажмите \"🆕 Создать QR-код\".
2. Выберите цвета или оставьте стандартные.
3. Отправьте текст или ссылку.
4. Получите готовый QR-код 🎉

Цвета можно указать прямо в сообщении: `текст|цвет|фон`, например `https://example.com|navy|#ffffff`.
";

pub const DEFAULT_DONATE: &str = "
❤️ Спасибо за поддержку!

Если вам нравится этот бот, расскажите о нём друзьям.
";

/// Welcome screen; personalised on `/start`, generic when returning to the menu
pub fn welcome(first_name: Option<&str>) -> String {
    let greeting = match first_name {
        Some(name) => format!("👋 Привет, {}!", escape_markdown(name)),
        None => "👋 Привет!".to_string(),
    };
    format!("\n{}\n\nЯ — бот для создания QR-кодов. Вот что я умею:\n\nВыберите действие ниже 👇\n", greeting)
}

/// Hint shown when a color spec cannot be parsed
pub fn invalid_color(spec: &str) -> String {
    format!(
        "🎨 Не знаю цвет «{}». Используйте название (red, navy), `#rrggbb` или `rgb(r, g, b)`.",
        escape_markdown(spec)
    )
}

/// Escape characters that have meaning in Telegram's legacy Markdown
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
