use super::ColorChoice;

/// Separator between payload and color overrides in a text message
pub const FIELD_SEPARATOR: char = '|';

/// What a user asked to encode, with the colors that apply to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    pub data: String,
    pub colors: ColorChoice,
}

impl QrRequest {
    /// Parse `data`, `data|fill` or `data|fill|background`.
    ///
    /// Missing or empty color fields fall back to `defaults`. Fields past the
    /// third are ignored.
    pub fn parse(text: &str, defaults: &ColorChoice) -> Self {
        if !text.contains(FIELD_SEPARATOR) {
            return Self {
                data: text.to_string(),
                colors: defaults.clone(),
            };
        }

        let mut parts = text.split(FIELD_SEPARATOR);
        let data = parts.next().unwrap_or_default().to_string();
        let pick = |part: Option<&str>, fallback: &str| match part.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => fallback.to_string(),
        };
        let fill = pick(parts.next(), &defaults.fill);
        let background = pick(parts.next(), &defaults.background);

        Self {
            data,
            colors: ColorChoice { fill, background },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_uses_defaults() {
        let defaults = ColorChoice::new("red", "white");
        let req = QrRequest::parse("https://example.com", &defaults);
        assert_eq!(req.data, "https://example.com");
        assert_eq!(req.colors, defaults);
    }

    #[test]
    fn overrides_fill_and_background() {
        let req = QrRequest::parse("hello|blue|yellow", &ColorChoice::default());
        assert_eq!(req.data, "hello");
        assert_eq!(req.colors, ColorChoice::new("blue", "yellow"));
    }

    #[test]
    fn fill_only_keeps_default_background() {
        let req = QrRequest::parse("hello|#ff0000", &ColorChoice::new("black", "ivory"));
        assert_eq!(req.colors, ColorChoice::new("#ff0000", "ivory"));
    }

    #[test]
    fn empty_fields_fall_back() {
        let req = QrRequest::parse("hello||navy", &ColorChoice::default());
        assert_eq!(req.colors, ColorChoice::new("black", "navy"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let req = QrRequest::parse("a|red|white|green", &ColorChoice::default());
        assert_eq!(req.data, "a");
        assert_eq!(req.colors, ColorChoice::new("red", "white"));
    }
}
