//! Display formatting: prices, HTML escaping, product descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

/// `/command` optionally followed by arguments up to punctuation or the next
/// command.
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9_]+(?:\s+[^/\n,;.!?]+)?").expect("command pattern is valid")
});

static PLACEHOLDER_IMAGE: Lazy<String> = Lazy::new(|| {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='640' height='360'>\
<defs><linearGradient id='g' x1='0' x2='1'>\
<stop offset='0%' stop-color='#1379ff'/><stop offset='100%' stop-color='#14b8a6'/>\
</linearGradient></defs>\
<rect width='100%' height='100%' fill='url(#g)'/>\
<text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' fill='white' \
font-family='Inter, Arial' font-size='28'>ElysianLink</text></svg>";
    format!("data:image/svg+xml;charset=UTF-8,{}", urlencoding::encode(svg))
});

const NBSP: char = '\u{a0}';

/// Format a ruble amount the way `ru-RU` currency formatting does: no
/// fraction digits, non-breaking-space digit groups, trailing `₽`.
///
/// Absent or non-finite amounts format as an empty string.
pub fn format_price_rub(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return String::new();
    };
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }
    grouped.push(NBSP);
    grouped.push('₽');
    grouped
}

/// Escape the five HTML-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// SVG data URL shown when a product has no image.
pub fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.clone()
}

enum Part<'a> {
    Text(&'a str),
    Command(&'a str),
}

/// Render a product description as HTML.
///
/// Each line is split into plain-text and `/command` parts; commands are
/// wrapped in `command-highlight` spans, text in `description-text` spans.
/// Lines are joined with `<br>`, blank lines become an extra `<br>`, and
/// the trailing `<br>` is dropped. All user text is escaped.
pub fn format_description(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut html: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            html.push("<br>".to_string());
            continue;
        }

        let mut parts = Vec::new();
        let mut current = 0;
        for m in COMMAND_RE.find_iter(line) {
            if m.start() > current {
                let before = line[current..m.start()].trim();
                if !before.is_empty() {
                    parts.push(Part::Text(before));
                }
            }
            parts.push(Part::Command(m.as_str().trim()));
            current = m.end();
        }
        if current < line.len() {
            let remaining = line[current..].trim();
            if !remaining.is_empty() {
                parts.push(Part::Text(remaining));
            }
        }

        for (i, part) in parts.iter().enumerate() {
            match part {
                Part::Command(cmd) => html.push(format!(
                    "<span class=\"command-highlight\">{}</span>",
                    escape_html(cmd)
                )),
                Part::Text(txt) => html.push(format!(
                    "<span class=\"description-text\">{}</span>",
                    escape_html(txt)
                )),
            }
            if matches!(parts.get(i + 1), Some(Part::Text(_))) {
                html.push(" ".to_string());
            }
        }

        html.push("<br>".to_string());
    }

    if html.last().map(String::as_str) == Some("<br>") {
        html.pop();
    }

    html.concat()
}
