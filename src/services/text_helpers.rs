use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("BODY is a valid regex pattern")
});
static NON_CONTENT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>",
        r"|<noscript[^>]*>.*?</noscript>|<svg[^>]*>.*?</svg>|<!--.*?-->",
    ))
    .expect("NON_CONTENT_BLOCKS is a valid regex pattern")
});
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("TAG is a valid regex pattern"));
static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("TITLE is a valid regex pattern")
});
static FIRST_H1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("FIRST_H1 is a valid regex pattern")
});
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});")
        .expect("ENTITY is a valid regex pattern")
});
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE is a valid regex pattern"));
static TRANSCRIPT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("TRANSCRIPT_LINE is a valid regex pattern")
});
static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:https?://)?(?:www\.|m\.)?",
        r"(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/)|youtu\.be/)",
        r"([A-Za-z0-9_-]{11})",
    ))
    .expect("YOUTUBE_ID is a valid regex pattern")
});

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Decodes named and numeric character references in a single pass.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let hex = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"));
            let decoded = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "ndash" => Some('–'),
                    "mdash" => Some('—'),
                    "hellip" => Some('…'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn strip_markup(fragment: &str) -> String {
    let without_tags = TAG.replace_all(fragment, " ");
    collapse_whitespace(&decode_entities(&without_tags))
}

/// Visible text of an HTML page: the body without scripts, styles and markup.
pub fn html_to_text(html: &str) -> String {
    let body = BODY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(html, |m| m.as_str());
    let visible = NON_CONTENT_BLOCKS.replace_all(body, " ");
    strip_markup(&visible)
}

/// The page `<title>`, falling back to the first `<h1>`.
pub fn html_title(html: &str) -> Option<String> {
    [&*TITLE, &*FIRST_H1].iter().find_map(|pattern| {
        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| strip_markup(m.as_str()))
            .filter(|title| !title.is_empty())
    })
}

pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Joins the caption lines of a timedtext XML document.
pub fn transcript_text(xml: &str) -> String {
    let lines: Vec<String> = TRANSCRIPT_LINE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        // caption text is frequently entity-encoded twice
        .map(|m| collapse_whitespace(&decode_entities(&decode_entities(m.as_str()))))
        .filter(|line| !line.is_empty())
        .collect();
    lines.join(" ")
}

/// Shortens `text` to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
