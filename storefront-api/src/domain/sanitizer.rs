//! Text sanitization for every free-text field that reaches a record table.
//!
//! [`sanitize`] is pure and total. Markup is entity-encoded first, so the later
//! stripping stages match the encoded forms (`&lt;script ...`) rather than raw
//! angle brackets.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const DANGEROUS_ELEMENTS: [&str; 5] = ["script", "iframe", "object", "embed", "applet"];

const ALLOWED_TAGS: [&str; 14] = [
    "a", "b", "i", "u", "em", "strong", "img", "br", "p", "ul", "ol", "li", "span", "div",
];

static EXISTING_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:amp|lt|gt|quot|#39|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap()
});

static DANGEROUS_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    let alternatives = DANGEROUS_ELEMENTS
        .iter()
        .map(|tag| format!("&lt;{tag}.*?&lt;/{tag}&gt;"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?is){alternatives}")).unwrap()
});

static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bon\w+\s*=").unwrap());

// The name runs up to whitespace, `/` or the next entity. The body may hold
// attribute text and quote entities but never another `&lt;`.
static ANY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)&lt;/?\s*([^\s/&]*)(?:[^&]|&(?:amp|quot|#[0-9]+|#x[0-9a-f]+);)*?&gt;",
    )
    .unwrap()
});

static SCRIPTED_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)(?:href|src|action|background)\s*=\s*",
        r"(?:(?:&quot;|&#39;)\s*(?:javascript|data):.*?(?:&quot;|&#39;)",
        r"|(?:&quot;|&#39;)?\s*(?:javascript|data):(?:[^\s&]|&(?:amp|quot|#39);)*)",
    ))
    .unwrap()
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*@([A-Za-z0-9_-]+\.)+[A-Za-z]{2,}$").unwrap()
});

/// Raised when a value does not have the structure its field requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid email format")]
pub struct FormatError;

/// Neutralizes markup in untrusted text.
///
/// Stages, each fed the previous one's output:
/// 1. entity-encode `& < > " '` (existing entities are left alone)
/// 2. drop script/iframe/object/embed/applet elements with their bodies
/// 3. drop `on<event>=` handler prefixes
/// 4. drop tags outside the allow-list
/// 5. drop `javascript:`/`data:` values of href/src/action/background,
///    quoted or not
/// 6. collapse whitespace runs and trim
///
/// Stages 2-6 repeat until nothing changes, so the result is a fixed point and
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut current = encode_entities(input);
    loop {
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Sanitizes `input` and checks it against the structural email pattern.
pub fn validate_email(input: &str) -> Result<String, FormatError> {
    let sanitized = sanitize(input);
    if EMAIL.is_match(&sanitized) {
        Ok(sanitized)
    } else {
        Err(FormatError)
    }
}

fn encode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (idx, ch) in input.char_indices() {
        match ch {
            '&' if EXISTING_ENTITY.is_match(&input[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn strip_pass(input: &str) -> String {
    let text = DANGEROUS_ELEMENT.replace_all(input, "");
    let text = EVENT_HANDLER.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, |caps: &Captures| {
        let name = caps[1].to_ascii_lowercase();
        if ALLOWED_TAGS.contains(&name.as_str()) {
            caps[0].to_string()
        } else {
            String::new()
        }
    });
    let text = SCRIPTED_URI.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const HOSTILE: [&str; 10] = [
        "<script>alert(1)</script>Widget",
        "<SCRIPT src=x>\n</script >",
        "<scr<script></script>ipt>alert(1)</script>",
        "<img src=\"javascript:alert(1)\" onerror=alert(1)>",
        "<a href='data:text/html;base64,xyz'>link</a>",
        "<iframe src=evil></iframe><b>bold</b>",
        "  lots   of \t\n whitespace  ",
        "Tom & Jerry &amp; friends",
        "oonnclick==x <div onmouseover = 'x'>hi</div>",
        "<custom-tag>text</custom-tag>",
    ];

    #[test]
    fn empty_input_passes_through() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(sanitize("Product A"), "Product A");
        assert_eq!(sanitize("user@example.com"), "user@example.com");
    }

    #[test]
    fn script_element_is_removed() {
        assert_eq!(sanitize("<script>alert(1)</script>Widget"), "Widget");
    }

    #[test]
    fn nested_script_fragments_do_not_reassemble() {
        let out = sanitize("<scr<script></script>ipt>alert(1)</script>");
        assert!(!out.to_lowercase().contains("script&gt;"));
        assert!(!out.contains('<'));
    }

    #[test]
    fn allowed_tags_survive_encoded() {
        let out = sanitize("<iframe src=evil></iframe><b>bold</b>");
        assert_eq!(out, "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn unknown_tags_are_dropped() {
        assert_eq!(sanitize("<custom-tag>text</custom-tag>"), "text");
    }

    #[test]
    fn event_handlers_are_dropped() {
        let out = sanitize("<div onmouseover = 'x'>hi</div>");
        assert!(!out.to_lowercase().contains("onmouseover"));
        assert!(out.ends_with("hi&lt;/div&gt;"));
    }

    #[test]
    fn scripted_uris_are_dropped() {
        let out = sanitize("<a href='javascript:alert(1)'>link</a>");
        assert!(!out.to_lowercase().contains("javascript"));
        let out = sanitize("<a href=\"data:text/html,x\">link</a>");
        assert!(!out.to_lowercase().contains("data:"));
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(sanitize("  lots   of \t\n whitespace  "), "lots of whitespace");
    }

    #[test]
    fn ampersands_are_encoded_once() {
        assert_eq!(sanitize("Tom & Jerry &amp; friends"), "Tom &amp; Jerry &amp; friends");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in HOSTILE {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
        }
    }

    /// Names of complete encoded tags (`&lt;name ...&gt;` with no nested
    /// `&lt;`) that are not on the allow-list.
    fn disallowed_tags(output: &str) -> Vec<String> {
        let mut found = Vec::new();
        for (start, _) in output.match_indices("&lt;") {
            let rest = &output[start + "&lt;".len()..];
            let Some(end) = rest.find("&gt;") else {
                continue;
            };
            let inner = &rest[..end];
            if inner.contains("&lt;") {
                continue;
            }
            let inner = inner.strip_prefix('/').unwrap_or(inner).trim_start();
            let name: String = inner
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '&')
                .collect();
            if !ALLOWED_TAGS.contains(&name.to_ascii_lowercase().as_str()) {
                found.push(name);
            }
        }
        found
    }

    fn assert_clean(input: &str, out: &str) {
        assert!(!out.contains('<') && !out.contains('>'), "input: {input:?}");
        assert!(!EVENT_HANDLER.is_match(out), "input: {input:?}");
        assert!(
            disallowed_tags(out).is_empty(),
            "input: {input:?}, output: {out:?}"
        );
    }

    #[test]
    fn output_never_carries_raw_markup_or_handlers() {
        for input in HOSTILE {
            assert_clean(input, &sanitize(input));
        }
    }

    #[test]
    fn disallowed_tag_behind_allowed_prefix_is_removed() {
        assert_eq!(sanitize("/<b<script> '"), "/&lt;b &#39;");
        assert_eq!(sanitize("< a <iframe>x"), "&lt; a x");

        let out = sanitize("a=a<a&lt;iframe>a<#SCRIPT");
        assert_eq!(out, "a=a&lt;aa&lt;#SCRIPT");
        assert_clean("a=a<a&lt;iframe>a<#SCRIPT", &out);
    }

    #[test]
    fn tag_name_must_end_at_a_delimiter() {
        assert_eq!(sanitize("<b#x>bold</b>"), "bold&lt;/b&gt;");
        assert_eq!(sanitize("<>x</>"), "x");
    }

    #[test]
    fn unquoted_scripted_uris_are_dropped() {
        let out = sanitize("<a href=javascript:alert(1)>link</a>");
        assert_eq!(out, "&lt;a &gt;link&lt;/a&gt;");

        let out = sanitize("<img src = data:image/png;base64,xyz alt=x>");
        assert!(!out.to_lowercase().contains("data:"));
        assert!(out.contains("alt=x"));

        let out = sanitize("<a href=\"javascript:alert(1) title=x>");
        assert!(!out.to_lowercase().contains("javascript"));
    }

    const FRAGMENTS: [&str; 36] = [
        "<", ">", "</", "/>", "&lt;", "&gt;", "&amp;", "&", "&#39;", "&#60;", "\"", "'", "=",
        " ", "\t", "\n", "/", "a", "b", "div", "span", "script", "SCRIPT", "iframe", "object",
        "embed", "applet", "img", "on", "onclick", "onerror=", "href=", "src=", "javascript:",
        "data:", "alert(1)",
    ];

    fn markup() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FRAGMENTS.to_vec()), 0..24)
            .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn sanitize_is_total_and_idempotent_for_any_text(input in any::<String>()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn sanitize_is_idempotent_for_markup(input in markup()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn output_is_clean_for_any_text(input in "\\PC*") {
            assert_clean(&input, &sanitize(&input));
        }

        #[test]
        fn output_is_clean_for_markup(input in markup()) {
            assert_clean(&input, &sanitize(&input));
        }
    }

    #[test]
    fn valid_email_is_returned_unchanged() {
        assert_eq!(
            validate_email("user@example.com").unwrap(),
            "user@example.com"
        );
        assert_eq!(
            validate_email("first.last-name@mail.example.org").unwrap(),
            "first.last-name@mail.example.org"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert_eq!(validate_email("not-an-email"), Err(FormatError));
        assert_eq!(validate_email("bad"), Err(FormatError));
        assert_eq!(validate_email("a@b.c"), Err(FormatError));
        assert_eq!(validate_email("<b>x</b>@example.com"), Err(FormatError));
    }

    #[test]
    fn email_is_sanitized_before_matching() {
        assert_eq!(
            validate_email("  user@example.com  ").unwrap(),
            "user@example.com"
        );
    }
}
