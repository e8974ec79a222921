//! Text-to-markup transforms for assistant replies.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("static pattern compiles"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("static pattern compiles"));
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("static pattern compiles"));

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Converts markdown to HTML.
///
/// Raw HTML in the source is escaped rather than passed through, single newlines
/// become `<br>`, and links open in a new tab.
pub fn markdown_to_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) => Event::InlineHtml(open_link(&dest_url, &title)),
        Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn open_link(dest_url: &str, title: &str) -> CowStr<'static> {
    let lowered = dest_url.trim().to_ascii_lowercase();
    let href = if BLOCKED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        "#"
    } else {
        dest_url
    };

    let mut tag = format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer""#,
        html_escape::encode_double_quoted_attribute(href)
    );
    if !title.is_empty() {
        tag.push_str(&format!(
            r#" title="{}""#,
            html_escape::encode_double_quoted_attribute(title)
        ));
    }
    tag.push('>');
    CowStr::from(tag)
}

/// Light formatting for plain text: escapes it, then applies bold, italic and
/// paragraph/line breaks.
pub fn format_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = html_escape::encode_text(text);
    let formatted = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let formatted = ITALIC.replace_all(&formatted, "<em>$1</em>");
    let formatted = PARAGRAPH_BREAK.replace_all(&formatted, "</p><p>");
    formatted.replace('\n', "<br>")
}

/// Escapes every HTML-significant character.
pub fn sanitize_html(html: &str) -> String {
    html_escape::encode_text(html).into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bold_and_inline_code() {
        let html = markdown_to_html("**bold** and `code`");

        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn raw_script_is_escaped() {
        let html = markdown_to_html("hi <script>alert(1)</script>");

        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));

        let block = markdown_to_html("<script>alert(1)</script>");
        assert!(!block.contains("<script"));
    }

    #[test]
    fn headers_lists_and_fenced_code() {
        let html = markdown_to_html(
            "# Title\n\n### Small\n\n- one\n- two\n\n```rust\nfn main() {}\n```\n",
        );

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h3>Small</h3>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<pre><code class=\"language-rust\">fn main() {}"));
    }

    #[test]
    fn links_open_in_a_new_tab_and_block_script_urls() {
        let html = markdown_to_html("[docs](https://example.com) [bad](javascript:alert(1))");

        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">docs</a>"#
        ));
        assert!(
            html.contains(r##"<a href="#" target="_blank" rel="noopener noreferrer">bad</a>"##)
        );
    }

    #[test]
    fn single_newlines_become_line_breaks() {
        assert_eq!(markdown_to_html("a\nb"), "<p>a<br />\nb</p>\n");
        assert_eq!(markdown_to_html("   "), "");
    }

    #[test]
    fn escaped_text_is_not_escaped_twice() {
        let escaped = "a &lt;b&gt; &amp; c";
        assert_eq!(markdown_to_html(escaped), "<p>a &lt;b&gt; &amp; c</p>\n");

        assert_eq!(
            markdown_to_html("&quot;quoted&quot; &#39;single&#39;"),
            "<p>\"quoted\" 'single'</p>\n"
        );
    }

    #[test]
    fn plain_text_is_only_wrapped() {
        assert_eq!(markdown_to_html("just words"), "<p>just words</p>\n");
    }

    #[test]
    fn format_text_escapes_before_formatting() {
        assert_eq!(
            format_text("**hi** <b>\n*there*\n\nnext"),
            "<strong>hi</strong> &lt;b&gt;<br><em>there</em></p><p>next"
        );
    }

    #[test]
    fn sanitize_html_escapes_markup() {
        assert_eq!(sanitize_html("<a>&"), "&lt;a&gt;&amp;");
    }
}
