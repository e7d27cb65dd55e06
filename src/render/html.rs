//! HTML rendering of text runs

use crate::domain::TextRun;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Render runs as an HTML fragment. Every piece of comment text is escaped.
pub fn render_html(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            TextRun::Plain { content } => out.push_str(&encode_text(content)),
            TextRun::Bold { content } => {
                out.push_str("<b>");
                out.push_str(&encode_text(content));
                out.push_str("</b>");
            }
            TextRun::LineBreak => out.push_str("<br>\n"),
            TextRun::Link { content, href, css, title } => {
                out.push_str("<a href=\"");
                out.push_str(&encode_double_quoted_attribute(href));
                out.push('"');
                if let Some(css) = css {
                    out.push_str(" class=\"");
                    out.push_str(&encode_double_quoted_attribute(css));
                    out.push('"');
                }
                if let Some(title) = title {
                    out.push_str(" title=\"");
                    out.push_str(&encode_double_quoted_attribute(title));
                    out.push('"');
                }
                out.push('>');
                out.push_str(&encode_text(content));
                out.push_str("</a>");
            }
        }
    }
    out
}
