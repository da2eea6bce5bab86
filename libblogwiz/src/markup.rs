//! HTML rewriting for each publishing target
//!
//! `convert_markup` runs a streaming rewriter over the editor's HTML. The
//! Markdown conversion covers a closed set of elements:
//!
//! | element      | output              |
//! |--------------|---------------------|
//! | `h1`..`h3`   | `#`, `##`, `###`    |
//! | `strong`     | `**text**`          |
//! | `em`         | `*text*`            |
//! | `code`       | `` `text` ``        |
//! | `pre`        | fenced code block   |
//! | `a[href]`    | `[text](href)`      |
//! | `img[src]`   | `![alt](src)`       |
//!
//! Every other element is unwrapped (its text survives, the tags do not) and
//! comments are dropped. Text is passed through as-is, so entities such as
//! `&amp;` are not decoded. No block separators are inserted: adjacent
//! blocks run together exactly as their text does in the source.

use chrono::{DateTime, Local, Utc};
use lol_html::html_content::ContentType;
use lol_html::{comments, element, rewrite_str, RewriteStrSettings};

use crate::error::FormatError;
use crate::platforms::Platform;
use crate::types::EXCERPT_MAX_CHARS;

/// Inline style replacing `<blockquote>` on Naver
pub const NAVER_QUOTE_STYLE: &str = "border-left: 4px solid #ccc; padding-left: 1em; margin: 1em 0;";

const ELLIPSIS: &str = "...";

/// Rewrite editor HTML into the markup `platform` expects
///
/// Tistory takes the HTML untouched. Naver gets `h1` demoted to `h2` and
/// blockquotes turned into indented `div`s. Custom gets Markdown.
pub fn convert_markup(html: &str, platform: Platform) -> Result<String, FormatError> {
    match platform {
        Platform::Tistory => Ok(html.to_string()),
        Platform::Naver => to_naver(html),
        Platform::Custom => to_markdown(html),
    }
}

fn to_naver(html: &str) -> Result<String, FormatError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("h1", |el| {
                    el.set_tag_name("h2")?;
                    Ok(())
                }),
                element!("blockquote", |el| {
                    el.set_tag_name("div")?;
                    el.set_attribute("style", NAVER_QUOTE_STYLE)?;
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| FormatError::Markup(e.to_string()))
}

fn to_markdown(html: &str) -> Result<String, FormatError> {
    // Handlers run in registration order; the final catch-all skips
    // anything an earlier handler already removed or replaced.
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("h1", |el| {
                    el.before("# ", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("h2", |el| {
                    el.before("## ", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("h3", |el| {
                    el.before("### ", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("strong", |el| {
                    el.before("**", ContentType::Html);
                    el.after("**", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("em", |el| {
                    el.before("*", ContentType::Html);
                    el.after("*", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("pre", |el| {
                    el.before("```\n", ContentType::Html);
                    el.after("\n```", ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                // already fenced by the enclosing pre
                element!("pre code", |el| {
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("code", |el| {
                    if !el.removed() {
                        el.before("`", ContentType::Html);
                        el.after("`", ContentType::Html);
                        el.remove_and_keep_content();
                    }
                    Ok(())
                }),
                element!("a[href]", |el| {
                    let href = el.get_attribute("href").unwrap_or_default();
                    el.before("[", ContentType::Html);
                    el.after(&format!("]({})", href), ContentType::Html);
                    el.remove_and_keep_content();
                    Ok(())
                }),
                element!("img[src]", |el| {
                    let src = el.get_attribute("src").unwrap_or_default();
                    let alt = el.get_attribute("alt").unwrap_or_default();
                    el.replace(&format!("![{}]({})", alt, src), ContentType::Html);
                    Ok(())
                }),
                element!("*", |el| {
                    if !el.removed() {
                        el.remove_and_keep_content();
                    }
                    Ok(())
                }),
                comments!("*", |c| {
                    c.remove();
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| FormatError::Markup(e.to_string()))
}

/// Drop every `<...>` tag and keep the text between them
///
/// A `<` with no closing `>` is left in place.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Plain-text summary of `html`, at most 150 characters
///
/// Longer text keeps its first 147 characters followed by `...`.
pub fn excerpt(html: &str) -> String {
    let plain = strip_tags(html);
    if plain.chars().count() <= EXCERPT_MAX_CHARS {
        return plain;
    }
    let keep = EXCERPT_MAX_CHARS - ELLIPSIS.chars().count();
    let mut out: String = plain.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Korean short date (`2024. 3. 5.`) in the local time zone
pub fn korean_date(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y. %-m. %-d.")
        .to_string()
}
