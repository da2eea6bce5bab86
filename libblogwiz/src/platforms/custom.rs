//! Self-hosted target: a standalone Markdown document

use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::markup::{korean_date, strip_tags};
use crate::platforms::Payload;
use crate::types::Post;

/// Render `post` as Markdown
///
/// Layout, top to bottom: title heading, quoted excerpt, body text, tags,
/// category, rule, written date, published date. Only the post's own
/// timestamps are embedded, so the output is stable for an unchanged post.
pub fn build(post: &Post) -> Result<Payload, FormatError> {
    let excerpt_line = if post.excerpt.is_empty() {
        String::new()
    } else {
        format!("> {}\n", post.excerpt)
    };
    let tags_line = if post.tags.is_empty() {
        String::new()
    } else {
        format!("\n**태그:** {}", post.tags.join(", "))
    };
    let category_line = post
        .category_label()
        .map(|category| format!("\n**카테고리:** {}", category))
        .unwrap_or_default();
    let published_line = post
        .published_at
        .map(|at| format!("*발행일: {}*", korean_date(at)))
        .unwrap_or_default();

    let document = format!(
        "\n# {title}\n\n{excerpt_line}\n\n{body}\n\n{tags_line}\n{category_line}\n\n---\n*작성일: {created}*\n{published_line}\n    ",
        title = post.title,
        body = strip_tags(&post.content),
        created = korean_date(post.created_at),
    );

    let mut metadata = Map::new();
    metadata.insert("title".to_string(), Value::from(post.title.clone()));
    metadata.insert(
        "tags".to_string(),
        Value::from(post.tags.as_slice().to_vec()),
    );
    metadata.insert(
        "category".to_string(),
        post.category_label().map(Value::from).unwrap_or(Value::Null),
    );
    metadata.insert("status".to_string(), Value::from(post.status.as_str()));

    Ok((document.trim().to_string(), metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostStatus;
    use chrono::{TimeZone, Utc};

    fn post() -> Post {
        let mut post = Post::new(Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
        post.title = "Hi".to_string();
        post.content = "<p>World</p>".to_string();
        post.excerpt = "World".to_string();
        post.tags = ["a", "b"].into_iter().collect();
        post
    }

    #[test]
    fn test_draft_document() {
        let (content, _) = build(&post()).unwrap();
        assert_eq!(
            content,
            "# Hi\n\n> World\n\n\nWorld\n\n\n**태그:** a, b\n\n\n---\n*작성일: 2024. 3. 5.*"
        );
    }

    #[test]
    fn test_published_document_has_category_and_publish_date() {
        let mut post = post();
        post.category = Some("일상".to_string());
        post.status = PostStatus::Published;
        post.published_at = Some(Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap());
        let (content, _) = build(&post).unwrap();
        assert!(content.contains("\n**카테고리:** 일상\n"));
        assert!(content.ends_with("*작성일: 2024. 3. 5.*\n*발행일: 2024. 3. 6.*"));
    }

    #[test]
    fn test_bare_post() {
        let mut post = post();
        post.excerpt.clear();
        post.tags = Default::default();
        let (content, _) = build(&post).unwrap();
        assert!(content.starts_with("# Hi\n\n\n\nWorld"));
        assert!(!content.contains("**태그:**"));
        assert!(!content.contains(">"));
    }

    #[test]
    fn test_output_is_stable() {
        let post = post();
        assert_eq!(build(&post).unwrap().0, build(&post).unwrap().0);
    }

    #[test]
    fn test_metadata() {
        let (_, metadata) = build(&post()).unwrap();
        assert_eq!(metadata["title"], "Hi");
        assert_eq!(metadata["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(metadata["category"], Value::Null);
        assert_eq!(metadata["status"], "draft");
    }
}
