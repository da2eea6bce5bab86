//! Naver Blog payload

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::platforms::{encode, NaverConfig, Payload};
use crate::types::Post;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NaverPost<'a> {
    title: &'a str,
    contents: &'a str,
    category_no: &'a str,
    publish_type: &'static str,
    tag: String,
    publish_date: String,
}

/// Build the post body and the `{blogId, clientId, clientSecret}` metadata
///
/// `now` stands in for `publishDate` while the post has never been published.
pub fn build(
    post: &Post,
    config: &NaverConfig,
    now: DateTime<Utc>,
) -> Result<Payload, FormatError> {
    let publish_date = post.published_at.unwrap_or(now);
    let payload = NaverPost {
        title: &post.title,
        contents: &post.content,
        category_no: "",
        publish_type: if post.is_published() {
            "PUBLISH"
        } else {
            "DRAFT"
        },
        tag: post.tags.join(","),
        publish_date: publish_date.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let mut metadata = Map::new();
    metadata.insert("blogId".to_string(), Value::from(config.blog_id.clone()));
    metadata.insert("clientId".to_string(), Value::from(config.client_id.clone()));
    metadata.insert(
        "clientSecret".to_string(),
        Value::from(config.client_secret.clone()),
    );

    Ok((encode(&payload)?, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostStatus;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, hour, 0, 0).unwrap()
    }

    fn config() -> NaverConfig {
        NaverConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            blog_id: "blog".to_string(),
        }
    }

    #[test]
    fn test_draft_uses_now_for_publish_date() {
        let mut post = Post::new(at(9));
        post.title = "제목".to_string();
        post.content = "<p>본문</p>".to_string();
        let (content, _) = build(&post, &config(), at(12)).unwrap();
        assert_eq!(
            content,
            r#"{"title":"제목","contents":"<p>본문</p>","categoryNo":"","publishType":"DRAFT","tag":"","publishDate":"2024-03-05T12:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_published_keeps_its_publish_date() {
        let mut post = Post::new(at(9));
        post.status = PostStatus::Published;
        post.published_at = Some(at(10));
        post.tags = ["x", "y"].into_iter().collect();
        let (content, _) = build(&post, &config(), at(12)).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["publishType"], "PUBLISH");
        assert_eq!(value["publishDate"], "2024-03-05T10:00:00.000Z");
        assert_eq!(value["tag"], "x,y");
    }

    #[test]
    fn test_metadata_carries_credentials() {
        let (_, metadata) = build(&Post::new(at(9)), &config(), at(12)).unwrap();
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata["blogId"], "blog");
        assert_eq!(metadata["clientId"], "id");
        assert_eq!(metadata["clientSecret"], "secret");
    }
}
