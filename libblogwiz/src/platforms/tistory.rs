//! Tistory Open API payload

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::platforms::{encode, Payload, TistoryConfig};
use crate::types::Post;

/// `visibility` value for a published post
const VISIBILITY_PUBLIC: u8 = 3;
/// `visibility` value for anything else
const VISIBILITY_PRIVATE: u8 = 0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TistoryPost<'a> {
    title: &'a str,
    content: &'a str,
    visibility: u8,
    category_id: &'a str,
    tag: String,
    accept_comment: u8,
    password: &'a str,
    secondary_url: &'a str,
    secret: u8,
    slogan: &'a str,
    use_category: u8,
}

/// Build the post body and the `{blogName, accessToken}` metadata
pub fn build(post: &Post, config: &TistoryConfig) -> Result<Payload, FormatError> {
    let payload = TistoryPost {
        title: &post.title,
        content: &post.content,
        visibility: if post.is_published() {
            VISIBILITY_PUBLIC
        } else {
            VISIBILITY_PRIVATE
        },
        category_id: &config.category_id,
        tag: post.tags.join(","),
        accept_comment: 1,
        password: "",
        secondary_url: "",
        secret: 0,
        slogan: "",
        use_category: 1,
    };

    let mut metadata = Map::new();
    metadata.insert("blogName".to_string(), Value::from(config.blog_name.clone()));
    metadata.insert(
        "accessToken".to_string(),
        Value::from(config.access_token.clone()),
    );

    Ok((encode(&payload)?, metadata))
}
