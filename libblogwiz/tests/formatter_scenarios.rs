//! Formatting behaviour as seen by callers of the public API

use chrono::{DateTime, TimeZone, Utc};
use libblogwiz::platforms::{NaverConfig, TistoryConfig};
use libblogwiz::service::validation::ConfigValidator;
use libblogwiz::{ContentFormatter, Platform, PlatformConfig, Post, PostStatus};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
}

fn hi_post(status: PostStatus) -> Post {
    let mut post = Post::new(noon());
    post.title = "Hi".to_string();
    post.content = "<p>World</p>".to_string();
    post.tags = vec!["a".to_string(), "b".to_string()].into();
    post.status = status;
    post
}

fn tistory_config() -> PlatformConfig {
    PlatformConfig::Tistory(TistoryConfig {
        access_token: "T".to_string(),
        blog_name: "B".to_string(),
        category_id: String::new(),
    })
}

fn payload(content: &str) -> serde_json::Value {
    serde_json::from_str(content).unwrap()
}

#[test]
fn test_tistory_draft_payload() {
    let result = ContentFormatter::format(&hi_post(PostStatus::Draft), &tistory_config());
    assert!(result.success);

    let body = payload(&result.content);
    assert_eq!(body["visibility"], 0);
    assert_eq!(body["tag"], "a,b");
    assert_eq!(body["acceptComment"], 1);
    assert_eq!(body["secret"], 0);
    assert_eq!(body["useCategory"], 1);

    assert_eq!(result.metadata.len(), 2);
    assert_eq!(result.metadata["blogName"], "B");
    assert_eq!(result.metadata["accessToken"], "T");
}

#[test]
fn test_tistory_published_payload() {
    let result = ContentFormatter::format(&hi_post(PostStatus::Published), &tistory_config());
    assert_eq!(payload(&result.content)["visibility"], 3);
}

#[test]
fn test_tistory_payload_has_every_field() {
    let result = ContentFormatter::format(&hi_post(PostStatus::Draft), &tistory_config());
    let body = payload(&result.content);
    for field in [
        "title",
        "content",
        "visibility",
        "categoryId",
        "tag",
        "acceptComment",
        "password",
        "secondaryUrl",
        "secret",
        "slogan",
        "useCategory",
    ] {
        assert!(body.get(field).is_some(), "missing {}", field);
    }
}

#[test]
fn test_naver_publish_type_and_date() {
    let config = PlatformConfig::Naver(NaverConfig {
        client_id: "i".to_string(),
        client_secret: "s".to_string(),
        blog_id: "b".to_string(),
    });
    let draft = ContentFormatter::format_at(&hi_post(PostStatus::Draft), &config, noon());
    let body = payload(&draft.content);
    assert_eq!(body["publishType"], "DRAFT");
    assert_eq!(body["publishDate"], "2024-03-05T12:00:00.000Z");
    assert_eq!(body["contents"], "<p>World</p>");

    let mut published = hi_post(PostStatus::Published);
    published.published_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    let body = payload(&ContentFormatter::format_at(&published, &config, noon()).content);
    assert_eq!(body["publishType"], "PUBLISH");
    assert_eq!(body["publishDate"], "2024-01-02T03:04:05.000Z");
}

#[test]
fn test_custom_format_is_idempotent() {
    let mut post = hi_post(PostStatus::Published);
    post.excerpt = "World".to_string();
    post.published_at = Some(noon());

    let first = ContentFormatter::format(&post, &PlatformConfig::Custom);
    let second = ContentFormatter::format(&post, &PlatformConfig::Custom);
    assert!(first.success);
    assert_eq!(first.content, second.content);
    assert!(first.content.starts_with("# Hi\n\n> World"));
}

#[test]
fn test_convert_markup_naver_scenario() {
    assert_eq!(
        ContentFormatter::convert_markup("<h1>Hi</h1>", Platform::Naver).unwrap(),
        "<h2>Hi</h2>"
    );
}

#[test]
fn test_convert_markup_custom_mixed_document() {
    let html = concat!(
        "<h2>Intro</h2>",
        "<p>Read <a href=\"https://example.com\">this</a> with <em>care</em>.</p>",
        "<img src=\"a.png\" alt=\"A\">",
    );
    assert_eq!(
        ContentFormatter::convert_markup(html, Platform::Custom).unwrap(),
        "## IntroRead [this](https://example.com) with *care*.![A](a.png)"
    );
}

#[test]
fn test_validator_naver_scenario() {
    let config = PlatformConfig::Naver(NaverConfig {
        client_id: String::new(),
        client_secret: "s".to_string(),
        blog_id: "b".to_string(),
    });
    assert!(!ConfigValidator::is_valid(&config));
    assert!(!ConfigValidator::is_valid_for("naver", &config));
}
