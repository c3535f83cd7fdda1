//! JSON shapes returned by the v1.1 REST API and their conversion to `Post`.

use serde::Deserialize;

use super::models::{Post, PostId};
use crate::Result;

/// Error code for "No status found with that ID"
pub const ERR_STATUS_NOT_FOUND: i64 = 144;

#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub screen_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRetweeted {
    pub id_str: String,
}

#[derive(Debug, Deserialize)]
pub struct RawTweet {
    pub id_str: String,
    pub created_at: String,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    // counters and `favorited` may be absent or null
    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub quote_count: Option<u64>,
    #[serde(default)]
    pub reply_count: Option<u64>,
    #[serde(default)]
    pub favorited: Option<bool>,
    #[serde(default)]
    pub retweeted_status: Option<RawRetweeted>,
}

impl RawTweet {
    pub fn into_post(self) -> Result<Post> {
        let reshare_of = match self.retweeted_status {
            Some(rt) => Some(PostId::parse(&rt.id_str)?),
            None => None,
        };

        Ok(Post {
            id: PostId::parse(&self.id_str)?,
            created_at: self.created_at,
            author: self.user.and_then(|u| u.screen_name).unwrap_or_default(),
            text: self.full_text.or(self.text).unwrap_or_default(),
            favorite_count: self.favorite_count.unwrap_or_default(),
            share_count: self.retweet_count.unwrap_or_default(),
            quote_count: self.quote_count.unwrap_or(0),
            reply_count: self.reply_count.unwrap_or(0),
            favorited: self.favorited.unwrap_or_default(),
            reshare_of,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn has_code(&self, code: i64) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

/// Convert a timeline response body into posts, preserving order
pub fn parse_timeline(body: &[u8]) -> Result<Vec<Post>> {
    let raw: Vec<RawTweet> = serde_json::from_slice(body)?;
    raw.into_iter().map(RawTweet::into_post).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline_page() {
        let body = br#"[
            {
                "id": 1050118621198921728,
                "id_str": "1050118621198921728",
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "full_text": "hello",
                "user": {"screen_name": "me"},
                "favorite_count": 3,
                "retweet_count": 1,
                "favorited": true
            },
            {
                "id_str": "1050118621198921700",
                "created_at": "Wed Oct 10 20:00:00 +0000 2018",
                "text": "RT @other: hi",
                "user": {"screen_name": "me"},
                "favorite_count": 0,
                "retweet_count": 12,
                "quote_count": 2,
                "reply_count": 1,
                "favorited": false,
                "retweeted_status": {"id_str": "99"}
            }
        ]"#;

        let posts = parse_timeline(body).unwrap();
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].id, PostId(1050118621198921728));
        assert_eq!(posts[0].text, "hello");
        assert_eq!(posts[0].author, "me");
        assert!(posts[0].favorited);
        assert!(!posts[0].is_reshare());
        assert_eq!(posts[0].engagement(), 4);

        assert_eq!(posts[1].reshare_of, Some(PostId(99)));
        assert_eq!(posts[1].text, "RT @other: hi");
        assert_eq!(posts[1].engagement(), 15);
    }

    #[test]
    fn test_parse_timeline_null_counters_default_to_zero() {
        let body = br#"[{
            "id_str": "5",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "text": "hi",
            "favorite_count": null,
            "retweet_count": null,
            "quote_count": null,
            "reply_count": null,
            "favorited": null,
            "user": {"screen_name": null}
        }]"#;

        let posts = parse_timeline(body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, PostId(5));
        assert_eq!(posts[0].engagement(), 0);
        assert!(!posts[0].favorited);
        assert_eq!(posts[0].author, "");
    }

    #[test]
    fn test_parse_timeline_rejects_bad_id() {
        let body = br#"[{"id_str": "nope", "created_at": "x"}]"#;
        assert!(parse_timeline(body).is_err());
    }

    #[test]
    fn test_error_body_codes() {
        let body = ApiErrorBody::parse(r#"{"errors":[{"code":144,"message":"No status found with that ID."}]}"#);
        assert!(body.has_code(ERR_STATUS_NOT_FOUND));
        assert!(!ApiErrorBody::parse("not json").has_code(ERR_STATUS_NOT_FOUND));
    }
}
