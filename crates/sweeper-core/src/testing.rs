//! Shared fixtures for unit tests

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::timeline::{Post, PostId, CREATED_AT_FORMAT};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Original, non-favorited post `age_days` old with `engagement` favorites
pub fn post(id: u64, age_days: i64, engagement: u64) -> Post {
    Post {
        id: PostId(id),
        created_at: (now() - Duration::days(age_days)).format(CREATED_AT_FORMAT).to_string(),
        author: "me".to_string(),
        text: format!("post {}", id),
        favorite_count: engagement,
        share_count: 0,
        quote_count: 0,
        reply_count: 0,
        favorited: false,
        reshare_of: None,
    }
}
