//! E2E tests for the daily report.
//!
//! Tests run the real GitHub and Telegram clients against local mockito
//! servers and a temporary SQLite file, so no credentials or network access
//! are needed.
//!
//! | Area        | Covered                                                     |
//! |-------------|-------------------------------------------------------------|
//! | GitHub      | query shape, auth header, non-2xx, malformed body           |
//! | Telegram    | getMe authorization, payload, `ok: false`, HTTP errors      |
//! | Daily job   | first run, continue, restart, break, source failure, rerun  |

mod daily_job_e2e;

/// Shared fixtures for the e2e modules.
pub mod support {
    use chrono::NaiveDate;
    use commitstreak_core::storage::{GitHubConfig, TelegramConfig};
    use mockito::{Matcher, Mock, ServerGuard};

    pub const USERNAME: &str = "octocat";
    pub const BOT_TOKEN: &str = "test-token";
    pub const CHAT_ID: i64 = 42;

    pub fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn github_config(api_base: &str) -> GitHubConfig {
        GitHubConfig {
            username: USERNAME.into(),
            api_base: api_base.into(),
            timeout_secs: 5,
            ..GitHubConfig::default()
        }
    }

    pub fn telegram_config(api_base: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: BOT_TOKEN.into(),
            chat_id: Some(CHAT_ID),
            api_base: api_base.into(),
            timeout_secs: 5,
        }
    }

    pub fn search_query(date: NaiveDate) -> Matcher {
        Matcher::UrlEncoded(
            "q".into(),
            format!("author:{USERNAME} committer-date:{}", date.format("%Y-%m-%d")),
        )
    }

    /// Mock a successful search returning `total_count` for `date`.
    pub async fn github_count(server: &mut ServerGuard, date: NaiveDate, total_count: u32) -> Mock {
        server
            .mock("GET", "/search/commits")
            .match_query(search_query(date))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"total_count": {total_count}, "items": []}}"#))
            .create_async()
            .await
    }

    /// Mock a failing search for `date`.
    pub async fn github_status(server: &mut ServerGuard, date: NaiveDate, status: usize) -> Mock {
        server
            .mock("GET", "/search/commits")
            .match_query(search_query(date))
            .with_status(status)
            .with_body(r#"{"message": "Service Unavailable"}"#)
            .create_async()
            .await
    }

    pub fn get_me_path() -> String {
        format!("/bot{BOT_TOKEN}/getMe")
    }

    /// Mock `getMe` accepting the configured token.
    pub async fn telegram_authorized(server: &mut ServerGuard) -> Mock {
        server
            .mock("GET", get_me_path().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "Streak", "username": "streak_bot"}}"#,
            )
            .create_async()
            .await
    }

    pub fn send_message_path() -> String {
        format!("/bot{BOT_TOKEN}/sendMessage")
    }

    /// Mock Telegram accepting any message for the configured chat.
    pub async fn telegram_ok(server: &mut ServerGuard) -> Mock {
        server
            .mock("POST", send_message_path().as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({ "chat_id": CHAT_ID })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
            .create_async()
            .await
    }
}
