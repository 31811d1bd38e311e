//! E2E tests for the daily job: real clients, mock servers, file-backed store.

use super::support::{
    day, github_config, github_count, github_status, send_message_path, telegram_config,
    telegram_ok,
};
use chrono::NaiveDate;
use commitstreak_core::{
    CommitCount, CoreError, DailyJob, Database, GitHubCommitSource, RunReport, TelegramNotifier,
};
use mockito::{Matcher, ServerGuard};
use std::path::Path;

struct Harness {
    github: ServerGuard,
    telegram: ServerGuard,
    _dir: tempfile::TempDir,
    db_path: std::path::PathBuf,
}

impl Harness {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("commits.db");
        Self {
            github: mockito::Server::new_async().await,
            telegram: mockito::Server::new_async().await,
            _dir: dir,
            db_path,
        }
    }

    fn seed(&self, rows: &[(&str, u32, u32)]) {
        let db = Database::open(&self.db_path).unwrap();
        for (date, count, streak) in rows {
            db.upsert(day(date), *count, *streak).unwrap();
        }
        db.close().unwrap();
    }

    /// One full invocation, opening and closing the store like the CLI does.
    async fn run(&self, date: NaiveDate) -> Result<RunReport, CoreError> {
        run_once(&self.db_path, &self.github.url(), &self.telegram.url(), date).await
    }

    fn open(&self) -> Database {
        Database::open(&self.db_path).unwrap()
    }
}

async fn run_once(
    db_path: &Path,
    github_url: &str,
    telegram_url: &str,
    date: NaiveDate,
) -> Result<RunReport, CoreError> {
    let db = Database::open(db_path)?;
    let source = GitHubCommitSource::new(&github_config(github_url))?;
    let notifier = TelegramNotifier::new(&telegram_config(telegram_url))?;
    let report = DailyJob::new(&db, source, notifier).run(date).await?;
    db.close()?;
    Ok(report)
}

#[tokio::test]
async fn empty_store_first_commits_start_streak() {
    let mut h = Harness::new().await;
    let today = day("2026-10-19");
    let gh = github_count(&mut h.github, today, 3).await;
    let tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();

    assert_eq!(report.commits, CommitCount::Known(3));
    assert_eq!(report.streak, 1);
    assert!(report.persisted);
    let rec = h.open().record_for_date(today).unwrap().unwrap();
    assert_eq!((rec.commit_count, rec.streak), (3, 1));
    gh.assert_async().await;
    tg.assert_async().await;
}

#[tokio::test]
async fn active_yesterday_extends_streak() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-18", 5, 4)]);
    let today = day("2026-10-19");
    let _gh = github_count(&mut h.github, today, 2).await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();
    assert_eq!(report.streak, 5);
    assert!(report.message.starts_with("🚀 2 commits today! 🔥 Streak: 5 days"));
}

#[tokio::test]
async fn idle_yesterday_restarts_streak() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-17", 3, 2), ("2026-10-18", 0, 0)]);
    let today = day("2026-10-19");
    let _gh = github_count(&mut h.github, today, 1).await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();
    assert_eq!(report.streak, 1);
}

#[tokio::test]
async fn zero_commits_break_the_streak() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-18", 4, 3)]);
    let today = day("2026-10-19");
    let _gh = github_count(&mut h.github, today, 0).await;
    let tg = h
        .telegram
        .mock("POST", send_message_path().as_str())
        .match_body(Matcher::Regex("It was 3 days in a row".into()))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let report = h.run(today).await.unwrap();

    assert_eq!(report.streak, 0);
    let rec = h.open().record_for_date(today).unwrap().unwrap();
    assert_eq!((rec.commit_count, rec.streak), (0, 0));
    tg.assert_async().await;
}

#[tokio::test]
async fn source_failure_leaves_history_untouched() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-17", 2, 3), ("2026-10-18", 5, 4)]);
    let before = h.open().history(None).unwrap();
    let today = day("2026-10-19");
    let _gh = github_status(&mut h.github, today, 503).await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();

    assert_eq!(report.commits, CommitCount::Unknown);
    assert!(!report.persisted);
    let db = h.open();
    assert!(db.record_for_date(today).unwrap().is_none());
    assert_eq!(db.most_recent_record().unwrap().unwrap().date, day("2026-10-18"));
    assert_eq!(db.history(None).unwrap(), before);
    assert_eq!(db.aggregate_stats().unwrap().current_streak, 4);
    assert!(report.message.contains("Couldn't check"));
}

#[tokio::test]
async fn source_failure_after_earlier_run_keeps_todays_record() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-18", 5, 4), ("2026-10-19", 1, 5)]);
    let today = day("2026-10-19");
    let _gh = github_status(&mut h.github, today, 500).await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();

    assert_eq!(report.streak, 5);
    let rec = h.open().record_for_date(today).unwrap().unwrap();
    assert_eq!((rec.commit_count, rec.streak), (1, 5));
}

#[tokio::test]
async fn rerun_same_day_is_idempotent() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-18", 5, 4)]);
    let today = day("2026-10-19");
    let gh = h
        .github
        .mock("GET", "/search/commits")
        .match_query(super::support::search_query(today))
        .with_status(200)
        .with_body(r#"{"total_count": 2}"#)
        .expect(2)
        .create_async()
        .await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let first = h.run(today).await.unwrap();
    let after_first = h.open().history(None).unwrap();
    let second = h.run(today).await.unwrap();
    let after_second = h.open().history(None).unwrap();

    assert_eq!(first.streak, 5);
    assert_eq!(second.streak, 5);
    assert_eq!(after_first, after_second);
    gh.assert_async().await;
}

#[tokio::test]
async fn consecutive_invocations_build_on_each_other() {
    let mut h = Harness::new().await;
    let counts = [
        ("2026-10-15", 2),
        ("2026-10-16", 1),
        ("2026-10-17", 0),
        ("2026-10-18", 4),
        ("2026-10-19", 3),
    ];
    // Mocks are removed from the server when dropped.
    let mut mocks = Vec::new();
    for (date, count) in counts {
        mocks.push(github_count(&mut h.github, day(date), count).await);
    }
    let _tg = telegram_ok(&mut h.telegram).await;

    let mut streaks = Vec::new();
    for (date, _) in counts {
        streaks.push(h.run(day(date)).await.unwrap().streak);
    }

    assert_eq!(streaks, vec![1, 2, 0, 1, 2]);
    let stats = h.open().aggregate_stats().unwrap();
    assert_eq!(stats.total_commits, 10);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.max_streak, 2);
}

#[tokio::test]
async fn skipped_day_is_not_detected_as_a_break() {
    let mut h = Harness::new().await;
    h.seed(&[("2026-10-16", 3, 6)]);
    let today = day("2026-10-19");
    let _gh = github_count(&mut h.github, today, 1).await;
    let _tg = telegram_ok(&mut h.telegram).await;

    let report = h.run(today).await.unwrap();
    assert_eq!(report.streak, 7);
}

#[tokio::test]
async fn delivery_failure_is_fatal_but_day_is_recorded() {
    let mut h = Harness::new().await;
    let today = day("2026-10-19");
    let _gh = github_count(&mut h.github, today, 2).await;
    let _tg = h
        .telegram
        .mock("POST", send_message_path().as_str())
        .with_status(400)
        .with_body(r#"{"ok": false, "description": "Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = h.run(today).await.unwrap_err();

    assert!(matches!(err, CoreError::Notify(_)));
    assert!(h.open().record_for_date(today).unwrap().is_some());
}
