#[path = "common/mod.rs"]
mod common;

use common::*;
use reddit_export::{collect_account, Category, CollectOptions, Feed, RedditExport};
use std::path::PathBuf;

const TS: i64 = 1_700_000_000;

/// alice has saved content, bob has posts and comments of his own.
fn two_accounts() -> FakeSource {
    FakeSource::default()
        .with_account(
            "alice",
            vec![
                (Feed::Saved, items(vec![post("a1", Some("https://example.com/a1")), comment("a2", "Saved thread", None)])),
                (Feed::Upvoted, items(vec![post("a3", None)])),
            ],
        )
        .with_account(
            "bob",
            vec![
                (Feed::OwnPosts, items(vec![post("b1", None), post("b2", Some("https://example.com/b2"))])),
                (Feed::OwnComments, items(vec![comment("b3", "Someone's post", Some("https://example.com/x"))])),
            ],
        )
}

/// Separate CSV export: exactly two files, each holding one account's records with its own action tag.
#[test]
fn separate_csv_export_per_account() {
    let tmp = tempfile::tempdir().unwrap();
    let accounts = vec![account("alice", &[Category::Saved]), account("bob", &[Category::Submissions])];

    let summary = RedditExport::new()
        .export_dir(tmp.path())
        .timestamp(TS)
        .separate(true)
        .url_only(false)
        .run(&two_accounts(), &accounts)
        .unwrap();

    assert_eq!(summary.records, 5);
    assert!(summary.failed_accounts.is_empty());
    assert_eq!(
        summary.written,
        vec![
            tmp.path().join(format!("reddit_export_userdata_alice_{TS}.csv")),
            tmp.path().join(format!("reddit_export_userdata_bob_{TS}.csv")),
        ]
    );
    assert_eq!(list_files(tmp.path()).len(), 2);

    let (_, alice) = read_csv(&summary.written[0]);
    assert_eq!(alice.len(), 2);
    assert!(alice.iter().all(|r| r[9] == "Saved" && r[10] == "alice"));

    let (_, bob) = read_csv(&summary.written[1]);
    let types: Vec<&str> = bob.iter().map(|r| r[6].as_str()).collect();
    assert_eq!(types, vec!["Submission", "Submission", "Comment"], "posts come before comments");
    assert!(bob.iter().all(|r| r[9] == "Submitted" && r[10] == "bob"));
}

/// Combined URL-list export: one file, alice's records then bob's, 2 or 3 lines each.
#[test]
fn combined_url_list_in_account_order() {
    let tmp = tempfile::tempdir().unwrap();
    let accounts = vec![account("alice", &[Category::Saved]), account("bob", &[Category::Submissions])];

    let summary = RedditExport::new()
        .export_dir(tmp.path())
        .timestamp(TS)
        .separate(false)
        .url_only(true)
        .run(&two_accounts(), &accounts)
        .unwrap();

    let expected: PathBuf = tmp.path().join(format!("reddit_export_userdata_archivebox_{TS}.txt"));
    assert_eq!(summary.written, vec![expected.clone()]);

    let www = |path: &str| format!("https://www.reddit.com/r/rust/comments/{path}/");
    let old = |path: &str| format!("https://old.reddit.com/r/rust/comments/{path}/");
    let expected_lines = vec![
        www("a1/post_a1"),
        old("a1/post_a1"),
        "https://example.com/a1".to_string(),
        www("p/parent/a2"),
        old("p/parent/a2"),
        www("b1/post_b1"),
        old("b1/post_b1"),
        www("b2/post_b2"),
        old("b2/post_b2"),
        "https://example.com/b2".to_string(),
        www("p/parent/b3"),
        old("p/parent/b3"),
        "https://example.com/x".to_string(),
    ];
    assert_eq!(read_lines(&expected), expected_lines);
}

/// A failed login only drops that account; the run still succeeds with the others.
#[test]
fn failed_authentication_is_isolated() {
    let tmp = tempfile::tempdir().unwrap();
    let mut bad_alice = account("alice", &[Category::Saved]);
    bad_alice.credentials.password = "wrong".into();
    let accounts = vec![bad_alice, account("bob", &[Category::Submissions])];

    let summary = RedditExport::new()
        .export_dir(tmp.path())
        .timestamp(TS)
        .run(&two_accounts(), &accounts)
        .unwrap();

    assert_eq!(summary.failed_accounts, vec!["alice".to_string()]);
    assert_eq!(summary.written.len(), 1);
    let (_, rows) = read_csv(&summary.written[0]);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r[10] == "bob"));
}

/// Nothing collected at all: the combined CSV is reported as a failed group, not an empty file.
#[test]
fn all_accounts_failing_reports_empty_group() {
    let tmp = tempfile::tempdir().unwrap();
    let accounts = vec![account("mallory", &[Category::Saved])];

    let summary = RedditExport::new()
        .export_dir(tmp.path())
        .timestamp(TS)
        .run(&two_accounts(), &accounts)
        .unwrap();

    assert!(summary.written.is_empty());
    assert_eq!(summary.failed_groups.len(), 1);
    assert_eq!(summary.failed_groups[0].0, "all");
    assert!(list_files(tmp.path()).is_empty());
}

/// A listing that breaks mid-way keeps the items read before the failure and moves on.
#[test]
fn fetch_failure_keeps_partial_results() {
    let source = FakeSource::default().with_account(
        "carol",
        vec![
            (
                Feed::Upvoted,
                vec![Step::Item(post("c1", None)), Step::Fail("HTTP 503"), Step::Item(post("never", None))],
            ),
            (Feed::Saved, items(vec![post("c2", None)])),
        ],
    );

    let group = collect_account(&source, &account("carol", &[Category::Saved, Category::Upvoted]), CollectOptions::default())
        .unwrap();

    let urls: Vec<&str> = group.records.iter().map(|r| r.canonical_url.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].contains("/c1/"), "upvoted is collected before saved");
    assert!(urls[1].contains("/c2/"));
    assert_eq!(group.owner.as_deref(), Some("carol"));
}

/// Collecting accounts in parallel yields the same files as the sequential run.
#[test]
fn parallel_collection_keeps_account_order() {
    let accounts = vec![
        account("bob", &[Category::Submissions]),
        account("alice", &[Category::Saved, Category::Upvoted]),
    ];

    let run = |jobs: usize| {
        let tmp = tempfile::tempdir().unwrap();
        let summary = RedditExport::new()
            .export_dir(tmp.path())
            .timestamp(TS)
            .url_only(true)
            .account_concurrency(jobs)
            .run(&two_accounts(), &accounts)
            .unwrap();
        read_lines(&summary.written[0])
    };

    let sequential = run(1);
    assert!(sequential[0].contains("/b1/"));
    assert_eq!(sequential, run(4));
}
