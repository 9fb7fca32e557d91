//! Runs the `fezdex` binary against a `public/` directory on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fezdex_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("fezdex");
    path
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// A site with one post, one series, one project, one app and a Music log.
/// The Food category file is absent.
fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let public = tmp.path().join("public");

    write(
        &public,
        "posts/posts.json",
        r#"[
            {"slug": "hello", "title": "Hello World", "tags": ["intro"]},
            {"title": "Saga", "series": {"posts": [
                {"slug": "ep1", "title": "Part One"},
                {"slug": "ep2", "title": "Part Two"}
            ]}}
        ]"#,
    );
    write(
        &public,
        "projects/projects.json",
        r#"[{"slug": "fezcodex", "title": "Fezcodex", "technologies": ["Rust"]}]"#,
    );
    write(
        &public,
        "apps/apps.json",
        r#"{"Utilities": {"apps": [{"to": "/apps/clock", "title": "Clock"}]}}"#,
    );
    for category in ["book", "movie", "game", "article", "series", "websites", "tools"] {
        write(&public, &format!("logs/{0}/{0}.json", category), "[]");
    }
    write(
        &public,
        "logs/music/music.json",
        r#"[{"slug": "stylo", "title": "Stylo", "category": "Music"}]"#,
    );
    tmp
}

fn run_fezdex(site: &TempDir, args: &[&str]) -> (String, String, bool) {
    let binary = fezdex_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(site.path().join("missing.toml"))
        .arg("--root")
        .arg(site.path().join("public"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run fezdex binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_index_summary() {
    let site = setup_site();
    let (stdout, stderr, success) = run_fezdex(&site, &["index"]);
    assert!(success, "index failed: {}", stderr);
    assert!(stdout.contains("post"), "stdout: {}", stdout);
    assert!(stdout.contains("skipped log categories: Food"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_index_json_order() {
    let site = setup_site();
    let (stdout, stderr, success) = run_fezdex(&site, &["index", "--json"]);
    assert!(success, "index --json failed: {}", stderr);

    let records: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records[0]["type"], "page");
    assert_eq!(records.last().unwrap()["type"], "app");

    let titles: Vec<&str> = records
        .iter()
        .filter(|r| r["type"] == "post")
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Hello World", "Saga: Part One", "Saga: Part Two"]);
}

#[test]
fn test_search_prints_matches() {
    let site = setup_site();
    let (stdout, stderr, success) = run_fezdex(&site, &["search", "STYLO music"]);
    assert!(success, "search failed: {}", stderr);
    assert!(stdout.contains("1. [log] Stylo"), "stdout: {}", stdout);
    assert!(stdout.contains("path: /logs/music/stylo"));
}

#[test]
fn test_search_type_and_limit() {
    let site = setup_site();
    let (stdout, _, success) = run_fezdex(&site, &["search", "saga", "--type", "post", "--limit", "1"]);
    assert!(success);
    assert!(stdout.contains("Saga: Part One"));
    assert!(!stdout.contains("Saga: Part Two"));
    assert!(stdout.contains("(1 of 2 matches shown)"));

    let (stdout, _, success) = run_fezdex(&site, &["search", "zzzz-nothing"]);
    assert!(success);
    assert!(stdout.contains("No results found"));
}

#[test]
fn test_sources_reports_missing_category() {
    let site = setup_site();
    let (stdout, stderr, success) = run_fezdex(&site, &["sources"]);
    assert!(success, "sources failed: {}", stderr);
    assert!(stdout.contains("logs:Food"), "stdout: {}", stdout);
    assert!(stdout.contains("posts"));
}

#[test]
fn test_missing_posts_fails_index() {
    let site = setup_site();
    fs::remove_file(site.path().join("public/posts/posts.json")).unwrap();
    let (_, stderr, success) = run_fezdex(&site, &["index"]);
    assert!(!success);
    assert!(stderr.contains("failed to build search index"), "stderr: {}", stderr);
}
