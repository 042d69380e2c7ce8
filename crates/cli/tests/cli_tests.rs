//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("referent");
    cmd.env_remove("OPENROUTER_API_KEY").env_remove("HUGGINGFACE_API_KEY");
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    cmd()
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Council approves bridge survey"))
        .stdout(predicate::str::contains("Advertisement").not());
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("paragraphs.html")).unwrap();
    cmd()
        .arg("-")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("weekend.\n\nFishing boats"));
}

#[test]
fn test_cli_json_format() {
    let output = cmd()
        .args(["-f", "json", &get_fixture_path("news_article.html")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Council approves bridge survey");
    assert_eq!(json["date"], "2024-03-05T09:00:00Z");
    assert!(json["content"].as_str().unwrap().contains("engineering survey"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("article.txt");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("public meeting"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().arg("nonexistent.html").assert().failure();
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "markdown", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_paywalled_page() {
    cmd()
        .arg(get_fixture_path("paywall.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Paywalled"));
}

#[test]
fn test_cli_empty_content() {
    cmd()
        .arg(get_fixture_path("empty.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_cli_unicode_content() {
    cmd()
        .arg(get_fixture_path("unicode_article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Городской совет"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Referent"))
        .stderr(predicate::str::contains("semantic_container"));
}

#[test]
fn test_cli_task_requires_api_key() {
    cmd()
        .args(["--task", "summary", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENROUTER_API_KEY"));
}

#[test]
fn test_cli_invalid_task() {
    cmd()
        .args(["--task", "poem", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task"));
}

#[test]
fn test_cli_illustration_requires_api_keys() {
    cmd()
        .args(["--task", "illustration", &get_fixture_path("news_article.html")])
        .env("OPENROUTER_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HUGGINGFACE_API_KEY"));
}

#[test]
fn test_cli_user_agent_flag() {
    cmd()
        .args(["--user-agent", "referent-test/1.0", &get_fixture_path("news_article.html")])
        .assert()
        .success();
}
