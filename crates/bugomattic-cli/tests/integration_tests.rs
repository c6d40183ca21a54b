//! Integration tests for the Bugomattic CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const REPORTING_CONFIG: &str = r#"{
  "Jetpack": {
    "description": "Security, performance, and growth tools",
    "learnMoreLinks": [{ "type": "slack", "channel": "jetpack-help" }],
    "featureGroups": {
      "Backups": {
        "features": {
          "Restore": {
            "keywords": ["rewind"],
            "tasks": {
              "bug": [{ "title": "Restore failed", "instructions": "Include the site URL" }],
              "featureRequest": [{ "link": { "type": "p2", "subdomain": "jetpackp2" } }]
            }
          }
        }
      }
    },
    "features": {
      "Stats": { "keywords": ["analytics"] }
    }
  },
  "WooCommerce": {
    "features": {
      "Billing": {
        "keywords": ["invoice"],
        "tasks": {
          "blocker": [{
            "title": "Invoices are broken",
            "link": { "type": "github", "repository": "woocommerce/woocommerce", "labels": ["bug"] }
          }]
        }
      }
    }
  }
}
"#;

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bugomattic").unwrap();
    cmd.arg("--no-color");
    cmd
}

/// Helper function to create a temporary directory with a reporting config
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("reporting.json"), REPORTING_CONFIG).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bugomattic routes a problem to the right place to report it.",
        ))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_help_examples_run_as_written() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bugomattic search backup reporting.json"))
        .stdout(predicate::str::contains("bugomattic tasks Jetpack__Stats reporting.json"));

    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tasks", "Jetpack__Stats", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jetpack › Stats"));
    cli()
        .current_dir(project.path())
        .args(["search", "backup", "reporting.json"])
        .assert()
        .success();
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build information:"));
}

#[test]
fn test_validate_reports_counts() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["validate", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reporting config is valid"))
        .stdout(predicate::str::contains("Products: 2"))
        .stdout(predicate::str::contains("Features: 3"))
        .stdout(predicate::str::contains("Tasks: 3"));
}

#[test]
fn test_validate_rejects_unknown_category() {
    let project = create_test_project();
    fs::write(
        project.path().join("broken.json"),
        r#"{"Jetpack": {"tasks": {"question": []}}}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["validate", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question"))
        .stderr(predicate::str::contains("$.Jetpack.tasks"));
}

#[test]
fn test_validate_rejects_unknown_field() {
    let project = create_test_project();
    fs::write(
        project.path().join("broken.json"),
        r#"{"Jetpack": {"colour": "green"}}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["validate", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema violation"));
}

#[test]
fn test_validate_rejects_colliding_ids() {
    let project = create_test_project();
    fs::write(
        project.path().join("broken.json"),
        r#"{"Jetpack": {"featureGroups": {"Stats": {}}, "features": {"Stats": {}}}}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["validate", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate ID 'Jetpack__Stats'"));
}

#[test]
fn test_validate_rejects_repeated_product() {
    let project = create_test_project();
    fs::write(
        project.path().join("broken.json"),
        r#"{"Jetpack": {"features": {"Backup": {}}}, "Jetpack": {"features": {"Stats": {}}}}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["validate", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key 'Jetpack'"));
}

#[test]
fn test_missing_reporting_config() {
    let project = TempDir::new().unwrap();
    cli()
        .current_dir(project.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reporting config given"));
}

#[test]
fn test_reporting_config_from_tool_config() {
    let project = create_test_project();
    fs::write(
        project.path().join(".bugomatticrc.json"),
        r#"{"reportingConfig": "reporting.json"}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Products: 2"));
}

#[test]
fn test_normalize_json() {
    let project = create_test_project();
    let output = cli()
        .current_dir(project.path())
        .args(["normalize", "reporting.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["features"]["Jetpack__Backups__Restore"]["parentId"],
        "Jetpack__Backups"
    );
    assert_eq!(
        json["tasks"]["WooCommerce__Billing__urgent__0"]["category"],
        "urgent"
    );
}

#[test]
fn test_normalize_yaml() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["normalize", "reporting.json", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jetpack__Backups__Restore__bug__0"));
}

#[test]
fn test_search_highlights_matches() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["search", "store", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Re[store] (Jetpack__Backups__Restore)"))
        .stdout(predicate::str::contains("WooCommerce").not())
        .stdout(predicate::str::contains("1 feature(s) match 'store'"));
}

#[test]
fn test_search_by_keyword() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["search", "invoice", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WooCommerce__Billing"))
        .stdout(predicate::str::contains("Jetpack").not());
}

#[test]
fn test_search_no_match() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["search", "zzz", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No features match 'zzz'"));
}

#[test]
fn test_search_json() {
    let project = create_test_project();
    let output = cli()
        .current_dir(project.path())
        .args(["search", "REWIND", "reporting.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["results"]["features"],
        serde_json::json!(["Jetpack__Backups__Restore"])
    );
    assert_eq!(json["results"]["products"], serde_json::json!(["Jetpack"]));
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
}

#[test]
fn test_custom_highlight_markers() {
    let project = create_test_project();
    fs::write(
        project.path().join("bugomattic.yaml"),
        "highlight:\n  open: '<<'\n  close: '>>'\n",
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["search", "stats", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<<Stats>>"));
}

#[test]
fn test_tree_collapsed_by_default() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tree", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▸ Jetpack (Jetpack)"))
        .stdout(predicate::str::contains("Jetpack__Stats").not());
}

#[test]
fn test_tree_expand() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tree", "reporting.json", "--expand", "Jetpack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▾ Jetpack (Jetpack)"))
        .stdout(predicate::str::contains("  ▸ Backups (Jetpack__Backups)"))
        .stdout(predicate::str::contains("  • Stats (Jetpack__Stats)"))
        .stdout(predicate::str::contains("Jetpack__Backups__Restore").not());
}

#[test]
fn test_tree_expand_all() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tree", "reporting.json", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("    • Restore (Jetpack__Backups__Restore)"))
        .stdout(predicate::str::contains("WooCommerce__Billing"));
}

#[test]
fn test_tree_unknown_node() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tree", "reporting.json", "--expand", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
}

#[test]
fn test_tasks_lists_links() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["tasks", "Jetpack__Backups__Restore", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jetpack › Backups › Restore"))
        .stdout(predicate::str::contains("Restore failed"))
        .stdout(predicate::str::contains("Include the site URL"))
        .stdout(predicate::str::contains("https://jetpackp2.wordpress.com"));
}

#[test]
fn test_tasks_github_link_json() {
    let project = create_test_project();
    let output = cli()
        .current_dir(project.path())
        .args([
            "tasks",
            "WooCommerce__Billing",
            "reporting.json",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let task = &json["tasks"][0];
    assert_eq!(task["category"], "urgent");
    assert_eq!(
        task["href"],
        "https://github.com/woocommerce/woocommerce/issues/new?labels=bug"
    );
}

#[test]
fn test_tasks_learn_more_uses_configured_slack() {
    let project = create_test_project();
    fs::write(
        project.path().join(".bugomatticrc.json"),
        r#"{"links": {"slackBaseUrl": "https://example.slack.com/archives/"}}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["tasks", "Jetpack", "reporting.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#jetpack-help: https://example.slack.com/archives/jetpack-help",
        ));
}

#[test]
fn test_interactive_reads_terms() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["interactive", "reporting.json", "--cache-size", "1"])
        .write_stdin("rewind\nbill\nrewind\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("> rewind"))
        .stdout(predicate::str::contains("Jetpack__Backups__Restore"))
        .stdout(predicate::str::contains("[Bill]ing (WooCommerce__Billing)"))
        .stdout(predicate::str::contains("> \n▸ Jetpack (Jetpack)"));
}

#[test]
fn test_interactive_accepts_huge_cache_size() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["interactive", "reporting.json", "--cache-size"])
        .arg(usize::MAX.to_string())
        .write_stdin("rewind\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jetpack__Backups__Restore"));
}

#[test]
fn test_schema_command() {
    cli()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("RawConfig"));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = fs::read_to_string(temp_dir.path().join(".bugomatticrc.json")).unwrap();
    assert!(content.contains("reportingConfig"));

    // A second run without --force refuses to overwrite
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure();
}

#[test]
fn test_config_init_toml() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init", "--format", "toml"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join(".bugomatticrc.toml")).unwrap();
    assert!(content.contains("maxEntries = 50"));
}

#[test]
fn test_config_show_resolved() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".bugomatticrc.json"),
        r#"{"cache": {"maxEntries": 7}}"#,
    )
    .unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show", "--resolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxEntries\": 7"))
        .stdout(predicate::str::contains("https://a8c.slack.com/channels/"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bugomattic"));
}
