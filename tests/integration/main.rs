//! Integration tests for basketscan

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn basketscan() -> Command {
        cargo_bin_cmd!("basketscan")
    }

    #[test]
    fn help_displays() {
        basketscan()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("most-downloaded PyPI packages"));
    }

    #[test]
    fn version_displays() {
        basketscan()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("basketscan"));
    }

    #[test]
    fn invalid_config_file_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "not [valid toml").unwrap();

        basketscan()
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}

mod pipeline_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Write an executable stub tool into `dir`
    fn write_stub(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// PATH with the stub directory prepended
    fn stub_path(stubs: &Path) -> String {
        format!(
            "{}:{}",
            stubs.display(),
            std::env::var("PATH").unwrap_or_default()
        )
    }

    /// A basket stub that records downloads and fails for numpy
    const BASKET_STUB: &str = r#"#!/bin/sh
: "${BASKET_ROOT:?BASKET_ROOT not set}"
case "$1" in
  init)
    mkdir -p "$BASKET_ROOT"
    ;;
  download)
    if [ "$2" = "numpy" ]; then
      echo "no artifact for $2" >&2
      exit 1
    fi
    echo "$2 2.0.1" >> "$BASKET_ROOT/entries.txt"
    ;;
  list)
    cat "$BASKET_ROOT/entries.txt" 2>/dev/null
    echo
    ;;
esac
"#;

    /// A safety stub that copies the manifest it was given and exits 0
    const SAFETY_STUB: &str = r#"#!/bin/sh
[ "$1" = "check" ] || exit 64
[ "$2" = "-r" ] || exit 64
cat "$3" > scanned.txt
"#;

    /// A safety stub reporting findings via a non-zero exit
    const SAFETY_FINDINGS_STUB: &str = r#"#!/bin/sh
echo "2 known vulnerabilities found"
exit 7
"#;

    fn missing_config(temp: &TempDir) -> PathBuf {
        temp.path().join("no-config.toml")
    }

    async fn mock_feed(body: &str) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        let url = format!("{}/feed.json", server.uri());
        (server, url)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn end_to_end_with_partial_download_failure() {
        let temp = TempDir::new().unwrap();
        let stubs = temp.path().join("bin");
        std::fs::create_dir(&stubs).unwrap();
        write_stub(&stubs, "basket", BASKET_STUB);
        write_stub(&stubs, "safety", SAFETY_STUB);

        let workspace = temp.path().join(".basket");
        // Simulate leftovers from a previous run; the reset must remove them
        std::fs::create_dir(&workspace).unwrap();
        std::fs::write(workspace.join("entries.txt"), "stale 0.0.1\n").unwrap();

        let (_server, feed_url) =
            mock_feed(r#"{"rows":[{"project":"flask"},{"project":"numpy"}]}"#).await;

        cargo_bin_cmd!("basketscan")
            .env("PATH", stub_path(&stubs))
            .args([
                "--config",
                missing_config(&temp).to_str().unwrap(),
                "--feed-url",
                &feed_url,
                "--workspace-root",
                workspace.to_str().unwrap(),
            ])
            .assert()
            .success();

        // numpy's failed download produced no cache entry, and the stale
        // entry from the previous run did not survive the reset
        let manifest = std::fs::read_to_string(workspace.join("requirements.txt")).unwrap();
        assert_eq!(manifest, "flask==2.0.1\n");

        // The scanner ran inside the workspace against the manifest
        let scanned = std::fs::read_to_string(workspace.join("scanned.txt")).unwrap();
        assert_eq!(scanned, "flask==2.0.1\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn scanner_exit_code_passed_through() {
        let temp = TempDir::new().unwrap();
        let stubs = temp.path().join("bin");
        std::fs::create_dir(&stubs).unwrap();
        write_stub(&stubs, "basket", BASKET_STUB);
        write_stub(&stubs, "safety", SAFETY_FINDINGS_STUB);

        let workspace = temp.path().join(".basket");
        let (_server, feed_url) = mock_feed(r#"{"rows":[{"project":"flask"}]}"#).await;

        cargo_bin_cmd!("basketscan")
            .env("PATH", stub_path(&stubs))
            .args([
                "--config",
                missing_config(&temp).to_str().unwrap(),
                "--feed-url",
                &feed_url,
                "--workspace-root",
                workspace.to_str().unwrap(),
            ])
            .assert()
            .code(7)
            .stdout(predicate::str::contains("2 known vulnerabilities found"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_feed_aborts_before_downloads() {
        let temp = TempDir::new().unwrap();
        let stubs = temp.path().join("bin");
        std::fs::create_dir(&stubs).unwrap();
        write_stub(&stubs, "basket", BASKET_STUB);
        write_stub(&stubs, "safety", SAFETY_STUB);

        let workspace = temp.path().join(".basket");
        let (_server, feed_url) = mock_feed(r#"{"rows":[]}"#).await;

        cargo_bin_cmd!("basketscan")
            .env("PATH", stub_path(&stubs))
            .args([
                "--config",
                missing_config(&temp).to_str().unwrap(),
                "--feed-url",
                &feed_url,
                "--workspace-root",
                workspace.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("zero packages"));

        // The workspace was initialized but no manifest was generated
        assert!(!workspace.join("requirements.txt").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn feed_http_error_aborts_the_run() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join(".basket");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let feed_url = format!("{}/feed.json", server.uri());

        cargo_bin_cmd!("basketscan")
            .args([
                "--config",
                missing_config(&temp).to_str().unwrap(),
                "--feed-url",
                &feed_url,
                "--workspace-root",
                workspace.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("HTTP 404"));

        // Nothing was touched on disk
        assert!(!workspace.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reuse_workspace_keeps_existing_entries() {
        let temp = TempDir::new().unwrap();
        let stubs = temp.path().join("bin");
        std::fs::create_dir(&stubs).unwrap();
        write_stub(&stubs, "basket", BASKET_STUB);
        write_stub(&stubs, "safety", SAFETY_STUB);

        let workspace = temp.path().join(".basket");
        std::fs::create_dir(&workspace).unwrap();
        std::fs::write(workspace.join("entries.txt"), "kept 1.0.0\n").unwrap();

        let (_server, feed_url) = mock_feed(r#"{"rows":[{"project":"flask"}]}"#).await;

        cargo_bin_cmd!("basketscan")
            .env("PATH", stub_path(&stubs))
            .args([
                "--config",
                missing_config(&temp).to_str().unwrap(),
                "--feed-url",
                &feed_url,
                "--workspace-root",
                workspace.to_str().unwrap(),
                "--reuse-workspace",
            ])
            .assert()
            .success();

        let manifest = std::fs::read_to_string(workspace.join("requirements.txt")).unwrap();
        assert_eq!(manifest, "kept==1.0.0\nflask==2.0.1\n");
    }
}
