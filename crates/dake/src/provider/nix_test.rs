// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Mutex;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::CommandOutput;

/// Replays a canned output and records every invocation.
#[derive(Debug, Default)]
struct StubRunner {
    output: CommandOutput,
    calls: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
}

impl StubRunner {
    fn printing(stdout: &str) -> Self {
        Self::exiting(Some(0), stdout.as_bytes())
    }

    fn exiting(code: Option<i32>, stdout: &[u8]) -> Self {
        Self {
            output: CommandOutput {
                code,
                stdout: stdout.to_vec(),
            },
            calls: Mutex::default(),
        }
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> crate::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));
        Ok(self.output.clone())
    }
}

struct Project {
    _tmp: TempDir,
    marker: PathBuf,
}

#[fixture]
fn project() -> Project {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("shell.nix");
    std::fs::write(&marker, "{ pkgs ? import <nixpkgs> {} }: pkgs.mkShell {}\n").unwrap();
    Project { _tmp: tmp, marker }
}

fn paths(entries: &[&str]) -> Vec<PathBuf> {
    entries.iter().map(PathBuf::from).collect()
}

#[rstest]
#[tokio::test]
async fn test_excludes_inherited_and_collapses_repeats(project: Project) {
    let provider = NixProvider::with_runner(StubRunner::printing("/a:/c:/c:/d\n"));

    let context = provider
        .resolve_with_search_path(&project.marker, Some(OsStr::new("/a:/b")))
        .await
        .expect("Should resolve context");

    assert_eq!(context.paths, paths(&["/c", "/d"]));
    assert_eq!(context.marker, project.marker);
}

#[rstest]
#[case("")]
#[case("\n")]
#[case("   \n\t")]
#[tokio::test]
async fn test_empty_output_yields_no_paths(project: Project, #[case] stdout: &str) {
    let provider = NixProvider::with_runner(StubRunner::printing(stdout));

    let context = provider
        .resolve_with_search_path(&project.marker, Some(OsStr::new("/usr/bin")))
        .await
        .expect("Empty output is a valid context");

    assert!(context.paths.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_preserves_provider_order(project: Project) {
    let provider = NixProvider::with_runner(StubRunner::printing(
        "/nix/store/zzz-git/bin:/nix/store/aaa-jq/bin:/usr/bin:/nix/store/zzz-git/bin",
    ));

    let context = provider
        .resolve_with_search_path(&project.marker, Some(OsStr::new("/usr/bin:/bin")))
        .await
        .unwrap();

    assert_eq!(
        context.paths,
        paths(&["/nix/store/zzz-git/bin", "/nix/store/aaa-jq/bin"])
    );
}

#[rstest]
#[tokio::test]
async fn test_invalid_entries_are_dropped(project: Project) {
    let provider =
        NixProvider::with_runner(StubRunner::printing("/good/bin::relative/bin:/other/bin"));

    let context = provider
        .resolve_with_search_path(&project.marker, None)
        .await
        .expect("Invalid entries should not fail resolution");

    assert_eq!(context.paths, paths(&["/good/bin", "/other/bin"]));
}

#[rstest]
#[tokio::test]
async fn test_runs_in_marker_directory(project: Project) {
    let provider = NixProvider::with_runner(StubRunner::printing("/x/bin"));

    provider
        .resolve_with_search_path(&project.marker, None)
        .await
        .unwrap();

    let calls = provider.runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (program, args, cwd) = &calls[0];
    assert_eq!(program, "nix-shell");
    assert_eq!(args, &["shell.nix", "--run", "printenv PATH"]);
    assert_eq!(cwd.as_path(), project.marker.parent().unwrap());
}

#[rstest]
#[tokio::test]
async fn test_fingerprint_matches_marker_content(project: Project) {
    let provider = NixProvider::with_runner(StubRunner::printing(""));

    let context = provider
        .resolve_with_search_path(&project.marker, None)
        .await
        .unwrap();

    let expected = Fingerprint::of_bytes(&std::fs::read(&project.marker).unwrap());
    assert_eq!(context.fingerprint, expected);
}

#[rstest]
#[case(Some(1))]
#[case(Some(127))]
#[case(None)]
#[tokio::test]
async fn test_failed_command_is_invocation_error(project: Project, #[case] code: Option<i32>) {
    let provider =
        NixProvider::with_runner(StubRunner::exiting(code, b"/would/not/be/parsed")).program("my-nix");

    let result = provider.resolve_with_search_path(&project.marker, None).await;

    match result {
        Err(crate::Error::ProviderInvocation { program, code: actual }) => {
            assert_eq!(program, "my-nix");
            assert_eq!(actual, code);
        }
        other => panic!("Expected ProviderInvocation, got: {:?}", other),
    }
}

#[rstest]
#[tokio::test]
async fn test_non_utf8_output_is_output_error(project: Project) {
    let provider = NixProvider::with_runner(StubRunner::exiting(Some(0), &[0x2f, 0xff, 0xfe]));

    let result = provider.resolve_with_search_path(&project.marker, None).await;

    assert!(matches!(result, Err(crate::Error::ProviderOutput { .. })));
}

#[rstest]
#[tokio::test]
async fn test_missing_marker_does_not_run_provider() {
    let tmp = TempDir::new().unwrap();
    let provider = NixProvider::with_runner(StubRunner::printing("/x/bin"));

    let result = provider
        .resolve_with_search_path(&tmp.path().join("shell.nix"), None)
        .await;

    assert!(matches!(result, Err(crate::Error::ReadFailed { .. })));
    assert!(provider.runner.calls.lock().unwrap().is_empty());
}

#[rstest]
fn test_custom_marker_name() {
    let provider = NixProvider::new().marker("default.nix");
    assert_eq!(provider.marker_name(), "default.nix");
    assert_eq!(provider.name(), "nix");
}
