// Copyright (c) Contributors to the dake project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

#[rstest]
#[tokio::test]
async fn test_fingerprint_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("shell.nix");
    std::fs::write(&path, "{ pkgs ? import <nixpkgs> {} }:\npkgs.mkShell {}\n").unwrap();

    let first = Fingerprint::of_file(&path).await.unwrap();
    let second = Fingerprint::of_file(&path).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_str().len(), Fingerprint::HEX_LEN);
}

#[rstest]
#[tokio::test]
async fn test_one_byte_change_changes_fingerprint() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("shell.nix");
    std::fs::write(&path, b"pkgs.mkShell { }").unwrap();
    let before = Fingerprint::of_file(&path).await.unwrap();

    std::fs::write(&path, b"pkgs.mkShell { } ").unwrap();
    let after = Fingerprint::of_file(&path).await.unwrap();

    assert_ne!(before, after);
}

#[rstest]
fn test_line_endings_are_not_normalized() {
    assert_ne!(
        Fingerprint::of_bytes(b"a\nb\n"),
        Fingerprint::of_bytes(b"a\r\nb\r\n")
    );
}

#[rstest]
fn test_known_digest() {
    // sha512 of the empty input
    let empty = Fingerprint::of_bytes(b"");
    assert!(empty.as_str().starts_with("cf83e1357eefb8bdf1542850d66d8007"));
    assert_eq!(empty.short(), "cf83e1357eef");
}

#[rstest]
#[tokio::test]
async fn test_missing_file_is_read_failure() {
    let tmp = TempDir::new().unwrap();
    let result = Fingerprint::of_file(tmp.path().join("missing.nix")).await;

    match result {
        Err(crate::Error::ReadFailed { path, .. }) => {
            assert_eq!(path, tmp.path().join("missing.nix"));
        }
        other => panic!("Expected ReadFailed, got: {:?}", other),
    }
}
