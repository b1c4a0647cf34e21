use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Instant every test commit is stamped with
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";
/// How `COMMIT_DATE` shows up in `log`
pub const DISPLAYED_COMMIT_DATE: &str = "Sun Jan 01 12:00:00 2023 +0000";
/// How the root commit's date shows up in `log`
pub const DISPLAYED_EPOCH: &str = "Thu Jan 01 00:00:00 1970 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// A repository whose master holds `wug.txt` ("This is a wug.") in one commit
#[fixture]
pub fn wug_repository_dir(init_repository_dir: TempDir) -> TempDir {
    commit_files(
        init_repository_dir.path(),
        &[("wug.txt", "This is a wug.\n")],
        "added wug",
    );

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("TWIG_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Write, stage and commit the given files in one go
pub fn commit_files(dir: &Path, files: &[(&str, &str)], message: &str) {
    for (filename, content) in files {
        write_file(FileSpec::new(dir.join(filename), content.to_string()));
        run_twig_command(dir, &["add", filename]).assert().success();
    }

    twig_commit(dir, message).assert().success();
}

pub fn stdout_of(command: &mut Command) -> String {
    let output = command.output().expect("Failed to run twig");
    String::from_utf8(output.stdout).expect("twig printed invalid UTF-8")
}

/// Id of the commit the given branch points to
pub fn branch_tip(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".twig").join("refs").join("heads").join(branch);

    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read ref {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}

/// Id of the commit the current branch points to
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".twig").join("HEAD"))
        .expect("Failed to read HEAD");
    let ref_path = head
        .trim()
        .strip_prefix("ref: ")
        .expect("HEAD is not a symbolic ref");

    std::fs::read_to_string(dir.join(".twig").join(ref_path))
        .expect("Failed to read current branch")
        .trim()
        .to_string()
}
