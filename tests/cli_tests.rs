use crate::common::command::{init_repository_dir, run_twig_command};
use assert_fs::TempDir;
use rstest::rstest;

mod common;

#[rstest]
fn missing_command_is_reported(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &[])
        .assert()
        .code(1)
        .stdout("Please enter a command.\n");
}

#[rstest]
#[case(&["glorp"])]
#[case(&["hash-object", "wug.txt"])]
fn unknown_command_is_reported(init_repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(init_repository_dir.path(), args)
        .assert()
        .code(1)
        .stdout("No command with that name exists.\n");
}

#[rstest]
#[case(&["add"])]
#[case(&["add", "a.txt", "b.txt"])]
#[case(&["commit"])]
#[case(&["init", "extra"])]
#[case(&["log", "extra"])]
#[case(&["branch"])]
#[case(&["merge"])]
#[case(&["checkout"])]
fn wrong_operand_shape_is_reported(init_repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(init_repository_dir.path(), args)
        .assert()
        .code(1)
        .stdout("Incorrect operands.\n");
}

#[rstest]
fn logging_goes_to_stderr_only(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["branch", "other"])
        .env("TWIG_LOG", "debug")
        .assert()
        .success()
        .stdout("");
}
