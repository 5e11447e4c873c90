//! Tests driving the vault-transfer binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
}

/// Run the binary against a vault, with no config file, and return stdout, stderr and exit code.
fn run_transfer(vault: &Path, args: &[&str]) -> (String, String, i32) {
    let binary = env!("CARGO_BIN_EXE_vault-transfer");
    let empty_config = vault.join(".empty-config.toml");
    fs::write(&empty_config, "").unwrap();

    let output = Command::new(binary)
        .arg("--vault")
        .arg(vault)
        .arg("--config")
        .arg(&empty_config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute vault-transfer");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

mod note_command {
    use super::*;

    #[test]
    fn transfers_and_links() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_files(source.path(), &[("Inbox/Idea.md", "Idea")]);
        let target_arg = target.path().to_string_lossy().into_owned();

        let (stdout, stderr, code) =
            run_transfer(source.path(), &["note", "Inbox/Idea", "--target", &target_arg]);

        assert_eq!(code, 0, "stderr: {}", stderr);
        assert!(stdout.contains("\"outcome\": \"copied_with_link\""));
        assert!(stderr.contains("Copying Inbox/Idea.md to "));
        assert_eq!(fs::read_to_string(target.path().join("Idea.md")).unwrap(), "Idea");
        let original = fs::read_to_string(source.path().join("Inbox/Idea.md")).unwrap();
        assert!(original.starts_with("[Idea](obsidian://vault/"));
    }

    #[test]
    fn missing_target_setting() {
        let source = TempDir::new().unwrap();
        write_files(source.path(), &[("a.md", "A")]);

        let (stdout, stderr, code) = run_transfer(source.path(), &["note", "a.md"]);

        assert_eq!(code, 6);
        assert!(stdout.contains("aborted_invalid_settings"));
        assert!(stderr.contains("Error: Target vault has not been set."));
        assert_eq!(fs::read_to_string(source.path().join("a.md")).unwrap(), "A");
    }

    #[test]
    fn existing_destination_exit_code() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_files(source.path(), &[("a.md", "A")]);
        write_files(target.path(), &[("a.md", "old")]);
        let target_arg = target.path().to_string_lossy().into_owned();

        let (_, _, code) = run_transfer(source.path(), &["note", "a.md", "--target", &target_arg]);

        assert_eq!(code, 3);
        assert_eq!(fs::read_to_string(target.path().join("a.md")).unwrap(), "old");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_files(source.path(), &[("P/a.md", "![[img.png]]"), ("P/img.png", "IMG")]);
        let target_arg = target.path().to_string_lossy().into_owned();

        let (stdout, _, code) = run_transfer(
            source.path(),
            &["note", "P/a.md", "--dry-run", "--recreate-tree", "--target", &target_arg],
        );

        assert_eq!(code, 0);
        assert!(stdout.contains("P/img.png"));
        assert!(!target.path().join("P").exists());
        assert_eq!(fs::read_to_string(source.path().join("P/a.md")).unwrap(), "![[img.png]]");
    }

    #[test]
    fn unknown_note() {
        let source = TempDir::new().unwrap();
        let (_, stderr, code) = run_transfer(source.path(), &["note", "ghost", "--target", "/tmp"]);
        assert_eq!(code, 2);
        assert!(stderr.contains("Not found"));
    }
}

mod folder_command {
    use super::*;

    #[test]
    fn transfers_folder_into_new_subfolder() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_files(source.path(), &[("P/a.md", "A"), ("P/Sub/b.md", "B")]);
        let target_arg = target.path().to_string_lossy().into_owned();

        let (stdout, stderr, code) = run_transfer(
            source.path(),
            &[
                "--yaml",
                "folder",
                "P",
                "--to",
                "Imported",
                "--mkdir",
                "--target",
                &target_arg,
                "--no-link",
            ],
        );

        assert_eq!(code, 0, "stderr: {}", stderr);
        assert!(stdout.contains("folder_removed: false"));
        assert_eq!(stderr.matches("Finished copying").count(), 2);
        assert!(target.path().join("Imported/a.md").exists());
        assert!(target.path().join("Imported/b.md").exists());
    }

    #[test]
    fn quiet_hides_notices() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_files(source.path(), &[("P/a.md", "A")]);
        let target_arg = target.path().to_string_lossy().into_owned();

        let (_, stderr, code) = run_transfer(
            source.path(),
            &["-q", "folder", "P", "--target", &target_arg, "--recreate-tree"],
        );

        assert_eq!(code, 0);
        assert!(!stderr.contains("Finished copying"));
        assert!(target.path().join("P/a.md").exists());
    }
}

mod link_command {
    use super::*;

    #[test]
    fn prints_link() {
        let source = TempDir::new().unwrap();
        write_files(source.path(), &[("MyNote.md", "x")]);

        let (stdout, _, code) = run_transfer(
            source.path(),
            &["link", "MyNote", "--target", "/Vaults/Second"],
        );

        assert_eq!(code, 0);
        assert!(stdout.contains("[MyNote](obsidian://vault/Second/MyNote)"));
        assert_eq!(fs::read_to_string(source.path().join("MyNote.md")).unwrap(), "x");
    }
}
