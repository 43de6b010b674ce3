use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

fn run_command(args: &[&str], test_dir: &str) -> (bool, String, String) {
    // Point MCMAN_DIR at the test directory so nothing touches the real working directory
    let output = Command::new(env!("CARGO_BIN_EXE_mcman"))
        .args(args)
        .env("MCMAN_DIR", test_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let success = output.status.success();
    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Combine stdout and stderr for checking messages
    let combined_output = if stdout.is_empty() {
        stderr.clone()
    } else if stderr.is_empty() {
        stdout.clone()
    } else {
        format!("{}\n{}", stdout, stderr)
    };

    (success, combined_output, stderr)
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn create_jar(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_no_arguments_prints_help() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (_, output, _) = run_command(&[], test_dir);

    assert!(output.contains("Usage"), "Expected usage in output: {}", output);
    assert!(output.contains("server"), "Expected server command in help: {}", output);
    assert!(output.contains("plugin"), "Expected plugin command in help: {}", output);
}

#[test]
fn test_identify_paper_jar() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let jar = temp_dir.path().join("server.jar");
    create_jar(
        &jar,
        &[(
            "META-INF/MANIFEST.MF",
            "Manifest-Version: 1.0\nMain-Class: io.papermc.paperclip.Main\nImplementation-Version: git-Paper-196 (MC: 1.20.4)\n",
        )],
    );

    let (success, output, _) =
        run_command(&["server", "identify", jar.to_str().unwrap()], test_dir);

    assert!(success, "Identify should succeed. output: {}", output);
    assert!(output.contains("Paper"), "Expected server name in output: {}", output);
    assert!(output.contains("1.20.4"), "Expected version in output: {}", output);
    assert!(output.contains("196"), "Expected build in output: {}", output);
    assert!(output.contains("sha256:"), "Expected checksum in output: {}", output);
}

#[test]
fn test_identify_from_filename_with_unknown_build() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let jar = temp_dir.path().join("minecraft_server.1.20.4.jar");
    create_jar(&jar, &[("net/minecraft/server/Main.class", "")]);

    let (success, output, _) = run_command(&["s", "i", jar.to_str().unwrap()], test_dir);

    assert!(success, "Identify should succeed. output: {}", output);
    assert!(output.contains("Vanilla"), "Expected server name in output: {}", output);
    assert!(output.contains("unknown"), "Expected unknown build in output: {}", output);
}

#[test]
fn test_identify_rejects_non_jar() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let file = temp_dir.path().join("notes.txt");
    fs::write(&file, "not a jar").unwrap();

    let (success, output, _) =
        run_command(&["server", "identify", file.to_str().unwrap()], test_dir);

    assert!(!success, "Identify should fail for a non-jar file");
    assert!(
        output.contains("is not a jar file"),
        "Expected jar error in output: {}",
        output
    );
}

#[test]
fn test_plugin_list_with_no_plugins() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) = run_command(&["plugin", "list"], test_dir);

    assert!(success, "List should succeed. output: {}", output);
    assert!(
        output.contains("No plugins installed"),
        "Expected empty listing message: {}",
        output
    );
}

#[test]
fn test_plugin_update_with_no_plugins() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    fs::create_dir(temp_dir.path().join("plugins")).unwrap();

    let (success, output, _) = run_command(&["p", "u"], test_dir);

    assert!(success, "Update should succeed. output: {}", output);
    assert!(
        output.contains("No plugins installed"),
        "Expected empty plugins message: {}",
        output
    );
}

#[test]
fn test_head_and_tail_are_exclusive() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, _, stderr) =
        run_command(&["--head=5", "--tail=5", "server", "servers"], test_dir);

    assert!(!success, "--head and --tail together should be rejected");
    assert!(stderr.contains("cannot be used with"), "Expected conflict error: {}", stderr);
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    fs::write(temp_dir.path().join("mcman.toml"), "favourite_colour = \"blue\"\n").unwrap();

    let (success, output, _) = run_command(&["plugin", "list"], test_dir);

    assert!(!success, "An invalid config file should fail the command");
    assert!(
        output.contains("Invalid config file"),
        "Expected config error in output: {}",
        output
    );
}

#[test]
fn test_plugin_download_requires_a_plugin() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, _, stderr) = run_command(&["plugin", "download"], test_dir);

    assert!(!success, "Download without plugins should fail");
    assert!(stderr.contains("required"), "Expected missing argument error: {}", stderr);
}
