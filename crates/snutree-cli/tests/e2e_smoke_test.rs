use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use snutree_cli::{Args, run};

/// Collects every directory file (.csv or .toml) in `dir`, skipping the
/// `<name>.config.toml` files that configure them
fn collect_directories(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                let is_directory = matches!(
                    path.extension().and_then(|s| s.to_str()),
                    Some("csv" | "toml")
                );
                let is_config = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|name| name.ends_with(".config.toml"));
                path.is_file() && is_directory && !is_config
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demos_path() -> PathBuf {
    // Demos are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(directory: &Path, output: &Path) -> Args {
    let stem = directory.file_stem().unwrap().to_string_lossy();
    let config = directory.with_file_name(format!("{stem}.config.toml"));

    Args {
        inputs: vec![directory.to_string_lossy().to_string()],
        output: output.to_string_lossy().to_string(),
        config: config
            .is_file()
            .then(|| config.to_string_lossy().to_string()),
        schema: None,
        chapter: None,
        seed: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    // Create a temporary directory for test outputs
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_directories(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!("{}.dot", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, &output_path);

        match run(&args) {
            Ok(()) => {
                let dot = fs::read_to_string(&output_path).unwrap();
                assert!(
                    dot.starts_with("digraph \"family_tree\""),
                    "{}: unexpected output\n{dot}",
                    demo_path.display()
                );
                assert!(
                    graphviz_rust::parse(&dot).is_ok(),
                    "{}: output does not parse\n{dot}",
                    demo_path.display()
                );
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    // Create a temporary directory for test outputs
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_directories(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.dot",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, &output_path);

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_multiple_inputs_share_one_tree() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let first = temp_dir.path().join("first.csv");
    let second = temp_dir.path().join("second.csv");
    fs::write(&first, "name,big_name,pledge_semester\nAnn,,Fall 2000\n").unwrap();
    fs::write(&second, "name,big_name,pledge_semester\nBen,Ann,Spring 2001\n").unwrap();

    let output = temp_dir.path().join("tree.dot");
    let args = Args {
        inputs: vec![
            first.to_string_lossy().to_string(),
            second.to_string_lossy().to_string(),
        ],
        output: output.to_string_lossy().to_string(),
        config: None,
        schema: None,
        chapter: None,
        seed: Some(5),
        log_level: "off".to_string(),
    };

    run(&args).unwrap();

    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.contains("\"Ann\" -> \"Ben\""), "{dot}");
}
