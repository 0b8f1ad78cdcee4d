/*!
 * End-to-end tests for csbundle runs
 */

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::combiner::Combiner;
use crate::config::Config;
use crate::error::{CombineError, Result};
use crate::manifest::PartManifest;
use crate::status::StatusLog;
use crate::type_index::TypeIndexFile;
use crate::types::Category;
use crate::utils::{count_lines, fingerprint};

// Helper to write a file, creating parent directories
fn write_file(root: &Path, rel: &str, content: &str) -> io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

// A project with a `Scripts` source folder; output lands in `<project>/combined-code`
fn setup_project() -> io::Result<(tempfile::TempDir, PathBuf)> {
    let temp_dir = tempdir()?;
    let scripts = temp_dir.path().join("Scripts");
    fs::create_dir(&scripts)?;
    Ok((temp_dir, scripts))
}

fn numbered_lines(n: usize) -> String {
    (0..n).map(|i| format!("// {}", i)).collect::<Vec<_>>().join("\n")
}

fn read_manifest(path: &Path) -> PartManifest {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_file_scenario() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "Alpha.cs", "using X;\n\npublic class Alpha\n{\n}")?;
    write_file(&scripts, "editor/Beta.cs", "using X;\n\npublic class Beta\n{\n}")?;

    let status = StatusLog::new();
    let summary = Combiner::new(Config::for_dir(&scripts, temp_dir.path())).run(&status)?;
    let out = temp_dir.path().join("combined-code");

    assert_eq!(summary.files, 2);
    assert_eq!(summary.total_lines, 10);

    let main = fs::read_to_string(out.join("Scripts-main.cs"))?;
    assert!(main.contains("//  FILE : Alpha.cs"));
    assert!(main.contains("//  LINES: 5    MD5: "));
    assert!(main.contains("public class Alpha"));
    assert!(!main.contains("Beta"));

    let editor = fs::read_to_string(out.join("Scripts-editor.cs"))?;
    assert!(editor.contains("//  FILE : editor/Beta.cs"));
    assert!(!out.join("Scripts-test.cs").exists());

    let types: TypeIndexFile =
        serde_json::from_str(&fs::read_to_string(out.join("Scripts-types.json"))?)?;
    assert_eq!(types.types.len(), 2);
    assert_eq!(types.types["Alpha"], "Alpha.cs");
    assert_eq!(types.types["Beta"], "editor/Beta.cs");

    assert_eq!(
        read_manifest(&out.join("Scripts-main.json")).includes,
        vec!["Alpha.cs"]
    );
    assert_eq!(
        read_manifest(&out.join("Scripts-editor.json")).includes,
        vec!["editor/Beta.cs"]
    );

    assert_eq!(
        archive_names(&summary.archive),
        vec![
            "Scripts-editor.cs",
            "Scripts-editor.json",
            "Scripts-main.cs",
            "Scripts-main.json",
            "Scripts-types.json"
        ]
    );

    // status sequence seen by the caller
    let messages = status.messages.borrow().clone();
    assert_eq!(messages.first().map(String::as_str), Some("Scanning…"));
    assert!(messages.contains(&"Combining 2 files…".to_string()));
    assert_eq!(messages.last().map(String::as_str), Some("Done"));
    assert_eq!(status.progress.borrow().len(), 2);
    assert_eq!(*status.revealed.borrow(), Some(summary.archive.clone()));

    Ok(())
}

#[test]
fn test_single_oversized_file() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "Huge.cs", &numbered_lines(15_000))?;

    let summary = Combiner::new(Config::for_dir(&scripts, temp_dir.path())).run(&StatusLog::new())?;
    let out = temp_dir.path().join("combined-code");

    assert_eq!(summary.parts.len(), 1);
    assert_eq!(summary.parts[0].lines, 15_000);
    assert!(out.join("Scripts-main.cs").exists());
    assert!(!out.join("Scripts-main-2.cs").exists());
    assert_eq!(
        read_manifest(&out.join("Scripts-main.json")).includes,
        vec!["Huge.cs"]
    );

    Ok(())
}

#[test]
fn test_rotation_and_invariants() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    let sizes = [
        ("a.cs", 40),
        ("b.cs", 30),
        ("c.cs", 45),
        ("Tests/t1.cs", 20),
        ("Tests/t2.cs", 90),
        ("d.cs", 5),
        ("Editor/e.cs", 10),
    ];
    for (path, lines) in sizes {
        write_file(&scripts, path, &numbered_lines(lines))?;
    }

    let config = Config {
        max_lines_per_part: 80,
        type_index: false,
        ..Config::for_dir(&scripts, temp_dir.path())
    };
    let summary = Combiner::new(config).run(&StatusLog::new())?;
    let out = temp_dir.path().join("combined-code");

    // every file in exactly one manifest
    let mut seen = Vec::new();
    for part in &summary.parts {
        let manifest = read_manifest(&out.join(&part.file_name).with_extension("json"));
        assert_eq!(manifest.combined, part.file_name);
        seen.extend(manifest.includes);

        // no part over the limit unless it is a single file
        assert!(part.lines <= 80 || part.files == 1, "{:?}", part);
    }
    let unique: HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(seen.len(), sizes.len());
    assert_eq!(unique.len(), sizes.len());

    // per-category line totals are preserved
    for category in Category::ALL {
        let expected: usize = sizes
            .iter()
            .filter(|(p, _)| crate::classifier::classify(&format!("Scripts/{}", p)) == category)
            .map(|(_, n)| *n)
            .sum();
        let actual: usize = summary
            .parts
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.lines)
            .sum();
        assert_eq!(actual, expected, "category {}", category);
    }

    // main: a(40)+b(30)=70, c(45) rotates, d(5) joins c
    assert_eq!(
        read_manifest(&out.join("Scripts-main.json")).includes,
        vec!["a.cs", "b.cs"]
    );
    assert_eq!(
        read_manifest(&out.join("Scripts-main-2.json")).includes,
        vec!["c.cs", "d.cs"]
    );
    assert!(out.join("Scripts-test-2.cs").exists());
    assert!(!out.join("Scripts-types.json").exists());

    Ok(())
}

#[test]
fn test_rerun_is_idempotent() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "A.cs", "class A {}\n")?;
    write_file(&scripts, "Tests/ATests.cs", "class ATests {}\n")?;
    let out = temp_dir.path().join("combined-code");

    let config = Config::for_dir(&scripts, temp_dir.path());
    Combiner::new(config.clone()).run(&StatusLog::new())?;
    let first_part = fs::read(out.join("Scripts-main.cs"))?;
    let first_manifest = read_manifest(&out.join("Scripts-test.json"));
    let first_files = output_files(&out);

    let summary = Combiner::new(config).run(&StatusLog::new())?;
    assert_eq!(fs::read(out.join("Scripts-main.cs"))?, first_part);
    let second_manifest = read_manifest(&out.join("Scripts-test.json"));
    assert_eq!(second_manifest.combined, first_manifest.combined);
    assert_eq!(second_manifest.includes, first_manifest.includes);
    assert_eq!(output_files(&out), first_files);
    // parts, manifests and the type index of the first run
    assert_eq!(summary.removed, 5);

    Ok(())
}

#[test]
fn test_shrunk_input_leaves_no_stale_files() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    for i in 0..4 {
        write_file(&scripts, &format!("F{}.cs", i), &numbered_lines(30))?;
    }
    write_file(&scripts, "Editor/E.cs", "class E {}")?;
    let out = temp_dir.path().join("combined-code");

    let config = Config {
        max_lines_per_part: 50,
        ..Config::for_dir(&scripts, temp_dir.path())
    };
    Combiner::new(config.clone()).run(&StatusLog::new())?;
    assert!(out.join("Scripts-main-4.cs").exists());
    assert!(out.join("Scripts-editor.cs").exists());

    for i in 1..4 {
        fs::remove_file(scripts.join(format!("F{}.cs", i)))?;
    }
    fs::remove_dir_all(scripts.join("Editor"))?;

    let summary = Combiner::new(config).run(&StatusLog::new())?;
    assert_eq!(
        output_files(&out),
        vec!["Scripts-main.cs", "Scripts-main.json", "Scripts-upload.zip"]
    );
    assert_eq!(
        archive_names(&summary.archive),
        vec!["Scripts-main.cs", "Scripts-main.json"]
    );

    Ok(())
}

#[test]
fn test_type_index_first_writer_wins() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "b/Foo.cs", "class Foo {}")?;
    write_file(&scripts, "a/Foo.cs", "class Foo {}")?;
    write_file(&scripts, "C.cs", "// class Foo\nclass Other {}")?;

    Combiner::new(Config::for_dir(&scripts, temp_dir.path())).run(&StatusLog::new())?;
    let types: TypeIndexFile = serde_json::from_str(&fs::read_to_string(
        temp_dir.path().join("combined-code/Scripts-types.json"),
    )?)?;

    assert_eq!(types.types["Foo"], "a/Foo.cs");
    assert_eq!(types.types["Other"], "C.cs");

    Ok(())
}

#[test]
fn test_archive_contains_every_artifact() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "A.cs", &numbered_lines(10))?;
    write_file(&scripts, "B.cs", &numbered_lines(10))?;
    write_file(&scripts, "Tests/T.cs", "class T {}")?;

    let config = Config {
        max_lines_per_part: 15,
        ..Config::for_dir(&scripts, temp_dir.path())
    };
    let summary = Combiner::new(config).run(&StatusLog::new())?;
    let out = temp_dir.path().join("combined-code");

    let on_disk: Vec<String> = output_files(&out)
        .into_iter()
        .filter(|n| !n.ends_with(".zip"))
        .collect();
    assert_eq!(archive_names(&summary.archive), on_disk);

    // entry contents match the files on disk
    let mut archive = zip::ZipArchive::new(File::open(&summary.archive)?)?;
    let mut body = String::new();
    archive.by_name("Scripts-main-2.cs")?.read_to_string(&mut body)?;
    assert_eq!(body, fs::read_to_string(out.join("Scripts-main-2.cs"))?);

    Ok(())
}

#[test]
fn test_part_lines_match_headers() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    let content = "class Trailing {}\n";
    write_file(&scripts, "Trailing.cs", content)?;

    let summary = Combiner::new(Config::for_dir(&scripts, temp_dir.path())).run(&StatusLog::new())?;
    let part = fs::read_to_string(temp_dir.path().join("combined-code/Scripts-main.cs"))?;

    // trailing newline counts as an extra line
    assert_eq!(count_lines(content), 2);
    assert!(part.contains("//  LINES: 2    MD5: "));
    assert_eq!(summary.parts[0].lines, 2);

    Ok(())
}

#[test]
fn test_invalid_folder_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let status = StatusLog::new();

    let err = Combiner::new(Config::for_dir(
        temp_dir.path().join("missing"),
        temp_dir.path(),
    ))
    .run(&status)
    .unwrap_err();

    assert!(matches!(err, CombineError::InvalidInput(_)));
    assert_eq!(status.last_message().as_deref(), Some("Invalid folder"));
    assert!(!temp_dir.path().join("combined-code").exists());
}

#[test]
fn test_no_input_files_leaves_output_untouched() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "readme.md", "# nothing to combine")?;
    let out = temp_dir.path().join("combined-code");
    write_file(&out, "Scripts-main.cs", "previous run")?;

    let status = StatusLog::new();
    let err = Combiner::new(Config::for_dir(&scripts, temp_dir.path()))
        .run(&status)
        .unwrap_err();

    assert!(matches!(err, CombineError::NoInputFiles(_)));
    assert_eq!(status.last_message().as_deref(), Some("No .cs files found"));
    assert_eq!(fs::read_to_string(out.join("Scripts-main.cs"))?, "previous run");

    Ok(())
}

#[test]
fn test_io_failure_is_reported() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "A.cs", "class A {}")?;
    // a directory where the part file must go makes the write fail
    fs::create_dir_all(temp_dir.path().join("combined-code/Scripts-main.cs"))?;

    let status = StatusLog::new();
    let err = Combiner::new(Config::for_dir(&scripts, temp_dir.path()))
        .run(&status)
        .unwrap_err();

    assert!(matches!(err, CombineError::Io(_)));
    assert!(!err.is_rejection());
    assert!(status.last_message().unwrap().starts_with("Error: "));
    assert!(status.revealed.borrow().is_none());

    Ok(())
}

#[test]
fn test_bom_is_not_copied_into_parts() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    fs::write(scripts.join("A.cs"), b"\xEF\xBB\xBFclass A {}")?;
    fs::write(scripts.join("Legacy.cs"), b"// caf\xe9\nclass Legacy {}")?;

    let summary = Combiner::new(Config::for_dir(&scripts, temp_dir.path())).run(&StatusLog::new())?;
    let main = fs::read_to_string(temp_dir.path().join("combined-code/Scripts-main.cs"))?;

    assert_eq!(summary.files, 2);
    assert!(!main.contains('\u{FEFF}'));
    assert!(main.contains(&format!("MD5: {}\n", fingerprint("class A {}"))));
    assert!(main.contains("// caf\u{FFFD}\nclass Legacy {}"));

    Ok(())
}

#[test]
fn test_glob_characters_in_folder_name() -> Result<()> {
    let temp_dir = tempdir()?;
    let scripts = temp_dir.path().join("Scripts[v2]");
    for i in 0..3 {
        write_file(&scripts, &format!("F{}.cs", i), &numbered_lines(30))?;
    }
    let out = temp_dir.path().join("combined-code");

    let config = Config {
        max_lines_per_part: 40,
        ..Config::for_dir(&scripts, temp_dir.path())
    };
    Combiner::new(config.clone()).run(&StatusLog::new())?;
    assert!(out.join("Scripts[v2]-main-3.cs").exists());

    for i in 1..3 {
        fs::remove_file(scripts.join(format!("F{}.cs", i)))?;
    }

    let summary = Combiner::new(config).run(&StatusLog::new())?;
    assert_eq!(summary.removed, 6);
    assert_eq!(
        output_files(&out),
        vec![
            "Scripts[v2]-main.cs",
            "Scripts[v2]-main.json",
            "Scripts[v2]-upload.zip"
        ]
    );

    Ok(())
}

#[test]
fn test_no_recurse_only_top_level() -> Result<()> {
    let (temp_dir, scripts) = setup_project()?;
    write_file(&scripts, "Top.cs", "class Top {}")?;
    write_file(&scripts, "Editor/Nested.cs", "class Nested {}")?;

    let config = Config {
        recurse: false,
        ..Config::for_dir(&scripts, temp_dir.path())
    };
    let summary = Combiner::new(config).run(&StatusLog::new())?;

    assert_eq!(summary.files, 1);
    assert_eq!(summary.parts.len(), 1);
    assert_eq!(summary.parts[0].category, Category::Main);

    Ok(())
}
