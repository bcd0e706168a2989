//! End-to-end orchestration scenarios against a scripted toolchain.
//!
//! The fake gateway writes real object/executable files into a temp
//! project tree so the mtime-based staleness checks run against the
//! actual filesystem, while exit codes and dependency text are scripted.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use kiln_core::{
    BuildConfig, BuildFailure, BuildMode, Builder, Platform, ScanOutput, Toolchain, paths,
};

/// Scripted toolchain: records every call, produces makefile-rule text
/// from a per-source prerequisite table, and writes placeholder object
/// and executable files on success.
#[derive(Default)]
struct FakeToolchain {
    deps: HashMap<PathBuf, Vec<PathBuf>>,
    failing_scans: HashSet<PathBuf>,
    failing_compiles: HashSet<PathBuf>,
    link_fails: bool,

    scan_calls: RefCell<Vec<PathBuf>>,
    compile_calls: RefCell<Vec<PathBuf>>,
    link_calls: RefCell<usize>,
}

impl FakeToolchain {
    fn with_deps(mut self, source: &Path, deps: &[&Path]) -> Self {
        self.deps.insert(
            source.to_path_buf(),
            deps.iter().map(|d| d.to_path_buf()).collect(),
        );
        self
    }

    fn failing_scan(mut self, source: &Path) -> Self {
        self.failing_scans.insert(source.to_path_buf());
        self
    }

    fn failing_compile(mut self, source: &Path) -> Self {
        self.failing_compiles.insert(source.to_path_buf());
        self
    }

    fn failing_link(mut self) -> Self {
        self.link_fails = true;
        self
    }
}

impl Toolchain for FakeToolchain {
    fn scan(&self, source: &Path, _mode: BuildMode) -> io::Result<ScanOutput> {
        self.scan_calls.borrow_mut().push(source.to_path_buf());

        if self.failing_scans.contains(source) {
            return Ok(ScanOutput {
                success: false,
                stdout: String::new(),
            });
        }

        let mut rule = format!("out.o: {}", source.display());
        if let Some(deps) = self.deps.get(source) {
            for dep in deps {
                rule.push_str(&format!(" \\\n {}", dep.display()));
            }
        }
        rule.push('\n');

        Ok(ScanOutput {
            success: true,
            stdout: rule,
        })
    }

    fn compile(&self, source: &Path, object: &Path, _mode: BuildMode) -> io::Result<bool> {
        self.compile_calls.borrow_mut().push(source.to_path_buf());

        if self.failing_compiles.contains(source) {
            return Ok(false);
        }
        fs::write(object, b"object")?;
        Ok(true)
    }

    fn link(&self, executable: &Path, _objects: &[PathBuf], _mode: BuildMode) -> io::Result<bool> {
        *self.link_calls.borrow_mut() += 1;

        if self.link_fails {
            return Ok(false);
        }
        fs::write(executable, b"executable")?;
        Ok(true)
    }
}

fn config(root: &Path) -> BuildConfig {
    BuildConfig {
        project_name: "demo".to_string(),
        source_root: root.join("src"),
        include_root: root.join("include"),
        build_root: root.join("build"),
        source_extension: "c".to_string(),
        platform: Platform::Unix,
    }
}

/// Create a file with its mtime pinned well in the past, so files the
/// fake toolchain writes "now" are unambiguously newer.
fn write_old(path: &Path) {
    write_at(path, SystemTime::now() - Duration::from_secs(3_600));
}

fn write_at(path: &Path, mtime: SystemTime) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"content").unwrap();
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

fn set_mtime(path: &Path, mtime: SystemTime) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

#[test]
fn empty_source_tree_is_a_noop_success() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();

    let config = config(dir.path());
    let toolchain = FakeToolchain::default();
    let report = Builder::new(&config, &toolchain)
        .build(BuildMode::Release)
        .unwrap();

    assert!(report.success());
    assert!(!report.linked);
    assert!(toolchain.scan_calls.borrow().is_empty());
    assert!(toolchain.compile_calls.borrow().is_empty());
    assert_eq!(*toolchain.link_calls.borrow(), 0);
}

#[test]
fn fresh_build_compiles_everything_and_links_once() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("src/a.c");
    let b = dir.path().join("src/util/b.c");
    write_old(&a);
    write_old(&b);

    let config = config(dir.path());
    let toolchain = FakeToolchain::default();
    let report = Builder::new(&config, &toolchain)
        .build(BuildMode::Debug)
        .unwrap();

    assert!(report.success());
    assert!(report.linked);
    assert_eq!(report.compiled, vec![a, b]);
    assert_eq!(*toolchain.link_calls.borrow(), 1);
    // Missing objects never trigger a scan.
    assert!(toolchain.scan_calls.borrow().is_empty());
    assert!(paths::executable_path(&config, BuildMode::Debug).exists());
}

#[test]
fn up_to_date_build_compiles_and_links_nothing() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("src/a.c");
    let header = dir.path().join("include/common.h");
    write_old(&a);
    write_old(&header);

    let config = config(dir.path());
    let first = FakeToolchain::default().with_deps(&a, &[&header]);
    let report = Builder::new(&config, &first).build(BuildMode::Debug).unwrap();
    assert!(report.success());
    assert!(report.linked);

    let second = FakeToolchain::default().with_deps(&a, &[&header]);
    let report = Builder::new(&config, &second).build(BuildMode::Debug).unwrap();

    assert!(report.success());
    assert!(!report.linked);
    assert!(second.compile_calls.borrow().is_empty());
    assert_eq!(*second.link_calls.borrow(), 0);
    // The object exists and the source is older, so the scan ran once.
    assert_eq!(second.scan_calls.borrow().len(), 1);
}

#[test]
fn edited_shared_header_recompiles_both_and_relinks_once() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("src/a.c");
    let b = dir.path().join("src/b.c");
    let header = dir.path().join("include/common.h");
    write_old(&a);
    write_old(&b);
    write_old(&header);

    let config = config(dir.path());
    let first = FakeToolchain::default()
        .with_deps(&a, &[&header])
        .with_deps(&b, &[&header]);
    assert!(
        Builder::new(&config, &first)
            .build(BuildMode::Release)
            .unwrap()
            .success()
    );

    // Edit the header; keep the executable clearly older than whatever
    // the rebuild writes.
    set_mtime(&header, SystemTime::now() + Duration::from_secs(60));
    set_mtime(
        &paths::executable_path(&config, BuildMode::Release),
        SystemTime::now() - Duration::from_secs(60),
    );

    let second = FakeToolchain::default()
        .with_deps(&a, &[&header])
        .with_deps(&b, &[&header]);
    let report = Builder::new(&config, &second)
        .build(BuildMode::Release)
        .unwrap();

    assert!(report.success());
    assert!(report.linked);
    assert_eq!(report.compiled, vec![a, b]);
    assert_eq!(*second.link_calls.borrow(), 1);
}

#[test]
fn scan_failure_still_compiles_siblings_but_never_links() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("src/bad.c");
    let fresh = dir.path().join("src/fresh.c");
    write_old(&bad);
    write_old(&fresh);

    let config = config(dir.path());

    // Give bad.c an up-to-date object so evaluation reaches the scan.
    let bad_object = paths::object_path(&config, &bad, BuildMode::Debug);
    fs::create_dir_all(bad_object.parent().unwrap()).unwrap();
    fs::write(&bad_object, b"object").unwrap();

    let toolchain = FakeToolchain::default().failing_scan(&bad);
    let report = Builder::new(&config, &toolchain)
        .build(BuildMode::Debug)
        .unwrap();

    assert!(!report.success());
    assert_eq!(report.failures, vec![BuildFailure::Scan { source: bad }]);
    // The sibling with no object was still compiled.
    assert_eq!(report.compiled, vec![fresh]);
    assert_eq!(*toolchain.link_calls.borrow(), 0);
}

#[test]
fn compile_failure_still_compiles_siblings_but_never_links() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("src/broken.c");
    let fine = dir.path().join("src/fine.c");
    write_old(&broken);
    write_old(&fine);

    let config = config(dir.path());
    let toolchain = FakeToolchain::default().failing_compile(&broken);
    let report = Builder::new(&config, &toolchain)
        .build(BuildMode::Release)
        .unwrap();

    assert!(!report.success());
    assert_eq!(
        report.failures,
        vec![BuildFailure::Compile { source: broken }]
    );
    assert_eq!(report.compiled, vec![fine.clone()]);
    // Both were attempted despite the first one failing.
    assert_eq!(toolchain.compile_calls.borrow().len(), 2);
    assert_eq!(*toolchain.link_calls.borrow(), 0);
    assert!(!paths::executable_path(&config, BuildMode::Release).exists());
}

#[test]
fn link_failure_fails_the_build() {
    let dir = TempDir::new().unwrap();
    write_old(&dir.path().join("src/a.c"));

    let config = config(dir.path());
    let toolchain = FakeToolchain::default().failing_link();
    let report = Builder::new(&config, &toolchain)
        .build(BuildMode::Release)
        .unwrap();

    assert!(!report.success());
    assert!(!report.linked);
    assert_eq!(report.failures, vec![BuildFailure::Link]);
    assert_eq!(*toolchain.link_calls.borrow(), 1);
}

#[test]
fn clean_then_build_reconstructs_the_output_tree() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("src/nested/a.c");
    write_old(&a);

    let config = config(dir.path());
    let first = FakeToolchain::default();
    assert!(
        Builder::new(&config, &first)
            .build(BuildMode::Debug)
            .unwrap()
            .success()
    );

    // Clean is a plain directory-tree removal.
    fs::remove_dir_all(&config.build_root).unwrap();
    assert!(!config.build_root.exists());

    let second = FakeToolchain::default();
    let report = Builder::new(&config, &second).build(BuildMode::Debug).unwrap();

    assert!(report.success());
    assert!(report.linked);
    assert_eq!(report.compiled, vec![a.clone()]);
    assert!(paths::object_path(&config, &a, BuildMode::Debug).exists());
    assert!(paths::executable_path(&config, BuildMode::Debug).exists());
}
