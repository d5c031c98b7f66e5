use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Copy the fixture bucket into a fresh temp dir so a test may add or
/// remove objects without affecting other tests.
pub(crate) fn fixture_bucket() -> TempDir {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("bucket");

    let dir = tempfile::tempdir().expect("failed to create bucket dir");
    copy_dir(&source, dir.path());
    dir
}

fn copy_dir(from: &Path, to: &Path) {
    for entry in fs::read_dir(from).expect("failed to read fixture bucket") {
        let entry = entry.expect("failed to read fixture entry");
        let target = to.join(entry.file_name());

        if entry.path().is_dir() {
            fs::create_dir_all(&target).expect("failed to create fixture dir");
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).expect("failed to copy fixture file");
        }
    }
}
