use std::fs;
use std::path::Path;

use tempfile::TempDir;

use dotkit::linker::{FolderMapping, Linker};

const MAPPING: &str = r#"{
  "zsh": ["zshrc", "zprofile"],
  "git": ["gitconfig"]
}"#;

struct Fixture {
  repo: TempDir,
  home: TempDir
}

impl Fixture {
  fn new() -> Self {
    let repo = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    for (folder, file) in [("zsh", "zshrc"), ("zsh", "zprofile"), ("git", "gitconfig")] {
      let dir = repo.path().join(folder);
      fs::create_dir_all(&dir).unwrap();
      fs::write(dir.join(file), format!("# {file}\n")).unwrap();
    }

    Self { repo, home }
  }

  fn linker(&self) -> Linker {
    Linker::new(self.repo.path().to_path_buf(), self.home.path().to_path_buf())
  }

  fn assert_linked(&self, folder: &str, file: &str) {
    let dest = self.home.path().join(format!(".{file}"));
    let target = fs::read_link(&dest).unwrap_or_else(|_| panic!("{} is not a symlink", dest.display()));
    assert_eq!(target, self.repo.path().join(folder).join(file));
  }
}

fn link_all(fixture: &Fixture) {
  let mapping = FolderMapping::from_json(MAPPING).unwrap();
  fixture.linker().link_all(&mapping).unwrap();
}

#[test]
fn test_links_every_declared_file() {
  let fixture = Fixture::new();
  link_all(&fixture);

  fixture.assert_linked("zsh", "zshrc");
  fixture.assert_linked("zsh", "zprofile");
  fixture.assert_linked("git", "gitconfig");
}

#[test]
fn test_rerun_is_idempotent() {
  let fixture = Fixture::new();
  link_all(&fixture);
  link_all(&fixture);

  fixture.assert_linked("zsh", "zshrc");
  fixture.assert_linked("zsh", "zprofile");
  fixture.assert_linked("git", "gitconfig");
}

#[test]
fn test_replaces_preexisting_regular_file() {
  let fixture = Fixture::new();
  fs::write(fixture.home.path().join(".zshrc"), "old contents").unwrap();

  link_all(&fixture);

  fixture.assert_linked("zsh", "zshrc");
}

#[test]
fn test_replaces_stale_symlink() {
  let fixture = Fixture::new();
  std::os::unix::fs::symlink("/nonexistent/zshrc", fixture.home.path().join(".zshrc")).unwrap();

  link_all(&fixture);

  fixture.assert_linked("zsh", "zshrc");
}

#[test]
fn test_load_reads_mapping_from_disk() {
  let fixture = Fixture::new();
  let mapping_path = fixture.repo.path().join("folders.json");
  fs::write(&mapping_path, MAPPING).unwrap();

  let mapping = FolderMapping::load(&mapping_path).unwrap();
  assert_eq!(mapping.len(), 2);

  fixture.linker().link_all(&mapping).unwrap();
  fixture.assert_linked("git", "gitconfig");
}

#[test]
fn test_load_fails_on_missing_mapping() {
  assert!(FolderMapping::load(Path::new("/nonexistent/folders.json")).is_err());
}

#[test]
fn test_failed_run_surfaces_error_and_rerun_converges() {
  // Symlink creation fails on the destination side when the parent
  // directory is absent. There is no rollback; a rerun over a good home
  // directory converges.
  let fixture = Fixture::new();
  let mapping = FolderMapping::from_json(
    r#"{
      "zsh": ["zshrc"],
      "git": ["gitconfig"]
    }"#
  )
  .unwrap();

  let linker = Linker::new(
    fixture.repo.path().to_path_buf(),
    fixture.home.path().join("missing-subdir")
  );

  assert!(linker.link_all(&mapping).is_err());

  // A fresh linker over the real home still converges.
  fixture.linker().link_all(&mapping).unwrap();
  fixture.assert_linked("zsh", "zshrc");
  fixture.assert_linked("git", "gitconfig");
}
