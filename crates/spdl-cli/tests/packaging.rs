//! Consistency of the Arch package recipe with the workspace.

const PKGBUILD: &str = include_str!("../../../packaging/PKGBUILD");

fn function_body(name: &str) -> &'static str {
    let start = PKGBUILD
        .find(&format!("{name}() {{"))
        .unwrap_or_else(|| panic!("{name}() missing"));
    let rest = &PKGBUILD[start..];
    &rest[..rest.find("\n}").unwrap()]
}

#[test]
fn pkgver_matches_workspace_version() {
    let pkgver = PKGBUILD
        .lines()
        .find_map(|line| line.strip_prefix("pkgver="))
        .unwrap();
    assert_eq!(pkgver, env!("CARGO_PKG_VERSION"));
}

#[test]
fn lockfile_exists_before_locked_fetch() {
    let prepare = function_body("prepare");
    let generate = prepare.find("cargo generate-lockfile").unwrap();
    let fetch = prepare.find("cargo fetch --locked").unwrap();
    assert!(generate < fetch);
    assert!(prepare.contains("[ ! -f Cargo.lock ]"));
}

#[test]
fn build_and_check_use_the_lockfile() {
    assert!(function_body("build").contains("cargo build --release --locked"));
    assert!(function_body("check").contains("cargo test --release --locked"));
}
