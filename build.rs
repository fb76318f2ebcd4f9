use chrono::{SecondsFormat, Utc};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let manifest_dir =
        PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));

    let package_version = package_version(&manifest_dir.join("Cargo.toml"));
    let build_time = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let git_hash = git_output(&manifest_dir, &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());

    let generated = format!(
        "pub const PACKAGE_VERSION: &str = {:?};\npub const BUILD_TIME: &str = {:?};\npub const GIT_HASH: &str = {:?};\n",
        package_version, build_time, git_hash
    );
    fs::write(out_dir.join("build_info.rs"), generated).expect("build_info.rs is writable");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    watch_git_head(&manifest_dir.join(".git"));
}

fn package_version(cargo_toml: &Path) -> String {
    fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|contents| contents.parse::<toml::Table>().ok())
        .and_then(|manifest| {
            manifest
                .get("package")?
                .get("version")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Rerun when HEAD moves: a checkout rewrites `HEAD`, a commit on the
/// current branch only touches the branch ref and `logs/HEAD`.
fn watch_git_head(git_dir: &Path) {
    if !git_dir.is_dir() {
        return;
    }
    let head = git_dir.join("HEAD");
    let branch_ref = fs::read_to_string(&head)
        .ok()
        .and_then(|text| text.strip_prefix("ref:").map(|r| git_dir.join(r.trim())));

    let watched = [
        Some(head.clone()),
        Some(git_dir.join("logs").join("HEAD")),
        Some(git_dir.join("packed-refs")),
        branch_ref,
    ];
    // a missing path would make cargo rerun on every build
    for path in watched.into_iter().flatten().filter(|p| p.exists()) {
        println!("cargo:rerun-if-changed={}", path.display());
    }
}
