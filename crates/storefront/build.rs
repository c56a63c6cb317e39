//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so it can be served with an immutable cache
//! lifetime: `static/css/main.css` is copied to
//! `static/css/derived/main.<hash>.css` and the hash is exported as
//! `CSS_HASH` for the `css_hash` template filter.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Number of hex characters of the SHA-256 kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"),
    );
    let css_dir = manifest_dir.join("static/css");
    let hash = fingerprint(&css_dir, "main.css");
    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Copy `name` into `derived/` under its content hash and return the hash.
///
/// A missing stylesheet yields an empty hash so a fresh checkout still builds.
fn fingerprint(css_dir: &Path, name: &str) -> String {
    let source = css_dir.join(name);
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            return String::new();
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest[..HASH_LEN].to_string();

    let derived_dir = css_dir.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    let stem = name.trim_end_matches(".css");
    fs::copy(&source, derived_dir.join(format!("{stem}.{hash}.css")))
        .expect("Failed to copy CSS to derived directory");

    hash
}
