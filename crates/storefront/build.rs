//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and curtain preview
//! images) to enable immutable CDN caching, and emits the constant image
//! table the configurator resolves catalog image references through.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Image extensions bundled into the asset table.
const IMAGE_EXTENSIONS: &[&str] = &["svg", "jpg", "jpeg", "png", "webp", "avif"];

fn main() {
    hash_css();
    bundle_images();
}

/// First 8 hex chars of the SHA-256 of `content`.
fn short_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let hash = format!("{:x}", hasher.finalize());
    hash[..8].to_string()
}

/// Hash main.css and copy to derived directory with hash in filename.
///
/// Sets `CSS_HASH` environment variable for use with `env!("CSS_HASH")`.
fn hash_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    // Tell Cargo to rerun if main.css changes
    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            // CSS might not exist yet during initial build
            println!("cargo:warning=Could not read main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    let short_hash = short_hash(&content);

    // Set environment variable for compile-time access
    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");

    let derived_path = derived_dir.join(format!("main.{short_hash}.css"));
    fs::copy(&css_path, &derived_path).expect("Failed to copy CSS to derived directory");
}

/// Hash every curtain image, copy it to the derived directory, and write
/// `$OUT_DIR/bundled_images.rs` with a `(key, url)` table sorted by key.
fn bundle_images() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR must be set by Cargo");
    let images_dir = Path::new(&manifest_dir).join("static/images/curtains");
    let derived_dir = images_dir.join("derived");

    println!("cargo:rerun-if-changed={}", images_dir.display());

    let mut entries: Vec<(String, String)> = Vec::new();

    match fs::read_dir(&images_dir) {
        Ok(dir) => {
            fs::create_dir_all(&derived_dir).expect("Failed to create derived image directory");

            for entry in dir.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                    continue;
                };
                if !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                let content = fs::read(&path).expect("Failed to read bundled image");
                let hash = short_hash(&content);
                let file_name = format!("{stem}.{hash}.{ext}");
                // Hashed names never change content, so skip existing copies
                // (rewriting them would retrigger this script)
                let derived_path = derived_dir.join(&file_name);
                if !derived_path.exists() {
                    fs::copy(&path, &derived_path)
                        .expect("Failed to copy image to derived directory");
                }

                entries.push((
                    stem.to_string(),
                    format!("/static/images/curtains/derived/{file_name}"),
                ));
            }
        }
        Err(e) => {
            println!("cargo:warning=Could not read curtain images: {e}");
        }
    }

    entries.sort();

    let mut generated = String::from(
        "/// Bundled curtain images as `(key, url)`, generated by build.rs.\n\
         pub const BUNDLED_IMAGES: &[(&str, &str)] = &[\n",
    );
    for (key, url) in &entries {
        writeln!(generated, "    ({key:?}, {url:?}),").expect("String write cannot fail");
    }
    generated.push_str("];\n");

    fs::write(Path::new(&out_dir).join("bundled_images.rs"), generated)
        .expect("Failed to write bundled image table");
}
