//! Bundled curtain images.
//!
//! The table is generated by `build.rs` from `static/images/curtains/`; each
//! file is copied under a content-hashed name so it can be cached forever.

use drape_core::ImageAssets;

include!(concat!(env!("OUT_DIR"), "/bundled_images.rs"));

/// Every bundled curtain image, keyed by file stem.
pub const BUNDLED: ImageAssets = ImageAssets::new(BUNDLED_IMAGES);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_images_are_bundled() {
        for width in [100, 150, 200, 250, 300] {
            let reference = format!("/src/assets/curtain-{width}cm.jpg");
            let asset = BUNDLED.resolve(&reference);
            assert!(asset.is_some(), "{reference} should resolve");
        }
    }

    #[test]
    fn test_urls_are_hashed_and_static() {
        for &(key, url) in BUNDLED_IMAGES {
            assert!(url.starts_with("/static/images/curtains/derived/"));
            assert!(url.contains(key));
        }
    }
}
