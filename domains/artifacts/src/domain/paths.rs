//! Thumbnail path derivation

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory, beside the source, that holds derived thumbnails
pub const THUMBNAIL_DIR: &str = "thumbnails";

/// Appended to the source base name
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

/// Thumbnails are always JPEG
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// Map a primary asset locator to its thumbnail locator.
///
/// `dir/base.ext` becomes `dir/thumbnails/base_thumb.jpg` whatever `ext` was.
/// Pure and total; touches no filesystem.
pub fn derive_thumbnail_path(original: &Path) -> PathBuf {
    let directory = original.parent().unwrap_or_else(|| Path::new(""));
    let base = original.file_stem().unwrap_or_default();

    let mut file_name = OsString::from(base);
    file_name.push(THUMBNAIL_SUFFIX);
    file_name.push(".");
    file_name.push(THUMBNAIL_EXTENSION);

    directory.join(THUMBNAIL_DIR).join(file_name)
}
