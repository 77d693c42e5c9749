//! Image thumbnail producer
//!
//! Decodes a source image, crops it to fill the requested box around the
//! centre, and writes a JPEG. The output is written to a temporary file in
//! the destination directory and renamed into place, so readers only ever
//! see the previous complete file or the new complete file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, ImageReader};

use crate::domain::entities::ThumbnailOptions;
use crate::producers::ProductionError;

/// Produces JPEG thumbnails on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailProducer;

impl ThumbnailProducer {
    pub fn new() -> Self {
        Self
    }

    /// Render `source` into a `width`×`height` JPEG at `dest`, replacing any
    /// existing file there. Returns `dest` on success.
    pub async fn generate(
        &self,
        source: &Path,
        dest: &Path,
        options: &ThumbnailOptions,
    ) -> Result<PathBuf, ProductionError> {
        // create_dir_all succeeds when a concurrent caller created it first
        tokio::fs::create_dir_all(parent_dir(dest))
            .await
            .map_err(ProductionError::Write)?;

        let source_owned = source.to_path_buf();
        let dest_owned = dest.to_path_buf();
        let options = *options;

        tokio::task::spawn_blocking(move || render(&source_owned, &dest_owned, &options))
            .await
            .map_err(|e| ProductionError::TaskAborted(e.to_string()))??;

        tracing::debug!(
            source = %source.display(),
            dest = %dest.display(),
            width = options.width,
            height = options.height,
            "Thumbnail written"
        );

        Ok(dest.to_path_buf())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn render(source: &Path, dest: &Path, options: &ThumbnailOptions) -> Result<(), ProductionError> {
    let image = ImageReader::open(source)
        .map_err(ProductionError::SourceUnreadable)?
        .with_guessed_format()
        .map_err(ProductionError::SourceUnreadable)?
        .decode()
        .map_err(ProductionError::Decode)?;

    let thumbnail = image
        .resize_to_fill(options.width, options.height, FilterType::Lanczos3)
        .to_rgb8();

    let mut staged = tempfile::Builder::new()
        .prefix(".thumb-")
        .suffix(".tmp")
        .tempfile_in(parent_dir(dest))
        .map_err(ProductionError::Write)?;

    write_jpeg(staged.as_file_mut(), &thumbnail, options.quality)?;

    // Dropping a failed persist removes the staged file
    staged
        .persist(dest)
        .map_err(|e| ProductionError::Write(e.error))?;

    Ok(())
}

fn write_jpeg(file: &mut File, thumbnail: &image::RgbImage, quality: u8) -> Result<(), ProductionError> {
    let mut writer = BufWriter::new(&mut *file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(thumbnail)
        .map_err(ProductionError::Encode)?;
    writer.flush().map_err(ProductionError::Write)?;
    drop(writer);

    file.sync_all().map_err(ProductionError::Write)
}
