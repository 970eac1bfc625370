use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog::Resolution;

use crate::tileref::TileId;
use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://prd-tnm.s3.amazonaws.com/StagedProducts/Elevation";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Downloads smaller than this are error pages, not tile archives.
const MIN_ARCHIVE_SIZE: usize = 1024;

/// Remote source of elevation tile archives.
///
/// One network connection per tile, opened and closed per fetch; no retries.
/// A failed fetch aborts the remaining batch, re-running skips tiles whose
/// raster is already extracted.
pub trait TileSource {
    /// Acquire the tile's archive into the staging directory and extract its
    /// raster, returning the local raster path.
    fn fetch(&self, resolution: Resolution, id: TileId, staging_dir: &Path) -> Result<PathBuf>;
}

/// Local raster path a tile extracts to; the mosaic stage consumes these.
pub fn staged_raster_path(staging_dir: &Path, resolution: Resolution, id: TileId) -> PathBuf {
    staging_dir.join(resolution.code()).join(format!("{id}.tif"))
}

fn staged_archive_path(staging_dir: &Path, resolution: Resolution, id: TileId) -> PathBuf {
    staging_dir.join(resolution.code()).join(format!("{id}.zip"))
}

/// HTTP implementation over the staged products bucket.
pub struct HttpTileSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTileSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|err| Error::Download {
                url: base_url.to_string(),
                reason: format!("failed to create HTTP client: {err}"),
            })?;

        Ok(HttpTileSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The archive naming scheme of the staged products tree, in one place.
    pub fn archive_url(&self, resolution: Resolution, id: TileId) -> String {
        let code = resolution.code();
        format!("{}/ned{code}/{id}/ned{code}_{id}.zip", self.base_url)
    }

    fn download(&self, url: &str, archive: &Path) -> Result {
        let response = self.client.get(url).send().map_err(|err| Error::Download {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(Error::Download {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes().map_err(|err| Error::Download {
            url: url.to_string(),
            reason: format!("failed to read response body: {err}"),
        })?;

        if bytes.len() < MIN_ARCHIVE_SIZE {
            return Err(Error::Download {
                url: url.to_string(),
                reason: format!("response too small ({} bytes), likely an error page", bytes.len()),
            });
        }

        let mut file = fs::File::create(archive)?;
        file.write_all(&bytes)?;

        log::debug!("Downloaded {} bytes to {}", bytes.len(), archive.display());
        Ok(())
    }
}

impl TileSource for HttpTileSource {
    fn fetch(&self, resolution: Resolution, id: TileId, staging_dir: &Path) -> Result<PathBuf> {
        let raster = staged_raster_path(staging_dir, resolution, id);
        if raster.exists() {
            log::debug!("Tile {id} already extracted, skipping download");
            return Ok(raster);
        }

        if let Some(parent) = raster.parent() {
            fs::create_dir_all(parent)?;
        }

        let archive = staged_archive_path(staging_dir, resolution, id);
        let url = self.archive_url(resolution, id);
        log::info!("Fetching tile {id} from {url}");
        self.download(&url, &archive)?;

        extract_raster(&archive, &raster)?;

        Ok(raster)
    }
}

/// Extract the raster member of a tile archive to `dest`.
pub fn extract_raster(archive_path: &Path, dest: &Path) -> Result {
    let extraction_error = |reason: String| Error::Extraction {
        archive: archive_path.display().to_string(),
        reason,
    };

    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| extraction_error(format!("not a zip archive: {err}")))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| extraction_error(format!("failed to read entry {index}: {err}")))?;

        if entry.name().to_ascii_lowercase().ends_with(".tif") {
            log::debug!("Extracting {} -> {}", entry.name(), dest.display());
            let mut out = fs::File::create(dest)?;
            std::io::copy(&mut entry, &mut out)?;
            return Ok(());
        }
    }

    Err(extraction_error("no raster member found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) -> Result {
        let zip_error = |err: zip::result::ZipError| Error::Extraction {
            archive: path.display().to_string(),
            reason: err.to_string(),
        };

        let file = fs::File::create(path)?;
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(name.to_string(), options).map_err(zip_error)?;
            writer.write_all(data)?;
        }
        writer.finish().map_err(zip_error)?;

        Ok(())
    }

    #[test]
    fn staged_paths_per_resolution_and_cell() -> Result {
        let id = TileId::new(34, -84)?;
        assert_eq!(
            staged_raster_path(Path::new("/stage"), Resolution::ArcNinth, id),
            Path::new("/stage/09d/n34w084.tif")
        );
        assert_eq!(
            staged_archive_path(Path::new("/stage"), Resolution::ArcNinth, id),
            Path::new("/stage/09d/n34w084.zip")
        );
        Ok(())
    }

    #[test]
    fn archive_url_follows_bucket_layout() -> Result {
        let source = HttpTileSource::with_base_url("https://example.com/Elevation/")?;
        assert_eq!(
            source.archive_url(Resolution::ArcNinth, TileId::new(35, -83)?),
            "https://example.com/Elevation/ned09d/n35w083/ned09d_n35w083.zip"
        );
        Ok(())
    }

    #[test]
    fn extracts_the_raster_member() -> Result {
        let dir = tempfile::tempdir()?;
        let archive_path = dir.path().join("n34w084.zip");
        write_archive(
            &archive_path,
            &[("meta/readme.txt", b"metadata"), ("n34w084.tif", b"raster bytes")],
        )?;

        let dest = dir.path().join("n34w084.tif");
        extract_raster(&archive_path, &dest)?;
        assert_eq!(fs::read(&dest)?, b"raster bytes");
        Ok(())
    }

    #[test]
    fn extraction_fails_without_raster_member() -> Result {
        let dir = tempfile::tempdir()?;
        let archive_path = dir.path().join("empty.zip");
        write_archive(&archive_path, &[("readme.txt", b"nothing here")])?;

        let dest = dir.path().join("out.tif");
        assert!(matches!(
            extract_raster(&archive_path, &dest),
            Err(Error::Extraction { .. })
        ));
        Ok(())
    }
}
