use std::cmp::Ordering;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use infer::MatcherType;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const PRESENTATION_MIME_TYPES: [&str; 2] = [
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Public URL prefix of extracted images.
pub const IMAGES_URL_PREFIX: &str = "/uploads/images";

const MEDIA_DIR: &str = "ppt/media";

/// Unpacked media may be at most this many times the upload limit.
const UNPACKED_TO_UPLOAD_RATIO: u64 = 4;

/// Rejects anything that does not declare a PowerPoint MIME type.
pub fn admit_content_type(content_type: Option<&str>) -> Result<()> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence {
        Some(ct) if PRESENTATION_MIME_TYPES.contains(&ct.as_str()) => Ok(()),
        _ => Err(Error::BadRequest(
            "Only PowerPoint files are allowed".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub file_name: String,
    pub url: String,
    pub path: PathBuf,
}

/// Images written by one extraction; removed again on drop unless kept.
#[derive(Debug)]
pub struct WrittenImages {
    images: Vec<ExtractedImage>,
    keep: bool,
}

impl WrittenImages {
    fn new() -> Self {
        Self {
            images: Vec::new(),
            keep: false,
        }
    }

    pub fn images(&self) -> &[ExtractedImage] {
        &self.images
    }

    pub fn urls(&self) -> Vec<String> {
        self.images.iter().map(|img| img.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Makes the written files permanent.
    pub fn keep(mut self) -> Vec<ExtractedImage> {
        self.keep = true;
        std::mem::take(&mut self.images)
    }
}

impl Drop for WrittenImages {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for image in &self.images {
            if let Err(e) = fs::remove_file(&image.path) {
                tracing::warn!(path = %image.path.display(), error = %e, "failed to remove extracted image");
            }
        }
    }
}

fn corrupted() -> Error {
    Error::Extraction("Invalid or corrupted PowerPoint file".to_string())
}

fn too_large() -> Error {
    Error::Extraction("PowerPoint media is too large to extract".to_string())
}

#[derive(Clone)]
pub struct ExtractionService {
    uploads_dir: PathBuf,
    max_unpacked_bytes: u64,
}

impl ExtractionService {
    pub fn new(uploads_dir: impl Into<PathBuf>, max_upload_bytes: usize) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            max_unpacked_bytes: (max_upload_bytes as u64).saturating_mul(UNPACKED_TO_UPLOAD_RATIO),
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.uploads_dir.join("images")
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.uploads_dir.join("tmp")
    }

    /// Extracts images from an uploaded archive on the blocking pool.
    pub async fn extract(&self, archive: Bytes) -> Result<WrittenImages> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.extract_bytes(&archive)).await?
    }

    pub fn extract_bytes(&self, archive: &[u8]) -> Result<WrittenImages> {
        let scratch_root = self.scratch_root();
        fs::create_dir_all(&scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix("ppt-")
            .tempdir_in(&scratch_root)?;

        let archive_path = scratch.path().join("upload.pptx");
        let mut file = fs::File::create(&archive_path)?;
        file.write_all(archive)?;
        file.sync_all()?;
        drop(file);

        self.extract_from_path(&archive_path)
    }

    /// Unpacks the `ppt/media` entries of `archive_path` into a scratch directory and copies
    /// every embedded image into the public images directory under a fresh name.
    pub fn extract_from_path(&self, archive_path: &Path) -> Result<WrittenImages> {
        let scratch_root = self.scratch_root();
        fs::create_dir_all(&scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix("unpacked-")
            .tempdir_in(&scratch_root)?;

        let file = fs::File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            tracing::warn!(error = %e, "uploaded presentation is not a readable archive");
            corrupted()
        })?;

        let media = self.unpack_media(&mut archive, scratch.path())?;

        let images_dir = self.images_dir();
        fs::create_dir_all(&images_dir)?;

        let mut written = WrittenImages::new();
        for entry in media {
            let data = fs::read(&entry)?;
            let Some(kind) = infer::get(&data) else {
                tracing::debug!(entry = %entry.display(), "skipping media entry of unknown type");
                continue;
            };
            if kind.matcher_type() != MatcherType::Image {
                tracing::debug!(entry = %entry.display(), mime = kind.mime_type(), "skipping non-image media entry");
                continue;
            }

            let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
            let path = images_dir.join(&file_name);
            fs::write(&path, &data)?;
            written.images.push(ExtractedImage {
                url: format!("{}/{}", IMAGES_URL_PREFIX, file_name),
                file_name,
                path,
            });
        }

        if written.is_empty() {
            return Err(Error::Extraction(
                "No images found in the PowerPoint file".to_string(),
            ));
        }

        tracing::info!(count = written.len(), "extracted images from presentation");
        Ok(written)
    }

    /// Writes the media entries to `dest` in natural name order, enforcing the unpacked size bound.
    fn unpack_media<R>(&self, archive: &mut zip::ZipArchive<R>, dest: &Path) -> Result<Vec<PathBuf>>
    where
        R: Read + io::Seek,
    {
        let limit = self.max_unpacked_bytes;
        let mut total: u64 = 0;
        let mut files = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                tracing::warn!(error = %e, index, "unreadable presentation archive entry");
                corrupted()
            })?;
            if entry.is_dir() {
                continue;
            }
            let Some(name) = entry.enclosed_name().and_then(media_file_name) else {
                continue;
            };

            if entry.size() > limit || total.saturating_add(entry.size()) > limit {
                tracing::warn!(entry = %name, size = entry.size(), limit, "presentation media exceeds the unpacked size bound");
                return Err(too_large());
            }

            let path = dest.join(&name);
            let mut out = fs::File::create(&path)?;
            let copied = io::copy(&mut (&mut entry).take(limit - total + 1), &mut out).map_err(|e| {
                tracing::warn!(entry = %name, error = %e, "failed to unpack presentation media");
                corrupted()
            })?;
            total += copied;
            if total > limit {
                tracing::warn!(entry = %name, limit, "presentation media exceeds the unpacked size bound");
                return Err(too_large());
            }
            files.push((name, path));
        }

        files.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}

/// File name of an entry stored directly under `ppt/media`.
fn media_file_name(path: &Path) -> Option<String> {
    if path.parent() != Some(Path::new(MEDIA_DIR)) {
        return None;
    }
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Orders names so that embedded numbers compare by value (`image2` < `image10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_number(&mut a);
                let right = take_number(&mut b);
                let ord = left
                    .trim_start_matches('0')
                    .len()
                    .cmp(&right.trim_start_matches('0').len())
                    .then_with(|| left.trim_start_matches('0').cmp(right.trim_start_matches('0')))
                    .then_with(|| left.len().cmp(&right.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
