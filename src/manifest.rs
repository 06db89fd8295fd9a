use console::style;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{GalleryError, Result};

/// Gallery manifest, relative to the site root.
pub const GALLERY_MANIFEST: &str = "images/image-manifest.json";

/// Downloads summary, relative to the site root.
pub const ALBUM_SUMMARY: &str = "images/album-summary.json";

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct AlbumImages {
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}

/// Which image files exist per album. Keys keep the order of the JSON document.
/// A `null` album stays in the map as `None` and contributes no images.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct GalleryManifest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub albums: IndexMap<String, Option<AlbumImages>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Photo counts per album, as consumed by the downloads page.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct AlbumSummary {
    #[serde(rename = "totalImages")]
    pub total_images: u64,
    #[serde(default)]
    pub albums: IndexMap<String, u64>,
}

impl AlbumSummary {
    /// Counts used when the summary file cannot be read.
    pub fn fallback() -> Self {
        let albums = [
            ("traditional", 1886),
            ("candid", 1374),
            ("ceremony", 0),
            ("reception", 0),
            ("couple-portraits", 0),
        ]
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect();
        Self {
            total_images: 3260,
            albums,
        }
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(site: &Path, rel: &str) -> Result<T> {
    let path = site.join(rel);
    let fail = |reason: String| GalleryError::ManifestFetchFailed {
        path: path.clone(),
        reason,
    };
    let data = std::fs::read_to_string(&path).map_err(|e| fail(e.to_string()))?;
    serde_json::from_str(&data).map_err(|e| fail(e.to_string()))
}

pub fn load_gallery_manifest(site: &Path) -> Result<GalleryManifest> {
    load_json(site, GALLERY_MANIFEST)
}

pub fn load_album_summary(site: &Path) -> Result<AlbumSummary> {
    load_json(site, ALBUM_SUMMARY)
}

fn warn(err: &GalleryError) {
    eprintln!("  {} {err}", style("!").yellow().bold());
}

/// Gallery policy: an unavailable manifest just means empty grids.
pub fn gallery_manifest_or_none(site: &Path) -> Option<GalleryManifest> {
    load_gallery_manifest(site).inspect_err(warn).ok()
}

/// Downloads policy: an unavailable summary is replaced by [`AlbumSummary::fallback`].
pub fn album_summary_or_fallback(site: &Path) -> AlbumSummary {
    load_album_summary(site)
        .inspect_err(warn)
        .unwrap_or_else(|_| AlbumSummary::fallback())
}
