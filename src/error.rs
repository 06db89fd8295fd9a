use std::path::PathBuf;
use thiserror::Error;

/// Failures the pages know how to absorb.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Manifeste indisponible ({path}) : {reason}")]
    ManifestFetchFailed { path: PathBuf, reason: String },

    #[error("Album inconnu : {0}")]
    UnknownAlbumKey(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
