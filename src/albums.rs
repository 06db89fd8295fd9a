use crate::error::{GalleryError, Result};
use crate::manifest::AlbumSummary;

/// Static description of one album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumMeta {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Directory under `images/albums/`.
    pub folder: &'static str,
    pub expected_count: u64,
}

/// Album table, in display order.
pub const ALBUMS: &[AlbumMeta] = &[
    AlbumMeta {
        key: "traditional",
        name: "Reception Images",
        description: "Reception and celebration moments",
        folder: "traditional",
        expected_count: 1886,
    },
    AlbumMeta {
        key: "candid",
        name: "Marriage Images",
        description: "Marriage ceremony and special moments",
        folder: "candid",
        expected_count: 1374,
    },
    AlbumMeta {
        key: "ceremony",
        name: "Ceremony",
        description: "Our sacred vows and beautiful ceremony moments",
        folder: "ceremony",
        expected_count: 0,
    },
    AlbumMeta {
        key: "reception",
        name: "Reception",
        description: "Dancing, dinner, and celebration",
        folder: "reception",
        expected_count: 0,
    },
    AlbumMeta {
        key: "couple-portraits",
        name: "Couple Portraits",
        description: "Intimate moments together",
        folder: "couple-portraits",
        expected_count: 0,
    },
];

pub fn find_album(key: &str) -> Result<&'static AlbumMeta> {
    ALBUMS
        .iter()
        .find(|a| a.key == key)
        .ok_or_else(|| GalleryError::UnknownAlbumKey(key.to_string()))
}

/// One album with the photo count currently known for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub meta: &'static AlbumMeta,
    pub count: u64,
}

/// Per-page copy of [`ALBUMS`] whose counts can be refreshed from a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for AlbumCatalog {
    fn default() -> Self {
        Self {
            entries: ALBUMS
                .iter()
                .map(|meta| CatalogEntry {
                    meta,
                    count: meta.expected_count,
                })
                .collect(),
        }
    }
}

impl AlbumCatalog {
    /// Overlay the counts of `summary` onto the static defaults.
    /// Albums the summary doesn't mention keep their default count; summary
    /// keys absent from the table are dropped.
    pub fn with_counts(summary: &AlbumSummary) -> Self {
        let mut catalog = Self::default();
        for (key, count) in &summary.albums {
            if let Some(entry) = catalog.entries.iter_mut().find(|e| e.meta.key == key) {
                entry.count = *count;
            }
        }
        catalog
    }

    pub fn get(&self, key: &str) -> Result<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.meta.key == key)
            .ok_or_else(|| GalleryError::UnknownAlbumKey(key.to_string()))
    }

    /// Entries with at least one photo, in table order.
    pub fn albums_with_photos(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn summary(pairs: &[(&str, u64)]) -> AlbumSummary {
        AlbumSummary {
            total_images: pairs.iter().map(|(_, c)| c).sum(),
            albums: pairs
                .iter()
                .map(|(k, c)| (k.to_string(), *c))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn table_keys_are_unique_and_match_folders() {
        for (i, a) in ALBUMS.iter().enumerate() {
            assert_eq!(a.key, a.folder);
            assert!(ALBUMS[i + 1..].iter().all(|b| b.key != a.key));
        }
    }

    #[test]
    fn find_album_known_key() {
        let album = find_album("candid").unwrap();
        assert_eq!(album.name, "Marriage Images");
        assert_eq!(album.expected_count, 1374);
    }

    #[test]
    fn find_album_unknown_key_errors() {
        assert!(matches!(
            find_album("honeymoon"),
            Err(GalleryError::UnknownAlbumKey(k)) if k == "honeymoon"
        ));
    }

    #[test]
    fn default_catalog_uses_expected_counts() {
        let catalog = AlbumCatalog::default();
        let keys: Vec<_> = catalog.albums_with_photos().map(|e| e.meta.key).collect();
        assert_eq!(keys, vec!["traditional", "candid"]);
    }

    #[test]
    fn with_counts_overrides_known_keys_only() {
        let catalog = AlbumCatalog::with_counts(&summary(&[
            ("ceremony", 12),
            ("unknown", 99),
            ("traditional", 3),
        ]));
        assert_eq!(catalog.get("ceremony").unwrap().count, 12);
        assert_eq!(catalog.get("traditional").unwrap().count, 3);
        // Not mentioned: keeps default
        assert_eq!(catalog.get("candid").unwrap().count, 1374);
        assert!(catalog.get("unknown").is_err());
    }

    #[test]
    fn albums_with_photos_follow_table_order_not_summary_order() {
        let catalog = AlbumCatalog::with_counts(&summary(&[
            ("couple-portraits", 5),
            ("candid", 4),
            ("traditional", 0),
            ("ceremony", 1),
        ]));
        let keys: Vec<_> = catalog.albums_with_photos().map(|e| e.meta.key).collect();
        assert_eq!(keys, vec!["candid", "ceremony", "couple-portraits"]);
    }
}
