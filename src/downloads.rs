use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::albums::AlbumCatalog;
use crate::error::GalleryError;
use crate::gallery::escape_html;
use crate::manifest::{AlbumSummary, album_summary_or_fallback};

/// Average size of one photo, in MB.
const MB_PER_PHOTO: u64 = 2;

/// Sizes above this many MB are shown in GB.
const GB_THRESHOLD_MB: u64 = 1024;

/// Album key that stands for the complete collection.
pub const ALL_ALBUMS: &str = "all";

/// Saturates instead of overflowing on absurd counts.
pub fn estimate_size_mb(count: u64) -> u64 {
    count.saturating_mul(MB_PER_PHOTO)
}

pub fn format_size(mb: u64) -> String {
    if mb > GB_THRESHOLD_MB {
        format!("{:.2} GB", mb as f64 / 1024.0)
    } else {
        format!("{mb} MB")
    }
}

/// Human-readable byte count: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 GB`...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub details: String,
    pub size: String,
}

impl CollectionSummary {
    pub fn from_summary(summary: &AlbumSummary) -> Self {
        Self {
            details: format!("All {} photos from all albums", summary.total_images),
            size: format!("Size: {}", format_size(estimate_size_mb(summary.total_images))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumCard {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub count: u64,
    pub size: String,
}

impl AlbumCard {
    pub fn photos_label(&self) -> String {
        format!("{} photos", self.count)
    }
}

/// Downloads page for one load: the collection summary plus one card per
/// non-empty album, in album table order.
#[derive(Debug, Clone)]
pub struct DownloadsPage {
    pub summary: CollectionSummary,
    pub cards: Vec<AlbumCard>,
    pub catalog: AlbumCatalog,
}

impl DownloadsPage {
    pub fn build(summary: &AlbumSummary) -> Self {
        let catalog = AlbumCatalog::with_counts(summary);
        let cards = catalog
            .albums_with_photos()
            .map(|entry| AlbumCard {
                key: entry.meta.key,
                name: entry.meta.name,
                description: entry.meta.description,
                count: entry.count,
                size: format_size(estimate_size_mb(entry.count)),
            })
            .collect();
        Self {
            summary: CollectionSummary::from_summary(summary),
            cards,
            catalog,
        }
    }
}

/// Confirmation shown when a download is requested. Nothing is transferred.
pub fn download_album(catalog: &AlbumCatalog, key: &str) -> Result<String, GalleryError> {
    if key == ALL_ALBUMS {
        return Ok("Downloading complete collection...\n\nNote: In a production environment, \
                   this would download a ZIP file containing all photos."
            .to_string());
    }
    let entry = catalog.get(key)?;
    Ok(format!(
        "Downloading {} album...\n\nNote: In a production environment, this would download \
         a ZIP file containing {} photos.",
        entry.meta.name, entry.count
    ))
}

fn download_button(catalog: &AlbumCatalog, key: &str, id: Option<&str>) -> String {
    // Buttons only exist for keys the catalog knows.
    let message = download_album(catalog, key).unwrap_or_default();
    let id_attr = id.map(|id| format!(" id=\"{id}\"")).unwrap_or_default();
    format!(
        "<button class=\"btn btn-download\"{id_attr} data-album=\"{}\" data-message=\"{}\">Download</button>",
        escape_html(key),
        escape_html(&message)
    )
}

/// Build the full downloads HTML string.
pub fn render_downloads_html(page: &DownloadsPage) -> String {
    let mut cards_html = String::new();
    for card in &page.cards {
        cards_html.push_str(&format!(
            r#"    <div class="album-download-card" data-album="{key}">
      <div class="album-download-info">
        <h3 class="album-download-title">{name}</h3>
        <p class="album-download-description">{description}</p>
        <div class="album-download-meta"><span>{photos}</span><span>&bull;</span><span>{size}</span></div>
      </div>
      {button}
    </div>
"#,
            key = escape_html(card.key),
            name = escape_html(card.name),
            description = escape_html(card.description),
            photos = card.photos_label(),
            size = card.size,
            button = download_button(&page.catalog, card.key, None),
        ));
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Downloads</title>
<link rel="stylesheet" href="css/style.css">
</head>
<body>
<main>
<section class="complete-collection">
  <h2>Complete Collection</h2>
  <p id="completeCollectionDetails">{details}</p>
  <p id="completeCollectionSize">{size}</p>
  {all_button}
</section>
<section>
  <h2>Albums</h2>
  <div id="albumsList">
{cards_html}  </div>
</section>
</main>
<script>
document.addEventListener('click',e=>{{
  const btn=e.target.closest('.btn-download[data-album]');
  if(btn&&btn.dataset.message)alert(btn.dataset.message);
}});
</script>
</body>
</html>"##,
        details = escape_html(&page.summary.details),
        size = escape_html(&page.summary.size),
        all_button = download_button(&page.catalog, ALL_ALBUMS, Some("downloadAllBtn")),
    )
}

/// Build `downloads.html` in the site root.
pub fn run_downloads(site: &Path) -> Result<()> {
    let summary = album_summary_or_fallback(site);
    let page = DownloadsPage::build(&summary);
    let output_path = site.join("downloads.html");
    std::fs::write(&output_path, render_downloads_html(&page))
        .with_context(|| format!("Impossible d'écrire {}", output_path.display()))?;

    println!(
        "  {} {} albums téléchargeables · {} → {}",
        style("✔").green().bold(),
        style(page.cards.len()).green().bold(),
        page.summary.size,
        style(output_path.display()).white().bold()
    );
    Ok(())
}

/// Confirmation for a download request, `None` for unknown albums.
pub fn download_confirmation(site: &Path, key: &str) -> Option<String> {
    let catalog = AlbumCatalog::with_counts(&album_summary_or_fallback(site));
    download_album(&catalog, key).ok()
}

/// Print the download confirmation. Unknown albums are ignored without output.
pub fn run_download(site: &Path, key: &str) -> Result<()> {
    if let Some(message) = download_confirmation(site, key) {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn summary(total: u64, pairs: &[(&str, u64)]) -> AlbumSummary {
        AlbumSummary {
            total_images: total,
            albums: pairs
                .iter()
                .map(|(k, c)| (k.to_string(), *c))
                .collect::<IndexMap<_, _>>(),
        }
    }

    // --- sizes ---

    #[test]
    fn size_in_mb_up_to_threshold() {
        assert_eq!(format_size(estimate_size_mb(0)), "0 MB");
        assert_eq!(format_size(estimate_size_mb(10)), "20 MB");
        assert_eq!(format_size(estimate_size_mb(512)), "1024 MB");
    }

    #[test]
    fn size_in_gb_above_threshold() {
        assert_eq!(format_size(1025), "1.00 GB");
        assert_eq!(format_size(estimate_size_mb(513)), "1.00 GB");
        assert_eq!(format_size(estimate_size_mb(3260)), "6.37 GB");
        assert_eq!(format_size(estimate_size_mb(1886)), "3.68 GB");
        assert_eq!(format_size(estimate_size_mb(1374)), "2.68 GB");
    }

    #[test]
    fn file_size_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    // --- page ---

    #[test]
    fn end_to_end_small_collection() {
        let page = DownloadsPage::build(&summary(10, &[("traditional", 6), ("candid", 4)]));
        assert_eq!(page.summary.details, "All 10 photos from all albums");
        assert_eq!(page.summary.size, "Size: 20 MB");

        assert_eq!(page.cards.len(), 2);
        assert_eq!(page.cards[0].name, "Reception Images");
        assert_eq!(page.cards[0].photos_label(), "6 photos");
        assert_eq!(page.cards[0].size, "12 MB");
        assert_eq!(page.cards[1].name, "Marriage Images");
        assert_eq!(page.cards[1].photos_label(), "4 photos");
        assert_eq!(page.cards[1].size, "8 MB");
    }

    #[test]
    fn cards_follow_table_order_regardless_of_summary_order() {
        let page = DownloadsPage::build(&summary(
            9,
            &[("couple-portraits", 2), ("reception", 3), ("candid", 4), ("traditional", 0)],
        ));
        let keys: Vec<_> = page.cards.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["candid", "reception", "couple-portraits"]);
    }

    #[test]
    fn fallback_summary_page() {
        let page = DownloadsPage::build(&AlbumSummary::fallback());
        assert_eq!(page.summary.details, "All 3260 photos from all albums");
        assert_eq!(page.summary.size, "Size: 6.37 GB");
        assert_eq!(page.cards.len(), 2);
    }

    #[test]
    fn html_lists_cards_in_order() {
        let page = DownloadsPage::build(&summary(10, &[("candid", 4), ("traditional", 6)]));
        let html = render_downloads_html(&page);
        let reception = html.find("Reception Images").unwrap();
        let marriage = html.find("Marriage Images").unwrap();
        assert!(reception < marriage);
        assert!(html.contains("All 10 photos from all albums"));
        assert!(html.contains("Size: 20 MB"));
        assert!(html.contains("id=\"downloadAllBtn\" data-album=\"all\""));
        assert!(html.contains("data-album=\"candid\""));
        assert!(!html.contains("data-album=\"ceremony\""));
    }

    // --- download stub ---

    #[test]
    fn download_all_confirms() {
        let msg = download_album(&AlbumCatalog::default(), "all").unwrap();
        assert!(msg.starts_with("Downloading complete collection..."));
        assert!(msg.contains("all photos"));
    }

    #[test]
    fn download_known_album_names_album_and_count() {
        let catalog = AlbumCatalog::with_counts(&summary(10, &[("traditional", 6)]));
        let msg = download_album(&catalog, "traditional").unwrap();
        assert!(msg.starts_with("Downloading Reception Images album..."));
        assert!(msg.contains("containing 6 photos."));
    }

    #[test]
    fn download_unknown_album_is_error() {
        assert!(matches!(
            download_album(&AlbumCatalog::default(), "unknown-key"),
            Err(GalleryError::UnknownAlbumKey(_))
        ));
    }

    #[test]
    fn run_download_unknown_album_is_silent_success() {
        let dir = std::env::temp_dir().join(format!(
            "wedding_gallery_downloads_test_{}",
            std::process::id()
        ));
        assert_eq!(download_confirmation(&dir, "unknown-key"), None);
        assert!(run_download(&dir, "unknown-key").is_ok());
    }

    #[test]
    fn download_confirmation_for_known_keys() {
        let dir = std::env::temp_dir().join(format!(
            "wedding_gallery_downloads_confirm_test_{}",
            std::process::id()
        ));
        let all = download_confirmation(&dir, ALL_ALBUMS).unwrap();
        assert!(all.starts_with("Downloading complete collection..."));
        let traditional = download_confirmation(&dir, "traditional").unwrap();
        assert!(traditional.contains("containing 1886 photos."));
    }

    #[test]
    fn huge_total_saturates_instead_of_overflowing() {
        let summary: AlbumSummary =
            serde_json::from_str(r#"{"totalImages":18446744073709551615,"albums":{}}"#).unwrap();
        assert_eq!(summary.total_images, u64::MAX);
        assert_eq!(estimate_size_mb(summary.total_images), u64::MAX);

        let collection = CollectionSummary::from_summary(&summary);
        assert!(collection.size.starts_with("Size: "));
        assert!(collection.size.ends_with(" GB"));
    }
}
