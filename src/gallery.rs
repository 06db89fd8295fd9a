use anyhow::{Context, Result};
use console::style;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::albums::find_album;
use crate::lightbox::Lightbox;
use crate::manifest::{GalleryManifest, gallery_manifest_or_none};

pub const FEATURED_ALBUM: &str = "featured";

pub const LOADING_PLACEHOLDER: &str = "Loading all wedding photos...";

/// One navigable image.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageEntry {
    pub path: String,
    pub album: String,
}

/// Asset path of `file` in `album`. Albums outside the table use their key as folder.
pub fn album_image_path(album: &str, file: &str) -> String {
    let folder = find_album(album).map_or(album, |meta| meta.folder);
    format!("images/albums/{folder}/{file}")
}

/// The card grids a lightbox can be opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    Featured,
    AllImages,
}

/// Featured strip in manifest order, or `None` when the album is absent or empty.
pub fn featured_sequence(manifest: &GalleryManifest) -> Option<Vec<ImageEntry>> {
    let featured = manifest.albums.get(FEATURED_ALBUM)?.as_ref()?;
    if featured.images.is_empty() {
        return None;
    }
    Some(
        featured
            .images
            .iter()
            .map(|file| ImageEntry {
                path: album_image_path(FEATURED_ALBUM, file),
                album: FEATURED_ALBUM.to_string(),
            })
            .collect(),
    )
}

/// Every image of every album, concatenated in manifest order.
/// The featured album is included like any other; `null` albums are skipped.
pub fn collect_all_images(manifest: &GalleryManifest) -> Vec<ImageEntry> {
    manifest
        .albums
        .iter()
        .filter_map(|(album, entry)| entry.as_ref().map(|entry| (album, entry)))
        .flat_map(|(album, entry)| {
            entry.images.iter().map(move |file| ImageEntry {
                path: album_image_path(album, file),
                album: album.clone(),
            })
        })
        .collect()
}

/// Uniform Fisher-Yates permutation, in place.
pub fn shuffle_images<R: Rng + ?Sized>(images: &mut [ImageEntry], rng: &mut R) {
    images.shuffle(rng);
}

/// Everything the gallery page shows for one load.
#[derive(Debug, Clone)]
pub struct GalleryPage {
    pub featured: Option<Arc<[ImageEntry]>>,
    pub all_images: Arc<[ImageEntry]>,
}

impl GalleryPage {
    pub fn build<R: Rng + ?Sized>(manifest: Option<&GalleryManifest>, rng: &mut R) -> Self {
        let Some(manifest) = manifest else {
            return Self {
                featured: None,
                all_images: Vec::<ImageEntry>::new().into(),
            };
        };
        let mut all = collect_all_images(manifest);
        shuffle_images(&mut all, rng);
        Self {
            featured: featured_sequence(manifest).map(Arc::<[ImageEntry]>::from),
            all_images: Arc::from(all),
        }
    }

    pub fn sequence(&self, grid: Grid) -> Option<&Arc<[ImageEntry]>> {
        match grid {
            Grid::Featured => self.featured.as_ref(),
            Grid::AllImages => Some(&self.all_images),
        }
    }

    /// Card click: bind the lightbox to the grid the card belongs to.
    /// Returns `false` if that grid has no card at `index`.
    pub fn open_card(&self, grid: Grid, index: usize, lightbox: &mut Lightbox) -> bool {
        match self.sequence(grid) {
            Some(seq) if index < seq.len() => {
                lightbox.open(Arc::clone(seq), index);
                true
            }
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct ScriptSequences<'a> {
    featured: Vec<&'a str>,
    all: Vec<&'a str>,
}

/// Serialize for inline `<script>` use.
pub fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Sérialisation JSON impossible")?;
    Ok(json.replace("</", "<\\/"))
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build the full gallery HTML string.
pub fn render_gallery_html(page: &GalleryPage) -> Result<String> {
    let featured = page.featured.as_deref().unwrap_or(&[]);

    let mut featured_html = String::new();
    for (i, entry) in featured.iter().enumerate() {
        featured_html.push_str(&format!(
            "    <div class=\"featured-image-card\" data-grid=\"featured\" data-idx=\"{i}\">\
             <div class=\"featured-badge\">Featured</div>\
             <img src=\"{}\" alt=\"Featured moment {}\" class=\"featured-image\" onerror=\"this.style.display='none'\" loading=\"lazy\"></div>\n",
            escape_html(&entry.path),
            i + 1
        ));
    }

    let mut grid_html = String::new();
    for (i, entry) in page.all_images.iter().enumerate() {
        grid_html.push_str(&format!(
            "    <div class=\"image-card\" data-grid=\"all\" data-idx=\"{i}\" data-album=\"{}\">\
             <img src=\"{}\" alt=\"Wedding photo {}\" class=\"gallery-image\" onerror=\"this.style.display='none'\" loading=\"lazy\"></div>\n",
            escape_html(&entry.album),
            escape_html(&entry.path),
            i + 1
        ));
    }

    let sequences = script_json(&ScriptSequences {
        featured: featured.iter().map(|e| e.path.as_str()).collect(),
        all: page.all_images.iter().map(|e| e.path.as_str()).collect(),
    })?;

    let featured_display = if featured.is_empty() { "none" } else { "block" };

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Wedding Gallery</title>
<link rel="stylesheet" href="css/style.css">
</head>
<body>
<main>
<section id="featuredSection" style="display:{featured_display}">
  <h2>Featured Moments</h2>
  <div class="featured-grid" id="featuredImagesGrid">
{featured_html}  </div>
</section>
<section id="allImagesSection">
  <h2>All Photos</h2>
  <div class="images-grid" id="allImagesGrid">
{grid_html}  </div>
</section>
</main>

<div class="lightbox" id="lightbox">
  <span class="lightbox-close">&times;</span>
  <span class="lightbox-prev">&#8249;</span>
  <img id="lightboxImage" src="" alt="">
  <span class="lightbox-next">&#8250;</span>
  <div class="lightbox-caption"></div>
</div>

<script>
const SEQUENCES={sequences};
const lb=document.getElementById('lightbox');
const lbImg=document.getElementById('lightboxImage');
const caption=lb.querySelector('.lightbox-caption');
const prevBtn=lb.querySelector('.lightbox-prev');
const nextBtn=lb.querySelector('.lightbox-next');
let active=[];
let current=0;

function show(){{
  const n=active.length;
  lbImg.src=active[current];
  lbImg.alt=`Image ${{current+1}} of ${{n}}`;
  caption.textContent=`${{current+1}} / ${{n}}`;
  lb.classList.add('active');
  prevBtn.style.display=current>0?'block':'none';
  nextBtn.style.display=current<n-1?'block':'none';
}}

function openLightbox(grid,idx){{
  active=SEQUENCES[grid];
  current=Math.min(idx,Math.max(active.length-1,0));
  if(active.length)show();
}}

function closeLightbox(){{
  lb.classList.remove('active');
}}

function navigate(dir){{
  if(active.length===0)return;
  current=((current+dir)%active.length+active.length)%active.length;
  show();
}}

document.querySelectorAll('[data-grid]').forEach(card=>{{
  card.addEventListener('click',()=>openLightbox(card.dataset.grid,parseInt(card.dataset.idx)));
}});
lb.querySelector('.lightbox-close').addEventListener('click',closeLightbox);
prevBtn.addEventListener('click',e=>{{e.stopPropagation();navigate(-1);}});
nextBtn.addEventListener('click',e=>{{e.stopPropagation();navigate(1);}});
lb.addEventListener('click',e=>{{if(e.target===lb)closeLightbox();}});
document.addEventListener('keydown',e=>{{
  if(!lb.classList.contains('active'))return;
  if(e.key==='Escape')closeLightbox();
  if(e.key==='ArrowLeft')navigate(-1);
  if(e.key==='ArrowRight')navigate(1);
}});
</script>
</body>
</html>"##
    ))
}

/// Build `gallery.html` in the site root.
pub fn run_gallery(site: &Path) -> Result<()> {
    let manifest = gallery_manifest_or_none(site);
    let page = GalleryPage::build(manifest.as_ref(), &mut rand::thread_rng());
    let html = render_gallery_html(&page)?;
    let output_path = site.join("gallery.html");
    std::fs::write(&output_path, &html)
        .with_context(|| format!("Impossible d'écrire {}", output_path.display()))?;

    println!(
        "  {} {} photos dans la galerie ({} en vedette) → {}",
        style("✔").green().bold(),
        style(page.all_images.len()).green().bold(),
        page.featured.as_ref().map_or(0, |f| f.len()),
        style(output_path.display()).white().bold()
    );

    Ok(())
}
