use anyhow::{Context, Result};
use console::{Key as TermKey, Term, style};
use std::path::Path;

use crate::downloads::format_file_size;
use crate::gallery::{GalleryPage, Grid, LOADING_PLACEHOLDER};
use crate::lightbox::{Key, Lightbox, LightboxEvent, LightboxView};
use crate::manifest::gallery_manifest_or_none;

/// Map a terminal key to a lightbox event. `p`, `n` and `q` stand for the
/// previous, next and close controls; Backspace steps back out of the image
/// like a click on the backdrop.
pub fn event_for_key(key: &TermKey) -> LightboxEvent {
    match key {
        TermKey::Escape => LightboxEvent::KeyPressed(Key::Escape),
        TermKey::ArrowLeft => LightboxEvent::KeyPressed(Key::ArrowLeft),
        TermKey::ArrowRight => LightboxEvent::KeyPressed(Key::ArrowRight),
        TermKey::Char('p') => LightboxEvent::PrevClicked,
        TermKey::Char('n') => LightboxEvent::NextClicked,
        TermKey::Char('q') => LightboxEvent::CloseClicked,
        TermKey::Backspace => LightboxEvent::BackdropClicked,
        _ => LightboxEvent::KeyPressed(Key::Other),
    }
}

/// One frame of the terminal lightbox.
pub fn render_frame(view: &LightboxView, file_size: Option<u64>) -> String {
    let prev = if view.show_prev { "‹ préc." } else { "       " };
    let next = if view.show_next { "suiv. ›" } else { "" };
    let size = file_size
        .map(format_file_size)
        .unwrap_or_else(|| "introuvable".to_string());
    format!(
        "{prev}  {}  {next}\n{}  ({size})",
        view.caption, view.src
    )
}

/// Browse one grid of the gallery in the terminal.
pub fn run_view(site: &Path, featured: bool, start: usize) -> Result<()> {
    let term = Term::stdout();
    println!("  {}", style(LOADING_PLACEHOLDER).dim());

    let manifest = gallery_manifest_or_none(site);
    let page = GalleryPage::build(manifest.as_ref(), &mut rand::thread_rng());
    let grid = if featured { Grid::Featured } else { Grid::AllImages };

    let mut lightbox = Lightbox::new();
    if !page.open_card(grid, start, &mut lightbox) {
        println!("  {} Aucune photo à afficher.", style("!").yellow().bold());
        return Ok(());
    }

    println!(
        "  {} ←/→ ou p/n naviguer · {} fermer",
        style("Clavier").dim(),
        style("Échap/q/⌫").yellow().bold()
    );
    while let Some(view) = lightbox.view() {
        term.set_title(&view.alt);
        let file_size = std::fs::metadata(site.join(&view.src)).ok().map(|m| m.len());
        term.write_line(&render_frame(&view, file_size))
            .context("Écriture terminal impossible")?;
        let key = term.read_key().context("Lecture clavier impossible")?;
        lightbox.handle(event_for_key(&key));
    }
    Ok(())
}
