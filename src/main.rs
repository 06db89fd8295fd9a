mod albums;
mod downloads;
mod error;
mod gallery;
mod lightbox;
mod manifest;
mod serve;
mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "wedding-gallery", about = "Galerie photo de mariage : pages galerie et téléchargements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Générer gallery.html (vedette + toutes les photos mélangées, lightbox)
    Gallery {
        /// Racine du site (contenant images/image-manifest.json)
        site: PathBuf,
    },
    /// Générer downloads.html (résumé de la collection et albums)
    Downloads {
        /// Racine du site (contenant images/album-summary.json)
        site: PathBuf,
    },
    /// Simuler le téléchargement d'un album (ou « all »)
    Download {
        /// Racine du site
        site: PathBuf,
        /// Clé d'album (ex: traditional, candid, all)
        album: String,
    },
    /// Parcourir la galerie au clavier dans le terminal
    View {
        /// Racine du site
        site: PathBuf,
        /// Parcourir la sélection en vedette au lieu de toutes les photos
        #[arg(short, long)]
        featured: bool,
        /// Position de départ (0 = première photo)
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },
    /// Servir le site en local
    Serve {
        /// Racine du site
        site: PathBuf,
        /// Port du serveur (par défaut : 8080)
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

fn resolve_site(site: &Path) -> Result<PathBuf> {
    let site = site
        .canonicalize()
        .with_context(|| format!("Racine du site introuvable : {}", site.display()))?;
    if !site.is_dir() {
        anyhow::bail!("{} n'est pas un dossier", site.display());
    }
    Ok(site)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gallery { site } => gallery::run_gallery(&resolve_site(&site)?),
        Commands::Downloads { site } => downloads::run_downloads(&resolve_site(&site)?),
        Commands::Download { site, album } => downloads::run_download(&resolve_site(&site)?, &album),
        Commands::View {
            site,
            featured,
            start,
        } => view::run_view(&resolve_site(&site)?, featured, start),
        Commands::Serve { site, port } => serve::run_serve(&site, port),
    }
}
