use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::downloads::{DownloadsPage, download_confirmation, render_downloads_html};
use crate::gallery::{GalleryPage, render_gallery_html};
use crate::manifest::{album_summary_or_fallback, gallery_manifest_or_none};

/// Server state. Pages are rebuilt on every request, so each load
/// re-reads the manifests and reshuffles the gallery.
pub struct ServerState {
    pub site: PathBuf,
}

impl ServerState {
    pub fn new(site: &Path) -> Result<Arc<Self>> {
        let site = site
            .canonicalize()
            .with_context(|| format!("Dossier introuvable : {}", site.display()))?;
        Ok(Arc::new(Self { site }))
    }

    pub fn gallery_html(&self) -> Result<String> {
        let manifest = gallery_manifest_or_none(&self.site);
        let page = GalleryPage::build(manifest.as_ref(), &mut rand::thread_rng());
        render_gallery_html(&page)
    }

    pub fn downloads_html(&self) -> String {
        let summary = album_summary_or_fallback(&self.site);
        render_downloads_html(&DownloadsPage::build(&summary))
    }

    /// Confirmation for a download request, `None` for unknown albums.
    pub fn download_message(&self, key: &str) -> Option<String> {
        download_confirmation(&self.site, key)
    }
}

/// MIME type from file extension.
fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
        .as_str()
    {
        "html" => "text/html; charset=utf-8",
        "json" => "application/json",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "css" => "text/css",
        "js" => "application/javascript",
        _ => "application/octet-stream",
    }
}

fn content_type(mime: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], mime.as_bytes())
        .expect("static Content-Type header is valid")
}

fn html(body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body).with_header(content_type("text/html; charset=utf-8"))
}

fn json(status: u16, value: &serde_json::Value) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(value.to_string())
        .with_status_code(StatusCode(status))
        .with_header(content_type("application/json"))
}

/// JSON error response helper.
fn json_error(status: u16, msg: &str) -> Response<Cursor<Vec<u8>>> {
    json(status, &serde_json::json!({ "error": msg }))
}

/// Parse query string into key-value pairs.
pub fn parse_query(url: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(qs) = url.split('?').nth(1) {
        for pair in qs.split('&') {
            let mut kv = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (kv.next(), kv.next()) {
                params.insert(urldecode(k), urldecode(v));
            }
        }
    }
    params
}

/// Minimal URL decode (%XX and +).
pub fn urldecode(s: &str) -> String {
    let mut result = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(val) = u8::from_str_radix(&String::from_utf8_lossy(&bytes[i + 1..i + 3]), 16)
            {
                result.push(val);
                i += 3;
                continue;
            }
        }
        if bytes[i] == b'+' {
            result.push(b' ');
        } else {
            result.push(bytes[i]);
        }
        i += 1;
    }
    String::from_utf8_lossy(&result).to_string()
}

/// File under the site root for a request path, `None` if it would leave the site.
pub fn site_asset_path(site: &Path, rel: &str) -> Option<PathBuf> {
    let rel = rel.replace('\\', "/");
    if rel.starts_with('/') || rel.contains("..") {
        return None;
    }
    Some(site.join(rel)).filter(|full| full.starts_with(site))
}

fn serve_file(req: Request, site: &Path, rel: &str) {
    let Some(full_path) = site_asset_path(site, rel) else {
        let _ = req.respond(json_error(400, "Chemin invalide"));
        return;
    };
    if !full_path.is_file() {
        let _ = req.respond(json_error(404, "Fichier introuvable"));
        return;
    }
    match std::fs::File::open(&full_path) {
        Ok(file) => {
            let resp = Response::from_file(file).with_header(content_type(mime_type(&full_path)));
            let _ = req.respond(resp);
        }
        Err(_) => {
            let _ = req.respond(json_error(500, "Erreur lecture fichier"));
        }
    }
}

/// Handle a single HTTP request.
pub fn handle_request(req: Request, state: &ServerState) {
    let url = req.url().to_string();
    let method = req.method().clone();
    let path = url.split('?').next().unwrap_or(&url);

    match (&method, path) {
        (&Method::Get, "/" | "/gallery.html") => match state.gallery_html() {
            Ok(body) => {
                let _ = req.respond(html(&body));
            }
            Err(e) => {
                let _ = req.respond(json_error(500, &e.to_string()));
            }
        },
        (&Method::Get, "/downloads.html") => {
            let _ = req.respond(html(&state.downloads_html()));
        }
        // Download stub: confirmation only, no archive is produced
        (&Method::Get, "/api/download") => {
            let params = parse_query(&url);
            let message = params
                .get("album")
                .and_then(|key| state.download_message(key).map(|m| (key, m)));
            match message {
                Some((album, message)) => {
                    let body = serde_json::json!({ "album": album, "message": message });
                    let _ = req.respond(json(200, &body));
                }
                None => {
                    let _ = req.respond(Response::empty(StatusCode(204)));
                }
            }
        }
        (&Method::Get, _) => serve_file(req, &state.site, &path[1..]),
        _ => {
            let _ = req.respond(json_error(405, "Méthode non supportée"));
        }
    }
}

/// Start the HTTP server.
pub fn run_serve(site: &Path, port: u16) -> Result<()> {
    let state = ServerState::new(site)?;

    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("Impossible de démarrer le serveur: {e}"))?;

    println!(
        "  {} Galerie disponible sur {}",
        console::style("✔").green().bold(),
        console::style(format!("http://localhost:{port}")).cyan().bold()
    );
    println!(
        "  {} téléchargements sur {}",
        console::style("·").dim(),
        console::style(format!("http://localhost:{port}/downloads.html")).cyan()
    );
    println!("  {} pour arrêter", console::style("Ctrl+C").yellow().bold());

    for req in server.incoming_requests() {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            handle_request(req, &state);
        });
    }

    Ok(())
}
