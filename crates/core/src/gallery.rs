//! Static HTML gallery generation.
//!
//! Pure string substitution over a template carrying two placeholder
//! tokens: the page title and the movie grid markup.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::storage::{Catalog, MovieRecord};

pub const TITLE_TOKEN: &str = "__TEMPLATE_TITLE__";
pub const GRID_TOKEN: &str = "__TEMPLATE_MOVIE_GRID__";

/// Errors for gallery generation.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template is missing the {0} token")]
    MissingToken(&'static str),
}

/// Render the gallery page by substituting both template tokens.
pub fn generate_gallery(
    catalog: &Catalog,
    template: &str,
    page_title: &str,
) -> Result<String, GalleryError> {
    if !template.contains(TITLE_TOKEN) {
        return Err(GalleryError::MissingToken(TITLE_TOKEN));
    }
    if !template.contains(GRID_TOKEN) {
        return Err(GalleryError::MissingToken(GRID_TOKEN));
    }

    let grid = catalog
        .iter()
        .map(|(title, record)| grid_item(title, record))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(template
        .replace(TITLE_TOKEN, &escape_html(page_title))
        .replace(GRID_TOKEN, &grid))
}

/// Read the template, render the gallery, write the output file.
pub fn write_gallery(
    catalog: &Catalog,
    template_path: &Path,
    output_path: &Path,
    page_title: &str,
) -> Result<(), GalleryError> {
    let template = fs::read_to_string(template_path)?;
    let html = generate_gallery(catalog, &template, page_title)?;
    fs::write(output_path, html)?;
    Ok(())
}

fn grid_item(title: &str, record: &MovieRecord) -> String {
    let imdb_url = format!("https://www.imdb.com/title/{}", record.imdb_id);
    format!(
        r#"        <li>
            <div class="movie">
                <a href="{imdb_url}" target="_blank">
                    <img class="movie-poster" src="{poster}" title="{notes}">
                </a>
                <div class="movie-title">{title}</div>
                <div class="movie-year">{year}</div>
                <div class="movie-rating">{rating}</div>
            </div>
        </li>"#,
        poster = escape_html(&record.poster),
        notes = escape_html(&record.notes),
        title = escape_html(title),
        year = record.year,
        rating = record.rating,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
