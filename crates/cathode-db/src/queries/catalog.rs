//! Read-only catalog queries.
//!
//! The catalog is produced by an external builder; this module only loads
//! snapshots of it. Rows with an unparseable runtime are skipped with a
//! warning rather than failing the whole scheduling run.

use rusqlite::Connection;

use cathode_common::{ContentKind, Error, Result};

use crate::models::ContentItem;

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Build a `ContentItem`, returning `None` (with a warning) on a bad runtime.
#[allow(clippy::too_many_arguments)]
fn build_item(
    id: i64,
    kind: ContentKind,
    title: String,
    overview: Option<String>,
    external_ref: Option<String>,
    tags: String,
    runtime_raw: String,
    filepath: String,
    show_name: Option<String>,
    season: Option<i32>,
    episode: Option<i32>,
) -> Option<ContentItem> {
    let Some(runtime_secs) = ContentItem::parse_runtime(&runtime_raw) else {
        tracing::warn!(%kind, id, filepath, runtime = %runtime_raw, "skipping catalog row with bad runtime");
        return None;
    };
    Some(ContentItem {
        id,
        kind,
        title,
        overview,
        external_ref,
        tags: split_tags(&tags),
        runtime_secs,
        runtime_raw,
        filepath,
        show_name,
        season,
        episode,
    })
}

/// Load all TV episodes.
pub fn all_episodes(conn: &Connection) -> Result<Vec<ContentItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, show_name, season, episode, overview, external_ref, tags, runtime, filepath
             FROM tv ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, i32>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
            ))
        })
        .map_err(|e| Error::database(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        let (id, name, show, season, episode, overview, ext, tags, runtime, filepath) =
            row.map_err(|e| Error::database(e.to_string()))?;
        if let Some(item) = build_item(
            id,
            ContentKind::Tv,
            name,
            overview,
            ext,
            tags,
            runtime,
            filepath,
            Some(show),
            Some(season),
            Some(episode),
        ) {
            items.push(item);
        }
    }
    Ok(items)
}

/// Load all movies.
pub fn all_movies(conn: &Connection) -> Result<Vec<ContentItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, overview, external_ref, tags, runtime, filepath
             FROM movies ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(|e| Error::database(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        let (id, name, overview, ext, tags, runtime, filepath) =
            row.map_err(|e| Error::database(e.to_string()))?;
        if let Some(item) = build_item(
            id,
            ContentKind::Movie,
            name,
            overview,
            ext,
            tags,
            runtime,
            filepath,
            None,
            None,
            None,
        ) {
            items.push(item);
        }
    }
    Ok(items)
}

/// Shared loader for the filler tables (commercials, music videos, idents),
/// which all carry the same four columns. The filepath doubles as the title.
fn all_filler(conn: &Connection, table: &str, kind: ContentKind) -> Result<Vec<ContentItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, tags, runtime, filepath FROM {table} ORDER BY id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| Error::database(e.to_string()))?;

    let mut items = Vec::new();
    for row in rows {
        let (id, tags, runtime, filepath) = row.map_err(|e| Error::database(e.to_string()))?;
        let title = filepath.clone();
        if let Some(item) = build_item(
            id, kind, title, None, None, tags, runtime, filepath, None, None, None,
        ) {
            items.push(item);
        }
    }
    Ok(items)
}

/// Load all commercials.
pub fn all_commercials(conn: &Connection) -> Result<Vec<ContentItem>> {
    all_filler(conn, "commercials", ContentKind::Commercial)
}

/// Load all music videos.
pub fn all_music_videos(conn: &Connection) -> Result<Vec<ContentItem>> {
    all_filler(conn, "music_videos", ContentKind::MusicVideo)
}

/// Load all idents, optionally restricted to one tag.
pub fn all_idents(conn: &Connection, tag: Option<&str>) -> Result<Vec<ContentItem>> {
    let items = all_filler(conn, "idents", ContentKind::Ident)?;
    Ok(match tag {
        Some(tag) => items
            .into_iter()
            .filter(|i| i.tags.iter().any(|t| t == tag))
            .collect(),
        None => items,
    })
}

/// Load the full catalog snapshot used by one scheduling run.
pub fn load_catalog(conn: &Connection) -> Result<Vec<ContentItem>> {
    let mut items = all_episodes(conn)?;
    items.extend(all_movies(conn)?);
    items.extend(all_commercials(conn)?);
    items.extend(all_music_videos(conn)?);
    items.extend(all_idents(conn, None)?);
    tracing::debug!(count = items.len(), "loaded catalog snapshot");
    Ok(items)
}
