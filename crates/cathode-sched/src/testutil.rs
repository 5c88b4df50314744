//! Fixture builders shared by the engine's unit tests.

use chrono::NaiveDateTime;

use cathode_common::time::parse_ts;
use cathode_common::ContentKind;
use cathode_db::models::ContentItem;

pub fn ts(s: &str) -> NaiveDateTime {
    parse_ts(s).unwrap()
}

fn base(kind: ContentKind, title: &str, runtime_secs: u32, tags: &[&str]) -> ContentItem {
    ContentItem {
        id: 0,
        kind,
        title: title.to_string(),
        overview: None,
        external_ref: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        runtime_secs,
        runtime_raw: runtime_secs.to_string(),
        filepath: format!("/media/{}.mkv", title.replace(' ', "-").to_lowercase()),
        show_name: None,
        season: None,
        episode: None,
    }
}

pub fn episode(show: &str, season: i32, ep: i32, runtime_secs: u32) -> ContentItem {
    let mut item = base(
        ContentKind::Tv,
        &format!("{show} s{season:02}e{ep:02}"),
        runtime_secs,
        &["drama"],
    );
    item.show_name = Some(show.to_string());
    item.season = Some(season);
    item.episode = Some(ep);
    item
}

pub fn movie(title: &str, runtime_secs: u32, tags: &[&str]) -> ContentItem {
    base(ContentKind::Movie, title, runtime_secs, tags)
}

pub fn commercial(runtime_secs: u32) -> ContentItem {
    base(
        ContentKind::Commercial,
        &format!("ad-{runtime_secs}"),
        runtime_secs,
        &["commercial"],
    )
}

pub fn music_video(title: &str, runtime_secs: u32) -> ContentItem {
    base(ContentKind::MusicVideo, title, runtime_secs, &[])
}

pub fn ident(runtime_secs: u32, tags: &[&str]) -> ContentItem {
    base(ContentKind::Ident, &format!("ident-{runtime_secs}"), runtime_secs, tags)
}
