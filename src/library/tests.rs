use reqwest::Url;

use super::*;

fn track(name: &str) -> Track {
    let url = Url::parse(&format!("https://cloud.example.com/music/{name}")).unwrap();
    Track::new(url, name.to_string())
}

#[test]
fn new_track_defaults_title_to_filename() {
    let t = track("song.mp3");
    assert_eq!(t.title, "song.mp3");
    assert_eq!(t.filename, "song.mp3");
    assert!(t.artist.is_none());
    assert!(t.album.is_none());
    assert!(t.duration.is_none());
}

#[test]
fn track_ids_are_unique() {
    assert_ne!(track("a.mp3").id, track("a.mp3").id);
}

#[test]
fn display_prefers_artist_dash_title() {
    let mut t = track("song.mp3");
    assert_eq!(t.display(), "song.mp3");

    t.title = "Song".to_string();
    t.artist = Some("Band".to_string());
    assert_eq!(t.display(), "Band - Song");

    t.artist = Some("   ".to_string());
    assert_eq!(t.display(), "Song");
}

#[test]
fn assemble_drops_tracks_when_folders_present() {
    let folder = Folder {
        name: "b".to_string(),
        url: Url::parse("https://cloud.example.com/music/b/").unwrap(),
    };
    let listing = Listing::assemble(vec![folder], vec![track("c.mp3")]);
    assert_eq!(listing.folders.len(), 1);
    assert!(listing.tracks.is_empty());

    let listing = Listing::assemble(vec![], vec![track("c.mp3")]);
    assert_eq!(listing.tracks.len(), 1);
}

#[test]
fn tag_update_fills_fields_in_place() {
    let mut t = track("song.mp3");
    let update = TagUpdate {
        track: t.id,
        title: Some("Song".to_string()),
        artist: Some("Band".to_string()),
        album: None,
        duration: Some(std::time::Duration::from_secs(180)),
    };
    update.apply_to(&mut t);

    assert_eq!(t.title, "Song");
    assert_eq!(t.artist.as_deref(), Some("Band"));
    assert!(t.album.is_none());
    assert_eq!(t.duration, Some(std::time::Duration::from_secs(180)));
}

#[test]
fn tag_update_keeps_existing_duration() {
    let mut t = track("song.mp3");
    t.duration = Some(std::time::Duration::from_secs(200));
    let update = TagUpdate {
        track: t.id,
        title: None,
        artist: None,
        album: None,
        duration: Some(std::time::Duration::from_secs(1)),
    };
    update.apply_to(&mut t);
    assert_eq!(t.duration, Some(std::time::Duration::from_secs(200)));
}

#[test]
fn read_tags_rejects_unrecognizable_bytes() {
    let id = TrackId::new();
    assert!(read_tags(id, b"definitely not audio").is_none());
    assert!(read_tags(id, &[]).is_none());
}
