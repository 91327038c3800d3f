use reqwest::Url;

use crate::library::{Folder, Listing, Track};

/// Every text span between a literal `<d:href>` and the next `</d:href>`,
/// in order of appearance. Includes the collection's self entry.
pub(crate) fn extract_hrefs(xml: &str) -> Vec<&str> {
    let mut hrefs = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<d:href>") {
        rest = &rest[start + "<d:href>".len()..];
        let Some(end) = rest.find("</d:href>") else {
            break;
        };
        hrefs.push(&rest[..end]);
        rest = &rest[end + "</d:href>".len()..];
    }

    hrefs
}

fn is_audio_name(name: &str, extensions: &[String]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// Parse a PROPFIND multistatus body into child folders and audio tracks.
///
/// `base` is the request URL's percent-encoded path with a trailing `/`.
/// Entries outside `base`, the self entry, and `._` resource-fork artifacts
/// are skipped. Duplicates are kept; order follows the raw body.
pub(crate) fn parse_listing(
    base: &str,
    xml: &str,
    extensions: &[String],
    media_base: &Url,
) -> Listing {
    let mut folders: Vec<Folder> = Vec::new();
    let mut tracks: Vec<Track> = Vec::new();

    // The first href is conventionally the requested collection itself.
    for href in extract_hrefs(xml).into_iter().skip(1) {
        if !href.starts_with(base) || href == base {
            continue;
        }

        let decoded = match urlencoding::decode(href) {
            Ok(d) => d.into_owned(),
            Err(_) => href.to_string(),
        };
        let name = decoded
            .trim_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("?")
            .to_string();
        if name.starts_with("._") {
            continue;
        }

        let mut url = media_base.clone();
        url.set_path(&decoded);

        if href.ends_with('/') {
            folders.push(Folder { name, url });
        } else if is_audio_name(&name, extensions) {
            tracks.push(Track::new(url, name));
        }
    }

    Listing::assemble(folders, tracks)
}
