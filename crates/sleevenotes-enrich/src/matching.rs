//! Artist/title matching between album tracks and search hits.
//!
//! Hits arrive ordered by the search service and the first one to pass
//! both gates wins; there is no scoring or re-ranking, so matching
//! outcomes follow the service's own ordering. A hit is only accepted if
//! some track's title corresponds to it, and that track (not necessarily
//! the one that produced the query) becomes the binding target.

use sleevenotes_core::model::{SearchHit, Track};

/// Lowercase + trim, the comparison form for artist names.
fn normalize_name(name: &str) -> String {
    name.to_lowercase().trim().to_string()
}

/// Comparison form for titles: lowercased, trimmed, curly quotes unified
/// to straight ones, commas dropped.
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .trim()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(',', "")
}

/// The portion of a normalized title before any opening parenthesis.
fn pre_paren(title: &str) -> &str {
    title.split('(').next().unwrap_or(title).trim()
}

/// Artist gate: some track artist and the hit's primary artist must
/// contain one another (normalized, either direction).
fn artist_matches(track: &Track, hit: &SearchHit) -> bool {
    let hit_artist = normalize_name(&hit.primary_artist);
    track.artists.iter().any(|artist| {
        let track_artist = normalize_name(&artist.name);
        track_artist.contains(&hit_artist) || hit_artist.contains(&track_artist)
    })
}

/// Title gate for one track against one hit title.
///
/// Accepts on normalized equality or substring containment either way.
/// When the raw track title carries a parenthetical (a "(Remastered)"
/// style suffix), the pre-parenthesis prefixes are compared under the
/// same relation as a fallback.
fn title_corresponds(track_name: &str, hit_title: &str) -> bool {
    let track_title = normalize_title(track_name);
    let hit_title_norm = normalize_title(hit_title);

    if track_title == hit_title_norm
        || track_title.contains(&hit_title_norm)
        || hit_title_norm.contains(&track_title)
    {
        return true;
    }

    track_name.contains('(')
        && (pre_paren(&track_title) == pre_paren(&hit_title_norm)
            || track_title.contains(pre_paren(&hit_title_norm))
            || hit_title_norm.contains(pre_paren(&track_title)))
}

/// Select the first hit (in search order) whose primary artist matches
/// `track` and whose title corresponds to some track in `all_tracks`.
///
/// Returns the winning hit together with the index of the track it bound
/// to. `None` means the track stays unannotated.
pub fn find_match<'h>(
    hits: &'h [SearchHit],
    track: &Track,
    all_tracks: &[Track],
) -> Option<(&'h SearchHit, usize)> {
    for hit in hits {
        if !artist_matches(track, hit) {
            tracing::debug!(hit = %hit.title, track = %track.name, "artist gate rejected hit");
            continue;
        }

        match all_tracks
            .iter()
            .position(|t| title_corresponds(&t.name, &hit.title))
        {
            Some(index) => return Some((hit, index)),
            None => {
                tracing::debug!(hit = %hit.title, "no track title corresponds to hit");
            }
        }
    }
    None
}
