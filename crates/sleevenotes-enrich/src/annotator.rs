//! Per-track annotation pipeline and its worker-pool orchestrator.
//!
//! Each track runs search -> match -> song fetch -> annotation fetch ->
//! extract -> validate. Any failure along the way abandons that track's
//! pipeline with a debug log; the rest of the batch is unaffected and the
//! overall run only fails on input validation (the track ceiling).
//!
//! Concurrency: a fixed pool of workers drains a shared queue of track
//! indices. Successful results travel as `(index, annotation)` pairs over
//! a channel and are merged by a single writer after every worker has
//! finished, so no two tasks ever touch the track list concurrently.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use sleevenotes_core::document::{has_sentence_punctuation, leading_block_text};
use sleevenotes_core::model::{Track, TrackAnnotation};

use crate::error::{EnrichError, EnrichResult};
use crate::genius::AnnotationIndex;
use crate::matching::find_match;

/// Albums above this track count are rejected outright, before any
/// upstream call is made.
pub const MAX_ALBUM_TRACKS: usize = 200;

/// Worker-pool size; bounds concurrent upstream requests.
pub const DEFAULT_WORKERS: usize = 8;

/// Drives annotation enrichment for a whole album against an
/// [`AnnotationIndex`].
#[derive(Debug)]
pub struct Annotator<I> {
    index: Arc<I>,
    track_ceiling: usize,
    workers: usize,
}

impl<I: AnnotationIndex + 'static> Annotator<I> {
    #[must_use]
    pub fn new(index: I) -> Self {
        Self {
            index: Arc::new(index),
            track_ceiling: MAX_ALBUM_TRACKS,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Override the track ceiling (policy, not algorithm).
    #[must_use]
    pub fn with_track_ceiling(mut self, ceiling: usize) -> Self {
        self.track_ceiling = ceiling;
        self
    }

    /// Override the worker-pool size (at least one worker).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Enrich every track that can be enriched and return the full list
    /// in its original order. Tracks without a suitable annotation come
    /// back untouched; that is a valid terminal state, not an error.
    pub async fn enrich(&self, mut tracks: Vec<Track>) -> EnrichResult<Vec<Track>> {
        if tracks.len() > self.track_ceiling {
            return Err(EnrichError::TooManyTracks {
                count: tracks.len(),
                limit: self.track_ceiling,
            });
        }
        if tracks.is_empty() {
            return Ok(tracks);
        }

        // Immutable snapshot shared by all pipelines; the matcher reads
        // the whole list, so it must not observe partial merges.
        let snapshot: Arc<Vec<Track>> = Arc::new(tracks.clone());
        let queue: Arc<Mutex<VecDeque<usize>>> =
            Arc::new(Mutex::new((0..snapshot.len()).collect()));
        let (tx, mut rx) = mpsc::channel::<(usize, TrackAnnotation)>(snapshot.len());

        let pool_size = self.workers.min(snapshot.len());
        tracing::info!(
            tracks = snapshot.len(),
            workers = pool_size,
            "starting annotation enrichment"
        );

        let mut handles = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let index = Arc::clone(&self.index);
            let snapshot = Arc::clone(&snapshot);
            let queue = Arc::clone(&queue);
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(track_index) = next else { break };

                    if let Some(result) =
                        annotate_track(index.as_ref(), track_index, &snapshot).await
                    {
                        if tx.send(result).await.is_err() {
                            break;
                        }
                    }
                }
            }));
        }
        drop(tx);

        // Single-writer merge; the channel closes once every worker has
        // dropped its sender, which gives join-all semantics.
        let mut annotated = 0usize;
        while let Some((track_index, note)) = rx.recv().await {
            tracks[track_index].genius = Some(note);
            annotated += 1;
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("annotation worker panicked: {e}");
            }
        }

        tracing::info!(annotated, total = snapshot.len(), "annotation enrichment done");
        Ok(tracks)
    }
}

/// Search query for a track: first artist plus the title up to any `-`
/// delimiter (sheds "- Remastered" style suffixes).
fn search_query(artist: &str, track_name: &str) -> String {
    let title = track_name.split('-').next().unwrap_or(track_name);
    format!("{artist} {title}")
}

/// One track's pipeline. `None` is an abandonment, never an error; every
/// exit short of success logs its reason at debug level.
async fn annotate_track<I: AnnotationIndex + ?Sized>(
    index: &I,
    track_index: usize,
    tracks: &[Track],
) -> Option<(usize, TrackAnnotation)> {
    let track = &tracks[track_index];

    let Some(first_artist) = track.artists.first() else {
        tracing::debug!(track = %track.name, "no credited artist");
        return None;
    };

    let query = search_query(&first_artist.name, &track.name);
    let hits = match index.search(&query).await {
        Ok(hits) => hits,
        Err(e) => {
            tracing::debug!(track = %track.name, error = %e, "search failed");
            return None;
        }
    };

    let Some((hit, target_index)) = find_match(&hits, track, tracks) else {
        tracing::debug!(track = %track.name, "no hit passed both gates");
        return None;
    };

    let song = match index.song(hit.id).await {
        Ok(song) => song,
        Err(e) => {
            tracing::debug!(track = %track.name, error = %e, "song fetch failed");
            return None;
        }
    };

    let Some(annotation_id) = song.first_annotation_id() else {
        tracing::debug!(track = %track.name, "no description annotation");
        return None;
    };

    let annotation = match index.annotation(annotation_id).await {
        Ok(annotation) => annotation,
        Err(e) => {
            tracing::debug!(track = %track.name, error = %e, "annotation fetch failed");
            return None;
        }
    };

    let Some(dom) = annotation.body.dom else {
        tracing::debug!(track = %track.name, "annotation has no body tree");
        return None;
    };

    let Some(text) = leading_block_text(&dom) else {
        tracing::debug!(track = %track.name, "annotation body has no leading block");
        return None;
    };

    if text.is_empty() {
        tracing::debug!(track = %track.name, "annotation text empty");
        return None;
    }
    if !has_sentence_punctuation(&text) {
        tracing::debug!(track = %track.name, "annotation text has no punctuation");
        return None;
    }

    Some((
        target_index,
        TrackAnnotation {
            text,
            url: annotation.url,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use sleevenotes_core::document::DocNode;
    use sleevenotes_core::model::SearchHit;
    use crate::genius::{Annotation, AnnotationBody, AnnotationRef, DescriptionAnnotation, Song};

    #[derive(Debug, Default)]
    struct MockIndex {
        hits: HashMap<String, Vec<SearchHit>>,
        songs: HashMap<u64, Song>,
        annotations: HashMap<u64, Annotation>,
        calls: AtomicUsize,
    }

    impl MockIndex {
        fn upstream_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnnotationIndex for MockIndex {
        async fn search(&self, query: &str) -> EnrichResult<Vec<SearchHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.get(query).cloned().unwrap_or_default())
        }

        async fn song(&self, id: u64) -> EnrichResult<Song> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.songs.get(&id).cloned().ok_or_else(|| EnrichError::Http {
                source_name: "mock".to_string(),
                message: format!("no song {id}"),
            })
        }

        async fn annotation(&self, id: u64) -> EnrichResult<Annotation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.annotations
                .get(&id)
                .cloned()
                .ok_or_else(|| EnrichError::Http {
                    source_name: "mock".to_string(),
                    message: format!("no annotation {id}"),
                })
        }
    }

    fn hit(id: u64, title: &str, artist: &str) -> SearchHit {
        SearchHit {
            id,
            title: title.to_string(),
            primary_artist: artist.to_string(),
        }
    }

    fn song_with_annotation(annotation_id: u64) -> Song {
        Song {
            description_annotation: Some(DescriptionAnnotation {
                annotations: vec![AnnotationRef { id: annotation_id }],
            }),
        }
    }

    fn annotation_with_text(url: &str, text: &str) -> Annotation {
        Annotation {
            url: url.to_string(),
            body: AnnotationBody {
                dom: Some(DocNode::Element {
                    children: vec![DocNode::Element {
                        children: vec![DocNode::Text(text.to_string())],
                    }],
                }),
            },
        }
    }

    #[tokio::test]
    async fn test_batch_enriches_matching_track_and_tolerates_misses() {
        let mut index = MockIndex::default();
        index.hits.insert(
            "Sam Artist X".to_string(),
            vec![hit(1, "X", "sam artist")],
        );
        // Search for "Y" returns nothing at all.
        index.songs.insert(1, song_with_annotation(10));
        index
            .annotations
            .insert(10, annotation_with_text("https://genius.com/10", "Great song."));

        let tracks = vec![
            Track::new("t1", "X").with_artist("Sam Artist"),
            Track::new("t2", "Y").with_artist("Sam Artist"),
        ];

        let enriched = Annotator::new(index).enrich(tracks).await.unwrap();

        let note = enriched[0].genius.as_ref().unwrap();
        assert_eq!(note.text, "Great song.");
        assert_eq!(note.url, "https://genius.com/10");
        assert!(enriched[1].genius.is_none());
    }

    #[tokio::test]
    async fn test_ceiling_rejects_before_any_upstream_call() {
        let index = Arc::new(MockIndex::default());
        let annotator = Annotator {
            index: Arc::clone(&index),
            track_ceiling: MAX_ALBUM_TRACKS,
            workers: DEFAULT_WORKERS,
        };

        let tracks: Vec<Track> = (0..201)
            .map(|i| Track::new(format!("t{i}"), format!("Track {i}")).with_artist("A"))
            .collect();

        let err = annotator.enrich(tracks).await.unwrap_err();
        assert!(matches!(
            err,
            EnrichError::TooManyTracks { count: 201, limit: 200 }
        ));
        assert_eq!(index.upstream_calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_abandons_only_that_track() {
        let mut index = MockIndex::default();
        index
            .hits
            .insert("A X".to_string(), vec![hit(1, "X", "A")]);
        index
            .hits
            .insert("A Y".to_string(), vec![hit(2, "Y", "A")]);
        // Song 1 is missing: the mock returns an HTTP error for track X.
        index.songs.insert(2, song_with_annotation(20));
        index
            .annotations
            .insert(20, annotation_with_text("https://genius.com/20", "Still here."));

        let tracks = vec![
            Track::new("t1", "X").with_artist("A"),
            Track::new("t2", "Y").with_artist("A"),
        ];

        let enriched = Annotator::new(index).enrich(tracks).await.unwrap();
        assert!(enriched[0].genius.is_none());
        assert_eq!(enriched[1].genius.as_ref().unwrap().text, "Still here.");
    }

    #[tokio::test]
    async fn test_punctuationless_text_is_discarded() {
        let mut index = MockIndex::default();
        index
            .hits
            .insert("A X".to_string(), vec![hit(1, "X", "A")]);
        index.songs.insert(1, song_with_annotation(10));
        index
            .annotations
            .insert(10, annotation_with_text("https://genius.com/10", "ok"));

        let tracks = vec![Track::new("t1", "X").with_artist("A")];
        let enriched = Annotator::new(index).enrich(tracks).await.unwrap();
        assert!(enriched[0].genius.is_none());
    }

    #[tokio::test]
    async fn test_missing_body_tree_is_abandoned() {
        let mut index = MockIndex::default();
        index
            .hits
            .insert("A X".to_string(), vec![hit(1, "X", "A")]);
        index.songs.insert(1, song_with_annotation(10));
        index.annotations.insert(
            10,
            Annotation {
                url: "https://genius.com/10".to_string(),
                body: AnnotationBody { dom: None },
            },
        );

        let tracks = vec![Track::new("t1", "X").with_artist("A")];
        let enriched = Annotator::new(index).enrich(tracks).await.unwrap();
        assert!(enriched[0].genius.is_none());
    }

    #[tokio::test]
    async fn test_hit_binds_annotation_to_matched_index() {
        // The hit found while querying for track 0 titles-matches track 1,
        // so the annotation lands on track 1.
        let mut index = MockIndex::default();
        index.hits.insert(
            "The Band Medley Intro".to_string(),
            vec![hit(1, "The Weight", "The Band")],
        );
        index.songs.insert(1, song_with_annotation(10));
        index
            .annotations
            .insert(10, annotation_with_text("https://genius.com/10", "Take a load off."));

        let tracks = vec![
            Track::new("t1", "Medley Intro").with_artist("The Band"),
            Track::new("t2", "The Weight").with_artist("The Band"),
        ];

        let enriched = Annotator::new(index)
            .with_workers(1)
            .enrich(tracks)
            .await
            .unwrap();
        assert!(enriched[1].genius.is_some());
    }

    #[tokio::test]
    async fn test_small_pool_drains_whole_queue() {
        // Distinct, non-overlapping titles so every hit binds to its own
        // track rather than a substring relative.
        let names = [
            "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India",
            "Juliett", "Kilo", "Lima",
        ];

        let mut index = MockIndex::default();
        for (i, name) in names.iter().enumerate() {
            let i = i as u64;
            index
                .hits
                .insert(format!("A {name}"), vec![hit(i, name, "A")]);
            index.songs.insert(i, song_with_annotation(100 + i));
            index.annotations.insert(
                100 + i,
                annotation_with_text(&format!("https://genius.com/{i}"), "Noted."),
            );
        }

        let tracks: Vec<Track> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Track::new(format!("t{i}"), *name).with_artist("A"))
            .collect();

        let enriched = Annotator::new(index)
            .with_workers(3)
            .enrich(tracks)
            .await
            .unwrap();
        assert!(enriched.iter().all(|t| t.genius.is_some()));
    }

    #[tokio::test]
    async fn test_empty_track_list_is_a_no_op() {
        let enriched = Annotator::new(MockIndex::default())
            .enrich(Vec::new())
            .await
            .unwrap();
        assert!(enriched.is_empty());
    }

    #[test]
    fn test_search_query_sheds_dash_suffix() {
        assert_eq!(
            search_query("Sam Artist", "Song - Remastered 2011"),
            "Sam Artist Song "
        );
        assert_eq!(search_query("Sam Artist", "Song"), "Sam Artist Song");
    }
}
