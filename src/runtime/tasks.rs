use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use crate::library::{Folder, Listing, PROBE_BYTES, TagUpdate, Track, read_tags};
use crate::webdav::{WebDavClient, WebDavError};

/// Results flowing back from background threads into the event loop.
pub enum WorkerMsg {
    Listing {
        generation: u64,
        folder: String,
        result: Result<Listing, WebDavError>,
    },
    Tags {
        generation: u64,
        update: TagUpdate,
    },
}

/// Fetch one folder listing on its own thread.
pub fn spawn_listing_fetch(
    client: WebDavClient,
    folder: Folder,
    extensions: Vec<String>,
    generation: u64,
    tx: Sender<WorkerMsg>,
) {
    thread::spawn(move || {
        let result = client.list(&folder.url, &extensions);
        let _ = tx.send(WorkerMsg::Listing {
            generation,
            folder: folder.name,
            result,
        });
    });
}

/// Probe embedded tags for every track of a freshly shown listing, one
/// thread per track. Completion order is unconstrained; stale results are
/// filtered by the event loop's generation check, and `cancel` short-circuits
/// workers whose listing has already been left.
pub fn spawn_enrichment(
    client: &WebDavClient,
    tracks: &[Track],
    generation: u64,
    cancel: Arc<AtomicBool>,
    tx: &Sender<WorkerMsg>,
) {
    for track in tracks {
        let client = client.clone();
        let tx = tx.clone();
        let cancel = cancel.clone();
        let id = track.id;
        let url = track.url.clone();
        thread::spawn(move || {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            // Lookup failures are swallowed; the filename title stays.
            let Ok(bytes) = client.fetch_head(&url, PROBE_BYTES) else {
                return;
            };
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            if let Some(update) = read_tags(id, &bytes) {
                let _ = tx.send(WorkerMsg::Tags { generation, update });
            }
        });
    }
}
