use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let info = app
        .playback_handle
        .as_ref()
        .and_then(|handle| handle.lock().ok().map(|info| (info.index, info.track)));

    let (index, track_id) = info.unwrap_or((None, None));
    let track = track_id.and_then(|id| app.tracks.iter().find(|t| t.id == id));

    // While a track from a listing we navigated away from keeps playing, its
    // entry is gone from `app.tracks`; keep the published metadata instead of
    // blanking it mid-song.
    if index.is_none() || track.is_some() {
        mpris.set_track_metadata(index, track);
    }
    mpris.set_playback(app.playback);
}
