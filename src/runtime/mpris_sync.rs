use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let status = app.status_snapshot();
    let index = status.track.as_ref().and_then(|t| app.catalog.position(&t.id));
    mpris.set_track_metadata(index, status.track.as_ref());
    mpris.set_playback(app.playback);
}
