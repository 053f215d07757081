use async_trait::async_trait;
use windows::Media::Control::{
    GlobalSystemMediaTransportControlsSession, GlobalSystemMediaTransportControlsSessionManager,
    GlobalSystemMediaTransportControlsSessionPlaybackStatus,
};

use crate::{
    error::MediaError,
    media_events::{MediaQuery, PlaybackState},
    media_listener::MediaSource,
};

/// Polls the current System Media Transport Controls session.
pub struct SmtcSource {
    manager: GlobalSystemMediaTransportControlsSessionManager,
}

impl SmtcSource {
    pub fn new() -> Result<Self, MediaError> {
        let manager = GlobalSystemMediaTransportControlsSessionManager::RequestAsync()?.get()?;
        Ok(Self { manager })
    }
}

#[async_trait(?Send)]
impl MediaSource for SmtcSource {
    async fn fetch(&mut self) -> Result<Option<MediaQuery>, MediaError> {
        // no current session is reported as an error by WinRT
        let Ok(session) = self.manager.GetCurrentSession() else {
            return Ok(None);
        };

        query_session(&session).map(Some)
    }
}

fn query_session(
    session: &GlobalSystemMediaTransportControlsSession,
) -> Result<MediaQuery, MediaError> {
    let state = match session.GetPlaybackInfo()?.PlaybackStatus()? {
        GlobalSystemMediaTransportControlsSessionPlaybackStatus::Paused => PlaybackState::Paused,
        GlobalSystemMediaTransportControlsSessionPlaybackStatus::Stopped => PlaybackState::Stopped,
        GlobalSystemMediaTransportControlsSessionPlaybackStatus::Changing
        | GlobalSystemMediaTransportControlsSessionPlaybackStatus::Opened => {
            PlaybackState::Waiting
        }
        GlobalSystemMediaTransportControlsSessionPlaybackStatus::Closed => PlaybackState::None,
        GlobalSystemMediaTransportControlsSessionPlaybackStatus::Playing => {
            PlaybackState::Playing
        }
        _ => PlaybackState::Other,
    };

    let media_properties = session.TryGetMediaPropertiesAsync()?.get()?;
    let title = media_properties.Title().unwrap_or_default().to_string();
    let artist = media_properties.Artist().unwrap_or_default().to_string();

    let timeline_properties = session.GetTimelineProperties()?;
    let (position_ms, duration_ms) = timeline_ms(
        timeline_properties.StartTime().ok().map(|x| x.Duration),
        timeline_properties.EndTime().ok().map(|x| x.Duration),
        timeline_properties.Position().ok().map(|x| x.Duration),
    );

    Ok(MediaQuery {
        state,
        title,
        artist,
        position_ms,
        duration_ms,
    })
}

/// TimeSpan ticks per millisecond.
const TICKS_PER_MS: i64 = 10_000;

/// Converts SMTC timeline ticks (100 ns) into `(position_ms, duration_ms)`.
///
/// Some players don't report timeline properties; a missing position comes
/// back as `-1` and a missing or non-positive end as a live duration of `0`.
fn timeline_ms(start: Option<i64>, end: Option<i64>, position: Option<i64>) -> (i64, i64) {
    let end_ms = end.map(|t| t / TICKS_PER_MS).unwrap_or(-1);
    let start_ms = start.map(|t| t / TICKS_PER_MS).unwrap_or_default();

    let duration_ms = if end_ms <= 0 { 0 } else { end_ms - start_ms };
    let position_ms = position.map(|t| t / TICKS_PER_MS).unwrap_or(-1);

    (position_ms, duration_ms)
}
