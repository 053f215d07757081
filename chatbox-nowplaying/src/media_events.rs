use strum::EnumString;

/// What a platform backend reports for the current session, before any
/// interpretation. Negative numbers mean the backend did not report the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub state: PlaybackState,
    pub title: String,
    pub artist: String,
    pub position_ms: i64,
    pub duration_ms: i64,
}

#[derive(EnumString, strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    None,
    Stopped,
    Paused,
    Playing,
    Waiting,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackDuration {
    Known(u64),
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub position_ms: u64,
    pub duration: TrackDuration,
}

/// Normalized media state for one poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    NotPlaying,
    Playing(Track),
}

impl Snapshot {
    pub fn track(&self) -> Option<&Track> {
        match self {
            Snapshot::Playing(track) => Some(track),
            Snapshot::NotPlaying => None,
        }
    }
}

/// Turns a backend result into a [`Snapshot`].
///
/// Anything that is not an actively playing session is `NotPlaying`. Streams
/// without a length are live. A missing position is shown as `0`.
pub fn normalize(query: Option<MediaQuery>) -> Snapshot {
    let Some(query) = query else {
        return Snapshot::NotPlaying;
    };

    if query.state != PlaybackState::Playing {
        return Snapshot::NotPlaying;
    }

    let duration = if query.duration_ms > 0 {
        TrackDuration::Known(query.duration_ms as u64)
    } else {
        TrackDuration::Live
    };

    let position_ms = u64::try_from(query.position_ms).unwrap_or(0);

    Snapshot::Playing(Track {
        artist: query.artist,
        title: query.title,
        position_ms,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn query(state: PlaybackState, position_ms: i64, duration_ms: i64) -> MediaQuery {
        MediaQuery {
            state,
            title: "Title".to_string(),
            artist: "Artist".to_string(),
            position_ms,
            duration_ms,
        }
    }

    #[test]
    fn absent_session_is_not_playing() {
        assert_eq!(normalize(None), Snapshot::NotPlaying);
    }

    #[test]
    fn paused_and_stopped_are_not_playing() {
        for state in [
            PlaybackState::Paused,
            PlaybackState::Stopped,
            PlaybackState::None,
            PlaybackState::Waiting,
            PlaybackState::Other,
        ] {
            assert_eq!(
                normalize(Some(query(state, 1000, 200_000))),
                Snapshot::NotPlaying
            );
        }
    }

    #[test]
    fn playing_with_length() {
        let snapshot = normalize(Some(query(PlaybackState::Playing, 1234, 200_000)));
        assert_eq!(
            snapshot,
            Snapshot::Playing(Track {
                artist: "Artist".to_string(),
                title: "Title".to_string(),
                position_ms: 1234,
                duration: TrackDuration::Known(200_000),
            })
        );
    }

    #[test]
    fn unknown_length_is_live() {
        let snapshot = normalize(Some(query(PlaybackState::Playing, 5000, 0)));
        assert_eq!(snapshot.track().map(|t| t.duration), Some(TrackDuration::Live));

        let snapshot = normalize(Some(query(PlaybackState::Playing, -1, -1)));
        let track = snapshot.track().cloned();
        assert_eq!(track.as_ref().map(|t| t.duration), Some(TrackDuration::Live));
        assert_eq!(track.map(|t| t.position_ms), Some(0));
    }

    #[test]
    fn missing_position_with_length_starts_at_zero() {
        let snapshot = normalize(Some(query(PlaybackState::Playing, -1, 200_000)));
        let track = snapshot.track().cloned();
        assert_eq!(track.as_ref().map(|t| t.position_ms), Some(0));
        assert_eq!(
            track.map(|t| t.duration),
            Some(TrackDuration::Known(200_000))
        );
    }

    #[test]
    fn playback_state_parses_mpris_status() {
        assert_eq!(PlaybackState::from_str("Playing").ok(), Some(PlaybackState::Playing));
        assert_eq!(PlaybackState::from_str("Paused").ok(), Some(PlaybackState::Paused));
        assert!(PlaybackState::from_str("Buffering").is_err());
    }
}
