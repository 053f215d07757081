use std::str::FromStr;

use strum::EnumString;

use crate::{
    error::RenderError,
    media_events::{Track, TrackDuration},
};

/// Longest message the chatbox accepts, in characters.
pub const MAX_CHATBOX_CHARS: usize = 144;

/// Shown instead of `position/length` for streams without a length.
pub const LIVE_MARKER: &str = "LIVE";

#[derive(EnumString, strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Placeholder {
    SongPosition,
    SongArtist,
    SongTitle,
}

impl Placeholder {
    fn value(self, track: &Track, displayed_ms: u64) -> String {
        match self {
            Placeholder::SongArtist => track.artist.clone(),
            Placeholder::SongTitle => track.title.clone(),
            Placeholder::SongPosition => match track.duration {
                TrackDuration::Known(total) => format!(
                    "{}/{}",
                    ms_to_time_string(displayed_ms),
                    ms_to_time_string(total)
                ),
                TrackDuration::Live => LIVE_MARKER.to_string(),
            },
        }
    }
}

/// `M:SS`, minutes unpadded and never rolled over into hours.
pub fn ms_to_time_string(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Fills a playing template. Every `{name}` naming a [`Placeholder`] is
/// replaced; anything else in braces is kept as written. Substituted text is
/// not scanned again.
pub fn render_playing(
    template: &str,
    track: Option<&Track>,
    displayed_ms: u64,
) -> Result<String, RenderError> {
    let track = track.ok_or(RenderError::MissingTrack)?;

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let placeholder = after_open
            .find('}')
            .and_then(|close| Some((Placeholder::from_str(&after_open[..close]).ok()?, close)));

        match placeholder {
            Some((placeholder, close)) => {
                out.push_str(&placeholder.value(track, displayed_ms));
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);

    check_length(out)
}

/// Not-playing templates are sent as written.
pub fn render_idle(template: &str) -> Result<String, RenderError> {
    check_length(template.to_string())
}

fn check_length(text: String) -> Result<String, RenderError> {
    let len = text.chars().count();
    if len > MAX_CHATBOX_CHARS {
        return Err(RenderError::TooLong {
            len,
            limit: MAX_CHATBOX_CHARS,
        });
    }
    Ok(text)
}
