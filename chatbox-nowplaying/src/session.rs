use tracing::{debug, info};

use crate::{
    error::RenderError,
    media_events::Snapshot,
    position_tracker::PositionTracker,
    render::{render_idle, render_playing},
    templates::{Mode, ROTATE_EVERY_TICKS, TemplateSet, select},
};

/// All state that survives between polls.
#[derive(Debug, Default)]
pub struct Session {
    tick_counter: u64,
    tracker: PositionTracker,
    last_track_title: Option<String>,
    last_logged_title: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Runs one tick of the pipeline for `snapshot` and returns the status to
    /// send. The tick counter advances whether or not rendering succeeds.
    pub fn render(
        &mut self,
        snapshot: &Snapshot,
        templates: &TemplateSet,
    ) -> Result<String, RenderError> {
        let result = self.render_tick(snapshot, templates);
        self.tick_counter += 1;
        result
    }

    fn render_tick(
        &mut self,
        snapshot: &Snapshot,
        templates: &TemplateSet,
    ) -> Result<String, RenderError> {
        self.log_transition(snapshot);

        let mode = match snapshot {
            Snapshot::Playing(_) => Mode::Playing,
            Snapshot::NotPlaying => Mode::NotPlaying,
        };

        let list = templates.list(mode);
        if self.tick_counter % ROTATE_EVERY_TICKS == 0 {
            debug!(
                "Progressing template... {} / {}",
                select(self.tick_counter, list.len()) + 1,
                list.len()
            );
        }

        let template = templates.template(mode, self.tick_counter);

        match snapshot {
            Snapshot::Playing(track) => {
                if self.last_track_title.as_deref() != Some(track.title.as_str()) {
                    self.tracker.reset();
                    self.last_track_title = Some(track.title.clone());
                }
                let displayed = self.tracker.advance(track.position_ms);
                render_playing(template, Some(track), displayed)
            }
            Snapshot::NotPlaying => render_idle(template),
        }
    }

    fn log_transition(&mut self, snapshot: &Snapshot) {
        match snapshot {
            Snapshot::Playing(track) => {
                if self.last_logged_title.as_deref() != Some(track.title.as_str()) {
                    info!("Playing {} by {}...", track.title, track.artist);
                    // an empty title counts as nothing logged
                    self.last_logged_title = Some(track.title.clone()).filter(|t| !t.is_empty());
                }
            }
            Snapshot::NotPlaying => {
                if self.last_logged_title.take().is_some() {
                    info!("Playing has stopped...");
                }
            }
        }
    }

    pub fn last_logged_title(&self) -> Option<&str> {
        self.last_logged_title.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_events::{Track, TrackDuration};

    fn templates() -> TemplateSet {
        TemplateSet::new(
            vec!["{song_artist} - {song_title} ({song_position})".to_string()],
            vec!["Nothing playing".to_string(), "...".to_string()],
        )
        .unwrap()
    }

    fn playing(title: &str, position_ms: u64) -> Snapshot {
        Snapshot::Playing(Track {
            artist: "A".to_string(),
            title: title.to_string(),
            position_ms,
            duration: TrackDuration::Known(200_000),
        })
    }

    #[test]
    fn first_playing_tick() {
        let mut session = Session::new();
        let out = session.render(&playing("T", 0), &templates());
        assert_eq!(out, Ok("A - T (0:00/3:20)".to_string()));
        assert_eq!(session.tick_counter(), 1);
    }

    #[test]
    fn not_playing_rotation() {
        let mut session = Session::new();
        let set = templates();
        let out: Vec<String> = (0..6)
            .map(|_| session.render(&Snapshot::NotPlaying, &set).unwrap())
            .collect();

        assert_eq!(
            out,
            vec![
                "Nothing playing",
                "Nothing playing",
                "Nothing playing",
                "Nothing playing",
                "Nothing playing",
                "...",
            ]
        );
    }

    #[test]
    fn stale_position_keeps_counting() {
        let mut session = Session::new();
        let set = templates();
        let out: Vec<String> = (0..3)
            .map(|_| session.render(&playing("T", 60_000), &set).unwrap())
            .collect();

        assert_eq!(
            out,
            vec![
                "A - T (1:00/3:20)",
                "A - T (1:01/3:20)",
                "A - T (1:03/3:20)",
            ]
        );
    }

    #[test]
    fn tracker_survives_not_playing() {
        let mut session = Session::new();
        let set = templates();
        session.render(&playing("T", 60_000), &set).unwrap();
        session.render(&Snapshot::NotPlaying, &set).unwrap();
        assert_eq!(session.tracker().displayed_ms(), Some(60_000));

        let out = session.render(&playing("T", 60_000), &set);
        assert_eq!(out, Ok("A - T (1:01/3:20)".to_string()));
    }

    #[test]
    fn new_title_restarts_position() {
        let mut session = Session::new();
        let set = templates();
        for _ in 0..4 {
            session.render(&playing("One", 0), &set).unwrap();
        }

        let out = session.render(&playing("Two", 0), &set);
        assert_eq!(out, Ok("A - Two (0:00/3:20)".to_string()));

        let out = session.render(&playing("Two", 0), &set);
        assert_eq!(out, Ok("A - Two (0:01/3:20)".to_string()));
    }

    #[test]
    fn live_stream_then_track_at_zero() {
        let mut session = Session::new();
        let set = templates();
        let live = Snapshot::Playing(Track {
            artist: "A".to_string(),
            title: "Radio".to_string(),
            position_ms: 0,
            duration: TrackDuration::Live,
        });
        session.render(&live, &set).unwrap();
        session.render(&live, &set).unwrap();

        let out = session.render(&playing("T", 0), &set);
        assert_eq!(out, Ok("A - T (0:00/3:20)".to_string()));
    }

    #[test]
    fn same_title_after_pause_keeps_tracker() {
        let mut session = Session::new();
        let set = templates();
        session.render(&playing("T", 30_000), &set).unwrap();
        session.render(&Snapshot::NotPlaying, &set).unwrap();
        session.render(&Snapshot::NotPlaying, &set).unwrap();

        assert_eq!(session.tracker().last_reported_ms(), Some(30_000));
        let out = session.render(&playing("T", 30_000), &set);
        assert_eq!(out, Ok("A - T (0:31/3:20)".to_string()));
    }

    #[test]
    fn empty_title_is_never_remembered() {
        let mut session = Session::new();
        let set = templates();
        session.render(&playing("", 0), &set).unwrap();
        assert_eq!(session.last_logged_title(), None);

        session.render(&playing("", 0), &set).unwrap();
        assert_eq!(session.last_logged_title(), None);

        session.render(&Snapshot::NotPlaying, &set).unwrap();
        assert_eq!(session.last_logged_title(), None);
    }

    #[test]
    fn title_bookkeeping() {
        let mut session = Session::new();
        let set = templates();
        assert_eq!(session.last_logged_title(), None);

        session.render(&playing("One", 0), &set).unwrap();
        assert_eq!(session.last_logged_title(), Some("One"));

        session.render(&playing("Two", 0), &set).unwrap();
        assert_eq!(session.last_logged_title(), Some("Two"));

        session.render(&Snapshot::NotPlaying, &set).unwrap();
        assert_eq!(session.last_logged_title(), None);
    }

    #[test]
    fn overlong_render_still_counts_the_tick() {
        let mut session = Session::new();
        let set = templates();
        let snapshot = Snapshot::Playing(Track {
            artist: "A".repeat(200),
            title: "T".to_string(),
            position_ms: 0,
            duration: TrackDuration::Live,
        });

        assert!(matches!(
            session.render(&snapshot, &set),
            Err(RenderError::TooLong { .. })
        ));
        assert_eq!(session.tick_counter(), 1);
    }
}
