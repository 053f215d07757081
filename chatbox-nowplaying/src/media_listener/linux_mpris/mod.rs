mod media_player2;
mod metadata;
mod mpris_source;
mod player;

pub use mpris_source::MprisSource;
