use std::collections::HashMap;

use zbus::{Result, proxy, zvariant::OwnedValue};

#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait Player {
    /// `Playing`, `Paused` or `Stopped`
    #[zbus(property)]
    fn playback_status(&self) -> Result<String>;

    #[zbus(property)]
    fn metadata(&self) -> Result<HashMap<String, OwnedValue>>;

    /// Microseconds. Players do not emit change signals for this one.
    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> Result<i64>;
}
