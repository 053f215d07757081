use std::collections::HashMap;

use zbus::zvariant::{Array, OwnedValue};

/// A structured view of the MPRIS `Metadata` property.
///
/// * [MPRIS2 `Metadata_Map` type][metadata_map]
/// * [MPRIS v2 metadata guidelines][metadata_guidelines]
///
/// [metadata_map]: https://specifications.freedesktop.org/mpris-spec/latest/Track_List_Interface.html#Mapping:Metadata_Map
/// [metadata_guidelines]: https://www.freedesktop.org/wiki/Specifications/mpris-spec/metadata/
#[derive(Debug, Default, Clone)]
pub struct Metadata {
    values: HashMap<String, OwnedValue>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&OwnedValue> {
        self.values.get(key)
    }

    /// A list of artists of the track.
    ///
    /// Based on `xesam:artist`
    /// > The track artist(s).
    pub fn artists(&self) -> Option<Vec<String>> {
        self.get("xesam:artist")
            .and_then(|v| v.downcast_ref::<Array>().ok())
            .and_then(|v| Vec::<String>::try_from(v).ok())
    }

    /// The first artist, which is what gets displayed.
    pub fn first_artist(&self) -> Option<String> {
        self.artists().and_then(|artists| artists.into_iter().next())
    }

    /// The duration of the track, in microseconds
    ///
    /// Based on `mpris:length`. Some players send it signed, some unsigned.
    pub fn length_in_microseconds(&self) -> Option<i64> {
        self.get("mpris:length").and_then(|v| {
            if let Ok(val) = v.downcast_ref::<i64>() {
                Some(val)
            } else if let Ok(val) = v.downcast_ref::<u64>() {
                i64::try_from(val).ok()
            } else {
                None
            }
        })
    }

    /// The name of the track.
    ///
    /// Based on `xesam:title`
    /// > The track title.
    pub fn title(&self) -> Option<&str> {
        self.get("xesam:title")
            .and_then(|v| v.downcast_ref::<&str>().ok())
    }
}

impl From<HashMap<String, OwnedValue>> for Metadata {
    fn from(values: HashMap<String, OwnedValue>) -> Self {
        Metadata { values }
    }
}
