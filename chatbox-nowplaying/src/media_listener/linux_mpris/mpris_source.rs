use std::{collections::HashMap, str::FromStr, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;
use zbus::{Connection, fdo::DBusProxy, proxy::CacheProperties};

use super::{media_player2::MediaPlayer2Proxy, metadata::Metadata, player::PlayerProxy};
use crate::{
    error::MediaError,
    media_events::{MediaQuery, PlaybackState},
    media_listener::MediaSource,
};

const MPRIS2_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Polls MPRIS players on the session bus.
pub struct MprisSource {
    connection: Connection,
    dbus_proxy: DBusProxy<'static>,
    preferred_player: Option<String>,
    identities: HashMap<String, String>,
    first_query_logged: bool,
}

impl MprisSource {
    pub async fn connect(preferred_player: Option<String>) -> Result<Self, MediaError> {
        let connection = Connection::session().await?;
        let dbus_proxy = DBusProxy::new(&connection).await?;

        Ok(Self {
            connection,
            dbus_proxy,
            preferred_player: preferred_player.map(|p| p.to_lowercase()),
            identities: HashMap::new(),
            first_query_logged: false,
        })
    }

    async fn identity(&mut self, dbus_name: &str) -> String {
        if let Some(identity) = self.identities.get(dbus_name) {
            return identity.clone();
        }

        let identity = get_identity(&self.connection, dbus_name).await;
        self.identities
            .insert(dbus_name.to_string(), identity.clone());
        identity
    }

    async fn query_player(&self, dbus_name: &str) -> Result<MediaQuery, MediaError> {
        let player_proxy = PlayerProxy::builder(&self.connection)
            .destination(dbus_name.to_string())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;

        let playback_status = player_proxy.playback_status().await?;
        let state = PlaybackState::from_str(&playback_status).unwrap_or(PlaybackState::Other);

        let metadata = Metadata::from(player_proxy.metadata().await.unwrap_or_default());

        // some players do not implement Position at all
        let position_ms = player_proxy.position().await.map(us_to_ms).unwrap_or(-1);

        let duration_ms = metadata
            .length_in_microseconds()
            .map(us_to_ms)
            .unwrap_or(0);

        Ok(MediaQuery {
            state,
            title: metadata.title().unwrap_or_default().to_string(),
            artist: metadata.first_artist().unwrap_or_default(),
            position_ms,
            duration_ms,
        })
    }
}

#[async_trait(?Send)]
impl MediaSource for MprisSource {
    async fn fetch(&mut self) -> Result<Option<MediaQuery>, MediaError> {
        let dbus_names: Vec<String> = self
            .dbus_proxy
            .list_names()
            .await
            .map_err(zbus::Error::from)?
            .into_iter()
            .map(|name| name.to_string())
            .filter(|name| name.starts_with(MPRIS2_PREFIX))
            .collect();

        let mut players = Vec::with_capacity(dbus_names.len());
        for dbus_name in dbus_names {
            let identity = self.identity(&dbus_name).await;
            players.push((dbus_name, identity));
        }

        self.identities
            .retain(|name, _| players.iter().any(|(n, _)| n == name));

        let Some(chosen) = choose_player(&players, self.preferred_player.as_deref()) else {
            return Ok(None);
        };

        let query = self.query_player(chosen).await?;

        if !self.first_query_logged {
            self.first_query_logged = true;
            debug!(
                "Players: {:?}, chose {chosen}, status {}, query {:?}",
                players.iter().map(|(name, _)| name).collect::<Vec<_>>(),
                query.state,
                query
            );
        }

        Ok(Some(query))
    }
}

async fn get_identity(connection: &Connection, dbus_name: &str) -> String {
    let media_player2_proxy = match MediaPlayer2Proxy::builder(connection)
        .destination(dbus_name.to_string())
    {
        Ok(builder) => match builder.cache_properties(CacheProperties::No).build().await {
            Ok(proxy) => proxy,
            Err(_) => return String::new(),
        },
        Err(_) => return String::new(),
    };

    // some chromium instances await forever for identity

    match timeout(Duration::from_millis(200), media_player2_proxy.identity()).await {
        Ok(Ok(id)) => id,
        _ => String::new(),
    }
}

/// MPRIS reports times in microseconds. Truncates toward zero.
fn us_to_ms(us: i64) -> i64 {
    us / 1000
}

/// Picks the player to display: the first whose bus name or identity contains
/// `preferred` (already lower-cased), otherwise the first one listed.
fn choose_player<'a>(players: &'a [(String, String)], preferred: Option<&str>) -> Option<&'a str> {
    let preferred_match = preferred.and_then(|preferred| {
        players.iter().find(|(name, identity)| {
            name.to_lowercase().contains(preferred) || identity.to_lowercase().contains(preferred)
        })
    });

    preferred_match
        .or_else(|| players.first())
        .map(|(name, _)| name.as_str())
}
