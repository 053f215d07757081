use std::future::Future;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::{
    POLL_INTERVAL,
    error::RenderError,
    media_events::{Snapshot, normalize},
    media_listener::MediaSource,
    osc::ChatboxSink,
    session::Session,
    templates::TemplateStore,
};

/// One full tick: fetch, normalize, render and send.
///
/// Fetch and send failures are logged and absorbed; only render contract
/// violations come back as errors.
pub async fn poll_once(
    source: &mut (impl MediaSource + ?Sized),
    chatbox: &(impl ChatboxSink + ?Sized),
    session: &mut Session,
    templates: &mut TemplateStore,
) -> Result<(), RenderError> {
    let snapshot = match source.fetch().await {
        Ok(query) => normalize(query),
        Err(e) => {
            warn!("Media query failed: {e}");
            Snapshot::NotPlaying
        }
    };

    let status = session.render(&snapshot, templates.current())?;

    if let Err(e) = chatbox.send(&status).await {
        warn!("Failed to send chatbox status: {e}");
    }

    Ok(())
}

/// Polls every [`POLL_INTERVAL`] until `shutdown` resolves.
///
/// Each poll finishes before the next tick is taken; ticks missed while a
/// poll was slow are skipped rather than queued.
pub async fn run(
    source: &mut (impl MediaSource + ?Sized),
    chatbox: &(impl ChatboxSink + ?Sized),
    session: &mut Session,
    templates: &mut TemplateStore,
    shutdown: impl Future<Output = ()>,
) -> Result<(), RenderError> {
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutting down after {} polls", session.tick_counter());
                return Ok(());
            }

            _ = ticker.tick() => {
                poll_once(&mut *source, chatbox, &mut *session, &mut *templates).await?;
            }
        }
    }
}
