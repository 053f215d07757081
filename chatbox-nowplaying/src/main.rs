use anyhow::{Context, Result};
use chatbox_nowplaying::{
    config::Config, logging, media_listener::platform_source, osc::OscChatbox, poll_loop,
    session::Session, templates::TemplateStore,
};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    run().await
}

async fn run() -> Result<()> {
    info!("chatbox-nowplaying starting on {}", std::env::consts::OS);

    let config = Config::load().context("loading settings")?;

    let mut templates = TemplateStore::open(&config.templates_path, config.reload_templates)
        .context("loading templates")?;

    let osc_addr = config.osc_addr()?;
    let chatbox = OscChatbox::connect(osc_addr)
        .await
        .context("opening OSC socket")?;

    let mut source = platform_source(&config)
        .await
        .context("opening media source")?;

    let mut session = Session::new();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    poll_loop::run(
        source.as_mut(),
        &chatbox,
        &mut session,
        &mut templates,
        shutdown,
    )
    .await?;

    Ok(())
}
