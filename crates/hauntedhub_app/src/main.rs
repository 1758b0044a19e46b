// SPDX-License-Identifier: MIT OR Apache-2.0
//! HauntedHub headless runner.
//!
//! Loads settings and assets, knocks on the door three times and plays the
//! cinematic at 60 fps until a mini-game is entered.
//!
//! Usage: `hauntedhub [settings.ron]`

use futures::future::OptionFuture;
use hauntedhub_app::settings::SETTINGS_FILE_NAME;
use hauntedhub_app::{
    load_hand_model, AssetStatus, AudioCoordinator, DoorInput, FrameClock, Hub, HubError,
    HubSettings, LogNavigator, Result,
};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Clock times of the simulated knocks
const KNOCKS: [f64; 3] = [0.25, 0.75, 1.25];

/// Give up if nothing navigated by then
const RUN_TIMEOUT_SECS: f64 = 30.0;

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "hauntedhub_app=debug".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HauntedHub v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Hub crashed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME));
    let settings = HubSettings::load_or_default(&settings_path)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(HubError::Runtime)?;

    let mut hub = Hub::from_settings(
        &settings,
        AudioCoordinator::with_default_backend(),
        Box::new(LogNavigator::new()),
    )?;

    let sounds: IndexMap<String, PathBuf> = settings
        .sounds
        .iter()
        .map(|(name, path)| (name.clone(), settings.resolve(path)))
        .collect();
    let sound_load = hub.audio_mut().load_sounds(&sounds);
    let hand_ticket = hub.begin_hand_load();
    let hand_load: OptionFuture<_> = settings
        .hand_model
        .as_ref()
        .map(|path| load_hand_model(settings.resolve(path)))
        .into();

    let (loaded, hand) = runtime.block_on(async { futures::join!(sound_load, hand_load) });
    let installed = hub.audio_mut().install(loaded);
    tracing::info!("Loaded {} of {} sounds", installed, sounds.len());

    let hand = hand.unwrap_or_else(|| AssetStatus::Fallback("no hand model configured".into()));
    hub.finish_hand_load(hand_ticket, hand);
    tracing::info!("Hand visual: {:?}", hub.hand_visual());

    let frame = Duration::from_secs_f64(1.0 / 60.0);
    let mut clock = FrameClock::new();
    let mut knocks = KNOCKS.iter().copied().peekable();

    loop {
        clock.tick();
        let now = clock.now();

        if let Some(at) = knocks.peek().copied() {
            if now >= at {
                knocks.next();
                let outcome = hub.handle_input(DoorInput::Click, now);
                tracing::info!("Knock at {:.2}s: {:?}", now, outcome);
            }
        }

        if let Some(game) = hub.frame(now) {
            tracing::info!(
                "Entered {} at {} after {} frames",
                game.display_name,
                game.route(),
                clock.frame_count()
            );
            break;
        }

        if clock.frame_count() % 30 == 0 {
            tracing::debug!("{:.2}s: {}", now, hub.door_label());
        }

        if now > RUN_TIMEOUT_SECS {
            tracing::warn!("No navigation after {}s; giving up", RUN_TIMEOUT_SECS);
            break;
        }

        std::thread::sleep(frame);
    }

    hub.shutdown();
    Ok(())
}
