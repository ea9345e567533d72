mod engine;
mod services;
mod utils;

use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;

use engine::animation_loop::AnimationLoop;
use engine::assets::{AssetManifest, AssetStreamer};
use engine::capability::{Fallback, RenderCapability};
use engine::cli::{Cli, CliCommand};
use engine::config::AppConfig;
use engine::console::{Console, ConsoleBackend};
use engine::preferences::PreferenceStore;
use engine::scene::CameraStateTable;
use engine::windowing::Windowing;
use engine::{EngineError, SceneRuntime};
use services::{CmsClient, ContactClient, ContactForm, NewsletterClient, Telemetry};

const WORKER_FRAME: Duration = Duration::from_millis(16);
const CONSOLE_DT: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    utils::logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading config")?;

    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let http = services::http_client(Duration::from_secs(config.services.timeout_secs))?;
    let telemetry = Telemetry::new(config.services.telemetry_url.clone(), http.clone());

    match cli.command() {
        CliCommand::Run => {
            // Telemetry spawns onto this runtime from the host thread.
            let _guard = tokio_rt.enter();
            run_host(&config, telemetry)
        }
        CliCommand::Route {
            paths,
            scroll,
            frames,
            dt,
        } => run_route(&config, &paths, scroll, frames, dt),
        CliCommand::Scenes => {
            let table = CameraStateTable::default();
            let scenes: Vec<_> = table
                .entries()
                .into_iter()
                .map(|(scene, pose)| serde_json::json!({ "scene": scene, "pose": pose }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&scenes)?);
            Ok(())
        }
        CliCommand::Page { slug } => {
            let cms = CmsClient::new(http, config.services.cms_url.clone(), config.services.cms_token.clone());
            let page = tokio_rt.block_on(cms.fetch_page(&slug));
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(())
        }
        CliCommand::Subscribe { email } => {
            let client = NewsletterClient::new(
                http,
                config.services.newsletter_url.clone(),
                config.services.newsletter_key.clone(),
            );
            if !tokio_rt.block_on(client.subscribe(&email)) {
                bail!("subscription failed, please try again later");
            }
            println!("subscribed {}", email.trim());
            Ok(())
        }
        CliCommand::Contact {
            name,
            email,
            company,
            budget,
            message,
        } => {
            let client = ContactClient::new(
                http,
                config.services.email_url.clone(),
                config.services.email_token.clone(),
                config.services.contact_recipient.clone(),
            );
            let form = ContactForm {
                name,
                email,
                company,
                budget,
                message,
            };
            if !tokio_rt.block_on(client.submit(&form)) {
                bail!("message not sent");
            }
            println!("message sent");
            Ok(())
        }
    }
}

/// Windowed host with a stdin console. Falls back to a console-only host
/// when the machine cannot show the scene.
fn run_host(config: &AppConfig, telemetry: Telemetry) -> anyhow::Result<()> {
    let mut runtime = SceneRuntime::with_defaults(&config.scene, config.quality.clone())
        .with_telemetry(telemetry.clone());
    if let Some(path) = PreferenceStore::default_path() {
        runtime = runtime.with_preferences(PreferenceStore::open(path));
    }

    if let Some(manifest) = &config.assets.manifest {
        match AssetManifest::from_file(manifest) {
            Ok(manifest) => {
                let report = AssetStreamer::new(telemetry.clone()).load_all(&manifest);
                if !report.failed.is_empty() {
                    log::warn!("{} of {} assets failed to load", report.failed.len(), report.total);
                }
            }
            Err(e) => {
                log::error!("asset manifest unusable: {e}");
                telemetry.capture_exception("asset_manifest", e.to_string());
            }
        }
    }

    let worker = runtime.spawn_worker(WORKER_FRAME)?;
    let console = match Console::spawn() {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("console unavailable: {e}");
            None
        }
    };

    let size = (config.scene.window_width, config.scene.window_height);
    let host = if config.scene.force_fallback {
        Ok(())
    } else {
        match Windowing::run_app(&mut runtime, size, console.as_ref()) {
            Err(e @ (EngineError::EventLoop(_) | EngineError::Window(_))) => Err(e.to_string()),
            Err(e) => return Err(e.into()),
            Ok(()) => Ok(()),
        }
    };

    let capability = RenderCapability::assess(config.scene.force_fallback, host);
    if let RenderCapability::Unsupported { reason } = &capability {
        let fallback = Fallback::new(config.scene.fallback_url.clone(), reason.clone());
        log::warn!(
            "3D scene unavailable ({}); fallback experience at {}",
            fallback.reason,
            fallback.destination(runtime.navigation().current_path())
        );
        telemetry.capture_exception("render_capability", reason.clone());
        if let Some(console) = &console {
            run_console_host(&mut runtime, console, &fallback);
        }
    }

    runtime.detach_worker();
    let report = worker.join()?;
    log::debug!(
        "render worker: {} frames, last pose v{:?}",
        report.frames,
        report.observed_versions.last()
    );
    Ok(())
}

/// Console-only host: each command is followed by frames until the scene settles.
fn run_console_host(runtime: &mut SceneRuntime, console: &Console, fallback: &Fallback) {
    let mut backend = ConsoleBackend::new();
    println!("console mode, type 'help' (fallback site: {})", fallback.url);

    while let Some(line) = console.recv() {
        let reply = backend.exec(runtime, &line);
        for l in &reply.lines {
            println!("{l}");
        }
        if reply.quit {
            break;
        }
        if AnimationLoop::new(runtime, CONSOLE_DT).settle(3600, 1e-3).is_none() {
            log::debug!("scene still moving after a minute of frames");
        }
    }
}

/// Headless navigation run; prints every commit and the final status as JSON.
fn run_route(
    config: &AppConfig,
    paths: &[String],
    scroll: f32,
    frames: u64,
    dt: f32,
) -> anyhow::Result<()> {
    if !(dt > 0.0) || !dt.is_finite() {
        bail!("--dt must be a positive number of seconds");
    }
    if !scroll.is_finite() || scroll < 0.0 {
        bail!("--scroll must be a non-negative number of pixels");
    }

    let mut runtime = SceneRuntime::with_defaults(&config.scene, config.quality.clone());
    runtime.scroll_mut().set_offset(scroll);

    let mut commits = Vec::new();
    for path in paths {
        runtime.navigate(path.as_str());
        commits.extend(AnimationLoop::new(&mut runtime, dt).run_frames(frames));
    }

    let out = serde_json::json!({
        "commits": commits,
        "status": runtime.status(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
