// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod status;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile, DEFAULT_CONFIG_TOML};
use crate::dispatch::Dispatcher;
use crate::engine::{
    activity_channel, shutdown_channel, Debouncer, WatchEvent, WatchRuntime, HANDOFF_CAPACITY,
};
use crate::exec::CommandPublisher;
use crate::status::{build_notifier, emit, Notifier};
use crate::types::{Batch, StatusCode};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - status notifier
/// - file watcher -> debounce runtime -> dispatcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    if args.print_default_config {
        print!("{DEFAULT_CONFIG_TOML}");
        return Ok(());
    }

    let config_path = PathBuf::from(&args.config);
    info!(path = ?config_path, "loading config");
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let notifier = build_notifier(&cfg.notify);

    if let Some(code) = args.send_status {
        notifier.notify(code).await?;
        return Ok(());
    }

    let (shutdown_trigger, shutdown) = shutdown_channel();
    let (activity, probe) = activity_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel::<WatchEvent>();
    let (batch_tx, batch_rx) = mpsc::channel::<Batch>(HANDOFF_CAPACITY);

    // Without its event source there is nothing to debounce; fail fast.
    let watcher = watch::spawn_watcher(&cfg.watch, events_tx)
        .with_context(|| format!("watching {}", cfg.watch.root.display()))?;

    let publisher = CommandPublisher::new(cfg.publish.clone());
    let dispatcher = Dispatcher::new(cfg.dispatch.clone(), publisher, notifier.clone(), probe)?;
    let dispatcher_task = tokio::spawn(dispatcher.run(batch_rx, shutdown.clone()));

    // Ctrl-C → graceful shutdown. The trigger stays alive in this scope even
    // if the signal listener fails, since a dropped trigger means shutdown.
    let shutdown_trigger = Arc::new(shutdown_trigger);
    {
        let trigger = Arc::clone(&shutdown_trigger);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl-C received; shutting down");
            trigger.trigger();
        });
    }

    emit(&notifier, StatusCode::WaitStart).await;

    let runtime = WatchRuntime::new(
        Debouncer::new(cfg.debounce.gap),
        cfg.debounce.tick,
        events_rx,
        batch_tx,
        notifier.clone(),
        activity,
        shutdown,
    );

    if let Err(err) = runtime.run().await {
        error!(error = %err, "debounce runtime failed");
    }

    // Stop watching; this also closes the event channel.
    drop(watcher);

    // The runtime owned the batch sender, so the dispatcher sees a closed
    // channel once its current batch is done.
    match dispatcher_task.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(error = %err, "dispatcher failed"),
        Err(err) => warn!(error = %err, "dispatcher task panicked"),
    }

    drop(shutdown_trigger);
    info!("sharepush exiting");
    Ok(())
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("sharepush dry-run");
    println!("  watch.root = {}", cfg.watch.root.display());
    println!("  watch.recursive = {}", cfg.watch.recursive);
    if !cfg.watch.exclude.is_empty() {
        println!("  watch.exclude = {:?}", cfg.watch.exclude);
    }
    println!(
        "  debounce: gap = {} ticks, tick = {:?}",
        cfg.debounce.gap, cfg.debounce.tick
    );
    println!("  dispatch.destinations = {:?}", cfg.dispatch.destinations);
    println!(
        "  dispatch delays: pre = {:?}, post = {:?}, tail = {:?}",
        cfg.dispatch.pre_upload_delay, cfg.dispatch.post_upload_delay, cfg.dispatch.tail_delay
    );
    println!(
        "  dispatch.notify_per_file_failure = {}",
        cfg.dispatch.notify_per_file_failure
    );
    println!(
        "  publish: {} -p {} -t {} -u {} (timeout {:?})",
        cfg.publish.program,
        cfg.publish.endpoint,
        cfg.publish.tenant,
        cfg.publish.user,
        cfg.publish.timeout
    );
    println!("  notify.udp = {:?}", cfg.notify.udp);
    println!("  notify.tcp = {:?}", cfg.notify.tcp);
}
