// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueHint};
use scara::core::Target;
use scara::Configurable;

mod config;
mod trace;

/// Angular rate per joint in degrees per second while sweeping.
const SWEEP_RATE: [f64; 3] = [30.0, 90.0, -90.0];

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "SCARA kinematic simulator", long_about = None)]
struct Args {
    /// Machine configuration file.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Target point as X,Y in the world frame.
    #[arg(short, long, value_name = "X,Y", allow_hyphen_values = true)]
    target: Vec<Target>,
    /// Number of random reachable targets.
    #[arg(long, default_value_t = 0)]
    random: usize,
    /// Joint step in degrees per tick.
    #[arg(long)]
    step: Option<f64>,
    /// Controller ticks per second.
    #[arg(long)]
    rate: Option<f64>,
    /// Sweep all joints for the given number of seconds.
    #[arg(long, value_name = "SECONDS")]
    sweep: Option<f64>,
    /// Write a JSON line per tick to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    trace: Option<PathBuf>,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bin_name = env!("CARGO_BIN_NAME");

    let mut machine = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            scara::MachineConfig::from_toml(&content)?
        }
        None => {
            let local_config = std::env::current_dir()?.join(scara::consts::CONFIG_FILE);

            // Try read configuration from global system location first, then from local directory.
            scara::MachineConfig::try_from_file([
                PathBuf::from(scara::consts::DEFAULT_CONFIG_PATH),
                local_config,
            ])?
        }
    };

    if let Some(step) = args.step {
        machine.motion.step_size = step;
    }
    if let Some(rate) = args.rate {
        machine.motion.tick_rate = rate;
    }
    machine.validate()?;

    let mut config = config::SimConfig {
        targets: args.target,
        random_targets: args.random,
        sweep: args.sweep,
        trace: args.trace,
        machine,
        global: scara::GlobalConfig::default(),
    };

    config.global.bin_name = bin_name.to_string();
    config.global.daemon = args.daemon;

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    log::info!("{}", banner(&config));

    if config.global().daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);
    log::info!("{}", config.machine);

    tokio::select! {
        result = daemonize(&config) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Termination requested");
            Ok(())
        }
    }
}

fn banner<C: Configurable>(config: &C) -> String {
    format!("{} {}", config.global().bin_name, scara::consts::VERSION)
}

/// Draw targets inside the reachable annulus of a two link arm.
fn random_targets(machine: &scara::MachineConfig, count: usize) -> Vec<Target> {
    use rand::Rng;

    if count == 0 {
        return vec![];
    }

    let (l1, l2) = match machine.links[..] {
        [ref l1, ref l2] => (l1.length, l2.length),
        _ => {
            log::warn!("Random targets require a two link arm");
            return vec![];
        }
    };

    let ik = scara::algorithm::InverseKinematics::new(l1, l2);
    let (min, max) = ik.reach();
    let base = machine.base_point();

    // Keep clear of the annulus edges where the elbow is singular.
    let margin = (max - min) * 0.01;

    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| {
            let radius = rng.gen_range((min + margin)..=(max - margin));
            let angle: f64 = rng.gen_range(-180.0..180.0);

            let point = scara::math::polar(&base, radius, angle);
            Target::new(point)
        })
        .collect()
}

async fn daemonize(config: &config::SimConfig) -> anyhow::Result<()> {
    let chain = config.machine.build_chain()?;
    log::info!("Chain {:?}", chain);

    let mut controller = scara::Controller::new(chain, config.machine.motion.step_size)?;

    let mut tracer = config
        .trace
        .as_deref()
        .map(trace::TraceWriter::create)
        .transpose()?;

    let mut interval =
        tokio::time::interval(Duration::from_secs_f64(1.0 / config.machine.motion.tick_rate));
    let mut tick = 0_u64;

    if let Some(seconds) = config.sweep {
        let dt = 1.0 / config.machine.motion.tick_rate;
        let start = controller.chain().local_angles();

        while (tick as f64) * dt < seconds {
            interval.tick().await;
            tick += 1;

            let elapsed = tick as f64 * dt;
            for (index, angle) in start.iter().enumerate() {
                let rate = SWEEP_RATE[index % SWEEP_RATE.len()];
                controller
                    .chain_mut()
                    .rotate_joint(index, angle + rate * elapsed)?;
            }

            log::debug!("Tick {} {:?}", tick, controller.chain());

            if let Some(tracer) = tracer.as_mut() {
                tracer.record(tick, false, controller.chain())?;
            }
        }
    }

    let mut targets = config.targets.clone();
    targets.extend(random_targets(&config.machine, config.random_targets));

    for target in targets {
        if let Err(e) = controller.move_to(&target) {
            log::error!("{}: {}", target, e);
            continue;
        }

        loop {
            interval.tick().await;
            tick += 1;

            let complete = controller.tick();

            log::debug!("Tick {} {:?}", tick, controller.chain());

            if let Some(tracer) = tracer.as_mut() {
                tracer.record(tick, complete, controller.chain())?;
            }

            if complete {
                break;
            }
        }

        log::info!("Reached {} at {}", target, controller.chain());
    }

    if let Some(tracer) = tracer.as_mut() {
        tracer.flush()?;
    }

    println!("{}", controller.chain());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        let config = scara::GlobalConfig {
            bin_name: "scara-sim".to_string(),
            daemon: false,
        };

        assert_eq!(
            banner(&config),
            format!("scara-sim {}", scara::consts::VERSION)
        );
    }
}
