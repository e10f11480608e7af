use airtouch_bridge::config::{load_env, Config};
use airtouch_bridge::devices::MemoryRegistry;
use airtouch_bridge::driver::memory::MemorySystem;
use airtouch_bridge::entities::base::UpdateCallback;
use airtouch_bridge::platform::setup_entities;
use airtouch_bridge::simulate::{generate_system, Simulator};
use airtouch_bridge::snapshot::{load_areas, load_snapshot};
use log::{error, info};
use std::path::PathBuf;
use std::rc::Rc;

/// Readings the simulator changes before the final state dump.
const SIMULATION_STEPS: usize = 5;

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env().map_err(|e| format!("invalid configuration: {}", e))?;
    info!(
        "Config loaded (allow_zone_hvac_mode_changes={}, min_target_temperature_step={}, \
         spill_bypass={:?}, spill_zones={:?})",
        cfg.options.allow_zone_hvac_mode_changes,
        cfg.options.min_target_temperature_step,
        cfg.options.spill_bypass,
        cfg.options.spill_zones().iter().map(|z| z.0).collect::<Vec<_>>(),
    );

    // 2) Discover the system
    let snapshot = match cfg.snapshot_file.as_deref() {
        Some(path) => {
            let snapshot = load_snapshot(path).map_err(|e| format!("loading snapshot failed: {}", e))?;
            info!("Loaded system snapshot from {}", path.display());
            snapshot
        }
        None => {
            info!("No snapshot configured; generating a system (seed={})", cfg.simulation_seed);
            generate_system(cfg.simulation_seed)
        }
    };
    info!(
        "Console {} ({}): {} AC(s), {} zone(s)",
        snapshot.console.name,
        snapshot.console.airtouch_id,
        snapshot.air_conditioners.len(),
        snapshot.zones.len()
    );
    let system = MemorySystem::from_snapshot(snapshot);

    // 3) Areas for device placement
    let areas = match cfg.areas_file.as_deref() {
        Some(path) => load_areas(path).map_err(|e| format!("loading areas failed: {}", e))?,
        None => Vec::new(),
    };
    let mut registry = MemoryRegistry::new(areas);

    // 4) Entities
    let mut entities = setup_entities(&system.handle(), &cfg.options, &mut registry);
    for device in registry.devices() {
        info!(
            "Device {} '{}' (area: {})",
            device.identifier,
            device.name,
            device.suggested_area.as_deref().unwrap_or("-")
        );
    }
    info!("Created {} entities", entities.len());

    let on_update: UpdateCallback = Rc::new(|unique_id: &str| info!("State changed: {}", unique_id));
    entities.attach_all(&on_update);

    // 5) Simulated activity
    let mut simulator = Simulator::new(cfg.simulation_seed);
    for _ in 0..SIMULATION_STEPS {
        simulator.step(&system);
    }

    for entity in entities.entities() {
        let state = serde_json::to_string(&entity.state()).map_err(|e| format!("rendering state failed: {}", e))?;
        println!("{}\t{}\t{}", entity.unique_id(), entity.name(), state);
    }

    entities.detach_all();
    Ok(())
}

fn env_file_from_cli() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args_os();
    args.next(); // skip program name

    let mut env_file: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        let path = match arg.to_str() {
            Some("--env-file") => args
                .next()
                .map(PathBuf::from)
                .ok_or_else(|| "`--env-file` requires a path argument".to_string())?,
            Some(s) if s.starts_with("--env-file=") => match &s["--env-file=".len()..] {
                "" => return Err("`--env-file` requires a path argument".to_string()),
                p => PathBuf::from(p),
            },
            Some("--") => break,
            Some(other) => return Err(format!("unrecognised argument: {}", other)),
            None => return Err("argument contains invalid UTF-8".to_string()),
        };
        if env_file.replace(path).is_some() {
            return Err("`--env-file` provided more than once".to_string());
        }
    }
    Ok(env_file)
}

fn main() {
    let loaded_env = match env_file_from_cli().and_then(|path| load_env(path).map_err(|e| e.to_string())) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(info) = loaded_env.as_ref() {
        let origin = if info.explicit { "CLI-specified" } else { "default" };
        info!("Environment loaded from {} .env file: {}", origin, info.path.display());
    }

    info!(
        "airtouch-bridge {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
