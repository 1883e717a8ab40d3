//! blast-probe: sets off a preset on an ASCII station map and reports what it did.
//!
//! Usage:
//!   blast-probe run --map station.txt --preset grenade --at 6,4 --crew 7,4
//!   blast-probe presets --presets custom_presets.json

use std::path::{Path, PathBuf};
use std::process;

use glam::IVec2;

use blastwave_core::components::{EmpReceiver, Integrity, Vitals};
use blastwave_core::config::PresetCatalog;
use blastwave_core::enums::{OverlayKind, TileKind};
use blastwave_core::events::EffectEvent;
use blastwave_core::state::EngineSnapshot;
use blastwave_grid::TileMap;
use blastwave_sim::{world_setup, PropagationEngine, SimConfig};

/// Upper bound on ticks before giving up on completion (60 s at 30 Hz).
const MAX_TICKS: u32 = 1800;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "presets" => cmd_presets(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "blast-probe: BLASTWAVE propagation probe\n\
         \n\
         Commands:\n\
         \n\
         run       Trigger a preset on a map and run it to completion\n\
         \n\
           --map <path>       ASCII map (. floor, # wall, = window, D/d door, _ space)\n\
           --preset <id>      Preset to trigger\n\
           --at <x,y>         Origin cell\n\
           --presets <path>   Preset catalog JSON (optional, default: built-in)\n\
           --seed <N>         RNG seed (optional, default: 42)\n\
           --crew <x,y>       Place a crew member (repeatable)\n\
           --machine <x,y>    Place a machine (repeatable)\n\
           --locker <x,y>     Place a locker holding a radio (repeatable)\n\
         \n\
         presets   List the preset catalog\n\
         \n\
           --presets <path>   Preset catalog JSON (optional, default: built-in)\n\
         \n\
         Examples:\n\
         \n\
           blast-probe run --map tools/blast-probe/maps/bay.txt --preset grenade --at 6,4 --crew 13,4\n\
           blast-probe presets\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_cell(text: &str) -> Option<IVec2> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    let x: i32 = parts[0].trim().parse().ok()?;
    let y: i32 = parts[1].trim().parse().ok()?;
    Some(IVec2::new(x, y))
}

fn parse_cells(args: &[String], flag: &str) -> Vec<IVec2> {
    let mut cells = Vec::new();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            match parse_cell(&args[i + 1]) {
                Some(cell) => cells.push(cell),
                None => {
                    eprintln!("Error: {flag} expects <x,y>, got {}", args[i + 1]);
                    process::exit(1);
                }
            }
        }
    }
    cells
}

fn load_catalog(args: &[String]) -> PresetCatalog {
    match parse_flag(args, "--presets") {
        Some(path) => match PresetCatalog::from_file(Path::new(path)) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Error loading presets: {e}");
                process::exit(1);
            }
        },
        None => PresetCatalog::builtin(),
    }
}

// --- Presets command ---

fn cmd_presets(args: &[String]) {
    let catalog = load_catalog(args);
    for preset in &catalog.presets {
        let e = &preset.event;
        println!(
            "{:<16} {:?} {:?} damage={} radius={} unstable={} duration={}..{}s",
            preset.id,
            e.mode,
            e.shape,
            e.damage,
            e.radius,
            e.unstable_radius,
            e.min_effect_duration,
            e.max_effect_duration
        );
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let map_path = match parse_flag(args, "--map") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --map <path> is required");
            process::exit(1);
        }
    };
    let preset_id = match parse_flag(args, "--preset") {
        Some(id) => id,
        None => {
            eprintln!("Error: --preset <id> is required");
            process::exit(1);
        }
    };
    let origin = match parse_flag(args, "--at").and_then(parse_cell) {
        Some(cell) => cell,
        None => {
            eprintln!("Error: --at <x,y> is required");
            process::exit(1);
        }
    };
    let seed = parse_flag(args, "--seed")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(SimConfig::default().seed);

    let text = match std::fs::read_to_string(&map_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {e}", map_path.display());
            process::exit(1);
        }
    };
    let tiles = match TileMap::from_ascii(IVec2::ZERO, &text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error parsing map: {e}");
            process::exit(1);
        }
    };
    tracing::info!(
        target: "blastwave::probe",
        path = %map_path.display(),
        width = tiles.header.width,
        height = tiles.header.height,
        "map.loaded"
    );

    let catalog = load_catalog(args);
    let event = match catalog.instantiate(preset_id, origin) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut engine = PropagationEngine::new(
        SimConfig {
            seed,
            ..Default::default()
        },
        tiles,
    );
    for cell in parse_cells(args, "--crew") {
        world_setup::spawn_crew(engine.world_mut(), cell, 100.0);
    }
    for cell in parse_cells(args, "--machine") {
        world_setup::spawn_machine(engine.world_mut(), cell, 200.0, false);
    }
    for cell in parse_cells(args, "--locker") {
        let locker = world_setup::spawn_locker(engine.world_mut(), cell);
        let radio = world_setup::spawn_item(engine.world_mut(), "radio", Vec::new());
        world_setup::store_item(engine.world_mut(), locker, radio);
    }

    let Some(id) = engine.trigger(event) else {
        eprintln!("Error: {preset_id} at {origin} was dropped (origin off the map?)");
        process::exit(1);
    };

    println!("== {preset_id} #{id} at {origin} (seed {seed}) ==");
    println!();
    println!("{}", render(engine.tiles()));

    let snapshots = engine.run_until_idle(MAX_TICKS);
    let elapsed = engine.time().elapsed_secs;
    if !engine.is_idle() {
        eprintln!("Warning: still running after {MAX_TICKS} ticks");
    }

    print_report(&snapshots);
    println!("completed after {} ticks ({elapsed:.3} s)", snapshots.len());
    println!();
    print_entities(&engine);
    println!();
    println!("{}", render(engine.tiles()));
}

fn print_report(snapshots: &[EngineSnapshot]) {
    let mut cells = 0;
    let mut living = 0;
    let mut objects = 0;
    let mut tiles = 0;
    let mut pulses = 0;
    let mut placed = 0;
    let mut expired = 0;

    for event in snapshots.iter().flat_map(|s| &s.effect_events) {
        match event {
            EffectEvent::Started { cell_count, .. } => cells += cell_count,
            EffectEvent::Damaged { living: true, .. } => living += 1,
            EffectEvent::Damaged { living: false, .. } => objects += 1,
            EffectEvent::TileDamaged { .. } => tiles += 1,
            EffectEvent::Pulsed { .. } => pulses += 1,
            EffectEvent::OverlayPlaced { .. } => placed += 1,
            EffectEvent::OverlayExpired { .. } => expired += 1,
            EffectEvent::Completed { .. } => {}
        }
    }

    println!("cells in shape:     {cells}");
    println!("living damaged:     {living}");
    println!("objects damaged:    {objects}");
    println!("tiles damaged:      {tiles}");
    println!("entities pulsed:    {pulses}");
    println!("overlays placed:    {placed}");
    println!("overlays expired:   {expired}");
}

fn print_entities(engine: &PropagationEngine) {
    let world = engine.world();
    for entity_ref in world.iter() {
        let entity = entity_ref.entity();
        let mut line = format!("entity {:>4}", entity.id());
        if let Some(v) = entity_ref.get::<&Vitals>() {
            line.push_str(&format!("  health {:>6.1}/{:<6.1}", v.health, v.max_health));
        }
        if let Some(i) = entity_ref.get::<&Integrity>() {
            line.push_str(&format!("  integrity {:>6.1}/{:<6.1}", i.current, i.max));
        }
        if let Some(r) = entity_ref.get::<&EmpReceiver>() {
            line.push_str(&format!("  pulses {}  disabled {:.1}s", r.pulses, r.disabled_secs));
        }
        println!("{line}");
    }
}

/// Map as ASCII, with burning cells as `*` and pulsed cells as `~`.
fn render(tiles: &TileMap) -> String {
    let width = tiles.header.width as usize;
    let mut out = String::new();
    for (i, (_, tile)) in tiles.cells().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        let glyph = if tile.overlays.contains(&OverlayKind::Fire) {
            '*'
        } else if tile.overlays.contains(&OverlayKind::Emp) {
            '~'
        } else {
            match tile.kind {
                TileKind::Space => '_',
                TileKind::Floor => '.',
                TileKind::Wall => '#',
                TileKind::Window => '=',
                TileKind::DoorOpen => 'd',
                TileKind::DoorClosed => 'D',
            }
        };
        out.push(glyph);
    }
    out
}
