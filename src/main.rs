//! Life Automaton CLI - Run a saved game or a JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use life_automaton::{
    compute::{GenerationEngine, GenerationStats},
    pattern::{self, LAUT_EXTENSION, LautFile},
    schema::{AutomatonConfig, Seed},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <game.laut|config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a life automaton from a saved game or a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  game.laut    Saved game (rules, grid, color, interval)");
        eprintln!("  config.json  Configuration; the seed is read from config.seed.json");
        eprintln!("  steps        Maximum number of generations (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let (config, mut engine) = if path.extension().and_then(|e| e.to_str()) == Some(LAUT_EXTENSION)
    {
        load_game(&path)
    } else {
        load_config(&path)
    };

    println!("Life Automaton");
    println!("==============");
    println!("Grid: {}x{}", config.height, config.width);
    println!(
        "Rule: {} ({:?}, {:?})",
        config.rules, config.rules.neighborhood, config.rules.topology
    );
    println!("Steps: {}", steps);
    println!();

    let initial = engine.stats();
    println!("Initial population: {}", initial.population);
    println!();

    println!("Running...");
    let start = Instant::now();
    let mut stalled = false;

    for i in 0..steps {
        if engine.step().is_stalled() {
            stalled = true;
            println!(
                "  Stalled at generation {}: all the next generations will be the same.",
                engine.generation()
            );
            break;
        }

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = engine.stats();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Generation {}/{}: population={}, density={:.3}, {:.1} gen/s",
                stats.generation,
                steps,
                stats.population,
                stats.density,
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = engine.stats();

    println!();
    print_stats("Final state", &final_stats);
    if !stalled {
        println!("  (still evolving)");
    }
    println!(
        "Time: {:.3}s ({:.1} gen/s)",
        elapsed.as_secs_f32(),
        final_stats.generation as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
    println!();
    print!("{}", pattern::dump(engine.grid()));
}

fn load_game(path: &Path) -> (AutomatonConfig, GenerationEngine) {
    let laut = LautFile::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading game: {}", e);
        std::process::exit(1);
    });
    let engine = laut.to_engine().unwrap_or_else(|e| {
        eprintln!("Error applying game: {}", e);
        std::process::exit(1);
    });
    (laut.config(), engine)
}

fn load_config(path: &Path) -> (AutomatonConfig, GenerationEngine) {
    let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: AutomatonConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    // Load or create seed
    let seed_path = path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    let mut engine = GenerationEngine::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error creating grid: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = seed.apply(engine.grid_mut()) {
        eprintln!("Error seeding grid: {}", e);
        std::process::exit(1);
    }

    (config, engine)
}

fn print_stats(label: &str, stats: &GenerationStats) {
    println!("{}:", label);
    println!("  Generation: {}", stats.generation);
    println!("  Population: {}", stats.population);
    println!("  Density: {:.4}", stats.density);
}

fn print_example_config() {
    let config = AutomatonConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example seed (config.seed.json):");
    println!("{}", serde_json::to_string_pretty(&seed).unwrap());
}
