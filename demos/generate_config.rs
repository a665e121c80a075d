//! Generate the default engine configuration file
//!
//! Creates a JSON config with all default parameters

use drape_scan::EngineConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/engine.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = EngineConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Mask: >= {} points, {} sub-scanlines",
                config.mask.min_points, config.mask.subsamples
            );
            eprintln!(
                "  Drape: opacity {:.2}, bounce {:.2} over {:.0}% of face height",
                config.drape.opacity,
                config.drape.bounce_strength,
                config.drape.bounce_reach_ratio * 100.0
            );
            eprintln!("  Ranking: variance scale {:.1}", config.ranking.variance_scale);
            eprintln!(
                "  Synergy: redness >= {:.0}, hydration <= {:.0}, oiliness >= {:.0}",
                config.synergy.high_redness, config.synergy.low_hydration, config.synergy.high_oiliness
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
