//! Command-line drape preview
//!
//! Ranks a palette against a portrait, prints the best colors as JSON and
//! writes the best drape preview plus a light-mode heatmap next to it.

use drape_scan::constants::ranking::DEFAULT_BEST_COUNT;
use drape_scan::image_loader::{is_supported_extension, load_image};
use drape_scan::{
    AnalysisSession, CancellationToken, DeviceCapability, EngineConfig, LightMode, MetalType,
    OvalLandmarkProvider, PerformanceTier,
};
use std::{env, path::Path, process};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut tier = PerformanceTier::Mid;
    let mut metal = MetalType::None;
    let mut config_path = None;
    let mut image_path_arg = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tier" if i + 1 < args.len() => {
                tier = match args[i + 1].as_str() {
                    "low" => PerformanceTier::Low,
                    "mid" => PerformanceTier::Mid,
                    "high" => PerformanceTier::High,
                    other => {
                        eprintln!("Unknown tier: {}", other);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--metal" if i + 1 < args.len() => {
                metal = match args[i + 1].as_str() {
                    "gold" => MetalType::Gold,
                    "silver" => MetalType::Silver,
                    "rose-gold" => MetalType::RoseGold,
                    "none" => MetalType::None,
                    other => {
                        eprintln!("Unknown metal: {}", other);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--config" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };
    let image_path = Path::new(&image_path_str);

    let supported = image_path
        .extension()
        .and_then(|e| e.to_str())
        .map(is_supported_extension)
        .unwrap_or(false);
    if !supported {
        eprintln!("Error: Unsupported image type '{}'", image_path.display());
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => EngineConfig::from_json_file(Path::new(&path)).unwrap_or_else(|e| fail(e)),
        None => EngineConfig::default(),
    };

    let image = load_image(image_path).unwrap_or_else(|e| fail(e));
    let session = AnalysisSession::from_provider(
        image,
        &OvalLandmarkProvider::default(),
        DeviceCapability::new(tier),
        config,
    )
    .unwrap_or_else(|e| fail(e));

    let outcome = session
        .rank(
            metal,
            |done, total| eprint!("\rScoring colors: {}/{}", done, total),
            &CancellationToken::new(),
        )
        .unwrap_or_else(|e| fail(e));
    eprintln!();

    let decomposition = session.decompose().unwrap_or_else(|e| fail(e));
    let insight = session
        .insight(decomposition.summary)
        .unwrap_or_else(|e| fail(e));
    let adjusted = session.apply_insight(&outcome.results, &insight);
    let best = drape_scan::best_colors(&adjusted.adjusted_best_colors, DEFAULT_BEST_COUNT);

    let report = serde_json::json!({
        "best_colors": best,
        "pigments": decomposition.summary,
        "insight": insight,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting report: {}", e),
    }

    let base_name = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("portrait");
    let output_dir = image_path.parent().unwrap_or_else(|| Path::new("."));

    if let Some(top) = best.first() {
        let preview = session.preview(top.color, metal).unwrap_or_else(|e| fail(e));
        let preview_path = output_dir.join(format!("{}_drape_{}.png", base_name, top.color.hex().trim_start_matches('#')));
        match preview.save(&preview_path) {
            Ok(_) => eprintln!("Saved drape preview to {}", preview_path.display()),
            Err(e) => eprintln!("Warning: Failed to save drape preview: {}", e),
        }
    }

    let heatmap = session
        .heatmap(&decomposition.maps, LightMode::Polarized, None)
        .unwrap_or_else(|e| fail(e));
    let heatmap_path = output_dir.join(format!("{}_polarized.png", base_name));
    match heatmap.save(&heatmap_path) {
        Ok(_) => eprintln!("Saved heatmap to {}", heatmap_path.display()),
        Err(e) => eprintln!("Warning: Failed to save heatmap: {}", e),
    }
}

fn fail(error: drape_scan::AnalysisError) -> ! {
    eprintln!("Analysis failed: {}", error);
    if error.is_recoverable() {
        eprintln!("Suggestion: {}", error.user_message());
    }
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Rank drape colors against a portrait and render previews.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tier low|mid|high           Device tier, sets the palette size (default: mid)");
    eprintln!("  --metal gold|silver|rose-gold|none");
    eprintln!("                                Jewelry highlight near the chin (default: none)");
    eprintln!("  --config FILE                 Engine configuration JSON");
    eprintln!("  --help, -h                    Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} portrait.jpg", program_name);
    eprintln!("  RUST_LOG=debug {} --tier high --metal gold portrait.png", program_name);
}
