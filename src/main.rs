use std::path::PathBuf;
use std::process;

use photomapper::{ExtractOptions, Extractor, HemisphereRule, JsonStore, PhotoStore};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: photomapper [--db PATH] [--strict-hemispheres] <command>

Commands:
  add IMAGE...   read the location of each image and store it
  list           print stored photos, one JSON object per line
  clear          delete every stored photo";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{}", USAGE);
        return;
    }

    let db: PathBuf = match args.opt_value_from_str("--db") {
        Ok(db) => db.unwrap_or_else(|| PathBuf::from("photos.json")),
        Err(e) => usage_error(e),
    };
    let options = ExtractOptions {
        hemisphere: if args.contains("--strict-hemispheres") {
            HemisphereRule::Strict
        } else {
            HemisphereRule::Legacy
        },
    };
    let command: String = match args.free_from_str() {
        Ok(c) => c,
        Err(e) => usage_error(e),
    };
    let rest: Vec<PathBuf> = args.finish().into_iter().map(PathBuf::from).collect();
    if let Some(flag) = rest.iter().find(|p| p.to_string_lossy().starts_with('-')) {
        usage_error(format!("unknown option {:?}", flag));
    }
    match command.as_str() {
        "add" if rest.is_empty() => usage_error("add needs at least one image"),
        "add" => {}
        "list" | "clear" if !rest.is_empty() => usage_error(format!("{} takes no arguments", command)),
        "list" | "clear" => {}
        _ => usage_error(format!("unknown command {:?}", command)),
    }

    let mut store = match JsonStore::open(&db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let ok = match command.as_str() {
        "add" => add(&mut store, Extractor::new(options), &rest),
        "list" => list(&store),
        _ => store.clear().map_err(|e| eprintln!("{}", e)).is_ok(),
    };
    if !ok {
        process::exit(1);
    }
}

fn add(store: &mut JsonStore, extractor: Extractor, files: &[PathBuf]) -> bool {
    let mut ok = true;
    for path in files {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Error in {}: {}", path.display(), e);
                ok = false;
                continue;
            }
        };

        match extractor.extract(&bytes, path.display().to_string(), None) {
            Ok(Some(photo)) => {
                let (lat, long) = photo.coordinates();
                if let Err(e) = store.insert(photo) {
                    eprintln!("Error storing {}: {}", path.display(), e);
                    return false;
                }
                println!("{}: {:.6}, {:.6}", path.display(), lat, long);
            }
            Ok(None) => println!("{}: no location", path.display()),
            Err(e) => {
                eprintln!("Error in {}: {}", path.display(), e);
                ok = false;
            }
        }
    }
    ok
}

fn list(store: &JsonStore) -> bool {
    let photos = match store.all() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return false;
        }
    };
    for photo in photos {
        match serde_json::to_string(&photo.without_thumbnail()) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("{}", e);
                return false;
            }
        }
    }
    true
}

fn usage_error(e: impl std::fmt::Display) -> ! {
    eprintln!("{}\n\n{}", e, USAGE);
    process::exit(2);
}
