use crate::conf::{ConfigError, load_config};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ listening on {}", cfg.server.listen);
            println!("✔ viewer stream at {}", cfg.server.stream_path);
            println!("✔ history capacity {}", cfg.history.capacity);
            match &cfg.geoip.city_db {
                Some(db) => println!("✔ geoip database {}", db.display()),
                None => println!("! no geoip database: every event will be dropped"),
            }
            if cfg.log_source.enable {
                println!("✔ {} log candidates", cfg.log_source.candidates.len());
            } else {
                println!("✔ log source disabled");
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("{err}");
    } else {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }

    let hints = match err {
        ConfigError::Validation(all) => all.0.iter().filter_map(config_error_hint).collect(),
        other => config_error_hint(other).into_iter().collect::<Vec<_>>(),
    };

    for hint in hints {
        eprintln!();
        if plain {
            eprintln!("{hint}");
        } else {
            eprintln!("{}", hint.dimmed());
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Server
        //---------------------------------------------------------------------
        ConfigError::InvalidListen { .. } => Some(
            "The listen address must be an IP and port.\n\
             \n\
             Example:\n\
             \n\
             server {\n  listen = \"0.0.0.0:3000\"\n}",
        ),

        ConfigError::InvalidStreamPath { .. } => Some(
            "The viewer stream path is an absolute URL path.\n\
             \n\
             Example:\n\
             \n\
             server {\n  stream_path = \"/stream\"\n}",
        ),

        ConfigError::InvalidLatitude { .. } | ConfigError::InvalidLongitude { .. } => Some(
            "Server coordinates are decimal degrees: latitude in [-90, 90], longitude in [-180, 180].\n\
             \n\
             Example:\n\
             \n\
             server {\n  location {\n    latitude  = 48.8566\n    longitude = 2.3522\n  }\n}",
        ),

        ConfigError::MissingStaticDir { .. } => Some(
            "static_dir must point at the built viewer assets.\n\
             \n\
             Build the viewer first, or remove `static_dir` to serve only the stream.",
        ),

        //---------------------------------------------------------------------
        // Identity
        //---------------------------------------------------------------------
        ConfigError::InvalidTrustedProxy { .. } => Some(
            "Trusted proxies are IP addresses or CIDR ranges.\n\
             \n\
             Example:\n\
             \n\
             identity {\n  trusted_proxies = [\"10.0.0.0/8\", \"192.168.1.5\"]\n}",
        ),

        //---------------------------------------------------------------------
        // Sizes and intervals
        //---------------------------------------------------------------------
        ConfigError::ZeroValue { .. } => Some(
            "Capacities, buffers and intervals must be at least 1.\n\
             \n\
             Remove the field to use its default.",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
