use super::Context;
use anyhow::Result;
use enginext::{BuildConfig, Config, Platform};

const KEYS: [&str; 6] = [
    "registry.root",
    "build.platform",
    "build.config",
    "resolver.allow_missing",
    "manifest.file_name",
    "logging.filter",
];

pub fn run(ctx: &Context, action: &crate::ConfigAction) -> Result<()> {
    use crate::ConfigAction;

    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Set { key, value } => set_config(key, value),
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config_path = Config::default_path()?;

    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("(not created yet, showing defaults)");
    }
    println!();
    print!("{}", ctx.config.to_toml()?);
    println!();

    println!("Effective settings:");
    println!("  registry: {}", ctx.registry_root.display());
    println!("  platform: {}", ctx.platform);
    println!("  config:   {}", ctx.build_config);
    println!();

    println!("Modify settings with: enginext config set <key> <value>");
    println!("  Available keys: {}", KEYS.join(", "));

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    // Environment overrides must not leak into the saved file
    let mut config = match Config::load_from(Config::default_path()?) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: existing configuration is unreadable ({})", e);
            eprintln!("Starting from defaults");
            Config::default()
        }
    };

    match key {
        "registry.root" => {
            config.registry.root = value.to_string();
        }
        "build.platform" => {
            config.build.platform = if value.is_empty() {
                None
            } else {
                Some(value.parse::<Platform>().map_err(anyhow::Error::msg)?)
            };
        }
        "build.config" => {
            config.build.config = value.parse::<BuildConfig>().map_err(anyhow::Error::msg)?;
        }
        "resolver.allow_missing" => {
            config.resolver.allow_missing = value
                .parse::<bool>()
                .map_err(|_| anyhow::anyhow!("Invalid boolean value. Use 'true' or 'false'"))?;
        }
        "manifest.file_name" => {
            if value.is_empty() {
                anyhow::bail!("manifest.file_name cannot be empty");
            }
            config.manifest.file_name = value.to_string();
        }
        "logging.filter" => {
            config.logging.filter = (!value.is_empty()).then(|| value.to_string());
        }
        _ => {
            anyhow::bail!(
                "Unknown configuration key '{}'\n\nAvailable keys: {}",
                key,
                KEYS.join(", ")
            );
        }
    }

    config.save()?;
    println!(
        "✓ {} = {}",
        key,
        if value.is_empty() { "<cleared>" } else { value }
    );

    Ok(())
}
