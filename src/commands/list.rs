use super::Context;
use anyhow::Result;

pub fn run(ctx: &Context) -> Result<()> {
    let registry = ctx.load_registry()?;

    if registry.is_empty() {
        println!("No plugins found in {}.", ctx.registry_root.display());
        println!();
        println!("Point --registry (or registry.root in config) at a directory of .cryplugin files.");
        return Ok(());
    }

    println!(
        "Plugins in {} ({}/{}):",
        ctx.registry_root.display(),
        ctx.platform,
        ctx.build_config
    );
    println!();

    for record in registry.iter() {
        let mark = if record.artifact(ctx.platform, ctx.build_config).is_some() {
            "✓"
        } else {
            "✗"
        };

        if record.requirements.is_empty() {
            println!("  {} {}", mark, record.id);
        } else {
            println!(
                "  {} {} -> {}",
                mark,
                record.id,
                record.requirements.join(", ")
            );
        }
    }

    let missing_binaries = registry
        .iter()
        .filter(|r| r.artifact(ctx.platform, ctx.build_config).is_none())
        .count();

    println!();
    println!(
        "Total: {} plugin{}",
        registry.len(),
        if registry.len() == 1 { "" } else { "s" }
    );
    if missing_binaries > 0 {
        println!(
            "{} without a binary for {}/{}",
            missing_binaries, ctx.platform, ctx.build_config
        );
    }

    Ok(())
}
