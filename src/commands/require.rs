use super::Context;
use anyhow::Result;
use enginext::{
    emit, render, resolve_requirements, write_manifest, MissingPolicy, ProjectDescriptor,
};
use std::path::{self, Path, PathBuf};

pub fn run(
    ctx: &Context,
    project_file: &Path,
    allow_missing: bool,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let project = ProjectDescriptor::load(project_file)?;
    let project_dir = path::absolute(project.dir())?;
    let registry = ctx.load_registry()?;

    tracing::info!(
        "resolving {} requirement(s) of '{}' against {} plugin(s) in {}",
        project.requirements.len(),
        project.name,
        registry.len(),
        ctx.registry_root.display()
    );

    let policy = if allow_missing || ctx.config.resolver.allow_missing {
        MissingPolicy::Omit
    } else {
        MissingPolicy::Fail
    };

    let resolution = resolve_requirements(&registry, &project.requirements, policy)?;
    let entries = emit(
        &resolution.order,
        &registry,
        ctx.platform,
        ctx.build_config,
        &project_dir,
    )?;

    if dry_run {
        print!("{}", render(&entries));
        return Ok(());
    }

    let manifest_path =
        output.unwrap_or_else(|| project_dir.join(&ctx.config.manifest.file_name));
    write_manifest(&manifest_path, &entries)?;

    println!(
        "✓ Resolved {} plugin{} for {} ({}/{})",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" },
        project.name,
        ctx.platform,
        ctx.build_config
    );
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {}", i + 1, entry.name);
    }

    if !resolution.omitted.is_empty() {
        println!();
        println!("⚠ Not found in registry (omitted):");
        for id in &resolution.omitted {
            println!("  • {}", id);
        }
    }

    println!();
    println!("Manifest written to {}", manifest_path.display());

    Ok(())
}
