use super::Context;
use anyhow::Result;
use enginext::{graph, ProjectDescriptor, Registry};
use std::collections::HashSet;
use std::path::Path;

pub fn run(ctx: &Context, project_file: &Path) -> Result<()> {
    let project = ProjectDescriptor::load(project_file)?;
    let registry = ctx.load_registry()?;

    println!("Requirement tree for {}:", project.name);
    println!();

    if project.requirements.is_empty() {
        println!("No plugins required.");
        println!();
        return Ok(());
    }

    let mut visited = HashSet::new();
    let count = project.requirements.len();

    for (i, id) in project.requirements.iter().enumerate() {
        print_tree_node(
            id,
            &registry,
            "",
            i + 1 == count,
            &mut visited,
            &HashSet::new(),
        );
    }

    let graph = graph::build(&registry, &project.requirements);
    println!();
    println!(
        "{} plugin{} required",
        graph.dependencies.len(),
        if graph.dependencies.len() == 1 { "" } else { "s" }
    );
    if !graph.unresolved.is_empty() {
        println!(
            "{} missing from registry: {}",
            graph.unresolved.len(),
            graph
                .unresolved
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}

fn print_tree_node(
    id: &str,
    registry: &Registry,
    prefix: &str,
    is_last: bool,
    visited: &mut HashSet<String>,
    ancestors: &HashSet<String>,
) {
    let branch = if is_last { "└── " } else { "├── " };

    if ancestors.contains(id) {
        println!("{}{}{} (circular)", prefix, branch, id);
        return;
    }

    let Some(record) = registry.get(id) else {
        println!("{}{}{} (missing)", prefix, branch, id);
        return;
    };

    if !visited.insert(id.to_string()) {
        println!("{}{}{} (already shown)", prefix, branch, id);
        return;
    }

    println!("{}{}{}", prefix, branch, id);

    let mut seen = HashSet::new();
    let requirements: Vec<&str> = record
        .requirements
        .iter()
        .map(String::as_str)
        .filter(|req| seen.insert(*req))
        .collect();

    let mut new_ancestors = ancestors.clone();
    new_ancestors.insert(id.to_string());
    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

    for (i, req) in requirements.iter().enumerate() {
        print_tree_node(
            req,
            registry,
            &child_prefix,
            i + 1 == requirements.len(),
            visited,
            &new_ancestors,
        );
    }
}
