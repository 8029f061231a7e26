use super::Context;
use anyhow::Result;
use enginext::{graph, DependencyMap, ProjectDescriptor};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

pub fn run(ctx: &Context, project_file: &Path, plugin: &str) -> Result<()> {
    let project = ProjectDescriptor::load(project_file)?;
    let registry = ctx.load_registry()?;
    let graph = graph::build(&registry, &project.requirements);

    println!("Searching for why {} is required...", plugin);
    println!();

    if !graph.dependencies.contains_key(plugin) {
        println!("✗ '{}' is not required by {}", plugin, project.name);
        println!();
        return Ok(());
    }

    if graph.unresolved.contains(plugin) {
        println!("⚠ '{}' is not in the registry", plugin);
        println!();
    }

    let is_direct = project.requirements.iter().any(|id| id == plugin);
    let mut chains = Vec::new();

    for root in &project.requirements {
        if root != plugin {
            chains.extend(find_chains(root, plugin, &graph.dependencies));
        }
    }

    if is_direct {
        println!("{} is a direct requirement of {}", plugin, project.name);
        println!();
    }

    if !chains.is_empty() {
        println!(
            "{} is required through the following chains:",
            plugin
        );
        println!();

        for (idx, chain) in chains.iter().enumerate() {
            println!("  Chain #{}:", idx + 1);
            for (i, id) in chain.iter().enumerate() {
                let indent = "    ".repeat(i);
                let arrow = if i > 0 { "└─> " } else { "" };
                if i == chain.len() - 1 {
                    println!("    {}{}{} (target)", indent, arrow, id);
                } else {
                    println!("    {}{}{}", indent, arrow, id);
                }
            }
            println!();
        }
    }

    let dependents: Vec<&str> = graph
        .dependents(plugin)
        .into_iter()
        .map(String::as_str)
        .collect();
    if !dependents.is_empty() {
        println!("Directly required by: {}", dependents.join(", "));
        println!();
    }

    Ok(())
}

/// Breadth-first search for requirement chains from `start` to `target`
fn find_chains(start: &str, target: &str, dependencies: &DependencyMap) -> Vec<Vec<String>> {
    let mut chains = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(vec![start.to_string()]);

    let mut visited = HashSet::new();

    while let Some(chain) = queue.pop_front() {
        let Some(current) = chain.last() else {
            continue;
        };
        if !visited.insert(current.clone()) {
            continue;
        }

        let Some(deps) = dependencies.get(current) else {
            continue;
        };

        for dep in deps {
            let mut next = chain.clone();
            next.push(dep.clone());
            if dep == target {
                chains.push(next);
            } else {
                queue.push_back(next);
            }
        }
    }

    chains
}
