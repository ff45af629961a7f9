//! The `verify` command: walk a container and report structural problems
//! that don't require resolving any reduction symbols — unknown type
//! tags, non-contiguous list indices, and soft links with missing
//! targets.

use std::path::Path;

use crate::container::{ContainerError, Hdf5Container, NodeKind};
use crate::registry::TypeRegistry;

pub fn run_verify(path: &Path) {
    match verify_container(path) {
        Ok(problems) => {
            if problems.is_empty() {
                println!("No problems found.");
            } else {
                for problem in &problems {
                    println!("- {problem}");
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn verify_container(path: &Path) -> Result<Vec<String>, ContainerError> {
    let container = Hdf5Container::open(path)?;
    let registry = TypeRegistry::global();
    let root = container.root()?;
    let mut problems = Vec::new();
    walk(&container, &root, "/", registry, &mut problems)?;
    Ok(problems)
}

fn walk(
    container: &Hdf5Container,
    handle: &crate::container::NodeHandle,
    path: &str,
    registry: &TypeRegistry,
    problems: &mut Vec<String>,
) -> Result<(), ContainerError> {
    if let Some(tag) = container.get_attr_string(handle, "type")? {
        if tag != "reduction" && registry.kind_for_tag(&tag).is_none() {
            problems.push(format!("unknown type tag '{tag}' at '{path}'"));
        }

        if tag == "list" {
            let names = container.list_children(handle)?;
            let mut indices: Vec<usize> = names.iter().filter_map(|n| n.parse().ok()).collect();
            indices.sort_unstable();
            let expected: Vec<usize> = (0..names.len()).collect();
            if indices != expected {
                problems.push(format!(
                    "list at '{path}' is not contiguous: found {indices:?}, expected 0..{}",
                    names.len()
                ));
            }
        }
    }

    if matches!(container.node_kind(handle), NodeKind::Group) {
        for child_name in container.list_children(handle)? {
            match container.resolve_soft_link(handle, &child_name)? {
                Some(target) if !container.path_exists(&target)? => {
                    problems.push(format!(
                        "dangling soft link '{child_name}' at '{path}' -> '{target}'"
                    ));
                }
                _ => {
                    let child = container.open_child(handle, &child_name)?;
                    let child_path = if path == "/" {
                        format!("/{child_name}")
                    } else {
                        format!("{path}/{child_name}")
                    };
                    walk(container, &child, &child_path, registry, problems)?;
                }
            }
        }
    }

    Ok(())
}
