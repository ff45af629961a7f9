//! The `inspect` command: print the node tree of a container written by
//! this crate, without needing a symbol resolver (tags and attributes
//! are readable without rebuilding any instance).

use std::path::Path;

use crate::container::{ContainerError, Hdf5Container, NodeKind};

pub fn run_inspect(path: &Path, json: bool, max_depth: Option<usize>) {
    match inspect_container(path, max_depth) {
        Ok(tree) => {
            if json {
                match serde_json::to_string_pretty(&tree) {
                    Ok(s) => println!("{s}"),
                    Err(e) => eprintln!("Error serializing tree: {e}"),
                }
            } else {
                print_tree(&tree, 0);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TreeNode {
    pub name: String,
    pub tag: Option<String>,
    pub kind: String,
    pub children: Vec<TreeNode>,
}

fn inspect_container(path: &Path, max_depth: Option<usize>) -> Result<TreeNode, ContainerError> {
    let container = Hdf5Container::open(path)?;
    let root = container.root()?;
    walk(&container, &root, "/", max_depth, 0)
}

fn walk(
    container: &Hdf5Container,
    handle: &crate::container::NodeHandle,
    name: &str,
    max_depth: Option<usize>,
    depth: usize,
) -> Result<TreeNode, ContainerError> {
    let tag = container.get_attr_string(handle, "type")?;
    let kind = match container.node_kind(handle) {
        NodeKind::Group => "group",
        NodeKind::Dataset => "dataset",
    };

    let mut children = Vec::new();
    if matches!(container.node_kind(handle), NodeKind::Group)
        && max_depth.is_none_or(|limit| depth < limit)
    {
        for child_name in container.list_children(handle)? {
            let child = container.open_child(handle, &child_name)?;
            children.push(walk(container, &child, &child_name, max_depth, depth + 1)?);
        }
    }

    Ok(TreeNode {
        name: name.to_string(),
        tag,
        kind: kind.to_string(),
        children,
    })
}

fn print_tree(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = node.tag.as_deref().unwrap_or("-");
    println!("{indent}{} [{}] ({})", node.name, tag, node.kind);
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}
