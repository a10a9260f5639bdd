use super::{NodeDef, TreeSource};
use crate::{
    error::{BuildError, LoadError},
    Node, Registry,
};
use tracing::trace;

/// Instantiate the tree named `main`.
pub fn load<E>(tree_source: &TreeSource, registry: &Registry<E>) -> Result<Node<E>, LoadError> {
    load_tree(tree_source, registry, "main")
}

/// Instantiate a named tree of the source.
///
/// Node types missing from the registry are resolved to other trees of the
/// same source and inlined at the place they are referenced.
pub fn load_tree<E>(
    tree_source: &TreeSource,
    registry: &Registry<E>,
    name: &str,
) -> Result<Node<E>, LoadError> {
    let tree = tree_source
        .find(name)
        .ok_or_else(|| LoadError::MissingTree(name.to_owned()))?;

    let top = TreeStack { name, parent: None };

    load_recurse(&tree.root, registry, tree_source, &top)
}

/// A mechanism to detect infinite recursion. It is a linked list in call stack.
/// You can traverse the link back to enumerate all the subtree names
/// and check if a subtree name to be inserted is already there.
///
/// A subtree is inlined at load time, so a tree that refers to itself would
/// never finish loading. We make it an error instead.
struct TreeStack<'a, 'src> {
    name: &'src str,
    parent: Option<&'a TreeStack<'a, 'src>>,
}

impl<'a, 'src> TreeStack<'a, 'src> {
    fn find(&self, name: &str) -> bool {
        if self.name == name {
            true
        } else if let Some(parent) = self.parent {
            parent.find(name)
        } else {
            false
        }
    }
}

fn load_recurse<E>(
    def: &NodeDef,
    registry: &Registry<E>,
    tree_source: &TreeSource,
    parent_stack: &TreeStack,
) -> Result<Node<E>, LoadError> {
    let node = if registry.contains(&def.ty) {
        let children = def
            .children
            .iter()
            .map(|child| load_recurse(child, registry, tree_source, parent_stack))
            .collect::<Result<Vec<_>, _>>()?;
        let behavior = registry
            .build(&def.ty, children, &def.args)
            .ok_or_else(|| LoadError::MissingNode(def.ty.clone()))?
            .map_err(|source| LoadError::Build {
                node: def.ty.clone(),
                source,
            })?;
        Node::from_boxed(behavior).named(def.name.as_deref().unwrap_or(&def.ty))
    } else {
        let tree = tree_source
            .find(&def.ty)
            .ok_or_else(|| LoadError::MissingNode(def.ty.clone()))?;

        // Prevent infinite recursion
        if parent_stack.find(&def.ty) {
            return Err(LoadError::InfiniteRecursion {
                node: def.ty.clone(),
            });
        }
        if !def.children.is_empty() {
            return Err(LoadError::Build {
                node: def.ty.clone(),
                source: BuildError::TooManyNodes,
            });
        }
        trace!(subtree = %def.ty, "inlining subtree");
        let tree_stack = TreeStack {
            name: &def.ty,
            parent: Some(parent_stack),
        };
        let node = load_recurse(&tree.root, registry, tree_source, &tree_stack)?;
        match def.name {
            Some(ref name) => node.named(name.as_str()),
            None => node,
        }
    };

    Ok(match def.check_interval {
        Some(interval) => node.with_check_interval(interval),
        None => node,
    })
}
