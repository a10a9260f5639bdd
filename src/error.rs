use thiserror::Error;

/// Failure to build a single node from its type name, children and args.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("Attempted to add too many nodes")]
    TooManyNodes,
    #[error("Missing a child node")]
    MissingChild,
    #[error("Invalid arguments: {0}")]
    Args(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("The tree {0:?} does not exist")]
    MissingTree(String),
    #[error("Node type or subtree name not found {0:?}")]
    MissingNode(String),
    #[error("Subtree {node:?} refers to itself")]
    InfiniteRecursion { node: String },
    #[error("{source} to {node}")]
    Build {
        node: String,
        #[source]
        source: BuildError,
    },
}
