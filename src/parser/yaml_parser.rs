use serde::Deserialize;
use std::collections::BTreeMap;

use super::{load, NodeDef, TreeDef, TreeSource};
use crate::{error::LoadError, Node, Registry};

#[derive(Deserialize)]
struct YamlSource {
    trees: BTreeMap<String, NodeDef>,
}

/// Parses a YAML document of the form `trees: { <name>: <node> }`.
pub fn parse_yaml(yaml: &str) -> Result<TreeSource, LoadError> {
    let source: YamlSource = serde_yaml::from_str(yaml)?;
    Ok(TreeSource {
        trees: source
            .trees
            .into_iter()
            .map(|(name, root)| TreeDef { name, root })
            .collect(),
    })
}

/// Parses a YAML document and instantiates its `main` tree.
pub fn load_yaml<E>(yaml: &str, registry: &Registry<E>) -> Result<Node<E>, LoadError> {
    load(&parse_yaml(yaml)?, registry)
}
