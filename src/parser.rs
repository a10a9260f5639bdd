//! Tree definitions and the loaders that instantiate them.
//!
//! Both the text format ([`parse_file`]) and the YAML format
//! ([`parse_yaml`]) produce the same [`TreeSource`], which [`load`] turns
//! into nodes through a [`crate::Registry`].

mod loader;
mod nom_parser;
mod yaml_parser;

use serde::Deserialize;
use serde_yaml::Value;

use crate::{error::LoadError, Node, Registry};

pub use self::{
    loader::{load, load_tree},
    nom_parser::parse_file,
    yaml_parser::{load_yaml, parse_yaml},
};

fn null() -> Value {
    Value::Null
}

/// Definition of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeDef {
    /// Registered node type, or the name of another tree of the same source.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub check_interval: Option<f64>,
    /// Payload deserialized by the constructor of the node type.
    #[serde(default = "null")]
    pub args: Value,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

impl NodeDef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
            check_interval: None,
            args: Value::Null,
            children: vec![],
        }
    }

    pub fn new_with_children(ty: impl Into<String>, children: Vec<NodeDef>) -> Self {
        Self {
            children,
            ..Self::new(ty)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeDef {
    pub name: String,
    pub root: NodeDef,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeSource {
    pub trees: Vec<TreeDef>,
}

impl TreeSource {
    pub fn find(&self, name: &str) -> Option<&TreeDef> {
        self.trees.iter().find(|tree| tree.name == name)
    }
}

/// Parses a source in the text format and instantiates its `main` tree.
pub fn load_str<E>(source: &str, registry: &Registry<E>) -> Result<Node<E>, LoadError> {
    let (rest, tree_source) =
        parse_file(source).map_err(|e| LoadError::Parse(e.to_string()))?;
    if !rest.is_empty() {
        let line = rest.lines().next().unwrap_or_default();
        return Err(LoadError::Parse(format!("Unexpected input: {:?}", line)));
    }
    load(&tree_source, registry)
}
