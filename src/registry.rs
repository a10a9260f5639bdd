use super::{
    error::BuildError,
    nodes::{DecoratorNode, ParallelNode, RepeatNode, RetryNode, SelectorNode, SequenceNode},
    Behavior, FromArgs, Node,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;

/// Builds a behavior from its already built children and its `args` value.
pub type Constructor<E> = Box<dyn Fn(Vec<Node<E>>, &Value) -> Result<Box<dyn Behavior<E>>, BuildError>>;

/// Boxes a closure as a [`Constructor`].
pub fn constructor<E, F>(f: F) -> Constructor<E>
where
    F: Fn(Vec<Node<E>>, &Value) -> Result<Box<dyn Behavior<E>>, BuildError> + 'static,
{
    Box::new(f)
}

/// Wraps a leaf constructor. The built constructor rejects children and
/// ignores args.
pub fn boxify<E, T>(cons: impl (Fn() -> T) + 'static) -> Constructor<E>
where
    T: Behavior<E> + 'static,
{
    constructor(move |children, _| {
        if !children.is_empty() {
            return Err(BuildError::TooManyNodes);
        }
        Ok(Box::new(cons()))
    })
}

fn single_child<E>(children: Vec<Node<E>>) -> Result<Node<E>, BuildError> {
    let mut children = children.into_iter();
    let child = children.next().ok_or(BuildError::MissingChild)?;
    if children.next().is_some() {
        return Err(BuildError::TooManyNodes);
    }
    Ok(child)
}

fn decorator<E: 'static>(f: fn(Node<E>) -> DecoratorNode<E>) -> Constructor<E> {
    constructor(move |children, _| Ok(Box::new(f(single_child(children)?))))
}

#[derive(Deserialize)]
struct CountArgs {
    n: usize,
}

/// Node types known to the loaders, by name.
pub struct Registry<E = ()> {
    node_types: HashMap<String, Constructor<E>>,
}

impl<E: 'static> Default for Registry<E> {
    fn default() -> Self {
        let mut ret = Self {
            node_types: HashMap::new(),
        };
        ret.register(
            "Sequence",
            constructor(|children, _| Ok(Box::new(SequenceNode::new(children)))),
        );
        ret.register(
            "Selector",
            constructor(|children, _| Ok(Box::new(SelectorNode::new(children)))),
        );
        ret.register(
            "Fallback",
            constructor(|children, _| Ok(Box::new(SelectorNode::new(children)))),
        );
        ret.register(
            "Parallel",
            constructor(|children, _| Ok(Box::new(ParallelNode::new(children)))),
        );
        ret.register("Decorator", decorator(DecoratorNode::new));
        ret.register("Inverter", decorator(DecoratorNode::inverter));
        ret.register("ForceSuccess", decorator(DecoratorNode::force_success));
        ret.register("ForceFailure", decorator(DecoratorNode::force_failure));
        ret.register(
            "Repeat",
            constructor(|children, args| {
                let CountArgs { n } = serde_yaml::from_value(args.clone())?;
                Ok(Box::new(RepeatNode::new(single_child(children)?, n)))
            }),
        );
        ret.register(
            "Retry",
            constructor(|children, args| {
                let CountArgs { n } = serde_yaml::from_value(args.clone())?;
                Ok(Box::new(RetryNode::new(single_child(children)?, n)))
            }),
        );
        ret
    }
}

impl<E> Registry<E> {
    pub fn register(&mut self, type_name: impl ToString, constructor: Constructor<E>) {
        self.node_types.insert(type_name.to_string(), constructor);
    }

    /// Registers a leaf whose payload is deserialized from the `args` of the
    /// tree definition.
    pub fn register_from_args<T>(&mut self, type_name: impl ToString)
    where
        T: FromArgs + Behavior<E> + 'static,
    {
        self.register(
            type_name,
            constructor(|children, args| {
                if !children.is_empty() {
                    return Err(BuildError::TooManyNodes);
                }
                let args = serde_yaml::from_value(args.clone())?;
                Ok(Box::new(T::from_args(args)))
            }),
        );
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.node_types.contains_key(type_name)
    }

    /// Returns `None` if `type_name` is not registered.
    pub fn build(
        &self,
        type_name: &str,
        children: Vec<Node<E>>,
        args: &Value,
    ) -> Option<Result<Box<dyn Behavior<E>>, BuildError>> {
        self.node_types
            .get(type_name)
            .map(|constructor| constructor(children, args))
    }
}
