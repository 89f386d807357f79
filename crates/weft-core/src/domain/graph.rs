use crate::Action;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Edges leading out of a node, keyed by transition name
pub type Edges = HashMap<String, Arc<Node>>;

/// A unit of the task graph
///
/// The set of node kinds is closed so the executor's dispatch stays
/// exhaustive: a single node runs one action, a composite node fans out to
/// child subgraphs and joins their results.
pub enum Node {
    /// Executes one action and follows the edge named by its transition
    Single(SingleNode),
    /// Runs child subgraphs concurrently and merges their outcomes
    Composite(CompositeNode),
}

impl Node {
    /// Id of the node, unique within one task
    pub fn id(&self) -> &str {
        match self {
            Node::Single(node) => node.id(),
            Node::Composite(node) => node.id(),
        }
    }

    /// Resolve the outgoing edge for a transition, if one is configured
    pub fn next(&self, transition: &str) -> Option<Arc<Node>> {
        match self {
            Node::Single(node) => node.next(transition),
            Node::Composite(node) => node.next(transition),
        }
    }

    /// Check whether this is a composite node
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Composite(_))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Single(node) => fmt::Debug::fmt(node, f),
            Node::Composite(node) => fmt::Debug::fmt(node, f),
        }
    }
}

/// Graph node executing a single action
pub struct SingleNode {
    id: String,
    action: Arc<dyn Action>,
    edges: Edges,
}

impl SingleNode {
    /// Create a node with no outgoing edges
    pub fn new(id: &str, action: Arc<dyn Action>) -> Self {
        Self {
            id: id.to_string(),
            action,
            edges: Edges::new(),
        }
    }

    /// Add an outgoing edge for a transition
    pub fn with_edge(mut self, transition: &str, node: Arc<Node>) -> Self {
        self.edges.insert(transition.to_string(), node);
        self
    }

    /// Id of the node
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The action executed by this node
    #[inline]
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    /// Resolve the outgoing edge for a transition
    pub fn next(&self, transition: &str) -> Option<Arc<Node>> {
        self.edges.get(transition).cloned()
    }

    /// Wrap into a shareable graph node
    pub fn into_node(self) -> Arc<Node> {
        Arc::new(Node::Single(self))
    }
}

impl fmt::Debug for SingleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleNode")
            .field("id", &self.id)
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Graph node fanning out to child subgraphs
///
/// Only the `_success` and `_error` transitions are meaningful on the way
/// out of a composite.
pub struct CompositeNode {
    id: String,
    nodes: Vec<Arc<Node>>,
    edges: Edges,
}

impl CompositeNode {
    /// Create a composite over the given child root nodes
    pub fn new(id: &str, nodes: Vec<Arc<Node>>) -> Self {
        Self {
            id: id.to_string(),
            nodes,
            edges: Edges::new(),
        }
    }

    /// Add an outgoing edge for a transition
    pub fn with_edge(mut self, transition: &str, node: Arc<Node>) -> Self {
        self.edges.insert(transition.to_string(), node);
        self
    }

    /// Id of the node
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Child root nodes, in declaration order
    #[inline]
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Resolve the outgoing edge for a transition
    pub fn next(&self, transition: &str) -> Option<Arc<Node>> {
        self.edges.get(transition).cloned()
    }

    /// Wrap into a shareable graph node
    pub fn into_node(self) -> Arc<Node> {
        Arc::new(Node::Composite(self))
    }
}

impl fmt::Debug for CompositeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeNode")
            .field("id", &self.id)
            .field("nodes", &self.nodes.iter().map(|n| n.id()).collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fragment::{FragmentContext, FragmentResult};
    use crate::error::ActionError;
    use async_trait::async_trait;

    struct NoopAction;

    #[async_trait]
    impl Action for NoopAction {
        async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
            Ok(FragmentResult::success(context.fragment))
        }
    }

    fn single(id: &str) -> SingleNode {
        SingleNode::new(id, Arc::new(NoopAction))
    }

    #[test]
    fn test_single_node_edges() {
        let target = single("b").into_node();
        let node = single("a").with_edge("_success", target.clone()).into_node();

        assert_eq!(node.id(), "a");
        assert!(!node.is_composite());
        assert_eq!(node.next("_success").unwrap().id(), "b");
        assert!(node.next("_error").is_none());
        assert!(node.next("custom").is_none());
    }

    #[test]
    fn test_composite_node_children() {
        let children = vec![single("a1").into_node(), single("a2").into_node()];
        let fallback = single("fallback").into_node();
        let node = CompositeNode::new("composite", children)
            .with_edge("_error", fallback)
            .into_node();

        assert!(node.is_composite());
        match node.as_ref() {
            Node::Composite(composite) => {
                assert_eq!(composite.nodes().len(), 2);
                assert_eq!(composite.nodes()[0].id(), "a1");
            }
            _ => panic!("Expected composite node"),
        }
        assert_eq!(node.next("_error").unwrap().id(), "fallback");
        assert!(node.next("_success").is_none());
    }
}
