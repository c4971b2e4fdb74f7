//! Tree values over a binary search tree graph

use super::{CollectionResult, ContainerKind, ElementPolicy, Governed, Holding, ListValue};
use crate::graph::{ControlLayer, GraphStructure, TreeGraph};
use crate::value::{TypeTag, Value};
use serde_json::Value as JsonValue;

const KIND: ContainerKind = ContainerKind::Tree;

#[derive(Debug, Clone, Default)]
pub struct TreeValue {
    graph: TreeGraph,
    policy: ElementPolicy,
}

impl TreeValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraint(constraint: TypeTag) -> Self {
        TreeValue {
            graph: TreeGraph::new(),
            policy: ElementPolicy::new(Some(constraint)),
        }
    }

    pub fn from_values<I>(values: I) -> CollectionResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value)?;
        }
        Ok(tree)
    }

    pub fn graph(&self) -> &TreeGraph {
        &self.graph
    }

    pub fn constraint(&self) -> Option<TypeTag> {
        self.policy.constraint()
    }

    pub fn size(&self) -> usize {
        self.graph.len()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// `tree<T>`, where T is the declared constraint or else the root's type
    pub fn type_name(&self) -> String {
        let element = self
            .constraint()
            .or_else(|| {
                self.graph
                    .root_id()
                    .and_then(|root| self.graph.value_of(root))
                    .map(Value::type_tag)
            })
            .map_or("any", |tag| tag.as_str());
        format!("{}<{}>", KIND, element)
    }

    pub fn is_frozen(&self) -> bool {
        self.policy.is_frozen()
    }

    pub fn contains_frozen(&self) -> bool {
        self.policy.contains_frozen()
    }

    pub fn freeze(&mut self) {
        for value in self.graph.values_mut() {
            value.freeze();
        }
        self.policy.freeze();
    }

    pub fn insert(&mut self, value: impl Into<Value>) -> CollectionResult<()> {
        let value = value.into();
        self.policy.admit("insert", KIND, &value, None)?;
        let holding = Holding::of(&value);
        self.graph.insert(value)?;
        self.policy.note_added(holding);
        Ok(())
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.graph.contains(value)
    }

    pub fn height(&self) -> usize {
        self.graph.height()
    }

    pub fn in_order(&self) -> Vec<&Value> {
        self.graph.in_order()
    }

    pub fn pre_order(&self) -> Vec<&Value> {
        self.graph.pre_order()
    }

    pub fn post_order(&self) -> Vec<&Value> {
        self.graph.post_order()
    }

    pub fn min(&self) -> Option<&Value> {
        self.graph.min()
    }

    pub fn max(&self) -> Option<&Value> {
        self.graph.max()
    }

    pub fn clear(&mut self) -> CollectionResult<()> {
        self.policy.check_not_frozen("clear", KIND)?;
        self.graph.clear();
        self.policy.clear_elements();
        Ok(())
    }

    /// Sorted copy as a list carrying the same constraint
    pub fn to_list(&self) -> CollectionResult<ListValue> {
        let mut list = match self.constraint() {
            Some(tag) => ListValue::with_constraint(tag),
            None => ListValue::new(),
        };
        list.extend(self.in_order().into_iter().cloned())?;
        Ok(list)
    }

    /// Flattens to the in-order sequence
    pub fn to_plain(&self) -> JsonValue {
        JsonValue::Array(self.in_order().into_iter().map(Value::to_plain).collect())
    }

    /// `tree<num> (4 nodes)`
    pub fn to_display_string(&self) -> String {
        format!("{} ({} nodes)", self.type_name(), self.size())
    }

    pub fn inspect(&self) -> String {
        let graph = self.graph.graph();
        format!(
            "<{} size={} height={} edges={} frozen={} rules={}>",
            self.type_name(),
            self.size(),
            self.height(),
            graph.edge_count(),
            self.is_frozen(),
            graph.control().get_active_rules().len()
        )
    }
}

impl Governed for TreeValue {
    fn container_kind(&self) -> ContainerKind {
        KIND
    }

    fn structure(&self) -> &GraphStructure {
        self.graph.graph()
    }

    fn control_mut(&mut self) -> &mut ControlLayer {
        self.graph.control_mut()
    }

    fn is_frozen(&self) -> bool {
        self.policy.is_frozen()
    }
}
