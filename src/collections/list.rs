//! List values over a sequential graph

use super::names::{self, Names};
use super::{
    join_limited, CollectionError, CollectionResult, ContainerKind, ElementPolicy, Governed, Holding,
};
use crate::config::DisplayConfig;
use crate::graph::{ControlLayer, GraphError, GraphStructure, SequentialGraph};
use crate::value::{TypeTag, Value};
use serde_json::Value as JsonValue;

const KIND: ContainerKind = ContainerKind::List;

#[derive(Debug, Clone, Default)]
pub struct ListValue {
    graph: SequentialGraph,
    policy: ElementPolicy,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty list accepting only elements of type `constraint`
    pub fn with_constraint(constraint: TypeTag) -> Self {
        ListValue {
            graph: SequentialGraph::new(),
            policy: ElementPolicy::new(Some(constraint)),
        }
    }

    pub fn from_values<I>(values: I) -> CollectionResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut list = Self::new();
        list.extend(values)?;
        Ok(list)
    }

    pub fn graph(&self) -> &SequentialGraph {
        &self.graph
    }

    pub fn constraint(&self) -> Option<TypeTag> {
        self.policy.constraint()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn size(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Type name, e.g. `list` or `list<num>`
    pub fn type_name(&self) -> String {
        match self.constraint() {
            Some(tag) => format!("{}<{}>", KIND, tag),
            None => KIND.to_string(),
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.policy.is_frozen()
    }

    pub fn contains_frozen(&self) -> bool {
        self.policy.contains_frozen()
    }

    /// Freeze this list and everything in it
    pub fn freeze(&mut self) {
        for value in self.graph.values_mut() {
            value.freeze();
        }
        self.policy.freeze();
    }

    pub fn append(&mut self, value: impl Into<Value>) -> CollectionResult<()> {
        let value = value.into();
        self.policy.admit("append", KIND, &value, None)?;
        self.push_checked(value)
    }

    pub fn prepend(&mut self, value: impl Into<Value>) -> CollectionResult<()> {
        let value = value.into();
        self.policy.admit("prepend", KIND, &value, None)?;
        let holding = Holding::of(&value);
        self.graph.prepend(value)?;
        self.policy.note_added(holding);
        names::update(self.graph.metadata_mut(), |names| names.insert(0, None));
        Ok(())
    }

    /// Insert before `index`; negative indices count from the end and
    /// out-of-range positions clamp to the ends
    pub fn insert(&mut self, index: i64, value: impl Into<Value>) -> CollectionResult<()> {
        let value = value.into();
        self.policy.admit("insert", KIND, &value, None)?;
        let len = self.len() as i64;
        let resolved = if index < 0 { index + len } else { index };
        let position = resolved.clamp(0, len) as usize;
        let holding = Holding::of(&value);
        self.graph.insert_at(position, value)?;
        self.policy.note_added(holding);
        names::update(self.graph.metadata_mut(), |names| {
            let at = position.min(names.len());
            names.insert(at, None);
        });
        Ok(())
    }

    pub fn remove_at(&mut self, index: i64) -> CollectionResult<Value> {
        self.policy.check_not_frozen("remove_at", KIND)?;
        let position = self.graph.resolve_index(index);
        let removed = self.graph.remove_at(index)?;
        self.policy.note_removed(Holding::of(&removed));
        if let Some(position) = position {
            names::update(self.graph.metadata_mut(), |names| {
                if position < names.len() {
                    names.remove(position);
                }
            });
        }
        Ok(removed)
    }

    /// Remove the first element equal to `value`
    pub fn remove(&mut self, value: &Value) -> CollectionResult<()> {
        self.policy.check_not_frozen("remove", KIND)?;
        let index = self
            .index_of(value)
            .ok_or_else(|| CollectionError::ValueNotFound(value.repr()))?;
        self.remove_at(index as i64).map(|_| ())
    }

    pub fn pop(&mut self) -> CollectionResult<Value> {
        self.policy.check_not_frozen("pop", KIND)?;
        self.remove_at(-1)
    }

    pub fn reverse(&mut self) -> CollectionResult<()> {
        self.policy.check_not_frozen("reverse", KIND)?;
        self.graph.reverse()?;
        names::update(self.graph.metadata_mut(), |names| names.reverse());
        Ok(())
    }

    pub fn clear(&mut self) -> CollectionResult<()> {
        self.policy.check_not_frozen("clear", KIND)?;
        self.graph.clear();
        names::update(self.graph.metadata_mut(), Vec::clear);
        self.policy.clear_elements();
        Ok(())
    }

    /// Element at `index`, or `None` when out of range
    pub fn get(&self, index: i64) -> Option<&Value> {
        self.graph.get_at_index(index)
    }

    /// Replace the element at `index`, returning the old value.
    ///
    /// Unlike `get`, a missing position is an error.
    pub fn set(&mut self, index: i64, value: impl Into<Value>) -> CollectionResult<Value> {
        let value = value.into();
        self.policy
            .admit("set", KIND, &value, self.graph.get_at_index(index))?;
        let holding = Holding::of(&value);
        let old = self.graph.set_at_index(index, value)?;
        self.policy.note_removed(Holding::of(&old));
        self.policy.note_added(holding);
        Ok(old)
    }

    pub fn first(&self) -> Option<&Value> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&Value> {
        self.get(-1)
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.iter().position(|candidate| candidate == value)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.index_of(value).is_some()
    }

    /// Append every value, or none of them
    pub fn extend<I>(&mut self, values: I) -> CollectionResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.policy.check_not_frozen("extend", KIND)?;
        let staged: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut preview = self.policy.clone();
        for value in &staged {
            preview.admit("extend", KIND, value, None)?;
            preview.note_added(Holding::of(value));
        }

        let before = self.len();
        for value in staged {
            if let Err(err) = self.push_checked(value) {
                while self.len() > before {
                    self.remove_at(-1)?;
                }
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.graph.values()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// Replace the whole name overlay; the count must match the length
    pub fn set_names(&mut self, new_names: Names) -> CollectionResult<()> {
        self.policy.check_not_frozen("set_names", KIND)?;
        if new_names.len() != self.len() {
            return Err(CollectionError::NameCountMismatch {
                expected: self.len(),
                actual: new_names.len(),
            });
        }
        names::store(self.graph.metadata_mut(), &new_names);
        Ok(())
    }

    pub fn get_names(&self) -> Option<Names> {
        names::load(self.graph.metadata())
    }

    pub fn get_name(&self, index: i64) -> Option<String> {
        let position = self.graph.resolve_index(index)?;
        self.get_names()?.into_iter().nth(position).flatten()
    }

    pub fn set_name(&mut self, index: i64, name: Option<String>) -> CollectionResult<()> {
        self.policy.check_not_frozen("set_name", KIND)?;
        let len = self.len();
        let position = self
            .graph
            .resolve_index(index)
            .ok_or(GraphError::IndexOutOfRange { index, len })?;
        names::assign(self.graph.metadata_mut(), len, position, name);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let position = names::position(self.graph.metadata(), name)?;
        self.get(position as i64)
    }

    /// Deep conversion to a JSON array
    pub fn to_plain(&self) -> JsonValue {
        JsonValue::Array(self.iter().map(Value::to_plain).collect())
    }

    /// `[1, 2, 3]`
    pub fn to_display_string(&self) -> String {
        self.to_display_string_with(&DisplayConfig::default())
    }

    pub fn to_display_string_with(&self, config: &DisplayConfig) -> String {
        format!("[{}]", join_limited(self.iter().map(Value::repr), config))
    }

    /// One-line structural summary
    pub fn inspect(&self) -> String {
        let graph = self.graph.graph();
        format!(
            "<{} size={} nodes={} edges={} frozen={} rules={}>",
            self.type_name(),
            self.len(),
            graph.node_count(),
            graph.edge_count(),
            self.is_frozen(),
            graph.control().get_active_rules().len()
        )
    }

    /// Append after the frozen, constraint and contamination checks passed
    fn push_checked(&mut self, value: Value) -> CollectionResult<()> {
        let holding = Holding::of(&value);
        self.graph.append(value)?;
        self.policy.note_added(holding);
        names::update(self.graph.metadata_mut(), |names| names.push(None));
        Ok(())
    }
}

impl Governed for ListValue {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ErrorKind, NO_BACKWARD_EDGES};
    use serde_json::json;

    fn nums(list: &ListValue) -> Vec<f64> {
        list.iter().filter_map(Value::as_number).collect()
    }

    #[test]
    fn test_basic_ops() {
        let mut list = ListValue::from_values([1, 2, 3]).unwrap();
        assert_eq!(list.get(-1), Some(&Value::from(3)));
        assert_eq!(list.get(3), None);
        assert_eq!(list.first(), Some(&Value::from(1)));

        list.insert(1, 9).unwrap();
        list.insert(-100, 0).unwrap();
        list.insert(100, 4).unwrap();
        assert_eq!(nums(&list), vec![0.0, 1.0, 9.0, 2.0, 3.0, 4.0]);

        list.remove(&Value::from(9)).unwrap();
        assert_eq!(list.pop().unwrap(), Value::from(4));
        assert_eq!(list.remove_at(0).unwrap(), Value::from(0));
        assert_eq!(nums(&list), vec![1.0, 2.0, 3.0]);

        let err = list.remove(&Value::from(42)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(list.graph().is_consistent());
    }

    #[test]
    fn test_set_out_of_range_raises() {
        let mut list = ListValue::from_values([1]).unwrap();
        assert_eq!(list.set(0, 5).unwrap(), Value::from(1));
        let err = list.set(1, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(nums(&list), vec![5.0]);
    }

    #[test]
    fn test_constraint() {
        let mut list = ListValue::with_constraint(TypeTag::Num);
        list.append(1).unwrap();
        let err = list.append("two").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert!(list.set(0, "x").is_err());
        assert_eq!(list.type_name(), "list<num>");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_freeze_is_deep() {
        let inner = ListValue::from_values([1]).unwrap();
        let mut outer = ListValue::new();
        outer.append(inner).unwrap();
        outer.freeze();

        assert!(outer.is_frozen());
        assert!(outer.contains_frozen());
        assert!(outer.first().unwrap().is_frozen());

        let err = outer.append(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Immutability);
        assert!(outer.insert(0, 2).is_err());
        assert!(outer.set(0, 2).is_err());
        assert!(outer.clear().is_err());
        assert!(outer.disable_rule(NO_BACKWARD_EDGES).is_err());
        assert_eq!(outer.len(), 1);
    }

    #[test]
    fn test_contamination() {
        let mut frozen = ListValue::new();
        frozen.freeze();
        let mut list = ListValue::new();
        list.append(frozen.clone()).unwrap();
        assert!(list.contains_frozen());

        let err = list.append(ListValue::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Immutability);
        list.append(frozen.clone()).unwrap();
        list.append(1).unwrap();

        // replacing the only frozen element is allowed
        let mut single = ListValue::from_values([Value::from(frozen)]).unwrap();
        single.set(0, ListValue::new()).unwrap();
        assert!(!single.contains_frozen());
    }

    #[test]
    fn test_contamination_follows_removals() {
        let mut frozen = ListValue::new();
        frozen.freeze();
        let mut list = ListValue::new();
        list.append(frozen.clone()).unwrap();
        list.append(frozen).unwrap();

        list.pop().unwrap();
        assert!(list.append(ListValue::new()).is_err());
        list.remove_at(0).unwrap();
        assert!(!list.contains_frozen());
        list.append(ListValue::new()).unwrap();

        // staged elements are checked against each other too
        let mut mixed = ListValue::new();
        let mut cold = ListValue::new();
        cold.freeze();
        let err = mixed
            .extend([Value::from(ListValue::new()), Value::from(cold)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Immutability);
        assert!(mixed.is_empty());
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut list = ListValue::with_constraint(TypeTag::Num);
        list.append(1).unwrap();
        assert!(list
            .extend([Value::from(2), Value::from("x"), Value::from(3)])
            .is_err());
        assert_eq!(nums(&list), vec![1.0]);
        list.extend([2, 3]).unwrap();
        assert_eq!(nums(&list), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_names_stay_in_sync() {
        let mut list = ListValue::from_values([10, 20, 30]).unwrap();
        assert_eq!(list.get_names(), None);
        assert!(list.set_names(vec![None]).is_err());

        list.set_name(-1, Some("c".to_string())).unwrap();
        assert_eq!(list.get_names(), Some(vec![None, None, Some("c".to_string())]));
        assert_eq!(list.get_by_name("c"), Some(&Value::from(30)));

        list.insert(0, 5).unwrap();
        list.append(40).unwrap();
        assert_eq!(list.get_names().unwrap().len(), list.len());
        assert_eq!(list.get_name(3), Some("c".to_string()));

        list.reverse().unwrap();
        assert_eq!(list.get_name(1), Some("c".to_string()));
        assert_eq!(list.get_by_name("c"), Some(&Value::from(30)));

        list.remove_at(1).unwrap();
        assert_eq!(list.get_by_name("c"), None);
        assert_eq!(list.get_names().unwrap().len(), list.len());
    }

    #[test]
    fn test_display_and_plain() {
        let mut list = ListValue::from_values([Value::from(1), Value::from("a")]).unwrap();
        list.append(ListValue::from_values([2]).unwrap()).unwrap();
        assert_eq!(list.to_display_string(), "[1, \"a\", [2]]");
        assert_eq!(list.to_plain(), json!([1, "a", [2]]));
        assert_eq!(
            list.to_display_string_with(&DisplayConfig { max_elements: Some(1) }),
            "[1, ...]"
        );
        assert_eq!(ListValue::new().to_display_string(), "[]");
        assert!(list.inspect().starts_with("<list size=3 nodes=3 edges=2"));
    }

    #[test]
    fn test_visualize() {
        let list = ListValue::from_values([1, 2]).unwrap();
        assert!(list.visualize_structure("dot").unwrap().starts_with("digraph"));
        let err = list.visualize_structure("png").unwrap_err();
        assert_eq!(err, CollectionError::UnsupportedFormat("png".to_string()));
        assert_eq!(list.get_graph_summary().node_count, 2);
    }
}
