//! Container values backed by the graph engine
//!
//! Each wrapper owns one specialized graph and adds the value-level checks
//! the graph knows nothing about:
//! - an optional element-type constraint
//! - a frozen flag, with a deep `freeze`
//! - the contamination check: one collection never mixes frozen and
//!   unfrozen container elements
//!
//! Every mutating method runs these checks before the graph is touched, so
//! a rejected call leaves the collection unchanged.

pub mod hash;
pub mod list;
pub mod names;
pub mod tree;

pub use hash::HashValue;
pub use list::ListValue;
pub use tree::TreeValue;

use crate::config::{DisplayConfig, VisualizeConfig};
use crate::graph::render::{self, GraphSummary, VisualFormat};
use crate::graph::{ControlLayer, ErrorKind, GraphError, GraphStructure, RuleStatus};
use crate::value::{TypeTag, Value};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised by container values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Constraint violation: expected {expected}, got {actual}")]
    ConstraintViolation { expected: TypeTag, actual: TypeTag },

    #[error("Cannot {operation} on frozen {container}")]
    FrozenMutation {
        operation: String,
        container: ContainerKind,
    },

    #[error("Cannot mix frozen and unfrozen data: {0}")]
    Contamination(String),

    #[error("Value not found: {0}")]
    ValueNotFound(String),

    #[error("Name not found: {0}")]
    NameNotFound(String),

    #[error("Expected {expected} names, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },

    #[error("Unsupported visualization format: {0}")]
    UnsupportedFormat(String),
}

impl CollectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectionError::Graph(err) => err.kind(),
            CollectionError::ConstraintViolation { .. } => ErrorKind::Constraint,
            CollectionError::FrozenMutation { .. } | CollectionError::Contamination(_) => {
                ErrorKind::Immutability
            }
            CollectionError::ValueNotFound(_) | CollectionError::NameNotFound(_) => ErrorKind::Lookup,
            CollectionError::NameCountMismatch { .. } | CollectionError::UnsupportedFormat(_) => {
                ErrorKind::Argument
            }
        }
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// The three container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    List,
    Hash,
    Tree,
}

const COMMON_METHODS: &[&str] = &[
    "size",
    "type",
    "inspect",
    "freeze",
    "is_frozen",
    "contains_frozen",
    "to_plain",
    "to_display_string",
    "get_active_rules",
    "get_rule_status",
    "disable_rule",
    "enable_rule",
    "get_graph_summary",
    "visualize_structure",
];

const LIST_METHODS: &[&str] = &[
    "append", "prepend", "insert", "remove_at", "remove", "pop", "reverse", "clear", "get", "set",
    "first", "last", "index_of", "contains", "extend", "to_vec", "set_names", "get_names",
    "get_name", "set_name", "get_by_name",
];

const HASH_METHODS: &[&str] = &[
    "set", "get", "has_key", "remove", "keys", "values", "items", "len", "clear", "set_names",
    "get_names", "get_name", "set_name", "get_by_name",
];

const TREE_METHODS: &[&str] = &[
    "insert", "contains", "height", "in_order", "pre_order", "post_order", "min", "max", "to_list",
    "clear",
];

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Hash => "hash",
            ContainerKind::Tree => "tree",
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            ContainerKind::List => TypeTag::List,
            ContainerKind::Hash => TypeTag::Hash,
            ContainerKind::Tree => TypeTag::Tree,
        }
    }

    /// Methods callable on values of this kind, for call validation at
    /// analysis time
    pub fn method_names(&self) -> Vec<&'static str> {
        let specific = match self {
            ContainerKind::List => LIST_METHODS,
            ContainerKind::Hash => HASH_METHODS,
            ContainerKind::Tree => TREE_METHODS,
        };
        specific.iter().chain(COMMON_METHODS).copied().collect()
    }

    pub fn has_method(&self, name: &str) -> bool {
        COMMON_METHODS.contains(&name)
            || match self {
                ContainerKind::List => LIST_METHODS.contains(&name),
                ContainerKind::Hash => HASH_METHODS.contains(&name),
                ContainerKind::Tree => TREE_METHODS.contains(&name),
            }
    }

    pub fn from_type_tag(tag: TypeTag) -> Option<Self> {
        match tag {
            TypeTag::List => Some(ContainerKind::List),
            TypeTag::Hash => Some(ContainerKind::Hash),
            TypeTag::Tree => Some(ContainerKind::Tree),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a stored element counts towards contamination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Holding {
    Scalar,
    FrozenContainer,
    OpenContainer,
}

impl Holding {
    pub(crate) fn of(value: &Value) -> Self {
        match (value.is_container(), value.is_frozen()) {
            (false, _) => Holding::Scalar,
            (true, true) => Holding::FrozenContainer,
            (true, false) => Holding::OpenContainer,
        }
    }
}

/// Constraint, frozen flag and contamination state shared by every wrapper.
///
/// Container elements are counted by frozen state as they come and go, so
/// the contamination check never walks the collection.
#[derive(Debug, Clone, Default)]
pub(crate) struct ElementPolicy {
    constraint: Option<TypeTag>,
    frozen: bool,
    frozen_containers: usize,
    open_containers: usize,
}

impl ElementPolicy {
    pub(crate) fn new(constraint: Option<TypeTag>) -> Self {
        ElementPolicy {
            constraint,
            ..Default::default()
        }
    }

    pub(crate) fn constraint(&self) -> Option<TypeTag> {
        self.constraint
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn contains_frozen(&self) -> bool {
        self.frozen || self.frozen_containers > 0
    }

    /// Vacuously true when unconstrained
    pub(crate) fn validate_constraint(&self, value: &Value) -> CollectionResult<()> {
        match self.constraint {
            Some(expected) if value.type_tag() != expected => Err(CollectionError::ConstraintViolation {
                expected,
                actual: value.type_tag(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_not_frozen(&self, operation: &str, container: ContainerKind) -> CollectionResult<()> {
        if self.frozen {
            return Err(CollectionError::FrozenMutation {
                operation: operation.to_string(),
                container,
            });
        }
        Ok(())
    }

    /// Reject `value` if storing it would put frozen and unfrozen containers
    /// side by side. `replaced` is the element it overwrites, if any.
    pub(crate) fn check_contamination(&self, value: &Value, replaced: Option<&Value>) -> CollectionResult<()> {
        let incoming = Holding::of(value);
        if incoming == Holding::Scalar {
            return Ok(());
        }
        let (mut frozen, mut open) = (self.frozen_containers, self.open_containers);
        match replaced.map(Holding::of) {
            Some(Holding::FrozenContainer) => frozen = frozen.saturating_sub(1),
            Some(Holding::OpenContainer) => open = open.saturating_sub(1),
            _ => {}
        }
        let reason = match incoming {
            Holding::FrozenContainer if open > 0 => {
                "frozen element added to a collection holding unfrozen data"
            }
            Holding::OpenContainer if frozen > 0 => {
                "unfrozen element added to a collection holding frozen data"
            }
            _ => return Ok(()),
        };
        Err(CollectionError::Contamination(reason.to_string()))
    }

    /// Full pre-mutation check for a value about to be stored
    pub(crate) fn admit(
        &self,
        operation: &str,
        container: ContainerKind,
        value: &Value,
        replaced: Option<&Value>,
    ) -> CollectionResult<()> {
        self.check_not_frozen(operation, container)?;
        self.validate_constraint(value)?;
        self.check_contamination(value, replaced)
    }

    pub(crate) fn note_added(&mut self, holding: Holding) {
        match holding {
            Holding::FrozenContainer => self.frozen_containers += 1,
            Holding::OpenContainer => self.open_containers += 1,
            Holding::Scalar => {}
        }
    }

    pub(crate) fn note_removed(&mut self, holding: Holding) {
        match holding {
            Holding::FrozenContainer => self.frozen_containers = self.frozen_containers.saturating_sub(1),
            Holding::OpenContainer => self.open_containers = self.open_containers.saturating_sub(1),
            Holding::Scalar => {}
        }
    }

    /// Forget every element, after the collection was emptied
    pub(crate) fn clear_elements(&mut self) {
        self.frozen_containers = 0;
        self.open_containers = 0;
    }

    /// Freezing is deep, so every held container is frozen afterwards
    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
        self.frozen_containers += self.open_containers;
        self.open_containers = 0;
    }
}

/// Append `, ...` style elision to a rendered element list
pub(crate) fn join_limited(items: impl Iterator<Item = String>, config: &DisplayConfig) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut elided = false;
    for (idx, item) in items.enumerate() {
        if config.max_elements.is_some_and(|max| idx >= max) {
            elided = true;
            break;
        }
        parts.push(item);
    }
    if elided {
        parts.push("...".to_string());
    }
    parts.join(", ")
}

/// Governance and introspection shared by every container value
pub trait Governed {
    fn container_kind(&self) -> ContainerKind;

    fn structure(&self) -> &GraphStructure;

    fn control_mut(&mut self) -> &mut ControlLayer;

    fn is_frozen(&self) -> bool;

    fn get_active_rules(&self) -> Vec<String> {
        self.structure().control().get_active_rules()
    }

    fn get_rule_status(&self, name: &str) -> Option<RuleStatus> {
        self.structure().control().get_rule_status(name)
    }

    /// Frozen values refuse governance changes too
    fn disable_rule(&mut self, name: &str) -> CollectionResult<()> {
        if self.is_frozen() {
            return Err(CollectionError::FrozenMutation {
                operation: "disable_rule".to_string(),
                container: self.container_kind(),
            });
        }
        Ok(self.control_mut().disable_rule(name)?)
    }

    fn enable_rule(&mut self, name: &str) -> CollectionResult<()> {
        if self.is_frozen() {
            return Err(CollectionError::FrozenMutation {
                operation: "enable_rule".to_string(),
                container: self.container_kind(),
            });
        }
        Ok(self.control_mut().enable_rule(name)?)
    }

    fn get_graph_summary(&self) -> GraphSummary {
        GraphSummary::of(self.structure())
    }

    /// Render the backing graph as `text`, `dot` or `mermaid`
    fn visualize_structure(&self, format: &str) -> CollectionResult<String> {
        self.visualize_structure_with(Some(format), &VisualizeConfig::default())
    }

    /// Render with explicit settings; `None` picks the configured default
    /// format
    fn visualize_structure_with(&self, format: Option<&str>, config: &VisualizeConfig) -> CollectionResult<String> {
        let format = match format {
            Some(name) => name
                .parse::<VisualFormat>()
                .map_err(CollectionError::UnsupportedFormat)?,
            None => config.default_format,
        };
        Ok(render::render(self.structure(), format, config.max_nodes))
    }
}
