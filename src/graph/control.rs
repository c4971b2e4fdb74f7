//! Control layer: edge governance
//!
//! Every edge write is validated against an ordered table of named rules
//! before any adjacency map is touched. Structures of the same kind share
//! one canonical, read-only table; an instance only gets a private copy the
//! first time its rule set itself is changed (a rule added, replaced or
//! removed). Disabling a rule is tracked separately and never copies the
//! table.

use super::edge::{EdgeKind, EdgeMetadata, LEFT, RIGHT};
use super::node::Node;
use super::store::{GraphError, GraphResult, GraphStructure};
use super::types::{NodeId, StructureKind};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::debug;

pub const NO_BACKWARD_EDGES: &str = "no-backward-edges";
pub const SAME_STRUCTURE_ONLY: &str = "same-structure-only";
pub const MAX_TWO_CHILDREN: &str = "max-two-children";
pub const HIERARCHY_ONLY: &str = "hierarchy-only";
pub const NO_CYCLES_STRICT: &str = "no-cycles-strict";
pub const SINGLE_PARENT: &str = "single-parent";

/// Outcome of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
    Accept,
    Reject(String),
}

impl RuleVerdict {
    pub fn reject(reason: impl Into<String>) -> Self {
        RuleVerdict::Reject(reason.into())
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, RuleVerdict::Accept)
    }
}

/// First rule that rejected a prospective edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: String,
    pub reason: String,
}

impl From<RuleViolation> for GraphError {
    fn from(violation: RuleViolation) -> Self {
        GraphError::StructuralViolation {
            rule: violation.rule,
            reason: violation.reason,
        }
    }
}

/// Everything a rule may look at when judging an edge
pub struct RuleContext<'a> {
    pub structure: &'a GraphStructure,
    pub source: &'a Node,
    pub target: &'a Node,
    pub metadata: &'a EdgeMetadata,
    /// Chain positions of (source, target), when the caller already knows
    /// them
    pub positions: Option<(usize, usize)>,
}

impl<'a> RuleContext<'a> {
    pub fn kind(&self) -> StructureKind {
        self.structure.kind()
    }

    pub fn is_sequential(&self) -> bool {
        self.kind() == StructureKind::Sequential
    }

    /// Chain positions of the two endpoints.
    ///
    /// Without explicit positions they are read off the existing sequential
    /// edges. Either side may then be `None` for a node that is not linked
    /// into the chain yet.
    pub fn positions(&self) -> (Option<usize>, Option<usize>) {
        match self.positions {
            Some((from, to)) => (Some(from), Some(to)),
            None => (
                chain_position(self.source).or_else(|| self.metadata.index()),
                chain_position(self.target),
            ),
        }
    }
}

/// Position of a node according to its sequential edges.
///
/// Outgoing sequential edges carry the source's own position; the chain
/// predecessor is the latest incoming one.
fn chain_position(node: &Node) -> Option<usize> {
    node.outgoing()
        .values()
        .find_map(EdgeMetadata::index)
        .or_else(|| {
            node.incoming()
                .values()
                .filter_map(EdgeMetadata::index)
                .max()
                .map(|index| index + 1)
        })
}

/// Rule predicate signature
pub type RuleCheck = Arc<dyn Fn(&RuleContext<'_>) -> RuleVerdict + Send + Sync>;

/// Where a rule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOrigin {
    Builtin,
    Custom,
}

/// A named edge predicate
#[derive(Clone)]
pub struct Rule {
    name: String,
    description: String,
    origin: RuleOrigin,
    check: RuleCheck,
}

impl Rule {
    /// Create a custom rule
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleVerdict + Send + Sync + 'static,
    {
        Rule {
            name: name.into(),
            description: description.into(),
            origin: RuleOrigin::Custom,
            check: Arc::new(check),
        }
    }

    fn builtin<F>(name: &str, description: &str, check: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleVerdict + Send + Sync + 'static,
    {
        Rule {
            origin: RuleOrigin::Builtin,
            ..Rule::new(name, description, check)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }

    pub fn check(&self, ctx: &RuleContext<'_>) -> RuleVerdict {
        (self.check)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Introspection record for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStatus {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub origin: RuleOrigin,
}

static STANDARD_RULES: LazyLock<Arc<Vec<Rule>>> = LazyLock::new(|| Arc::new(standard_rules()));

static TREE_RULES: LazyLock<Arc<Vec<Rule>>> = LazyLock::new(|| {
    let mut rules = standard_rules();
    rules.extend(tree_rules());
    Arc::new(rules)
});

fn standard_rules() -> Vec<Rule> {
    vec![
        Rule::builtin(
            NO_BACKWARD_EDGES,
            "sequential edges must point to a strictly later position",
            no_backward_edges,
        ),
        Rule::builtin(
            SAME_STRUCTURE_ONLY,
            "both endpoints must belong to this structure",
            same_structure_only,
        ),
    ]
}

fn tree_rules() -> Vec<Rule> {
    vec![
        Rule::builtin(
            MAX_TWO_CHILDREN,
            "a node has at most one left and one right child",
            max_two_children,
        ),
        Rule::builtin(
            HIERARCHY_ONLY,
            "structural tree edges must be labeled left or right",
            hierarchy_only,
        ),
        Rule::builtin(
            NO_CYCLES_STRICT,
            "an edge may not close a cycle of any length",
            no_cycles_strict,
        ),
        Rule::builtin(
            SINGLE_PARENT,
            "a node has at most one parent",
            single_parent,
        ),
    ]
}

fn no_backward_edges(ctx: &RuleContext<'_>) -> RuleVerdict {
    if !ctx.is_sequential() {
        return RuleVerdict::Accept;
    }
    if ctx.source.id() == ctx.target.id() {
        return RuleVerdict::reject(format!("self loop on {}", ctx.source.id()));
    }
    match ctx.positions() {
        (Some(from), Some(to)) if to <= from => RuleVerdict::reject(format!(
            "edge from index {} to index {} does not point forward",
            from, to
        )),
        // an unlinked target takes the next free slot
        _ => RuleVerdict::Accept,
    }
}

/// Nodes are resolved from the structure's own arena before rules run, so
/// through `add_edge` this only fires for a node whose back-reference has
/// drifted. Hand-built contexts can exercise it directly.
fn same_structure_only(ctx: &RuleContext<'_>) -> RuleVerdict {
    if !ctx.is_sequential() {
        return RuleVerdict::Accept;
    }
    let own = Some(ctx.structure.id());
    for node in [ctx.source, ctx.target] {
        if node.structure() != own || !ctx.structure.contains_node(node.id()) {
            return RuleVerdict::reject(format!(
                "{} is not part of {}",
                node.id(),
                ctx.structure.id()
            ));
        }
    }
    RuleVerdict::Accept
}

fn max_two_children(ctx: &RuleContext<'_>) -> RuleVerdict {
    if !ctx.metadata.is_child_slot() {
        return RuleVerdict::Accept;
    }
    let source = ctx.source;
    if source.child_count() >= 2 {
        return RuleVerdict::reject(format!("{} already has two children", source.id()));
    }
    let slot = ctx.metadata.label().unwrap_or_default();
    match source.child(slot) {
        Some(existing) if existing != ctx.target.id() => RuleVerdict::reject(format!(
            "{} slot of {} is already occupied by {}",
            slot,
            source.id(),
            existing
        )),
        _ => RuleVerdict::Accept,
    }
}

fn hierarchy_only(ctx: &RuleContext<'_>) -> RuleVerdict {
    match &ctx.metadata.kind {
        EdgeKind::Named(label) if label == LEFT || label == RIGHT => RuleVerdict::Accept,
        EdgeKind::Typed(_) => RuleVerdict::Accept,
        EdgeKind::Named(label) => RuleVerdict::reject(format!(
            "tree edges must be labeled {} or {}, got {:?}",
            LEFT, RIGHT, label
        )),
        other => RuleVerdict::reject(format!(
            "tree edges must be labeled {} or {}, got {:?}",
            LEFT, RIGHT, other
        )),
    }
}

fn no_cycles_strict(ctx: &RuleContext<'_>) -> RuleVerdict {
    let (from, to) = (ctx.source.id(), ctx.target.id());
    if from == to {
        return RuleVerdict::reject(format!("self loop on {}", from));
    }
    if ctx.structure.can_reach(to, from) {
        return RuleVerdict::reject(format!("{} already reaches {}", to, from));
    }
    RuleVerdict::Accept
}

fn single_parent(ctx: &RuleContext<'_>) -> RuleVerdict {
    if !ctx.metadata.is_child_slot() {
        return RuleVerdict::Accept;
    }
    match ctx.target.parent() {
        Some(parent) if parent != ctx.source.id() => {
            RuleVerdict::reject(format!("{} already has parent {}", ctx.target.id(), parent))
        }
        _ => RuleVerdict::Accept,
    }
}

/// Shared-until-written rule table
#[derive(Debug, Clone)]
enum RuleTable {
    Shared(Arc<Vec<Rule>>),
    Owned(Vec<Rule>),
}

impl RuleTable {
    fn rules(&self) -> &[Rule] {
        match self {
            RuleTable::Shared(rules) => rules,
            RuleTable::Owned(rules) => rules,
        }
    }
}

/// Per-structure rule engine
#[derive(Debug, Clone)]
pub struct ControlLayer {
    table: RuleTable,
    disabled: HashSet<String>,
}

impl ControlLayer {
    /// Layer sharing the canonical table for a structure kind
    pub fn for_kind(kind: StructureKind) -> Self {
        let shared = match kind {
            StructureKind::Tree => Arc::clone(&TREE_RULES),
            _ => Arc::clone(&STANDARD_RULES),
        };
        ControlLayer {
            table: RuleTable::Shared(shared),
            disabled: HashSet::new(),
        }
    }

    /// True once this instance owns a private rule table
    pub fn is_customized(&self) -> bool {
        matches!(self.table, RuleTable::Owned(_))
    }

    /// True when both layers still point at the same shared table
    pub fn shares_table_with(&self, other: &ControlLayer) -> bool {
        match (&self.table, &other.table) {
            (RuleTable::Shared(a), RuleTable::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        self.table.rules()
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules().iter().any(|rule| rule.name() == name)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    /// Run every enabled rule in registration order.
    ///
    /// Returns the first rejection, or `Ok(())` when all rules accept.
    pub fn validate_edge_operation(&self, ctx: &RuleContext<'_>) -> Result<(), RuleViolation> {
        for rule in self.rules() {
            if self.disabled.contains(rule.name()) {
                continue;
            }
            if let RuleVerdict::Reject(reason) = rule.check(ctx) {
                debug!(
                    rule = rule.name(),
                    source = ctx.source.id().as_u64(),
                    target = ctx.target.id().as_u64(),
                    %reason,
                    "edge rejected"
                );
                return Err(RuleViolation {
                    rule: rule.name().to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Turn a rule off without deleting it
    pub fn disable_rule(&mut self, name: &str) -> GraphResult<()> {
        if !self.has_rule(name) {
            return Err(GraphError::UnknownRule(name.to_string()));
        }
        self.disabled.insert(name.to_string());
        Ok(())
    }

    pub fn enable_rule(&mut self, name: &str) -> GraphResult<()> {
        if !self.has_rule(name) {
            return Err(GraphError::UnknownRule(name.to_string()));
        }
        self.disabled.remove(name);
        Ok(())
    }

    /// Register a rule, replacing any rule of the same name in place
    pub fn add_rule(&mut self, rule: Rule) {
        let rules = self.customize();
        match rules.iter_mut().find(|existing| existing.name() == rule.name()) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    /// Delete a rule from this instance's table
    pub fn remove_rule(&mut self, name: &str) -> GraphResult<Rule> {
        let position = self
            .rules()
            .iter()
            .position(|rule| rule.name() == name)
            .ok_or_else(|| GraphError::UnknownRule(name.to_string()))?;
        self.disabled.remove(name);
        Ok(self.customize().remove(position))
    }

    /// Names of rules that currently run
    pub fn get_active_rules(&self) -> Vec<String> {
        self.rules()
            .iter()
            .filter(|rule| !self.disabled.contains(rule.name()))
            .map(|rule| rule.name().to_string())
            .collect()
    }

    pub fn get_rule_status(&self, name: &str) -> Option<RuleStatus> {
        self.rules()
            .iter()
            .find(|rule| rule.name() == name)
            .map(|rule| RuleStatus {
                name: rule.name().to_string(),
                description: rule.description().to_string(),
                enabled: !self.disabled.contains(name),
                origin: rule.origin(),
            })
    }

    /// Disabled rule names, in table order
    pub fn disabled_rules(&self) -> Vec<String> {
        self.rules()
            .iter()
            .filter(|rule| self.disabled.contains(rule.name()))
            .map(|rule| rule.name().to_string())
            .collect()
    }

    /// Switch to a private table on first write
    fn customize(&mut self) -> &mut Vec<Rule> {
        if let RuleTable::Shared(shared) = &self.table {
            debug!(rules = shared.len(), "copying shared rule table");
            self.table = RuleTable::Owned(shared.as_ref().clone());
        }
        match &mut self.table {
            RuleTable::Owned(rules) => rules,
            // not reached: the table was made private above
            RuleTable::Shared(shared) => Arc::make_mut(shared),
        }
    }
}
