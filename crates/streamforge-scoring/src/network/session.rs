//! Network construction and event dispatch.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use smallvec::smallvec;
use streamforge_core::{
    ConstraintRef, FactValue, Result, Score, SolutionDescriptor, StreamForgeError,
};
use tracing::debug;

use super::scorer::ConstraintScorer;
use super::{Node, NodeId, Propagation, Side, StreamId, Target, TupleArena, TupleEvent, TupleId, TupleState};
use crate::api::{ConstraintProvider, ConstraintWeightOverrides, WeightProvider};
use crate::stream::ConstraintFactory;

struct PendingNode {
    node: Box<dyn Node>,
    inputs: Vec<(StreamId, Side)>,
    output: StreamId,
}

/// Graph under construction, filled by the stream API.
///
/// Errors found while streams are declared (an unknown fact class, say) are
/// recorded and reported when the network is built.
#[derive(Default)]
pub(crate) struct NetworkBuilder {
    class_ordinals: HashMap<TypeId, usize>,
    class_names: Vec<&'static str>,
    stream_count: usize,
    sources: HashMap<usize, StreamId>,
    nodes: Vec<PendingNode>,
    errors: Vec<StreamForgeError>,
}

impl NetworkBuilder {
    pub(crate) fn new(descriptor: &SolutionDescriptor) -> Self {
        let mut builder = Self::default();
        for class in descriptor.fact_classes() {
            if let Some(fact) = descriptor.fact_descriptor(class) {
                builder
                    .class_ordinals
                    .insert(fact.type_id, descriptor.class_ordinal(class));
                builder.class_names.push(fact.type_name);
            }
        }
        builder
    }

    /// Returns the source stream of fact type `type_id`, creating it on first
    /// use. Every `for_each` of one class shares the same source.
    pub(crate) fn source(&mut self, type_id: TypeId, type_name: &str) -> StreamId {
        let Some(&ordinal) = self.class_ordinals.get(&type_id) else {
            self.errors.push(StreamForgeError::Config(format!(
                "fact type {} is not a registered fact class (known: {})",
                type_name,
                self.class_names.join(", ")
            )));
            // Placeholder stream; the build fails before it is used.
            return self.new_stream();
        };
        if let Some(&stream) = self.sources.get(&ordinal) {
            return stream;
        }
        let stream = self.new_stream();
        self.sources.insert(ordinal, stream);
        stream
    }

    pub(crate) fn add_node(&mut self, node: Box<dyn Node>, inputs: &[(StreamId, Side)]) -> StreamId {
        let output = self.new_stream();
        self.nodes.push(PendingNode {
            node,
            inputs: inputs.to_vec(),
            output,
        });
        output
    }

    fn new_stream(&mut self) -> StreamId {
        self.stream_count += 1;
        StreamId(self.stream_count - 1)
    }
}

/// A built network plus its tuples.
pub(crate) struct Session<Sc: Score> {
    arena: TupleArena,
    nodes: Vec<Box<dyn Node>>,
    node_outputs: Vec<StreamId>,
    children: Vec<Vec<Target>>,
    /// Source stream per class ordinal; `None` when no constraint reads the class.
    sources: Vec<Option<StreamId>>,
    scorers: Vec<ConstraintScorer<Sc>>,
}

impl<Sc: Score> Session<Sc> {
    /// Whether facts of the class at `ordinal` feed any constraint.
    pub(crate) fn reads_class(&self, ordinal: usize) -> bool {
        matches!(self.sources.get(ordinal), Some(Some(_)))
    }

    /// Inserts a fact at its class source. Returns `None` for classes no
    /// constraint reads.
    pub(crate) fn insert_fact(&mut self, ordinal: usize, fact: FactValue) -> Result<Option<TupleId>> {
        let Some(stream) = self.source(ordinal) else {
            return Ok(None);
        };
        let id = self.arena.create(smallvec![fact]);
        self.fire(stream, TupleEvent::Insert, id)?;
        Ok(Some(id))
    }

    pub(crate) fn update_fact(&mut self, ordinal: usize, id: TupleId, fact: FactValue) -> Result<()> {
        let stream = self.source(ordinal).ok_or_else(|| not_read(ordinal))?;
        self.arena.replace_facts(id, smallvec![fact])?;
        self.fire(stream, TupleEvent::Update, id)
    }

    pub(crate) fn retract_fact(&mut self, ordinal: usize, id: TupleId) -> Result<()> {
        let stream = self.source(ordinal).ok_or_else(|| not_read(ordinal))?;
        self.fire(stream, TupleEvent::Retract, id)
    }

    fn source(&self, ordinal: usize) -> Option<StreamId> {
        self.sources.get(ordinal).copied().flatten()
    }

    /// Moves a tuple through its lifecycle and hands the event to every
    /// listener of `stream`, depth-first.
    fn fire(&mut self, stream: StreamId, event: TupleEvent, id: TupleId) -> Result<()> {
        match event {
            TupleEvent::Insert => {
                self.arena
                    .transition(id, TupleState::Creating, TupleState::Active)?;
                self.deliver(stream, event, id)
            }
            TupleEvent::Update => {
                self.arena.expect_state(id, TupleState::Active)?;
                self.deliver(stream, event, id)
            }
            TupleEvent::Retract => {
                self.arena
                    .transition(id, TupleState::Active, TupleState::Dying)?;
                self.deliver(stream, event, id)?;
                self.arena
                    .transition(id, TupleState::Dying, TupleState::Dead)?;
                self.arena.release(id)
            }
        }
    }

    fn deliver(&mut self, stream: StreamId, event: TupleEvent, id: TupleId) -> Result<()> {
        for position in 0..self.children[stream.0].len() {
            match self.children[stream.0][position] {
                Target::Node { node, side } => {
                    let mut ctx = Propagation::new(&mut self.arena);
                    let target = &mut self.nodes[node.0];
                    match event {
                        TupleEvent::Insert => target.insert(side, id, &mut ctx)?,
                        TupleEvent::Update => target.update(side, id, &mut ctx)?,
                        TupleEvent::Retract => target.retract(side, id, &mut ctx)?,
                    }
                    let output = self.node_outputs[node.0];
                    for (emitted, tuple) in ctx.into_emitted() {
                        self.fire(output, emitted, tuple)?;
                    }
                }
                Target::Scorer(index) => {
                    let tuple = self.arena.get(id)?;
                    self.scorers[index].on_event(event, id, tuple)?;
                }
            }
        }
        Ok(())
    }

    /// Sum of every constraint total.
    pub(crate) fn score(&self) -> Sc {
        self.scorers
            .iter()
            .fold(Sc::zero(), |total, scorer| total + scorer.total())
    }

    pub(crate) fn scorers(&self) -> &[ConstraintScorer<Sc>] {
        &self.scorers
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn live_tuple_count(&self) -> usize {
        self.arena.live_count()
    }
}

fn not_read(ordinal: usize) -> StreamForgeError {
    StreamForgeError::InvalidState(format!(
        "fact class #{} is not read by any constraint",
        ordinal
    ))
}

/// Builds the network of `provider` for solutions described by `descriptor`.
///
/// Fails on unknown fact classes, duplicate constraint names and overrides
/// naming no constraint. Constraints whose weight is zero get no scorer
/// input, and nodes that no longer reach a scorer are dropped.
pub(crate) fn build_session<Sc, P>(
    descriptor: &SolutionDescriptor,
    provider: &P,
    overrides: &ConstraintWeightOverrides<Sc>,
    track_matches: bool,
) -> Result<Session<Sc>>
where
    Sc: Score,
    P: ConstraintProvider<Sc> + ?Sized,
{
    descriptor.validate()?;
    let factory = ConstraintFactory::new(descriptor);
    let constraints = provider.define_constraints(&factory);
    let builder = factory.into_builder();
    if let Some(error) = builder.errors.into_iter().next() {
        return Err(error);
    }

    let mut seen = HashSet::new();
    for constraint in &constraints {
        if !seen.insert(constraint.constraint_ref.full_name()) {
            return Err(StreamForgeError::Config(format!(
                "constraint {} is defined more than once",
                constraint.constraint_ref
            )));
        }
    }
    let refs: Vec<ConstraintRef> = constraints
        .iter()
        .map(|c| c.constraint_ref.clone())
        .collect();
    if let Some(name) = overrides.unknown_names(&refs).first() {
        return Err(StreamForgeError::Config(format!(
            "weight override for unknown constraint {}",
            name
        )));
    }

    let mut children: Vec<Vec<Target>> = vec![Vec::new(); builder.stream_count];
    let mut scorers = Vec::with_capacity(constraints.len());
    for constraint in constraints {
        let weight =
            overrides.weight_or_default(&constraint.constraint_ref.full_name(), constraint.weight);
        if weight != Sc::zero() {
            children[constraint.stream.0].push(Target::Scorer(scorers.len()));
        }
        scorers.push(ConstraintScorer::new(
            constraint.constraint_ref,
            constraint.impact_type,
            weight,
            constraint.match_weight,
            constraint.justify,
            track_matches,
        ));
    }

    // Nodes are created after their inputs, so one reverse pass finds every
    // stream that reaches a scorer.
    let mut reaches_scorer: Vec<bool> = children.iter().map(|c| !c.is_empty()).collect();
    let mut live = vec![false; builder.nodes.len()];
    for (index, pending) in builder.nodes.iter().enumerate().rev() {
        if reaches_scorer[pending.output.0] {
            live[index] = true;
            for (input, _) in &pending.inputs {
                reaches_scorer[input.0] = true;
            }
        }
    }

    let declared = builder.nodes.len();
    let mut nodes = Vec::new();
    let mut node_outputs = Vec::new();
    let mut node_children: Vec<Vec<Target>> = vec![Vec::new(); builder.stream_count];
    for (pending, keep) in builder.nodes.into_iter().zip(live) {
        if !keep {
            continue;
        }
        let id = NodeId(nodes.len());
        for &(input, side) in &pending.inputs {
            node_children[input.0].push(Target::Node { node: id, side });
        }
        nodes.push(pending.node);
        node_outputs.push(pending.output);
    }
    // Node listeners first, then scorers, each in declaration order.
    for (stream, mut targets) in node_children.into_iter().enumerate() {
        targets.append(&mut children[stream]);
        children[stream] = targets;
    }

    let mut sources = vec![None; descriptor.class_count()];
    for (&ordinal, &stream) in &builder.sources {
        if reaches_scorer[stream.0] {
            sources[ordinal] = Some(stream);
        }
    }

    debug!(
        constraint_count = scorers.len(),
        node_count = nodes.len(),
        stream_count = builder.stream_count,
        pruned_node_count = declared - nodes.len(),
        "Constraint network built"
    );

    Ok(Session {
        arena: TupleArena::new(),
        nodes,
        node_outputs,
        children,
        sources,
        scorers,
    })
}
