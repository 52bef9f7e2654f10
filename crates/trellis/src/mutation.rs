//! The node insertion engine.
//!
//! Inserting a step is never a plain "add node + add edge": the branching
//! grammar requires rewiring so that a condition is always followed by
//! exactly one instruction and a fan-out only ever contains conditions. This
//! module owns that rule set. Given the requested step kind and the source
//! node, it inspects the source's current children and applies the first
//! matching rule:
//!
//! 1. Instruction above a condition fan-out: the new instruction becomes a
//!    merge point feeding every existing branch.
//! 2. Instruction before a single instruction child: splice into the
//!    sequence.
//! 3. Condition next to an existing condition child: append a new branch,
//!    together with an auto-generated follow-up instruction.
//! 4. Condition before a single instruction child: splice, with the
//!    follow-up instruction taking over the old child.
//! 5. Otherwise: append directly (conditions still get their follow-up).
//!
//! The follow-up instruction in rules 3-5 is what keeps a condition from
//! ever being a dead end. If the children of the source are a mix of kinds
//! (reachable only through the grammar-bypassing connect action), none of the
//! shaped rules match and rule 5 fires.

use log::debug;

use trellis_core::{
    flow::{Edge, FlowGraph, Node, NodeKind, StepKind},
    identifier::Id,
};

/// Inserts a step below `source_id`, rewiring edges per the branching rules.
///
/// Every node and edge created here gets a fresh random id. Returns `false`
/// without touching the graph when `source_id` does not resolve; callers
/// treat that as a silent no-op.
pub(crate) fn insert_step(graph: &mut FlowGraph, kind: StepKind, source_id: Id) -> bool {
    if !graph.contains_node(source_id) {
        debug!(source_id:% = source_id; "insert ignored: source node not found");
        return false;
    }

    let children: Vec<(Id, NodeKind)> = graph
        .children_of(source_id)
        .iter()
        .map(|child| (child.id, child.kind))
        .collect();

    let all_conditions =
        !children.is_empty() && children.iter().all(|(_, kind)| *kind == NodeKind::Condition);
    let single_instruction = match children.as_slice() {
        [(id, NodeKind::Instruction)] => Some(*id),
        _ => None,
    };
    let any_condition = children.iter().any(|(_, kind)| *kind == NodeKind::Condition);

    match kind {
        // Rule 1: instruction above a condition fan-out. The new instruction
        // takes over every branch.
        StepKind::Instruction if all_conditions => {
            let merge = Node::new(Id::random(), NodeKind::Instruction);
            let merge_id = merge.id;
            graph.push_node(merge);

            graph.retain_edges(|edge| edge.source != source_id);
            graph.push_edge(Edge::new(Id::random(), source_id, merge_id));
            for (child_id, _) in &children {
                graph.push_edge(Edge::new(Id::random(), merge_id, *child_id));
            }
            debug!(source_id:% = source_id, branches = children.len(); "inserted merge instruction above fan-out");
        }

        // Rule 2: instruction spliced before a single instruction child.
        StepKind::Instruction if single_instruction.is_some() => {
            let child_id = single_instruction.expect("matched above");
            let spliced = Node::new(Id::random(), NodeKind::Instruction);
            let spliced_id = spliced.id;
            graph.push_node(spliced);

            let old_edge = graph.outgoing_edge_ids(source_id)[0];
            graph.remove_edge(old_edge);
            graph.push_edge(Edge::new(Id::random(), source_id, spliced_id));
            graph.push_edge(Edge::new(Id::random(), spliced_id, child_id));
            debug!(source_id:% = source_id; "spliced instruction before existing instruction");
        }

        // Rule 3: condition appended next to an existing condition. The new
        // branch keeps its siblings and gets its own follow-up instruction.
        StepKind::Condition if any_condition => {
            let (condition_id, follow_up_id) = push_condition_with_follow_up(graph);
            graph.push_edge(Edge::new(Id::random(), source_id, condition_id));
            graph.push_edge(Edge::new(Id::random(), condition_id, follow_up_id));
            debug!(source_id:% = source_id; "appended condition branch to fan-out");
        }

        // Rule 4: condition spliced before a single instruction child; the
        // follow-up instruction takes over the old child.
        StepKind::Condition if single_instruction.is_some() => {
            let child_id = single_instruction.expect("matched above");
            let (condition_id, follow_up_id) = push_condition_with_follow_up(graph);

            let old_edge = graph.outgoing_edge_ids(source_id)[0];
            graph.remove_edge(old_edge);
            graph.push_edge(Edge::new(Id::random(), source_id, condition_id));
            graph.push_edge(Edge::new(Id::random(), condition_id, follow_up_id));
            graph.push_edge(Edge::new(Id::random(), follow_up_id, child_id));
            debug!(source_id:% = source_id; "spliced condition before existing instruction");
        }

        // Rule 5: default append.
        StepKind::Condition => {
            let (condition_id, follow_up_id) = push_condition_with_follow_up(graph);
            graph.push_edge(Edge::new(Id::random(), source_id, condition_id));
            graph.push_edge(Edge::new(Id::random(), condition_id, follow_up_id));
            debug!(source_id:% = source_id; "appended condition with follow-up");
        }
        StepKind::Instruction => {
            let node = Node::new(Id::random(), NodeKind::Instruction);
            let node_id = node.id;
            graph.push_node(node);
            graph.push_edge(Edge::new(Id::random(), source_id, node_id));
            debug!(source_id:% = source_id; "appended instruction");
        }
    }

    true
}

/// Creates a condition node plus its follow-up instruction, returning both
/// ids. Wiring is left to the caller, because the rules differ in what the
/// follow-up connects to.
fn push_condition_with_follow_up(graph: &mut FlowGraph) -> (Id, Id) {
    let condition = Node::new(Id::random(), NodeKind::Condition);
    let follow_up = Node::new(Id::random(), NodeKind::Instruction);
    let ids = (condition.id, follow_up.id);
    graph.push_node(condition);
    graph.push_node(follow_up);
    ids
}
