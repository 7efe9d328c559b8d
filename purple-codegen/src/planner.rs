//! Storage-slot planning
//!
//! Every constant leaf is stored into a stack slot before it can be loaded
//! for arithmetic. A slot is busy from the store until the load that
//! consumes it, after which the translator hands it back to the allocator.
//! Arithmetic results live in registers and hold no slot at all.
//!
//! The planner computes the peak number of slots busy at once, given the
//! best evaluation order at each node (Sethi-Ullman style): a subtree that
//! needs more slots is translated first, while its sibling holds nothing.
//! Needs are computed once per node into a `PlanNode` tree, which the
//! translator walks in step with the expression so plan and walk agree.

use crate::regalloc::RegisterAllocator;
use log::debug;
use purple_common::{NumberKind, RegisterId};
use purple_frontend::Expr;

/// One stack-resident storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub register: RegisterId,
    pub kind: NumberKind,
    /// Required alignment in bytes
    pub align: u32,
}

impl SlotDescriptor {
    pub fn new(register: RegisterId, kind: NumberKind) -> Self {
        Self {
            register,
            kind,
            align: kind.align(),
        }
    }

    pub fn byte_size(&self) -> u32 {
        self.kind.byte_size()
    }
}

/// Which operand subtree of a node is translated first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOrder {
    LeftFirst,
    RightFirst,
}

/// Slot need and evaluation order of every node, shaped like the expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanNode {
    Leaf,
    Binary {
        order: EvaluationOrder,
        need: usize,
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
}

impl PlanNode {
    /// Annotate `expr` bottom-up, visiting each node once
    pub fn build(expr: &Expr) -> Self {
        match expr {
            Expr::Number { .. } => PlanNode::Leaf,
            Expr::Binary { left, right, .. } => {
                let left = PlanNode::build(left);
                let right = PlanNode::build(right);
                let (order, need) = order_and_need(&left, &right);
                PlanNode::Binary {
                    order,
                    need,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        }
    }

    /// Peak number of simultaneously busy slots for this subtree
    pub fn need(&self) -> usize {
        match self {
            PlanNode::Leaf => 1,
            PlanNode::Binary { need, .. } => *need,
        }
    }

    /// Slots still held by a translated subtree while its sibling is translated
    fn held_after(&self) -> usize {
        match self {
            PlanNode::Leaf => 1,
            PlanNode::Binary { .. } => 0,
        }
    }
}

/// Peak number of simultaneously busy slots while translating `expr`
pub fn required_slots(expr: &Expr) -> usize {
    PlanNode::build(expr).need()
}

/// Order the translator uses for a node with these operands
pub fn evaluation_order(left: &Expr, right: &Expr) -> EvaluationOrder {
    order_and_need(&PlanNode::build(left), &PlanNode::build(right)).0
}

fn order_and_need(left: &PlanNode, right: &PlanNode) -> (EvaluationOrder, usize) {
    let left_first = left.need().max(left.held_after() + right.need());
    let right_first = right.need().max(right.held_after() + left.need());

    if right_first < left_first {
        (EvaluationOrder::RightFirst, right_first)
    } else {
        (EvaluationOrder::LeftFirst, left_first)
    }
}

/// Kind stored in the slots; every leaf of a tree shares it
fn storage_kind(expr: &Expr) -> NumberKind {
    let mut node = expr;
    loop {
        match node {
            Expr::Number { value, .. } => return value.kind(),
            Expr::Binary { left, .. } => node = left,
        }
    }
}

/// Build the slot worklist, numbering each slot from the allocator's counter
pub fn plan_slots(expr: &Expr, allocator: &mut RegisterAllocator) -> Vec<SlotDescriptor> {
    plan_translation(expr, allocator).1
}

/// Per-node plan for the tree walk together with the slot worklist
pub fn plan_translation(
    expr: &Expr,
    allocator: &mut RegisterAllocator,
) -> (PlanNode, Vec<SlotDescriptor>) {
    let plan = PlanNode::build(expr);
    let count = plan.need();
    let kind = storage_kind(expr);

    debug!("Planned {} slot(s) for {} leaves", count, expr.leaf_count());

    let slots = (0..count)
        .map(|_| SlotDescriptor::new(allocator.fresh(), kind))
        .collect();
    (plan, slots)
}
