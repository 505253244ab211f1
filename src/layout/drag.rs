use std::cmp::Ordering;
use std::f32::consts::TAU;

use super::{LayoutResult, NodeIdx, Point, PositionOverrides};

/// Baseline angular order of one parent's children.
#[derive(Debug, Clone)]
struct SiblingOrder {
    parent: NodeIdx,
    children: Vec<NodeIdx>,
    /// Ray angles are measured from; sits in the widest gap between children.
    reference: f32,
    baseline: Vec<f32>,
}

impl SiblingOrder {
    fn relative_angles(
        &self,
        result: &LayoutResult<'_>,
        overrides: &PositionOverrides,
    ) -> Vec<f32> {
        let center = result.node_rect(self.parent, overrides).center();
        self.children
            .iter()
            .map(|child| {
                let c = result.node_rect(*child, overrides).center();
                (ray_angle(center, c) - self.reference).rem_euclid(TAU)
            })
            .collect()
    }
}

fn ray_angle(from: Point, to: Point) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Middle of the widest angular gap between the given angles. Ties keep
/// the gap that starts at the smallest angle.
fn widest_gap_middle(angles: &[f32]) -> f32 {
    let mut sorted = angles.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mut best = (f32::NEG_INFINITY, 0.0);
    for (i, angle) in sorted.iter().enumerate() {
        let next = match sorted.get(i + 1) {
            Some(next) => *next,
            None => sorted[0] + TAU,
        };
        let gap = next - angle;
        if gap > best.0 {
            best = (gap, angle + gap / 2.0);
        }
    }
    best.1
}

/// Result of proposing one drag step.
#[derive(Debug, Clone, PartialEq)]
pub enum DragStep {
    /// The move is valid; this is the new override map.
    Committed(PositionOverrides),
    /// The move would reorder some siblings.
    Rejected,
    /// The node id is not part of the layout.
    Stale,
}

/// Sibling-order snapshot of an unmodified layout. A manual move is
/// accepted only when no parent's children change their angular order
/// around it.
#[derive(Debug, Clone)]
pub struct CrossingGuard {
    orders: Vec<SiblingOrder>,
}

impl CrossingGuard {
    pub fn new(result: &LayoutResult<'_>) -> Self {
        let untouched = PositionOverrides::new();
        let mut orders = Vec::new();
        for idx in result.tree.indices() {
            let node = result.tree.node(idx);
            if node.children.len() < 2 {
                continue;
            }
            let center = result.node_rect(idx, &untouched).center();
            let absolute: Vec<f32> = node
                .children
                .iter()
                .map(|child| ray_angle(center, result.node_rect(*child, &untouched).center()))
                .collect();
            let mut order = SiblingOrder {
                parent: idx,
                children: node.children.clone(),
                reference: widest_gap_middle(&absolute),
                baseline: Vec::new(),
            };
            order.baseline = order.relative_angles(result, &untouched);
            orders.push(order);
        }
        Self { orders }
    }

    /// True when no sibling pair under any parent reverses its order.
    pub fn accepts(&self, result: &LayoutResult<'_>, overrides: &PositionOverrides) -> bool {
        self.orders.iter().all(|order| {
            let current = order.relative_angles(result, overrides);
            let n = order.children.len();
            (0..n).all(|i| {
                (i + 1..n).all(|j| {
                    let before = order.baseline[i].total_cmp(&order.baseline[j]);
                    let after = current[i].total_cmp(&current[j]);
                    before == Ordering::Equal || after != before.reverse()
                })
            })
        })
    }

    /// Moves `node_id` and its descendants by `delta` from where they are
    /// under `overrides`. The input map is never modified.
    pub fn propose_move(
        &self,
        result: &LayoutResult<'_>,
        overrides: &PositionOverrides,
        node_id: &str,
        delta: Point,
    ) -> DragStep {
        let Some(idx) = result.tree.find(node_id) else {
            return DragStep::Stale;
        };
        let mut candidate = overrides.clone();
        for member in result.tree.subtree(idx) {
            let rect = result.node_rect(member, overrides);
            candidate.insert(
                result.tree.node(member).id.clone(),
                Point::new(rect.x + delta.x, rect.y + delta.y),
            );
        }
        if self.accepts(result, &candidate) {
            DragStep::Committed(candidate)
        } else {
            tracing::debug!(node = node_id, dx = delta.x, dy = delta.y, "drag rejected");
            DragStep::Rejected
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { node: String, last_pointer: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Not dragging, or the node disappeared from the layout.
    Ignored,
    Moved,
    /// The step was refused and the drag ended.
    Rejected,
}

/// Interactive drag over one computed layout. Owns the override map.
pub struct DragSession<'r, 'a> {
    result: &'r LayoutResult<'a>,
    guard: CrossingGuard,
    overrides: PositionOverrides,
    state: DragState,
}

impl<'r, 'a> DragSession<'r, 'a> {
    pub fn new(result: &'r LayoutResult<'a>) -> Self {
        Self::resume(result, PositionOverrides::new())
    }

    /// Continues with overrides accepted earlier for the same layout.
    pub fn resume(result: &'r LayoutResult<'a>, overrides: PositionOverrides) -> Self {
        Self {
            result,
            guard: CrossingGuard::new(result),
            overrides,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn overrides(&self) -> &PositionOverrides {
        &self.overrides
    }

    pub fn into_overrides(self) -> PositionOverrides {
        self.overrides
    }

    /// Starts dragging `node_id`. Returns false if the node is unknown.
    pub fn pointer_down(&mut self, node_id: &str, pointer: Point) -> bool {
        if self.result.tree.find(node_id).is_none() {
            return false;
        }
        self.state = DragState::Dragging {
            node: node_id.to_string(),
            last_pointer: pointer,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) -> DragOutcome {
        let DragState::Dragging { node, last_pointer } = &self.state else {
            return DragOutcome::Ignored;
        };
        let delta = Point::new(pointer.x - last_pointer.x, pointer.y - last_pointer.y);
        match self
            .guard
            .propose_move(self.result, &self.overrides, node, delta)
        {
            DragStep::Committed(next) => {
                self.overrides = next;
                self.state = DragState::Dragging {
                    node: node.clone(),
                    last_pointer: pointer,
                };
                DragOutcome::Moved
            }
            DragStep::Rejected => {
                self.state = DragState::Idle;
                DragOutcome::Rejected
            }
            DragStep::Stale => {
                self.state = DragState::Idle;
                DragOutcome::Ignored
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Drops all manual positions.
    pub fn clear(&mut self) {
        self.overrides.clear();
        self.state = DragState::Idle;
    }
}
