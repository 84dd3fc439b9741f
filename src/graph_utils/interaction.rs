//! Selection and route-marking state machines.
//!
//! The frontend maps whatever input device it has onto an [`InteractionMode`]
//! and hands it to [`GraphRegistry::interact`] together with the node that was
//! hit. Primary modes drive selection/connection; `MarkRoute` drives route
//! marking; `Cancel` abandons whatever is pending in both machines.

use log::debug;

use super::graph::{GraphRegistry, MarkerColor, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    // Connect to the selected node, then drop the selection
    ConfirmAndRelease,
    // Connect to the selected node, then keep going from the clicked one
    ConfirmAndContinue,
    Cancel,
    MarkRoute,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionOutcome {
    Selected(NodeId),
    Deselected(NodeId),
    Connected { from: NodeId, to: NodeId, distance: f64 },
    // Pair already connected; selection left as it was
    ConnectRejected { from: NodeId, to: NodeId },
    RouteStarted(NodeId),
    RouteMarked { from: NodeId, to: NodeId },
    Cancelled,
    Ignored,
}

impl GraphRegistry {
    pub fn interact(&mut self, clicked: NodeId, mode: InteractionMode) -> InteractionOutcome {
        let outcome = match mode {
            InteractionMode::Cancel => self.cancel_pending(),
            _ if self.node(clicked).is_none() => InteractionOutcome::Ignored,
            InteractionMode::ConfirmAndRelease => self.select_or_connect(clicked, false),
            InteractionMode::ConfirmAndContinue => self.select_or_connect(clicked, true),
            InteractionMode::MarkRoute => self.mark_route(clicked),
        };
        debug!("interaction {:?} on node {} -> {:?}", mode, clicked, outcome);
        outcome
    }

    fn select_or_connect(&mut self, clicked: NodeId, chain: bool) -> InteractionOutcome {
        let Some(selected) = self.selected else {
            self.selected = Some(clicked);
            return InteractionOutcome::Selected(clicked);
        };
        if selected == clicked {
            self.selected = None;
            return InteractionOutcome::Deselected(clicked);
        }
        if !self.connect(selected, clicked) {
            return InteractionOutcome::ConnectRejected { from: selected, to: clicked };
        }
        self.selected = if chain { Some(clicked) } else { None };
        let distance = self.distance(selected, clicked).unwrap_or_default();
        InteractionOutcome::Connected { from: selected, to: clicked, distance }
    }

    fn mark_route(&mut self, clicked: NodeId) -> InteractionOutcome {
        match self.route_start {
            None => {
                self.route_start = Some(clicked);
                self.set_marker(clicked, MarkerColor::random());
                InteractionOutcome::RouteStarted(clicked)
            }
            Some(start) if start == clicked => InteractionOutcome::Ignored,
            Some(start) => {
                let color = self
                    .node(start)
                    .and_then(|n| n.marker)
                    .unwrap_or_else(MarkerColor::random);
                self.set_marker(clicked, color);
                self.routes.push(start, clicked);
                self.route_start = None;
                InteractionOutcome::RouteMarked { from: start, to: clicked }
            }
        }
    }

    // Drop a pending selection and a pending route start
    pub fn cancel_pending(&mut self) -> InteractionOutcome {
        if self.selected.is_none() && self.route_start.is_none() {
            return InteractionOutcome::Ignored;
        }
        self.selected = None;
        self.route_start = None;
        InteractionOutcome::Cancelled
    }
}
