//! Linear undo/redo over whole-graph snapshots.
//!
//! Each discrete user action commits the graph state *before* it mutates.
//! Continuous gestures (node drags) commit once, with the state captured at
//! drag start, so a drag-and-release is a single undoable step.

use std::collections::VecDeque;

use crate::graph::{GraphSnapshot, PipelineGraph};

/// Undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<GraphSnapshot>,
    redo_stack: Vec<GraphSnapshot>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    /// `max_depth` bounds the undo stack; zero is treated as one.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the current graph as the state prior to a pending mutation.
    pub fn commit(&mut self, graph: &PipelineGraph) {
        self.commit_snapshot(graph.snapshot());
    }

    /// Record an explicitly captured prior state (e.g. the drag-start graph).
    /// A new edit invalidates the redo future.
    pub fn commit_snapshot(&mut self, prior: GraphSnapshot) {
        self.push_undo(prior);
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: GraphSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Restore the previous snapshot. Returns false at the stack boundary.
    pub fn undo(&mut self, graph: &mut PipelineGraph) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(graph.snapshot());
        graph.restore(previous);
        true
    }

    /// Re-apply the most recently undone snapshot. Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self, graph: &mut PipelineGraph) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(graph.snapshot());
        graph.restore(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::palette::Template;

    fn template() -> Template {
        Template::new("k", "影像裁剪", "crop")
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut graph = PipelineGraph::default();
        let mut history = History::default();
        let before = graph.snapshot();

        history.commit(&graph);
        graph.add_node(&template(), Point::new(1.0, 2.0));
        let after = graph.snapshot();

        assert!(history.undo(&mut graph));
        assert_eq!(graph.snapshot(), before);
        assert!(history.redo(&mut graph));
        assert_eq!(graph.snapshot(), after);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut graph = PipelineGraph::default();
        let mut history = History::default();
        let before = graph.snapshot();
        assert!(!history.undo(&mut graph));
        assert!(!history.redo(&mut graph));
        assert_eq!(graph.snapshot(), before);
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut graph = PipelineGraph::default();
        let mut history = History::default();
        history.commit(&graph);
        graph.add_node(&template(), Point::ZERO);
        history.undo(&mut graph);
        assert!(history.can_redo());

        history.commit(&graph);
        graph.add_node(&template(), Point::ZERO);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut graph));
    }

    #[test]
    fn test_depth_bound_drops_oldest() {
        let mut graph = PipelineGraph::default();
        let mut history = History::new(3);
        for _ in 0..5 {
            history.commit(&graph);
            graph.add_node(&template(), Point::ZERO);
        }
        assert_eq!(history.undo_depth(), 3);
        while history.undo(&mut graph) {}
        // Two oldest steps were dropped: 2 nodes remain on top of the terminals
        assert_eq!(graph.nodes().len(), 4);
    }
}
