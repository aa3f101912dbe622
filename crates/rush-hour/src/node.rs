//! Search nodes and solution reconstruction.
//!
//! Nodes live in an arena owned by one search run. A node refers to its
//! parent by index, so a whole solution chain stays alive exactly as long as
//! the tree does.

use std::ops::Index;
use std::rc::Rc;

use crate::moves::Action;
use crate::puzzle::Board;

/// Handle to a node inside a [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A board reached during search
#[derive(Debug, Clone)]
pub struct Node {
    pub board: Rc<Board>,
    pub parent: Option<NodeId>,
    /// The slide that produced this node, `None` for the root
    pub action: Option<Action>,
    /// Moves from the root
    pub g: u32,
    /// `g` plus the heuristic estimate; equal to `g` in uninformed search
    pub f: f64,
}

#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_root(&mut self, board: Rc<Board>, h: f64) -> NodeId {
        self.push(Node {
            board,
            parent: None,
            action: None,
            g: 0,
            f: h,
        })
    }

    /// Add the node reached from `parent` by `action`, one move deeper.
    pub fn push_child(&mut self, parent: NodeId, action: Action, board: Rc<Board>, h: f64) -> NodeId {
        let g = self[parent].g + 1;
        self.push(Node {
            board,
            parent: Some(parent),
            action: Some(action),
            g,
            f: f64::from(g) + h,
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Nodes created so far, superseded ones included.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes from `id` back to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(&self[id]), move |node| node.parent.map(|p| &self[p]))
    }

    /// Slides leading from the root to `id`, in playing order.
    pub fn solution(&self, id: NodeId) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .ancestors(id)
            .filter_map(|node| node.action.clone())
            .collect();
        actions.reverse();
        actions
    }

    /// Boards from the root to `id`, both included.
    pub fn path(&self, id: NodeId) -> Vec<Rc<Board>> {
        let mut boards: Vec<Rc<Board>> = self
            .ancestors(id)
            .map(|node| Rc::clone(&node.board))
            .collect();
        boards.reverse();
        boards
    }
}

impl Index<NodeId> for SearchTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::parse_puzzle;
    use crate::puzzle::Direction;

    #[test]
    fn test_solution_follows_parents() {
        let start = parse_puzzle("6,6\nX,0,2,H,2\nB,4,1,V,2\n").unwrap();
        let up = Action::new("B", Direction::Up, 1);
        let right = Action::new("X", Direction::Right, 4);
        let lifted = start.apply(&up).unwrap();
        let solved = lifted.apply(&right).unwrap();

        let mut tree = SearchTree::new();
        let root = tree.push_root(Rc::new(start.clone()), 4.0);
        // A sibling branch that is not part of the answer.
        tree.push_child(root, Action::new("X", Direction::Right, 1), Rc::new(start.clone()), 3.0);
        let middle = tree.push_child(root, up.clone(), Rc::new(lifted), 4.0);
        let goal = tree.push_child(middle, right.clone(), Rc::new(solved), 0.0);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree[goal].g, 2);
        assert_eq!(tree[goal].f, 2.0);
        assert_eq!(tree[middle].f, 5.0);
        assert_eq!(tree.solution(goal), vec![up, right]);

        let path = tree.path(goal);
        assert_eq!(path.len(), 3);
        assert_eq!(*path[0], start);
        assert!(path[2].is_goal());
    }

    #[test]
    fn test_root_has_empty_solution() {
        let start = parse_puzzle("6,6\nX,4,2,H,2\n").unwrap();
        let mut tree = SearchTree::new();
        let root = tree.push_root(Rc::new(start), 0.0);

        assert!(tree.solution(root).is_empty());
        assert_eq!(tree.path(root).len(), 1);
        assert_eq!(tree[root].g, 0);
    }
}
