//! Arena-backed division tree.
//!
//! Owner and sibling links are [`DivisionId`] handles, so replacing a sub-tree
//! is a handle swap and any handle held across a host callback can be
//! re-checked with [`DivisionTree::contains`].

use trellis_core::alloc::{Arena, HashSet};

use crate::division::{Division, DivisionId};

#[derive(Default)]
pub struct DivisionTree {
    arena: Arena<Division>,
    root: Option<DivisionId>,
}

impl std::fmt::Debug for DivisionTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DivisionTree")
            .field("root", &self.root)
            .field("len", &self.arena.len())
            .finish()
    }
}

impl DivisionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<DivisionId> {
        self.root
    }

    pub fn set_root(&mut self, root: DivisionId) {
        self.root = Some(root);
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn insert(&mut self, division: Division) -> DivisionId {
        self.arena.insert(division)
    }

    pub fn get(&self, id: DivisionId) -> Option<&Division> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: DivisionId) -> Option<&mut Division> {
        self.arena.get_mut(id)
    }

    pub fn contains(&self, id: DivisionId) -> bool {
        self.arena.contains(id)
    }

    pub fn children(&self, id: DivisionId) -> &[DivisionId] {
        self.get(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    pub fn owner(&self, id: DivisionId) -> Option<DivisionId> {
        self.get(id).and_then(|d| d.owner)
    }

    /// Make `children` the ordered children of `owner`, fixing owner and
    /// sibling links.
    pub fn set_children(&mut self, owner: DivisionId, children: Vec<DivisionId>) {
        for (i, child) in children.iter().enumerate() {
            let next = children.get(i + 1).copied();
            if let Some(division) = self.arena.get_mut(*child) {
                division.owner = Some(owner);
                division.next_sibling = next;
            }
        }
        if let Some(division) = self.arena.get_mut(owner) {
            division.children = children;
        }
    }

    pub fn previous_sibling(&self, id: DivisionId) -> Option<DivisionId> {
        let owner = self.owner(id)?;
        let siblings = self.children(owner);
        let index = siblings.iter().position(|s| *s == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Nearest non-splitter siblings before and after `id`.
    pub fn adjacent_leaves(&self, id: DivisionId) -> (Option<DivisionId>, Option<DivisionId>) {
        let Some(owner) = self.owner(id) else {
            return (None, None);
        };
        let siblings = self.children(owner);
        let Some(index) = siblings.iter().position(|s| *s == id) else {
            return (None, None);
        };
        let is_leaf = |s: &&DivisionId| self.get(**s).is_some_and(|d| !d.is_splitter());
        let before = siblings[..index].iter().rev().find(is_leaf).copied();
        let after = siblings[index + 1..].iter().find(is_leaf).copied();
        (before, after)
    }

    /// `id` and all its descendants, parents before children.
    pub fn preorder(&self, id: DivisionId) -> Vec<DivisionId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Every division reachable from the root.
    pub fn all(&self) -> Vec<DivisionId> {
        self.root.map(|root| self.preorder(root)).unwrap_or_default()
    }

    /// First division named `name`, depth-first from the root.
    pub fn find(&self, name: &str) -> Option<DivisionId> {
        self.all()
            .into_iter()
            .find(|id| self.get(*id).and_then(Division::name) == Some(name))
    }

    /// Names used in the sub-tree rooted at `id`.
    pub fn names(&self, id: DivisionId) -> HashSet<String> {
        self.preorder(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(|d| d.name.clone()))
            .collect()
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: DivisionId, ancestor: DivisionId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.owner(node);
        }
        false
    }

    fn remove_subtree(&mut self, id: DivisionId) {
        for node in self.preorder(id) {
            self.arena.remove(node);
        }
    }

    /// Move the sub-tree rooted at `source_id` out of `source` into this
    /// arena. Returns the new handle of the moved root.
    fn adopt(&mut self, source: &mut DivisionTree, source_id: DivisionId) -> Option<DivisionId> {
        let mut division = source.arena.remove(source_id)?;
        let source_children = std::mem::take(&mut division.children);
        division.owner = None;
        division.next_sibling = None;
        let id = self.arena.insert(division);

        let children = source_children
            .into_iter()
            .filter_map(|child| self.adopt(source, child))
            .collect();
        self.set_children(id, children);
        Some(id)
    }

    /// Replace the sub-tree at `target` with the whole of `replacement`,
    /// keeping `target`'s position among its siblings.
    ///
    /// Returns the handle of the new sub-tree root.
    pub fn graft(&mut self, target: DivisionId, mut replacement: DivisionTree) -> Option<DivisionId> {
        let new_root = replacement.root?;
        let owner = self.owner(target);
        let new_id = self.adopt(&mut replacement, new_root)?;

        match owner {
            Some(owner) => {
                let mut siblings = self.children(owner).to_vec();
                if let Some(slot) = siblings.iter_mut().find(|s| **s == target) {
                    *slot = new_id;
                }
                self.set_children(owner, siblings);
            }
            None => self.root = Some(new_id),
        }

        self.remove_subtree(target);
        Some(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::DivisionKind;
    use trellis_core::geometry::Axis;

    fn arrange(name: &str) -> Division {
        Division::new(DivisionKind::Arrange(Axis::Horizontal)).with_name(name)
    }

    fn sample() -> (DivisionTree, DivisionId, DivisionId, DivisionId, DivisionId) {
        let mut tree = DivisionTree::new();
        let root = tree.insert(Division::new(DivisionKind::Arrange(Axis::Horizontal)));
        let a = tree.insert(arrange("a"));
        let split = tree.insert(Division::splitter());
        let b = tree.insert(arrange("b"));
        tree.set_children(root, vec![a, split, b]);
        tree.set_root(root);
        (tree, root, a, split, b)
    }

    #[test]
    fn test_links() {
        let (tree, root, a, split, b) = sample();
        assert_eq!(tree.owner(a), Some(root));
        assert_eq!(tree.get(a).and_then(|d| d.next_sibling), Some(split));
        assert_eq!(tree.previous_sibling(b), Some(split));
        assert_eq!(tree.adjacent_leaves(split), (Some(a), Some(b)));
    }

    #[test]
    fn test_find_and_preorder() {
        let (tree, root, a, split, b) = sample();
        assert_eq!(tree.find("b"), Some(b));
        assert_eq!(tree.find("missing"), None);
        assert_eq!(tree.preorder(root), vec![root, a, split, b]);
    }

    #[test]
    fn test_graft_keeps_position() {
        let (mut tree, root, a, split, b) = sample();

        let mut replacement = DivisionTree::new();
        let new_a = replacement.insert(arrange("a"));
        let inner = replacement.insert(arrange("inner"));
        replacement.set_children(new_a, vec![inner]);
        replacement.set_root(new_a);

        let grafted = tree.graft(a, replacement).expect("graft");
        assert!(!tree.contains(a));
        assert_eq!(tree.children(root), &[grafted, split, b]);
        assert_eq!(tree.owner(grafted), Some(root));
        assert_eq!(tree.get(grafted).and_then(|d| d.next_sibling), Some(split));
        assert!(tree.find("inner").is_some());
        assert!(tree.is_within(tree.find("inner").expect("inner"), grafted));
    }

    #[test]
    fn test_graft_root() {
        let (mut tree, root, ..) = sample();
        let mut replacement = DivisionTree::new();
        let only = replacement.insert(arrange("only"));
        replacement.set_root(only);

        let grafted = tree.graft(root, replacement).expect("graft");
        assert_eq!(tree.root(), Some(grafted));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_debug_summary() {
        let (tree, ..) = sample();
        let text = format!("{:?}", tree);
        assert!(text.starts_with("DivisionTree"), "{}", text);
        assert!(text.contains(&format!("len: {}", tree.len())), "{}", text);
    }
}
