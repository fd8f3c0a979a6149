//! Fields: named, stable collections of host elements.
//!
//! A field outlives the divisions that display it. Whenever a division with
//! the same name exists in the tree, the field's elements are laid out in
//! that division's area; otherwise they are left alone.

use trellis_core::host::ElementId;

#[derive(Debug, Default, Clone)]
pub struct Field {
    elements: Vec<ElementId>,
    fastened: Vec<ElementId>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements sized individually by the division's arrange or grid.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Elements that each receive the whole field area.
    pub fn fastened(&self) -> &[ElementId] {
        &self.fastened
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.fastened.is_empty()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains(&element) || self.fastened.contains(&element)
    }

    /// Returns false when the element was already present.
    pub fn push(&mut self, element: ElementId) -> bool {
        if self.contains(element) {
            return false;
        }
        self.elements.push(element);
        true
    }

    pub fn fasten(&mut self, element: ElementId) -> bool {
        if self.contains(element) {
            return false;
        }
        self.fastened.push(element);
        true
    }

    /// Remove `element` from either list.
    pub fn remove(&mut self, element: ElementId) -> bool {
        let before = self.elements.len() + self.fastened.len();
        self.elements.retain(|e| *e != element);
        self.fastened.retain(|e| *e != element);
        before != self.elements.len() + self.fastened.len()
    }
}
