//! Map pane: ordered stack of positioned elements

use super::element::ElementId;

/// Layer in the map's rendering stack. Later children paint above earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Pane {
    name: String,
    children: Vec<ElementId>,
}

impl Pane {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `id` unless it is already a child
    pub fn append(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.children.push(id);
        true
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.children.contains(&id)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.children.iter().position(|c| *c == id)
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Move a child to the top of the stack
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        if !self.remove(id) {
            return false;
        }
        self.children.push(id);
        true
    }

    /// Move a child to the bottom of the stack
    pub fn bring_to_back(&mut self, id: ElementId) -> bool {
        if !self.remove(id) {
            return false;
        }
        self.children.insert(0, id);
        true
    }
}
