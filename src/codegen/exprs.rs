//! Dense expression indices.

use indexmap::IndexSet;

use crate::ir::{Element, ExprId, Node};

/// Placeholder id → dense index, in first-occurrence order of a walk that
/// visits an element's properties before its children.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExprMap {
    ids: IndexSet<ExprId>,
}

impl ExprMap {
    pub fn build(root: &Element) -> Self {
        let mut map = ExprMap::default();
        map.visit(root);
        map
    }

    fn visit(&mut self, element: &Element) {
        for prop in &element.properties {
            if let Some(id) = prop.expr() {
                self.ids.insert(id);
            }
        }
        for child in &element.children {
            match child {
                Node::Element(e) => self.visit(e),
                Node::Expr { value } => {
                    self.ids.insert(*value);
                }
                Node::Text { .. } => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Dense index of `id`. Every placeholder under the root passed to
    /// `build` has one.
    pub fn index_of(&self, id: ExprId) -> Option<u32> {
        self.ids.get_index_of(&id).map(|i| i as u32)
    }

    /// Placeholder ids ordered by expression index.
    pub fn ids(&self) -> Vec<ExprId> {
        self.ids.iter().copied().collect()
    }
}
