//! Minimal element tree standing in for the host page.
//!
//! Overlays only need a body to attach to and the ability to create, move and
//! remove elements; everything else about rendering belongs to the component
//! runtime.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::error::{OverlayError, Result};

new_key_type! {
    pub struct ElementId;
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Default)]
struct Tree {
    nodes: SlotMap<ElementId, Element>,
    body: Option<ElementId>,
}

impl Tree {
    fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.nodes.get_mut(id).and_then(|e| e.parent.take()) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        true
    }
}

/// Cloneable handle to a document.
#[derive(Clone)]
pub struct Document(Rc<RefCell<Tree>>);

impl Document {
    /// A document with an empty `body`.
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let body = tree.nodes.insert(Element {
            tag: "body".into(),
            ..Element::default()
        });
        tree.body = Some(body);
        Self(Rc::new(RefCell::new(tree)))
    }

    /// A document without a body, as seen before the page finished loading.
    pub fn headless() -> Self {
        Self(Rc::new(RefCell::new(Tree::default())))
    }

    pub fn body(&self) -> Option<ElementId> {
        self.0.borrow().body
    }

    pub fn create_element(&self, tag: &str) -> ElementId {
        self.0.borrow_mut().nodes.insert(Element {
            tag: tag.to_string(),
            ..Element::default()
        })
    }

    pub fn add_class(&self, id: ElementId, class: impl Into<String>) -> Result<()> {
        let mut tree = self.0.borrow_mut();
        let el = tree.nodes.get_mut(id).ok_or(OverlayError::ElementGone(id))?;
        el.classes.push(class.into());
        Ok(())
    }

    pub fn set_text(&self, id: ElementId, text: impl Into<String>) -> Result<()> {
        let mut tree = self.0.borrow_mut();
        let el = tree.nodes.get_mut(id).ok_or(OverlayError::ElementGone(id))?;
        el.text = Some(text.into());
        Ok(())
    }

    /// Appends `child` to `parent`, moving it out of its current parent first.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<()> {
        let mut tree = self.0.borrow_mut();
        if !tree.nodes.contains_key(parent) {
            return Err(OverlayError::ElementGone(parent));
        }
        if !tree.nodes.contains_key(child) {
            return Err(OverlayError::ElementGone(child));
        }
        tree.detach(child);
        tree.nodes[child].parent = Some(parent);
        tree.nodes[parent].children.push(child);
        Ok(())
    }

    /// Unlinks `id` from its parent but keeps it alive.
    pub fn detach(&self, id: ElementId) -> bool {
        self.0.borrow_mut().detach(id)
    }

    /// Detaches `id` and frees it with its whole subtree. Returns false if it
    /// was already gone.
    pub fn remove(&self, id: ElementId) -> bool {
        let mut tree = self.0.borrow_mut();
        if !tree.nodes.contains_key(id) {
            return false;
        }
        tree.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = tree.nodes.remove(next) {
                stack.extend(el.children);
            }
        }
        if tree.body == Some(id) {
            tree.body = None;
        }
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.0.borrow().nodes.contains_key(id)
    }

    /// Whether `id` is reachable from the body.
    pub fn is_attached(&self, id: ElementId) -> bool {
        let tree = self.0.borrow();
        let Some(body) = tree.body else { return false };
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == body {
                return true;
            }
            cur = tree.nodes.get(c).and_then(|e| e.parent);
        }
        false
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.0
            .borrow()
            .nodes
            .get(id)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.0.borrow().nodes.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_moves_between_parents() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        let container = doc.create_element("div");
        let root = doc.create_element("div");

        doc.append_child(container, root).unwrap();
        assert!(!doc.is_attached(root));

        doc.append_child(body, root).unwrap();
        assert!(doc.is_attached(root));
        assert!(doc.children(container).is_empty());
        assert_eq!(doc.children(body), vec![root]);
    }

    #[test]
    fn remove_frees_subtree_once() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        let root = doc.create_element("div");
        let text = doc.create_element("p");
        doc.append_child(root, text).unwrap();
        doc.append_child(body, root).unwrap();

        assert!(doc.remove(root));
        assert!(!doc.remove(root));
        assert!(!doc.contains(text));
        assert!(doc.children(body).is_empty());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn stale_ids_are_errors() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        let gone = doc.create_element("div");
        doc.remove(gone);

        assert!(matches!(
            doc.append_child(body, gone),
            Err(OverlayError::ElementGone(id)) if id == gone
        ));
        assert!(doc.set_text(gone, "x").is_err());
    }

    #[test]
    fn headless_document_has_no_body() {
        let doc = Document::headless();
        assert!(doc.body().is_none());
        let el = doc.create_element("div");
        assert!(!doc.is_attached(el));
    }
}
