use crate::graph::NodeId;
use gedgraph_core::Xref;
use std::collections::HashMap;

/// Maps record identifiers to graph nodes.
///
/// Lookups normalize their input, so `@I1@` and `I1` resolve alike.
#[derive(Debug, Default, Clone)]
pub struct XrefTable {
    by_xref: HashMap<Xref, NodeId>,
}

impl XrefTable {
    /// Registers a node. Returns the previous node for the same xref, if any.
    pub fn insert(&mut self, xref: Xref, id: NodeId) -> Option<NodeId> {
        self.by_xref.insert(xref, id)
    }

    /// Resolves a raw or normalized identifier.
    pub fn resolve(&self, id: &str) -> Option<NodeId> {
        self.by_xref.get(Xref::new(id).as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_resolve() {
        let mut table = XrefTable::default();
        let id = NodeId::new(1);

        assert_eq!(table.insert(Xref::new("@I1@"), id), None);

        assert_eq!(table.resolve("I1"), Some(id));
        assert_eq!(table.resolve("@I1@"), Some(id));
        assert_eq!(table.resolve("I2"), None);

        let other = NodeId::new(2);
        assert_eq!(table.insert(Xref::new("I1"), other), Some(id));
    }
}
