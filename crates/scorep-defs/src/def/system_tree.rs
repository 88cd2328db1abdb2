use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::def::string::StringHandle;
use crate::handle::Handle;
use crate::table::DefinitionTable;

bitflags! {
    /// Which topological domains a system tree node participates in.
    /// Mirrors the `SCOREP_SYSTEM_TREE_DOMAIN_*` bitset used to locate the
    /// shared-memory root during system tree construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SystemTreeDomain: u32 {
        const MACHINE       = 1 << 0;
        const SHARED_MEMORY = 1 << 1;
        const NUMA          = 1 << 2;
        const SOCKET        = 1 << 3;
        const CACHE         = 1 << 4;
        const CORE          = 1 << 5;
        const PU            = 1 << 6;
    }
}

pub enum SystemTreeNodeKind {}
pub type SystemTreeNodeHandle = Handle<SystemTreeNodeKind>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemTreeNode {
    pub parent: SystemTreeNodeHandle,
    pub class: StringHandle,
    pub name: StringHandle,
    pub domain: SystemTreeDomain,
    pub properties: BTreeMap<StringHandle, StringHandle>,
}

pub type SystemTreeTable = DefinitionTable<SystemTreeNode, SystemTreeNodeKind>;

impl SystemTreeTable {
    /// Leaf-first-to-root path for `scorep-info system-tree`: starting from
    /// `leaf`, yields `leaf`, then its parent, and so on up to (and
    /// including) the unique root.
    pub fn path_to_root(&self, leaf: SystemTreeNodeHandle) -> Vec<SystemTreeNodeHandle> {
        let mut path = Vec::new();
        let mut current = leaf;
        while current.is_valid() {
            path.push(current);
            current = match self.get(current) {
                Some(node) => node.parent,
                None => break,
            };
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::string::StringTable;

    #[test]
    fn path_to_root_is_leaf_first() {
        let mut strings = StringTable::new();
        let mut tree = SystemTreeTable::new();
        let (machine_name, _) = strings.get_or_insert("localhost".to_string());
        let (machine_class, _) = strings.get_or_insert("machine".to_string());
        let (root, _) = tree.get_or_insert(SystemTreeNode {
            parent: SystemTreeNodeHandle::INVALID,
            class: machine_class,
            name: machine_name,
            domain: SystemTreeDomain::MACHINE,
            properties: BTreeMap::new(),
        });
        let (node_class, _) = strings.get_or_insert("node".to_string());
        let (node_name, _) = strings.get_or_insert("node0".to_string());
        let (child, _) = tree.get_or_insert(SystemTreeNode {
            parent: root,
            class: node_class,
            name: node_name,
            domain: SystemTreeDomain::SHARED_MEMORY,
            properties: BTreeMap::new(),
        });
        assert_eq!(tree.path_to_root(child), vec![child, root]);
    }
}
