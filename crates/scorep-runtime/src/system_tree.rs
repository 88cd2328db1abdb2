//! System tree construction.
//!
//! Builds a process's path through the system tree (machine → node → NUMA
//! domain → socket → … ) into a [`DefinitionManager`] and creates the
//! process's location group at the leaf. The platform-specific path
//! discovery itself (`SCOREP_Platform_GetPathInSystemTree` in the source
//! this is grounded on) is an external collaborator; this module only
//! consumes an already-resolved path.
//!
//! Unlike the source, the process's location-group name is supplied
//! up front rather than patched in later: the two-phase
//! create-with-a-placeholder-then-finalize dance there exists to satisfy a
//! C initialization ordering constraint this crate doesn't have, since
//! `DefinitionTable` records are immutable once inserted (`table.rs`).

use std::collections::BTreeMap;

use scorep_defs::{
    DefinitionManager, LocationGroupHandle, LocationGroupType, SystemTreeDomain,
    SystemTreeNodeHandle,
};

/// One level of a resolved system tree path, e.g. `("machine", "cluster07",
/// MACHINE, [])` down to `("node", "node042", SHARED_MEMORY, [("os",
/// "linux")])`.
pub struct PathElement {
    pub node_class: String,
    pub node_name: String,
    pub domain: SystemTreeDomain,
    pub properties: Vec<(String, String)>,
}

pub struct SystemTreeBuild {
    pub root: SystemTreeNodeHandle,
    pub leaf: SystemTreeNodeHandle,
    pub shared_memory_node: Option<SystemTreeNodeHandle>,
}

/// `SCOREP_DefineSystemTree`: inserts one `SystemTreeNode` per path element,
/// chaining `parent` handles root-down, and records the root and the first
/// node tagged `SHARED_MEMORY` (if any).
pub fn build_system_tree(defs: &mut DefinitionManager, path: &[PathElement]) -> SystemTreeBuild {
    let mut parent = SystemTreeNodeHandle::INVALID;
    let mut root = SystemTreeNodeHandle::INVALID;
    let mut shared_memory_node = None;

    for element in path {
        let properties: BTreeMap<_, _> = element
            .properties
            .iter()
            .map(|(k, v)| {
                let (key, _) = defs.strings.get_or_insert(k.clone());
                let (value, _) = defs.strings.get_or_insert(v.clone());
                (key, value)
            })
            .collect();
        let (class, _) = defs.strings.get_or_insert(element.node_class.clone());
        let (name, _) = defs.strings.get_or_insert(element.node_name.clone());

        let node = scorep_defs::SystemTreeNode {
            parent,
            class,
            name,
            domain: element.domain,
            properties,
        };
        let (handle, _) = defs.system_tree.get_or_insert(node);

        if !root.is_valid() {
            root = handle;
        }
        if element.domain.contains(SystemTreeDomain::SHARED_MEMORY) && shared_memory_node.is_none() {
            shared_memory_node = Some(handle);
        }
        parent = handle;
    }

    SystemTreeBuild {
        root,
        leaf: parent,
        shared_memory_node,
    }
}

/// `SCOREP_Definitions_NewLocationGroup` for the process's own location
/// group, attached at `parent` (normally a build's `leaf`).
pub fn define_process_location_group(
    defs: &mut DefinitionManager,
    parent: SystemTreeNodeHandle,
    name: &str,
) -> LocationGroupHandle {
    let (name_handle, _) = defs.strings.get_or_insert(name.to_string());
    let group = scorep_defs::LocationGroup {
        name: name_handle,
        parent,
        group_type: LocationGroupType::Process,
        creating_location_group: LocationGroupHandle::INVALID,
    };
    defs.location_groups.get_or_insert(group).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorep_defs::Handle;

    fn sample_path() -> Vec<PathElement> {
        vec![
            PathElement {
                node_class: "machine".to_string(),
                node_name: "cluster07".to_string(),
                domain: SystemTreeDomain::MACHINE,
                properties: vec![],
            },
            PathElement {
                node_class: "node".to_string(),
                node_name: "node042".to_string(),
                domain: SystemTreeDomain::SHARED_MEMORY,
                properties: vec![("os".to_string(), "linux".to_string())],
            },
        ]
    }

    #[test]
    fn builds_a_chained_path_and_finds_the_shared_memory_node() {
        let mut defs = DefinitionManager::new();
        let build = build_system_tree(&mut defs, &sample_path());
        assert!(build.root.is_valid());
        assert!(build.leaf.is_valid());
        assert_ne!(build.root, build.leaf);
        assert_eq!(build.shared_memory_node, Some(build.leaf));
        assert_eq!(defs.system_tree.len(), 2);
    }

    #[test]
    fn rebuilding_the_same_path_does_not_duplicate_nodes() {
        let mut defs = DefinitionManager::new();
        build_system_tree(&mut defs, &sample_path());
        build_system_tree(&mut defs, &sample_path());
        assert_eq!(defs.system_tree.len(), 2);
    }

    #[test]
    fn location_group_is_attached_to_the_leaf_node() {
        let mut defs = DefinitionManager::new();
        let build = build_system_tree(&mut defs, &sample_path());
        let group = define_process_location_group(&mut defs, build.leaf, "rank0");
        let record = defs.location_groups.get(group).unwrap();
        assert_eq!(record.parent, build.leaf);
        assert_eq!(record.group_type, LocationGroupType::Process);
    }

    #[test]
    fn empty_path_yields_invalid_root_and_leaf() {
        let mut defs = DefinitionManager::new();
        let build = build_system_tree(&mut defs, &[]);
        assert_eq!(build.root, Handle::INVALID);
        assert_eq!(build.leaf, Handle::INVALID);
    }
}
