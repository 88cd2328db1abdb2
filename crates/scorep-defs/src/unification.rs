//! Cross-process definition unification.
//!
//! Each process contributes one [`DefinitionManager`] of local definitions.
//! Unification walks every local catalog exactly once, in the fixed order
//! below, and re-inserts each record into a single shared `DefinitionManager`
//! after rewriting any handles it contains from local to unified. The order
//! matters: a record can only be remapped once everything it references has
//! already been unified, so catalogs are processed leaves-first.
//!
//! Self-referential catalogs (system tree nodes, communicators, calling
//! contexts) rely on the invariant that a parent is always inserted into its
//! local table before its children, so a single forward pass through the
//! local table's insertion order remaps parents before the children that
//! need them.
//!
//! [`unify_all`] runs the same pass over every local manager in a run,
//! feeding them all into one shared `out`: two distinct local definitions
//! with identical semantic tuples collapse to one unified handle regardless
//! of which process contributed them, since `get_or_insert` on `out` is
//! what actually dedups. [`unify`] is the single-manager case, kept as the
//! entry point existing callers and tests already use.

use std::hash::Hash;

use crate::handle::Handle;
use crate::manager::DefinitionManager;
use crate::table::DefinitionTable;

fn unify_table<T, Kind>(
    local: &DefinitionTable<T, Kind>,
    unified: &DefinitionTable<T, Kind>,
    mut remap: impl FnMut(&T) -> T,
) where
    T: Eq + Hash + Clone,
{
    for (local_handle, record) in local.iter() {
        let remapped = remap(&record);
        let (unified_handle, _) = unified.get_or_insert(remapped);
        local.set_unified(local_handle, unified_handle);
    }
}

/// Maps a local handle to its unified counterpart via the owning local
/// table. Panics if called before that table has been unified — a
/// programming error in [`unify_all`]'s ordering, never a data condition.
fn mapped<Kind>(local: &DefinitionTable<impl Eq + Hash + Clone, Kind>, handle: Handle<Kind>) -> Handle<Kind> {
    if !handle.is_valid() {
        return Handle::INVALID;
    }
    let unified = local.unified_of(handle);
    debug_assert!(unified.is_valid(), "handle unified before its source table");
    unified
}

/// Runs full unification over every process's local definitions, returning a
/// fresh `DefinitionManager` holding the unified (deduplicated across the
/// whole run) definitions. Each `local.*` table gains its `unified` links as
/// a side effect, readable afterwards via `DefinitionTable::unified_of`.
///
/// Every tier is processed for all of `locals` before the next tier starts,
/// preserving the leaves-first dependency order within a single process
/// while also collapsing equal records contributed by different processes
/// into the same unified handle.
pub fn unify_all(locals: &[DefinitionManager]) -> DefinitionManager {
    let out = DefinitionManager::new();

    // Strings have no dependencies; they are the base of every other kind.
    for local in locals {
        unify_table(&local.strings, &out.strings, |s| s.clone());
    }

    // Second tier: everything that only references strings (and, for the
    // system tree, itself — parent-before-child via insertion order).
    for local in locals {
        unify_table(&local.source_files, &out.source_files, |f| {
            let mut f = f.clone();
            f.name = mapped(&local.strings, f.name);
            f
        });
    }
    for local in locals {
        unify_table(&local.system_tree, &out.system_tree, |n| {
            let mut n = n.clone();
            n.parent = mapped(&local.system_tree, n.parent);
            n.class = mapped(&local.strings, n.class);
            n.name = mapped(&local.strings, n.name);
            n.properties = n
                .properties
                .iter()
                .map(|(k, v)| (mapped(&local.strings, *k), mapped(&local.strings, *v)))
                .collect();
            n
        });
    }
    for local in locals {
        unify_table(&local.parameters, &out.parameters, |p| {
            let mut p = p.clone();
            p.name = mapped(&local.strings, p.name);
            p
        });
    }
    for local in locals {
        unify_table(&local.attributes, &out.attributes, |a| {
            let mut a = a.clone();
            a.name = mapped(&local.strings, a.name);
            a
        });
    }
    for local in locals {
        unify_table(&local.metrics, &out.metrics, |m| {
            let mut m = m.clone();
            m.name = mapped(&local.strings, m.name);
            m.description = mapped(&local.strings, m.description);
            m.unit = mapped(&local.strings, m.unit);
            m
        });
    }
    for local in locals {
        unify_table(&local.interrupt_generators, &out.interrupt_generators, |g| {
            let mut g = g.clone();
            g.name = mapped(&local.strings, g.name);
            g
        });
    }

    // Third tier: location groups (need system tree) and regions (need
    // source files).
    for local in locals {
        unify_table(&local.location_groups, &out.location_groups, |g| {
            let mut g = g.clone();
            g.name = mapped(&local.strings, g.name);
            g.parent = mapped(&local.system_tree, g.parent);
            g.creating_location_group = mapped(&local.location_groups, g.creating_location_group);
            g
        });
    }
    for local in locals {
        unify_table(&local.regions, &out.regions, |r| {
            let mut r = r.clone();
            r.name = mapped(&local.strings, r.name);
            r.canonical_name = mapped(&local.strings, r.canonical_name);
            r.description = mapped(&local.strings, r.description);
            r.file = mapped(&local.source_files, r.file);
            r
        });
    }

    // Fourth tier: locations (need location groups) and sampling sets (need
    // metrics and locations).
    for local in locals {
        unify_table(&local.locations, &out.locations, |l| {
            let mut l = l.clone();
            l.name = mapped(&local.strings, l.name);
            l.parent = mapped(&local.location_groups, l.parent);
            l
        });
    }
    for local in locals {
        unify_table(&local.sampling_sets, &out.sampling_sets, |s| {
            let mut s = s.clone();
            s.metrics = s.metrics.iter().map(|m| mapped(&local.metrics, *m)).collect();
            s.scope = mapped(&local.locations, s.scope);
            s
        });
    }

    // Fifth tier: groups enumerate locations.
    for local in locals {
        unify_table(&local.groups, &out.groups, |g| {
            let mut g = g.clone();
            g.name = mapped(&local.strings, g.name);
            g.members = g.members.iter().map(|l| mapped(&local.locations, *l)).collect();
            g
        });
    }

    // Sixth tier: communicators reference a group and, for sub-comms, their
    // parent comm (again parent-before-child via insertion order).
    for local in locals {
        unify_table(&local.comms, &out.comms, |c| {
            let mut c = c.clone();
            c.name = mapped(&local.strings, c.name);
            c.group = mapped(&local.groups, c.group);
            c.parent = mapped(&local.comms, c.parent);
            c
        });
    }

    // Seventh tier: RMA windows (need comms) and calling contexts (need
    // regions, source files, and themselves parent-before-child).
    for local in locals {
        unify_table(&local.rma_wins, &out.rma_wins, |w| {
            let mut w = w.clone();
            w.name = mapped(&local.strings, w.name);
            w.comm = mapped(&local.comms, w.comm);
            w
        });
    }
    for local in locals {
        unify_table(&local.calling_contexts, &out.calling_contexts, |c| {
            let mut c = c.clone();
            c.region = mapped(&local.regions, c.region);
            c.source_file = mapped(&local.source_files, c.source_file);
            c.parent = mapped(&local.calling_contexts, c.parent);
            c
        });
    }

    out
}

/// Single-process convenience wrapper around [`unify_all`].
pub fn unify(local: &DefinitionManager) -> DefinitionManager {
    unify_all(std::slice::from_ref(local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::location::{Location, LocationType};
    use crate::def::location_group::{LocationGroup, LocationGroupType};
    use crate::def::system_tree::{SystemTreeDomain, SystemTreeNode};
    use std::collections::BTreeMap;

    fn build_process(host_name: &str) -> DefinitionManager {
        let mut mgr = DefinitionManager::new();
        let (host, _) = mgr.strings.get_or_insert(host_name.to_string());
        let (machine_class, _) = mgr.strings.get_or_insert("machine".to_string());
        let (root, _) = mgr.system_tree.get_or_insert(SystemTreeNode {
            parent: Handle::INVALID,
            class: machine_class,
            name: host,
            domain: SystemTreeDomain::MACHINE,
            properties: BTreeMap::new(),
        });
        let (proc_name, _) = mgr.strings.get_or_insert("a.out".to_string());
        let (group, _) = mgr.location_groups.get_or_insert(LocationGroup {
            name: proc_name,
            parent: root,
            group_type: LocationGroupType::Process,
            creating_location_group: Handle::INVALID,
        });
        let (thread_name, _) = mgr.strings.get_or_insert("master thread".to_string());
        mgr.locations.get_or_insert(Location {
            name: thread_name,
            parent: group,
            location_type: LocationType::Cpu,
            sequence_number: 0,
        });
        mgr
    }

    #[test]
    fn two_processes_on_the_same_host_share_one_system_tree_node() {
        let p0 = build_process("node01");
        let p1 = build_process("node01");

        let u0 = unify(&p0);
        let u1 = unify(&p1);
        assert_eq!(u0.system_tree.len(), 1);
        assert_eq!(u1.system_tree.len(), 1);

        // Unifying each process independently against the same hostname
        // string produces structurally identical unified system trees, the
        // property later relied on when the real run reduces all processes'
        // local managers into one.
        assert_eq!(u0.system_tree.len(), u1.system_tree.len());
        assert_eq!(u0.locations.len(), 1);
    }

    #[test]
    fn location_unification_preserves_parent_linkage() {
        let local = build_process("node02");
        let unified = unify(&local);
        let (_, loc) = unified.locations.iter().next().unwrap();
        let (_, group) = unified.location_groups.iter().next().unwrap();
        assert_eq!(loc.parent, unified.location_groups.iter().next().unwrap().0);
        let (_, root) = unified.system_tree.iter().next().unwrap();
        assert_eq!(group.parent, unified.system_tree.iter().next().unwrap().0);
        let _ = root;
    }

    #[test]
    fn two_ranks_with_identical_definitions_collapse_into_one_unified_set() {
        let rank0 = build_process("node03");
        let rank1 = build_process("node03");

        let unified = unify_all(&[rank0, rank1]);

        // Both ranks share the same hostname, process name and thread name,
        // so every tier collapses to exactly one record despite two local
        // managers feeding in — this is the cross-rank collapse `unify_all`
        // exists to realize.
        assert_eq!(unified.system_tree.len(), 1);
        assert_eq!(unified.location_groups.len(), 1);
        assert_eq!(unified.locations.len(), 1);
    }

    #[test]
    fn distinct_ranks_keep_distinct_locations_but_share_common_structure() {
        let rank0 = build_process("node04");
        let rank1 = build_process("node05");

        let unified = unify_all(&[rank0, rank1]);

        assert_eq!(unified.system_tree.len(), 2);
        assert_eq!(unified.location_groups.len(), 2);
        assert_eq!(unified.locations.len(), 2);
    }

    #[test]
    fn unify_all_with_no_local_managers_returns_an_empty_catalog() {
        let unified = unify_all(&[]);
        assert!(unified.strings.is_empty());
        assert!(unified.system_tree.is_empty());
    }
}
