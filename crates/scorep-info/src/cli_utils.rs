//! Builds the small amount of state each subcommand needs to print and
//! prints it. Real hardware topology discovery is an external collaborator;
//! this tool reports the single-node, single-process tree a measurement run
//! would build by default when no platform probe is wired in, so the
//! command always has something meaningful to print.

use scorep_defs::{DefinitionManager, SystemTreeDomain};
use scorep_runtime::env::default_registry;
use scorep_runtime::system_tree::{build_system_tree, define_process_location_group, PathElement};

use crate::error::InfoError;

fn local_system_tree_path() -> Vec<PathElement> {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    vec![
        PathElement {
            node_class: "machine".to_string(),
            node_name: hostname.clone(),
            domain: SystemTreeDomain::MACHINE,
            properties: vec![],
        },
        PathElement {
            node_class: "node".to_string(),
            node_name: hostname,
            domain: SystemTreeDomain::SHARED_MEMORY,
            properties: vec![],
        },
    ]
}

pub fn print_system_tree() -> Result<(), InfoError> {
    let mut defs = DefinitionManager::new();
    let build = build_system_tree(&mut defs, &local_system_tree_path());
    define_process_location_group(&mut defs, build.leaf, "a.out");

    for node in defs.system_tree.path_to_root(build.leaf) {
        let record = defs
            .system_tree
            .get(node)
            .expect("path_to_root only yields handles present in the table");
        let class = defs
            .strings
            .get(record.class)
            .expect("every system tree node's class string was interned alongside it");
        println!("{class}");
    }
    Ok(())
}

pub fn print_config_vars(json: bool) -> Result<(), InfoError> {
    let mut registry = default_registry();
    registry.load_from_env();
    if json {
        let text = serde_json::to_string_pretty(&registry.to_json())?;
        println!("{text}");
    } else {
        for var in registry.iter() {
            println!("{}={}", var.name, var.value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_system_tree_path_has_a_machine_and_a_shared_memory_node() {
        let path = local_system_tree_path();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].domain, SystemTreeDomain::MACHINE);
        assert!(path[1].domain.contains(SystemTreeDomain::SHARED_MEMORY));
    }

    #[test]
    fn print_config_vars_accepts_both_output_modes() {
        assert!(print_config_vars(false).is_ok());
        assert!(print_config_vars(true).is_ok());
    }
}
