//! Top-level measurement lifecycle:
//! `Initialize → RegisterSubsystems → BeginMeasurement → … → EndMeasurement
//! → Unify → Write → Finalize`.
//!
//! [`Measurement`] is the process-wide singleton the lifecycle coordinator
//! (one thread) drives through these steps. Setup methods take `&mut self`
//! and run before any other thread touches the instance; once
//! `begin_measurement` has returned, only
//! the `&self` hot-path methods (`enter_region`/`exit_region`) and the
//! `&self` substrate/location/config accessors are called, and those are
//! safe under arbitrary concurrent callers by construction (atomics,
//! internal locks, thread-local location state).

use scorep_defs::{
    DefinitionManager, Paradigm, Region, RegionFlags, RegionHandle, RegionRole, SourceFile,
};

use crate::arena::{Arena, DEFAULT_DEF_CHUNK_BYTES};
use crate::clock_sync::Clock;
use crate::config::ConfigRegistry;
use crate::env::default_registry;
use crate::error::ScorepError;
use crate::filter::Filter;
use crate::location::{self, LocationId, LocationRegistry, ReusePolicy};
use crate::phase::{should_record, Gate, Phase, PhaseVar};
use crate::substrate::profile::ProfileSubstrate;
use crate::substrate::trace::TraceSubstrate;
use crate::substrate::SubstrateManager;

const DEFAULT_MAX_TASK_DEPTH: usize = 4096;

pub struct Measurement {
    phase: PhaseVar,
    config: ConfigRegistry,
    filter: Filter,
    defs: DefinitionManager,
    locations: LocationRegistry,
    substrates: SubstrateManager,
    misc_arena: Arena,
}

impl Measurement {
    pub fn new() -> Self {
        Measurement {
            phase: PhaseVar::new(),
            config: default_registry(),
            filter: Filter::disabled(),
            defs: DefinitionManager::new(),
            locations: LocationRegistry::new(ReusePolicy::Fresh, DEFAULT_DEF_CHUNK_BYTES, DEFAULT_MAX_TASK_DEPTH),
            substrates: SubstrateManager::new(),
            misc_arena: Arena::new(DEFAULT_DEF_CHUNK_BYTES),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    /// The local (per-process) definition registry. Every catalog is
    /// shareable as `&DefinitionTable`, so concurrent callers resolve
    /// definitions through [`enter_region`](Measurement::enter_region)
    /// without any outer lock.
    pub fn defs(&self) -> &DefinitionManager {
        &self.defs
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn substrates(&self) -> &SubstrateManager {
        &self.substrates
    }

    pub fn misc_arena(&self) -> &Arena {
        &self.misc_arena
    }

    /// `Initialize`: loads configuration from the environment and parses
    /// the filter, if any. `filter_text` is the already-read contents of
    /// `SCOREP_FILTERING_FILE`; reading that file is the caller's concern
    /// (the core's filter parser is pure text in, `Filter` out).
    pub fn initialize(&mut self, filter_text: Option<&str>) -> Result<(), ScorepError> {
        self.config.load_from_env();
        self.filter = match filter_text {
            Some(text) => Filter::parse(text)?,
            None => Filter::disabled(),
        };
        Ok(())
    }

    /// `RegisterSubsystems`: enumerates the two built-in substrates
    /// according to `SCOREP_ENABLE_TRACING`/`SCOREP_ENABLE_PROFILING`.
    /// Plugin substrate discovery is an external collaborator not modeled
    /// here.
    pub fn register_subsystems(&mut self) {
        use crate::config::ConfigValue;
        let tracing_on = matches!(self.config.get("SCOREP_ENABLE_TRACING"), Some(ConfigValue::Bool(true)));
        let profiling_on = matches!(self.config.get("SCOREP_ENABLE_PROFILING"), Some(ConfigValue::Bool(true)));
        if tracing_on {
            self.substrates.register(Box::new(TraceSubstrate::new()));
        }
        if profiling_on {
            self.substrates.register(Box::new(ProfileSubstrate::new()));
        }
    }

    /// `BeginMeasurement`: flips the phase to `WITHIN`. Before this call,
    /// and after `end_measurement`, region enter/exit calls are silently
    /// dropped.
    pub fn begin_measurement(&mut self) {
        self.phase.set(Phase::Within);
    }

    pub fn end_measurement(&mut self) {
        self.phase.set(Phase::Post);
    }

    /// `Unify`: reduces every local definition manager passed in (this
    /// process's own, plus any gathered from other ranks over the IPC
    /// abstraction — gathering them is outside this module) into one
    /// unified catalog. Two distinct local definitions with identical
    /// semantic tuples, whichever rank contributed them, collapse to one
    /// unified handle.
    pub fn unify(local_managers: &[DefinitionManager]) -> DefinitionManager {
        scorep_defs::unify_all(local_managers)
    }

    /// `Write`: the core's only remaining responsibility is to have
    /// produced a consistent unified catalog and event/profile buffers;
    /// encoding OTF2/CUBE bytes is an external collaborator. The one
    /// artifact this step does write itself is `scorep.cfg`, the resolved
    /// configuration dump, alongside the (externally produced) measurement
    /// archive in `SCOREP_EXPERIMENT_DIRECTORY`.
    pub fn write(&self) -> Result<(), ScorepError> {
        log::info!("write: delegating byte-level encoding to substrate plugins");
        let experiment_dir = match self.config.get("SCOREP_EXPERIMENT_DIRECTORY") {
            Some(crate::config::ConfigValue::Path(p)) => p.clone(),
            _ => return Ok(()),
        };
        std::fs::create_dir_all(&experiment_dir)
            .map_err(|err| ScorepError::new(crate::error::ErrorCode::FileCanNotOpen, format!("creating {}: {err}", experiment_dir.display())))?;
        self.config.write_resolved_config(&experiment_dir.join("scorep.cfg"))
    }

    pub fn finalize(&mut self) {
        self.phase.set(Phase::Post);
    }

    /// Activates a location for the calling thread, invoking the
    /// `on_new_location`/`on_activate` substrate hooks.
    pub fn activate_location(&self, paradigm: Paradigm, start_routine: u64, thread_id: u64) -> LocationId {
        let id = self.locations.activate(paradigm, start_routine, thread_id);
        self.substrates.dispatch_new_location(id);
        self.substrates.dispatch_activate(id);
        id
    }

    pub fn deactivate_location(&self, paradigm: Paradigm, start_routine: u64) {
        self.locations.deactivate(paradigm, start_routine);
    }

    /// Resolves a region's handle, defining it on first use. Adapters pass
    /// the same static descriptor on every call; the underlying
    /// `get_or_insert` is idempotent, so repeated calls for the same
    /// `(name, file, begin_line, end_line, paradigm, role, flags)` tuple
    /// return the same handle without growing the registry.
    pub fn define_region(
        &self,
        name: &str,
        file: Option<&str>,
        begin_line: u32,
        end_line: u32,
        paradigm: Paradigm,
        role: RegionRole,
        flags: RegionFlags,
    ) -> RegionHandle {
        let (name_handle, _) = self.defs.strings.get_or_insert(name.to_string());
        let file_handle = match file {
            Some(path) => {
                let (path_handle, _) = self.defs.strings.get_or_insert(path.to_string());
                self.defs
                    .source_files
                    .get_or_insert(SourceFile { name: path_handle })
                    .0
            }
            None => scorep_defs::Handle::INVALID,
        };
        self.defs
            .regions
            .get_or_insert(Region {
                name: name_handle,
                canonical_name: name_handle,
                description: name_handle,
                file: file_handle,
                begin_line,
                end_line,
                paradigm,
                role,
                flags,
            })
            .0
    }

    /// `SCOREP_EnterRegion`: lazily defines the region on first call, then
    /// gates recording by both the re-entrancy counter and the phase.
    /// Always updates the calling thread's task region stack so stack
    /// invariants hold even while the phase isn't `WITHIN`; only the
    /// substrate dispatch itself is phase-gated.
    #[allow(clippy::too_many_arguments)]
    pub fn enter_region<C: Clock>(
        &self,
        name: &str,
        file: Option<&str>,
        begin_line: u32,
        end_line: u32,
        paradigm: Paradigm,
        role: RegionRole,
        flags: RegionFlags,
        clock: &C,
    ) -> RegionHandle {
        let region = self.define_region(name, file, begin_line, end_line, paradigm, role, flags);
        let guard = Gate::enter();
        if guard.is_nested() {
            return region;
        }
        let Some(location_id) = location::current_id() else {
            return region;
        };
        location::with_current(|state| state.tasks.current_mut().enter(region));
        if should_record(&self.phase) {
            let timestamp = clock.ticks();
            self.substrates.dispatch_enter_region(location_id, region, timestamp);
        }
        region
    }

    /// `SCOREP_ExitRegion`. Takes the handle `enter_region` already
    /// resolved; exit never defines a region it hasn't seen entered.
    pub fn exit_region<C: Clock>(&self, region: RegionHandle, clock: &C) {
        let guard = Gate::enter();
        if guard.is_nested() {
            return;
        }
        let Some(location_id) = location::current_id() else {
            return;
        };
        location::with_current(|state| state.tasks.current_mut().exit(region));
        if should_record(&self.phase) {
            let timestamp = clock.ticks();
            self.substrates.dispatch_exit_region(location_id, region, timestamp);
        }
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::new()
    }
}
