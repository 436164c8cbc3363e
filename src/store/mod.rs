//! The canonical in-memory step graph.
//!
//! Steps live in an arena (`Vec<Step>`) indexed by id; the arena order is the
//! "store order" every downstream pass iterates in. Connections are kept in
//! insertion order as well.

use crate::error::StoreError;
use crate::model::{Connection, ConnectionKind, NewStep, Step, StepId, StepPatch};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

mod debounce;

pub use debounce::{ConnectionDebounce, DEFAULT_DEBOUNCE_WINDOW};

/// Separator between ancestor names in a qualified name.
pub const QUALIFIED_NAME_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Default)]
pub struct Store {
    steps: Vec<Step>,
    index: AHashMap<StepId, usize>,
    connections: Vec<Connection>,
    next_id: u64,
    debounce: ConnectionDebounce,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce_window(window: Duration) -> Self {
        Self {
            debounce: ConnectionDebounce::new(window),
            ..Self::default()
        }
    }

    /// Bulk-loads a graph, repairing what can be repaired.
    ///
    /// Duplicate step ids are an error. Dangling parents are cleared, parent
    /// cycles are broken at the first step found on them, and connections that
    /// are duplicated or reference missing steps are dropped.
    pub fn from_parts(steps: Vec<Step>, connections: Vec<Connection>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for step in steps {
            if store.index.contains_key(&step.id) {
                return Err(StoreError::DuplicateStepId(step.id));
            }
            store.index.insert(step.id.clone(), store.steps.len());
            store.steps.push(step);
        }

        for i in 0..store.steps.len() {
            let Some(parent) = store.steps[i].parent.clone() else {
                continue;
            };
            let step_id = store.steps[i].id.clone();
            if !store.index.contains_key(&parent) {
                warn!(step = %step_id, parent = %parent, "dropping reference to missing parent");
                store.steps[i].parent = None;
            } else if store.creates_cycle(&step_id, &parent) {
                warn!(step = %step_id, parent = %parent, "breaking parent cycle");
                store.steps[i].parent = None;
            }
        }

        for connection in connections {
            if !store.contains(&connection.from) || !store.contains(&connection.to) {
                warn!(from = %connection.from, to = %connection.to, "dropping connection to missing step");
                continue;
            }
            if store.connections.contains(&connection) {
                warn!(from = %connection.from, to = %connection.to, kind = %connection.kind, "dropping duplicate connection");
                continue;
            }
            store.connections.push(connection);
        }

        store.next_id = store.steps.len() as u64;
        Ok(store)
    }

    /// Allocates a fresh id, inserts the step and returns the id.
    pub fn add_step(&mut self, data: NewStep) -> StepId {
        let id = self.allocate_id();
        let mut step = data.into_step(id.clone());
        if let Some(parent) = &step.parent {
            if !self.contains(parent) {
                warn!(step = %id, parent = %parent, "new step references a missing parent, adding it as a root");
                step.parent = None;
            }
        }
        debug!(step = %id, name = %step.name, "added step");
        self.index.insert(id.clone(), self.steps.len());
        self.steps.push(step);
        id
    }

    /// Merges `patch` into the step. Nothing changes when an error is returned.
    pub fn update_step(&mut self, id: &StepId, patch: StepPatch) -> Result<(), StoreError> {
        let Some(&idx) = self.index.get(id) else {
            warn!(step = %id, "update ignored, step does not exist");
            return Err(StoreError::UnknownStep(id.clone()));
        };

        if let Some(Some(parent)) = &patch.parent {
            if !self.contains(parent) {
                warn!(step = %id, parent = %parent, "update ignored, parent does not exist");
                return Err(StoreError::UnknownParent {
                    step_id: id.clone(),
                    parent_id: parent.clone(),
                });
            }
            if self.creates_cycle(id, parent) {
                warn!(step = %id, parent = %parent, "update ignored, parent would form a cycle");
                return Err(StoreError::ParentCycle {
                    step_id: id.clone(),
                    parent_id: parent.clone(),
                });
            }
        }

        patch.apply_to(&mut self.steps[idx]);
        Ok(())
    }

    /// Deletes the step, every connection touching it, and re-roots its children.
    pub fn remove_step(&mut self, id: &StepId) -> bool {
        let Some(idx) = self.index.remove(id) else {
            warn!(step = %id, "remove ignored, step does not exist");
            return false;
        };
        self.steps.remove(idx);
        for (i, step) in self.steps.iter().enumerate().skip(idx) {
            self.index.insert(step.id.clone(), i);
        }

        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        for step in self.steps.iter_mut() {
            if step.parent.as_ref() == Some(id) {
                step.parent = None;
            }
        }
        debug!(
            step = %id,
            connections_removed = before - self.connections.len(),
            "removed step"
        );
        true
    }

    /// Adds the edge unless it already exists, an endpoint is missing, or the same
    /// request was made moments ago.
    pub fn add_connection(&mut self, from: &StepId, to: &StepId, kind: ConnectionKind) -> bool {
        self.add_connection_at(from, to, kind, Instant::now())
    }

    /// [`Store::add_connection`] with an explicit clock reading.
    pub fn add_connection_at(
        &mut self,
        from: &StepId,
        to: &StepId,
        kind: ConnectionKind,
        now: Instant,
    ) -> bool {
        let request = Connection::new(from.clone(), to.clone(), kind);
        if self.debounce.is_repeat(&request, now) {
            debug!(from = %from, to = %to, kind = %kind, "coalesced repeated connection request");
            return false;
        }
        if !self.contains(from) || !self.contains(to) {
            warn!(from = %from, to = %to, "connection rejected, endpoint does not exist");
            return false;
        }
        if self.connections.contains(&request) {
            debug!(from = %from, to = %to, kind = %kind, "connection rejected as duplicate");
            return false;
        }
        self.connections.push(request);
        true
    }

    /// Removes the exact `(from, to, kind)` edge.
    pub fn remove_connection(&mut self, from: &StepId, to: &StepId, kind: ConnectionKind) -> bool {
        match self.connections.iter().position(|c| c.matches(from, to, kind)) {
            Some(pos) => {
                self.connections.remove(pos);
                true
            }
            None => {
                warn!(from = %from, to = %to, kind = %kind, "remove ignored, connection does not exist");
                false
            }
        }
    }

    /// The step's name prefixed by its ancestors, root first, joined by `" > "`.
    ///
    /// Returns an empty string for an unknown id.
    pub fn qualified_name(&self, id: &StepId) -> String {
        let mut names = Vec::new();
        let mut visited = AHashSet::new();
        let mut current = self.step(id);
        while let Some(step) = current {
            if !visited.insert(&step.id) {
                break;
            }
            names.push(step.name.as_str());
            current = step.parent.as_ref().and_then(|p| self.step(p));
        }
        names.iter().rev().join(QUALIFIED_NAME_SEPARATOR)
    }

    pub fn find_by_qualified_name(&self, qualified_name: &str) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| self.qualified_name(&s.id) == qualified_name)
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.index.get(id).map(|&i| &self.steps[i])
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.index.contains_key(id)
    }

    /// All steps in store order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// All connections in store order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn outgoing<'a>(&'a self, id: &'a StepId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.from == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a StepId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.to == id)
    }

    pub fn children<'a>(&'a self, id: &'a StepId) -> impl Iterator<Item = &'a Step> + 'a {
        self.steps
            .iter()
            .filter(move |s| s.parent.as_ref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn debounce_window(&self) -> Duration {
        self.debounce.window()
    }

    /// Whether making `parent` the parent of `step_id` would close a loop.
    fn creates_cycle(&self, step_id: &StepId, parent: &StepId) -> bool {
        let mut visited = AHashSet::new();
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == step_id {
                return true;
            }
            if !visited.insert(id) {
                // An existing loop above us that does not involve `step_id`.
                return false;
            }
            current = self.step(id).and_then(|s| s.parent.as_ref());
        }
        false
    }

    fn allocate_id(&mut self) -> StepId {
        loop {
            self.next_id += 1;
            let id = StepId::new(format!("step-{}", self.next_id));
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
