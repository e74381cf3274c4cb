/*
 * Flock Registry Module
 *
 * A flock is the set of boids sharing one settings block and one trace.
 * The registry maps each flock id to that shared state plus its ordered
 * member list, so neighbor queries can be scoped to a single flock.
 */

use std::collections::BTreeMap;
use std::fmt;

use crate::boid::AgentId;
use crate::error::{FlockError, FlockResult};
use crate::settings::FlockSettings;
use crate::trace::Trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlockId(pub u32);

impl fmt::Display for FlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flock#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Flock {
    pub settings: FlockSettings,
    pub trace: Trace,
    // Kept in ascending id order
    members: Vec<AgentId>,
    leader: Option<AgentId>,
}

impl Flock {
    fn new(settings: FlockSettings, trace: Trace) -> Self {
        Self {
            settings,
            trace,
            members: Vec::new(),
            leader: None,
        }
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn leader(&self) -> Option<AgentId> {
        self.leader
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FlockRegistry {
    flocks: BTreeMap<FlockId, Flock>,
    next_id: u32,
}

impl FlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, settings: FlockSettings, trace: Trace) -> FlockId {
        let id = FlockId(self.next_id);
        self.next_id += 1;
        self.flocks.insert(id, Flock::new(settings, trace));
        id
    }

    pub fn get(&self, id: FlockId) -> FlockResult<&Flock> {
        self.flocks.get(&id).ok_or(FlockError::UnknownFlock(id))
    }

    pub fn get_mut(&mut self, id: FlockId) -> FlockResult<&mut Flock> {
        self.flocks.get_mut(&id).ok_or(FlockError::UnknownFlock(id))
    }

    pub fn contains(&self, id: FlockId) -> bool {
        self.flocks.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = FlockId> + '_ {
        self.flocks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlockId, &Flock)> {
        self.flocks.iter().map(|(id, flock)| (*id, flock))
    }

    pub fn len(&self) -> usize {
        self.flocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flocks.is_empty()
    }

    pub(crate) fn add_member(&mut self, id: FlockId, agent: AgentId) -> FlockResult<()> {
        let flock = self.get_mut(id)?;
        if let Err(pos) = flock.members.binary_search(&agent) {
            flock.members.insert(pos, agent);
        }
        Ok(())
    }

    pub(crate) fn set_leader(&mut self, id: FlockId, agent: AgentId) -> FlockResult<()> {
        self.get_mut(id)?.leader = Some(agent);
        Ok(())
    }

    pub(crate) fn remove_member(&mut self, id: FlockId, agent: AgentId) -> FlockResult<()> {
        let flock = self.get_mut(id)?;
        if let Ok(pos) = flock.members.binary_search(&agent) {
            flock.members.remove(pos);
        }
        if flock.leader == Some(agent) {
            flock.leader = None;
        }
        Ok(())
    }

    // Drops the flock entry and hands it back to the caller
    pub(crate) fn remove(&mut self, id: FlockId) -> FlockResult<Flock> {
        self.flocks.remove(&id).ok_or(FlockError::UnknownFlock(id))
    }

    // Forgets every flock and restarts id allocation
    pub(crate) fn clear(&mut self) {
        self.flocks.clear();
        self.next_id = 0;
    }
}
