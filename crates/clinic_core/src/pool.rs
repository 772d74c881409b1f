//! Finite-capacity staff pools with FIFO wait queues.
//!
//! A release hands the freed unit straight to the head of the wait queue
//! instead of freeing it and letting requesters race for it. The net `in_use`
//! count does not change on such a transfer.

use std::collections::VecDeque;
use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PoolError};

/// Service stage, one per staff pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Nurse,
    Doctor,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Nurse => "nurse",
            Stage::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of [`ResourcePool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// A free unit was taken; the caller continues immediately.
    Granted,
    /// The pool is saturated; the caller waits at this 1-based queue position.
    Queued { position: usize },
}

#[derive(Debug, Clone)]
pub struct ResourcePool {
    name: &'static str,
    capacity: usize,
    in_use: usize,
    wait_queue: VecDeque<Entity>,
}

impl ResourcePool {
    pub fn new(name: &'static str, capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity { pool: name });
        }
        Ok(Self {
            name,
            capacity,
            in_use: 0,
            wait_queue: VecDeque::new(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn available(&self) -> usize {
        self.capacity - self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn is_saturated(&self) -> bool {
        self.in_use == self.capacity
    }

    /// Requesters currently waiting, head first.
    pub fn waiting(&self) -> impl Iterator<Item = Entity> + '_ {
        self.wait_queue.iter().copied()
    }

    pub fn acquire(&mut self, requester: Entity) -> Acquire {
        if self.in_use < self.capacity {
            self.in_use += 1;
            Acquire::Granted
        } else {
            self.wait_queue.push_back(requester);
            Acquire::Queued {
                position: self.wait_queue.len(),
            }
        }
    }

    /// Gives one unit back. If anyone is waiting, the unit is transferred to
    /// the head of the queue and that requester is returned; the caller is
    /// responsible for resuming it.
    pub fn release(&mut self) -> Result<Option<Entity>, PoolError> {
        if self.in_use == 0 {
            return Err(PoolError::InvalidRelease { pool: self.name });
        }
        match self.wait_queue.pop_front() {
            Some(next) => Ok(Some(next)),
            None => {
                self.in_use -= 1;
                Ok(None)
            }
        }
    }
}

/// The two staff pools of the clinic.
#[derive(Debug, Clone, Resource)]
pub struct StaffPools {
    pub nurses: ResourcePool,
    pub doctors: ResourcePool,
}

impl StaffPools {
    pub fn new(nurse_capacity: usize, doctor_capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            nurses: ResourcePool::new(Stage::Nurse.name(), nurse_capacity)?,
            doctors: ResourcePool::new(Stage::Doctor.name(), doctor_capacity)?,
        })
    }

    pub fn get(&self, stage: Stage) -> &ResourcePool {
        match stage {
            Stage::Nurse => &self.nurses,
            Stage::Doctor => &self.doctors,
        }
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut ResourcePool {
        match stage {
            Stage::Nurse => &mut self.nurses,
            Stage::Doctor => &mut self.doctors,
        }
    }
}
