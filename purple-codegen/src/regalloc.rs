//! Register Allocation
//!
//! Two numbering disciplines share one counter:
//! - slot registers are issued first (by the planner) and then recycled
//!   through a LIFO free list for the rest of the run;
//! - transient registers come straight off the counter and are never reused.
//!
//! Because slots are numbered before any transient, the two ranges never
//! overlap, and every `%N` in the function is defined in increasing order.

use crate::planner::SlotDescriptor;
use log::trace;
use purple_common::{CompilerError, RegisterId};
use thiserror::Error;

/// First register number available inside `main`; `%0` names the entry block
pub const FIRST_REGISTER: RegisterId = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegAllocError {
    #[error("slot pool exhausted: the plan reserved only {0} slots")]
    PoolExhausted(usize),

    #[error("slot %{0} released while already free")]
    DoubleRelease(RegisterId),

    #[error("%{0} is not a planned slot register")]
    UnknownSlot(RegisterId),

    #[error("{outstanding} of {seeded} slots still in use at teardown")]
    SlotsOutstanding { outstanding: usize, seeded: usize },
}

impl From<RegAllocError> for CompilerError {
    fn from(err: RegAllocError) -> Self {
        CompilerError::internal_error(err.to_string())
    }
}

/// Slot free list plus the monotonic register counter
#[derive(Debug)]
pub struct RegisterAllocator {
    /// Next number handed out by `fresh`
    next_register: RegisterId,

    /// Available slot registers (top of stack = last element)
    free_slots: Vec<RegisterId>,

    /// Every slot register the plan declared
    seeded: Vec<RegisterId>,
}

impl RegisterAllocator {
    pub fn new() -> Self {
        Self {
            next_register: FIRST_REGISTER,
            free_slots: Vec::new(),
            seeded: Vec::new(),
        }
    }

    /// Seed the free list with exactly the planned slots
    ///
    /// The lowest-numbered slot ends up on top, so the first acquisition
    /// returns `%1`.
    pub fn initialize(&mut self, slots: &[SlotDescriptor]) {
        self.seeded = slots.iter().map(|s| s.register).collect();
        self.free_slots = self.seeded.iter().rev().copied().collect();
        trace!("Seeded slot pool with {:?}", self.seeded);
    }

    /// Take a slot register off the free list
    pub fn acquire_slot(&mut self) -> Result<RegisterId, RegAllocError> {
        let slot = self
            .free_slots
            .pop()
            .ok_or(RegAllocError::PoolExhausted(self.seeded.len()))?;
        trace!("acquire slot %{slot}");
        Ok(slot)
    }

    /// Return a slot register to the free list
    pub fn release_slot(&mut self, slot: RegisterId) -> Result<(), RegAllocError> {
        if !self.seeded.contains(&slot) {
            return Err(RegAllocError::UnknownSlot(slot));
        }
        if self.free_slots.contains(&slot) {
            return Err(RegAllocError::DoubleRelease(slot));
        }
        trace!("release slot %{slot}");
        self.free_slots.push(slot);
        Ok(())
    }

    /// Next unused register number
    pub fn fresh(&mut self) -> RegisterId {
        let register = self.next_register;
        self.next_register += 1;
        register
    }

    /// The number `fresh` will return next
    pub fn peek_next(&self) -> RegisterId {
        self.next_register
    }

    pub fn free_slot_count(&self) -> usize {
        self.free_slots.len()
    }

    pub fn seed_size(&self) -> usize {
        self.seeded.len()
    }

    /// Check every slot came back, then drop the pool
    pub fn teardown(&mut self) -> Result<(), RegAllocError> {
        let seeded = self.seeded.len();
        let outstanding = seeded - self.free_slots.len().min(seeded);
        self.free_slots.clear();
        self.seeded.clear();

        if outstanding != 0 {
            return Err(RegAllocError::SlotsOutstanding { outstanding, seeded });
        }
        Ok(())
    }
}

impl Default for RegisterAllocator {
    fn default() -> Self {
        Self::new()
    }
}
