//! Loaded-value cache
//!
//! Remembers which registers already hold a materialized value and which
//! register a slot was last loaded into, so the translator never emits a
//! second load for a value that is still sitting in a register.

use crate::emit::IrEmitter;
use crate::regalloc::RegisterAllocator;
use crate::value::Value;
use log::trace;
use purple_common::{CompilerError, RegisterId};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct LoadedValueCache {
    /// Registers known to hold a value, in the order they were produced
    resident: Vec<RegisterId>,

    /// Slot -> register it was last loaded into
    slot_contents: BTreeMap<RegisterId, RegisterId>,
}

impl LoadedValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, register: RegisterId) -> bool {
        self.resident.contains(&register)
    }

    /// Record that `register` holds a materialized value
    pub fn mark_loaded(&mut self, register: RegisterId) {
        if !self.is_loaded(register) {
            self.resident.push(register);
        }
    }

    /// Register currently holding the contents of `slot`, if any
    pub fn lookup(&self, slot: RegisterId) -> Option<RegisterId> {
        self.slot_contents.get(&slot).copied()
    }

    /// Forget what `slot` was loaded into; called on every store to it
    pub fn invalidate(&mut self, slot: RegisterId) {
        if let Some(register) = self.slot_contents.remove(&slot) {
            trace!("slot %{slot} rewritten, dropping cached %{register}");
        }
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    pub fn clear(&mut self) {
        self.resident.clear();
        self.slot_contents.clear();
    }

    /// Make every value usable as an instruction operand
    ///
    /// Pointers are loaded unless their slot is already cached; a pointer
    /// repeated within `values` is loaded once. Registers pass through.
    pub fn ensure_loaded(
        &mut self,
        values: &[Value],
        allocator: &mut RegisterAllocator,
        emitter: &mut IrEmitter,
    ) -> Result<Vec<RegisterId>, CompilerError> {
        let mut loaded = Vec::with_capacity(values.len());

        for value in values {
            let register = match *value {
                Value::Register { id, .. } => id,
                Value::Pointer { slot, kind } => match self.lookup(slot) {
                    Some(register) => {
                        trace!("cache hit: *%{slot} already in %{register}");
                        register
                    }
                    None => {
                        let register = allocator.fresh();
                        emitter.load(register, slot, kind);
                        self.slot_contents.insert(slot, register);
                        self.mark_loaded(register);
                        register
                    }
                },
                Value::Constant(number) => {
                    return Err(CompilerError::internal_error(format!(
                        "constant {number} reached the loader without being stored"
                    )))
                }
            };
            loaded.push(register);
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::EmitConfig;
    use purple_common::{Number, NumberKind};

    fn setup() -> (LoadedValueCache, RegisterAllocator, IrEmitter) {
        let mut alloc = RegisterAllocator::new();
        // slots %1 and %2
        alloc.fresh();
        alloc.fresh();
        (
            LoadedValueCache::new(),
            alloc,
            IrEmitter::new(EmitConfig::default()),
        )
    }

    fn ptr(slot: RegisterId) -> Value {
        Value::pointer(slot, NumberKind::Int32)
    }

    #[test]
    fn test_same_pointer_loaded_once() {
        let (mut cache, mut alloc, mut emitter) = setup();

        let regs = cache
            .ensure_loaded(&[ptr(1), ptr(1)], &mut alloc, &mut emitter)
            .unwrap();

        assert_eq!(regs, vec![3, 3]);
        assert_eq!(emitter.as_str().matches("load").count(), 1);
        assert!(cache.is_loaded(3));
    }

    #[test]
    fn test_second_call_hits_cache() {
        let (mut cache, mut alloc, mut emitter) = setup();

        cache.ensure_loaded(&[ptr(1)], &mut alloc, &mut emitter).unwrap();
        let before = emitter.as_str().len();
        let regs = cache.ensure_loaded(&[ptr(1)], &mut alloc, &mut emitter).unwrap();

        assert_eq!(regs, vec![3]);
        assert_eq!(emitter.as_str().len(), before);
        assert_eq!(alloc.peek_next(), 4);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let (mut cache, mut alloc, mut emitter) = setup();

        cache.ensure_loaded(&[ptr(2)], &mut alloc, &mut emitter).unwrap();
        cache.invalidate(2);
        assert_eq!(cache.lookup(2), None);

        let regs = cache.ensure_loaded(&[ptr(2)], &mut alloc, &mut emitter).unwrap();
        assert_eq!(regs, vec![4]);
        assert_eq!(emitter.as_str().matches("load").count(), 2);
        // the old register still holds its (stale for the slot) value
        assert!(cache.is_loaded(3));
    }

    #[test]
    fn test_registers_pass_through() {
        let (mut cache, mut alloc, mut emitter) = setup();

        let regs = cache
            .ensure_loaded(
                &[Value::register(7, NumberKind::Int32), ptr(1)],
                &mut alloc,
                &mut emitter,
            )
            .unwrap();
        assert_eq!(regs, vec![7, 3]);
    }

    #[test]
    fn test_constant_is_internal_error() {
        let (mut cache, mut alloc, mut emitter) = setup();

        let err = cache
            .ensure_loaded(&[Value::Constant(Number::Int32(4))], &mut alloc, &mut emitter)
            .unwrap_err();
        assert!(matches!(err, CompilerError::Internal { .. }));
        assert!(emitter.as_str().is_empty());
    }

    #[test]
    fn test_mark_loaded_is_a_set() {
        let mut cache = LoadedValueCache::new();
        cache.mark_loaded(5);
        cache.mark_loaded(5);
        cache.mark_loaded(6);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
