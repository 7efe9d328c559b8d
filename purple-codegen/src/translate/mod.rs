//! Translation driver
//!
//! Walks the expression tree once, threading every constant through a stack
//! slot and every operator result through a fresh register.

use crate::cache::LoadedValueCache;
use crate::emit::{EmitConfig, IrEmitter, TargetInfo};
use crate::planner::{plan_translation, EvaluationOrder, PlanNode};
use crate::regalloc::RegisterAllocator;
use crate::value::Value;
use log::debug;
use purple_common::CompilerError;
use purple_frontend::Expr;


/// State for one translation run
pub struct Translator {
    allocator: RegisterAllocator,
    cache: LoadedValueCache,
    emitter: IrEmitter,
}

impl Translator {
    pub fn new(config: EmitConfig) -> Self {
        Self {
            allocator: RegisterAllocator::new(),
            cache: LoadedValueCache::new(),
            emitter: IrEmitter::new(config),
        }
    }

    /// Translate `expr` into a complete module that prints its value
    pub fn compile(
        mut self,
        expr: &Expr,
        module_id: &str,
        target: &TargetInfo,
    ) -> Result<String, CompilerError> {
        let (plan, slots) = plan_translation(expr, &mut self.allocator);
        self.allocator.initialize(&slots);

        self.emitter.preamble(module_id, target);
        self.emitter.slot_declarations(&slots);

        let result = self.translate(expr, &plan)?;
        let loaded = self
            .cache
            .ensure_loaded(&[result], &mut self.allocator, &mut self.emitter)?;
        if let Some(slot) = result.slot() {
            self.allocator.release_slot(slot)?;
        }

        let printed = Value::register(loaded[0], result.kind());
        let call_result = self.allocator.fresh();
        self.emitter.print_int(&printed, call_result)?;
        self.emitter.postamble(target);

        let seeded = self.allocator.seed_size();
        self.allocator.teardown()?;
        self.cache.clear();

        debug!(
            "Translated {} with {} slot(s), {} register(s) issued",
            module_id,
            seeded,
            self.allocator.peek_next() - 1
        );

        Ok(self.emitter.finish())
    }

    /// Translate one subtree, returning where its value lives
    ///
    /// `plan` is the planner's annotation of this same subtree.
    pub fn translate(&mut self, expr: &Expr, plan: &PlanNode) -> Result<Value, CompilerError> {
        match (expr, plan) {
            (Expr::Number { value, .. }, PlanNode::Leaf) => {
                let slot = self.allocator.acquire_slot()?;
                self.cache.invalidate(slot);
                Ok(self.emitter.store_constant(*value, slot))
            }

            (
                Expr::Binary { op, left, right },
                PlanNode::Binary {
                    order,
                    left: left_plan,
                    right: right_plan,
                    ..
                },
            ) => {
                let (lhs, rhs) = match order {
                    EvaluationOrder::LeftFirst => {
                        let lhs = self.translate(left, left_plan)?;
                        let rhs = self.translate(right, right_plan)?;
                        (lhs, rhs)
                    }
                    EvaluationOrder::RightFirst => {
                        let rhs = self.translate(right, right_plan)?;
                        let lhs = self.translate(left, left_plan)?;
                        (lhs, rhs)
                    }
                };

                let loaded = self.cache.ensure_loaded(
                    &[lhs, rhs],
                    &mut self.allocator,
                    &mut self.emitter,
                )?;

                for slot in [lhs.slot(), rhs.slot()].into_iter().flatten() {
                    self.allocator.release_slot(slot)?;
                }

                let dest = self.allocator.fresh();
                let result = self.emitter.binary_arithmetic(
                    *op,
                    &Value::register(loaded[0], lhs.kind()),
                    &Value::register(loaded[1], rhs.kind()),
                    dest,
                )?;
                self.cache.mark_loaded(dest);
                Ok(result)
            }

            _ => Err(CompilerError::internal_error(
                "slot plan does not match the expression shape".to_string(),
            )),
        }
    }
}
