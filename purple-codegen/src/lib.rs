//! Purple Compiler - LLVM IR Generation
//!
//! Turns a parsed expression into a textual LLVM module whose `main`
//! prints the expression's value.

pub mod cache;
pub mod emit;
pub mod planner;
pub mod regalloc;
pub mod translate;
pub mod value;

pub use cache::LoadedValueCache;
pub use emit::{EmitConfig, IrEmitter, PointerStyle, TargetInfo};
pub use planner::{plan_slots, required_slots, EvaluationOrder, SlotDescriptor};
pub use regalloc::{RegAllocError, RegisterAllocator};
pub use translate::Translator;
pub use value::Value;

use purple_common::CompilerError;
use purple_frontend::Expr;

/// Generate the complete module text for `expr`
pub fn generate_llvm(
    expr: &Expr,
    module_id: &str,
    target: &TargetInfo,
    config: EmitConfig,
) -> Result<String, CompilerError> {
    Translator::new(config).compile(expr, module_id, target)
}
