//! LLVM IR text emission
//!
//! Each method appends one piece of the module to an in-memory buffer. The
//! layout follows what clang produces for a tiny C `main`, so the
//! downstream toolchain accepts the module without warnings.

use crate::planner::SlotDescriptor;
use crate::value::Value;
use log::trace;
use purple_common::{CompilerError, Number, NumberKind, RegisterId};
use purple_frontend::BinaryOp;

const TAB: &str = "  ";

/// Name of the private format-string constant used by the print call
pub const PRINT_FORMAT_SYMBOL: &str = "print_int_fstring";

/// Target parameters written into the module header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    pub data_layout: String,
    pub triple: String,
}

impl TargetInfo {
    pub fn new(data_layout: impl Into<String>, triple: impl Into<String>) -> Self {
        Self {
            data_layout: data_layout.into(),
            triple: triple.into(),
        }
    }

    /// Architecture component of the triple
    pub fn arch(&self) -> &str {
        self.triple.split('-').next().unwrap_or("")
    }

    pub fn is_x86_64(&self) -> bool {
        self.arch() == "x86_64"
    }
}

/// How pointer types are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerStyle {
    /// `ptr` (LLVM 15 and later)
    #[default]
    Opaque,
    /// `i32*` (LLVM 14 and earlier)
    Typed,
}

/// Emission options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    pub pointer_style: PointerStyle,
    /// Producer string written to `!llvm.ident`
    pub ident: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            pointer_style: PointerStyle::default(),
            ident: format!("purple version {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Appends IR text for one module
pub struct IrEmitter {
    output: String,
    config: EmitConfig,
}

impl IrEmitter {
    pub fn new(config: EmitConfig) -> Self {
        Self {
            output: String::new(),
            config,
        }
    }

    /// Text emitted so far
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Consume the emitter and return the module text
    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn instruction(&mut self, text: &str) {
        trace!("emit: {text}");
        self.output.push_str(TAB);
        self.line(text);
    }

    /// Pointer-to-`kind` type spelling
    fn pointer_type(&self, kind: NumberKind) -> String {
        match self.config.pointer_style {
            PointerStyle::Opaque => "ptr".to_string(),
            PointerStyle::Typed => format!("{}*", kind.llvm_type()),
        }
    }

    /// Format-string bytes: the conversion, a newline and the terminator
    fn print_format_len(kind: NumberKind) -> usize {
        kind.format_spec().len() + 2
    }

    /// Module header, format string and the opening of `main`
    pub fn preamble(&mut self, module_id: &str, target: &TargetInfo) {
        let kind = NumberKind::Int32;
        let len = Self::print_format_len(kind);

        self.line(&format!("; ModuleID = '{module_id}'"));
        self.line(&format!("target datalayout = \"{}\"", target.data_layout));
        self.line(&format!("target triple = \"{}\"", target.triple));
        self.line("");
        self.line(&format!(
            "@{PRINT_FORMAT_SYMBOL} = private unnamed_addr constant [{len} x i8] c\"{}\\0A\\00\", align 1",
            kind.format_spec()
        ));
        self.line("");
        self.line("; Function Attrs: noinline nounwind optnone uwtable");
        self.line("define dso_local i32 @main() #0 {");
    }

    /// One `alloca` per planned slot
    pub fn slot_declarations(&mut self, slots: &[SlotDescriptor]) {
        for slot in slots {
            self.instruction(&format!(
                "%{} = alloca {}, align {}",
                slot.register,
                slot.kind.llvm_type(),
                slot.align
            ));
        }
    }

    /// Store a constant into `slot`, returning a pointer to it
    pub fn store_constant(&mut self, value: Number, slot: RegisterId) -> Value {
        let kind = value.kind();
        let text = format!(
            "store {} {}, {} %{}, align {}",
            kind.llvm_type(),
            value,
            self.pointer_type(kind),
            slot,
            kind.align()
        );
        self.instruction(&text);
        Value::pointer(slot, kind)
    }

    /// Load the value held in `slot` into `dest`
    pub fn load(&mut self, dest: RegisterId, slot: RegisterId, kind: NumberKind) {
        let text = format!(
            "%{} = load {}, {} %{}, align {}",
            dest,
            kind.llvm_type(),
            self.pointer_type(kind),
            slot,
            kind.align()
        );
        self.instruction(&text);
    }

    /// Emit `dest = op left, right`
    ///
    /// Both operands must already be loaded. Nothing is written when the
    /// operator is rejected.
    pub fn binary_arithmetic(
        &mut self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        dest: RegisterId,
    ) -> Result<Value, CompilerError> {
        let mnemonic = match op {
            BinaryOp::Add => "add nsw",
            BinaryOp::Subtract => "sub nsw",
            BinaryOp::Multiply => "mul nsw",
            BinaryOp::Divide => "udiv",
            BinaryOp::Exponent => {
                return Err(CompilerError::unsupported(
                    "exponent operator: integer is the only numeric kind and the backend power routine takes floating point"
                        .to_string(),
                ))
            }
        };

        let (lhs, rhs, kind) = match (left, right) {
            (Value::Register { id: l, kind }, Value::Register { id: r, .. }) => (*l, *r, *kind),
            _ => {
                return Err(CompilerError::internal_error(format!(
                    "binary arithmetic '{op}' received unloaded operands {left} and {right}"
                )))
            }
        };

        self.instruction(&format!(
            "%{dest} = {mnemonic} {} %{lhs}, %{rhs}",
            kind.llvm_type()
        ));
        Ok(Value::register(dest, kind))
    }

    /// Call printf with the loaded value; the call's own result lands in `dest`
    pub fn print_int(&mut self, value: &Value, dest: RegisterId) -> Result<(), CompilerError> {
        let (register, kind) = match value {
            Value::Register { id, kind } => (*id, *kind),
            other => {
                return Err(CompilerError::internal_error(format!(
                    "print received unloaded value {other}"
                )))
            }
        };

        let ty = kind.llvm_type();
        let text = match self.config.pointer_style {
            PointerStyle::Opaque => format!(
                "%{dest} = call i32 (ptr, ...) @printf(ptr noundef @{PRINT_FORMAT_SYMBOL}, {ty} noundef %{register})"
            ),
            PointerStyle::Typed => {
                let len = Self::print_format_len(kind);
                format!(
                    "%{dest} = call i32 (i8*, ...) @printf(i8* getelementptr inbounds ([{len} x i8], [{len} x i8]* @{PRINT_FORMAT_SYMBOL}, i32 0, i32 0), {ty} %{register})"
                )
            }
        };
        self.instruction(&text);
        Ok(())
    }

    /// Close `main`, declare printf and emit attribute and metadata blocks
    pub fn postamble(&mut self, target: &TargetInfo) {
        self.instruction("ret i32 0");
        self.line("}");
        self.line("");

        match self.config.pointer_style {
            PointerStyle::Opaque => self.line("declare i32 @printf(ptr noundef, ...) #1"),
            PointerStyle::Typed => self.line("declare i32 @printf(i8*, ...) #1"),
        }
        self.line("");

        let cpu = if target.is_x86_64() {
            " \"target-cpu\"=\"x86-64\" \"target-features\"=\"+cx8,+fxsr,+sse,+sse2,+x87\" \"tune-cpu\"=\"generic\""
        } else {
            ""
        };
        self.line(&format!(
            "attributes #0 = {{ noinline nounwind optnone uwtable \"frame-pointer\"=\"all\" \"min-legal-vector-width\"=\"0\" \"no-trapping-math\"=\"true\" \"stack-protector-buffer-size\"=\"8\"{cpu} }}"
        ));
        self.line(&format!(
            "attributes #1 = {{ \"frame-pointer\"=\"all\" \"no-trapping-math\"=\"true\" \"stack-protector-buffer-size\"=\"8\"{cpu} }}"
        ));
        self.line("");

        self.line("!llvm.module.flags = !{!0, !1, !2, !3, !4}");
        self.line("!llvm.ident = !{!5}");
        self.line("");
        // "Min" behavior (8) and async unwind tables (2) need LLVM 15
        let (pic_behavior, uwtable) = match self.config.pointer_style {
            PointerStyle::Opaque => (8, 2),
            PointerStyle::Typed => (7, 1),
        };
        self.line("!0 = !{i32 1, !\"wchar_size\", i32 4}");
        self.line(&format!("!1 = !{{i32 {pic_behavior}, !\"PIC Level\", i32 2}}"));
        self.line("!2 = !{i32 7, !\"PIE Level\", i32 2}");
        self.line(&format!("!3 = !{{i32 7, !\"uwtable\", i32 {uwtable}}}"));
        self.line("!4 = !{i32 7, !\"frame-pointer\", i32 2}");
        let ident = format!("!5 = !{{!\"{}\"}}", self.config.ident);
        self.line(&ident);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x86() -> TargetInfo {
        TargetInfo::new("e-m:e-i64:64-n8:16:32:64-S128", "x86_64-pc-linux-gnu")
    }

    fn reg(id: RegisterId) -> Value {
        Value::register(id, NumberKind::Int32)
    }

    #[test]
    fn test_preamble() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        emitter.preamble("sum.prp", &x86());

        assert_eq!(
            emitter.as_str(),
            "; ModuleID = 'sum.prp'\n\
             target datalayout = \"e-m:e-i64:64-n8:16:32:64-S128\"\n\
             target triple = \"x86_64-pc-linux-gnu\"\n\
             \n\
             @print_int_fstring = private unnamed_addr constant [4 x i8] c\"%d\\0A\\00\", align 1\n\
             \n\
             ; Function Attrs: noinline nounwind optnone uwtable\n\
             define dso_local i32 @main() #0 {\n"
        );
    }

    #[test]
    fn test_slot_declarations() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        emitter.slot_declarations(&[
            SlotDescriptor::new(1, NumberKind::Int32),
            SlotDescriptor::new(2, NumberKind::Int32),
        ]);
        assert_eq!(
            emitter.as_str(),
            "  %1 = alloca i32, align 4\n  %2 = alloca i32, align 4\n"
        );
    }

    #[test]
    fn test_store_and_load_pointer_styles() {
        let mut opaque = IrEmitter::new(EmitConfig::default());
        let value = opaque.store_constant(Number::Int32(-12), 3);
        opaque.load(4, 3, NumberKind::Int32);
        assert_eq!(value, Value::pointer(3, NumberKind::Int32));
        assert_eq!(
            opaque.as_str(),
            "  store i32 -12, ptr %3, align 4\n  %4 = load i32, ptr %3, align 4\n"
        );

        let mut typed = IrEmitter::new(EmitConfig {
            pointer_style: PointerStyle::Typed,
            ..EmitConfig::default()
        });
        typed.store_constant(Number::Int32(7), 1);
        typed.load(2, 1, NumberKind::Int32);
        assert_eq!(
            typed.as_str(),
            "  store i32 7, i32* %1, align 4\n  %2 = load i32, i32* %1, align 4\n"
        );
    }

    #[test]
    fn test_arithmetic_mnemonics() {
        let cases = [
            (BinaryOp::Add, "add nsw"),
            (BinaryOp::Subtract, "sub nsw"),
            (BinaryOp::Multiply, "mul nsw"),
            (BinaryOp::Divide, "udiv"),
        ];
        for (op, mnemonic) in cases {
            let mut emitter = IrEmitter::new(EmitConfig::default());
            let result = emitter.binary_arithmetic(op, &reg(3), &reg(4), 5).unwrap();
            assert_eq!(result, reg(5));
            assert_eq!(emitter.as_str(), format!("  %5 = {mnemonic} i32 %3, %4\n"));
        }
    }

    #[test]
    fn test_exponent_rejected_without_output() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        let err = emitter
            .binary_arithmetic(BinaryOp::Exponent, &reg(1), &reg(2), 3)
            .unwrap_err();
        assert!(matches!(err, CompilerError::Unsupported { .. }));
        assert!(emitter.as_str().is_empty());
    }

    #[test]
    fn test_arithmetic_requires_loaded_operands() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        let err = emitter
            .binary_arithmetic(
                BinaryOp::Add,
                &Value::pointer(1, NumberKind::Int32),
                &reg(2),
                3,
            )
            .unwrap_err();
        assert!(matches!(err, CompilerError::Internal { .. }));
        assert!(emitter.as_str().is_empty());
    }

    #[test]
    fn test_print_call() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        emitter.print_int(&reg(5), 6).unwrap();
        assert_eq!(
            emitter.as_str(),
            "  %6 = call i32 (ptr, ...) @printf(ptr noundef @print_int_fstring, i32 noundef %5)\n"
        );

        let mut typed = IrEmitter::new(EmitConfig {
            pointer_style: PointerStyle::Typed,
            ..EmitConfig::default()
        });
        typed.print_int(&reg(5), 6).unwrap();
        assert!(typed.as_str().contains(
            "@printf(i8* getelementptr inbounds ([4 x i8], [4 x i8]* @print_int_fstring, i32 0, i32 0), i32 %5)"
        ));

        let err = emitter
            .print_int(&Value::Constant(Number::Int32(1)), 7)
            .unwrap_err();
        assert!(matches!(err, CompilerError::Internal { .. }));
    }

    #[test]
    fn test_postamble_target_attributes() {
        let mut emitter = IrEmitter::new(EmitConfig::default());
        emitter.postamble(&x86());
        let text = emitter.finish();

        assert!(text.starts_with("  ret i32 0\n}\n"));
        assert!(text.contains("declare i32 @printf(ptr noundef, ...) #1"));
        assert!(text.contains("\"target-cpu\"=\"x86-64\""));
        assert!(text.contains("!llvm.module.flags = !{!0, !1, !2, !3, !4}"));
        assert!(text.contains("!5 = !{!\"purple version"));

        assert!(text.contains("!1 = !{i32 8, !\"PIC Level\", i32 2}"));
        assert!(text.contains("!3 = !{i32 7, !\"uwtable\", i32 2}"));

        let mut arm = IrEmitter::new(EmitConfig::default());
        arm.postamble(&TargetInfo::new(
            "e-m:o-i64:64-i128:128-n32:64-S128",
            "arm64-apple-macosx14.0.0",
        ));
        assert!(!arm.as_str().contains("target-cpu"));
    }

    #[test]
    fn test_typed_postamble_uses_llvm14_module_flags() {
        let mut emitter = IrEmitter::new(EmitConfig {
            pointer_style: PointerStyle::Typed,
            ident: "purple".to_string(),
        });
        emitter.postamble(&TargetInfo::new("e", "riscv64-unknown-linux-gnu"));

        assert_eq!(
            emitter.as_str(),
            "  ret i32 0\n\
             }\n\
             \n\
             declare i32 @printf(i8*, ...) #1\n\
             \n\
             attributes #0 = { noinline nounwind optnone uwtable \"frame-pointer\"=\"all\" \
             \"min-legal-vector-width\"=\"0\" \"no-trapping-math\"=\"true\" \
             \"stack-protector-buffer-size\"=\"8\" }\n\
             attributes #1 = { \"frame-pointer\"=\"all\" \"no-trapping-math\"=\"true\" \
             \"stack-protector-buffer-size\"=\"8\" }\n\
             \n\
             !llvm.module.flags = !{!0, !1, !2, !3, !4}\n\
             !llvm.ident = !{!5}\n\
             \n\
             !0 = !{i32 1, !\"wchar_size\", i32 4}\n\
             !1 = !{i32 7, !\"PIC Level\", i32 2}\n\
             !2 = !{i32 7, !\"PIE Level\", i32 2}\n\
             !3 = !{i32 7, !\"uwtable\", i32 1}\n\
             !4 = !{i32 7, !\"frame-pointer\", i32 2}\n\
             !5 = !{!\"purple\"}\n"
        );
    }

    #[test]
    fn test_target_arch() {
        assert_eq!(x86().arch(), "x86_64");
        assert!(x86().is_x86_64());
        assert!(!TargetInfo::new("", "aarch64-unknown-linux-gnu").is_x86_64());
    }
}
