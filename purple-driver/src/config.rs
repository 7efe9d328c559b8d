use clap::ValueEnum;
use purple_codegen::PointerStyle;
use purple_common::CompilerError;
use std::io;
use std::path::{Path, PathBuf};

/// Everything one compilation run needs to know
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input: PathBuf,
    /// Executable path handed to clang; clang's default when absent
    pub output: Option<PathBuf>,
    /// Where the `.ll` module goes; the input with extension `ll` when absent
    pub ll_output: Option<PathBuf>,
    pub emit_llvm_only: bool,
    pub dump_ast: bool,
    pub pointer_style: PointerStyle,
    /// Explicit clang binary; looked up on PATH otherwise
    pub clang: Option<PathBuf>,
    pub data_layout: Option<String>,
    pub target_triple: Option<String>,
    pub log_level: LogLevel,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            ll_output: None,
            emit_llvm_only: false,
            dump_ast: false,
            pointer_style: PointerStyle::Opaque,
            clang: None,
            data_layout: None,
            target_triple: None,
            log_level: LogLevel::Warn,
        }
    }
}

impl CompileConfig {
    /// Where the module is written; never the input itself
    pub fn ll_path(&self) -> Result<PathBuf, CompilerError> {
        let path = match &self.ll_output {
            Some(path) => path.clone(),
            None => self.input.with_extension("ll"),
        };

        if same_file(&path, &self.input) {
            return Err(CompilerError::io_error(
                &path,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "the generated module would overwrite the input; pass --ll-output",
                ),
            ));
        }
        Ok(path)
    }

    /// Name written into the module's `ModuleID` line
    pub fn module_id(&self) -> String {
        self.input
            .file_name()
            .map(Path::new)
            .unwrap_or(self.input.as_path())
            .display()
            .to_string()
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::None => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command-line spelling of `PointerStyle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointerStyleArg {
    /// `ptr` (LLVM 15+)
    Opaque,
    /// `i32*` (LLVM 14 and earlier)
    Typed,
}

impl From<PointerStyleArg> for PointerStyle {
    fn from(arg: PointerStyleArg) -> Self {
        match arg {
            PointerStyleArg::Opaque => PointerStyle::Opaque,
            PointerStyleArg::Typed => PointerStyle::Typed,
        }
    }
}
