//! clang interaction: target-parameter queries and final build

use log::{debug, info, warn};
use purple_common::CompilerError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use which::which;

const EMPTY_PROGRAM: &str = "int main(void) { return 0; }\n";

/// Locates clang and caches what it reports about the host target
pub struct Toolchain {
    requested: Option<PathBuf>,
    clang: Option<PathBuf>,
    data_layout: Option<String>,
    triple: Option<String>,
}

impl Toolchain {
    /// `clang` overrides the PATH lookup; the target parameters may be pre-seeded
    pub fn new(
        clang: Option<PathBuf>,
        data_layout: Option<String>,
        triple: Option<String>,
    ) -> Self {
        Self {
            requested: clang,
            clang: None,
            data_layout,
            triple,
        }
    }

    fn clang(&mut self) -> Result<PathBuf, CompilerError> {
        if let Some(path) = &self.clang {
            return Ok(path.clone());
        }

        let name = self
            .requested
            .clone()
            .unwrap_or_else(|| PathBuf::from("clang"));
        let path = which(&name).map_err(|e| {
            CompilerError::toolchain_error(format!(
                "could not find '{}' in PATH: {e}",
                name.display()
            ))
        })?;
        debug!("Using clang at {}", path.display());
        self.clang = Some(path.clone());
        Ok(path)
    }

    fn run(cmd: &mut Command) -> Result<Output, CompilerError> {
        debug!("Running: {cmd:?}");
        cmd.output().map_err(|e| {
            CompilerError::toolchain_error(format!("failed to run {cmd:?}: {e}"))
        })
    }

    /// Target data layout clang uses for a C translation unit
    pub fn data_layout(&mut self) -> Result<String, CompilerError> {
        if let Some(layout) = &self.data_layout {
            return Ok(layout.clone());
        }

        let clang = self.clang()?;
        let dir = TempDir::new().map_err(|e| {
            CompilerError::toolchain_error(format!("cannot create scratch directory: {e}"))
        })?;
        let source = dir.path().join("empty.c");
        let module = dir.path().join("empty.ll");
        std::fs::write(&source, EMPTY_PROGRAM)
            .map_err(|e| CompilerError::io_error(&source, e))?;

        let output = Self::run(
            Command::new(&clang)
                .args(["-S", "-emit-llvm", "-w"])
                .arg(&source)
                .arg("-o")
                .arg(&module),
        )?;
        if !output.status.success() {
            warn!(
                "Layout query exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = std::fs::read_to_string(&module).map_err(|e| {
            CompilerError::toolchain_error(format!(
                "layout query produced no module at {}: {e}",
                module.display()
            ))
        })?;
        let layout = extract_data_layout(&text)?.ok_or_else(|| {
            CompilerError::toolchain_error(
                "layout query module has no target datalayout line".to_string(),
            )
        })?;

        info!("Target data layout: {layout}");
        self.data_layout = Some(layout.clone());
        Ok(layout)
    }

    /// Target triple reported by `clang -print-target-triple`
    pub fn target_triple(&mut self) -> Result<String, CompilerError> {
        if let Some(triple) = &self.triple {
            return Ok(triple.clone());
        }

        let clang = self.clang()?;
        let output = Self::run(Command::new(&clang).arg("-print-target-triple"))?;
        if !output.status.success() {
            return Err(CompilerError::toolchain_error(format!(
                "clang -print-target-triple exited with {}",
                output.status
            )));
        }

        let triple = strip_newline(&String::from_utf8_lossy(&output.stdout)).to_string();
        if triple.is_empty() {
            return Err(CompilerError::toolchain_error(
                "clang reported an empty target triple".to_string(),
            ));
        }

        info!("Target triple: {triple}");
        self.triple = Some(triple.clone());
        Ok(triple)
    }

    /// Compile and link a module into an executable
    pub fn build(&mut self, module: &Path, output: Option<&Path>) -> Result<(), CompilerError> {
        let clang = self.clang()?;
        let mut cmd = Command::new(&clang);
        cmd.arg(module);
        if let Some(exe) = output {
            cmd.arg("-o").arg(exe);
        }

        let result = Self::run(&mut cmd)?;
        if !result.stdout.is_empty() {
            debug!("clang stdout:\n{}", String::from_utf8_lossy(&result.stdout));
        }
        if !result.stderr.is_empty() {
            debug!("clang stderr:\n{}", String::from_utf8_lossy(&result.stderr));
        }

        if !result.status.success() {
            return Err(CompilerError::toolchain_error(format!(
                "clang failed to build {} ({})",
                module.display(),
                result.status
            )));
        }
        Ok(())
    }
}

/// Pull the quoted layout string out of a clang-generated module
pub fn extract_data_layout(module_text: &str) -> Result<Option<String>, CompilerError> {
    let pattern = Regex::new(r#"target datalayout = "(.*)""#)
        .map_err(|e| CompilerError::internal_error(format!("bad layout pattern: {e}")))?;
    Ok(pattern
        .captures(module_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Drop one trailing line terminator
pub fn strip_newline(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}
