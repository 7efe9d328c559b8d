//! Purple Compiler Driver
//!
//! Compiles a single arithmetic expression to an LLVM module and, unless
//! asked to stop there, builds it into an executable that prints the value.

mod config;
mod toolchain;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{CompileConfig, LogLevel, PointerStyleArg};
use log::{debug, info};
use purple_codegen::{generate_llvm, EmitConfig, TargetInfo};
use purple_common::{CompilerError, ReturnCode};
use purple_frontend::Frontend;
use std::fs;
use std::path::PathBuf;
use toolchain::Toolchain;

#[derive(Parser)]
#[command(name = "purple")]
#[command(about = "Purple arithmetic compiler (LLVM IR backend)")]
#[command(version)]
struct Cli {
    /// Input source file
    input: PathBuf,

    /// Executable to produce
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path for the generated .ll module
    #[arg(long)]
    ll_output: Option<PathBuf>,

    /// Stop after writing the .ll module
    #[arg(short = 'S', long)]
    emit_llvm: bool,

    /// Print the parsed expression tree as JSON
    #[arg(long)]
    dump_ast: bool,

    /// Pointer spelling in the emitted IR
    #[arg(long, value_enum, default_value = "opaque")]
    pointer_style: PointerStyleArg,

    /// clang binary to use
    #[arg(long)]
    clang: Option<PathBuf>,

    /// Target data layout (skips asking clang)
    #[arg(long)]
    data_layout: Option<String>,

    /// Target triple (skips asking clang)
    #[arg(long)]
    target_triple: Option<String>,

    /// Logging verbosity; RUST_LOG takes precedence
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

impl From<Cli> for CompileConfig {
    fn from(cli: Cli) -> Self {
        CompileConfig {
            input: cli.input,
            output: cli.output,
            ll_output: cli.ll_output,
            emit_llvm_only: cli.emit_llvm,
            dump_ast: cli.dump_ast,
            pointer_style: cli.pointer_style.into(),
            clang: cli.clang,
            data_layout: cli.data_layout,
            target_triple: cli.target_triple,
            log_level: cli.log_level,
        }
    }
}

const PIPELINE_STACK_SIZE: usize = 256 * 1024 * 1024;

fn main() {
    let config = CompileConfig::from(Cli::parse());

    env_logger::Builder::new()
        .filter_level(config.log_level.filter())
        .parse_default_env()
        .init();

    // Deep expression trees are walked recursively
    let worker = std::thread::Builder::new()
        .name("purple".to_string())
        .stack_size(PIPELINE_STACK_SIZE)
        .spawn(move || run(&config));
    let outcome = match worker {
        Ok(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(anyhow!("compiler thread panicked"))),
        Err(e) => Err(anyhow!("cannot start compiler thread: {e}")),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<CompilerError>()
            .map(CompilerError::return_code)
            .unwrap_or(ReturnCode::Error);
        std::process::exit(code.code());
    }
}

fn run(config: &CompileConfig) -> Result<()> {
    info!("Compiling {}", config.input.display());
    let ll_path = config.ll_path()?;

    let source = fs::read_to_string(&config.input)
        .map_err(|e| CompilerError::io_error(&config.input, e))?;
    let filename = config.input.display().to_string();
    let expr = Frontend::parse_source(&source, &filename)?;
    debug!("Parsed {} leaves", expr.leaf_count());

    if config.dump_ast {
        let json = serde_json::to_string_pretty(&expr).context("Failed to serialize AST")?;
        println!("{json}");
    }

    let mut toolchain = Toolchain::new(
        config.clang.clone(),
        config.data_layout.clone(),
        config.target_triple.clone(),
    );
    let target = TargetInfo::new(toolchain.data_layout()?, toolchain.target_triple()?);

    let emit_config = EmitConfig {
        pointer_style: config.pointer_style,
        ..EmitConfig::default()
    };
    let module = generate_llvm(&expr, &config.module_id(), &target, emit_config)?;

    fs::write(&ll_path, &module).map_err(|e| CompilerError::io_error(&ll_path, e))?;
    info!("Wrote {}", ll_path.display());

    if config.emit_llvm_only {
        return Ok(());
    }

    toolchain.build(&ll_path, config.output.as_deref())?;
    if let Some(exe) = &config.output {
        info!("Built {}", exe.display());
    }
    Ok(())
}
