//! birdc-drv - Compiler driver
//!
//! Orchestrates the pipeline: source → lexer → parser → semantic analysis
//! → type checking → interpretation or WebAssembly lowering. Stages are
//! strictly fail-fast: the diagnostic sink is checked after every pass
//! and later stages do not run once an error is recorded. Lexical errors
//! are fatal immediately.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use thiserror::Error;

use birdc_gen::{CodeGen, LowerError, WasmModule};
use birdc_interp::{Interpreter, RuntimeError};
use birdc_lex::{LexError, Lexer, Token};
use birdc_par::{Ast, Parser};
use birdc_sem::{SemanticAnalyzer, TypeChecker};
use birdc_util::{Handler, SourceBuffer};

/// What the driver should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitType {
    /// Lexer output only
    Tokens,
    /// Parser output only
    Ast,
    /// Stop after the checking passes
    Check,
    /// Interpret in process
    Run,
    /// Lower to a WebAssembly module (the default)
    Wasm,
}

impl Default for EmitType {
    fn default() -> Self {
        EmitType::Wasm
    }
}

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input source file
    pub input_file: Option<PathBuf>,

    /// What to produce
    pub emit: EmitType,

    /// Parse-error cap before the parse is abandoned
    pub max_errors: usize,

    /// Where the serialised module goes
    pub output_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_file: None,
            emit: EmitType::default(),
            max_errors: birdc_par::DEFAULT_MAX_ERRORS,
            output_file: PathBuf::from("output.wasm"),
        }
    }
}

impl Config {
    /// Parses command-line arguments.
    pub fn from_args(args: &[String]) -> anyhow::Result<Self> {
        let mut config = Config::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--tokens" => config.emit = EmitType::Tokens,
                "--ast" => config.emit = EmitType::Ast,
                "--check" => config.emit = EmitType::Check,
                "--run" => config.emit = EmitType::Run,
                "-o" => {
                    let path = iter
                        .next()
                        .context("expected an output path after -o")?;
                    config.output_file = PathBuf::from(path);
                },
                flag if flag.starts_with('-') => {
                    anyhow::bail!("unknown flag '{}'", flag);
                },
                path => {
                    if config.input_file.is_some() {
                        anyhow::bail!("multiple input files given");
                    }
                    config.input_file = Some(PathBuf::from(path));
                },
            }
        }

        Ok(config)
    }
}

/// A pipeline failure.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Fatal lexical error; aborts before any recovery.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// One or more diagnostics were recorded by a pass; the details live
    /// in the session's handler.
    #[error("compilation failed with {count} errors")]
    Reported { count: usize },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Lower(#[from] LowerError),
}

/// What a successful `compile` produced.
#[derive(Debug)]
pub enum CompileOutcome {
    Tokens(Vec<Token>),
    Ast(Ast),
    Checked,
    Ran,
    Module(WasmModule),
}

/// State for one compiler invocation.
pub struct Session {
    pub config: Config,
    pub source: SourceBuffer,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config, source_text: impl Into<String>) -> Self {
        Self {
            config,
            source: SourceBuffer::new(source_text),
            handler: Handler::new(),
        }
    }

    /// Runs the pipeline up to the configured emit stage.
    pub fn compile(&mut self) -> Result<CompileOutcome, CompileError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.compile_with_output(&mut out)
    }

    /// Like [`Session::compile`], with interpreter output routed to the
    /// given writer.
    pub fn compile_with_output<W: Write>(
        &mut self,
        out: &mut W,
    ) -> Result<CompileOutcome, CompileError> {
        // Phase 1: lexing (fatal on first error)
        let tokens = Lexer::new(self.source.text()).lex()?;
        if self.config.emit == EmitType::Tokens {
            return Ok(CompileOutcome::Tokens(tokens));
        }

        // Phase 2: parsing (recovers, accumulates)
        let mut parser =
            Parser::new(tokens, &self.handler).with_max_errors(self.config.max_errors);
        let ast = parser.parse();
        self.check_diagnostics()?;
        if self.config.emit == EmitType::Ast {
            return Ok(CompileOutcome::Ast(ast));
        }

        // Phase 3: semantic analysis
        SemanticAnalyzer::new(&self.handler).analyze(&ast);
        self.check_diagnostics()?;

        // Phase 4: type checking
        TypeChecker::new(&self.handler).check(&ast);
        self.check_diagnostics()?;
        if self.config.emit == EmitType::Check {
            return Ok(CompileOutcome::Checked);
        }

        // Phase 5: execution or lowering
        if self.config.emit == EmitType::Run {
            Interpreter::new(out).run(&ast)?;
            return Ok(CompileOutcome::Ran);
        }

        let module = CodeGen::new().generate(&ast)?;
        Ok(CompileOutcome::Module(module))
    }

    fn check_diagnostics(&self) -> Result<(), CompileError> {
        if self.handler.has_errors() {
            Err(CompileError::Reported {
                count: self.handler.error_count(),
            })
        } else {
            Ok(())
        }
    }
}

/// Entry point for the `birdc` binary.
pub fn run(args: &[String]) -> anyhow::Result<()> {
    let config = Config::from_args(args)?;
    let input = config
        .input_file
        .clone()
        .context("usage: birdc <file> [--run|--check|--tokens|--ast] [-o <file>]")?;

    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut session = Session::new(config, text);

    match session.compile() {
        Ok(CompileOutcome::Tokens(tokens)) => {
            for token in tokens {
                println!("{:?}", token);
            }
        },
        Ok(CompileOutcome::Ast(ast)) => println!("{:#?}", ast),
        Ok(CompileOutcome::Checked) | Ok(CompileOutcome::Ran) => {},
        Ok(CompileOutcome::Module(module)) => {
            print!("{}", module.to_wat());
            let path = &session.config.output_file;
            fs::write(path, module.to_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wasm module written to {}", path.display());
        },
        Err(CompileError::Lex(err)) => {
            let (line, column) = err.position();
            eprintln!(">>[ERROR] {}", err);
            eprint!("{}", session.source.render_context(line, column));
            anyhow::bail!("aborting");
        },
        Err(CompileError::Reported { count }) => {
            eprint!("{}", session.handler.render_all(&session.source));
            anyhow::bail!("compilation failed with {} errors", count);
        },
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
