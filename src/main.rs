use clap::{Parser, Subcommand};
use classpad_lsp::cli::{self, LspArgs};
use classpad_lsp::error::ClasspadResult;
use classpad_lsp::lsp::run_lsp_server;
use classpad_lsp::types::DEFAULT_MAX_PROBLEMS;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classpad")]
#[command(about = "Checks ClassPad Basic programs and runs the ClassPad language server.")]
#[command(long_about = "classpad - tooling for ClassPad Basic programs

COMMANDS:
  check     - Report all-uppercase words, as the language server does
  catalog   - List the completion catalog
  lsp       - Run the language server on stdio

EXAMPLES:
  classpad check prog.cp                  # Report problems
  classpad check *.cp --max-problems 20   # Cap findings per file
  classpad catalog --kind snippet         # Show block templates
  classpad lsp                            # Same as classpad-lsp")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate program files and print diagnostics
    Check {
        /// Program files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Maximum number of problems reported per file
        #[arg(short, long, default_value_t = DEFAULT_MAX_PROBLEMS)]
        max_problems: u32,

        /// Show clean files and related notes
        #[arg(short, long)]
        verbose: bool,
    },

    /// List completion entries
    Catalog {
        /// Only show one kind (function, keyword, variable, operator, snippet)
        #[arg(short, long)]
        kind: Option<String>,

        /// YAML catalog to list instead of the built-in one
        #[arg(long, env = "CLASSPAD_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// Run the language server on stdin/stdout
    Lsp {
        #[command(flatten)]
        args: LspArgs,
    },
}

fn main() -> ClasspadResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            files,
            max_problems,
            verbose,
        } => cli::check(files, max_problems, verbose),

        Commands::Catalog { kind, catalog } => cli::catalog(kind, catalog),

        Commands::Lsp { args } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_lsp_server(args.into_config()))
        }
    }
}
