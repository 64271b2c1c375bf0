use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, clap::ValueEnum)]
enum EmitStage {
    /// Complete Python program
    Py,
    /// Program body without header or preludes
    Body,
    /// Required runtime features, one per line
    Features,
    /// Normalized block tree as JSON
    Blocks,
}

#[derive(Parser, Debug)]
#[command(
    name = "cbc",
    version,
    about = "Cabbage Block Compiler: translates editor block programs into CoronaEngine Python scripts"
)]
struct Cli {
    /// Input block program (.json)
    source: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output stage
    #[arg(long, value_enum, default_value_t = EmitStage::Py)]
    emit: EmitStage,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=8))]
    indent: u8,

    /// Indent with tabs instead of spaces
    #[arg(long)]
    tabs: bool,

    /// Loop-trap line inserted at the top of every loop body (`%1` = block id)
    #[arg(long)]
    statement_prefix: Option<String>,

    /// Omit the `import CoronaEngine` header
    #[arg(long)]
    no_header: bool,

    /// Print generation phases
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    debug!(source = %cli.source.display(), emit = ?cli.emit, "cbc starting");

    // ── Load block program ──
    let program = match cbc::load::load_program(&cli.source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("cbc: error: {}", e);
            std::process::exit(2);
        }
    };
    debug!(
        stacks = program.stacks.len(),
        blocks = program.block_count(),
        "loaded block program"
    );

    if let EmitStage::Blocks = cli.emit {
        match program.to_json() {
            Ok(json) => write_output(cli.output.as_deref(), &(json + "\n")),
            Err(e) => {
                eprintln!("cbc: error: {}", e);
                std::process::exit(2);
            }
        }
        return;
    }

    // ── Generate ──
    let registry = cbc::Registry::builtin();
    debug!(generators = registry.len(), "registry ready");

    let options = cbc::GenerateOptions {
        indent: if cli.tabs {
            "\t".to_string()
        } else {
            " ".repeat(cli.indent as usize)
        },
        statement_prefix: cli.statement_prefix.clone(),
        header: !cli.no_header,
    };
    let result = cbc::generate(&program, &registry, &options);

    for diag in &result.diagnostics {
        eprintln!("cbc: {}", diag);
    }
    if cbc::diag::has_errors(&result.diagnostics) {
        std::process::exit(1);
    }

    let generated = result.generated;
    debug!(
        lines = generated.python_source.lines().count(),
        features = generated.features.len(),
        "generation complete"
    );

    let text = match cli.emit {
        EmitStage::Py => generated.python_source,
        EmitStage::Body => generated.body,
        EmitStage::Features => generated
            .features
            .iter()
            .map(|f| format!("{}\n", f))
            .collect(),
        EmitStage::Blocks => unreachable!("handled before generation"),
    };
    write_output(cli.output.as_deref(), &text);
}

fn write_output(path: Option<&Path>, text: &str) {
    let written = match path {
        Some(path) => std::fs::write(path, text).map_err(|e| format!("{}: {}", path.display(), e)),
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(|e| e.to_string()),
    };
    if let Err(e) = written {
        eprintln!("cbc: error: {}", e);
        std::process::exit(2);
    }
    debug!(bytes = text.len(), "output written");
}
