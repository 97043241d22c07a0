use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vcfalign::reference::render_region;
use vcfalign::util::{is_gzipped, open_reader, open_writer};
use vcfalign::{
    FastaScanner, IndexedFasta, MissingChromosome, PipelineConfig, ReferenceSource, ReferenceStore,
    VcfPipeline,
};

#[derive(Parser, Debug)]
#[command(
    name = "vcfalign",
    version,
    about = "Left-align indels in VCF files against a reference genome"
)]
struct Cli {
    /// More diagnostics on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only warnings and errors on stderr.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand <INS>/<DEL> records into literal bases and left-align every indel.
    Standardize(NormalizeArgs),
    /// Left-align indels, writing symbolic records back in symbolic form.
    Align(NormalizeArgs),
    /// Print a stretch of the reference under a position ruler.
    Fetch {
        /// Chromosome name as in the FASTA header.
        chromosome: String,
        /// First position (1-based).
        start: u32,
        /// Position after the last one printed.
        end: u32,
        /// Reference genome (FASTA).
        reference: PathBuf,
        /// How to read the reference.
        #[arg(long, value_enum, default_value_t = ReferenceMode::Auto)]
        reference_mode: ReferenceMode,
    },
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Input VCF (`-` for stdin, `.gz` allowed).
    input: PathBuf,
    /// Reference genome (FASTA).
    reference: PathBuf,
    /// Output VCF (default: stdout).
    output: Option<PathBuf>,
    /// How to read the reference.
    #[arg(long, value_enum, default_value_t = ReferenceMode::Auto)]
    reference_mode: ReferenceMode,
    /// Drop records that do not match the reference instead of stopping.
    #[arg(long)]
    skip_invalid: bool,
    /// Stop when a chromosome is missing from the reference instead of dropping its records.
    #[arg(long)]
    abort_on_missing: bool,
    /// Leave <INS>/<DEL> records unexpanded; they are written unchanged.
    #[arg(long)]
    no_expand: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReferenceMode {
    /// Indexed if a .fai exists, preload for .gz, scan otherwise.
    Auto,
    /// Stream the FASTA, one chromosome in memory.
    Scan,
    /// Load the whole FASTA up front.
    Preload,
    /// Random access through the .fai index.
    Indexed,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Standardize(args) => run_normalize(args, PipelineConfig::standardize())?,
        Commands::Align(args) => run_normalize(args, PipelineConfig::align())?,
        Commands::Fetch {
            chromosome,
            start,
            end,
            reference,
            reference_mode,
        } => run_fetch(&chromosome, start, end, &reference, reference_mode)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_reference(path: &Path, mode: ReferenceMode) -> Result<Box<dyn ReferenceSource>> {
    let mode = match mode {
        ReferenceMode::Auto if IndexedFasta::has_index(path) => ReferenceMode::Indexed,
        ReferenceMode::Auto if is_gzipped(path) => ReferenceMode::Preload,
        ReferenceMode::Auto => ReferenceMode::Scan,
        explicit => explicit,
    };

    let source: Box<dyn ReferenceSource> = match mode {
        ReferenceMode::Indexed => Box::new(
            IndexedFasta::from_path(path)
                .with_context(|| format!("failed to open indexed reference {}", path.display()))?,
        ),
        ReferenceMode::Preload => Box::new(
            ReferenceStore::from_path(path)
                .with_context(|| format!("failed to load reference {}", path.display()))?,
        ),
        ReferenceMode::Scan | ReferenceMode::Auto => {
            if is_gzipped(path) {
                bail!(
                    "cannot scan compressed reference {}; use --reference-mode preload",
                    path.display()
                );
            }
            Box::new(
                FastaScanner::from_path(path)
                    .with_context(|| format!("failed to open reference {}", path.display()))?,
            )
        }
    };
    info!(reference = %path.display(), ?mode, "opened reference");
    Ok(source)
}

fn run_normalize(args: NormalizeArgs, config: PipelineConfig) -> Result<()> {
    let missing = if args.abort_on_missing {
        MissingChromosome::Abort
    } else {
        MissingChromosome::Skip
    };
    let config = config
        .with_missing_chromosome(missing)
        .with_skip_invalid(args.skip_invalid)
        .with_expand_symbolic(!args.no_expand);

    let source = open_reference(&args.reference, args.reference_mode)?;
    let input = open_reader(&args.input)
        .with_context(|| format!("failed to open input VCF {}", args.input.display()))?;
    let mut output = open_writer(args.output.as_deref()).with_context(|| match &args.output {
        Some(path) => format!("failed to create output VCF {}", path.display()),
        None => "failed to open stdout".to_string(),
    })?;

    info!(input = %args.input.display(), "normalizing VCF");
    let mut pipeline = VcfPipeline::new(source, config);
    pipeline
        .run(input, &mut output)
        .with_context(|| format!("normalization of {} failed", args.input.display()))?;
    Ok(())
}

fn run_fetch(
    chromosome: &str,
    start: u32,
    end: u32,
    reference: &Path,
    mode: ReferenceMode,
) -> Result<()> {
    let mut source = open_reference(reference, mode)?;
    let sequence = source
        .fetch(chromosome)
        .with_context(|| format!("failed to load {chromosome} from {}", reference.display()))?;
    let view = render_region(&sequence, start, end)?;
    println!("{view}");
    Ok(())
}
