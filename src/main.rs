use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use suffix_tray::index::meta::TrayMeta;
use suffix_tray::index::{
    CheckStatus, LcpComputer, LcpWidths, Method, SpecialOrder, SuffixChecker, SuffixTrayBuilder, Text,
};
use suffix_tray::io::array_file::{read_positions, with_extension, write_positions};
use suffix_tray::io::sequence::CodedSequence;
use suffix_tray::util::alphabet::Alphabet;
use suffix_tray::util::pos::Pos;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "suffix-tray",
    author,
    version,
    about = "Suffix tray construction and LCP arrays for coded sequences",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the suffix order (.pos) and optionally LCP arrays of a sequence file
    Suffix(SuffixArgs),
    /// Verify a stored position file against its coded sequence
    Check {
        /// Output prefix used when building (<prefix>.seq, <prefix>.pos, <prefix>.tray)
        prefix: PathBuf,
        /// Alphabet map (dna, cdna, protein, numeric or a map file); defaults to the one used when building
        #[arg(short, long)]
        alphabet: Option<String>,
    },
}

#[derive(Args, Debug)]
struct SuffixArgs {
    /// Input: FASTA, plain text (one record per line) or, with --coded, a coded .seq file
    input: PathBuf,
    /// Alphabet map: dna, cdna, protein, numeric or path to a map file
    #[arg(short, long, default_value = "dna")]
    alphabet: String,
    /// Input is already coded; the last byte must be a separator
    #[arg(long)]
    coded: bool,
    /// Output prefix (defaults to the input path without extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Construction method: L, R, minLR, bothLR, bothLR2
    #[arg(short, long, default_value = "L")]
    method: Method,
    /// Write the 4-byte LCP array (.lcp4)
    #[arg(short = 'l', long = "lcp")]
    lcp4: bool,
    /// Write the 1-byte LCP array (.lcp1)
    #[arg(long)]
    lcp1: bool,
    /// Write the 2-byte LCP array (.lcp2)
    #[arg(long)]
    lcp2: bool,
    /// Write the 8-byte LCP array (.lcp8)
    #[arg(long)]
    lcp8: bool,
    /// Equal wildcards and separators count as matching characters in LCP values
    #[arg(long = "lcp-by-value")]
    lcp_by_value: bool,
    /// Check the constructed order
    #[arg(short, long)]
    check: bool,
    /// Use 64-bit positions
    #[arg(short, long)]
    big: bool,
}

impl SuffixArgs {
    fn lcp_widths(&self) -> LcpWidths {
        let mut widths = LcpWidths::empty();
        widths.set(LcpWidths::W1, self.lcp1);
        widths.set(LcpWidths::W2, self.lcp2);
        widths.set(LcpWidths::W4, self.lcp4);
        widths.set(LcpWidths::W8, self.lcp8);
        widths
    }

    fn prefix(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.with_extension(""))
    }
}

fn main() -> Result<ExitCode> {
    env_logger::builder().filter_level(log::LevelFilter::Info).parse_default_env().try_init()?;

    let cli = Cli::parse();
    let status = match cli.command {
        Commands::Suffix(args) => run_suffix(&args)?,
        Commands::Check { prefix, alphabet } => run_check(&prefix, alphabet.as_deref())?,
    };
    Ok(ExitCode::from(status.code()))
}

fn run_suffix(args: &SuffixArgs) -> Result<CheckStatus> {
    let alphabet = Alphabet::by_name(&args.alphabet)?;
    let prefix = args.prefix();

    let coded = if args.coded {
        CodedSequence::from_coded_path(&args.input)?
    } else {
        CodedSequence::from_path(&args.input, &alphabet)?
    };
    let seq_path = with_extension(&prefix, ".seq");
    if seq_path != args.input {
        coded.save(&seq_path)?;
    }
    if coded.is_empty() {
        anyhow::bail!("input '{}' contains no sequence", args.input.display());
    }
    let text = Text::new(&coded.seq, &alphabet)?;

    println!("input: {}", args.input.display());
    println!("records: {}", coded.records.len());
    println!("length: {}", text.len());

    let mut meta = if args.big { build::<i64>(args, text, &prefix)? } else { build::<i32>(args, text, &prefix)? };
    meta.records = coded.records;
    meta.input_file = Some(args.input.display().to_string());
    meta.alphabet = Some(args.alphabet.clone());

    let meta_path = with_extension(&prefix, ".tray");
    meta.save_to_file(&meta_path)?;
    println!("metadata saved: {}", meta_path.display());

    Ok(meta_status(&meta))
}

/// 构建、写出位置流，并按需计算 LCP / 校验。LCP 与校验只读链表，并发执行。
fn build<I: Pos>(args: &SuffixArgs, text: Text<'_>, prefix: &Path) -> Result<TrayMeta> {
    let mut builder = SuffixTrayBuilder::new(text);
    let mut list = builder.build::<I>(args.method)?;
    let mut meta = TrayMeta::new(args.method.name(), text.len(), I::BYTES, builder.steps());
    println!(
        "method: {} ({}), steps: {} ({:.2}/char)",
        args.method,
        list.encoding(),
        meta.steps,
        meta.steps_per_char
    );

    let pos_path = with_extension(prefix, ".pos");
    let written = write_positions(&mut list, &pos_path)?;
    println!("positions saved: {} ({} entries)", pos_path.display(), written);

    let widths = args.lcp_widths();
    let lcp_text = if args.lcp_by_value { text.with_special_order(SpecialOrder::Value) } else { text };
    let (status, lcp) = rayon::join(
        || args.check.then(|| SuffixChecker::new(text).check_list(&list)),
        || {
            (!widths.is_empty()).then(|| LcpComputer::new(lcp_text).write(&list, widths, prefix)).transpose()
        },
    );

    if let Some(info) = lcp? {
        println!(
            "lcp: max {}, exceptions 1/2/4-byte: {}/{}/{}",
            info.max_lcp, info.lcp1_exceptions, info.lcp2_exceptions, info.lcp4_exceptions
        );
        meta.lcp = Some(info);
        meta.lcp_widths = widths.bits();
    }
    if let Some(status) = status {
        println!("check: {}", describe(status));
        meta.check_status = Some(status.code());
    }
    Ok(meta)
}

fn run_check(prefix: &Path, alphabet: Option<&str>) -> Result<CheckStatus> {
    let meta = TrayMeta::load_from_file(&with_extension(prefix, ".tray"))?;
    let alphabet_name = alphabet.or(meta.alphabet.as_deref()).unwrap_or("dna");
    let alphabet = Alphabet::by_name(alphabet_name)?;
    let coded = CodedSequence::from_coded_path(&with_extension(prefix, ".seq"))?;
    let text = Text::new(&coded.seq, &alphabet)?;
    if text.len() as u64 != meta.length {
        anyhow::bail!("sequence has length {}, metadata records {}", text.len(), meta.length);
    }
    info!(
        "checking {} ({} positions, method {}, built {})",
        prefix.display(),
        meta.length,
        meta.method,
        meta.build_timestamp.as_deref().unwrap_or("?")
    );

    let pos_path = with_extension(prefix, ".pos");
    let checker = SuffixChecker::new(text);
    let status = match meta.pos_bytes {
        4 => checker.check_positions(&read_positions::<i32>(&pos_path)?),
        8 => checker.check_positions(&read_positions::<i64>(&pos_path)?),
        w => anyhow::bail!("unsupported position width {} in metadata", w),
    };
    println!("check: {}", describe(status));
    Ok(status)
}

fn meta_status(meta: &TrayMeta) -> CheckStatus {
    meta.check_status.map(CheckStatus::from_bits_truncate).unwrap_or(CheckStatus::empty())
}

fn describe(status: CheckStatus) -> String {
    if status.is_ok() {
        return "OK".to_string();
    }
    let mut parts = Vec::new();
    if status.contains(CheckStatus::SORTING) {
        parts.push("sorting error");
    }
    if status.contains(CheckStatus::COUNT) {
        parts.push("count error");
    }
    format!("{} (status {})", parts.join(", "), status.code())
}
