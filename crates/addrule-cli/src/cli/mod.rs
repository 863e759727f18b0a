//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` writes aligned text; `Json` writes one JSON document for data and
/// NDJSON for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// Address fields given on the command line.
#[derive(Args, Clone, Debug, Default)]
pub struct AddressArgs {
    /// ISO 3166-1 alpha-2 country code (case-insensitive).
    #[arg(long, value_name = "CC")]
    pub country: Option<String>,
    /// Recipient name.
    #[arg(long)]
    pub name: Option<String>,
    /// Organization or company.
    #[arg(long)]
    pub organization: Option<String>,
    /// Street address line (repeatable, one per line).
    #[arg(long = "street", value_name = "LINE")]
    pub street_address: Vec<String>,
    /// Dependent locality ID (district, suburb).
    #[arg(long, value_name = "ID")]
    pub dependent_locality: Option<String>,
    /// Locality ID or free-text city name.
    #[arg(long, value_name = "ID")]
    pub locality: Option<String>,
    /// Administrative area ID (state, province).
    #[arg(long, value_name = "ID")]
    pub administrative_area: Option<String>,
    /// Post code.
    #[arg(long)]
    pub post_code: Option<String>,
    /// Sorting code (CEDEX and similar).
    #[arg(long)]
    pub sorting_code: Option<String>,
}

/// Upstream and pool settings for `generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Write the store to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Read upstream records from a local mirror instead of the network.
    ///
    /// The record at `data/US` is read from `DIR/data/US.json`. Takes
    /// precedence over `--upstream-url`.
    #[arg(long, value_name = "DIR")]
    pub from_dir: Option<PathBuf>,
    /// Base URL of the upstream address metadata service.
    #[arg(long, value_name = "URL", env = "ADDRULE_UPSTREAM_URL")]
    pub upstream_url: Option<String>,
    /// Number of countries compiled concurrently.
    #[arg(long, value_name = "N", env = "ADDRULE_WORKERS", default_value = "25")]
    pub workers: usize,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value = "30")]
    pub timeout: u64,
    /// Only compile these countries (repeatable). `ZZ` is always included.
    #[arg(long = "country", value_name = "CC")]
    pub countries: Vec<String>,
    /// Stop after the first country that fails.
    #[arg(long)]
    pub fail_fast: bool,
    /// Write the store even if some countries failed; they are left out.
    #[arg(long)]
    pub allow_failures: bool,
}

/// All top-level subcommands exposed by the `addrule` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Validate an address against the rule store.
    ///
    /// The address comes either from `--input` (a JSON object) or from the
    /// individual field flags.
    Validate {
        /// JSON address file, or `-` for stdin.
        #[arg(long, value_name = "FILE", conflicts_with = "country")]
        input: Option<PathOrStdin>,
        #[command(flatten)]
        address: AddressArgs,
    },

    /// Print the resolved rules of one country.
    Country {
        /// ISO 3166-1 alpha-2 country code.
        #[arg(value_name = "CC")]
        code: String,
    },

    /// List every country in the rule store.
    Countries,

    /// Look up a subdivision name or postal key.
    Lookup {
        /// ISO 3166-1 alpha-2 country code.
        #[arg(value_name = "CC")]
        code: String,
        /// Administrative area ID.
        #[arg(value_name = "AREA")]
        area: String,
        /// Locality ID inside the administrative area.
        #[arg(value_name = "LOCALITY")]
        locality: Option<String>,
        /// Dependent locality ID inside the locality.
        #[arg(value_name = "DEPENDENT", requires = "locality")]
        dependent_locality: Option<String>,
        /// Language of the returned name; falls back to the country default.
        #[arg(long, short = 'l', value_name = "LANG")]
        language: Option<String>,
        /// Print the administrative area's postal key instead of its name.
        #[arg(long, conflicts_with_all = ["locality", "language"])]
        postal_key: bool,
    },

    /// Fetch upstream metadata and compile a new rule store.
    Generate(GenerateArgs),
}

/// Root CLI struct for the `addrule` binary.
///
/// Global flags are marked `global = true` so clap propagates them to every
/// subcommand.
#[derive(Parser)]
#[command(
    name = "addrule",
    version,
    about = "Postal address rules: validate addresses, inspect and generate rule stores",
    long_about = "Validates postal addresses against per-country rules (required and\n\
                  allowed fields, subdivisions, post-code patterns) and compiles\n\
                  those rules from the upstream address metadata service."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log progress at debug level (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Rule store file to use instead of the bundled one.
    #[arg(long, global = true, value_name = "FILE", env = "ADDRULE_STORE")]
    pub store: Option<PathBuf>,

    /// Maximum input file size in bytes.
    ///
    /// Applies to `--store` and `--input`. Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "ADDRULE_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Default log filter for the verbosity flags; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests;
