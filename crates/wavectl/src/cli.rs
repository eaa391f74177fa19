//! Clap derive structures for the `wavectl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wavectl -- network control of Topas4 tunable lasers
#[derive(Debug, Parser)]
#[command(
    name = "wavectl",
    version,
    about = "Discover and control Topas4 tunable lasers on the local network",
    long_about = "Control a Topas4-protocol optical parametric amplifier over the LAN.\n\n\
        Devices are found via UDP discovery (multicast + broadcast probe); tuning\n\
        and shutter operations run against the device's REST control surface,\n\
        with convergence tracked by status polling and read-back verification.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Laser profile to use
    #[arg(long, short = 'p', env = "WAVECTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device control base URL (overrides profile)
    #[arg(long, short = 'u', env = "WAVECTL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Device serial number, resolved via discovery (overrides profile)
    #[arg(long, short = 's', env = "WAVECTL_SERIAL", global = true)]
    pub serial: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WAVECTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Auto-acknowledge interlock prompts (for scripted use)
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// HTTP request timeout in seconds
    #[arg(long, env = "WAVECTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the local network for Topas4 devices
    #[command(alias = "d")]
    Discover(DiscoverArgs),

    /// Show wavelength, shutter, and tuning status
    #[command(alias = "st")]
    Status,

    /// Read or set the output wavelength
    #[command(alias = "wl", alias = "w")]
    Wavelength(WavelengthArgs),

    /// Read or set the shutter
    #[command(alias = "sh")]
    Shutter(ShutterArgs),

    /// List the device's tuning interactions and their ranges
    #[command(alias = "ia")]
    Interactions,

    /// Manage configuration profiles
    Config(ConfigArgs),
}

// ── Discover ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Discovery window in milliseconds
    #[arg(long, default_value = "1000")]
    pub window_ms: u64,
}

// ── Wavelength ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WavelengthArgs {
    #[command(subcommand)]
    pub command: WavelengthCommand,
}

#[derive(Debug, Subcommand)]
pub enum WavelengthCommand {
    /// Read the current output wavelength
    Get,

    /// Tune to a new wavelength and wait for convergence
    Set(WavelengthSetArgs),
}

#[derive(Debug, Args)]
pub struct WavelengthSetArgs {
    /// Target wavelength in nanometers
    pub nm: f64,

    /// Tuning interaction to use (default: first whose range covers
    /// the target)
    #[arg(long, short = 'i')]
    pub interaction: Option<String>,

    /// Leave the shutter closed after an interlock pause instead of
    /// restoring its prior state
    #[arg(long)]
    pub no_restore_shutter: bool,
}

// ── Shutter ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShutterArgs {
    #[command(subcommand)]
    pub command: ShutterCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShutterCommand {
    /// Read the current shutter state
    Get,

    /// Open the shutter
    Open,

    /// Close the shutter
    Close,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init,

    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,
}
