use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use qrseal_core::VERSION;

/// Qrseal - seal short messages with RSA and carry them as QR codes
#[derive(Parser)]
#[command(name = "qrseal")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding public.pem and private.pem
    #[arg(short, long, global = true, env = "QRSEAL_KEY_DIR", value_name = "DIR")]
    pub key_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the key pair, generating one on first run
    Init,

    /// Manage the key pair
    Keys(KeysArgs),

    /// Encrypt a message and render it as a QR code
    Encrypt(EncryptArgs),

    /// Decrypt a base64 payload
    Decrypt(DecryptArgs),

    /// Decode and decrypt the QR code in an image file
    Scan(ScanArgs),

    /// Watch a snapshot directory for a QR code and decrypt it
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `keys` command
#[derive(Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysSubcommand,
}

#[derive(Subcommand)]
pub enum KeysSubcommand {
    /// Show the public key and its fingerprint
    Show(KeysShowArgs),

    /// Replace the key pair with a new one
    Generate(ConfirmArgs),

    /// Erase the key pair from disk
    Clear(ConfirmArgs),

    /// Write both keys to a text file
    Export(KeysExportArgs),

    /// Replace the key pair with one from an exported file
    Import(KeysImportArgs),
}

/// Arguments for `keys show`
#[derive(Args)]
pub struct KeysShowArgs {
    /// Also print the private key
    #[arg(long)]
    pub private: bool,
}

/// Confirmation flag shared by destructive key commands
#[derive(Args)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `keys export`
#[derive(Args)]
pub struct KeysExportArgs {
    /// Destination file
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for `keys import`
#[derive(Args)]
pub struct KeysImportArgs {
    /// File containing a public and a private PEM block
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Message to encrypt (read from stdin when omitted)
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Write the QR code to a PNG file
    #[arg(short, long, value_name = "PNG")]
    pub out: Option<PathBuf>,

    /// Minimum edge length of the PNG, in pixels
    #[arg(long, value_name = "N")]
    pub size: Option<u32>,

    /// Do not draw the QR code in the terminal
    #[arg(long)]
    pub no_qr: bool,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Base64 payload (read from stdin when omitted)
    #[arg(value_name = "PAYLOAD")]
    pub payload: Option<String>,
}

/// Arguments for the `scan` command
#[derive(Args)]
pub struct ScanArgs {
    /// Image containing a QR code
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}

/// Arguments for the `watch` command
#[derive(Args)]
pub struct WatchArgs {
    /// Directory where snapshots appear
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Frames to examine before giving up
    #[arg(long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Pause between frames, in milliseconds
    #[arg(long, value_name = "N")]
    pub delay_ms: Option<u64>,

    /// Stop after this many seconds even if attempts remain
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
