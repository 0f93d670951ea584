//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// modlayer - game mod installer
///
/// Installs mod archives through their install wizards, optionally as a
/// reversible symlink overlay over the game's Data directory.
#[derive(Parser, Debug)]
#[command(
    name = "modlayer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installs game mod archives through their FOMOD wizards",
    long_about = "modlayer reads a mod archive's FOMOD wizard (fomod/ModuleConfig.xml), asks its \
                  questions and copies the chosen files into the game's Data directory. \
                  With --overlay the files are kept per package and symlinked into Data, \
                  so later packages can be inspected, verified and removed again.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  modlayer -d ~/Games/Skyrim/Data install SkyUI_5_2_SE.7z\n    \
                  modlayer -o ~/mods/overlay install SkyUI_5_2_SE.7z Loose.zip -x\n    \
                  modlayer list conflicts\n    \
                  modlayer remove SkyUI_5_2_SE"
)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Print debug logs on stderr
    #[arg(long = "log", short = 'v', visible_alias = "verbose", global = true)]
    pub verbose: bool,

    /// Do not display terminal colors/styles
    #[arg(long, global = true)]
    pub no_colors: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Directory options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Game Data directory (probed in Steam libraries when absent)
    #[arg(long, short = 'd', global = true, env = "MODLAYER_DATA", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Keep package files here and symlink them into Data
    #[arg(long, short = 'o', global = true, env = "MODLAYER_OVERLAY", value_name = "DIR")]
    pub overlay: Option<PathBuf>,

    /// Overlay ledger file (default: <DATA>/modlayer-overlay.xml)
    #[arg(long, global = true, env = "MODLAYER_LEDGER", value_name = "FILE")]
    pub ledger: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install mod archives
    Install(InstallArgs),

    /// List packages, conflicts, or verify the overlay
    List(ListArgs),

    /// Remove packages from the overlay, restoring older files
    Remove(RemoveArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install through the archive's wizard:\n    modlayer install SkyUI_5_2_SE.7z\n\n\
                  Extract loose files when there is no wizard:\n    modlayer install Loose.zip -x\n\n\
                  Enable new plugins in Plugins.txt:\n    modlayer install Mod.7z --auto-plugins\n\n\
                  Answer prompts from a script:\n    printf 'y\\n0\\n' | modlayer install Mod.zip --plain")]
pub struct InstallArgs {
    /// Archives to install, in order
    #[arg(required = true, value_name = "ARCHIVE")]
    pub archives: Vec<PathBuf>,

    /// Extract recognizable game files when an archive has no wizard
    #[arg(long, short = 'x')]
    pub data_ext: bool,

    /// Plugins.txt to update with installed plugins
    #[arg(long, short = 'p', env = "MODLAYER_PLUGINS", value_name = "FILE")]
    pub plugins: Option<PathBuf>,

    /// Look for Plugins.txt in the usual places
    #[arg(long)]
    pub auto_plugins: bool,

    /// Print the wizard document tree before running it
    #[arg(long)]
    pub xml_debug: bool,

    /// Use line prompts even on a terminal
    #[arg(long)]
    pub plain: bool,
}

/// What `list` shows
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Installed packages, oldest first
    #[default]
    Packages,
    /// Files provided by more than one package
    Conflicts,
    /// Check links and real files
    Verify,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed packages:\n    modlayer list\n\n\
                  Show overridden files:\n    modlayer list conflicts\n\n\
                  Check the overlay:\n    modlayer list verify")]
pub struct ListArgs {
    #[arg(value_enum, default_value_t = ListMode::Packages)]
    pub mode: ListMode,
}

/// Arguments for the remove command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a package:\n    modlayer remove SkyUI_5_2_SE\n\n\
                  Remove several:\n    modlayer remove A B")]
pub struct RemoveArgs {
    /// Package names as shown by `modlayer list`
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modlayer completions --shell bash > ~/.bash_completion.d/modlayer\n\n\
                  Generate zsh completions:\n    modlayer completions --shell zsh > ~/.zfunc/_modlayer")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: Shell,
}
