use crate::prelude::*;
use clap::Parser;

mod body;
mod error;
mod mf2;
mod micropub;
mod prelude;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Decode, encode and publish microformats2 entries against a local Micropub store"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the site; minted post URLs start with it
    #[clap(long, env = "LILAC_ME", global = true)]
    me: Option<String>,

    /// Directory holding the post store
    #[clap(long, env = "LILAC_STORE", global = true, default_value = ".lilac")]
    store: std::path::PathBuf,

    /// Media endpoint reported by the config query
    #[clap(long, env = "LILAC_MEDIA_ENDPOINT", global = true)]
    media_endpoint: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "LILAC_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert an mf2 JSON or form body to Jf2
    Decode(crate::mf2::DecodeOptions),

    /// Convert a Jf2 entry to mf2 JSON
    Encode(crate::mf2::EncodeOptions),

    /// Create, update or delete a post from a Micropub request body
    Micropub(crate::micropub::PublishOptions),

    /// Print the source of a stored post (q=source)
    Source(crate::micropub::SourceOptions),

    /// Print the Micropub configuration (q=config)
    Config,

    /// List stored posts
    List(crate::micropub::ListOptions),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Decode(options) => crate::mf2::decode(options),
        SubCommands::Encode(options) => crate::mf2::encode(options),
        SubCommands::Micropub(options) => crate::micropub::publish(options, app.global),
        SubCommands::Source(options) => crate::micropub::source(options, app.global),
        SubCommands::Config => crate::micropub::config(app.global),
        SubCommands::List(options) => crate::micropub::list(options, app.global),
    }
}
