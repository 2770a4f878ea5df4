use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use smart_channels::export::GenerationOutcome;
use smart_channels::kodi::KodiVideoSource;
use smart_channels::model::MatchSemantics;
use smart_channels::ui::{ChannelManager, TerminalPrompter};
use smart_channels::{AppContext, ChannelGenerator, Storage};
use std::io;

#[derive(Parser, Debug)]
#[command(name = "smart-channels")]
#[command(about = "Build round-robin TV channel playlists from Kodi smart playlists", long_about = None)]
struct Args {
    /// Kodi userdata directory [default: ~/.kodi/userdata]
    #[arg(long, global = true)]
    kodi_home: Option<String>,

    /// Add-on data directory [default: <kodi-home>/addon_data/script.smart.channels]
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Kodi video database [default: <kodi-home>/Database/MyVideos131.db]
    #[arg(long, global = true)]
    video_db: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add or edit a channel
    Manage,

    /// Add a channel
    Add,

    /// Edit a channel
    Edit,

    /// List channels
    List,

    /// Delete every channel and its M3U file
    DeleteAll,

    /// Regenerate channel playlists
    Generate {
        /// Channel numbers to regenerate
        numbers: Vec<String>,

        /// Regenerate every channel
        #[arg(long, conflicts_with = "numbers")]
        all: bool,
    },

    /// Show or change settings
    Settings {
        /// Maximum playlists per channel, also the M3U entry cap
        #[arg(long)]
        upper_limit: Option<usize>,

        /// Base seed for show shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// How `match="all"` playlists combine their rules
        #[arg(long = "match", value_enum)]
        match_semantics: Option<MatchArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MatchArg {
    Union,
    AsDeclared,
}

impl From<MatchArg> for MatchSemantics {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Union => MatchSemantics::Union,
            MatchArg::AsDeclared => MatchSemantics::AsDeclared,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let context = AppContext::resolve(
        args.kodi_home.as_deref(),
        args.data_dir.as_deref(),
        args.video_db.as_deref(),
    )?;
    let storage = context.storage();
    let generator = ChannelGenerator::new(
        &context.kodi,
        &storage,
        KodiVideoSource::new(context.video_db.clone()),
    );

    match args.command {
        Some(Command::List) => list_channels(&storage),
        Some(Command::Settings {
            upper_limit,
            seed,
            match_semantics,
        }) => update_settings(&storage, upper_limit, seed, match_semantics.map(Into::into))?,
        Some(Command::Generate { numbers, all }) => {
            let numbers = if all {
                storage
                    .load_channels()
                    .into_iter()
                    .map(|ch| ch.number)
                    .collect()
            } else {
                numbers
            };
            generate_channels(&generator, &numbers)?;
        }
        command => {
            let stdin = io::stdin();
            let prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
            let mut manager = ChannelManager::new(prompter, &storage, &context.kodi, generator);
            match command {
                Some(Command::Manage) => manager.manage(),
                Some(Command::Add) => {
                    if manager.add_channel().is_none() {
                        log::info!("Channel creation cancelled");
                    }
                }
                Some(Command::Edit) => manager.edit_channel(),
                Some(Command::DeleteAll) => {
                    manager.delete_all_channels();
                }
                _ => manager.main_menu(),
            }
        }
    }

    Ok(())
}

fn list_channels(storage: &Storage) {
    let channels = storage.load_channels();
    if channels.is_empty() {
        println!("No channels to display");
        return;
    }
    for channel in &channels {
        println!("{}", channel.summary());
    }
}

fn update_settings(
    storage: &Storage,
    upper_limit: Option<usize>,
    seed: Option<u64>,
    match_semantics: Option<MatchSemantics>,
) -> Result<()> {
    if upper_limit == Some(0) {
        bail!("--upper-limit must be a positive number");
    }

    let settings = if upper_limit.is_none() && seed.is_none() && match_semantics.is_none() {
        storage.load_settings()
    } else {
        storage.update_settings(|settings| {
            if let Some(limit) = upper_limit {
                settings.playlist_upper_limit = limit;
            }
            if let Some(seed) = seed {
                settings.shuffle_seed = seed;
            }
            if let Some(semantics) = match_semantics {
                settings.match_semantics = semantics;
            }
        })?
    };

    println!("playlist_upper_limit: {}", settings.playlist_upper_limit);
    println!("shuffle_seed: {}", settings.shuffle_seed);
    println!("match_semantics: {:?}", settings.match_semantics);
    Ok(())
}

fn generate_channels(
    generator: &ChannelGenerator<'_, KodiVideoSource>,
    numbers: &[String],
) -> Result<()> {
    if numbers.is_empty() {
        bail!("no channels to generate; pass channel numbers or --all");
    }

    log::info!("Generating {} channel(s)", numbers.len());
    let mut failures = 0;
    for (number, result) in generator.generate_all(numbers) {
        match result {
            Ok(outcome) => {
                if let GenerationOutcome::Written(report) = &outcome {
                    log::info!(
                        "Channel {}: {} entries, {} skipped, {} order mismatches",
                        report.channel,
                        report.entries,
                        report.skipped,
                        report.mismatches.len()
                    );
                }
                if !outcome.is_success() {
                    failures += 1;
                }
                println!("{}", outcome.message(&number));
            }
            Err(e) => {
                failures += 1;
                log::error!("Channel {}: {:#}", number, anyhow::Error::from(e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} channel(s) failed to generate", failures, numbers.len());
    }
    log::info!("All channels generated");
    Ok(())
}
