mod console;

use blackjack_roi::{
    calculate_advantage_report, DecisionEvaluator, HandState, PeekState, Rank, Rule,
};
use blackjack_roi_drivers::{parse_config_from_file, Config, ConfigError};
use clap::{Parser, Subcommand};
use console::{print_options, ConsolePrinter};
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_roi.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the best play for every opening deal and the player advantage
    Report,

    /// Rank the options for one hand
    Advise {
        /// The dealer's up card, e.g. A or T
        #[arg(short, long)]
        dealer: Rank,

        /// The player's cards, e.g. 8 8
        #[arg(required = true, num_args = 1..)]
        player: Vec<Rank>,

        /// How many splits produced this hand
        #[arg(long, default_value_t = 0)]
        split_level: u8,

        /// The dealer has checked the hole card and has no blackjack
        #[arg(long)]
        peeked: bool,

        /// Other cards already out of the shoe
        #[arg(long, num_args = 1..)]
        seen: Vec<Rank>,
    },
}

fn load_config(path: &str) -> Result<Config, ConfigError> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    let Some(home_dir) = home::home_dir() else {
        log::warn!("cannot find the home directory, using the default rules");
        return Ok(Config::default());
    };
    let config_file_path = home_dir.join(".blackjack_roi.yml");
    if !config_file_path.is_file() {
        log::info!(
            "{} not found, using the default rules",
            config_file_path.display()
        );
        return Ok(Config::default());
    }
    parse_config_from_file(&config_file_path.to_string_lossy())
}

fn run(args: CommandLineArgs) -> Result<(), ConfigError> {
    let config = load_config(&args.config)?;
    log::debug!("{:#?}", config);
    let mut shoe = config.shoe.build()?;
    let rule: Rule = config.rule.try_into()?;

    match args.command {
        Command::Report => {
            calculate_advantage_report(&rule, &shoe, &mut ConsolePrinter)?;
        }
        Command::Advise {
            dealer,
            player,
            split_level,
            peeked,
            seen,
        } => {
            for &rank in player.iter().chain(&seen).chain([&dealer]) {
                shoe.deal(rank)?;
            }
            let hand = HandState::from_ranks(&player).with_split_level(split_level)?;
            let peek = if peeked {
                PeekState::confirm(dealer)?
            } else {
                PeekState::Unknown
            };
            let mut evaluator = DecisionEvaluator::new(&rule, shoe, hand, dealer, peek)?;
            print_options("Side decision:", &evaluator.side_options()?);
            print_options("Play:", &evaluator.play_options()?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandLineArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
