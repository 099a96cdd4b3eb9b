//! CLI entry point for `donorlens`.

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use donorlens::config::{self, Config};
use donorlens::diag::ParseLog;
use donorlens::i18n;
use donorlens::parser::account;
use donorlens::parser::browser;
use donorlens::parser::location;
use donorlens::report::{self, Section};
use donorlens::session::{process_chat_archive, ExtractOptions};

#[derive(Parser)]
#[command(name = "donorlens", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, nl). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,

    /// Print result sections as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract participant features from a chat export
    Chat {
        /// Chat export: ZIP archive or exported text file
        path: PathBuf,
        /// The donor's own username among the extracted senders
        #[arg(long)]
        donor: Option<String>,
        /// Anonymize participant names (the donor becomes "you")
        #[arg(long)]
        anonymize: bool,
    },
    /// Extract group and contact counts from an account info export
    Account {
        path: PathBuf,
    },
    /// Extract activity summaries from a semantic location history export
    Location {
        path: PathBuf,
    },
    /// Extract website visit summaries from a browser history export
    Browser {
        path: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap
/// processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--lang" {
            if let Some(code) = args.get(i + 1) {
                if let Some(lang) = i18n::Lang::from_code(code) {
                    return lang;
                }
            }
        }
        if let Some(code) = args[i].strip_prefix("--lang=") {
            if let Some(lang) = i18n::Lang::from_code(code) {
                return lang;
            }
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .mut_arg("verbose", |a| a.help(i18n::help_verbose()))
        .mut_arg("lang", |a| a.help(i18n::help_lang()));

    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let mut s = sub.clone();
            match s.get_name() {
                "chat" => s = s.about(i18n::help_cmd_chat()),
                "account" => s = s.about(i18n::help_cmd_account()),
                "location" => s = s.about(i18n::help_cmd_location()),
                "browser" => s = s.about(i18n::help_cmd_browser()),
                _ => {}
            }
            s
        })
        .collect();
    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }
    cmd
}

fn main() -> anyhow::Result<()> {
    let lang = detect_lang_early();
    i18n::set_lang(lang);

    let cmd = build_localized_command();
    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level);

    if let Some(code) = cli.lang.as_deref().or(config.general.lang.as_deref()) {
        if let Some(lang) = i18n::Lang::from_code(code) {
            i18n::set_lang(lang);
        }
    }

    match &cli.command {
        Commands::Chat {
            path,
            donor,
            anonymize,
        } => {
            let options = ExtractOptions {
                anonymize: *anonymize || config.general.anonymize,
            };
            let sections = process_chat_archive(path, donor.as_deref(), &options);
            print_sections(&sections, cli.json)
        }
        Commands::Account { path } => {
            let mut log = ParseLog::new();
            let sections = match account::extract_account(path, &mut log) {
                Ok(info) => vec![account::account_section(&info)],
                Err(err) => {
                    log.push(err.to_string());
                    Vec::new()
                }
            };
            print_sections(&report::finish_sections(sections, &log), cli.json)
        }
        Commands::Location { path } => {
            let mut log = ParseLog::new();
            let sections = match location::extract_location(path, &config.location, &mut log) {
                Ok(sections) => sections,
                Err(err) => {
                    log.push(err.to_string());
                    Vec::new()
                }
            };
            print_sections(&report::finish_sections(sections, &log), cli.json)
        }
        Commands::Browser { path } => {
            let mut log = ParseLog::new();
            let sections = match browser::extract_browser(path, &config.browser, &mut log) {
                Ok(sections) => sections,
                Err(err) => {
                    log.push(err.to_string());
                    Vec::new()
                }
            };
            print_sections(&report::finish_sections(sections, &log), cli.json)
        }
        Commands::Completions { shell } => cmd_completions(*shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output.
fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

/// Print sections as text tables or one JSON document.
fn print_sections(sections: &[Section], json: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, sections)?;
        writeln!(stdout)?;
        return Ok(());
    }
    for section in sections {
        writeln!(stdout, "{}", section.title)?;
        writeln!(stdout)?;
        write!(stdout, "{}", section.table.render_text())?;
        writeln!(stdout)?;
    }
    Ok(())
}

fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)?;
    std::io::stdout().write_all(&buffer)?;
    Ok(())
}
