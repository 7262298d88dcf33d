use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod tourbook;
mod ui;

use colprof::{ColumnManager, ManagerConfig, ProfileError, formatter, store};
use controller::{Action, Command};
use ui::TableUI;

/// Rows of the rendered table: header plus tours.
const VIEW_HEIGHT: u16 = 8;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// File with the saved column profiles, `~` and environment variables are expanded
    state_file: String,

    /// Width of the rendered table
    #[arg(long, default_value_t = 100)]
    view: u16,

    /// Log debug messages to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(ErrorLayer::default())
        .init();
}

fn state_path(path: &str) -> Result<PathBuf, ProfileError> {
    let expanded = shellexpand::full(path)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn run(cli: Cli) -> Result<(), ProfileError> {
    let path = state_path(&cli.state_file)?;
    debug!("Column profiles in {}", path.display());

    let config = ManagerConfig::default().is_category_available(true);
    let profiles = store::load_file(&path, &config.default_profile_name)?;
    let mut manager =
        ColumnManager::from_profile_set(TableUI::new(tourbook::sample_tours()), config, profiles);
    for definition in tourbook::columns() {
        manager.add_column(definition)?;
    }
    manager.create_columns();

    match controller::handle_command(cli.command)? {
        Action::List => print_profiles(&manager),
        Action::Show(profile) => {
            if let Some(name) = profile {
                manager.switch_profile_by_name(&name)?;
            }
            print_table(&manager, cli.view);
        }
        Action::Apply(message) => {
            if !manager.update(message)? {
                warn!("Nothing was changed");
            }
            let state = manager.save_state()?;
            store::save_file(&path, &state)?;
            print_table(&manager, cli.view);
        }
    }

    Ok(())
}

fn print_profiles(manager: &ColumnManager<TableUI>) {
    for entry in manager.profiles_sorted() {
        let marker = if entry.is_active { "*" } else { " " };
        println!("{marker} {}", entry.menu_text());
    }
    println!();

    for item in manager.rearranged_columns() {
        let marker = if item.is_checked { "x" } else { " " };
        let formats: Vec<&str> = item
            .definition
            .available_formats
            .iter()
            .map(|&f| formatter::display_name(f))
            .collect();
        println!(
            "[{marker}] {:<12} {:>4}  {}  {}",
            item.definition.id(),
            item.width,
            manager.column_label(&item.definition, true),
            formats.join(" | ")
        );
    }
}

fn print_table(manager: &ColumnManager<TableUI>, width: u16) {
    println!("{}", manager.active_profile().name);
    for line in manager.host().render_lines(width, VIEW_HEIGHT) {
        if !line.is_empty() {
            println!("{line}");
        }
    }
}
