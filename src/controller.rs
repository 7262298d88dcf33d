use clap::Subcommand;
use tracing::trace;

use colprof::domain::{Message, ProfileError};
use colprof::formatter::ValueFormat;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists profiles and columns of the active profile
    List,
    /// Renders the tour table with the active profile
    Show {
        /// Show this profile instead, it is not saved as active profile
        #[arg(long)]
        profile: Option<String>,
    },
    /// Activates a profile
    Switch { name: String },
    /// Shows all columns
    ShowAll,
    /// Shows the default columns
    ShowDefault,
    /// Hides a column
    Hide { id: String },
    /// Shows a column
    Unhide { id: String },
    /// Moves a column to another position
    Move { id: String, index: usize },
    /// Sets the width of a column
    Width { id: String, width: u32 },
    /// Sets the value format of a column, e.g. TIME_HH_MM
    Format {
        id: String,
        kind: String,
        /// Set the format of the detail view
        #[arg(long)]
        detail: bool,
    },
    /// Copies a profile
    Clone { name: String, new_name: String },
    /// Removes a profile
    Remove { name: String },
}

#[derive(Debug, PartialEq)]
pub enum Action {
    List,
    Show(Option<String>),
    /// Change the profiles and save them.
    Apply(Message),
}

pub fn handle_command(command: Command) -> Result<Action, ProfileError> {
    let action = match command {
        Command::List => Action::List,
        Command::Show { profile } => Action::Show(profile),
        Command::Switch { name } => Action::Apply(Message::SwitchProfile(name)),
        Command::ShowAll => Action::Apply(Message::ShowAllColumns),
        Command::ShowDefault => Action::Apply(Message::ShowDefaultColumns),
        Command::Hide { id } => Action::Apply(Message::HideColumn(id)),
        Command::Unhide { id } => Action::Apply(Message::ShowColumn(id)),
        Command::Move { id, index } => Action::Apply(Message::MoveColumn(id, index)),
        Command::Width { id, width } => Action::Apply(Message::ResizeColumn(id, width)),
        Command::Format { id, kind, detail } => {
            let format =
                ValueFormat::from_name(&kind).ok_or(ProfileError::UnknownFormat(kind))?;
            Action::Apply(Message::SetFormat {
                column_id: id,
                format,
                is_detail: detail,
            })
        }
        Command::Clone { name, new_name } => Action::Apply(Message::CloneProfile {
            source: name,
            name: new_name,
        }),
        Command::Remove { name } => Action::Apply(Message::RemoveProfile(name)),
    };
    trace!("Mapped: {action:?}");
    Ok(action)
}
