use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::list_entry::ListType;

#[derive(Debug, Parser)]
#[command(
    name = "chatlists",
    about = "Local contact lists, starred messages and list-filtered chats"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep lists and starred messages in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage contact lists
    #[command(subcommand)]
    Lists(ListsCommand),
    /// Manage starred messages
    #[command(subcommand)]
    Starred(StarredCommand),
    /// Show chats, optionally filtered by a list
    Chats {
        /// List id, or `all`
        #[arg(long)]
        list: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListsCommand {
    /// Print all lists in display order
    Show,
    /// Create a list from contact ids
    Create {
        #[arg(long)]
        name: String,
        /// Contact id; repeat for several members
        #[arg(long = "member", required = true)]
        members: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// normal or bulk
        #[arg(long = "type")]
        list_type: Option<ListType>,
    },
    /// Change name, description, color or type
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long = "type")]
        list_type: Option<ListType>,
    },
    Delete {
        id: String,
    },
    AddMembers {
        id: String,
        #[arg(long = "member", required = true)]
        members: Vec<String>,
    },
    RemoveMembers {
        id: String,
        #[arg(long = "member", required = true)]
        members: Vec<String>,
    },
    /// Move lists to the front in the given order; unnamed lists follow
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every list
    Clear,
}

#[derive(Debug, Clone, Subcommand)]
pub enum StarredCommand {
    Show,
    Add { message_id: String },
    Remove { message_id: String },
    Clear,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chats { list: None })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults_to_unfiltered_chats_when_command_is_missing() {
        let cli = Cli::parse_from(["chatlists"]);

        assert!(matches!(cli.command_or_default(), Command::Chats { list: None }));
        assert!(!cli.ephemeral);
    }

    #[test]
    fn parses_list_creation_with_repeated_members() {
        let cli = Cli::parse_from([
            "chatlists",
            "lists",
            "create",
            "--name",
            "Work",
            "--member",
            "u1",
            "--member",
            "u2",
            "--type",
            "bulk",
            "--config",
            "custom.toml",
        ]);

        match cli.command_or_default() {
            Command::Lists(ListsCommand::Create {
                name,
                members,
                list_type,
                ..
            }) => {
                assert_eq!(name, "Work");
                assert_eq!(members, ["u1", "u2"]);
                assert_eq!(list_type, Some(ListType::Bulk));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
    }

    #[test]
    fn rejects_unknown_list_type() {
        let result = Cli::try_parse_from([
            "chatlists", "lists", "create", "--name", "Work", "--member", "u1", "--type",
            "vip",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn create_requires_at_least_one_member() {
        let result = Cli::try_parse_from(["chatlists", "lists", "create", "--name", "Work"]);

        assert!(result.is_err());
    }

    #[test]
    fn reorder_requires_at_least_one_id() {
        assert!(Cli::try_parse_from(["chatlists", "lists", "reorder"]).is_err());
    }

    #[test]
    fn parses_chat_filter_and_global_ephemeral_flag() {
        let cli = Cli::parse_from(["chatlists", "chats", "--list", "abc", "--ephemeral"]);

        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command_or_default(),
            Command::Chats { list: Some(ref id) } if id == "abc"
        ));
    }
}
