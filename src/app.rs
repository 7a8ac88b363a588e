use std::io::{self, Write};

use anyhow::Result;

use crate::{
    cli::{Cli, Command, ListsCommand, StarredCommand},
    domain::{
        chat_filter::ListSelection,
        list_entry::{ListPatch, NewList},
        user::User,
    },
    infra::{
        contracts::{ContactSource, MessageSource},
        error::AppError,
    },
    ui::report,
    usecases::{
        bootstrap::{self, StorageMode},
        context::AppContext,
        filtered_chats::{filtered_chats, FilteredChatsQuery},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    let mode = if cli.ephemeral {
        StorageMode::Ephemeral
    } else {
        StorageMode::Persistent
    };
    let context = bootstrap::bootstrap(cli.config.as_deref(), mode)?;

    tracing::debug!(
        store_dir = %context.layout.store_dir.display(),
        lists_key = %context.config.storage.lists_key,
        starred_key = %context.config.storage.starred_key,
        file_logging = context.has_file_logging(),
        "context resolved"
    );

    let mut stdout = io::stdout().lock();
    match execute(&context, cli.command_or_default(), &mut stdout) {
        Ok(()) => Ok(()),
        Err(AppError::Store(error)) => {
            tracing::error!(error = ?error, "store operation failed");
            Err(anyhow::anyhow!(error.user_message()))
        }
        Err(error) => Err(error.into()),
    }
}

pub(crate) fn execute(
    context: &AppContext,
    command: Command,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match command {
        Command::Lists(command) => execute_lists(context, command, out),
        Command::Starred(command) => execute_starred(context, command, out),
        Command::Chats { list } => {
            let query = FilteredChatsQuery {
                selection: ListSelection::parse(list.as_deref()),
            };
            let output = filtered_chats(&context.directory, &context.lists.lists(), &query);
            write_lines(out, report::chat_lines(&output))
        }
    }
}

fn execute_lists(
    context: &AppContext,
    command: ListsCommand,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let lists = &context.lists;

    match command {
        ListsCommand::Show => write_lines(out, report::list_lines(&lists.lists())),
        ListsCommand::Create {
            name,
            members,
            description,
            color,
            list_type,
        } => {
            require_name(&name)?;
            if members.is_empty() {
                return Err(AppError::InvalidInput {
                    details: "a list needs at least one member".to_owned(),
                });
            }
            let members = resolve_contacts(&context.directory, &members)?;
            let created = lists.create_list(NewList {
                name,
                members,
                description,
                color,
                list_type: list_type.unwrap_or_default(),
            })?;
            writeln!(out, "Created list {} ({})", created.name, created.id)?;
            Ok(())
        }
        ListsCommand::Update {
            id,
            name,
            description,
            color,
            list_type,
        } => {
            if let Some(name) = &name {
                require_name(name)?;
            }
            let patch = ListPatch {
                name,
                description,
                color,
                list_type,
                members: None,
            };
            if patch.is_empty() {
                writeln!(out, "Nothing to update.")?;
                return Ok(());
            }
            let updated = lists.update_list(&id, patch)?;
            writeln!(out, "Updated list {} ({})", updated.name, updated.id)?;
            Ok(())
        }
        ListsCommand::Delete { id } => {
            let removed = lists.delete_list(&id)?;
            writeln!(out, "Deleted list {} ({})", removed.name, removed.id)?;
            Ok(())
        }
        ListsCommand::AddMembers { id, members } => {
            let members = resolve_contacts(&context.directory, &members)?;
            let added = lists.add_members(&id, members)?;
            writeln!(out, "Added {added} member(s) to {id}")?;
            Ok(())
        }
        ListsCommand::RemoveMembers { id, members } => {
            let removed = lists.remove_members(&id, &members)?;
            writeln!(out, "Removed {removed} member(s) from {id}")?;
            Ok(())
        }
        ListsCommand::Reorder { ids } => {
            lists.reorder_lists(&ids)?;
            write_lines(out, report::list_lines(&lists.lists()))
        }
        ListsCommand::Clear => {
            lists.clear_lists()?;
            writeln!(out, "All lists removed.")?;
            Ok(())
        }
    }
}

fn execute_starred(
    context: &AppContext,
    command: StarredCommand,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let starred = &context.starred;

    match command {
        StarredCommand::Show => write_lines(out, report::starred_lines(&starred.messages())),
        StarredCommand::Add { message_id } => {
            let message = context
                .directory
                .message(&message_id)
                .cloned()
                .ok_or_else(|| AppError::UnknownMessage {
                    id: message_id.clone(),
                })?;
            if starred.add(message)? {
                writeln!(out, "Starred {message_id}")?;
            } else {
                writeln!(out, "{message_id} is already starred")?;
            }
            Ok(())
        }
        StarredCommand::Remove { message_id } => {
            starred.remove(&message_id)?;
            writeln!(out, "Unstarred {message_id}")?;
            Ok(())
        }
        StarredCommand::Clear => {
            starred.clear()?;
            writeln!(out, "All starred messages removed.")?;
            Ok(())
        }
    }
}

fn require_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput {
            details: "list name must not be blank".to_owned(),
        });
    }
    Ok(())
}

/// Copies contact records so later directory edits do not reach the list.
fn resolve_contacts(directory: &dyn ContactSource, ids: &[String]) -> Result<Vec<User>, AppError> {
    ids.iter()
        .map(|id| {
            directory
                .contact(id)
                .cloned()
                .ok_or_else(|| AppError::UnknownContact { id: id.clone() })
        })
        .collect()
}

fn write_lines(out: &mut impl Write, lines: Vec<String>) -> Result<(), AppError> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
