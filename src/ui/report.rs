//! Plain-text rendering of store snapshots for the CLI.

use crate::{
    domain::{
        list_entry::{ListEntry, ListType},
        message::Message,
    },
    usecases::filtered_chats::FilteredChatsOutput,
};

const PREVIEW_CHARS: usize = 60;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Normal lists first, then a "-- Bulk --" section, each in store order.
pub fn list_lines(lists: &[ListEntry]) -> Vec<String> {
    if lists.is_empty() {
        return vec!["No lists yet.".to_owned()];
    }

    let mut lines = Vec::new();
    for list in lists.iter().filter(|l| l.list_type == ListType::Normal) {
        push_list(&mut lines, list);
    }

    let mut bulk = lists
        .iter()
        .filter(|l| l.list_type == ListType::Bulk)
        .peekable();
    if bulk.peek().is_some() {
        lines.push("-- Bulk --".to_owned());
        for list in bulk {
            push_list(&mut lines, list);
        }
    }

    lines
}

fn push_list(lines: &mut Vec<String>, list: &ListEntry) {
    let mut header = format!("{}  {} ({} members)", list.id, list.name, list.members.len());
    if let Some(color) = list.color.as_deref() {
        header.push_str(&format!(" [{color}]"));
    }
    lines.push(header);

    if let Some(description) = list.description.as_deref() {
        lines.push(format!("    {description}"));
    }
    for member in &list.members {
        lines.push(format!("    - {} ({})", member.display_name(), member.id));
    }
    lines.push(format!(
        "    updated {}",
        list.updated_at.format(TIMESTAMP_FORMAT)
    ));
}

pub fn starred_lines(messages: &[Message]) -> Vec<String> {
    if messages.is_empty() {
        return vec!["No starred messages.".to_owned()];
    }

    messages
        .iter()
        .map(|message| {
            let sent = message
                .sent_at
                .map(|at| format!("{} ", at.format(TIMESTAMP_FORMAT)))
                .unwrap_or_default();
            format!("{}  {sent}{}", message.id, message.preview(PREVIEW_CHARS))
        })
        .collect()
}

pub fn chat_lines(output: &FilteredChatsOutput) -> Vec<String> {
    let mut lines = Vec::with_capacity(output.chats.len() + 1);

    match (&output.applied_list, output.fell_back) {
        (Some(name), _) => lines.push(format!("-- {name} ({} chats) --", output.chats.len())),
        (None, true) => lines.push("-- List not found, showing all chats --".to_owned()),
        (None, false) => lines.push(format!("-- All chats ({}) --", output.chats.len())),
    }

    lines.extend(
        output
            .chats
            .iter()
            .map(|chat| format!("{}  {}", chat.id, chat.display_title())),
    );
    lines
}
