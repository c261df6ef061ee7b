//! Group display formatting

use crate::models::Group;

use super::truncate;

/// Format groups as a table
pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found.\n".to_string();
    }

    let name_width = groups
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 30);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<10}  {:>7}  {}\n",
        "ID",
        "Name",
        "Category",
        "Members",
        "Currency",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<10}  {:->7}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for group in groups {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<10}  {:>7}  {}\n",
            group.id.short(),
            truncate(&group.name, name_width),
            group.category.to_string(),
            group.members.len(),
            group.currency(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a group with its roster
pub fn format_group_details(group: &Group) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:       {}\n", group.id));
    output.push_str(&format!("  Category: {}\n", group.category));
    output.push_str(&format!("  Currency: {}\n", group.currency()));
    output.push_str(&format!("  Owner:    {}\n", group.owner));
    if let Some(photo) = &group.photo {
        output.push_str(&format!("  Photo:    {}\n", photo));
    }
    output.push_str(&format!(
        "  Created:  {}\n",
        group.created_at.format("%Y-%m-%d %H:%M")
    ));

    output.push('\n');
    output.push_str(&format!("Members ({}):\n", group.members.len()));
    for member in group.members.iter() {
        if member.name == member.email.as_str() {
            output.push_str(&format!("  {} ({})\n", member.email, member.role));
        } else {
            output.push_str(&format!(
                "  {} <{}> ({})\n",
                member.name, member.email, member.role
            ));
        }
    }

    output
}
