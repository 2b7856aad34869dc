use serde::{Deserialize, Serialize};

/// One user edit dispatched from a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditIntent {
    /// Cell edit in a pivot grid; `value` is raw user text.
    SetCell {
        member: String,
        theme: String,
        month: String,
        value: String,
    },
    RenameTheme {
        old_name: String,
        new_name: String,
    },
    RenameMember {
        old_name: String,
        new_name: String,
    },
    AddTheme,
    AddMember,
    DeleteTheme {
        index: usize,
    },
    DeleteMember {
        index: usize,
    },
    SetThemeDescription {
        index: usize,
        description: String,
    },
    SetMemberDescription {
        index: usize,
        description: String,
    },
    /// Rate edit; `rate` is raw user text.
    SetMemberRate {
        index: usize,
        rate: String,
    },
    /// Source tab edit; replaces the whole document text.
    ReplaceSource {
        text: String,
    },
}

impl EditIntent {
    /// Stable label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetCell { .. } => "set_cell",
            Self::RenameTheme { .. } => "rename_theme",
            Self::RenameMember { .. } => "rename_member",
            Self::AddTheme => "add_theme",
            Self::AddMember => "add_member",
            Self::DeleteTheme { .. } => "delete_theme",
            Self::DeleteMember { .. } => "delete_member",
            Self::SetThemeDescription { .. } => "set_theme_description",
            Self::SetMemberDescription { .. } => "set_member_description",
            Self::SetMemberRate { .. } => "set_member_rate",
            Self::ReplaceSource { .. } => "replace_source",
        }
    }
}
