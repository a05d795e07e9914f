use serde::{Deserialize, Serialize};

/// A list of todos shown as a sidebar row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Icon name. Older stores kept a non-string value here; see
    /// `io::folder_store` for the migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: Option<&str>) -> Self {
        Folder {
            id: id.into(),
            name: name.into(),
            icon: icon.map(str::to_string),
        }
    }

    /// Terminal glyph for this folder's icon
    pub fn glyph(&self) -> &'static str {
        icon_glyph(self.icon.as_deref())
    }
}

/// Seed data: (id, name, icon)
pub const DEFAULT_FOLDERS: [(&str, &str, &str); 9] = [
    ("inbox", "Inbox", "InboxArrowDownIcon"),
    ("today", "Today", "StarIcon"),
    ("upcoming", "Upcoming", "CalendarDaysIcon"),
    ("anytime", "Anytime", "Squares2X2Icon"),
    ("someday", "Someday", "ArchiveBoxIcon"),
    ("logbook", "Logbook", "ClipboardDocumentCheckIcon"),
    ("life", "Life", "HomeIcon"),
    ("school", "school", "AcademicCapIcon"),
    ("work", "work", "BriefcaseIcon"),
];

/// Rows that cannot be swiped away unless configured otherwise
pub const DEFAULT_PERMANENT: [&str; 6] = ["inbox", "today", "upcoming", "anytime", "someday", "logbook"];

pub const INBOX_ID: &str = "inbox";

pub fn default_folders() -> Vec<Folder> {
    DEFAULT_FOLDERS
        .iter()
        .map(|(id, name, icon)| Folder::new(*id, *name, Some(icon)))
        .collect()
}

/// Icon of the default folder with the given display name.
pub fn default_icon_for(name: &str) -> Option<&'static str> {
    DEFAULT_FOLDERS
        .iter()
        .find(|(_, n, _)| *n == name)
        .map(|(_, _, icon)| *icon)
}

pub fn icon_glyph(icon: Option<&str>) -> &'static str {
    match icon {
        Some("InboxArrowDownIcon") => "📥",
        Some("StarIcon") => "★",
        Some("CalendarDaysIcon") => "📅",
        Some("Squares2X2Icon") => "▦",
        Some("ArchiveBoxIcon") => "🗄",
        Some("ClipboardDocumentCheckIcon") => "✔",
        Some("HomeIcon") => "⌂",
        Some("AcademicCapIcon") => "🎓",
        Some("BriefcaseIcon") => "💼",
        Some("ListBulletIcon") => "☰",
        _ => "▸",
    }
}

/// Sidebar grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarSection {
    Main,
    Areas,
    Other,
}

impl SidebarSection {
    pub fn of(folder_id: &str) -> SidebarSection {
        match folder_id {
            "inbox" | "today" | "upcoming" | "anytime" | "someday" => SidebarSection::Main,
            "logbook" | "life" | "school" | "work" => SidebarSection::Areas,
            _ => SidebarSection::Other,
        }
    }
}
