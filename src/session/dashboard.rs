use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Tracks,
    Playlists,
    Activity,
    Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub order: u32,
    pub visible: bool,
}

impl DashboardSection {
    fn new(id: &str, title: &str, kind: SectionKind, order: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            order,
            visible: true,
        }
    }
}

/// Named, ordered, hideable blocks of a profile page.
///
/// Only `sections` is persisted; edit mode always starts off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub sections: BTreeMap<String, DashboardSection>,
    #[serde(skip)]
    pub edit_mode: bool,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        let sections = [
            DashboardSection::new("tracks", "Popular Tracks", SectionKind::Tracks, 0),
            DashboardSection::new("playlists", "Your Playlists", SectionKind::Playlists, 1),
            DashboardSection::new("activity", "Recent Activity", SectionKind::Activity, 2),
            DashboardSection::new("stats", "Statistics", SectionKind::Stats, 3),
        ]
        .into_iter()
        .map(|section| (section.id.clone(), section))
        .collect();

        Self {
            sections,
            edit_mode: false,
        }
    }
}

impl DashboardLayout {
    pub fn section(&self, id: &str) -> Option<&DashboardSection> {
        self.sections.get(id)
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    /// Returns `false` if no section has this id.
    pub fn set_section_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.sections.get_mut(id) {
            Some(section) => {
                section.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Returns `false` for unknown ids and blank titles.
    pub fn rename_section(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.sections.get_mut(id) {
            Some(section) => {
                section.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Listed sections take their position as order; unknown and repeated
    /// ids are skipped. Unlisted sections follow in their previous order.
    pub fn reorder<S: AsRef<str>>(&mut self, ordered_ids: &[S]) {
        let mut sequence: Vec<String> = Vec::with_capacity(self.sections.len());
        for id in ordered_ids {
            let id = id.as_ref();
            if self.sections.contains_key(id) && !sequence.iter().any(|seen| seen == id) {
                sequence.push(id.to_string());
            }
        }
        let remaining: Vec<String> = self
            .ordered()
            .into_iter()
            .map(|section| section.id.clone())
            .filter(|id| !sequence.contains(id))
            .collect();
        sequence.extend(remaining);

        for (position, id) in sequence.iter().enumerate() {
            if let Some(section) = self.sections.get_mut(id) {
                section.order = u32::try_from(position).unwrap_or(u32::MAX);
            }
        }
    }

    /// Sections sorted by `order`, ties broken by id.
    pub fn ordered(&self) -> Vec<&DashboardSection> {
        let mut sections: Vec<&DashboardSection> = self.sections.values().collect();
        sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        sections
    }

    pub fn visible(&self) -> Vec<&DashboardSection> {
        self.ordered()
            .into_iter()
            .filter(|section| section.visible)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
