use crate::config::FavzConfig;
use crate::index::DisplayFavorite;
use crate::model::FavoriteRecord;
use crate::notify::Notice;
use crate::store::RecoveryReport;
use std::collections::BTreeMap;

pub mod add;
pub mod check;
pub mod config;
pub mod doctor;
pub mod grouped;
pub mod import;
pub mod list;
pub mod remove;

pub type CmdMessage = Notice;

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<FavoriteRecord>,
    pub listed: Vec<DisplayFavorite>,
    pub groups: BTreeMap<String, Vec<DisplayFavorite>>,
    pub counts: BTreeMap<String, usize>,
    pub is_favorite: Option<bool>,
    pub report: Option<RecoveryReport>,
    pub quarantined: Vec<String>,
    pub config: Option<FavzConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<FavoriteRecord>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, listed: Vec<DisplayFavorite>) -> Self {
        self.listed = listed;
        self
    }

    pub fn with_groups(mut self, groups: BTreeMap<String, Vec<DisplayFavorite>>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_config(mut self, config: FavzConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Put `notices` ahead of the command's own messages.
    pub fn prepend_messages(&mut self, notices: Vec<CmdMessage>) {
        if notices.is_empty() {
            return;
        }
        let own = std::mem::take(&mut self.messages);
        self.messages = notices;
        self.messages.extend(own);
    }
}
