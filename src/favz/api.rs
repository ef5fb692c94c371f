//! # API Facade
//!
//! A thin layer over `commands/*.rs`. Every UI goes through [`FavzApi`]:
//!
//! - it parses raw selector strings into [`FavSelector`]s,
//! - it dispatches to the command function,
//! - it folds notifications raised by the store during the call into the
//!   returned [`CmdResult`], ahead of the command's own messages.
//!
//! It does no printing. `FavzApi<FsBackend>` is what the CLI runs;
//! tests use `FavzApi<MemBackend, ManualClock>`.

use crate::clock::{Clock, SystemClock};
use crate::commands;
use crate::error::{FavzError, Result};
use crate::identity::generate_id;
use crate::index::FavSelector;
use crate::model::Book;
use crate::notify::NoticeLog;
use crate::store::{FavoritesStore, StorageMedium};
use std::path::{Path, PathBuf};

pub struct FavzApi<M: StorageMedium, C: Clock = SystemClock> {
    store: FavoritesStore<M, C>,
    notices: NoticeLog,
    config_dir: PathBuf,
}

impl<M: StorageMedium, C: Clock> FavzApi<M, C> {
    /// Wrap `store`, replacing its notifier with one the API drains.
    pub fn new(store: FavoritesStore<M, C>, config_dir: impl Into<PathBuf>) -> Self {
        let notices = NoticeLog::new();
        Self {
            store: store.with_notifier(notices.clone()),
            notices,
            config_dir: config_dir.into(),
        }
    }

    pub fn add(&mut self, book: &Book) -> Result<commands::CmdResult> {
        let result = commands::add::run(&mut self.store, book);
        self.finish(result)
    }

    pub fn remove<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let result = commands::remove::run(&mut self.store, &selectors);
        self.finish(result)
    }

    pub fn list(&mut self) -> Result<commands::CmdResult> {
        let result = commands::list::run(&mut self.store);
        self.finish(result)
    }

    pub fn grouped(&mut self) -> Result<commands::CmdResult> {
        let result = commands::grouped::run(&mut self.store);
        self.finish(result)
    }

    pub fn check(&mut self, title: &str, author: &str) -> Result<commands::CmdResult> {
        let result = commands::check::run(&mut self.store, title, author);
        self.finish(result)
    }

    pub fn import(&mut self, paths: Vec<PathBuf>) -> Result<commands::CmdResult> {
        let result = commands::import::run(&mut self.store, paths);
        self.finish(result)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        let result = commands::doctor::run(&mut self.store);
        self.finish(result)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    /// The id a book with this title and author would be stored under.
    pub fn id_for(&self, title: &str, author: &str) -> String {
        generate_id(title, author)
    }

    pub fn store(&self) -> &FavoritesStore<M, C> {
        &self.store
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn finish(&self, result: Result<commands::CmdResult>) -> Result<commands::CmdResult> {
        let notices = self.notices.drain();
        let mut result = result?;
        result.prepend_messages(notices);
        Ok(result)
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<FavSelector>> {
    if inputs.is_empty() {
        return Err(FavzError::Api("No favorites selected".to_string()));
    }
    inputs
        .iter()
        .map(|s| s.as_ref().parse::<FavSelector>().map_err(FavzError::Api))
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::Severity;
    use crate::store::mem_backend::MemBackend;
    use tempfile::TempDir;

    fn api_with(mem: MemBackend) -> (FavzApi<MemBackend, ManualClock>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FavoritesStore::new(mem, ManualClock::new(1_000));
        (FavzApi::new(store, dir.path()), dir)
    }

    #[test]
    fn remove_parses_indexes_and_ids() {
        let (mut api, _dir) = api_with(MemBackend::new());
        api.add(&Book::new("T", "A")).unwrap();
        api.add(&Book::new("U", "B")).unwrap();

        let id = api.id_for("U", "B");
        let result = api.remove(&["1", id.as_str()]).unwrap();
        assert_eq!(result.affected.len(), 2);
        assert!(api.list().unwrap().listed.is_empty());
    }

    #[test]
    fn remove_rejects_bad_selectors() {
        let (mut api, _dir) = api_with(MemBackend::new());
        assert!(api.remove(&["0"]).is_err());
        assert!(api.remove::<&str>(&[]).is_err());
    }

    #[test]
    fn store_notices_come_before_command_messages() {
        let mem = MemBackend::new().with_item("bookFavorites", "nonsense");
        let (mut api, _dir) = api_with(mem);

        let result = api.list().unwrap();
        assert_eq!(result.messages[0].severity, Severity::Error);
        assert!(result.messages[0].message.contains("bookFavorites_backup_1000"));
        assert_eq!(result.messages.last().unwrap().message, "No favorites yet.");

        let again = api.list().unwrap();
        assert_eq!(again.messages.len(), 1);
    }

    #[test]
    fn config_uses_config_dir() {
        let (api, dir) = api_with(MemBackend::new());
        api.config(ConfigAction::Set("other-label".into(), "Misc".into()))
            .unwrap();
        assert!(dir.path().join("config.json").exists());
    }
}
