use crate::commands::{CmdMessage, CmdResult};
use crate::config::FavzConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = FavzConfig::load(dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => {
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            config.save(dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            Ok(result.with_config(config))
        }
    }
}
