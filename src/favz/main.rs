use chrono::{TimeZone, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use favz::api::{CmdMessage, ConfigAction, FavzApi};
use favz::config::FavzConfig;
use favz::error::{FavzError, Result};
use favz::index::DisplayFavorite;
use favz::model::Book;
use favz::notify::Severity;
use favz::store::fs_backend::FsBackend;
use favz::store::FavoritesStore;
use serde_json::json;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "FAVZ_HOME";
const LOG_ENV: &str = "FAVZ_LOG";
const STORAGE_DIR: &str = "storage";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct AppContext {
    api: FavzApi<FsBackend>,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Add {
            title,
            author,
            reason,
            category,
            subcategory,
        }) => {
            let book = Book {
                title,
                author,
                reason,
                category,
                subcategory,
            };
            handle_add(&mut ctx, &book)
        }
        Some(Commands::Remove { selectors }) => handle_remove(&mut ctx, &selectors),
        Some(Commands::List { json }) => handle_list(&mut ctx, json),
        Some(Commands::Grouped { json }) => handle_grouped(&mut ctx, json),
        Some(Commands::Check {
            title,
            author,
            json,
        }) => handle_check(&mut ctx, &title, &author, json),
        Some(Commands::Id { title, author }) => {
            println!("{}", ctx.api.id_for(&title, &author));
            Ok(())
        }
        Some(Commands::Import { paths }) => handle_import(&mut ctx, paths),
        Some(Commands::Doctor { json }) => handle_doctor(&mut ctx, json),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&mut ctx, false),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "favz", "favz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FavzError::Unavailable("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = FavzConfig::load(&data_dir)?;

    let mut backend = FsBackend::new(data_dir.join(STORAGE_DIR));
    if let Some(quota) = config.quota() {
        backend = backend.with_quota(quota);
    }

    let store = FavoritesStore::with_medium(backend)
        .with_key(config.storage_key.clone())?
        .with_other_label(config.other_label.clone());

    Ok(AppContext {
        api: FavzApi::new(store, data_dir),
    })
}

fn handle_add(ctx: &mut AppContext, book: &Book) -> Result<()> {
    let result = ctx.api.add(book)?;
    print_messages(&result.messages, false);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, selectors: &[String]) -> Result<()> {
    let result = ctx.api.remove(selectors)?;
    print_messages(&result.messages, false);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, as_json: bool) -> Result<()> {
    let result = ctx.api.list()?;
    if as_json {
        print_json(&result.listed)?;
    } else {
        print_favorites(&result.listed);
    }
    print_messages(&result.messages, as_json);
    Ok(())
}

fn handle_grouped(ctx: &mut AppContext, as_json: bool) -> Result<()> {
    let result = ctx.api.grouped()?;
    if as_json {
        print_json(&result.groups)?;
    } else {
        print_groups(&result.groups);
    }
    print_messages(&result.messages, as_json);
    Ok(())
}

fn handle_check(
    ctx: &mut AppContext,
    title: &str,
    author: &str,
    as_json: bool,
) -> Result<()> {
    let result = ctx.api.check(title, author)?;
    if as_json {
        print_json(&json!({
            "id": ctx.api.id_for(title, author),
            "is_favorite": result.is_favorite.unwrap_or(false),
        }))?;
        print_messages(
            &result
                .messages
                .iter()
                .filter(|m| m.severity != Severity::Success && m.severity != Severity::Info)
                .cloned()
                .collect::<Vec<_>>(),
            true,
        );
    } else {
        print_messages(&result.messages, false);
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, paths: Vec<PathBuf>) -> Result<()> {
    let result = ctx.api.import(paths)?;
    print_messages(&result.messages, false);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext, as_json: bool) -> Result<()> {
    let result = ctx.api.doctor()?;
    if as_json {
        print_json(&json!({
            "report": result.report,
            "categories": result.counts,
            "quarantined": result.quarantined,
        }))?;
        print_messages(&result.messages, true);
        return Ok(());
    }

    print_messages(&result.messages, false);
    if !result.counts.is_empty() {
        println!();
        let width = result.counts.keys().map(|k| k.width()).max().unwrap_or(0);
        for (category, count) in &result.counts {
            let pad = width.saturating_sub(category.width());
            println!("  {}{}  {}", category, " ".repeat(pad), count);
        }
    }
    if !result.quarantined.is_empty() {
        println!();
        println!("{}", "Quarantined data:".yellow());
        for key in &result.quarantined {
            println!("  {}", key);
        }
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        for key in favz::config::CONFIG_KEYS {
            if let Some(val) = config.get(key) {
                println!("{} = {}", key, val);
            }
        }
    }
    print_messages(&result.messages, false);
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(FavzError::Serialization)?;
    println!("{}", out);
    Ok(())
}

/// Messages go to stderr when stdout carries JSON.
fn print_messages(messages: &[CmdMessage], to_stderr: bool) {
    for message in messages {
        let line = match message.severity {
            Severity::Info => message.message.dimmed(),
            Severity::Success => message.message.green(),
            Severity::Warning => message.message.yellow(),
            Severity::Error => message.message.red(),
        };
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_favorites(favorites: &[DisplayFavorite]) {
    let idx_width = favorites
        .iter()
        .map(|df| format!("{}. ", df.index).width())
        .max()
        .unwrap_or(0);

    for df in favorites {
        print_favorite_line(df, idx_width, true);
    }
}

fn print_groups(groups: &BTreeMap<String, Vec<DisplayFavorite>>) {
    let idx_width = groups
        .values()
        .flatten()
        .map(|df| format!("{}. ", df.index).width())
        .max()
        .unwrap_or(0);

    for (i, (category, favorites)) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", category.bold(), format!("({})", favorites.len()).dimmed());
        for df in favorites {
            print_favorite_line(df, idx_width, false);
        }
    }
}

fn print_favorite_line(df: &DisplayFavorite, idx_width: usize, show_category: bool) {
    let record = &df.record;
    let idx_str = format!("{}. ", df.index);
    let idx_padded = format!("{}{}", " ".repeat(idx_width.saturating_sub(idx_str.width())), idx_str);

    let mut text = format!("{} · {}", record.title, record.author);
    if show_category && !record.category.is_empty() {
        text.push_str(&format!(" [{}]", record.category));
    }

    let left_prefix = "  ";
    let fixed_width = left_prefix.width() + idx_padded.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let text_display = truncate_to_width(&text, available);
    let padding = available.saturating_sub(text_display.width());

    println!(
        "{}{}{}{}{}",
        left_prefix,
        idx_padded.yellow(),
        text_display,
        " ".repeat(padding),
        format_time_ago(record.timestamp).dimmed()
    );
}

/// Cut `s` to at most `max_width` columns, ending in `…` when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > budget {
            break;
        }
        result.push(c);
        current_width += char_width;
    }

    if max_width > 0 {
        result.push('…');
    }
    result
}

fn format_time_ago(timestamp_millis: i64) -> String {
    let time_str = match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(at) if timestamp_millis > 0 => {
            let duration = Utc::now().signed_duration_since(at);
            timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        _ => "unknown".to_string(),
    };

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_is_not_truncated() {
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
        assert_eq!(truncate_to_width("活着", 4), "活着");
    }

    #[test]
    fn overflow_ends_with_ellipsis_within_width() {
        assert_eq!(truncate_to_width("abcdef", 5), "abcd…");
        let cut = truncate_to_width("活着余华三体", 5);
        assert_eq!(cut, "活着…");
        assert!(cut.width() <= 5);
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
