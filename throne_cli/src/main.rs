//! Terminal front end for The Forgotten Throne.

mod app;
mod commands;
mod terminal;

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use game_rules::{GameConfig, GameData};
use narrative_core::{EventEngine, FileStore, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminal::TerminalView;

const CONFIG_FILE: &str = "config.toml";
const DATA_LOAD_FAILED_TEXT: &str = "游戏数据加载失败，请检查文件是否完整。";

fn print_usage() {
    println!("throne [data-dir] [--seed N]");
    println!("  data-dir: directory holding events.json, monsters.json, items.json, stories.json");
    println!("            and an optional config.toml (default: ./data)");
    println!("  --seed N: fixed seed for checks, damage and event draws");
    println!("environment:");
    println!("  THRONE_SAVE_DIR  where saves are written (default: platform data dir)");
    println!("  RUST_LOG         log filter (default: warn)");
}

#[derive(Debug)]
struct Args {
    data_dir: PathBuf,
    seed: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut data_dir = None;
    let mut seed = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--seed" => {
                let raw = iter.next().ok_or_else(|| "missing seed".to_string())?;
                seed = Some(
                    raw.parse::<u64>()
                        .map_err(|_| format!("invalid seed: {raw}"))?,
                );
            }
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other if data_dir.is_none() => data_dir = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Some(Args {
        data_dir: data_dir.unwrap_or_else(|| PathBuf::from("data")),
        seed,
    }))
}

fn save_dir() -> PathBuf {
    env::var("THRONE_SAVE_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|dir| dir.join("forgotten-throne")))
        .unwrap_or_else(|| PathBuf::from("saves"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(anyhow!(err));
        }
    };

    let data = match GameData::load_dir(&args.data_dir) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{DATA_LOAD_FAILED_TEXT}");
            return Err(err).with_context(|| format!("loading {}", args.data_dir.display()));
        }
    };
    let config = GameConfig::load(args.data_dir.join(CONFIG_FILE))
        .with_context(|| format!("reading {}", args.data_dir.join(CONFIG_FILE).display()))?;

    let mut engine = EventEngine::new(data, config);
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }

    let store = FileStore::new(save_dir());
    info!(data_dir = %args.data_dir.display(), save_dir = %store.dir().display(), "starting");

    let mut session = Session::new(engine, TerminalView::new(io::stdout()), store);
    app::run(&mut session, io::stdin().lock())
}
