use std::path::PathBuf;

use anyhow::Context as _;
use clap::{command, Arg, ArgAction};
use context::Context;

mod context;
mod indexer;
mod metadata;
mod output;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = command!()
        .args(&[
            Arg::new("article_dir")
                .help("Directory path of articles. Only `*.md` files are indexed.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("articles"),
            Arg::new("out_file")
                .help("Path of the JSON index. Existing contents will be replaced.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("articles.json"),
            Arg::new("require_existing")
                .long("require-existing")
                .help("Delete the previous index before writing, failing if it does not exist")
                .action(ArgAction::SetTrue),
        ])
        .get_matches();

    let article_dir: &PathBuf = matches
        .get_one("article_dir")
        .context("article_dir is missing")?;
    let out_file: &PathBuf = matches.get_one("out_file").context("out_file is missing")?;

    let ctx = Context::new(
        article_dir.to_owned(),
        out_file.to_owned(),
        matches.get_flag("require_existing"),
    )?;

    indexer::build_index(&ctx)?;

    Ok(())
}
