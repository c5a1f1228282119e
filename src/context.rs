use std::path::PathBuf;

use anyhow::bail;

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub article_dir: PathBuf,
    pub out_file: PathBuf,

    /// Remove the previous output with an unconditional delete before writing.
    /// A missing output file then aborts the run.
    pub require_existing: bool,
}

impl Context {
    pub fn new(
        article_dir: PathBuf,
        out_file: PathBuf,
        require_existing: bool,
    ) -> anyhow::Result<Self> {
        if !article_dir.is_dir() {
            bail!("article_dir must be a directory: {article_dir:?}");
        }
        if out_file.is_dir() {
            bail!("if out_file exists, it must be a file: {out_file:?}");
        }

        Ok(Self {
            article_dir,
            out_file,
            require_existing,
        })
    }
}
