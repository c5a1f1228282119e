use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Serialize;

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("while opening {path:?}"))?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}

fn temp_path(path: &Path) -> anyhow::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path has no file name: {path:?}"))?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// Writes `value` as pretty JSON to `path`, replacing whatever was there.
///
/// By default the JSON goes to a sibling temporary file that is then renamed over `path`,
/// so `path` never holds a partial document. With `require_existing`, the previous file is
/// deleted first and its absence is an error.
pub(crate) fn write_index<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    require_existing: bool,
) -> anyhow::Result<()> {
    if require_existing {
        std::fs::remove_file(path)
            .with_context(|| format!("while removing previous output {path:?}"))?;
        return write_json(path, value);
    }

    let tmp = temp_path(path)?;
    let res = write_json(&tmp, value).and_then(|_| {
        std::fs::rename(&tmp, path)
            .with_context(|| format!("while moving {tmp:?} to {path:?}"))
    });
    if res.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    res
}
