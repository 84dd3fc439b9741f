use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::graph_utils::graph::GraphRegistry;
use super::settings::AppSettings;
use super::text_format;

/// Timestamped file name under the effective export directory.
pub fn default_export_path(settings: &AppSettings) -> PathBuf {
    let now = OffsetDateTime::now_utc();
    let fmt = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = now.format(fmt).unwrap_or_else(|_| "unknown".to_string());
    settings.export_dir().join(format!("routes_{}.txt", stamp))
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("txt.tmp");
    {
        let mut f = File::create(&tmp_path)?;
        f.write_all(data)?;
        f.flush()?;
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn save_to_path(graph: &GraphRegistry, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let text = text_format::export(graph);
    atomic_write(path, text.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    info!("saved {} nodes to {}", graph.node_count(), path.display());
    Ok(())
}

/// Import a graph file into `graph`, replacing its contents.
///
/// An unreadable file is treated like a malformed one: the registry is left
/// empty and the error is returned.
pub fn load_from_path(graph: &mut GraphRegistry, path: &Path) -> anyhow::Result<()> {
    let mut buf = String::new();
    let read = File::open(path).and_then(|mut f| f.read_to_string(&mut buf));
    if let Err(e) = read {
        graph.clear();
        warn!("could not read {}: {}", path.display(), e);
        return Err(e).with_context(|| format!("reading {}", path.display()));
    }
    text_format::import(graph, &buf).with_context(|| format!("importing {}", path.display()))?;
    Ok(())
}
