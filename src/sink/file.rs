use super::errors::SinkError;
use super::layout::{child_values, parent_values, SheetLayout};
use super::sheet::{UpsertOutcome, Workbook};
use super::{RecordSink, WriteSummary};
use crate::config::SinkConfig;
use crate::metrics::{ChildMetrics, ParentMetrics};
use async_trait::async_trait;
use fd_lock::RwLock;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Workbook persisted as a JSON file.
///
/// Each write takes an exclusive lock on `<path>.lock`, loads the current
/// workbook, upserts every record and atomically replaces the file, so a
/// failed write leaves the previous workbook intact.
#[derive(Debug, Clone)]
pub struct WorkbookFileSink {
    path: PathBuf,
    parent_sheet: String,
    child_sheet: String,
}

impl WorkbookFileSink {
    pub fn new(config: &SinkConfig) -> Self {
        Self {
            path: config.path.clone(),
            parent_sheet: config.parent_sheet.clone(),
            child_sheet: config.child_sheet.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the workbook, empty if the file does not exist yet
    pub fn load(&self) -> Result<Workbook, SinkError> {
        load_workbook(&self.path)
    }

    fn write_blocking(
        &self,
        parents: &[ParentMetrics],
        children: &[ChildMetrics],
    ) -> Result<WriteSummary, SinkError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| SinkError::io(dir, e))?;
        }

        let lock_path = lock_path(&self.path);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| SinkError::io(&lock_path, e))?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.try_write().map_err(|_| SinkError::Locked {
            path: self.path.clone(),
        })?;

        let mut workbook = load_workbook(&self.path)?;
        let mut summary = WriteSummary::default();

        let layout = SheetLayout::parent();
        let sheet = workbook.sheet_mut(&self.parent_sheet, layout.headers);
        for metrics in parents {
            let row = layout.coerce(parent_values(metrics));
            match sheet.upsert(&self.parent_sheet, row)? {
                UpsertOutcome::Inserted => summary.parents_inserted += 1,
                UpsertOutcome::Updated => summary.parents_updated += 1,
            }
        }

        let layout = SheetLayout::child();
        let sheet = workbook.sheet_mut(&self.child_sheet, layout.headers);
        for metrics in children {
            let row = layout.coerce(child_values(metrics));
            match sheet.upsert(&self.child_sheet, row)? {
                UpsertOutcome::Inserted => summary.children_inserted += 1,
                UpsertOutcome::Updated => summary.children_updated += 1,
            }
        }

        save_workbook(&self.path, &workbook)?;
        info!(
            path = %self.path.display(),
            parents_inserted = summary.parents_inserted,
            parents_updated = summary.parents_updated,
            children_inserted = summary.children_inserted,
            children_updated = summary.children_updated,
            "Workbook written"
        );
        Ok(summary)
    }
}

#[async_trait]
impl RecordSink for WorkbookFileSink {
    async fn write(
        &self,
        parents: &[ParentMetrics],
        children: &[ChildMetrics],
    ) -> Result<WriteSummary, SinkError> {
        let sink = self.clone();
        let parents = parents.to_vec();
        let children = children.to_vec();

        tokio::task::spawn_blocking(move || sink.write_blocking(&parents, &children))
            .await
            .map_err(|e| SinkError::Task(e.to_string()))?
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn load_workbook(path: &Path) -> Result<Workbook, SinkError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No workbook yet, starting empty");
            return Ok(Workbook::default());
        }
        Err(e) => return Err(SinkError::io(path, e)),
    };

    let mut workbook: Workbook =
        serde_json::from_str(&content).map_err(|source| SinkError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    workbook.reindex();
    Ok(workbook)
}

fn save_workbook(path: &Path, workbook: &Workbook) -> Result<(), SinkError> {
    let json = serde_json::to_string_pretty(workbook)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    {
        use std::io::Write;
        let mut file = File::create(&tmp_path).map_err(|e| SinkError::io(&tmp_path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| SinkError::io(&tmp_path, e))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| SinkError::io(path, e))
}
