//! 导出文件存储
//!
//! 文档落在 `<root>/exports/<tenant>/<date>_<created_at>.dep`。
//! 文件名带时间戳，重复导出不会覆盖历史版本；提交时取同日最新。

use std::path::{Path, PathBuf};

use shared::AppError;

#[derive(Clone)]
pub struct ExportStore {
    root: PathBuf,
}

impl ExportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn tenant_dir(&self, tenant_id: &str) -> PathBuf {
        self.root.join("exports").join(tenant_id)
    }

    /// 保存一份导出文档，返回落盘路径
    pub fn save(
        &self,
        tenant_id: &str,
        date: &str,
        created_at: i64,
        content: &[u8],
    ) -> Result<PathBuf, AppError> {
        let dir = self.tenant_dir(tenant_id);
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::internal(format!("failed to create export dir: {e}")))?;

        let path = dir.join(format!("{}_{}.dep", date, created_at));
        std::fs::write(&path, content)
            .map_err(|e| AppError::internal(format!("failed to write export: {e}")))?;

        tracing::info!(tenant = tenant_id, path = %path.display(), "Export persisted");
        Ok(path)
    }

    /// 读取指定日期最新的导出文档；没有则 None
    pub fn load_latest(&self, tenant_id: &str, date: &str) -> Result<Option<Vec<u8>>, AppError> {
        let dir = self.tenant_dir(tenant_id);
        if !dir.is_dir() {
            return Ok(None);
        }

        // 文件名 = date_createdAt.dep，按数字时间戳取最新（不靠字典序）
        let prefix = format!("{}_", date);
        let mut latest: Option<(i64, PathBuf)> = None;
        for entry in std::fs::read_dir(&dir)
            .map_err(|e| AppError::internal(format!("failed to read export dir: {e}")))?
        {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let Some(stamp) = file_name(&path)
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(".dep"))
                .and_then(|n| n.parse::<i64>().ok())
            else {
                continue;
            };
            if latest.as_ref().is_none_or(|(best, _)| stamp > *best) {
                latest = Some((stamp, path));
            }
        }

        let Some((_, latest)) = latest else {
            return Ok(None);
        };

        let content = std::fs::read(&latest)
            .map_err(|e| AppError::internal(format!("failed to read export: {e}")))?;
        Ok(Some(content))
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
