// ==========================================
// 客户门户导入预处理 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 去重键归一化
// ==========================================

use crate::domain::table::CellValue;
use crate::importer::site_importer_trait::DataCleaner as DataCleanerTrait;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn normalize_site_key(&self, value: &CellValue) -> Option<String> {
        self.normalize_null(Some(value.to_string()))
    }

    fn normalize_email(&self, value: &CellValue) -> Option<String> {
        // 仅 TRIM，区分大小写
        self.normalize_null(Some(value.to_string()))
    }
}

impl DataCleaner {
    /// 文本单元格清洗：TRIM 后为空则视为缺失
    pub fn clean_cell(&self, value: Option<CellValue>) -> Option<CellValue> {
        match value {
            Some(CellValue::Text(s)) => self.normalize_null(Some(s)).map(CellValue::Text),
            other => other,
        }
    }
}
