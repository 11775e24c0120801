// ==========================================
// 客户门户导入预处理 - 数据质量校验器实现
// ==========================================
// 职责: 缺失信息审计（逐行缺失计数 + 稳定降序）
// ==========================================

use crate::domain::site::{MissingInfoReport, MissingRow};
use crate::domain::table::{SheetRow, SheetTable};
use crate::importer::site_importer_trait::DqValidator as DqValidatorTrait;
use std::cmp::Reverse;

// ==========================================
// RequiredColumns - 必填列集合
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredColumns {
    /// 指定列（表中不存在的列在每一行都计为缺失）
    Columns(Vec<String>),
    /// 表中全部列
    AllColumns,
}

impl RequiredColumns {
    pub fn columns<S: AsRef<str>>(columns: &[S]) -> Self {
        RequiredColumns::Columns(columns.iter().map(|c| c.as_ref().to_string()).collect())
    }

    fn resolve(&self, table: &SheetTable) -> Vec<String> {
        match self {
            RequiredColumns::Columns(columns) => columns.clone(),
            RequiredColumns::AllColumns => table.headers.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DqValidator;

impl DqValidatorTrait for DqValidator {
    fn missing_columns(
        &self,
        table: &SheetTable,
        row: &SheetRow,
        required: &[String],
    ) -> Vec<String> {
        required
            .iter()
            .filter(|column| table.value(row, column).is_none())
            .cloned()
            .collect()
    }

    fn audit(&self, table: &SheetTable, required: &RequiredColumns) -> MissingInfoReport {
        let required_columns = required.resolve(table);

        let mut rows: Vec<MissingRow> = table
            .rows
            .iter()
            .filter_map(|row| {
                let missing = self.missing_columns(table, row, &required_columns);
                (!missing.is_empty()).then(|| MissingRow {
                    row: row.clone(),
                    missing_count: missing.len(),
                    missing_columns: missing,
                })
            })
            .collect();

        // sort_by_key 为稳定排序，同缺失数保持原行序
        rows.sort_by_key(|r| Reverse(r.missing_count));

        MissingInfoReport {
            sheet: table.name.clone(),
            headers: table.headers.clone(),
            required_columns,
            rows,
        }
    }
}
