// ==========================================
// 客户门户导入预处理 - 输出文件生成器实现
// ==========================================
// 职责: SheetTable → 单工作表 .xlsx 字节流；四个输出打包/落盘
// ==========================================

use crate::domain::site::{OutputArtifact, ResultBundle};
use crate::domain::table::{CellValue, SheetTable};
use crate::domain::types::ArtifactKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::site_importer_trait::ResultBundler as ResultBundlerTrait;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 输出工作表名
pub const OUTPUT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct ResultBundler {
    file_names: HashMap<ArtifactKind, String>,
}

impl Default for ResultBundler {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl ResultBundler {
    /// 未指定的输出类型使用默认文件名
    pub fn new(file_names: HashMap<ArtifactKind, String>) -> Self {
        Self { file_names }
    }

    pub fn file_name(&self, kind: ArtifactKind) -> String {
        self.file_names
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_file_name().to_string())
    }

    fn artifact(&self, kind: ArtifactKind, table: &SheetTable) -> ImportResult<OutputArtifact> {
        let bytes = self.write_table(table)?;
        debug!(artifact = %kind, rows = table.len(), size = bytes.len(), "输出文件已生成");
        Ok(OutputArtifact {
            kind,
            file_name: self.file_name(kind),
            rows: table.len(),
            bytes,
        })
    }

    /// 四个输出文件写入目录
    pub fn write_to_dir(&self, bundle: &ResultBundle, dir: &Path) -> ImportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for artifact in bundle.artifacts() {
            let path = dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.bytes)?;
            info!(path = %path.display(), rows = artifact.rows, "输出文件已写入");
            written.push(path);
        }
        Ok(written)
    }
}

impl ResultBundlerTrait for ResultBundler {
    fn write_table(&self, table: &SheetTable) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(OUTPUT_SHEET_NAME)?;

        // 表头
        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, column_number(col)?, header.as_str())?;
        }

        // 数据行
        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| ImportError::ExcelWriteError(format!("行数超限: {}", row_idx + 1)))?;
            for (col, cell) in row.cells.iter().enumerate() {
                if let Some(value) = cell {
                    write_value(worksheet, excel_row, column_number(col)?, value)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn bundle(
        &self,
        missing_sites: &SheetTable,
        missing_users: &SheetTable,
        contacts: &SheetTable,
        sites: &SheetTable,
    ) -> ImportResult<ResultBundle> {
        Ok(ResultBundle {
            missing_sites: self.artifact(ArtifactKind::MissingSites, missing_sites)?,
            missing_users: self.artifact(ArtifactKind::MissingUsers, missing_users)?,
            contacts_extract: self.artifact(ArtifactKind::ContactsExtract, contacts)?,
            sites_extract: self.artifact(ArtifactKind::SitesExtract, sites)?,
        })
    }
}

fn column_number(col: usize) -> ImportResult<u16> {
    u16::try_from(col).map_err(|_| ImportError::ExcelWriteError(format!("列数超限: {}", col)))
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> ImportResult<()> {
    match value {
        CellValue::Text(s) => {
            ws.write_string(row, col, s.as_str())?;
        }
        CellValue::Number(n) => {
            ws.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn sample_table() -> SheetTable {
        let mut table = SheetTable::new(
            "sites",
            vec!["Name".to_string(), "Zip".to_string(), "Flag".to_string()],
        );
        table.push_row(vec![
            Some(CellValue::text("Louvre")),
            Some(CellValue::Number(75001.0)),
            None,
        ]);
        table.push_row(vec![None, None, Some(CellValue::Bool(true))]);
        table
    }

    #[test]
    fn test_write_table_readable_by_calamine() {
        let bytes = ResultBundler::default().write_table(&sample_table()).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![OUTPUT_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(OUTPUT_SHEET_NAME).unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("Name".to_string()));
        assert_eq!(rows[1][1], Data::Float(75001.0));
        assert_eq!(rows[1][2], Data::Empty);
        assert_eq!(rows[2][2], Data::Bool(true));
    }

    #[test]
    fn test_header_only_table() {
        let table = SheetTable::new("empty", vec!["Account__c".to_string()]);
        let bytes = ResultBundler::default().write_table(&table).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(OUTPUT_SHEET_NAME).unwrap();
        assert_eq!(range.rows().count(), 1);
    }

    #[test]
    fn test_bundle_file_names() {
        let mut names = HashMap::new();
        names.insert(ArtifactKind::SitesExtract, "sites.xlsx".to_string());
        let bundler = ResultBundler::new(names);

        let table = sample_table();
        let bundle = bundler.bundle(&table, &table, &table, &table).unwrap();

        assert_eq!(bundle.missing_sites.file_name, "Sites_plus_infos_manquantes.xlsx");
        assert_eq!(bundle.sites_extract.file_name, "sites.xlsx");
        assert_eq!(bundle.get(ArtifactKind::ContactsExtract).rows, 2);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = ResultBundler::default();
        let table = sample_table();
        let bundle = bundler.bundle(&table, &table, &table, &table).unwrap();

        let written = bundler.write_to_dir(&bundle, dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|p| p.exists()));
        assert!(dir.path().join("Creer_sites_en_masse_resultat.xlsx").exists());
    }
}
