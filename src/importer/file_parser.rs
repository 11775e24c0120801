// ==========================================
// 客户门户导入预处理 - 文件解析器实现
// ==========================================
// 职责: 读取工地表与用户表，校验必需表头
// 支持: Excel (.xlsx/.xlsm/.xls) 路径 / 上传的 .xlsx 字节
// ==========================================

use crate::domain::site::columns;
use crate::domain::table::{CellValue, SheetRow, SheetTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::site_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Xlsx};
use chrono::NaiveTime;
use std::fmt;
use std::io::{Cursor, Read, Seek};
use std::path::PathBuf;
use tracing::debug;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xlsm", "xls"];

// ==========================================
// WorkbookSource - 工作簿来源
// ==========================================
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Path(PathBuf),
    Bytes(Vec<u8>), // 上传内容，按 .xlsx 解析
}

impl fmt::Display for WorkbookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbookSource::Path(path) => write!(f, "{}", path.display()),
            WorkbookSource::Bytes(bytes) => write!(f, "<upload {} bytes>", bytes.len()),
        }
    }
}

// ==========================================
// WorkbookSheets - 读取结果
// ==========================================
#[derive(Debug, Clone)]
pub struct WorkbookSheets {
    pub sites: SheetTable,
    pub users: SheetTable,
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser {
    cleaner: DataCleaner,
}

impl FileParser for ExcelParser {
    fn parse_workbook(
        &self,
        source: &WorkbookSource,
        sites_sheet: &str,
        users_sheet: &str,
    ) -> ImportResult<WorkbookSheets> {
        let (sites, users) = match source {
            WorkbookSource::Path(path) => {
                // 检查文件存在
                if !path.exists() {
                    return Err(ImportError::FileNotFound(path.display().to_string()));
                }

                // 检查扩展名
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_lowercase();
                if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(ImportError::UnsupportedFormat(ext));
                }

                let mut workbook = open_workbook_auto(path)?;
                (
                    self.read_sheet(&mut workbook, sites_sheet)?,
                    self.read_sheet(&mut workbook, users_sheet)?,
                )
            }
            WorkbookSource::Bytes(bytes) => {
                let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.as_slice()))?;
                (
                    self.read_sheet(&mut workbook, sites_sheet)?,
                    self.read_sheet(&mut workbook, users_sheet)?,
                )
            }
        };

        check_headers(&sites, &columns::SITE_REQUIRED_HEADERS)?;
        check_headers(&users, &columns::USER_REQUIRED_HEADERS)?;

        Ok(WorkbookSheets { sites, users })
    }
}

impl ExcelParser {
    /// 读取单个工作表：首行为表头，其余为数据行
    fn read_sheet<RS, R>(&self, workbook: &mut R, sheet_name: &str) -> ImportResult<SheetTable>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: fmt::Display,
    {
        if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ImportError::ExcelParseError(format!("{}: {}", sheet_name, e)))?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptySheet(sheet_name.to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let label = cell.to_string().trim().to_string();
                if label.is_empty() {
                    format!("Unnamed: {}", idx)
                } else {
                    label
                }
            })
            .collect();

        let mut table = SheetTable::new(sheet_name, headers);

        // 读取数据行（行号按源表位置计，跳过的空行也占号）
        for (idx, data_row) in rows.enumerate() {
            let cells: Vec<Option<CellValue>> =
                data_row.iter().map(|cell| self.convert_cell(cell)).collect();

            // 跳过完全空白的行
            if cells.iter().all(|c| c.is_none()) {
                continue;
            }

            table.rows.push(SheetRow::new(idx + 1, cells));
        }

        debug!(sheet = sheet_name, rows = table.len(), "工作表读取完成");
        Ok(table)
    }

    fn convert_cell(&self, cell: &Data) -> Option<CellValue> {
        match cell {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) => self.cleaner.clean_cell(Some(CellValue::Text(s.clone()))),
            Data::Int(i) => Some(CellValue::Number(*i as f64)),
            Data::Float(f) => Some(CellValue::Number(*f)),
            Data::Bool(b) => Some(CellValue::Bool(*b)),
            Data::DateTime(dt) => Some(CellValue::Text(format_excel_datetime(dt))),
            other => self
                .cleaner
                .clean_cell(Some(CellValue::Text(other.to_string()))),
        }
    }
}

/// 日期/时间单元格转为文本：纯日期 `%Y-%m-%d`，纯时间与时长 `%H:%M:%S`
fn format_excel_datetime(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        if let Some(duration) = value.as_duration() {
            let secs = duration.num_seconds();
            return format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
        }
    }

    match value.as_datetime() {
        Some(dt) if value.as_f64() < 1.0 => dt.format("%H:%M:%S").to_string(),
        Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => value.as_f64().to_string(),
    }
}

fn check_headers(table: &SheetTable, required: &[&str]) -> ImportResult<()> {
    let missing = table.missing_columns(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            sheet: table.name.clone(),
            columns: missing,
        })
    }
}
