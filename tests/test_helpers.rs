// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在内存中构造输入工作簿、读取输出文件
// ==========================================

#![allow(dead_code)]

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use site_portal_import::domain::columns;
use site_portal_import::{CellValue, OutputArtifact};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const SITES_SHEET: &str = "Liste des sites avec adresses";
pub const USERS_SHEET: &str = "Liste des utilisateurs clients";

// ==========================================
// WorkbookBuilder - 输入工作簿构造器
// ==========================================
struct SheetData {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Option<CellValue>>>,
}

#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<SheetData>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 任意工作表
    pub fn sheet(
        mut self,
        name: &str,
        headers: &[&str],
        rows: Vec<Vec<Option<CellValue>>>,
    ) -> Self {
        self.sheets.push(SheetData {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        });
        self
    }

    /// 标准工地表（8 列，"" 表示空单元格）
    pub fn sites<S: AsRef<str>>(self, rows: &[[S; 8]]) -> Self {
        let rows = rows.iter().map(|r| text_row(r)).collect();
        self.sheet(SITES_SHEET, &columns::SITE_REQUIRED_HEADERS, rows)
    }

    /// 标准用户表（5 列）
    pub fn users<S: AsRef<str>>(self, rows: &[[S; 5]]) -> Self {
        let rows = rows.iter().map(|r| text_row(r)).collect();
        self.sheet(USERS_SHEET, &columns::USER_REQUIRED_HEADERS, rows)
    }

    /// 带 CGR Chantier 列的用户表（6 列）
    pub fn users_with_site_key<S: AsRef<str>>(self, rows: &[[S; 6]]) -> Self {
        let mut headers = columns::USER_REQUIRED_HEADERS.to_vec();
        headers.push(columns::USER_SITE_KEY);
        let rows = rows.iter().map(|r| text_row(r)).collect();
        self.sheet(USERS_SHEET, &headers, rows)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).unwrap();
            for (col, header) in sheet.headers.iter().enumerate() {
                worksheet.write_string(0, col as u16, header.as_str()).unwrap();
            }
            for (r, row) in sheet.rows.iter().enumerate() {
                let excel_row = r as u32 + 1;
                for (c, cell) in row.iter().enumerate() {
                    match cell {
                        Some(CellValue::Text(s)) => {
                            worksheet.write_string(excel_row, c as u16, s.as_str()).unwrap();
                        }
                        Some(CellValue::Number(n)) => {
                            worksheet.write_number(excel_row, c as u16, *n).unwrap();
                        }
                        Some(CellValue::Bool(b)) => {
                            worksheet.write_boolean(excel_row, c as u16, *b).unwrap();
                        }
                        None => {}
                    }
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    pub fn write_to(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.build()).unwrap();
        path.to_path_buf()
    }
}

/// "" → None，其余为文本单元格
pub fn text_row<S: AsRef<str>>(values: &[S]) -> Vec<Option<CellValue>> {
    values
        .iter()
        .map(|v| v.as_ref())
        .map(|v| (!v.is_empty()).then(|| CellValue::text(v)))
        .collect()
}

/// 完整的工地行
pub fn site(key: &str, city: &str) -> [String; 8] {
    ["75001", city, "1 rue de Rivoli", "Louvre", key, "M-01", "Nord", "ACME"].map(String::from)
}

/// 完整的用户行
pub fn user(email: &str, user_type: &str) -> [String; 5] {
    [email, user_type, "Dupont", "Jean", "Nord"].map(String::from)
}

// ==========================================
// 输出读取
// ==========================================

/// 读取单工作表输出文件（含表头行）
pub fn read_artifact(bytes: &[u8]) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

pub fn artifact_headers(artifact: &OutputArtifact) -> Vec<String> {
    read_artifact(&artifact.bytes)
        .first()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

pub fn column_values(artifact: &OutputArtifact, column: &str) -> Vec<Data> {
    let rows = read_artifact(&artifact.bytes);
    let idx = rows[0]
        .iter()
        .position(|c| c.to_string() == column)
        .unwrap_or_else(|| panic!("列不存在: {}", column));
    rows[1..].iter().map(|r| r[idx].clone()).collect()
}
