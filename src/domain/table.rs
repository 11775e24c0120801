// ==========================================
// 客户门户导入预处理 - 表格数据模型
// ==========================================
// 职责: 工作表的内存表示（表头 + 有序行 + 可空单元格）
// 用途: 解析层产出，去重/缺失审计/映射/输出共用
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
// 空单元格不入此枚举，统一以 Option::None 表示缺失
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            // 整数值按整数输出（邮编、门店号等在 Excel 中常为数值单元格）
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

// ==========================================
// SheetRow - 数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub row_number: usize, // 源工作表数据行号（从 1 开始，不含表头）
    pub cells: Vec<Option<CellValue>>,
}

impl SheetRow {
    pub fn new(row_number: usize, cells: Vec<Option<CellValue>>) -> Self {
        Self { row_number, cells }
    }

    /// 整行内容完全相同（忽略行号）
    pub fn same_content(&self, other: &SheetRow) -> bool {
        self.cells == other.cells
    }

    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).and_then(|c| c.as_ref())
    }

    /// 整行指纹，用于哈希分桶去重
    ///
    /// 内容相同的行指纹必相同；桶内仍以 same_content 确认
    pub fn fingerprint(&self) -> String {
        self.cells
            .iter()
            .map(|cell| match cell {
                None => "_".to_string(),
                Some(CellValue::Text(s)) => format!("T{:?}", s),
                // -0.0 + 0.0 == +0.0，与 PartialEq 一致
                Some(CellValue::Number(n)) => format!("N{}", (n + 0.0).to_bits()),
                Some(CellValue::Bool(b)) => format!("B{}", b),
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

// ==========================================
// SheetTable - 工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// 返回表头中缺失的列（保持入参顺序）
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// 按列名取单元格值；列不存在或单元格为空均返回 None
    pub fn value<'a>(&self, row: &'a SheetRow, column: &str) -> Option<&'a CellValue> {
        self.column_index(column).and_then(|idx| row.cell(idx))
    }

    /// 追加一行，行号按当前长度顺延
    pub fn push_row(&mut self, cells: Vec<Option<CellValue>>) {
        let row_number = self.rows.len() + 1;
        self.rows.push(SheetRow::new(row_number, cells));
    }

    /// 某列是否全部为空
    pub fn column_is_empty(&self, column: &str) -> bool {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().all(|r| r.cell(idx).is_none()),
            None => true,
        }
    }
}
