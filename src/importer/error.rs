// ==========================================
// 客户门户导入预处理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::site::ConflictReport;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 工作表错误 =====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("工作表无表头: {0}")]
    EmptySheet(String),

    #[error("工作表 '{sheet}' 缺少必需列: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    // ===== 数据质量错误 =====
    #[error("存在未解决的重复键，终止处理: {0}")]
    DuplicateConflict(ConflictReport),

    // ===== 输出错误 =====
    #[error("Excel 生成失败: {0}")]
    ExcelWriteError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为读取类错误（文件/工作表/表头）
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::SheetNotFound(_)
                | ImportError::EmptySheet(_)
                | ImportError::MissingColumns { .. }
        )
    }

    /// 冲突终止时返回冲突报告
    pub fn conflict_report(&self) -> Option<&ConflictReport> {
        match self {
            ImportError::DuplicateConflict(report) => Some(report),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::ExcelWriteError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::ConfigReadError {
            key: "<document>".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err = ImportError::MissingColumns {
            sheet: "Liste des sites avec adresses".to_string(),
            columns: vec!["Ville".to_string(), "Adresse".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Ville, Adresse"));
        assert!(err.is_read_error());
    }

    #[test]
    fn test_conflict_is_not_read_error() {
        let err = ImportError::DuplicateConflict(ConflictReport::default());
        assert!(!err.is_read_error());
        assert!(err.conflict_report().is_some());
    }
}
