// ==========================================
// 客户门户导入预处理 - 工地/用户领域模型
// ==========================================
// 职责: 源表列名、类型化记录、冲突报告、缺失报告、处理结果
// ==========================================

use crate::domain::table::{CellValue, SheetRow, SheetTable};
use crate::domain::types::{ArtifactKind, ConflictKeyKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ==========================================
// 源工作表列名
// ==========================================
pub mod columns {
    // ===== 工地表 =====
    pub const SITE_POSTAL_CODE: &str = "Zip/Postal code";
    pub const SITE_CITY: &str = "Ville";
    pub const SITE_ADDRESS: &str = "Adresse";
    pub const SITE_NAME: &str = "Nom du site (CHANTIER)";
    pub const SITE_KEY: &str = "CGR Chantier";
    pub const SITE_STORE_NUMBER: &str = "N° Mag. (facultatif)";
    pub const SITE_REGION: &str = "LOT / REGIONS";
    pub const SITE_ACCOUNT_NAME: &str = "Nom du compte (sur Salesforce)";

    // ===== 用户表 =====
    pub const USER_EMAIL: &str = "Mail";
    pub const USER_TYPE: &str = "Type (Donneurs d'ordre ou Site)";
    pub const USER_LAST_NAME: &str = "Nom";
    pub const USER_FIRST_NAME: &str = "Prénom";
    pub const USER_SITE_SCOPE: &str = "Périmètre des sites";
    pub const USER_SITE_KEY: &str = "CGR Chantier"; // 可选列

    /// 工地表必须存在的表头
    pub const SITE_REQUIRED_HEADERS: [&str; 8] = [
        SITE_POSTAL_CODE,
        SITE_CITY,
        SITE_ADDRESS,
        SITE_NAME,
        SITE_KEY,
        SITE_STORE_NUMBER,
        SITE_REGION,
        SITE_ACCOUNT_NAME,
    ];

    /// 用户表必须存在的表头
    pub const USER_REQUIRED_HEADERS: [&str; 5] = [
        USER_EMAIL,
        USER_TYPE,
        USER_LAST_NAME,
        USER_FIRST_NAME,
        USER_SITE_SCOPE,
    ];

    /// 工地缺失审计的必填列（账户名不在其中）
    pub const SITE_AUDIT_COLUMNS: [&str; 7] = [
        SITE_POSTAL_CODE,
        SITE_CITY,
        SITE_ADDRESS,
        SITE_NAME,
        SITE_KEY,
        SITE_STORE_NUMBER,
        SITE_REGION,
    ];

    /// 缺失报告追加的计数列
    pub const MISSING_COUNT: &str = "missing_values";
}

// ==========================================
// SiteRecord - 工地记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub postal_code: Option<CellValue>,  // Zip/Postal code
    pub city: Option<CellValue>,         // Ville
    pub address: Option<CellValue>,      // Adresse
    pub site_name: Option<CellValue>,    // Nom du site (CHANTIER)
    pub site_key: Option<CellValue>,     // CGR Chantier（业务主键）
    pub store_number: Option<CellValue>, // N° Mag.（可选）
    pub region: Option<CellValue>,       // LOT / REGIONS
    pub account_name: Option<CellValue>, // Nom du compte (sur Salesforce)

    pub row_number: usize,
}

// ==========================================
// UserRecord - 门户用户记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: Option<CellValue>,      // Mail（去重主键）
    pub user_type: Option<CellValue>,  // Site / Donneur d'ordre
    pub last_name: Option<CellValue>,  // Nom
    pub first_name: Option<CellValue>, // Prénom
    pub site_scope: Option<CellValue>, // Périmètre des sites
    pub site_key: Option<CellValue>,   // CGR Chantier（若源表有此列）

    pub row_number: usize,
}

// ==========================================
// KeyConflict - 同键不同内容
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConflict {
    pub kind: ConflictKeyKind,
    pub key: String,                    // 归一化后的键
    pub row_numbers: Vec<usize>,        // 涉及的源行号
    pub differing_columns: Vec<String>, // 取值不一致的列
}

impl fmt::Display for KeyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.row_numbers.iter().map(|r| r.to_string()).collect();
        write!(
            f,
            "{} '{}' (行 {}; 差异列: {})",
            self.kind,
            self.key,
            rows.join(", "),
            self.differing_columns.join(", ")
        )
    }
}

// ==========================================
// ConflictReport - 冲突报告（流水线终止时返回）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub site_conflicts: Vec<KeyConflict>,
    pub email_conflicts: Vec<KeyConflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.site_conflicts.is_empty() && self.email_conflicts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.site_conflicts.len() + self.email_conflicts.len()
    }

    pub fn site_keys(&self) -> Vec<&str> {
        self.site_conflicts.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn emails(&self) -> Vec<&str> {
        self.email_conflicts.iter().map(|c| c.key.as_str()).collect()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CGR Chantier 冲突 {} 个 [{}]，邮箱冲突 {} 个 [{}]",
            self.site_conflicts.len(),
            self.site_keys().join(", "),
            self.email_conflicts.len(),
            self.emails().join(", ")
        )
    }
}

// ==========================================
// DuplicateResolution - 去重结果
// ==========================================
#[derive(Debug, Clone)]
pub struct DuplicateResolution {
    pub sites: SheetTable,
    pub users: SheetTable,
    pub site_conflicts: Vec<KeyConflict>,
    pub email_conflicts: Vec<KeyConflict>,
    pub site_exact_duplicates_removed: usize,
    pub user_exact_duplicates_removed: usize,
    pub collapsed_site_rows: usize, // 同键同内容合并掉的行数
}

impl DuplicateResolution {
    pub fn conflicts_found(&self) -> bool {
        !self.site_conflicts.is_empty() || !self.email_conflicts.is_empty()
    }

    pub fn conflict_report(&self) -> ConflictReport {
        ConflictReport {
            site_conflicts: self.site_conflicts.clone(),
            email_conflicts: self.email_conflicts.clone(),
        }
    }
}

// ==========================================
// MissingInfoReport - 缺失信息报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingRow {
    pub row: SheetRow,
    pub missing_count: usize,
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingInfoReport {
    pub sheet: String,
    pub headers: Vec<String>,
    pub required_columns: Vec<String>,
    pub rows: Vec<MissingRow>, // 按缺失数降序（稳定）
}

impl MissingInfoReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 转为输出表：源列 + missing_values 计数列
    pub fn to_table(&self) -> SheetTable {
        let mut headers = self.headers.clone();
        headers.push(columns::MISSING_COUNT.to_string());

        let mut table = SheetTable::new(self.sheet.clone(), headers);
        for missing in &self.rows {
            let mut cells = missing.row.cells.clone();
            cells.resize(self.headers.len(), None);
            cells.push(Some(CellValue::Number(missing.missing_count as f64)));
            table.rows.push(SheetRow::new(missing.row.row_number, cells));
        }
        table
    }
}

// ==========================================
// NullPropagationWarning - 拼接字段空值传播（非致命）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullPropagationWarning {
    pub extract: String,             // 目标表
    pub row_number: usize,           // 源行号
    pub column: String,              // 派生列
    pub missing_inputs: Vec<String>, // 为空的输入字段
}

impl fmt::Display for NullPropagationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 行 {}: '{}' 为空（输入缺失: {}）",
            self.extract,
            self.row_number,
            self.column,
            self.missing_inputs.join(", ")
        )
    }
}

// ==========================================
// OutputArtifact / ResultBundle - 输出文件
// ==========================================
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub rows: usize, // 数据行数（不含表头）
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ResultBundle {
    pub missing_sites: OutputArtifact,
    pub missing_users: OutputArtifact,
    pub contacts_extract: OutputArtifact,
    pub sites_extract: OutputArtifact,
}

impl ResultBundle {
    pub fn artifacts(&self) -> [&OutputArtifact; 4] {
        [
            &self.missing_sites,
            &self.missing_users,
            &self.contacts_extract,
            &self.sites_extract,
        ]
    }

    pub fn get(&self, kind: ArtifactKind) -> &OutputArtifact {
        match kind {
            ArtifactKind::MissingSites => &self.missing_sites,
            ArtifactKind::MissingUsers => &self.missing_users,
            ArtifactKind::ContactsExtract => &self.contacts_extract,
            ArtifactKind::SitesExtract => &self.sites_extract,
        }
    }
}

// ==========================================
// ProcessSummary / ProcessOutcome - 处理结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub site_rows: usize,                     // 读取的工地行数
    pub user_rows: usize,                     // 读取的用户行数
    pub site_exact_duplicates_removed: usize, // 整行重复（工地）
    pub user_exact_duplicates_removed: usize, // 整行重复（用户）
    pub collapsed_site_rows: usize,           // 同键同内容合并
    pub sites_with_missing_info: usize,
    pub users_with_missing_info: usize,
    pub contacts_exported: usize,
    pub sites_exported: usize,
    pub null_propagation_warnings: usize,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub batch_id: String,
    pub processed_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub summary: ProcessSummary,
    pub missing_sites: MissingInfoReport,
    pub missing_users: MissingInfoReport,
    pub contacts: SheetTable,
    pub sites: SheetTable,
    pub warnings: Vec<NullPropagationWarning>,
    pub bundle: ResultBundle,
}
