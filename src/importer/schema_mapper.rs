// ==========================================
// 客户门户导入预处理 - 目标结构映射器实现
// ==========================================
// 职责: UserRecord → 批量创建联系人 / SiteRecord → 批量创建工地
// 规则: 字段改名 + 常量填充 + 拼接派生 + 空列裁剪（保留列除外）
// ==========================================

use crate::domain::site::{columns, NullPropagationWarning, SiteRecord, UserRecord};
use crate::domain::table::{CellValue, SheetTable};
use crate::importer::site_importer_trait::SchemaMapper as SchemaMapperTrait;
use tracing::warn;

// ==========================================
// 目标列名
// ==========================================
pub mod target_columns {
    // ===== 联系人 =====
    pub const EMAIL: &str = "Email";
    pub const CONTACT_TYPE: &str = "Contact_Type__c";
    pub const LAST_NAME: &str = "LastName";
    pub const FIRST_NAME: &str = "FirstName";
    pub const REGION: &str = "region";
    pub const ID: &str = "ID Contact";
    pub const SITE_LOOKUP: &str = "Site__c";
    pub const ACCOUNT_ID: &str = "AccountId";
    pub const SITE_KEY: &str = "CGR Chantier";

    // ===== 工地 =====
    pub const ZIP: &str = "Zip_Postal_code__c";
    pub const CITY: &str = "City__c";
    pub const STREET: &str = "Street__c";
    pub const NAME: &str = "Name";
    pub const OPERATING_SITE: &str = "Operating_Site__c";
    pub const COUNTRY: &str = "Country2__c";
    pub const CUSTOMER_SITE_ID: &str = "Customer_Site_ID__c";
    pub const ACCOUNT: &str = "Account__c";
    pub const ACCOUNTING_SYSTEM_SITE: &str = "Accounting_System_Site__c";

    /// 联系人表即使全空也保留的列
    pub const CONTACT_ALWAYS_KEEP: [&str; 2] = [SITE_LOOKUP, ACCOUNT_ID];

    /// 工地表即使全空也保留的列
    pub const SITE_ALWAYS_KEEP: [&str; 2] = [ACCOUNT, ACCOUNTING_SYSTEM_SITE];
}

/// 工地常量
const OPERATING_SITE_VALUE: &str = "TRUE";
const COUNTRY_VALUE: &str = "FR";

pub const CONTACTS_EXTRACT_NAME: &str = "contacts";
pub const SITES_EXTRACT_NAME: &str = "sites";

// ==========================================
// ExtractBuilder - 列式累积，构建完成后统一裁剪
// ==========================================
#[derive(Debug, Clone)]
pub struct ExtractBuilder {
    name: String,
    columns: Vec<(String, Vec<Option<CellValue>>)>,
}

impl ExtractBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, values: Vec<Option<CellValue>>) -> Self {
        self.columns.push((name.to_string(), values));
        self
    }

    /// 全空列
    pub fn null_column(self, name: &str, len: usize) -> Self {
        self.column(name, vec![None; len])
    }

    /// 常量列
    pub fn constant_column(self, name: &str, value: CellValue, len: usize) -> Self {
        self.column(name, vec![Some(value); len])
    }

    /// 裁剪全空列（keep 中的列除外），列序不变
    pub fn build(self, keep: &[&str]) -> SheetTable {
        let len = self.columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let retained: Vec<(String, Vec<Option<CellValue>>)> = self
            .columns
            .into_iter()
            .filter(|(name, values)| {
                keep.contains(&name.as_str()) || values.iter().any(|v| v.is_some())
            })
            .collect();

        let headers = retained.iter().map(|(name, _)| name.clone()).collect();
        let mut table = SheetTable::new(self.name, headers);
        for row_idx in 0..len {
            let cells = retained
                .iter()
                .map(|(_, values)| values.get(row_idx).cloned().flatten())
                .collect();
            table.push_row(cells);
        }
        table
    }
}

// ==========================================
// MappedExtract - 映射结果
// ==========================================
#[derive(Debug, Clone)]
pub struct MappedExtract {
    pub table: SheetTable,
    pub warnings: Vec<NullPropagationWarning>,
}

// ==========================================
// SchemaMapper 实现
// ==========================================
#[derive(Debug, Clone)]
pub struct SchemaMapper {
    contact_types: Vec<(String, String)>, // 用户类型 → Contact_Type__c
}

impl Default for SchemaMapper {
    fn default() -> Self {
        Self::new(default_contact_types())
    }
}

/// 默认用户类型映射
pub fn default_contact_types() -> Vec<(String, String)> {
    vec![
        ("Site".to_string(), "portal user site".to_string()),
        ("Donneur d'ordre".to_string(), "portal user".to_string()),
        ("Donneurs d'ordre".to_string(), "portal user".to_string()),
    ]
}

impl SchemaMapper {
    pub fn new(contact_types: Vec<(String, String)>) -> Self {
        Self { contact_types }
    }

    /// 用户类型映射；未匹配的值原样保留
    fn map_contact_type(&self, value: Option<&CellValue>) -> Option<CellValue> {
        let value = value?;
        let mapped = value.as_text().and_then(|text| {
            self.contact_types
                .iter()
                .find(|(from, _)| from == text)
                .map(|(_, to)| CellValue::text(to.clone()))
        });
        Some(mapped.unwrap_or_else(|| value.clone()))
    }
}

impl SchemaMapperTrait for SchemaMapper {
    fn map_contacts(&self, users: &[UserRecord]) -> MappedExtract {
        let len = users.len();
        let mut warnings = Vec::new();

        let ids = users
            .iter()
            .map(|u| {
                concat_or_warn(
                    CONTACTS_EXTRACT_NAME,
                    u.row_number,
                    target_columns::ID,
                    (columns::USER_LAST_NAME, u.last_name.as_ref()),
                    (columns::USER_FIRST_NAME, u.first_name.as_ref()),
                    &mut warnings,
                )
            })
            .collect();

        let table = ExtractBuilder::new(CONTACTS_EXTRACT_NAME)
            .column(target_columns::EMAIL, users.iter().map(|u| u.email.clone()).collect())
            .column(
                target_columns::CONTACT_TYPE,
                users
                    .iter()
                    .map(|u| self.map_contact_type(u.user_type.as_ref()))
                    .collect(),
            )
            .column(target_columns::LAST_NAME, users.iter().map(|u| u.last_name.clone()).collect())
            .column(target_columns::FIRST_NAME, users.iter().map(|u| u.first_name.clone()).collect())
            .column(target_columns::REGION, users.iter().map(|u| u.site_scope.clone()).collect())
            .column(target_columns::ID, ids)
            .null_column(target_columns::SITE_LOOKUP, len)
            .null_column(target_columns::ACCOUNT_ID, len)
            .column(target_columns::SITE_KEY, users.iter().map(|u| u.site_key.clone()).collect())
            .build(&target_columns::CONTACT_ALWAYS_KEEP);

        MappedExtract { table, warnings }
    }

    fn map_sites(&self, sites: &[SiteRecord]) -> MappedExtract {
        let len = sites.len();
        let mut warnings = Vec::new();

        let ids = sites
            .iter()
            .map(|s| {
                concat_or_warn(
                    SITES_EXTRACT_NAME,
                    s.row_number,
                    target_columns::ID,
                    (columns::SITE_ACCOUNT_NAME, s.account_name.as_ref()),
                    (columns::SITE_NAME, s.site_name.as_ref()),
                    &mut warnings,
                )
            })
            .collect();

        let table = ExtractBuilder::new(SITES_EXTRACT_NAME)
            .column(target_columns::ZIP, sites.iter().map(|s| s.postal_code.clone()).collect())
            .column(target_columns::CITY, sites.iter().map(|s| s.city.clone()).collect())
            .column(target_columns::STREET, sites.iter().map(|s| s.address.clone()).collect())
            .column(target_columns::NAME, sites.iter().map(|s| s.site_name.clone()).collect())
            .constant_column(
                target_columns::OPERATING_SITE,
                CellValue::text(OPERATING_SITE_VALUE),
                len,
            )
            .constant_column(target_columns::COUNTRY, CellValue::text(COUNTRY_VALUE), len)
            .column(
                target_columns::CUSTOMER_SITE_ID,
                sites.iter().map(|s| s.store_number.clone()).collect(),
            )
            .column(target_columns::SITE_KEY, sites.iter().map(|s| s.site_key.clone()).collect())
            .column(target_columns::REGION, sites.iter().map(|s| s.region.clone()).collect())
            .column(target_columns::ID, ids)
            .null_column(target_columns::ACCOUNT, len)
            .null_column(target_columns::ACCOUNTING_SYSTEM_SITE, len)
            .build(&target_columns::SITE_ALWAYS_KEEP);

        MappedExtract { table, warnings }
    }
}

/// "左 右" 拼接；任一侧为空则结果为空并记录警告
fn concat_or_warn(
    extract: &str,
    row_number: usize,
    column: &str,
    left: (&str, Option<&CellValue>),
    right: (&str, Option<&CellValue>),
    warnings: &mut Vec<NullPropagationWarning>,
) -> Option<CellValue> {
    match (left.1, right.1) {
        (Some(l), Some(r)) => Some(CellValue::Text(format!("{} {}", l, r))),
        _ => {
            let missing_inputs: Vec<String> = [left, right]
                .iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            warn!(
                extract,
                row_number,
                column,
                missing = ?missing_inputs,
                "拼接字段输入为空，结果置空"
            );
            warnings.push(NullPropagationWarning {
                extract: extract.to_string(),
                row_number,
                column: column.to_string(),
                missing_inputs,
            });
            None
        }
    }
}
