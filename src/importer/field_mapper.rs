// ==========================================
// 客户门户导入预处理 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 类型化记录（SiteRecord / UserRecord）
// ==========================================

use crate::domain::site::{columns, SiteRecord, UserRecord};
use crate::domain::table::{CellValue, SheetRow, SheetTable};
use crate::importer::site_importer_trait::FieldMapper as FieldMapperTrait;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_site_record(&self, table: &SheetTable, row: &SheetRow) -> SiteRecord {
        SiteRecord {
            // 地址信息
            postal_code: self.get_value(table, row, columns::SITE_POSTAL_CODE),
            city: self.get_value(table, row, columns::SITE_CITY),
            address: self.get_value(table, row, columns::SITE_ADDRESS),

            // 工地标识
            site_name: self.get_value(table, row, columns::SITE_NAME),
            site_key: self.get_value(table, row, columns::SITE_KEY),
            store_number: self.get_value(table, row, columns::SITE_STORE_NUMBER),

            // 归属
            region: self.get_value(table, row, columns::SITE_REGION),
            account_name: self.get_value(table, row, columns::SITE_ACCOUNT_NAME),

            row_number: row.row_number,
        }
    }

    fn map_to_user_record(&self, table: &SheetTable, row: &SheetRow) -> UserRecord {
        UserRecord {
            email: self.get_value(table, row, columns::USER_EMAIL),
            user_type: self.get_value(table, row, columns::USER_TYPE),
            last_name: self.get_value(table, row, columns::USER_LAST_NAME),
            first_name: self.get_value(table, row, columns::USER_FIRST_NAME),
            site_scope: self.get_value(table, row, columns::USER_SITE_SCOPE),
            // 源表无此列时为 None
            site_key: self.get_value(table, row, columns::USER_SITE_KEY),

            row_number: row.row_number,
        }
    }
}

impl FieldMapper {
    fn get_value(&self, table: &SheetTable, row: &SheetRow, column: &str) -> Option<CellValue> {
        table.value(row, column).cloned()
    }
}
