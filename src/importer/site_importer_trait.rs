// ==========================================
// 客户门户导入预处理 - 导入流水线 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 流程: 读取 → 去重 → 缺失审计 → 冲突闸门 → 映射 → 输出
// ==========================================

use crate::domain::site::{
    DuplicateResolution, KeyConflict, MissingInfoReport, ProcessOutcome, ResultBundle, SiteRecord,
    UserRecord,
};
use crate::domain::table::{CellValue, SheetRow, SheetTable};
use crate::importer::dq_validator::RequiredColumns;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{WorkbookSheets, WorkbookSource};
use crate::importer::schema_mapper::MappedExtract;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// SiteImporter Trait
// ==========================================
// 用途: 流水线主接口
// 实现者: SiteImporterImpl
#[async_trait]
pub trait SiteImporter: Send + Sync {
    /// 处理一个工作簿来源（路径或内存字节）
    ///
    /// # 返回
    /// - Ok(ProcessOutcome): 四个输出文件 + 统计
    /// - Err(ImportError::DuplicateConflict): 存在未解决冲突，无输出
    /// - Err(其他): 文件/工作表读取失败
    ///
    /// # 流程
    /// 1. 读取两张工作表
    /// 2. 整行去重 + 键冲突检测
    /// 3. 缺失信息审计
    /// 4. 冲突闸门
    /// 5. 目标结构映射
    /// 6. 输出文件生成
    fn process(&self, source: WorkbookSource) -> ImportResult<ProcessOutcome>;

    /// 从 Excel 文件处理
    fn import_from_excel(&self, file_path: &Path) -> ImportResult<ProcessOutcome> {
        self.process(WorkbookSource::Path(file_path.to_path_buf()))
    }

    /// 从上传的 .xlsx 字节处理
    fn import_from_bytes(&self, bytes: Vec<u8>) -> ImportResult<ProcessOutcome> {
        self.process(WorkbookSource::Bytes(bytes))
    }

    /// 批量处理多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件独立处理，互不共享中间状态
    /// - 某个文件失败不影响其他文件
    /// - 结果顺序与入参一致
    async fn batch_process(
        &self,
        file_paths: Vec<PathBuf>,
    ) -> Vec<(PathBuf, ImportResult<ProcessOutcome>)>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 读取工作簿中的工地表与用户表
// 实现者: ExcelParser
pub trait FileParser: Send + Sync {
    /// 读取两张指定名称的工作表，并校验必需表头
    fn parse_workbook(
        &self,
        source: &WorkbookSource,
        sites_sheet: &str,
        users_sheet: &str,
    ) -> ImportResult<WorkbookSheets>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源行 → 类型化记录
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    fn map_to_site_record(&self, table: &SheetTable, row: &SheetRow) -> SiteRecord;

    fn map_to_user_record(&self, table: &SheetTable, row: &SheetRow) -> UserRecord;

    /// 整表映射为工地记录（保持行序）
    fn map_site_table(&self, table: &SheetTable) -> Vec<SiteRecord> {
        table
            .rows
            .iter()
            .map(|row| self.map_to_site_record(table, row))
            .collect()
    }

    /// 整表映射为用户记录（保持行序）
    fn map_user_table(&self, table: &SheetTable) -> Vec<UserRecord> {
        table
            .rows
            .iter()
            .map(|row| self.map_to_user_record(table, row))
            .collect()
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本清洗与去重键归一化
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 工地键归一化（TRIM，空 → None）
    fn normalize_site_key(&self, value: &CellValue) -> Option<String>;

    /// 邮箱归一化（TRIM + 小写，空 → None）
    fn normalize_email(&self, value: &CellValue) -> Option<String>;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 整行去重 + 键冲突检测/合并
// 实现者: ConflictHandlerImpl
pub trait ConflictHandler: Send + Sync {
    /// 删除整行完全相同的记录（保留首次出现）
    ///
    /// # 返回
    /// - (去重后的表, 删除行数)
    fn remove_exact_duplicates(&self, table: SheetTable) -> (SheetTable, usize);

    /// 按 CGR Chantier 分组：同内容合并，不同内容记为冲突
    ///
    /// # 返回
    /// - (处理后的表, 冲突列表, 合并掉的行数)
    fn resolve_site_keys(
        &self,
        table: SheetTable,
    ) -> ImportResult<(SheetTable, Vec<KeyConflict>, usize)>;

    /// 按 Mail 分组：多于一行即冲突（不自动修复）
    fn detect_email_conflicts(&self, table: &SheetTable) -> ImportResult<Vec<KeyConflict>>;

    /// 两张表的完整去重流程
    fn resolve(&self, sites: SheetTable, users: SheetTable) -> ImportResult<DuplicateResolution>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 缺失信息审计
// 实现者: DqValidatorImpl
pub trait DqValidator: Send + Sync {
    /// 单行缺失的必填列
    fn missing_columns(
        &self,
        table: &SheetTable,
        row: &SheetRow,
        required: &[String],
    ) -> Vec<String>;

    /// 生成缺失报告（仅含缺失数 > 0 的行，按缺失数稳定降序）
    fn audit(&self, table: &SheetTable, required: &RequiredColumns) -> MissingInfoReport;
}

// ==========================================
// SchemaMapper Trait
// ==========================================
// 用途: 记录 → CRM 批量导入结构
// 实现者: SchemaMapperImpl
pub trait SchemaMapper: Send + Sync {
    fn map_contacts(&self, users: &[UserRecord]) -> MappedExtract;

    fn map_sites(&self, sites: &[SiteRecord]) -> MappedExtract;
}

// ==========================================
// ResultBundler Trait
// ==========================================
// 用途: 表 → .xlsx 字节流
// 实现者: ResultBundlerImpl
pub trait ResultBundler: Send + Sync {
    /// 单表序列化为单工作表 .xlsx
    fn write_table(&self, table: &SheetTable) -> ImportResult<Vec<u8>>;

    /// 四个输出文件打包
    fn bundle(
        &self,
        missing_sites: &SheetTable,
        missing_users: &SheetTable,
        contacts: &SheetTable,
        sites: &SheetTable,
    ) -> ImportResult<ResultBundle>;
}
