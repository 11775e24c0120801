// ==========================================
// 客户门户导入预处理 - 导入层
// ==========================================
// 职责: 工作簿读取、去重、缺失审计、目标结构映射、输出
// 支持: Excel (.xlsx/.xlsm/.xls)，路径或内存字节
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod result_bundler;
pub mod schema_mapper;
pub mod site_importer_impl;
pub mod site_importer_trait;

// 重导出核心类型
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dq_validator::{DqValidator as DqValidatorImpl, RequiredColumns};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{ExcelParser, WorkbookSheets, WorkbookSource};
pub use result_bundler::ResultBundler as ResultBundlerImpl;
pub use schema_mapper::{ExtractBuilder, MappedExtract, SchemaMapper as SchemaMapperImpl};
pub use site_importer_impl::SiteImporterImpl;

// 重导出 Trait 接口
pub use site_importer_trait::{
    ConflictHandler, DataCleaner, DqValidator, FieldMapper, FileParser, ResultBundler,
    SchemaMapper, SiteImporter,
};
