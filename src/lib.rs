// ==========================================
// 客户门户导入预处理 - 核心库
// ==========================================
// 输入: 含工地表与用户表的 Excel 工作簿
// 输出: 两份缺失信息报告 + 两份 CRM 批量导入文件
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格模型与记录
pub mod domain;

// 导入层 - 流水线各阶段
pub mod importer;

// 配置层 - 工作表名/映射/输出文件名
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ArtifactKind, ConflictKeyKind, PipelineStage};

// 领域实体
pub use domain::{
    CellValue, ConflictReport, KeyConflict, MissingInfoReport, NullPropagationWarning,
    OutputArtifact, ProcessOutcome, ProcessSummary, ResultBundle, SheetRow, SheetTable,
    SiteRecord, UserRecord,
};

// 导入流水线
pub use importer::{ImportError, ImportResult, SiteImporter, SiteImporterImpl, WorkbookSource};

// 配置
pub use config::{ConfigManager, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "客户门户导入预处理";
