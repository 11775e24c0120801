// ==========================================
// 客户门户导入预处理 - 领域模型层
// ==========================================
// 职责: 定义表格模型、工地/用户记录、报告与结果类型
// 红线: 不含文件读写逻辑,不含校验/映射逻辑
// ==========================================

pub mod site;
pub mod table;
pub mod types;

// 重导出核心类型
pub use site::{
    columns, ConflictReport, DuplicateResolution, KeyConflict, MissingInfoReport, MissingRow,
    NullPropagationWarning, OutputArtifact, ProcessOutcome, ProcessSummary, ResultBundle,
    SiteRecord, UserRecord,
};
pub use table::{CellValue, SheetRow, SheetTable};
pub use types::{ArtifactKind, ConflictKeyKind, PipelineStage};
