// ==========================================
// 客户门户导入预处理 - 配置层
// ==========================================
// 职责: 工作表名、必填列、类型映射、输出文件名
// 存储: 内置默认值 + 可选 JSON 配置文件
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
