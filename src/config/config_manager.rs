// ==========================================
// 客户门户导入预处理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源: 内置默认值，可由 JSON 文档覆写任意子集
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::site::columns;
use crate::domain::types::ArtifactKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema_mapper::default_contact_types;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_SITES_SHEET: &str = "Liste des sites avec adresses";
pub const DEFAULT_USERS_SHEET: &str = "Liste des utilisateurs clients";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    sites_sheet: String,
    users_sheet: String,
    site_required_columns: Vec<String>,
    contact_types: Vec<(String, String)>,
    output_file_names: HashMap<ArtifactKind, String>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            sites_sheet: DEFAULT_SITES_SHEET.to_string(),
            users_sheet: DEFAULT_USERS_SHEET.to_string(),
            site_required_columns: columns::SITE_AUDIT_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            contact_types: default_contact_types(),
            output_file_names: ArtifactKind::ALL
                .iter()
                .map(|kind| (*kind, kind.default_file_name().to_string()))
                .collect(),
        }
    }
}

impl ConfigManager {
    /// 从 JSON 文件加载（未出现的键使用默认值）
    pub fn from_json_file(path: &Path) -> ImportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(config)
    }

    /// 从 JSON 字符串加载
    ///
    /// # 说明
    /// - 顶层必须是对象
    /// - 未知键忽略
    /// - 已知键类型错误 → ConfigValueError
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let document: Value = serde_json::from_str(raw)?;
        let object = document.as_object().ok_or_else(|| ImportError::ConfigValueError {
            key: "<document>".to_string(),
            value: document.to_string(),
            message: "顶层必须是 JSON 对象".to_string(),
        })?;

        let mut config = Self::default();
        config.apply(object)?;
        Ok(config)
    }

    fn apply(&mut self, object: &Map<String, Value>) -> ImportResult<()> {
        for (key, value) in object {
            match key.as_str() {
                config_keys::SITES_SHEET_NAME => self.sites_sheet = expect_string(key, value)?,
                config_keys::USERS_SHEET_NAME => self.users_sheet = expect_string(key, value)?,
                config_keys::SITE_REQUIRED_COLUMNS => {
                    self.site_required_columns = expect_string_array(key, value)?
                }
                config_keys::CONTACT_TYPE_MAPPING => {
                    self.contact_types = expect_string_map(key, value)?
                }
                config_keys::OUTPUT_FILE_NAMES => {
                    for (kind_key, name) in expect_string_map(key, value)? {
                        let kind = artifact_kind_from_key(&kind_key).ok_or_else(|| {
                            ImportError::ConfigValueError {
                                key: format!("{}.{}", key, kind_key),
                                value: name.clone(),
                                message: "未知的输出文件类型".to_string(),
                            }
                        })?;
                        self.output_file_names.insert(kind, name);
                    }
                }
                _ => debug!(config_key = %key, "忽略未知配置键"),
            }
        }
        Ok(())
    }
}

fn value_error(key: &str, value: &Value, expected: &str) -> ImportError {
    ImportError::ConfigValueError {
        key: key.to_string(),
        value: value.to_string(),
        message: format!("期望 {}", expected),
    }
}

fn expect_string(key: &str, value: &Value) -> ImportResult<String> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| value_error(key, value, "字符串"))
}

fn expect_string_array(key: &str, value: &Value) -> ImportResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| value_error(key, value, "字符串数组"))?;
    items
        .iter()
        .map(|item| expect_string(key, item))
        .collect()
}

fn expect_string_map(key: &str, value: &Value) -> ImportResult<Vec<(String, String)>> {
    let object = value
        .as_object()
        .ok_or_else(|| value_error(key, value, "字符串到字符串的对象"))?;
    object
        .iter()
        .map(|(k, v)| Ok((k.clone(), expect_string(&format!("{}.{}", key, k), v)?)))
        .collect()
}

fn artifact_kind_from_key(key: &str) -> Option<ArtifactKind> {
    ArtifactKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.to_string() == key)
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
impl ImportConfigReader for ConfigManager {
    fn sites_sheet_name(&self) -> String {
        self.sites_sheet.clone()
    }

    fn users_sheet_name(&self) -> String {
        self.users_sheet.clone()
    }

    fn site_required_columns(&self) -> Vec<String> {
        self.site_required_columns.clone()
    }

    fn contact_type_mapping(&self) -> Vec<(String, String)> {
        self.contact_types.clone()
    }

    fn output_file_name(&self, kind: ArtifactKind) -> String {
        self.output_file_names
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_file_name().to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 工作表
    pub const SITES_SHEET_NAME: &str = "sites_sheet_name";
    pub const USERS_SHEET_NAME: &str = "users_sheet_name";

    // 数据质量
    pub const SITE_REQUIRED_COLUMNS: &str = "site_required_columns";

    // 映射
    pub const CONTACT_TYPE_MAPPING: &str = "contact_type_mapping"; // {"源值": "目标值"}

    // 输出（子键: missing_sites / missing_users / contacts_extract / sites_extract）
    pub const OUTPUT_FILE_NAMES: &str = "output_file_names";
}
