// ==========================================
// 客户门户导入预处理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流水线所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::ArtifactKind;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入流水线所需的配置读取接口
// 实现者: ConfigManager（内置默认值 + JSON 覆写）
pub trait ImportConfigReader: Send + Sync {
    // ===== 工作表 =====

    /// 工地表名称
    ///
    /// # 默认值
    /// - "Liste des sites avec adresses"
    fn sites_sheet_name(&self) -> String;

    /// 用户表名称
    ///
    /// # 默认值
    /// - "Liste des utilisateurs clients"
    fn users_sheet_name(&self) -> String;

    // ===== 数据质量 =====

    /// 工地缺失审计的必填列
    ///
    /// # 默认值
    /// - 工地表除 "Nom du compte (sur Salesforce)" 外的 7 列
    ///
    /// # 说明
    /// - 用户表始终按全部列审计，不可配置
    fn site_required_columns(&self) -> Vec<String>;

    // ===== 目标结构映射 =====

    /// 用户类型 → Contact_Type__c 映射表
    ///
    /// # 返回
    /// - Vec<(源值, 目标值)>，按顺序匹配
    fn contact_type_mapping(&self) -> Vec<(String, String)>;

    // ===== 输出 =====

    /// 输出文件名
    fn output_file_name(&self, kind: ArtifactKind) -> String;
}
