// ==========================================
// 客户门户导入预处理 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 流水线阶段 (Pipeline Stage)
// ==========================================
// Loaded → Deduplicated → {Aborted | Audited → Mapped → Bundled}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Loaded,       // 工作表已读取
    Deduplicated, // 去重完成
    Aborted,      // 存在未解决冲突，终止
    Audited,      // 缺失审计完成
    Mapped,       // 目标结构映射完成
    Bundled,      // 输出文件生成完成
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Loaded => write!(f, "LOADED"),
            PipelineStage::Deduplicated => write!(f, "DEDUPLICATED"),
            PipelineStage::Aborted => write!(f, "ABORTED"),
            PipelineStage::Audited => write!(f, "AUDITED"),
            PipelineStage::Mapped => write!(f, "MAPPED"),
            PipelineStage::Bundled => write!(f, "BUNDLED"),
        }
    }
}

// ==========================================
// 冲突键类型 (Conflict Key Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKeyKind {
    SiteKey, // CGR Chantier
    Email,   // Mail
}

impl fmt::Display for ConflictKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKeyKind::SiteKey => write!(f, "CGR Chantier"),
            ConflictKeyKind::Email => write!(f, "Mail"),
        }
    }
}

// ==========================================
// 输出文件类型 (Artifact Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    MissingSites,    // 缺失信息的工地
    MissingUsers,    // 缺失信息的用户
    ContactsExtract, // 批量创建联系人
    SitesExtract,    // 批量创建工地
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::MissingSites,
        ArtifactKind::MissingUsers,
        ArtifactKind::ContactsExtract,
        ArtifactKind::SitesExtract,
    ];

    /// 默认输出文件名
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ArtifactKind::MissingSites => "Sites_plus_infos_manquantes.xlsx",
            ArtifactKind::MissingUsers => "Contacts_plus_infos_manquantes.xlsx",
            ArtifactKind::ContactsExtract => "Creer_contacts_en_masse_resultat.xlsx",
            ArtifactKind::SitesExtract => "Creer_sites_en_masse_resultat.xlsx",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::MissingSites => write!(f, "missing_sites"),
            ArtifactKind::MissingUsers => write!(f, "missing_users"),
            ArtifactKind::ContactsExtract => write!(f, "contacts_extract"),
            ArtifactKind::SitesExtract => write!(f, "sites_extract"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            ArtifactKind::ALL.iter().map(|k| k.default_file_name()).collect();
        assert_eq!(names.len(), 4);
    }
}
