// ==========================================
// 客户门户导入预处理 - 冲突处理器实现
// ==========================================
// 职责: 整行去重 / CGR Chantier 同键合并或冲突 / Mail 冲突检测
// 策略:
// - 整行完全相同: 静默合并（保留首次出现）
// - 工地同键且其余列全部相同: 合并为一行
// - 工地同键但任一列不同: 冲突，整组保留并阻断
// - 用户同邮箱（整行去重后仍多于一行）: 冲突，阻断
// ==========================================

use crate::domain::site::{columns, DuplicateResolution, KeyConflict};
use crate::domain::table::{CellValue, SheetRow, SheetTable};
use crate::domain::types::ConflictKeyKind;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::site_importer_trait::{
    ConflictHandler as ConflictHandlerTrait, DataCleaner as _,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictHandler {
    cleaner: DataCleaner,
}

impl ConflictHandlerTrait for ConflictHandler {
    fn remove_exact_duplicates(&self, mut table: SheetTable) -> (SheetTable, usize) {
        let before = table.rows.len();
        let mut kept: Vec<SheetRow> = Vec::with_capacity(before);
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();

        for row in std::mem::take(&mut table.rows) {
            let bucket = buckets.entry(row.fingerprint()).or_default();
            if bucket.iter().any(|&i| kept[i].same_content(&row)) {
                continue;
            }
            bucket.push(kept.len());
            kept.push(row);
        }

        table.rows = kept;
        let removed = before - table.rows.len();

        if removed > 0 {
            debug!(sheet = %table.name, removed, "整行重复已删除");
        }
        (table, removed)
    }

    fn resolve_site_keys(
        &self,
        mut table: SheetTable,
    ) -> ImportResult<(SheetTable, Vec<KeyConflict>, usize)> {
        let key_idx = key_column(&table, columns::SITE_KEY)?;
        let groups = group_by_key(&table, key_idx, |v| self.cleaner.normalize_site_key(v));

        let mut conflicts = Vec::new();
        let mut dropped: HashSet<usize> = HashSet::new();

        for (key, members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
            let differing = differing_columns(&table, &members, Some(key_idx));
            if differing.is_empty() {
                // 同键同内容：保留首行
                dropped.extend(members.iter().skip(1).copied());
                debug!(key = %key, rows = members.len(), "同键同内容，合并为一行");
            } else {
                warn!(key = %key, columns = ?differing, "CGR Chantier 冲突");
                conflicts.push(KeyConflict {
                    kind: ConflictKeyKind::SiteKey,
                    key,
                    row_numbers: members.iter().map(|&i| table.rows[i].row_number).collect(),
                    differing_columns: differing,
                });
            }
        }

        let collapsed = dropped.len();
        if collapsed > 0 {
            let mut idx = 0;
            table.rows.retain(|_| {
                let keep = !dropped.contains(&idx);
                idx += 1;
                keep
            });
        }

        Ok((table, conflicts, collapsed))
    }

    fn detect_email_conflicts(&self, table: &SheetTable) -> ImportResult<Vec<KeyConflict>> {
        let key_idx = key_column(table, columns::USER_EMAIL)?;
        let groups = group_by_key(table, key_idx, |v| self.cleaner.normalize_email(v));
        warn_case_variants(&groups);

        let conflicts = groups
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(key, members)| {
                let differing = differing_columns(table, &members, Some(key_idx));
                warn!(email = %key, columns = ?differing, "邮箱冲突");
                KeyConflict {
                    kind: ConflictKeyKind::Email,
                    key,
                    row_numbers: members.iter().map(|&i| table.rows[i].row_number).collect(),
                    differing_columns: differing,
                }
            })
            .collect();

        Ok(conflicts)
    }

    fn resolve(&self, sites: SheetTable, users: SheetTable) -> ImportResult<DuplicateResolution> {
        // 工地表：整行去重 → 同键合并/冲突
        let (sites, site_exact_duplicates_removed) = self.remove_exact_duplicates(sites);
        let (sites, site_conflicts, collapsed_site_rows) = self.resolve_site_keys(sites)?;

        // 用户表：整行去重 → 邮箱冲突（不自动修复）
        let (users, user_exact_duplicates_removed) = self.remove_exact_duplicates(users);
        let email_conflicts = self.detect_email_conflicts(&users)?;

        Ok(DuplicateResolution {
            sites,
            users,
            site_conflicts,
            email_conflicts,
            site_exact_duplicates_removed,
            user_exact_duplicates_removed,
            collapsed_site_rows,
        })
    }
}

fn key_column(table: &SheetTable, column: &str) -> ImportResult<usize> {
    table
        .column_index(column)
        .ok_or_else(|| ImportError::MissingColumns {
            sheet: table.name.clone(),
            columns: vec![column.to_string()],
        })
}

/// 按归一化键分组，组顺序与组内行序均按首次出现
///
/// 键为空的行不参与分组
fn group_by_key<F>(table: &SheetTable, key_idx: usize, normalize: F) -> Vec<(String, Vec<usize>)>
where
    F: Fn(&CellValue) -> Option<String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let Some(key) = row.cell(key_idx).and_then(&normalize) else {
            continue;
        };
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(row_idx),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![row_idx]));
            }
        }
    }

    groups
}

/// 仅大小写不同的邮箱视为不同用户，只记录告警
fn warn_case_variants(groups: &[(String, Vec<usize>)]) {
    let mut variants: HashMap<String, Vec<&str>> = HashMap::new();
    for (key, _) in groups {
        variants.entry(key.to_lowercase()).or_default().push(key);
    }

    let mut folded: Vec<_> = variants.into_values().filter(|v| v.len() > 1).collect();
    folded.sort();
    for emails in folded {
        warn!(emails = ?emails, "邮箱仅大小写不同，按不同用户处理");
    }
}

/// 组内取值不一致的列（按表头顺序），skip 指定的列不比较
///
/// 任意两行有差异 ⇔ 并非所有行都与首行相同，因此结果与行序无关
fn differing_columns(table: &SheetTable, members: &[usize], skip: Option<usize>) -> Vec<String> {
    let Some((&first, rest)) = members.split_first() else {
        return Vec::new();
    };
    let first_row = &table.rows[first];

    table
        .headers
        .iter()
        .enumerate()
        .filter(|(col, _)| Some(*col) != skip)
        .filter(|(col, _)| {
            rest.iter()
                .any(|&i| table.rows[i].cell(*col) != first_row.cell(*col))
        })
        .map(|(_, header)| header.clone())
        .collect()
}
