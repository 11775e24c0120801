// ==========================================
// 客户门户导入预处理 - 导入流水线实现
// ==========================================
// 职责: 整合导入流程，从工作簿到四个输出文件
// 流程: 读取 → 去重 → 冲突闸门 → 缺失审计 → 映射 → 输出
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::site::{ProcessOutcome, ProcessSummary};
use crate::domain::types::{ArtifactKind, PipelineStage};
use crate::importer::conflict_handler::ConflictHandler as ConflictHandlerImpl;
use crate::importer::dq_validator::{DqValidator as DqValidatorImpl, RequiredColumns};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{ExcelParser, WorkbookSource};
use crate::importer::result_bundler::ResultBundler as ResultBundlerImpl;
use crate::importer::schema_mapper::SchemaMapper as SchemaMapperImpl;
use crate::importer::site_importer_trait::{
    ConflictHandler, DqValidator, FieldMapper, FileParser, ResultBundler, SchemaMapper,
    SiteImporter,
};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SiteImporterImpl - 导入流水线实现
// ==========================================
pub struct SiteImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 配置读取器
    config: Arc<C>,

    // 流水线组件
    file_parser: Arc<dyn FileParser>,
    field_mapper: Arc<dyn FieldMapper>,
    conflict_handler: Arc<dyn ConflictHandler>,
    dq_validator: Arc<dyn DqValidator>,
    schema_mapper: Arc<dyn SchemaMapper>,
    result_bundler: Arc<dyn ResultBundler>,
}

impl<C> Clone for SiteImporterImpl<C>
where
    C: ImportConfigReader,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            file_parser: Arc::clone(&self.file_parser),
            field_mapper: Arc::clone(&self.field_mapper),
            conflict_handler: Arc::clone(&self.conflict_handler),
            dq_validator: Arc::clone(&self.dq_validator),
            schema_mapper: Arc::clone(&self.schema_mapper),
            result_bundler: Arc::clone(&self.result_bundler),
        }
    }
}

impl<C> SiteImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 创建新的 SiteImporter 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - file_parser: 工作簿读取器
    /// - field_mapper: 字段映射器
    /// - conflict_handler: 去重/冲突处理器
    /// - dq_validator: 缺失信息审计器
    /// - schema_mapper: 目标结构映射器
    /// - result_bundler: 输出文件生成器
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: C,
        file_parser: Arc<dyn FileParser>,
        field_mapper: Arc<dyn FieldMapper>,
        conflict_handler: Arc<dyn ConflictHandler>,
        dq_validator: Arc<dyn DqValidator>,
        schema_mapper: Arc<dyn SchemaMapper>,
        result_bundler: Arc<dyn ResultBundler>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            file_parser,
            field_mapper,
            conflict_handler,
            dq_validator,
            schema_mapper,
            result_bundler,
        }
    }

    /// 使用内置组件创建，类型映射与输出文件名取自配置
    pub fn with_defaults(config: C) -> Self {
        let schema_mapper = SchemaMapperImpl::new(config.contact_type_mapping());
        let file_names = ArtifactKind::ALL
            .iter()
            .map(|kind| (*kind, config.output_file_name(*kind)))
            .collect();

        Self::new(
            config,
            Arc::new(ExcelParser::default()),
            Arc::new(FieldMapperImpl),
            Arc::new(ConflictHandlerImpl::default()),
            Arc::new(DqValidatorImpl),
            Arc::new(schema_mapper),
            Arc::new(ResultBundlerImpl::new(file_names)),
        )
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

// ==========================================
// SiteImporter Trait 实现
// ==========================================
#[async_trait]
impl<C> SiteImporter for SiteImporterImpl<C>
where
    C: ImportConfigReader + 'static,
{
    #[instrument(skip(self, source), fields(batch_id))]
    fn process(&self, source: WorkbookSource) -> ImportResult<ProcessOutcome> {
        let start_time = Instant::now();
        let processed_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        info!(batch_id = %batch_id, source = %source, "开始处理工作簿");

        // === 步骤 1: 读取工作表 ===
        let sheets = self
            .file_parser
            .parse_workbook(
                &source,
                &self.config.sites_sheet_name(),
                &self.config.users_sheet_name(),
            )
            .map_err(|e| {
                error!(error = %e, "工作簿读取失败");
                e
            })?;

        let site_rows = sheets.sites.len();
        let user_rows = sheets.users.len();
        info!(
            stage = %PipelineStage::Loaded,
            site_rows = site_rows,
            user_rows = user_rows,
            "工作表读取完成"
        );

        // === 步骤 2: 去重与冲突检测 ===
        let resolution = self.conflict_handler.resolve(sheets.sites, sheets.users)?;
        info!(
            stage = %PipelineStage::Deduplicated,
            sites = resolution.sites.len(),
            users = resolution.users.len(),
            site_conflicts = resolution.site_conflicts.len(),
            email_conflicts = resolution.email_conflicts.len(),
            "去重完成"
        );

        // === 步骤 3: 冲突闸门 ===
        if resolution.conflicts_found() {
            let report = resolution.conflict_report();
            warn!(
                stage = %PipelineStage::Aborted,
                site_keys = ?report.site_keys(),
                emails = ?report.emails(),
                "存在未解决的重复键，终止处理"
            );
            return Err(ImportError::DuplicateConflict(report));
        }

        // === 步骤 4: 缺失信息审计 ===
        let site_required = RequiredColumns::Columns(self.config.site_required_columns());
        let missing_sites = self.dq_validator.audit(&resolution.sites, &site_required);
        let missing_users = self
            .dq_validator
            .audit(&resolution.users, &RequiredColumns::AllColumns);
        info!(
            stage = %PipelineStage::Audited,
            sites_with_missing_info = missing_sites.len(),
            users_with_missing_info = missing_users.len(),
            "缺失信息审计完成"
        );

        // === 步骤 5: 目标结构映射 ===
        debug!("字段映射");
        let site_records = self.field_mapper.map_site_table(&resolution.sites);
        let user_records = self.field_mapper.map_user_table(&resolution.users);

        let contacts = self.schema_mapper.map_contacts(&user_records);
        let sites = self.schema_mapper.map_sites(&site_records);

        let mut warnings = contacts.warnings;
        warnings.extend(sites.warnings);
        info!(
            stage = %PipelineStage::Mapped,
            contacts = contacts.table.len(),
            sites = sites.table.len(),
            warnings = warnings.len(),
            "目标结构映射完成"
        );

        // === 步骤 6: 输出文件 ===
        let missing_sites_table = missing_sites.to_table();
        let missing_users_table = missing_users.to_table();
        let bundle = self.result_bundler.bundle(
            &missing_sites_table,
            &missing_users_table,
            &contacts.table,
            &sites.table,
        )?;

        let summary = ProcessSummary {
            site_rows,
            user_rows,
            site_exact_duplicates_removed: resolution.site_exact_duplicates_removed,
            user_exact_duplicates_removed: resolution.user_exact_duplicates_removed,
            collapsed_site_rows: resolution.collapsed_site_rows,
            sites_with_missing_info: missing_sites.len(),
            users_with_missing_info: missing_users.len(),
            contacts_exported: contacts.table.len(),
            sites_exported: sites.table.len(),
            null_propagation_warnings: warnings.len(),
        };

        let elapsed = start_time.elapsed();
        info!(
            stage = %PipelineStage::Bundled,
            batch_id = %batch_id,
            elapsed_ms = elapsed.as_millis() as u64,
            "处理完成"
        );

        Ok(ProcessOutcome {
            batch_id,
            processed_at,
            elapsed,
            summary,
            missing_sites,
            missing_users,
            contacts: contacts.table,
            sites: sites.table,
            warnings,
            bundle,
        })
    }

    async fn batch_process(
        &self,
        file_paths: Vec<PathBuf>,
    ) -> Vec<(PathBuf, ImportResult<ProcessOutcome>)> {
        info!(count = file_paths.len(), "开始批量处理文件");

        // 每个文件一个阻塞任务
        let tasks = file_paths.into_iter().map(|path| {
            let importer = self.clone();
            async move {
                let task_path = path.clone();
                let result =
                    tokio::task::spawn_blocking(move || importer.import_from_excel(&task_path))
                        .await
                        .unwrap_or_else(|e| {
                            Err(ImportError::InternalError(format!("处理任务异常退出: {}", e)))
                        });

                match &result {
                    Ok(outcome) => info!(
                        file = %path.display(),
                        batch_id = %outcome.batch_id,
                        "文件处理成功"
                    ),
                    Err(e) => error!(file = %path.display(), error = %e, "文件处理失败"),
                }
                (path, result)
            }
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|(_, r)| r.is_ok()).count(),
            failed = results.iter().filter(|(_, r)| r.is_err()).count(),
            "批量处理完成"
        );

        results
    }
}
