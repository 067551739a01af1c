//! Run orchestration
//!
//! A run resolves the project folder, scans it for source folders and then
//! handles each folder in turn:
//!
//! 1. compute the output name `<folder>_<parent>.pdf`
//! 2. skip folders that would merge already-merged outputs
//! 3. list the sources and skip if the existing output is up to date,
//!    refreshing its secondary copy if that is missing or older
//! 4. plan the page order, merge, and copy the result to the secondary target
//!
//! Failing to resolve or scan the project aborts the run. A failure inside
//! one folder is recorded in the [`RunSummary`] and the run moves on; nothing
//! is written for that folder.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::JoinerConfig;
use crate::error::{Error, Result};
use crate::fs::{
    files_of_type_in_folder, is_up_to_date, matches_ignore_mask, most_recent_folder_with_prefix,
    subfolders_with_files_of_type,
};
use crate::pdf::{merge_pdfs, planned_page_count, MergeOptions};
use crate::project::{output_name, Project};

/// What happened to one source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// The output name carries the project identifier and the folder
    /// receives the merged outputs of its subfolders
    SelfReferential,
    /// The existing output is at least as new as every source, and so is
    /// its secondary copy
    UpToDate { output: PathBuf },
    /// Dry run: the output is up to date but its copy would be refreshed
    WouldCopy { output: PathBuf, copy: PathBuf },
    /// The output was up to date; its missing or older copy was replaced
    Copied { output: PathBuf, copy: PathBuf },
    /// Dry run: the folder would have been merged
    WouldMerge {
        output: PathBuf,
        copy: PathBuf,
        ordering: String,
        pages: usize,
    },
    /// The output was written and copied
    Merged {
        output: PathBuf,
        copy: PathBuf,
        ordering: String,
        pages: usize,
    },
}

/// Outcome for one folder
#[derive(Debug, Clone)]
pub struct FolderReport {
    pub folder: PathBuf,
    pub outcome: FolderOutcome,
}

/// A folder that could not be processed
#[derive(Debug)]
pub struct FolderFailure {
    pub folder: PathBuf,
    pub error: Error,
}

/// Result of a whole run
#[derive(Debug)]
pub struct RunSummary {
    pub project: Project,
    pub reports: Vec<FolderReport>,
    pub failures: Vec<FolderFailure>,
}

impl RunSummary {
    fn new(project: Project) -> Self {
        Self {
            project,
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Folders merged (or that would be, in a dry run)
    pub fn merged_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    FolderOutcome::Merged { .. } | FolderOutcome::WouldMerge { .. }
                )
            })
            .count()
    }

    /// Up-to-date outputs whose secondary copy was (or would be) refreshed
    pub fn copied_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    FolderOutcome::Copied { .. } | FolderOutcome::WouldCopy { .. }
                )
            })
            .count()
    }

    /// Folders left alone because their output was up to date
    pub fn up_to_date_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FolderOutcome::UpToDate { .. }))
            .count()
    }

    /// Outcome recorded for a folder, if it was processed successfully
    pub fn outcome_for(&self, folder: &Path) -> Option<&FolderOutcome> {
        self.reports
            .iter()
            .find(|r| r.folder == folder)
            .map(|r| &r.outcome)
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the join over a project tree
#[derive(Debug)]
pub struct Joiner {
    config: JoinerConfig,
}

impl Joiner {
    pub fn new(config: JoinerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JoinerConfig {
        &self.config
    }

    /// Find the project folder and its identifier
    ///
    /// An explicit `project` in the configuration wins; otherwise the most
    /// recently created folder under `root` starting with `prefix` is used.
    pub fn resolve_project(&self) -> Result<Project> {
        let config = &self.config;
        let folder = match &config.project {
            Some(folder) => {
                if !folder.is_dir() {
                    return Err(Error::FileNotFound(folder.clone()));
                }
                folder.clone()
            }
            None => {
                let not_found = || Error::ProjectFolderNotFound {
                    root: config.root.clone(),
                    prefix: config.prefix.clone(),
                };
                if !config.root.is_dir() {
                    return Err(not_found());
                }
                most_recent_folder_with_prefix(&config.root, &config.prefix)?
                    .ok_or_else(not_found)?
            }
        };

        Project::from_folder(&folder, &config.prefix)
    }

    /// Process every source folder of the project
    pub fn run(&self) -> Result<RunSummary> {
        let project = self.resolve_project()?;
        tracing::info!(
            project = %project.folder.display(),
            identifier = %project.identifier,
            dry_run = self.config.dry_run,
            "resolved project folder"
        );

        let folders = subfolders_with_files_of_type(
            &project.folder,
            &self.config.extension,
            &self.config.ignore_masks,
        )?;
        tracing::debug!(count = folders.len(), "found folders with source files");

        let mut summary = RunSummary::new(project);
        for folder in folders {
            match self.process_folder(&summary.project, &folder) {
                Ok(outcome) => summary.reports.push(FolderReport { folder, outcome }),
                Err(error) => {
                    tracing::error!(folder = %folder.display(), %error, "failed to join folder");
                    summary.failures.push(FolderFailure { folder, error });
                }
            }
        }

        tracing::info!(
            merged = summary.merged_count(),
            up_to_date = summary.up_to_date_count(),
            failed = summary.failures.len(),
            "run complete"
        );
        Ok(summary)
    }

    /// Decide on and, unless skipped, merge a single source folder
    pub fn process_folder(&self, project: &Project, folder: &Path) -> Result<FolderOutcome> {
        let config = &self.config;

        let name = output_name(folder);
        if project.is_marked(&name) && self.collects_merged_outputs(folder)? {
            tracing::debug!(folder = %folder.display(), "skipping folder of merged outputs");
            return Ok(FolderOutcome::SelfReferential);
        }

        let output = folder.parent().unwrap_or(folder).join(&name);
        let copy = config.secondary_target.join(&project.name).join(&name);

        let sources = files_of_type_in_folder(folder, &config.extension, &config.ignore_masks)?;

        let exists = output.is_file();
        if exists && !config.force && is_up_to_date(&output, &sources)? {
            if is_up_to_date(&copy, std::slice::from_ref(&output))? {
                tracing::debug!(output = %output.display(), "merged output is up to date");
                return Ok(FolderOutcome::UpToDate { output });
            }
            if config.dry_run {
                tracing::info!(copy = %copy.display(), "would refresh secondary copy");
                return Ok(FolderOutcome::WouldCopy { output, copy });
            }
            copy_to_secondary(&output, &copy)?;
            tracing::info!(copy = %copy.display(), "refreshed secondary copy");
            return Ok(FolderOutcome::Copied { output, copy });
        }

        let ordering = config.orderings.select(&sources);
        let plan = ordering.plan(&sources)?;
        let ordering = ordering.name().to_string();

        if config.dry_run {
            let pages = planned_page_count(&plan)?;
            tracing::info!(
                output = %output.display(),
                sources = sources.len(),
                pages,
                %ordering,
                "would merge"
            );
            return Ok(FolderOutcome::WouldMerge {
                output,
                copy,
                ordering,
                pages,
            });
        }

        if exists {
            tracing::info!(output = %output.display(), "rebuilding stale merged output");
        }
        let pages = merge_pdfs(&MergeOptions {
            plan,
            output_path: output.clone(),
        })?;
        tracing::info!(
            output = %output.display(),
            sources = sources.len(),
            pages,
            %ordering,
            "merged"
        );

        copy_to_secondary(&output, &copy)?;
        tracing::debug!(copy = %copy.display(), "copied merged output");

        Ok(FolderOutcome::Merged {
            output,
            copy,
            ordering,
            pages,
        })
    }

    /// True if a direct subfolder is itself a source folder
    ///
    /// Merged outputs are written next to their source folder, so such a
    /// folder holds the merged outputs of its children.
    fn collects_merged_outputs(&self, folder: &Path) -> Result<bool> {
        let config = &self.config;
        for entry in fs::read_dir(folder)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if !path.is_dir() || matches_ignore_mask(&name, &config.ignore_masks) {
                continue;
            }
            let sources = files_of_type_in_folder(&path, &config.extension, &config.ignore_masks)?;
            if !sources.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn copy_to_secondary(output: &Path, copy: &Path) -> Result<()> {
    if let Some(copy_dir) = copy.parent() {
        fs::create_dir_all(copy_dir)?;
    }
    fs::copy(output, copy)?;
    Ok(())
}
