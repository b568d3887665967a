// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace configuration: the YAML schema loaded from `lumenflow.yaml`.

use crate::error::LfError;
use crate::lane::LaneDef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_wu_dir() -> PathBuf {
    PathBuf::from("wus")
}

fn default_stamps_dir() -> PathBuf {
    PathBuf::from("stamps")
}

fn default_signals_path() -> PathBuf {
    PathBuf::from("signals.jsonl")
}

fn default_receipts_path() -> PathBuf {
    PathBuf::from("signal-receipts.jsonl")
}

fn default_delegations_path() -> PathBuf {
    PathBuf::from("delegations.jsonl")
}

fn default_event_log_path() -> PathBuf {
    PathBuf::from("events.jsonl")
}

fn default_backlog_path() -> PathBuf {
    PathBuf::from("BACKLOG.md")
}

fn default_status_path() -> PathBuf {
    PathBuf::from("STATUS.md")
}

fn default_locks_dir() -> PathBuf {
    PathBuf::from("locks")
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_ai_dir() -> PathBuf {
    PathBuf::from("ai")
}

fn default_claude_dir() -> PathBuf {
    PathBuf::from(".claude")
}

fn default_memory_bank_dir() -> PathBuf {
    PathBuf::from("memory-bank")
}

/// How a claimed WU's changes are isolated while `in_progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    Worktree,
    BranchPr,
    BranchOnly,
}

impl Default for MergeMode {
    fn default() -> Self {
        MergeMode::Worktree
    }
}

/// Exponential backoff-with-jitter parameters for the push-retry protocol,
/// grounded on the same shape a shipping pipeline uses for flaky uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "RetryConfig::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "RetryConfig::default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "RetryConfig::default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "RetryConfig::default_jitter_fraction")]
    pub jitter_fraction: f64,
}

impl RetryConfig {
    fn default_max_attempts() -> u32 {
        3
    }
    fn default_base_delay_ms() -> u64 {
        100
    }
    fn default_max_delay_ms() -> u64 {
        1_000
    }
    fn default_jitter_fraction() -> f64 {
        0.2
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            base_delay_ms: Self::default_base_delay_ms(),
            max_delay_ms: Self::default_max_delay_ms(),
            jitter_fraction: Self::default_jitter_fraction(),
        }
    }
}

/// One rung of the escalation ladder (C11).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationStep {
    pub after_failures: u32,
    pub action: EscalationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    Retry,
    Block,
    HumanEscalate,
}

fn default_escalation_ladder() -> Vec<EscalationStep> {
    vec![
        EscalationStep { after_failures: 1, action: EscalationAction::Retry },
        EscalationStep { after_failures: 3, action: EscalationAction::Block },
        EscalationStep { after_failures: 5, action: EscalationAction::HumanEscalate },
    ]
}

/// `lanes:` section of workspace config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanesConfig {
    #[serde(default)]
    pub definitions: Vec<LaneDef>,
}

/// `merge:` section of workspace config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub mode: MergeMode,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Whether a remote named `origin` is required. `false` routes every
    /// micro-worktree merge through a purely local ref fast-forward instead
    /// of a network push (spec §6's `requireRemote`).
    #[serde(default = "MergeConfig::default_require_remote")]
    pub require_remote: bool,
    #[serde(default = "MergeConfig::default_main_branch")]
    pub main_branch: String,
    /// Prefix for the deterministic per-WU feature branch name used by
    /// branch-PR claim mode (`<prefix>/WU-<n>`).
    #[serde(default = "MergeConfig::default_branch_prefix")]
    pub branch_prefix: String,
}

impl MergeConfig {
    fn default_require_remote() -> bool {
        true
    }

    fn default_main_branch() -> String {
        "main".to_string()
    }

    fn default_branch_prefix() -> String {
        "wu".to_string()
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            mode: MergeMode::default(),
            retry: RetryConfig::default(),
            require_remote: Self::default_require_remote(),
            main_branch: Self::default_main_branch(),
            branch_prefix: Self::default_branch_prefix(),
        }
    }
}

/// `delegation:` section of workspace config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationConfig {
    #[serde(default = "DelegationConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_delegations_path")]
    pub log_path: PathBuf,
    /// Minutes a delegation may sit `pending` before the monitor (C9)
    /// reports it as stuck.
    #[serde(default = "DelegationConfig::default_stuck_threshold_minutes")]
    pub stuck_threshold_minutes: u64,
}

impl DelegationConfig {
    fn default_timeout_secs() -> u64 {
        3600
    }

    fn default_stuck_threshold_minutes() -> u64 {
        30
    }
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            log_path: default_delegations_path(),
            stuck_threshold_minutes: Self::default_stuck_threshold_minutes(),
        }
    }
}

/// `signals:` section of workspace config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalsConfig {
    #[serde(default = "default_signals_path")]
    pub path: PathBuf,
    #[serde(default = "default_receipts_path")]
    pub receipts_path: PathBuf,
    /// How long an unread signal survives cleanup.
    #[serde(default = "SignalsConfig::default_unread_ttl_secs")]
    pub unread_ttl_secs: u64,
    /// How long a read signal survives cleanup — shorter than
    /// `unread_ttl_secs` since its receipt already proves it was seen.
    #[serde(default = "SignalsConfig::default_read_ttl_secs")]
    pub read_ttl_secs: u64,
}

impl SignalsConfig {
    fn default_unread_ttl_secs() -> u64 {
        30 * 24 * 60 * 60
    }

    fn default_read_ttl_secs() -> u64 {
        7 * 24 * 60 * 60
    }
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            path: default_signals_path(),
            receipts_path: default_receipts_path(),
            unread_ttl_secs: Self::default_unread_ttl_secs(),
            read_ttl_secs: Self::default_read_ttl_secs(),
        }
    }
}

/// `directories:` section of workspace config (spec §6). Mirrors the flat
/// `wu_dir`/`backlog_path`/`status_path` fields below for the paths both
/// shapes name, plus the auxiliary doc/agent-memory directories that have
/// no flat equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoriesConfig {
    #[serde(default = "default_wu_dir", rename = "wuDir")]
    pub wu_dir: PathBuf,
    #[serde(default = "default_status_path", rename = "statusPath")]
    pub status_path: PathBuf,
    #[serde(default = "default_backlog_path", rename = "backlogPath")]
    pub backlog_path: PathBuf,
    #[serde(default = "default_docs_dir")]
    pub docs: PathBuf,
    #[serde(default = "default_ai_dir")]
    pub ai: PathBuf,
    #[serde(default = "default_claude_dir")]
    pub claude: PathBuf,
    #[serde(default = "default_memory_bank_dir", rename = "memoryBank")]
    pub memory_bank: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            wu_dir: default_wu_dir(),
            status_path: default_status_path(),
            backlog_path: default_backlog_path(),
            docs: default_docs_dir(),
            ai: default_ai_dir(),
            claude: default_claude_dir(),
            memory_bank: default_memory_bank_dir(),
        }
    }
}

/// `software_delivery.git:` section of workspace config (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitDeliveryConfig {
    #[serde(default = "MergeConfig::default_main_branch", rename = "mainBranch")]
    pub main_branch: String,
    #[serde(default = "MergeConfig::default_branch_prefix", rename = "laneBranchPrefix")]
    pub lane_branch_prefix: String,
    #[serde(default, rename = "agentBranchPatterns")]
    pub agent_branch_patterns: Vec<String>,
    #[serde(default = "MergeConfig::default_require_remote", rename = "requireRemote")]
    pub require_remote: bool,
    #[serde(default)]
    pub push_retry: RetryConfig,
}

impl Default for GitDeliveryConfig {
    fn default() -> Self {
        Self {
            main_branch: MergeConfig::default_main_branch(),
            lane_branch_prefix: MergeConfig::default_branch_prefix(),
            agent_branch_patterns: Vec::new(),
            require_remote: MergeConfig::default_require_remote(),
            push_retry: RetryConfig::default(),
        }
    }
}

/// `software_delivery:` section of workspace config (spec §6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareDeliveryConfig {
    #[serde(default)]
    pub git: GitDeliveryConfig,
}

/// How strictly `gates.lane_health_mode` enforces the C5/C6 overlap and
/// coverage analysers. `strict` treats any finding from either analyser as
/// a gate failure; `advisory` surfaces the same findings (logged, included
/// in reports) without blocking the operation they gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneHealthMode {
    Strict,
    Advisory,
}

impl Default for LaneHealthMode {
    fn default() -> Self {
        LaneHealthMode::Strict
    }
}

/// One `gates.co_change` rule: files matching `when` are expected to be
/// accompanied by a change to a file matching `require` in the same commit
/// (e.g. keeping a migration and its rollback in lockstep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoChangeRule {
    pub when: String,
    pub require: String,
}

/// `gates:` section of workspace config (spec §6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatesConfig {
    #[serde(default)]
    pub co_change: Vec<CoChangeRule>,
    #[serde(default)]
    pub lane_health_mode: LaneHealthMode,
}

/// The full `lumenflow.yaml` workspace schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_wu_dir")]
    pub wu_dir: PathBuf,
    #[serde(default = "default_stamps_dir")]
    pub stamps_dir: PathBuf,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: PathBuf,
    #[serde(default = "default_backlog_path")]
    pub backlog_path: PathBuf,
    #[serde(default = "default_status_path")]
    pub status_path: PathBuf,
    #[serde(default = "default_locks_dir")]
    pub locks_dir: PathBuf,
    #[serde(default)]
    pub lanes: LanesConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub delegation: DelegationConfig,
    #[serde(default)]
    pub signals: SignalsConfig,
    #[serde(default = "default_escalation_ladder")]
    pub escalation_ladder: Vec<EscalationStep>,
    #[serde(default)]
    pub gates: GatesConfig,
    /// spec §6's nested `directories:` section. Present only when the YAML
    /// uses the documented nested shape; when set, [`WorkspaceConfig::load`]
    /// and [`WorkspaceConfig::from_yaml`] copy it onto the flat
    /// `wu_dir`/`backlog_path`/`status_path` fields above so every other
    /// module keeps reading those directly.
    #[serde(default)]
    pub directories: Option<DirectoriesConfig>,
    /// spec §6's nested `software_delivery:` section, reconciled onto
    /// `merge` the same way `directories` is reconciled onto the flat path
    /// fields.
    #[serde(default)]
    pub software_delivery: Option<SoftwareDeliveryConfig>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            wu_dir: default_wu_dir(),
            stamps_dir: default_stamps_dir(),
            event_log_path: default_event_log_path(),
            backlog_path: default_backlog_path(),
            status_path: default_status_path(),
            locks_dir: default_locks_dir(),
            lanes: LanesConfig::default(),
            merge: MergeConfig::default(),
            delegation: DelegationConfig::default(),
            signals: SignalsConfig::default(),
            escalation_ladder: default_escalation_ladder(),
            gates: GatesConfig::default(),
            directories: None,
            software_delivery: None,
        }
    }
}

impl WorkspaceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, LfError> {
        let mut cfg: Self = serde_yaml::from_str(yaml).map_err(|e| LfError::YamlParseError {
            path: PathBuf::from("lumenflow.yaml"),
            reason: e.to_string(),
        })?;
        cfg.reconcile_nested_sections();
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LfError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| LfError::io(path, e))?;
        let mut cfg: Self = serde_yaml::from_str(&contents)
            .map_err(|e| LfError::YamlParseError { path: path.to_path_buf(), reason: e.to_string() })?;
        cfg.reconcile_nested_sections();
        Ok(cfg)
    }

    /// Copies spec §6's nested `directories`/`software_delivery` sections
    /// (when present) onto the flat fields every other module reads, so
    /// `WorkspaceConfig::load`/`from_yaml` accept both the nested schema
    /// spec §6 documents and the flat shorthand this workspace's own
    /// fixtures use.
    fn reconcile_nested_sections(&mut self) {
        if let Some(dirs) = self.directories.clone() {
            self.wu_dir = dirs.wu_dir;
            self.status_path = dirs.status_path;
            self.backlog_path = dirs.backlog_path;
        }
        if let Some(sd) = self.software_delivery.clone() {
            self.merge.main_branch = sd.git.main_branch;
            self.merge.branch_prefix = sd.git.lane_branch_prefix;
            self.merge.require_remote = sd.git.require_remote;
            self.merge.retry = sd.git.push_retry;
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
