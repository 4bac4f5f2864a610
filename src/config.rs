//! 排名器配置（TOML 文件）
//!
//! ```toml
//! top = 3
//!
//! [exhibits]
//! "51496:6493" = "co8421531"
//! ```
//!
//! 未提供 `[exhibits]` 时使用内置的展品映射表。

use crate::algorithms::ExhibitTable;
use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// 信标标识格式 `<major>:<minor>`
static IDENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:\d+$").expect("identity pattern is valid"));

#[derive(Debug, Clone, Deserialize)]
pub struct RankerConfig {
    /// 命令行未指定 `--top` 时输出的条目数
    #[serde(default = "default_top")]
    pub top: usize,
    /// 信标标识 -> 展品编号
    #[serde(default)]
    pub exhibits: Option<HashMap<String, String>>,
}

fn default_top() -> usize {
    3
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self { top: default_top(), exhibits: None }
    }
}

impl RankerConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: RankerConfig = toml::from_str(content).context("invalid ranker config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in config file {}", path.display()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.top == 0 {
            bail!("`top` must be at least 1");
        }
        if let Some(exhibits) = &self.exhibits {
            for (id, label) in exhibits {
                if !is_valid_identity(id) {
                    bail!("beacon identity {:?} is not of the form <major>:<minor>", id);
                }
                if label.trim().is_empty() {
                    bail!("beacon identity {:?} has an empty exhibit label", id);
                }
            }
        }
        Ok(())
    }

    /// 配置中的展品映射表，未配置时返回内置表
    pub fn exhibit_table(&self) -> ExhibitTable {
        match &self.exhibits {
            Some(exhibits) => ExhibitTable::from_pairs(exhibits.clone()),
            None => ExhibitTable::default(),
        }
    }
}

pub fn is_valid_identity(id: &str) -> bool {
    IDENTITY_PATTERN.is_match(id)
}
