//! Bitable column names.

use serde::Deserialize;

/// Names of the Bitable columns each record field is written to.
///
/// The defaults match the table layout the tool was built for; override
/// them under `[bitable.fields]` when the table uses other names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FieldNames {
    /// Date of the run (local midnight, epoch milliseconds).
    pub date: String,
    pub rank: String,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub author: String,
    /// Link cell (`{ text, link }`).
    pub link: String,
    pub language: String,
    pub stars_today: String,
    pub total_stars: String,
    pub forks: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            date: "日期".to_string(),
            rank: "排名".to_string(),
            title: "项目名称".to_string(),
            description: "描述".to_string(),
            reason: "推荐理由".to_string(),
            author: "作者".to_string(),
            link: "GitHub链接".to_string(),
            language: "主要语言".to_string(),
            stars_today: "今日新增星标".to_string(),
            total_stars: "总星标数".to_string(),
            forks: "Fork数".to_string(),
        }
    }
}
