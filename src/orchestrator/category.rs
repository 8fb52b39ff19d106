//! Closed sets of category names.
//!
//! Install/test categories and configure categories are separate enums, so
//! an operation can only ever be dispatched on a name it understands.
//! String input goes through [`FromStr`], which is where an unknown name
//! turns into [`ToolsmithError::UnknownCategory`].

use crate::error::ToolsmithError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Install/test category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PackageManagers,
    DevelopmentTools,
    CloudTools,
    Applications,
    AiTools,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 5] = [
        Category::PackageManagers,
        Category::DevelopmentTools,
        Category::CloudTools,
        Category::Applications,
        Category::AiTools,
    ];

    /// Catalog key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PackageManagers => "package-managers",
            Category::DevelopmentTools => "development-tools",
            Category::CloudTools => "cloud-tools",
            Category::Applications => "applications",
            Category::AiTools => "ai-tools",
        }
    }

    fn expected() -> String {
        names(Self::ALL.iter().map(Category::as_str))
    }
}

/// Target of a test run: one category, or every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestTarget {
    All,
    Category(Category),
}

impl TestTarget {
    /// Categories this target covers, in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        match self {
            TestTarget::All => Category::ALL.to_vec(),
            TestTarget::Category(c) => vec![*c],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestTarget::All => "all",
            TestTarget::Category(c) => c.as_str(),
        }
    }
}

impl From<Category> for TestTarget {
    fn from(category: Category) -> Self {
        TestTarget::Category(category)
    }
}

/// Configure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigureCategory {
    Terminal,
    Powershell,
    Tools,
    AiTools,
}

impl ConfigureCategory {
    pub const ALL: [ConfigureCategory; 4] = [
        ConfigureCategory::Terminal,
        ConfigureCategory::Powershell,
        ConfigureCategory::Tools,
        ConfigureCategory::AiTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigureCategory::Terminal => "terminal",
            ConfigureCategory::Powershell => "powershell",
            ConfigureCategory::Tools => "tools",
            ConfigureCategory::AiTools => "ai-tools",
        }
    }
}

fn names<'a>(iter: impl Iterator<Item = &'a str>) -> String {
    iter.collect::<Vec<_>>().join(", ")
}

/// Lowercase and accept `_` for `-`.
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for Category {
    type Err = ToolsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ToolsmithError::UnknownCategory {
                name: s.to_string(),
                expected: Self::expected(),
            })
    }
}

impl FromStr for TestTarget {
    type Err = ToolsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize(s) == "all" {
            return Ok(TestTarget::All);
        }
        s.parse::<Category>()
            .map(TestTarget::Category)
            .map_err(|_| ToolsmithError::UnknownCategory {
                name: s.to_string(),
                expected: format!("all, {}", Category::expected()),
            })
    }
}

impl FromStr for ConfigureCategory {
    type Err = ToolsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ToolsmithError::UnknownCategory {
                name: s.to_string(),
                expected: names(Self::ALL.iter().map(ConfigureCategory::as_str)),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ConfigureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
