use std::fmt;

use serde::{Deserialize, Serialize};

/// Recruitment platforms the delivery pipeline knows about.
///
/// The set is closed; declaration order is the order batch runs visit them.
///
/// Serialized as its [`code`](Platform::code), the same key used in API paths
/// and the config store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "boss")]
    BossZhipin,
    #[serde(rename = "zhilian")]
    ZhilianZhaopin,
    #[serde(rename = "job51")]
    Job51,
    #[serde(rename = "liepin")]
    Liepin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::BossZhipin,
        Platform::ZhilianZhaopin,
        Platform::Job51,
        Platform::Liepin,
    ];

    /// Stable code used as the config store key and in API paths.
    pub fn code(self) -> &'static str {
        match self {
            Platform::BossZhipin => "boss",
            Platform::ZhilianZhaopin => "zhilian",
            Platform::Job51 => "job51",
            Platform::Liepin => "liepin",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::BossZhipin => "Boss直聘",
            Platform::ZhilianZhaopin => "智联招聘",
            Platform::Job51 => "前程无忧",
            Platform::Liepin => "猎聘",
        }
    }

    /// Look up a platform by its code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Platform> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
