//! 负责处理库的持久化配置。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    converter::{generators::ttml_writer::TtmlWriter, types::SilenceOptions},
    error::{CueHelperError, Result},
};

const CONFIG_DIR_NAME: &str = "ttml-cues";
const CONFIG_FILE_NAME: &str = "config.json";

/// 库的配置项。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CueConfig {
    /// 新建编写器时使用的静音行设置。
    pub silence: SilenceOptions,
}

impl CueConfig {
    /// 使用当前配置创建一个编写器。
    #[must_use]
    pub fn writer(&self, text: &str) -> TtmlWriter {
        TtmlWriter::new(text, self.silence)
    }
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "config.json"。
pub fn config_file_path(filename: &str) -> Result<PathBuf> {
    let mut config_dir = dirs::config_dir()
        .ok_or_else(|| CueHelperError::Config("无法找到用户配置目录".to_string()))?;
    config_dir.push(CONFIG_DIR_NAME);
    fs::create_dir_all(&config_dir)?;
    config_dir.push(filename);
    Ok(config_dir)
}

/// 从指定文件加载配置。文件不存在时返回默认配置。
pub fn load_config_from(path: impl AsRef<Path>) -> Result<CueConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => {
            let config: CueConfig = serde_json::from_str(&content)?;
            info!("已从 {} 加载配置。", path.display());
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("配置文件 {} 不存在，使用默认配置。", path.display());
            Ok(CueConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// 将配置序列化为 JSON 并保存到指定文件。
pub fn save_config_to(path: impl AsRef<Path>, config: &CueConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path.as_ref(), content)?;
    info!("配置已保存到 {}。", path.as_ref().display());
    Ok(())
}

/// 从用户配置目录加载配置。
pub fn load_config() -> Result<CueConfig> {
    load_config_from(config_file_path(CONFIG_FILE_NAME)?)
}

/// 将配置保存到用户配置目录。
pub fn save_config(config: &CueConfig) -> Result<()> {
    save_config_to(config_file_path(CONFIG_FILE_NAME)?, config)
}
