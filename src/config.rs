use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 考试平台 API 根地址（含 /api 前缀）
    pub api_base_url: String,
    /// Bearer 鉴权令牌
    pub api_token: String,
    /// 要管理的考试ID（0 表示未设置）
    pub exam_id: i64,
    /// 列表接口单页条数
    pub page_size: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            api_token: String::new(),
            exam_id: 0,
            page_size: 100,
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("API_TOKEN").unwrap_or(default.api_token),
            exam_id: std::env::var("EXAM_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.exam_id),
            page_size: std::env::var("PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_size),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 配置文件加载，缺省字段取默认值
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(ConfigError::FileReadFailed {
                path: path.to_string(),
                source: Box::new(e),
            })
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            AppError::Config(ConfigError::FileParseFailed {
                path: path.to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        let path = path.to_str().unwrap().to_string();
        (dir, path)
    }

    #[test]
    fn test_from_file_fills_missing_fields_with_defaults() {
        let (_dir, path) = write_config(
            r#"
api_base_url = "http://10.0.0.8:9000/api"
api_token = "secret-token"
exam_id = 42
"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.8:9000/api");
        assert_eq!(config.api_token, "secret-token");
        assert_eq!(config.exam_id, 42);
        assert_eq!(config.page_size, 100, "缺省字段应取默认值");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.verbose_logging);
    }

    #[test]
    fn test_from_file_reports_parse_failure() {
        let (_dir, path) = write_config("exam_id = [");

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::FileParseFailed { .. })
        ));
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let err = Config::from_file("/不存在的路径/config.toml").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::FileReadFailed { .. })
        ));
    }
}
