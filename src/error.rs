use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 层级范围解析错误
    Scope(ScopeError),
    /// 本地输入校验错误
    Validation(ValidationError),
    /// 远程接口调用错误
    Remote(RemoteError),
    /// 提交批次错误
    Commit(CommitError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scope(e) => write!(f, "范围错误: {}", e),
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Remote(e) => write!(f, "远程错误: {}", e),
            AppError::Commit(e) => write!(f, "提交错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Scope(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::Remote(e) => Some(e),
            AppError::Commit(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 层级范围解析错误
#[derive(Debug)]
pub enum ScopeError {
    /// 考试未设置任何层级范围
    ExamScopeMissing {
        exam_id: i64,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::ExamScopeMissing { exam_id } => {
                write!(f, "考试 {} 未设置任何层级范围，无法确定可选题目", exam_id)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// 本地输入校验错误
///
/// 非法分值不在这里：按策略回落为默认值并告警，从不构成错误。
#[derive(Debug)]
pub enum ValidationError {
    /// 找不到对应的分配记录
    UnknownAssignment {
        assignment_id: i64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownAssignment { assignment_id } => {
                write!(f, "找不到分配记录 (ID: {})", assignment_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 远程接口调用错误
#[derive(Debug)]
pub enum RemoteError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回非成功状态码
    BadStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应体解析失败
    DecodeFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::RequestFailed { endpoint, source } => {
                write!(f, "接口请求失败 ({}): {}", endpoint, source)
            }
            RemoteError::BadStatus {
                endpoint,
                status,
                message,
            } => {
                write!(
                    f,
                    "接口返回异常状态 ({}): HTTP {}, 详情: {:?}",
                    endpoint, status, message
                )
            }
            RemoteError::DecodeFailed { endpoint, source } => {
                write!(f, "响应解析失败 ({}): {}", endpoint, source)
            }
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::RequestFailed { source, .. }
            | RemoteError::DecodeFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 提交批次错误
#[derive(Debug)]
pub enum CommitError {
    /// 批次中部分操作失败
    Partial {
        failed: usize,
        total: usize,
    },
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::Partial { failed, total } => {
                write!(f, "部分操作失败: {}/{} 个操作未成功", failed, total)
            }
        }
    }
}

impl std::error::Error for CommitError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    FileReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 解析配置文件失败
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::FileReadFailed { path, source } => {
                write!(f, "读取配置文件失败 ({}): {}", path, source)
            }
            ConfigError::FileParseFailed { path, source } => {
                write!(f, "解析配置文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileReadFailed { source, .. }
            | ConfigError::FileParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Remote(RemoteError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Remote(RemoteError::DecodeFailed {
            endpoint: String::new(), // JSON错误本身不携带接口信息
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::FileParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Config(ConfigError::FileReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建考试范围缺失错误
    pub fn exam_scope_missing(exam_id: i64) -> Self {
        AppError::Scope(ScopeError::ExamScopeMissing { exam_id })
    }

    /// 创建分配记录不存在错误
    pub fn unknown_assignment(assignment_id: i64) -> Self {
        AppError::Validation(ValidationError::UnknownAssignment { assignment_id })
    }

    /// 创建接口请求失败错误
    pub fn remote_request_failed(endpoint: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Remote(RemoteError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建接口异常状态错误
    pub fn remote_bad_status(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Remote(RemoteError::BadStatus {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建响应解析失败错误
    pub fn remote_decode_failed(endpoint: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Remote(RemoteError::DecodeFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建部分提交失败错误
    pub fn partial_commit(failed: usize, total: usize) -> Self {
        AppError::Commit(CommitError::Partial { failed, total })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
