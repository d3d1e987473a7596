use std::fmt;

#[derive(Debug, Clone)]
pub enum IpLocatorError {
    Download(String),
    Archive(String),
    DatasetFileNotFound(String),
    FileOperation(String),
    Parse(String),
    Validation(String),
    Serialization(String),
}

impl IpLocatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpLocatorError::Download(_) => "E001",
            IpLocatorError::Archive(_) => "E002",
            IpLocatorError::DatasetFileNotFound(_) => "E003",
            IpLocatorError::FileOperation(_) => "E004",
            IpLocatorError::Parse(_) => "E005",
            IpLocatorError::Validation(_) => "E006",
            IpLocatorError::Serialization(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpLocatorError::Download(_) => "Dataset Download Error",
            IpLocatorError::Archive(_) => "Archive Extraction Error",
            IpLocatorError::DatasetFileNotFound(_) => "Dataset File Not Found",
            IpLocatorError::FileOperation(_) => "File Operation Error",
            IpLocatorError::Parse(_) => "Dataset Parse Error",
            IpLocatorError::Validation(_) => "Validation Error",
            IpLocatorError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpLocatorError::Download(msg) => msg,
            IpLocatorError::Archive(msg) => msg,
            IpLocatorError::DatasetFileNotFound(msg) => msg,
            IpLocatorError::FileOperation(msg) => msg,
            IpLocatorError::Parse(msg) => msg,
            IpLocatorError::Validation(msg) => msg,
            IpLocatorError::Serialization(msg) => msg,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for IpLocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpLocatorError {}

// 便捷的构造函数
impl IpLocatorError {
    pub fn download<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::Download(msg.into())
    }

    pub fn archive<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::Archive(msg.into())
    }

    pub fn dataset_file_not_found<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::DatasetFileNotFound(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::FileOperation(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::Parse(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpLocatorError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for IpLocatorError {
    fn from(err: std::io::Error) -> Self {
        IpLocatorError::FileOperation(err.to_string())
    }
}

impl From<csv::Error> for IpLocatorError {
    fn from(err: csv::Error) -> Self {
        IpLocatorError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for IpLocatorError {
    fn from(err: serde_json::Error) -> Self {
        IpLocatorError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for IpLocatorError {
    fn from(err: ureq::Error) -> Self {
        IpLocatorError::Download(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpLocatorError>;
