//! 统一错误类型定义.
//!
//! 只有两类严重程度:
//! - 致命: 输入缺失、读取失败、没有任何 NAL 单元, 由命令行层报告并退出.
//! - 局部: 位数不足、数据截断, 由调用方吞掉并跳过受影响的单元.

use std::path::PathBuf;
use thiserror::Error;

/// HLG+ 检查工具统一错误类型
#[derive(Debug, Error)]
pub enum HlgError {
    /// 请求读取的位数超过剩余位数
    #[error("位数不足: 请求 {requested} 位, 剩余 {remaining} 位")]
    InsufficientBits { requested: u32, remaining: usize },

    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 输入文件不存在
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// 输入中没有任何 Annex-B 起始码
    #[error("No Annex-B NAL units found")]
    NoNalUnits,

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl HlgError {
    /// 是否为局部错误 (跳过当前单元后可以继续扫描)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientBits { .. })
    }
}

/// 统一 Result 类型
pub type HlgResult<T> = Result<T, HlgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_错误分级() {
        let short = HlgError::InsufficientBits {
            requested: 17,
            remaining: 3,
        };
        assert!(short.is_recoverable());
        assert!(!HlgError::NoNalUnits.is_recoverable());
        assert!(!HlgError::InputNotFound(PathBuf::from("a.hevc")).is_recoverable());
    }

    #[test]
    fn test_致命错误文案() {
        assert_eq!(HlgError::NoNalUnits.to_string(), "No Annex-B NAL units found");
        let missing = HlgError::InputNotFound(PathBuf::from("clip.hevc"));
        assert_eq!(missing.to_string(), "Input file not found: clip.hevc");
    }
}
