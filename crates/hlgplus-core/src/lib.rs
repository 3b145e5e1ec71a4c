//! # hlgplus-core
//!
//! HLG+ 码流检查工具的基础设施, 提供统一错误类型和按位读取器.
//!
//! 上层 crate (`hlgplus-codec`, `hlgplus`) 只依赖这里的类型, 不直接接触 I/O.

pub mod bitreader;
pub mod error;

// 重导出常用类型
pub use bitreader::BitReader;
pub use error::{HlgError, HlgResult};
