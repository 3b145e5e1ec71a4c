//! # hlgplus
//!
//! HLG+ 交付规格的 HEVC 码流检查库: 判断 Annex-B 基本流是否携带可用的
//! SMPTE ST 2094-40 (HDR10+) 动态元数据.
//!
//! # 快速开始
//!
//! ```rust
//! use hlgplus::analyzer::Verdict;
//!
//! // AUD + 一个带 first_slice_segment_in_pic_flag 的 TRAIL_R 分片, 没有 SEI
//! let stream = [0, 0, 0, 1, 0x46, 0x01, 0x50, 0, 0, 0, 1, 0x02, 0x01, 0xD0];
//! let analysis = hlgplus::analyze_stream(&stream).unwrap();
//! assert_eq!(analysis.total_aus, 1);
//! assert_eq!(analysis.verdict(), Verdict::Fail);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `hlgplus-core` | 错误类型与比特流读取器 |
//! | `hlgplus-codec` | HEVC NAL / SEI / T.35 / ST 2094-40 解析 |
//! | `hlgplus` | 统计与端到端流程 |

/// 核心类型与工具
pub use hlgplus_core as core;

/// 码流解析
pub use hlgplus_codec as codec;

pub mod analyzer;
pub mod stream;

pub use analyzer::{MetadataKind, StreamAnalysis, Verdict};
pub use stream::{analyze_file, analyze_stream};

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
