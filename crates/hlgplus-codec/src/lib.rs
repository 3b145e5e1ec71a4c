//! # hlgplus-codec
//!
//! HEVC 码流层面的解析能力, 只覆盖 HDR10+ 检查所需的部分:
//!
//! - **H.265 NAL**: Annex-B 起始码分割, NAL 类型识别, RBSP 还原
//! - **SEI**: 前缀 SEI 消息遍历 (0xFF 转义的类型/长度)
//! - **访问单元**: AUD 驱动或 VCL 启发式的帧边界跟踪
//! - **ITU-T T.35 / SMPTE ST 2094-40**: 用户数据头与 Application 4 窗口 0 统计
//!
//! ## 使用示例
//!
//! ```rust
//! use hlgplus_codec::parsers::h265::{AnnexBScanner, HevcNalUnitType};
//!
//! let stream = [0, 0, 0, 1, 0x46, 0x01, 0x10, 0, 0, 1, 0x02, 0x01, 0x80];
//! let types: Vec<_> = AnnexBScanner::new(&stream).map(|nal| nal.nal_type()).collect();
//! assert_eq!(types, vec![HevcNalUnitType::Aud, HevcNalUnitType::TrailR]);
//! ```

pub mod parsers;
