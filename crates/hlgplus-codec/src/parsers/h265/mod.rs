//! H.265/HEVC 码流解析器.
//!
//! 只实现检查 HDR10+ 元数据所需的部分:
//! - Annex-B 起始码分割与 NAL 类型识别 (2 字节 NAL 头)
//! - RBSP 还原 (移除 emulation prevention 字节)
//! - 前缀 SEI 消息遍历
//! - 访问单元边界跟踪
//!
//! # HEVC NAL 头部 (2 字节)
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ forbidden(1) | type(6) | layer_id(6) | tid(3) │
//! └───────────────────────────────────────────────┘
//! ```

pub mod access_unit;
pub mod nal;
pub mod rbsp;
pub mod sei;

pub use access_unit::{AccessUnitTracker, AuAdvance, BoundaryMode};
pub use nal::{AnnexBScanner, HevcNalUnit, HevcNalUnitType, contains_nal_type, split_hevc_annex_b};
pub use rbsp::{nal_to_rbsp, remove_emulation_prevention};
pub use sei::{SEI_USER_DATA_REGISTERED_ITU_T_T35, SeiMessage, SeiMessages};
