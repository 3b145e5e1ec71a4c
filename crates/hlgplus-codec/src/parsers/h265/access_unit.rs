//! 访问单元 (Access Unit) 边界跟踪.
//!
//! 每次运行只选一种模式:
//! - 码流中存在 AUD (类型 35) 时, 每个 AUD 开启一个新的访问单元;
//! - 否则按 VCL 启发式: 第一个 VCL 开启访问单元 0, 之后
//!   first_slice_segment_in_pic_flag 置位的 VCL 开启新的访问单元.
//!
//! 访问单元编号单调不减, 开始前为 `None`.

use hlgplus_core::BitReader;
use log::debug;

use super::nal::{HevcNalUnit, HevcNalUnitType, contains_nal_type};
use super::rbsp::nal_to_rbsp;

/// 边界判定模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// 按 AUD 划分
    Aud,
    /// 按 VCL first_slice_segment_in_pic_flag 划分
    Heuristic,
}

impl std::fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aud => write!(f, "AUD"),
            Self::Heuristic => write!(f, "VCL heuristic"),
        }
    }
}

/// 单个 NAL 推进后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuAdvance {
    /// 当前访问单元编号, 尚未开始时为 `None`
    pub index: Option<u64>,
    /// 该 NAL 是否开启了新的访问单元
    pub started: bool,
}

/// 访问单元边界状态机
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessUnitTracker {
    AudDriven {
        current: Option<u64>,
    },
    /// `current` 为 `None` 即尚未见过 VCL
    HeuristicDriven { current: Option<u64> },
}

impl AccessUnitTracker {
    /// 按模式创建
    pub fn new(mode: BoundaryMode) -> Self {
        match mode {
            BoundaryMode::Aud => Self::AudDriven { current: None },
            BoundaryMode::Heuristic => Self::HeuristicDriven { current: None },
        }
    }

    /// 预扫描整个码流, 存在 AUD 时使用 AUD 模式
    pub fn for_stream(data: &[u8]) -> Self {
        let mode = if contains_nal_type(data, HevcNalUnitType::Aud) {
            BoundaryMode::Aud
        } else {
            BoundaryMode::Heuristic
        };
        debug!("访问单元边界模式: {mode}");
        Self::new(mode)
    }

    pub fn mode(&self) -> BoundaryMode {
        match self {
            Self::AudDriven { .. } => BoundaryMode::Aud,
            Self::HeuristicDriven { .. } => BoundaryMode::Heuristic,
        }
    }

    /// 当前访问单元编号
    pub fn current(&self) -> Option<u64> {
        match self {
            Self::AudDriven { current } | Self::HeuristicDriven { current } => *current,
        }
    }

    /// 输入一个 NAL 单元, 返回所属访问单元
    pub fn advance(&mut self, nal: &HevcNalUnit<'_>) -> AuAdvance {
        let nal_type = nal.nal_type();
        match self {
            Self::AudDriven { current } => {
                if nal_type == HevcNalUnitType::Aud {
                    let index = next_index(*current);
                    *current = Some(index);
                    return AuAdvance {
                        index: Some(index),
                        started: true,
                    };
                }
                AuAdvance {
                    index: *current,
                    started: false,
                }
            }
            Self::HeuristicDriven { current } => {
                if !nal_type.is_vcl() {
                    return AuAdvance {
                        index: *current,
                        started: false,
                    };
                }
                let started = current.is_none() || first_slice_segment_in_pic(nal);
                if started {
                    *current = Some(next_index(*current));
                }
                AuAdvance {
                    index: *current,
                    started,
                }
            }
        }
    }
}

fn next_index(current: Option<u64>) -> u64 {
    current.map_or(0, |index| index + 1)
}

/// slice_segment_header 的第一个语法元素 first_slice_segment_in_pic_flag
fn first_slice_segment_in_pic(nal: &HevcNalUnit<'_>) -> bool {
    let rbsp = nal_to_rbsp(nal);
    BitReader::new(&rbsp).read_flag().unwrap_or(false)
}
