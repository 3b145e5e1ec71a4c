//! SMPTE ST 2094-40 (HDR10+) Application 4 元数据, 只解析窗口 0 统计.
//!
//! application_data 位布局:
//! ```text
//! num_windows(2)
//! targeted_system_display_maximum_luminance(27)
//! targeted_system_display_actual_peak_luminance_flag(1)
//! maxscl[3](17 x 3)       \ 仅在 flag == 0 时解析
//! average_maxrgb(17)      /
//! ```
//!
//! flag 置位时码流后续带有峰值亮度矩阵, 这里不解码, 只记录前两个字段.
//! 亮度值的单位为 0.1 nit.

use hlgplus_core::{BitReader, HlgResult};

/// T.35 application_identifier 中 ST 2094-40 使用的值
pub const ST2094_40_APPLICATION_ID: u8 = 4;

/// 峰值亮度标志置位时的说明
pub const PEAK_LUMINANCE_NOTE: &str =
    "actual peak luminance present; per-window stats not parsed";

/// 亮度原始值换算为 nit
pub fn to_nits(raw: u32) -> f64 {
    f64::from(raw) * 0.1
}

/// 窗口 0 的 maxscl 与 average_maxrgb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window0Luminance {
    /// R/G/B 三个通道的 maxscl (17 位)
    pub maxscl: [u32; 3],
    /// average_maxrgb (17 位)
    pub average_maxrgb: u32,
}

/// ST 2094-40 Application 4 窗口 0 统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct St2094_40Window0 {
    /// num_windows (2 位)
    pub num_windows: u8,
    /// targeted_system_display_maximum_luminance (27 位)
    pub targeted_max_lum: u32,
    pub actual_peak_luminance_flag: bool,
    /// 峰值亮度标志置位时为 `None`
    pub luminance: Option<Window0Luminance>,
}

impl St2094_40Window0 {
    /// 从 T.35 application_data 解析
    ///
    /// 位数不足时返回 [`hlgplus_core::HlgError::InsufficientBits`].
    pub fn parse(app_data: &[u8]) -> HlgResult<Self> {
        let mut br = BitReader::new(app_data);
        let num_windows = br.read_bits(2)? as u8;
        let targeted_max_lum = br.read_bits(27)?;
        let actual_peak_luminance_flag = br.read_flag()?;

        let luminance = if actual_peak_luminance_flag {
            None
        } else {
            let maxscl = [br.read_bits(17)?, br.read_bits(17)?, br.read_bits(17)?];
            let average_maxrgb = br.read_bits(17)?;
            Some(Window0Luminance {
                maxscl,
                average_maxrgb,
            })
        };

        Ok(Self {
            num_windows,
            targeted_max_lum,
            actual_peak_luminance_flag,
            luminance,
        })
    }

    /// 峰值亮度标志置位时返回说明
    pub fn peak_luminance_note(&self) -> Option<&'static str> {
        self.actual_peak_luminance_flag.then_some(PEAK_LUMINANCE_NOTE)
    }

    pub fn targeted_max_lum_nits(&self) -> f64 {
        to_nits(self.targeted_max_lum)
    }
}
