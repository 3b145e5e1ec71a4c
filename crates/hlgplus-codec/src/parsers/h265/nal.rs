//! H.265/HEVC NAL (Network Abstraction Layer) 单元与 Annex-B 分割.
//!
//! HEVC NAL 头部为 2 字节:
//! - forbidden_zero_bit (1 bit)
//! - nal_unit_type (6 bits)
//! - nuh_layer_id (6 bits)
//! - nuh_temporal_id_plus1 (3 bits)
//!
//! Annex-B 码流以起始码 `00 00 00 01` 或 `00 00 01` 分隔 NAL 单元.
//! 这里的分割器是惰性的迭代器, 只借用输入缓冲区, 不复制 NAL 数据.

/// HEVC NAL 单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HevcNalUnitType {
    /// TRAIL_N (非参考尾随图像)
    TrailN,
    /// TRAIL_R (参考尾随图像)
    TrailR,
    /// TSA_N
    TsaN,
    /// TSA_R
    TsaR,
    /// STSA_N
    StsaN,
    /// STSA_R
    StsaR,
    /// RADL_N
    RadlN,
    /// RADL_R
    RadlR,
    /// RASL_N
    RaslN,
    /// RASL_R
    RaslR,
    /// BLA_W_LP (Broken Link Access)
    BlaWLp,
    /// BLA_W_RADL
    BlaWRadl,
    /// BLA_N_LP
    BlaNLp,
    /// IDR_W_RADL (Instantaneous Decoding Refresh)
    IdrWRadl,
    /// IDR_N_LP
    IdrNLp,
    /// CRA_NUT (Clean Random Access)
    Cra,
    /// VPS (Video Parameter Set)
    Vps,
    /// SPS (Sequence Parameter Set)
    Sps,
    /// PPS (Picture Parameter Set)
    Pps,
    /// AUD (Access Unit Delimiter)
    Aud,
    /// EOS (End of Sequence)
    Eos,
    /// EOB (End of Bitstream)
    Eob,
    /// FD (Filler Data)
    FillerData,
    /// PREFIX_SEI
    PrefixSei,
    /// SUFFIX_SEI
    SuffixSei,
    /// 保留或未指定类型 (保留原始编号)
    Unknown(u8),
}

impl HevcNalUnitType {
    /// 从 NAL 头第一个字节提取类型: `(byte >> 1) & 0x3F`
    pub fn from_header_byte(byte: u8) -> Self {
        Self::from_type_id((byte >> 1) & 0x3F)
    }

    /// 从类型编号创建
    pub fn from_type_id(id: u8) -> Self {
        match id {
            0 => Self::TrailN,
            1 => Self::TrailR,
            2 => Self::TsaN,
            3 => Self::TsaR,
            4 => Self::StsaN,
            5 => Self::StsaR,
            6 => Self::RadlN,
            7 => Self::RadlR,
            8 => Self::RaslN,
            9 => Self::RaslR,
            16 => Self::BlaWLp,
            17 => Self::BlaWRadl,
            18 => Self::BlaNLp,
            19 => Self::IdrWRadl,
            20 => Self::IdrNLp,
            21 => Self::Cra,
            32 => Self::Vps,
            33 => Self::Sps,
            34 => Self::Pps,
            35 => Self::Aud,
            36 => Self::Eos,
            37 => Self::Eob,
            38 => Self::FillerData,
            39 => Self::PrefixSei,
            40 => Self::SuffixSei,
            _ => Self::Unknown(id),
        }
    }

    /// 获取类型编号
    pub fn type_id(&self) -> u8 {
        match self {
            Self::TrailN => 0,
            Self::TrailR => 1,
            Self::TsaN => 2,
            Self::TsaR => 3,
            Self::StsaN => 4,
            Self::StsaR => 5,
            Self::RadlN => 6,
            Self::RadlR => 7,
            Self::RaslN => 8,
            Self::RaslR => 9,
            Self::BlaWLp => 16,
            Self::BlaWRadl => 17,
            Self::BlaNLp => 18,
            Self::IdrWRadl => 19,
            Self::IdrNLp => 20,
            Self::Cra => 21,
            Self::Vps => 32,
            Self::Sps => 33,
            Self::Pps => 34,
            Self::Aud => 35,
            Self::Eos => 36,
            Self::Eob => 37,
            Self::FillerData => 38,
            Self::PrefixSei => 39,
            Self::SuffixSei => 40,
            Self::Unknown(id) => *id,
        }
    }

    /// 是否为 VCL (Video Coding Layer) NAL, 即类型 0..=31 (含保留的 VCL 类型)
    pub fn is_vcl(&self) -> bool {
        self.type_id() < 32
    }

    /// 是否为 IRAP (Intra Random Access Point) NAL
    pub fn is_irap(&self) -> bool {
        matches!(self.type_id(), 16..=21)
    }

    /// 是否为 IDR NAL
    pub fn is_idr(&self) -> bool {
        matches!(self, Self::IdrWRadl | Self::IdrNLp)
    }

    /// 规范中的助记名, 用于日志
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrailN => "TRAIL_N",
            Self::TrailR => "TRAIL_R",
            Self::TsaN => "TSA_N",
            Self::TsaR => "TSA_R",
            Self::StsaN => "STSA_N",
            Self::StsaR => "STSA_R",
            Self::RadlN => "RADL_N",
            Self::RadlR => "RADL_R",
            Self::RaslN => "RASL_N",
            Self::RaslR => "RASL_R",
            Self::BlaWLp => "BLA_W_LP",
            Self::BlaWRadl => "BLA_W_RADL",
            Self::BlaNLp => "BLA_N_LP",
            Self::IdrWRadl => "IDR_W_RADL",
            Self::IdrNLp => "IDR_N_LP",
            Self::Cra => "CRA_NUT",
            Self::Vps => "VPS_NUT",
            Self::Sps => "SPS_NUT",
            Self::Pps => "PPS_NUT",
            Self::Aud => "AUD_NUT",
            Self::Eos => "EOS_NUT",
            Self::Eob => "EOB_NUT",
            Self::FillerData => "FD_NUT",
            Self::PrefixSei => "PREFIX_SEI_NUT",
            Self::SuffixSei => "SUFFIX_SEI_NUT",
            Self::Unknown(id) if *id < 32 => "RSV_VCL",
            Self::Unknown(_) => "RSV_NVCL",
        }
    }
}

/// HEVC NAL 单元 (借用输入缓冲区)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HevcNalUnit<'a> {
    /// NAL 第一个字节在输入中的偏移 (起始码之后)
    pub offset: usize,
    /// NAL 数据, 含 2 字节 NAL 头, 不含起始码
    pub data: &'a [u8],
}

impl<'a> HevcNalUnit<'a> {
    /// 包装一段 NAL 数据, `data` 不能为空
    pub fn new(offset: usize, data: &'a [u8]) -> Self {
        debug_assert!(!data.is_empty());
        Self { offset, data }
    }

    /// NAL 类型
    pub fn nal_type(&self) -> HevcNalUnitType {
        HevcNalUnitType::from_header_byte(self.data[0])
    }

    /// nuh_layer_id, NAL 头不完整时为 `None`
    pub fn layer_id(&self) -> Option<u8> {
        let second = *self.data.get(1)?;
        Some(((self.data[0] & 1) << 5) | (second >> 3))
    }

    /// nuh_temporal_id_plus1, NAL 头不完整时为 `None`
    pub fn temporal_id_plus1(&self) -> Option<u8> {
        self.data.get(1).map(|b| b & 0x07)
    }

    /// NAL 头之后的负载 (仍含防竞争字节)
    pub fn payload(&self) -> &'a [u8] {
        self.data.get(2..).unwrap_or(&[])
    }

    /// 输入中的字节范围 `[start, end)`
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.data.len()
    }
}

// ============================================================
// Annex B 分割
// ============================================================

/// 判断 `pos` 处是否为起始码, 返回起始码长度
///
/// 只在 `pos + 4 <= len` 时匹配, 因此最后 3 个字节中的起始码永远不会被识别.
/// 同一位置优先匹配 4 字节起始码.
fn start_code_at(data: &[u8], pos: usize) -> Option<usize> {
    let window = data.get(pos..pos.checked_add(4)?)?;
    match window {
        [0, 0, 0, 1] => Some(4),
        [0, 0, 1, _] => Some(3),
        _ => None,
    }
}

/// 从 `from` 开始查找下一个起始码, 返回 (位置, 长度)
fn find_start_code(data: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..data.len()).find_map(|pos| start_code_at(data, pos).map(|len| (pos, len)))
}

/// Annex-B 码流的 NAL 单元迭代器
///
/// 每次 [`AnnexBScanner::new`] 都从头开始扫描; 迭代只向前推进,
/// 返回的范围互不重叠且都紧跟在一个起始码之后.
#[derive(Debug, Clone)]
pub struct AnnexBScanner<'a> {
    data: &'a [u8],
    /// 下一个待检查的起始码位置, `None` 表示扫描结束
    next_start: Option<(usize, usize)>,
}

impl<'a> AnnexBScanner<'a> {
    /// 创建扫描器
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            next_start: find_start_code(data, 0),
        }
    }
}

impl<'a> Iterator for AnnexBScanner<'a> {
    type Item = HevcNalUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, code_len) = self.next_start?;
            let body_start = pos + code_len;
            self.next_start = find_start_code(self.data, body_start);
            let body_end = self.next_start.map_or(self.data.len(), |(next, _)| next);
            if body_end > body_start {
                return Some(HevcNalUnit::new(
                    body_start,
                    &self.data[body_start..body_end],
                ));
            }
            // 空 NAL (连续起始码), 继续下一个
        }
    }
}

/// 从 Annex B 格式分割 HEVC NAL 单元
pub fn split_hevc_annex_b(data: &[u8]) -> Vec<HevcNalUnit<'_>> {
    AnnexBScanner::new(data).collect()
}

/// 码流中是否存在指定类型的 NAL 单元
pub fn contains_nal_type(data: &[u8], nal_type: HevcNalUnitType) -> bool {
    AnnexBScanner::new(data).any(|nal| nal.nal_type() == nal_type)
}
