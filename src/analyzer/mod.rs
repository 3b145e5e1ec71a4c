//! HDR10+ 元数据统计.
//!
//! [`Aggregator`] 逐个 NAL 接收访问单元信息和解码后的 T.35 / ST 2094-40 记录,
//! [`Aggregator::finish`] 产出只读的 [`StreamAnalysis`], 报告层只读取后者.

mod tally;

pub use tally::Tally;

use std::collections::HashSet;

use hlgplus_codec::parsers::h265::{AuAdvance, BoundaryMode, HevcNalUnitType};
use hlgplus_codec::parsers::st2094_40::{ST2094_40_APPLICATION_ID, St2094_40Window0};
use hlgplus_codec::parsers::t35::T35Record;
use log::trace;

/// 元数据分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// 全部消息负载相同
    Static,
    /// 至少两种不同负载
    Dynamic,
    /// 没有任何消息
    Unknown,
}

/// 最终判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Partial,
    Fail,
}

/// 每个访问单元的消息密度 (含没有消息的访问单元)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuDensity {
    pub min: u64,
    pub max: u64,
    pub avg: f64,
}

/// 窗口 0 统计的汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window0Summary {
    /// 第一条成功解码的记录
    pub first: Option<St2094_40Window0>,
    /// 解码成功的记录数
    pub samples: u64,
    /// 峰值亮度标志置位的记录数
    pub peak_flag_samples: u64,
    /// targeted_max_lum 的 (最小, 最大)
    pub targeted_max_lum_range: Option<(u32, u32)>,
    /// average_maxrgb 的 (最小, 最大)
    pub average_maxrgb_range: Option<(u32, u32)>,
}

impl Window0Summary {
    fn record(&mut self, stats: &St2094_40Window0) {
        self.first.get_or_insert(*stats);
        self.samples += 1;
        if stats.actual_peak_luminance_flag {
            self.peak_flag_samples += 1;
        }
        widen(&mut self.targeted_max_lum_range, stats.targeted_max_lum);
        if let Some(luminance) = &stats.luminance {
            widen(&mut self.average_maxrgb_range, luminance.average_maxrgb);
        }
    }
}

fn widen(range: &mut Option<(u32, u32)>, value: u32) {
    *range = Some(match *range {
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
        None => (value, value),
    });
}

/// 连续相同负载的游程
#[derive(Debug, Clone, Default)]
struct RunTracker {
    last: Option<Vec<u8>>,
    len: u64,
    longest: u64,
}

impl RunTracker {
    fn push(&mut self, payload: &[u8]) {
        if self.last.as_deref() == Some(payload) {
            self.len += 1;
            return;
        }
        self.flush();
        self.last = Some(payload.to_vec());
        self.len = 1;
    }

    fn flush(&mut self) {
        self.longest = self.longest.max(self.len);
    }
}

/// T.35 头字段的计数 (所有 T.35 记录, 不限于 HDR10+)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct T35HeaderTallies {
    pub records: u64,
    pub country_codes: Tally<u8>,
    pub provider_codes: Tally<u16>,
    pub oriented_codes: Tally<u16>,
    pub app_ids: Tally<u8>,
    pub app_versions: Tally<u8>,
}

/// 流级统计累加器
#[derive(Debug, Clone)]
pub struct Aggregator {
    mode: BoundaryMode,
    current_au: Option<u64>,
    highest_au: Option<u64>,
    seen_first_vcl: bool,
    total_nals: u64,
    vcl_units: u64,
    prefix_sei_units: u64,
    suffix_sei_units: u64,
    aud_units: u64,
    t35: T35HeaderTallies,
    messages: u64,
    messages_before_first_vcl: u64,
    unassigned_messages: u64,
    undecodable_bodies: u64,
    per_au: Tally<u64>,
    unique_payloads: HashSet<Vec<u8>>,
    run: RunTracker,
    window0: Window0Summary,
}

impl Aggregator {
    pub fn new(mode: BoundaryMode) -> Self {
        Self {
            mode,
            current_au: None,
            highest_au: None,
            seen_first_vcl: false,
            total_nals: 0,
            vcl_units: 0,
            prefix_sei_units: 0,
            suffix_sei_units: 0,
            aud_units: 0,
            t35: T35HeaderTallies::default(),
            messages: 0,
            messages_before_first_vcl: 0,
            unassigned_messages: 0,
            undecodable_bodies: 0,
            per_au: Tally::new(),
            unique_payloads: HashSet::new(),
            run: RunTracker::default(),
            window0: Window0Summary::default(),
        }
    }

    /// 记录一个 NAL 单元及其访问单元归属
    pub fn record_nal(&mut self, nal_type: HevcNalUnitType, advance: AuAdvance) {
        self.total_nals += 1;
        self.current_au = advance.index;
        if advance.started {
            self.highest_au = self.highest_au.max(advance.index);
        }

        match nal_type {
            t if t.is_vcl() => {
                self.vcl_units += 1;
                self.seen_first_vcl = true;
            }
            HevcNalUnitType::PrefixSei => self.prefix_sei_units += 1,
            HevcNalUnitType::SuffixSei => self.suffix_sei_units += 1,
            HevcNalUnitType::Aud => self.aud_units += 1,
            _ => {}
        }
    }

    /// 记录任意 T.35 记录的头字段
    pub fn record_t35_header(&mut self, record: &T35Record<'_>) {
        self.t35.records += 1;
        self.t35.country_codes.bump(record.country_code);
        self.t35.provider_codes.bump(record.provider_code);
        self.t35.oriented_codes.bump(record.oriented_code);
        self.t35.app_ids.bump(record.app_id);
        self.t35.app_versions.bump(record.app_ver);
    }

    /// 记录一条成功解码的 HDR10+ 消息; `payload` 为完整的 SEI 负载
    pub fn record_hdr10plus(&mut self, payload: &[u8], stats: &St2094_40Window0) {
        self.messages += 1;
        match self.current_au {
            Some(au) => {
                let count = self.per_au.bump(au);
                trace!("HDR10+ 消息 -> AU {au} (第 {count} 条)");
            }
            None => self.unassigned_messages += 1,
        }
        if !self.seen_first_vcl {
            self.messages_before_first_vcl += 1;
        }
        if !self.unique_payloads.contains(payload) {
            self.unique_payloads.insert(payload.to_vec());
        }
        self.run.push(payload);
        self.window0.record(stats);
    }

    /// 带 HDR10+ 签名但 ST 2094-40 主体无法解码
    pub fn record_undecodable_body(&mut self) {
        self.undecodable_bodies += 1;
    }

    /// 结束统计, 冲刷最后一个游程
    pub fn finish(mut self) -> StreamAnalysis {
        self.run.flush();
        StreamAnalysis {
            boundary_mode: self.mode,
            total_nals: self.total_nals,
            vcl_units: self.vcl_units,
            prefix_sei_units: self.prefix_sei_units,
            suffix_sei_units: self.suffix_sei_units,
            aud_units: self.aud_units,
            total_aus: self.highest_au.map_or(0, |au| au + 1),
            messages: self.messages,
            messages_before_first_vcl: self.messages_before_first_vcl,
            unassigned_messages: self.unassigned_messages,
            undecodable_bodies: self.undecodable_bodies,
            per_au: self.per_au,
            unique_payloads: self.unique_payloads.len(),
            longest_static_run: self.run.longest,
            t35: self.t35,
            window0: self.window0,
        }
    }
}

/// 一次运行的统计结果
#[derive(Debug, Clone)]
pub struct StreamAnalysis {
    pub boundary_mode: BoundaryMode,
    pub total_nals: u64,
    pub vcl_units: u64,
    pub prefix_sei_units: u64,
    pub suffix_sei_units: u64,
    pub aud_units: u64,
    /// 最大已开始访问单元编号 + 1
    pub total_aus: u64,
    /// HDR10+ 消息总数
    pub messages: u64,
    pub messages_before_first_vcl: u64,
    /// 在第一个访问单元开始前出现的消息
    pub unassigned_messages: u64,
    pub undecodable_bodies: u64,
    /// 访问单元编号 -> 消息数
    pub per_au: Tally<u64>,
    pub unique_payloads: usize,
    pub longest_static_run: u64,
    pub t35: T35HeaderTallies,
    pub window0: Window0Summary,
}

impl StreamAnalysis {
    pub fn aud_present(&self) -> bool {
        self.aud_units > 0
    }

    /// 至少有一条消息的访问单元数
    pub fn covered_aus(&self) -> u64 {
        self.per_au.len() as u64
    }

    /// 覆盖率, 0 个访问单元时为 0.0
    pub fn coverage(&self) -> f64 {
        if self.total_aus == 0 {
            return 0.0;
        }
        self.covered_aus() as f64 / self.total_aus as f64
    }

    /// 每个访问单元的消息数分布, 0 个访问单元时为 `None`
    pub fn density(&self) -> Option<AuDensity> {
        if self.total_aus == 0 {
            return None;
        }
        let counts: Vec<u64> = self.per_au.iter().map(|(_, count)| count).collect();
        let has_empty_au = self.covered_aus() < self.total_aus;
        let min = if has_empty_au {
            0
        } else {
            counts.iter().copied().min().unwrap_or(0)
        };
        let max = counts.iter().copied().max().unwrap_or(0);
        Some(AuDensity {
            min,
            max,
            avg: self.per_au.total() as f64 / self.total_aus as f64,
        })
    }

    pub fn metadata_kind(&self) -> MetadataKind {
        match self.unique_payloads {
            1 if self.messages > 0 => MetadataKind::Static,
            n if n > 1 => MetadataKind::Dynamic,
            _ => MetadataKind::Unknown,
        }
    }

    /// 消息数不少于 VCL 数 (逐帧可用)
    pub fn frame_level_available(&self) -> bool {
        self.vcl_units > 0 && self.messages >= self.vcl_units
    }

    /// app_id 众数为 4 时返回 app_ver 众数
    pub fn hdr10plus_version(&self) -> Option<u8> {
        if self.t35.app_ids.mode() != Some(ST2094_40_APPLICATION_ID) {
            return None;
        }
        self.t35.app_versions.mode()
    }

    pub fn verdict(&self) -> Verdict {
        let every_au_covered = self.total_aus > 0 && self.covered_aus() == self.total_aus;
        if self.messages == 0 {
            Verdict::Fail
        } else if every_au_covered && self.hdr10plus_version().is_some() {
            Verdict::Pass
        } else {
            Verdict::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlgplus_codec::parsers::st2094_40::Window0Luminance;

    fn stats(targeted_max_lum: u32, average_maxrgb: u32) -> St2094_40Window0 {
        St2094_40Window0 {
            num_windows: 1,
            targeted_max_lum,
            actual_peak_luminance_flag: false,
            luminance: Some(Window0Luminance {
                maxscl: [1000, 900, 800],
                average_maxrgb,
            }),
        }
    }

    fn hdr10plus_record(app_data: &[u8]) -> T35Record<'_> {
        T35Record {
            country_code: 0xB5,
            country_code_extension: None,
            provider_code: 0x003C,
            oriented_code: 0x0001,
            app_id: 4,
            app_ver: 1,
            app_data,
        }
    }

    fn started(index: u64) -> AuAdvance {
        AuAdvance {
            index: Some(index),
            started: true,
        }
    }

    fn within(index: u64) -> AuAdvance {
        AuAdvance {
            index: Some(index),
            started: false,
        }
    }

    /// 访问单元开始后写入一条消息
    fn push_message(agg: &mut Aggregator, payload: &[u8], stats: &St2094_40Window0) {
        agg.record_nal(HevcNalUnitType::PrefixSei, within(agg.current_au.unwrap_or(0)));
        agg.record_t35_header(&hdr10plus_record(&payload[7..]));
        agg.record_hdr10plus(payload, stats);
    }

    const PAYLOAD_A: &[u8] = &[0xB5, 0x00, 0x3C, 0x00, 0x01, 0x04, 0x01, 0xAA];
    const PAYLOAD_B: &[u8] = &[0xB5, 0x00, 0x3C, 0x00, 0x01, 0x04, 0x01, 0xBB];

    #[test]
    fn test_单帧全覆盖_pass() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        agg.record_nal(HevcNalUnitType::Aud, started(0));
        push_message(&mut agg, PAYLOAD_A, &stats(4000, 100));
        agg.record_nal(HevcNalUnitType::TrailR, within(0));
        agg.record_nal(HevcNalUnitType::TrailR, within(0));

        let analysis = agg.finish();
        assert_eq!(analysis.total_aus, 1);
        assert_eq!(analysis.messages, 1);
        assert_eq!(analysis.covered_aus(), 1);
        assert_eq!(analysis.coverage(), 1.0);
        assert_eq!(analysis.vcl_units, 2);
        assert_eq!(analysis.messages_before_first_vcl, 1);
        assert_eq!(analysis.metadata_kind(), MetadataKind::Static);
        assert_eq!(analysis.hdr10plus_version(), Some(1));
        assert_eq!(analysis.verdict(), Verdict::Pass);
    }

    #[test]
    fn test_半覆盖_partial() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        agg.record_nal(HevcNalUnitType::Aud, started(0));
        push_message(&mut agg, PAYLOAD_A, &stats(4000, 100));
        agg.record_nal(HevcNalUnitType::TrailR, within(0));
        agg.record_nal(HevcNalUnitType::Aud, started(1));
        agg.record_nal(HevcNalUnitType::TrailR, within(1));

        let analysis = agg.finish();
        assert_eq!(analysis.total_aus, 2);
        assert_eq!(analysis.covered_aus(), 1);
        assert_eq!(analysis.coverage(), 0.5);
        assert_eq!(
            analysis.density(),
            Some(AuDensity {
                min: 0,
                max: 1,
                avg: 0.5
            })
        );
        assert_eq!(analysis.verdict(), Verdict::Partial);
    }

    #[test]
    fn test_无消息_fail() {
        let mut agg = Aggregator::new(BoundaryMode::Heuristic);
        agg.record_nal(HevcNalUnitType::TrailR, started(0));
        let analysis = agg.finish();
        assert_eq!(analysis.messages, 0);
        assert_eq!(analysis.metadata_kind(), MetadataKind::Unknown);
        assert_eq!(analysis.verdict(), Verdict::Fail);
        assert_eq!(analysis.hdr10plus_version(), None);
    }

    #[test]
    fn test_零访问单元() {
        let analysis = Aggregator::new(BoundaryMode::Heuristic).finish();
        assert_eq!(analysis.total_aus, 0);
        assert_eq!(analysis.coverage(), 0.0);
        assert_eq!(analysis.density(), None);
        assert!(!analysis.frame_level_available());
        assert_eq!(analysis.verdict(), Verdict::Fail);
    }

    #[test]
    fn test_首个访问单元前的消息() {
        let mut agg = Aggregator::new(BoundaryMode::Heuristic);
        agg.record_nal(
            HevcNalUnitType::PrefixSei,
            AuAdvance {
                index: None,
                started: false,
            },
        );
        agg.record_t35_header(&hdr10plus_record(&[]));
        agg.record_hdr10plus(PAYLOAD_A, &stats(4000, 100));
        agg.record_nal(HevcNalUnitType::TrailR, started(0));

        let analysis = agg.finish();
        assert_eq!(analysis.messages, 1);
        assert_eq!(analysis.unassigned_messages, 1);
        assert_eq!(analysis.covered_aus(), 0);
        assert_eq!(analysis.total_aus, 1);
        // 有消息但没有覆盖任何访问单元
        assert_eq!(analysis.verdict(), Verdict::Partial);
    }

    #[test]
    fn test_动态元数据与游程() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        let sequence = [PAYLOAD_A, PAYLOAD_A, PAYLOAD_B, PAYLOAD_B, PAYLOAD_B, PAYLOAD_A];
        for (au, payload) in sequence.iter().enumerate() {
            agg.record_nal(HevcNalUnitType::Aud, started(au as u64));
            push_message(&mut agg, payload, &stats(4000 + au as u32, 100 * au as u32));
            agg.record_nal(HevcNalUnitType::TrailR, within(au as u64));
        }

        let analysis = agg.finish();
        assert_eq!(analysis.messages, 6);
        assert_eq!(analysis.unique_payloads, 2);
        assert_eq!(analysis.longest_static_run, 3);
        assert_eq!(analysis.metadata_kind(), MetadataKind::Dynamic);
        assert!(analysis.frame_level_available());
        assert_eq!(analysis.verdict(), Verdict::Pass);
        assert_eq!(analysis.window0.samples, 6);
        assert_eq!(analysis.window0.targeted_max_lum_range, Some((4000, 4005)));
        assert_eq!(analysis.window0.average_maxrgb_range, Some((0, 500)));
        assert_eq!(
            analysis.window0.first.map(|first| first.targeted_max_lum),
            Some(4000)
        );
    }

    #[test]
    fn test_末尾游程被冲刷() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        agg.record_nal(HevcNalUnitType::Aud, started(0));
        push_message(&mut agg, PAYLOAD_B, &stats(1, 1));
        for au in 1..5 {
            agg.record_nal(HevcNalUnitType::Aud, started(au));
            push_message(&mut agg, PAYLOAD_A, &stats(1, 1));
        }
        assert_eq!(agg.finish().longest_static_run, 4);
    }

    #[test]
    fn test_非4的app_id不通过() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        agg.record_nal(HevcNalUnitType::Aud, started(0));
        let mut record = hdr10plus_record(&[]);
        record.app_id = 2;
        agg.record_t35_header(&record);
        agg.record_hdr10plus(PAYLOAD_A, &stats(1, 1));

        let analysis = agg.finish();
        assert_eq!(analysis.covered_aus(), 1);
        assert_eq!(analysis.hdr10plus_version(), None);
        assert_eq!(analysis.verdict(), Verdict::Partial);
    }

    #[test]
    fn test_无法解码的主体单独计数() {
        let mut agg = Aggregator::new(BoundaryMode::Aud);
        agg.record_nal(HevcNalUnitType::Aud, started(0));
        agg.record_t35_header(&hdr10plus_record(&[]));
        agg.record_undecodable_body();

        let analysis = agg.finish();
        assert_eq!(analysis.t35.records, 1);
        assert_eq!(analysis.undecodable_bodies, 1);
        assert_eq!(analysis.messages, 0);
        assert_eq!(analysis.verdict(), Verdict::Fail);
    }
}
