//! 端到端分析流程: 字节流 → NAL → RBSP → SEI → T.35 → ST 2094-40 → 统计.
//!
//! 整个流程单线程、单遍 (另加一次寻找 AUD 的预扫描), 只有输入文件读取是 I/O.

use std::path::Path;

use hlgplus_codec::parsers::h265::{
    AccessUnitTracker, AnnexBScanner, HevcNalUnit, HevcNalUnitType, SeiMessages, nal_to_rbsp,
};
use hlgplus_codec::parsers::st2094_40::St2094_40Window0;
use hlgplus_codec::parsers::t35::T35Record;
use hlgplus_core::{HlgError, HlgResult};
use log::{debug, info, trace};

use crate::analyzer::{Aggregator, StreamAnalysis};

/// 分析内存中的 Annex-B 码流
///
/// 没有任何 NAL 单元时返回 [`HlgError::NoNalUnits`].
pub fn analyze_stream(data: &[u8]) -> HlgResult<StreamAnalysis> {
    let mut tracker = AccessUnitTracker::for_stream(data);
    let mut aggregator = Aggregator::new(tracker.mode());

    for nal in AnnexBScanner::new(data) {
        let advance = tracker.advance(&nal);
        let nal_type = nal.nal_type();
        trace!(
            "NAL {} offset={}, len={}, au={:?}",
            nal_type.name(),
            nal.offset,
            nal.data.len(),
            advance.index
        );
        aggregator.record_nal(nal_type, advance);

        if nal_type == HevcNalUnitType::PrefixSei && nal.data.len() > 2 {
            walk_prefix_sei(&nal, &mut aggregator);
        }
    }

    let analysis = aggregator.finish();
    if analysis.total_nals == 0 {
        return Err(HlgError::NoNalUnits);
    }
    info!(
        "分析完成: {} 个 NAL, {} 个访问单元, {} 条 HDR10+ 消息",
        analysis.total_nals, analysis.total_aus, analysis.messages
    );
    Ok(analysis)
}

/// 读取整个文件并分析
pub fn analyze_file(path: impl AsRef<Path>) -> HlgResult<StreamAnalysis> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HlgError::InputNotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    debug!("读取输入文件: {}, {} 字节", path.display(), data.len());
    analyze_stream(&data)
}

fn walk_prefix_sei(nal: &HevcNalUnit<'_>, aggregator: &mut Aggregator) {
    let rbsp = nal_to_rbsp(nal);
    for message in SeiMessages::new(&rbsp) {
        if !message.is_itu_t_t35() {
            trace!(
                "跳过 SEI payload_type={}, offset={}",
                message.payload_type, nal.offset
            );
            continue;
        }
        let Some(record) = T35Record::parse(message.payload) else {
            debug!("T.35 头不完整, offset={}, len={}", nal.offset, message.payload.len());
            continue;
        };
        aggregator.record_t35_header(&record);
        if !record.is_hdr10plus() {
            continue;
        }
        match St2094_40Window0::parse(record.app_data) {
            Ok(stats) => aggregator.record_hdr10plus(message.payload, &stats),
            Err(err) => {
                debug_assert!(err.is_recoverable(), "{err}");
                debug!("ST 2094-40 主体无法解码, offset={}: {err}", nal.offset);
                aggregator.record_undecodable_body();
            }
        }
    }
}
