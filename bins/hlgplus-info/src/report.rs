//! 文本报告渲染 (树状布局).
//!
//! 只读取 [`StreamAnalysis`], 不做任何统计. 所有输出写入调用方给的 writer,
//! main 中为 stdout, 测试中为 `Vec<u8>`.

use std::io::{self, Write};

use hlgplus::analyzer::{MetadataKind, StreamAnalysis, Verdict};
use hlgplus::codec::parsers::st2094_40::to_nits;

/// 键名对齐宽度
const KEY_PAD: usize = 34;

/// 报告头部信息
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// 输入文件名 (不含目录)
    pub file_name: &'a str,
    /// 标题中的 profile 标签
    pub profile: &'a str,
}

/// 树状输出的基本元素
struct Tree<'w, W: Write> {
    out: &'w mut W,
}

impl<W: Write> Tree<'_, W> {
    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "│")?;
        writeln!(self.out, "├─ {title}")
    }

    fn kv(&mut self, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "│  ├─ {key:<KEY_PAD$}: {value}")
    }

    fn kv_end(&mut self, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "│  └─ {key:<KEY_PAD$}: {value}")
    }

    fn sub(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "│  ├─ {title}")
    }

    fn item(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "│  │  └─ {message}")
    }
}

/// 原始值与 nit 同时显示
fn luminance(raw: u32) -> String {
    format!("{raw} ({:.1} nits)", to_nits(raw))
}

fn luminance_range(range: Option<(u32, u32)>) -> String {
    match range {
        Some((lo, hi)) => format!("{lo}..{hi} ({:.1}..{:.1} nits)", to_nits(lo), to_nits(hi)),
        None => "n/a".to_string(),
    }
}

/// `n/m (pp.p%)`
pub fn format_coverage(analysis: &StreamAnalysis) -> String {
    format!(
        "{}/{} ({:.1}%)",
        analysis.covered_aus(),
        analysis.total_aus,
        analysis.coverage() * 100.0
    )
}

fn metadata_kind_label(kind: MetadataKind) -> &'static str {
    match kind {
        MetadataKind::Static => "Static",
        MetadataKind::Dynamic => "Dynamic",
        MetadataKind::Unknown => "Unknown",
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "PASS (HDR10+ metadata in every access unit, usable for HLG+)",
        Verdict::Partial => "PARTIAL (HDR10+ present but incomplete)",
        Verdict::Fail => "FAIL (no HDR10+ metadata detected)",
    }
}

fn mode_or_na<T>(mode: Option<T>, fmt: impl Fn(T) -> String) -> String {
    mode.map_or_else(|| "n/a".to_string(), fmt)
}

/// 渲染完整报告
pub fn render(
    out: &mut impl Write,
    ctx: &ReportContext<'_>,
    analysis: &StreamAnalysis,
) -> io::Result<()> {
    let mut tree = Tree { out };

    tree.section(&format!(
        "HLG+ / HDR10+ BITSTREAM INFO (Profile {})",
        ctx.profile
    ))?;
    tree.kv("File", ctx.file_name)?;
    tree.kv("Total NAL units", analysis.total_nals)?;
    tree.kv("VCL NAL units", analysis.vcl_units)?;
    tree.kv("SEI prefix NALs", analysis.prefix_sei_units)?;
    tree.kv("HDR10+ messages", analysis.messages)?;
    tree.kv("AUD present", analysis.aud_present())?;
    tree.kv_end("AU boundary mode", analysis.boundary_mode)?;

    tree.section("HDR format")?;
    match analysis.hdr10plus_version() {
        Some(version) => {
            tree.kv("Format", "HDR10+ (SMPTE ST 2094-40, Application 4)")?;
            tree.kv_end("Version", version)?;
        }
        None => tree.kv_end("Format", "not identified")?,
    }

    render_window0(&mut tree, analysis)?;

    tree.section("Stream structure")?;
    tree.kv("Total AUs", analysis.total_aus)?;
    tree.kv("AUs with HDR10+", analysis.covered_aus())?;
    tree.kv("Coverage", format_coverage(analysis))?;
    tree.kv("SEI suffix NALs", analysis.suffix_sei_units)?;
    tree.kv_end("AUD units", analysis.aud_units)?;

    render_metadata_detail(&mut tree, analysis)?;

    tree.section("T.35 header summary")?;
    let t35 = &analysis.t35;
    tree.kv("T.35 records", t35.records)?;
    tree.kv(
        "Country code",
        mode_or_na(t35.country_codes.mode(), |v| format!("0x{v:02X}")),
    )?;
    tree.kv(
        "Provider code",
        mode_or_na(t35.provider_codes.mode(), |v| format!("0x{v:04X}")),
    )?;
    tree.kv(
        "Provider oriented code",
        mode_or_na(t35.oriented_codes.mode(), |v| format!("0x{v:04X}")),
    )?;
    tree.kv(
        "Application id",
        mode_or_na(t35.app_ids.mode(), |v| v.to_string()),
    )?;
    tree.kv_end(
        "Application version",
        mode_or_na(t35.app_versions.mode(), |v| v.to_string()),
    )?;

    tree.section("Result")?;
    tree.kv_end("Status", verdict_label(analysis.verdict()))?;
    Ok(())
}

fn render_window0<W: Write>(tree: &mut Tree<'_, W>, analysis: &StreamAnalysis) -> io::Result<()> {
    tree.section("Window 0 sample (first message)")?;
    let window0 = &analysis.window0;
    let Some(first) = window0.first else {
        return tree.kv_end("Sample", "no decodable ST 2094-40 body");
    };

    tree.kv("num_windows", first.num_windows)?;
    tree.kv("Targeted max luminance", luminance(first.targeted_max_lum))?;
    match (first.luminance, first.peak_luminance_note()) {
        (Some(lum), _) => {
            tree.kv("maxscl R", luminance(lum.maxscl[0]))?;
            tree.kv("maxscl G", luminance(lum.maxscl[1]))?;
            tree.kv("maxscl B", luminance(lum.maxscl[2]))?;
            tree.kv("average_maxrgb", luminance(lum.average_maxrgb))?;
        }
        (None, Some(note)) => tree.kv("Note", note)?,
        (None, None) => {}
    }

    tree.sub(&format!("Range over {} samples", window0.samples))?;
    tree.item(format!(
        "Targeted max luminance: {}",
        luminance_range(window0.targeted_max_lum_range)
    ))?;
    tree.item(format!(
        "average_maxrgb: {}",
        luminance_range(window0.average_maxrgb_range)
    ))?;
    tree.kv_end("Peak luminance flag set", window0.peak_flag_samples)
}

fn render_metadata_detail<W: Write>(
    tree: &mut Tree<'_, W>,
    analysis: &StreamAnalysis,
) -> io::Result<()> {
    tree.section("HDR10+ metadata detail")?;

    tree.sub("Availability")?;
    tree.item(format!(
        "HDR10+ before first VCL: {}",
        analysis.messages_before_first_vcl
    ))?;
    tree.item(format!(
        "Frame-level availability: {}",
        analysis.frame_level_available()
    ))?;

    tree.sub("Per-AU density")?;
    match analysis.density() {
        Some(density) => {
            tree.item(format!("Min per AU: {}", density.min))?;
            tree.item(format!("Max per AU: {}", density.max))?;
            tree.item(format!("Avg per AU: {:.2}", density.avg))?;
        }
        None => tree.item("No AU mapping available")?,
    }
    tree.item(format!(
        "Messages before first AU: {}",
        analysis.unassigned_messages
    ))?;
    tree.item(format!(
        "Undecodable ST 2094-40 bodies: {}",
        analysis.undecodable_bodies
    ))?;

    tree.sub("Metadata classification")?;
    tree.item(format!(
        "Metadata type: {}",
        metadata_kind_label(analysis.metadata_kind())
    ))?;
    tree.item(format!(
        "Unique HDR10+ payloads: {}",
        analysis.unique_payloads
    ))?;
    tree.item(format!(
        "Longest static run: {} messages",
        analysis.longest_static_run
    ))
}
