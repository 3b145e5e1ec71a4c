//! RBSP (Raw Byte Sequence Payload) 还原.
//!
//! 编码端在任意两个连续 0x00 之后若出现 0x00..=0x03, 会插入一个 0x03
//! (emulation_prevention_three_byte). 解码时按相同规则反向移除.

use super::nal::HevcNalUnit;

/// 移除 emulation prevention 字节 (0x03)
///
/// 紧跟在两个连续 0x00 之后的 0x03 被丢弃, 丢弃后零计数清零;
/// 零计数在超过 2 时保持为 2.
pub fn remove_emulation_prevention(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut zeros = 0u8;
    for &byte in data {
        if zeros == 2 && byte == 0x03 {
            zeros = 0;
            continue;
        }
        out.push(byte);
        zeros = if byte == 0x00 { (zeros + 1).min(2) } else { 0 };
    }
    out
}

/// 取 NAL 头之后的负载并还原为 RBSP
pub fn nal_to_rbsp(nal: &HevcNalUnit<'_>) -> Vec<u8> {
    remove_emulation_prevention(nal.payload())
}
