//! 比特流读取器.
//!
//! 按大端位序 (MSB first) 从字节缓冲区中顺序读取位字段, 只能前进不能回退.
//! ST 2094-40 的 27 位 / 17 位字段都会跨越字节边界, 全部由这里拼接.

use crate::{HlgError, HlgResult};

/// 比特流读取器
///
/// # 示例
/// ```
/// use hlgplus_core::bitreader::BitReader;
///
/// let data = [0b10110001, 0b01010101];
/// let mut br = BitReader::new(&data);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.read_bits(12).unwrap(), 0b0001_0101_0101);
/// assert!(br.read_bits(1).is_err());
/// ```
pub struct BitReader<'a> {
    /// 源数据
    data: &'a [u8],
    /// 当前字节索引
    byte_pos: usize,
    /// 当前字节中的位位置 (0-7, 0 表示最高位)
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    /// 创建新的比特流读取器
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// 获取已读取的总位数
    pub fn bits_read(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    /// 获取剩余可读位数
    pub fn bits_left(&self) -> usize {
        if self.byte_pos >= self.data.len() {
            return 0;
        }
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }

    /// 是否已到达末尾
    pub fn is_eof(&self) -> bool {
        self.bits_left() == 0
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> HlgResult<u32> {
        if self.byte_pos >= self.data.len() {
            return Err(HlgError::InsufficientBits {
                requested: 1,
                remaining: 0,
            });
        }

        let bit = (self.data[self.byte_pos] >> (7 - self.bit_pos)) & 1;
        self.bit_pos += 1;
        if self.bit_pos >= 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }

        Ok(u32::from(bit))
    }

    /// 读取 1 位标志
    pub fn read_flag(&mut self) -> HlgResult<bool> {
        Ok(self.read_bit()? != 0)
    }

    /// 读取 N 个位 (最多 32 位)
    ///
    /// 位数不足时返回 [`HlgError::InsufficientBits`], 读取位置保持不变.
    pub fn read_bits(&mut self, n: u32) -> HlgResult<u32> {
        if n == 0 {
            return Ok(0);
        }
        if n > 32 {
            return Err(HlgError::InvalidArgument(format!(
                "read_bits: n={n} 超过 32 位"
            )));
        }
        let remaining = self.bits_left();
        if (n as usize) > remaining {
            return Err(HlgError::InsufficientBits {
                requested: n,
                remaining,
            });
        }

        let mut result: u32 = 0;
        let mut left = n;

        while left > 0 {
            let available = 8 - self.bit_pos as u32;
            let to_read = left.min(available);

            // 从当前字节中提取位
            let shift = available - to_read;
            let mask = ((1u32 << to_read) - 1) as u8;
            let bits = (self.data[self.byte_pos] >> shift) & mask;

            result = (result << to_read) | u32::from(bits);

            self.bit_pos += to_read as u8;
            if self.bit_pos >= 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
            left -= to_read;
        }

        Ok(result)
    }
}
