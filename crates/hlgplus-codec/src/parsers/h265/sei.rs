//! SEI (Supplemental Enhancement Information) 消息遍历.
//!
//! 输入为已去除防竞争字节、且跳过 2 字节 NAL 头的 RBSP.
//! payload_type 与 payload_size 都采用 0xFF 转义编码: 每个 0xFF 累加 255,
//! 第一个非 0xFF 字节累加自身值后结束.
//!
//! 截断的消息视为消息序列结束, 不报错.

use log::trace;

/// user_data_registered_itu_t_t35
pub const SEI_USER_DATA_REGISTERED_ITU_T_T35: u32 = 4;
/// user_data_unregistered
pub const SEI_USER_DATA_UNREGISTERED: u32 = 5;
/// mastering_display_colour_volume
pub const SEI_MASTERING_DISPLAY_COLOUR_VOLUME: u32 = 137;
/// content_light_level_info
pub const SEI_CONTENT_LIGHT_LEVEL_INFO: u32 = 144;

/// 单条 SEI 消息 (借用 RBSP)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeiMessage<'a> {
    pub payload_type: u32,
    pub payload: &'a [u8],
}

impl SeiMessage<'_> {
    /// 是否为 ITU-T T.35 注册用户数据
    pub fn is_itu_t_t35(&self) -> bool {
        self.payload_type == SEI_USER_DATA_REGISTERED_ITU_T_T35
    }
}

/// SEI 消息迭代器
#[derive(Debug, Clone)]
pub struct SeiMessages<'a> {
    rbsp: &'a [u8],
    offset: usize,
}

impl<'a> SeiMessages<'a> {
    pub fn new(rbsp: &'a [u8]) -> Self {
        Self { rbsp, offset: 0 }
    }

    fn read_ff_coded_value(&mut self) -> Option<u32> {
        let mut value = 0u32;
        loop {
            let byte = *self.rbsp.get(self.offset)?;
            self.offset += 1;
            value = value.checked_add(u32::from(byte))?;
            if byte != 0xFF {
                return Some(value);
            }
        }
    }

    fn read_message(&mut self) -> Option<SeiMessage<'a>> {
        if is_rbsp_trailing_bits(&self.rbsp[self.offset..]) {
            return None;
        }
        let payload_type = self.read_ff_coded_value()?;
        let payload_size = usize::try_from(self.read_ff_coded_value()?).ok()?;
        let payload_end = self.offset.checked_add(payload_size)?;
        let payload = self.rbsp.get(self.offset..payload_end)?;
        self.offset = payload_end;
        Some(SeiMessage {
            payload_type,
            payload,
        })
    }
}

impl<'a> Iterator for SeiMessages<'a> {
    type Item = SeiMessage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.rbsp.len() {
            return None;
        }
        match self.read_message() {
            Some(message) => Some(message),
            None => {
                if self.offset < self.rbsp.len() {
                    trace!(
                        "SEI 遍历提前结束, offset={}, len={}",
                        self.offset,
                        self.rbsp.len()
                    );
                }
                // 截断后不再继续
                self.offset = self.rbsp.len();
                None
            }
        }
    }
}

/// 剩余字节是否为 rbsp_trailing_bits (0x80 后仅跟 0x00)
fn is_rbsp_trailing_bits(rest: &[u8]) -> bool {
    match rest.split_first() {
        None => true,
        Some((first, tail)) => *first == 0x80 && tail.iter().all(|v| *v == 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_单条t35消息() {
        let payload = [0xB5, 0x00, 0x3C, 0x00, 0x01, 0x04, 0x01];
        let mut rbsp = vec![0x04, payload.len() as u8];
        rbsp.extend_from_slice(&payload);
        rbsp.push(0x80);

        let messages: Vec<_> = SeiMessages::new(&rbsp).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload_type, 4);
        assert_eq!(messages[0].payload, &payload);
        assert!(messages[0].is_itu_t_t35());
    }

    #[test]
    fn test_ff转义_260() {
        // payload_type = 260 (0xFF 0x05), payload_size = 300 (0xFF 0x2D)
        let mut rbsp = vec![0xFF, 0x05, 0xFF, 0x2D];
        rbsp.extend(std::iter::repeat_n(0xAB, 300));

        let messages: Vec<_> = SeiMessages::new(&rbsp).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload_type, 260);
        assert_eq!(messages[0].payload.len(), 300);
    }

    #[test]
    fn test_多条消息() {
        let rbsp = [
            0x89, 0x02, 0x11, 0x22, // type 137
            0x90, 0x01, 0x33, // type 144
            0x04, 0x00, // type 4, 空负载
            0x80,
        ];
        let messages: Vec<_> = SeiMessages::new(&rbsp).collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].payload_type, SEI_MASTERING_DISPLAY_COLOUR_VOLUME);
        assert_eq!(messages[0].payload, &[0x11, 0x22]);
        assert_eq!(messages[1].payload_type, SEI_CONTENT_LIGHT_LEVEL_INFO);
        assert_eq!(messages[2].payload_type, 4);
        assert!(messages[2].payload.is_empty());
    }

    #[test]
    fn test_末尾停止位() {
        assert_eq!(SeiMessages::new(&[0x80]).count(), 0);
        assert_eq!(SeiMessages::new(&[0x80, 0x00, 0x00]).count(), 0);
        assert_eq!(SeiMessages::new(&[]).count(), 0);
    }

    #[test]
    fn test_截断消息静默结束() {
        // 负载声明 10 字节, 实际只有 3 字节
        let rbsp = [0x05, 0x02, 0xAA, 0xBB, 0x04, 0x0A, 0x01, 0x02, 0x03];
        let messages: Vec<_> = SeiMessages::new(&rbsp).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload_type, SEI_USER_DATA_UNREGISTERED);

        // 转义序列读到末尾
        assert_eq!(SeiMessages::new(&[0xFF, 0xFF]).count(), 0);
        // 缺少 payload_size
        assert_eq!(SeiMessages::new(&[0x04]).count(), 0);
    }

    #[test]
    fn test_截断后迭代器保持结束() {
        let rbsp = [0x04, 0x05, 0x01];
        let mut walker = SeiMessages::new(&rbsp);
        assert!(walker.next().is_none());
        assert!(walker.next().is_none());
    }
}
