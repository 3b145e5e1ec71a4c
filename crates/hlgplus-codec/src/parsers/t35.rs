//! ITU-T T.35 注册用户数据头.
//!
//! ```text
//! country_code(8) [country_code_extension(8) 当 country_code == 0xFF]
//! terminal_provider_code(16) terminal_provider_oriented_code(16)
//! application_identifier(8) application_version(8) application_data(...)
//! ```
//!
//! 任何一段字节不足都视为没有记录 (返回 `None`), 而不是错误.

/// HDR10+ 使用的 country_code (美国)
pub const HDR10PLUS_COUNTRY_CODE: u8 = 0xB5;
/// HDR10+ 使用的 terminal_provider_code
pub const HDR10PLUS_PROVIDER_CODE: u16 = 0x003C;
/// country_code 扩展转义值
pub const COUNTRY_CODE_EXTENSION_ESCAPE: u8 = 0xFF;

/// T.35 记录 (app_data 借用 SEI 负载)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct T35Record<'a> {
    pub country_code: u8,
    /// country_code 为 0xFF 时的扩展字节, 不做解释
    pub country_code_extension: Option<u8>,
    pub provider_code: u16,
    /// terminal_provider_oriented_code
    pub oriented_code: u16,
    pub app_id: u8,
    pub app_ver: u8,
    pub app_data: &'a [u8],
}

impl<'a> T35Record<'a> {
    /// 解析 user_data_registered_itu_t_t35 负载
    pub fn parse(payload: &'a [u8]) -> Option<Self> {
        let (&country_code, rest) = payload.split_first()?;
        let (country_code_extension, rest) = if country_code == COUNTRY_CODE_EXTENSION_ESCAPE {
            let (&ext, rest) = rest.split_first()?;
            (Some(ext), rest)
        } else {
            (None, rest)
        };
        let (provider, rest) = rest.split_first_chunk::<2>()?;
        let (oriented, rest) = rest.split_first_chunk::<2>()?;
        let (&app_id, rest) = rest.split_first()?;
        let (&app_ver, app_data) = rest.split_first()?;

        Some(Self {
            country_code,
            country_code_extension,
            provider_code: u16::from_be_bytes(*provider),
            oriented_code: u16::from_be_bytes(*oriented),
            app_id,
            app_ver,
            app_data,
        })
    }

    /// 是否带有 HDR10+ (SMPTE ST 2094-40) 签名
    pub fn is_hdr10plus(&self) -> bool {
        self.country_code == HDR10PLUS_COUNTRY_CODE
            && self.provider_code == HDR10PLUS_PROVIDER_CODE
    }
}
