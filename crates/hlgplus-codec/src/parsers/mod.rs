//! 码流解析器.
//!
//! `h265` 负责从字节流中取出 SEI 负载, `t35` 与 `st2094_40` 负责解释负载内容.

pub mod h265;
pub mod st2094_40;
pub mod t35;
