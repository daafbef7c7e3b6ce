//! TTML 解析器模块

pub mod markup;
pub mod ttml_parser;
