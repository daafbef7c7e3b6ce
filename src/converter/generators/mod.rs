//! TTML 生成器模块

pub mod ttml_generator;
pub mod ttml_writer;
