//! 库通用的数据模型。

pub mod cue;

pub use cue::{Cue, CueAction};
