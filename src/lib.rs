#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use bit_cfg as cfg;
pub use bit_ptr as ptr;
pub use bit_utils as utils;
pub use bit_variant as variant;

pub use bit_variant::{Monostate, Variant};
