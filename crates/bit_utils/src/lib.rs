#![doc = "Small building blocks shared by the `bit_*` crates."]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod range_invoke;
