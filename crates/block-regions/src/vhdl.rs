//! Excluded-region scanner for VHDL. Shares its lexical rules with Ada;
//! see [`crate::tick_family`].

use crate::tick_family;
use block_token::ExcludedRegion;

pub fn find_excluded(source: &str) -> Vec<ExcludedRegion> {
    tick_family::find_excluded(source, tick_family::Flavor::Vhdl)
}
