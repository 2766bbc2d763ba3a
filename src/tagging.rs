///
/// @package filet-rs
///
/// @file Taggings functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use bitflags::bitflags;

pub(crate) const MAX_WORKSPACES: usize = 32;

bitflags! {
    /// Workspace membership, one bit per workspace
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub(crate) struct Tagging: u32 {
        const _ = !0;
    }
}

impl Tagging {
    /// Mask covering the first `len` workspaces
    pub(crate) fn mask(len: usize) -> Self {
        if MAX_WORKSPACES <= len {
            Self::all()
        } else {
            Self::from_bits_retain((1u32 << len) - 1)
        }
    }

    /// Tagging of the single workspace with index `idx`
    pub(crate) fn workspace(idx: usize) -> Self {
        Self::from_bits_retain(1u32.checked_shl(idx as u32).unwrap_or(0))
    }

    /// Rotate the bits by `delta` workspaces inside the first `len` bits
    ///
    /// # Arguments
    ///
    /// * `delta` - Signed amount of workspaces to shift, negative goes left
    /// * `len` - Number of configured workspaces
    ///
    /// # Returns
    ///
    /// Rotated [`Tagging`] limited to the workspace mask
    pub(crate) fn rotate(self, delta: i32, len: usize) -> Self {
        if 0 == len || MAX_WORKSPACES < len {
            return self;
        }

        let mask = Self::mask(len);
        let bits = (self & mask).bits();
        let shift = delta.rem_euclid(len as i32) as u32;

        if 0 == shift {
            return Self::from_bits_retain(bits);
        }

        let rotated = (bits << shift) | (bits >> (len as u32 - shift));

        Self::from_bits_retain(rotated) & mask
    }
}
