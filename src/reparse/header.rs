//! Fixed-layout header of the reparse data buffer

use bytemuck::{Pod, Zeroable};

/// Reparse tag of a mount point (junction).
pub const IO_REPARSE_TAG_MOUNT_POINT: u32 = 0xA000_0003;

/// Reparse tag of a symbolic link.
pub const IO_REPARSE_TAG_SYMLINK: u32 = 0xA000_000C;

/// Largest buffer `FSCTL_GET_REPARSE_POINT` can fill.
pub const MAXIMUM_REPARSE_DATA_BUFFER_SIZE: usize = 16 * 1024;

/// Leading fields shared by every `REPARSE_DATA_BUFFER` variant.
///
/// The tag-specific payload (substitute/print names, GUID, ...) follows
/// immediately after and is not decoded.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ReparseDataHeader {
    pub reparse_tag: u32,
    pub reparse_data_length: u16,
    pub reserved: u16,
}

impl ReparseDataHeader {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Overlay the header on the start of a buffer returned by the query.
    /// Returns `None` if fewer than [`Self::SIZE`] bytes were returned.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        let bytes = buf.get(..Self::SIZE)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    pub fn is_traversal_boundary(&self) -> bool {
        is_traversal_boundary(self.reparse_tag)
    }
}

/// Only symlinks and mount points stop traversal; other reparse
/// technologies (dedup, cloud files, ...) are walked normally.
pub fn is_traversal_boundary(tag: u32) -> bool {
    tag == IO_REPARSE_TAG_MOUNT_POINT || tag == IO_REPARSE_TAG_SYMLINK
}
