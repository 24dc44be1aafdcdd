//! Windows reparse check via `FSCTL_GET_REPARSE_POINT`

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::Win32::Foundation::{
    CloseHandle, ERROR_INVALID_FUNCTION, ERROR_NOT_A_REPARSE_POINT, ERROR_NOT_SUPPORTED, HANDLE,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT, FILE_SHARE_DELETE,
    FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows::Win32::System::IO::DeviceIoControl;
use windows::Win32::System::Ioctl::FSCTL_GET_REPARSE_POINT;
use windows::core::{HRESULT, PCWSTR};

use super::header::{MAXIMUM_REPARSE_DATA_BUFFER_SIZE, ReparseDataHeader};
use crate::error::SizeError;

/// Closes the wrapped handle on every exit path.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Query failures that mean "no reparse data here" rather than a broken query.
/// FAT and exFAT volumes reject the control code outright.
fn means_not_a_reparse_point(code: HRESULT) -> bool {
    [
        ERROR_NOT_A_REPARSE_POINT,
        ERROR_INVALID_FUNCTION,
        ERROR_NOT_SUPPORTED,
    ]
    .iter()
    .any(|err| err.to_hresult() == code)
}

pub fn is_reparse_point(path: &Path) -> Result<bool, SizeError> {
    let wide_path: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // Zero access, shared with everyone, backup semantics so directories
    // open, and the reparse point itself rather than its target.
    let handle = match unsafe {
        CreateFileW(
            PCWSTR(wide_path.as_ptr()),
            0,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            None,
            OPEN_EXISTING,
            FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT,
            None,
        )
    } {
        Ok(h) if !h.is_invalid() => OwnedHandle(h),
        _ => return Ok(false),
    };

    let mut buffer = vec![0u8; MAXIMUM_REPARSE_DATA_BUFFER_SIZE];
    let mut bytes_returned: u32 = 0;

    let query = unsafe {
        DeviceIoControl(
            handle.0,
            FSCTL_GET_REPARSE_POINT,
            None,
            0,
            Some(buffer.as_mut_ptr() as *mut c_void),
            buffer.len() as u32,
            Some(&mut bytes_returned),
            None,
        )
    };

    if let Err(e) = query {
        if means_not_a_reparse_point(e.code()) {
            return Ok(false);
        }
        return Err(SizeError::ReparseQuery {
            path: path.to_path_buf(),
            source: std::io::Error::from(e),
        });
    }

    let returned = (bytes_returned as usize).min(buffer.len());
    Ok(ReparseDataHeader::parse(&buffer[..returned])
        .is_some_and(|header| header.is_traversal_boundary()))
}
