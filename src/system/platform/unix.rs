use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::VolumeSpace;
use crate::error::BackendError;

const SOURCE: &str = "statvfs";

pub fn statvfs_space(path: &Path) -> Result<VolumeSpace, BackendError> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| BackendError::malformed(SOURCE, "path contains a NUL byte"))?;

    let mut stat = std::mem::MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: c_path is NUL terminated and stat points to writable storage
    // of the right size; it is only read after a successful call.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(BackendError::from_io(
            SOURCE,
            &std::io::Error::last_os_error(),
        ));
    }
    let stat = unsafe { stat.assume_init() };

    #[allow(clippy::unnecessary_cast)]
    let fragment = stat.f_frsize as u64;
    #[allow(clippy::unnecessary_cast)]
    let (blocks, free) = (stat.f_blocks as u64, stat.f_bfree as u64);

    if blocks == 0 || fragment == 0 {
        return Err(BackendError::unavailable(SOURCE, "volume reports zero size"));
    }

    Ok(VolumeSpace {
        total_bytes: blocks.saturating_mul(fragment),
        free_bytes: free.saturating_mul(fragment),
    })
}
