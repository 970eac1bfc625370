use std::ffi::{c_int, CString};
use std::path::Path;

use crate::gdalinterop::{self, create_string_list};
use crate::{Error, Result};

struct WarpAppOptionsWrapper {
    options: *mut gdal_sys::GDALWarpAppOptions,
}

impl WarpAppOptionsWrapper {
    fn new(opts: &[String]) -> Result<Self> {
        let c_opts = create_string_list(opts)?;

        Ok(WarpAppOptionsWrapper {
            options: unsafe { gdal_sys::GDALWarpAppOptionsNew(c_opts.as_ptr(), core::ptr::null_mut()) },
        })
    }
}

impl Drop for WarpAppOptionsWrapper {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALWarpAppOptionsFree(self.options);
        }
    }
}

/// Run the warp utility on a single source dataset, writing the result to
/// `dest_path`.
pub fn warp_to_disk(src_ds: &gdal::Dataset, dest_path: &Path, options: &[String]) -> Result {
    let warp_options = WarpAppOptionsWrapper::new(options)?;

    gdalinterop::create_output_directory_if_needed(dest_path)?;

    let path_str = CString::new(dest_path.to_string_lossy().to_string())?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALWarp(
            path_str.as_ptr(),
            std::ptr::null_mut(),
            1,
            &mut src_ds.c_dataset(),
            warp_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::InvalidArgument("GDAL Warp: invalid arguments".to_string()));
        }

        gdal::Dataset::from_c_dataset(gdalinterop::check_pointer(handle, "GDALWarp")?);
    }

    Ok(())
}
