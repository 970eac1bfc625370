use std::ffi::{c_int, CString};
use std::path::Path;

use crate::gdalinterop::{self, create_string_list};
use crate::{Error, Result};

struct DemProcessingOptionsWrapper {
    options: *mut gdal_sys::GDALDEMProcessingOptions,
}

impl DemProcessingOptionsWrapper {
    fn new(opts: &[String]) -> Result<Self> {
        let c_opts = create_string_list(opts)?;

        Ok(DemProcessingOptionsWrapper {
            options: unsafe { gdal_sys::GDALDEMProcessingOptionsNew(c_opts.as_ptr(), core::ptr::null_mut()) },
        })
    }
}

impl Drop for DemProcessingOptionsWrapper {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALDEMProcessingOptionsFree(self.options);
        }
    }
}

/// Run one DEM processing mode (`hillshade`, `slope`, `aspect`) over the
/// source elevation dataset.
pub fn dem_processing(src_ds: &gdal::Dataset, dest_path: &Path, mode: &str, options: &[String]) -> Result {
    let dem_options = DemProcessingOptionsWrapper::new(options)?;

    gdalinterop::create_output_directory_if_needed(dest_path)?;

    let path_str = CString::new(dest_path.to_string_lossy().to_string())?;
    let mode_str = CString::new(mode)?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALDEMProcessing(
            path_str.as_ptr(),
            src_ds.c_dataset(),
            mode_str.as_ptr(),
            std::ptr::null(),
            dem_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::InvalidArgument(format!("GDAL DEMProcessing ({mode}): invalid arguments")));
        }

        gdal::Dataset::from_c_dataset(gdalinterop::check_pointer(handle, "GDALDEMProcessing")?);
    }

    Ok(())
}
