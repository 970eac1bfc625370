use std::ffi::{c_int, CString};
use std::path::PathBuf;

use crate::gdalinterop::{self, create_string_list};
use crate::{Error, Result};

struct BuildVrtOptionsWrapper {
    options: *mut gdal_sys::GDALBuildVRTOptions,
}

impl BuildVrtOptionsWrapper {
    fn new(opts: &[String]) -> Result<Self> {
        let c_opts = create_string_list(opts)?;

        Ok(BuildVrtOptionsWrapper {
            options: unsafe { gdal_sys::GDALBuildVRTOptionsNew(c_opts.as_ptr(), core::ptr::null_mut()) },
        })
    }
}

impl Drop for BuildVrtOptionsWrapper {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALBuildVRTOptionsFree(self.options);
        }
    }
}

/// Build a VRT over the given source files at `dest` (typically a `/vsimem/`
/// scratch path). Sources listed later take precedence where they overlap.
pub fn build_vrt(dest: &str, inputs: &[PathBuf], options: &[String]) -> Result<gdal::Dataset> {
    if inputs.is_empty() {
        return Err(Error::InvalidArgument("VRT needs at least one source".to_string()));
    }

    let vrt_options = BuildVrtOptionsWrapper::new(options)?;
    let input_names: Vec<String> = inputs.iter().map(|p| p.to_string_lossy().into_owned()).collect();
    let c_names = create_string_list(&input_names)?;
    let dest_c = CString::new(dest)?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALBuildVRT(
            dest_c.as_ptr(),
            inputs.len() as c_int,
            std::ptr::null_mut(),
            c_names.as_ptr(),
            vrt_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::InvalidArgument("GDAL BuildVRT: invalid arguments".to_string()));
        }

        Ok(gdal::Dataset::from_c_dataset(gdalinterop::check_pointer(
            handle,
            "GDALBuildVRT",
        )?))
    }
}
