use std::ffi::{c_int, CString};
use std::path::Path;

use crate::gdalinterop::{self, create_string_list};
use crate::{Error, Result};

struct TranslateOptionsWrapper {
    options: *mut gdal_sys::GDALTranslateOptions,
}

impl TranslateOptionsWrapper {
    fn new(opts: &[String]) -> Result<Self> {
        let c_opts = create_string_list(opts)?;

        Ok(TranslateOptionsWrapper {
            options: unsafe { gdal_sys::GDALTranslateOptionsNew(c_opts.as_ptr(), core::ptr::null_mut()) },
        })
    }
}

impl Drop for TranslateOptionsWrapper {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALTranslateOptionsFree(self.options);
        }
    }
}

/// Run the translate utility, materializing `src_ds` into `dest_path`.
pub fn translate_to_disk(src_ds: &gdal::Dataset, dest_path: &Path, options: &[String]) -> Result<gdal::Dataset> {
    let translate_options = TranslateOptionsWrapper::new(options)?;

    gdalinterop::create_output_directory_if_needed(dest_path)?;

    let path_str = CString::new(dest_path.to_string_lossy().to_string())?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALTranslate(
            path_str.as_ptr(),
            src_ds.c_dataset(),
            translate_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::InvalidArgument("GDAL Translate: invalid arguments".to_string()));
        }

        Ok(gdal::Dataset::from_c_dataset(gdalinterop::check_pointer(
            handle,
            "GDALTranslate",
        )?))
    }
}
