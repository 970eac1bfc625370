use bon::bon;

use crate::gdalinterop;
use crate::Result;

/// Process wide GDAL runtime settings, applied once at startup.
pub struct RuntimeConfiguration {
    config_options: Vec<(String, String)>,
    debug_logging: bool,
}

#[bon]
impl RuntimeConfiguration {
    #[builder]
    pub fn new(config_options: Option<Vec<(String, String)>>, gdal_debug_log: Option<bool>) -> Self {
        Self {
            config_options: config_options.unwrap_or_default(),
            debug_logging: gdal_debug_log.unwrap_or(false),
        }
    }

    pub fn apply(&self) -> Result {
        gdalinterop::setup_logging();

        if self.debug_logging && gdal::config::set_config_option("CPL_DEBUG", "ON").is_err() {
            log::debug!("Failed to set GDAL debug level");
        }

        for (key, value) in &self.config_options {
            gdal::config::set_config_option(key, value)?;
        }

        Ok(())
    }
}
