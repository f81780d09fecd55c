pub mod settings;

use settings::Settings;
use std::path::Path;

/// Locate and load `settings.yaml` for the given input PDF.
///
/// If a `settings.yaml` exists in the same directory as the input file it
/// is loaded, otherwise the defaults are returned.
pub fn load_settings_for_input(input_path: &Path) -> crate::error::Result<Settings> {
    let dir = input_path.parent().ok_or_else(|| {
        crate::error::ExamNormError::config("Cannot determine input file directory")
    })?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
