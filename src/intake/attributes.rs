use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Allowed colors and storage options for one manufacturer/model pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeviceConfiguration {
    pub manufacturer: String,
    pub model: String,
    pub colors: Vec<String>,
    pub storage_options: Vec<String>,
}

impl DeviceConfiguration {
    pub fn allows_color(&self, color: &str) -> bool {
        contains_ignore_case(&self.colors, color)
    }

    pub fn allows_storage(&self, storage: &str) -> bool {
        contains_ignore_case(&self.storage_options, storage)
    }
}

fn contains_ignore_case(allowed: &[String], value: &str) -> bool {
    let value = value.trim();
    allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(value))
}

/// Checks color and storage against the configuration, if there is one.
///
/// Returns the combined error text, or `None` when the entry is acceptable.
/// Unset attributes are not checked; without a configuration nothing is.
pub fn validate_attributes(
    color: Option<&str>,
    storage: Option<&str>,
    configuration: Option<&DeviceConfiguration>,
) -> Option<String> {
    let config = configuration?;
    let mut errors = Vec::new();

    if let Some(color) = color.filter(|c| !c.trim().is_empty()) {
        if !config.allows_color(color) {
            errors.push(format!(
                "Invalid color \"{}\". Allowed: {}",
                color,
                config.colors.join(", ")
            ));
        }
    }

    if let Some(storage) = storage.filter(|s| !s.trim().is_empty()) {
        if !config.allows_storage(storage) {
            errors.push(format!(
                "Invalid storage \"{}\". Allowed: {}",
                storage,
                config.storage_options.join(", ")
            ));
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iphone() -> DeviceConfiguration {
        DeviceConfiguration {
            manufacturer: "Apple".into(),
            model: "iPhone 13".into(),
            colors: vec!["Midnight".into(), "Starlight".into()],
            storage_options: vec!["128GB".into(), "256GB".into()],
        }
    }

    #[test]
    fn no_configuration_skips_validation() {
        assert_eq!(validate_attributes(Some("Purple"), Some("1TB"), None), None);
    }

    #[test]
    fn allowed_values_pass_case_insensitively() {
        let config = iphone();
        assert_eq!(
            validate_attributes(Some("midnight"), Some(" 128gb "), Some(&config)),
            None
        );
    }

    #[test]
    fn unset_values_are_not_checked() {
        let config = iphone();
        assert_eq!(validate_attributes(None, Some(""), Some(&config)), None);
    }

    #[test]
    fn both_errors_are_combined() {
        let config = iphone();
        let error = validate_attributes(Some("Purple"), Some("1TB"), Some(&config)).unwrap();
        assert_eq!(
            error,
            "Invalid color \"Purple\". Allowed: Midnight, Starlight; \
             Invalid storage \"1TB\". Allowed: 128GB, 256GB"
        );
    }

    #[test]
    fn single_error() {
        let config = iphone();
        let error = validate_attributes(Some("Starlight"), Some("64GB"), Some(&config)).unwrap();
        assert!(error.starts_with("Invalid storage"));
        assert!(!error.contains("color"));
    }
}
