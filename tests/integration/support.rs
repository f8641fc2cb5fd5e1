use agentconf::config::PropertyValue;
use agentconf::plugin::{PluginDescriptor, PropertyDescriptor, PropertyType};
use agentconf::settings::RepositorySettings;
use agentconf::ConfigRepository;
use tempfile::TempDir;

pub fn settings_in(temp: &TempDir) -> RepositorySettings {
    RepositorySettings {
        base_dir: temp.path().to_path_buf(),
        ..RepositorySettings::default()
    }
}

pub fn property(
    name: &str,
    property_type: PropertyType,
    default: Option<PropertyValue>,
) -> PropertyDescriptor {
    PropertyDescriptor {
        name: name.to_string(),
        property_type,
        default_value: default,
        label: String::new(),
    }
}

pub fn plugin(id: &str, properties: Vec<PropertyDescriptor>) -> PluginDescriptor {
    PluginDescriptor {
        id: id.to_string(),
        name: id.to_string(),
        properties,
    }
}

pub fn sample_plugins() -> Vec<PluginDescriptor> {
    vec![
        plugin(
            "servlet",
            vec![
                property(
                    "captureSessionAttributes",
                    PropertyType::String,
                    Some(PropertyValue::String("*".to_string())),
                ),
                property("enabled", PropertyType::Boolean, Some(PropertyValue::Boolean(true))),
            ],
        ),
        plugin(
            "Jdbc",
            vec![property("stackTraceThresholdMillis", PropertyType::Number, None)],
        ),
    ]
}

pub fn open(temp: &TempDir) -> ConfigRepository {
    ConfigRepository::open(&settings_in(temp), sample_plugins()).unwrap()
}
