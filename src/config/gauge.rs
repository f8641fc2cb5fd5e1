//! Gauge (metric collection) definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeConfig {
    /// Metric object name pattern, unique within the gauge list
    pub object_name: String,
    pub attributes: Vec<GaugeAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeAttribute {
    pub name: String,
    /// Counter-style attribute; the collector reports deltas
    pub ever_increasing: bool,
}

impl GaugeAttribute {
    fn new(name: &str, ever_increasing: bool) -> Self {
        Self {
            name: name.to_string(),
            ever_increasing,
        }
    }
}

/// Gauges collected when no gauge section has been persisted yet
///
/// CPU load attributes only exist on current platform runtimes, so they are left out
/// when `legacy_runtime` is set.
pub fn default_gauge_configs(legacy_runtime: bool) -> Vec<GaugeConfig> {
    let mut operating_system = vec![GaugeAttribute::new("FreePhysicalMemorySize", false)];
    if !legacy_runtime {
        operating_system.push(GaugeAttribute::new("ProcessCpuLoad", false));
        operating_system.push(GaugeAttribute::new("SystemCpuLoad", false));
    }

    vec![
        GaugeConfig {
            object_name: "java.lang:type=Memory".to_string(),
            attributes: vec![GaugeAttribute::new("HeapMemoryUsage/used", false)],
        },
        GaugeConfig {
            object_name: "java.lang:type=GarbageCollector,name=*".to_string(),
            attributes: vec![
                GaugeAttribute::new("CollectionCount", true),
                GaugeAttribute::new("CollectionTime", true),
            ],
        },
        GaugeConfig {
            object_name: "java.lang:type=MemoryPool,name=*".to_string(),
            attributes: vec![GaugeAttribute::new("Usage/used", false)],
        },
        GaugeConfig {
            object_name: "java.lang:type=OperatingSystem".to_string(),
            attributes: operating_system,
        },
    ]
}
