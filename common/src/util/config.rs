use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub checks: CheckConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Unit steps outside the grid never add demand. When this is set they
    /// still add wirelength, which is how the reference scores are computed.
    #[serde(default = "default_count_out_of_bounds_wirelength")]
    pub count_out_of_bounds_wirelength: bool,
    #[serde(default = "default_unit_length_wire_cost")]
    pub unit_length_wire_cost: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            count_out_of_bounds_wirelength: default_count_out_of_bounds_wirelength(),
            unit_length_wire_cost: default_unit_length_wire_cost(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_layer_breakdown")]
    pub layer_breakdown: bool,
    /// 0 lists every error.
    #[serde(default)]
    pub max_errors_per_net: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            layer_breakdown: default_layer_breakdown(),
            max_errors_per_net: 0,
        }
    }
}

fn default_count_out_of_bounds_wirelength() -> bool {
    true
}

fn default_unit_length_wire_cost() -> u64 {
    1
}

fn default_parallel() -> bool {
    true
}

fn default_layer_breakdown() -> bool {
    true
}
