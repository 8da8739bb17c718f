use scara::{Configurable, GlobalConfig, MachineConfig};

#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Targets to visit in order.
    pub targets: Vec<scara::core::Target>,
    /// Number of random reachable targets to append.
    pub random_targets: usize,
    /// Sweep every joint for this many seconds instead of targeting.
    pub sweep: Option<f64>,
    /// Tick trace output file.
    pub trace: Option<std::path::PathBuf>,
    /// Machine description.
    pub machine: MachineConfig,
    /// Global configuration.
    pub global: GlobalConfig,
}

impl Configurable for SimConfig {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}
