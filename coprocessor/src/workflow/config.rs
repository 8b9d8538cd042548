use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use visioncore::classify::TargetParams;
use visioncore::framebuf::FrameHandoff;

use crate::generator::shapes::SceneConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Number of attached camera feeds the source index selects between.
    pub cameras: usize,
    pub handoff: FrameHandoff,
    /// Bind address for the telemetry bridge.
    pub bind: IpAddr,
    pub port: u16,
    pub target: TargetParams,
    pub scene: SceneConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            cameras: 1,
            handoff: FrameHandoff::default(),
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 9000,
            target: TargetParams::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl VisionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading vision config {}", path_ref.display()))?;
        let config: VisionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing vision config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(cameras: usize, seed: u64) -> Self {
        Self {
            cameras,
            scene: SceneConfig {
                seed,
                ..SceneConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn bridge_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
