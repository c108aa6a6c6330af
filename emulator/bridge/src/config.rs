// Licensed under the Apache-2.0 license

/// How the bridge treats the `WE` field of the control register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WriteEnablePolicy {
    /// `WE` clears itself on the edge that commits the write. The host has
    /// to set it again for every write, even to the same address.
    #[default]
    Pulse,

    /// `WE` is a level owned by the host. Every edge at which `CS` and `WE`
    /// hold commits the current write data to the current address.
    Level,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    pub write_enable: WriteEnablePolicy,
}

impl BridgeConfig {
    pub fn new(write_enable: WriteEnablePolicy) -> Self {
        Self { write_enable }
    }
}
