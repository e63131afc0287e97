use bitflags::bitflags;

bitflags! {
    /// Lifecycle state, kept as bit flags rather than a plain enum because
    /// a transition briefly holds two bits at once — `STARTING` stays set
    /// alongside `STARTED` until genesis/recovery finishes, and `STOPPING`
    /// alongside whatever state preceded it until in-flight work drains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const STARTING = 0b0_0001;
        const STARTED  = 0b0_0010;
        const PAUSED   = 0b0_0100;
        const STOPPING = 0b0_1000;
        const STOPPED  = 0b1_0000;
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::STOPPED
    }
}

impl Status {
    /// Whether the chain is accepting and mining transactions right now.
    pub fn is_running(&self) -> bool {
        self.contains(Status::STARTED) && !self.contains(Status::PAUSED)
    }

    pub fn is_stopped(&self) -> bool {
        self.contains(Status::STOPPED)
    }
}
