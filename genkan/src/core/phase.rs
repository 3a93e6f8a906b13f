/// Application lifecycle phase.
///
/// Advances monotonically except for the `Running` ⇄ `Paused` oscillation
/// driven by window visibility. `Dying` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    None,
    Created,
    Running,
    Paused,
    Dying,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::None => "NONE",
            Phase::Created => "CREATED",
            Phase::Running => "RUNNING",
            Phase::Paused => "PAUSED",
            Phase::Dying => "DYING",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::None
    }
}
