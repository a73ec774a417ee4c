//! The provisioning run as a fixed linear sequence of phases.

use std::fmt;

/// One phase of the run. Every phase can fall into the fatal error path,
/// which terminates the process; there is no other branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CheckIis,
    NegotiateViewerPool,
    NegotiateServicesPool,
    CreateViewerPool,
    CreateServicesPool,
    SetPermissions,
    RunRegistration,
    Done,
}

impl Phase {
    /// Execution order of a run.
    pub const SEQUENCE: [Phase; 8] = [
        Phase::CheckIis,
        Phase::NegotiateViewerPool,
        Phase::NegotiateServicesPool,
        Phase::CreateViewerPool,
        Phase::CreateServicesPool,
        Phase::SetPermissions,
        Phase::RunRegistration,
        Phase::Done,
    ];

    /// Status line announced when the phase starts.
    pub fn label(self) -> &'static str {
        match self {
            Phase::CheckIis => "Checking IIS",
            Phase::NegotiateViewerPool => "Checking the Viewer application pool name",
            Phase::NegotiateServicesPool => "Checking the Services application pool name",
            Phase::CreateViewerPool => "Creating the Viewer application pool",
            Phase::CreateServicesPool => "Creating the Services application pool",
            Phase::SetPermissions => "Granting IIS_IUSRS access to the site directory",
            Phase::RunRegistration => "Running aspnet_regiis, this can take a while",
            Phase::Done => "IIS configuration finished",
        }
    }

    /// The phase that follows this one. `Done` is terminal.
    pub fn next(self) -> Option<Phase> {
        let index = Self::SEQUENCE.iter().position(|phase| *phase == self)?;
        Self::SEQUENCE.get(index + 1).copied()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_walks_from_check_to_done() {
        let mut walked = vec![Phase::CheckIis];
        while let Some(next) = walked.last().copied().and_then(Phase::next) {
            walked.push(next);
        }
        assert_eq!(walked, Phase::SEQUENCE);
    }

    #[test]
    fn done_is_terminal() {
        assert_eq!(Phase::Done.next(), None);
    }
}
