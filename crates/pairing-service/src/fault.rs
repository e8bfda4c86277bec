//! Classified handling of background transport faults.
//!
//! Transient signatures from the messaging service (session conflicts,
//! rate limiting, abrupt closes) are suppressed; anything else is surfaced
//! loudly in the logs. Nothing here terminates the process.

use tracing::{debug, error};
use wa_gateway_client::TransportError;

/// What to do with a fault raised outside a request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDisposition {
    /// Known transient signature, swallowed.
    Suppress,
    /// Unexpected fault, logged at error level.
    Propagate,
}

/// Classify a transport fault by its signature.
pub fn classify(err: &TransportError) -> FaultDisposition {
    match err {
        TransportError::Conflict(_)
        | TransportError::RateLimited(_)
        | TransportError::ConnectionClosed(_) => FaultDisposition::Suppress,
        _ => FaultDisposition::Propagate,
    }
}

/// Log a background fault according to its classification.
pub fn log_fault(context: &str, err: &TransportError) {
    match classify(err) {
        FaultDisposition::Suppress => {
            debug!(context, %err, "transient transport fault suppressed")
        }
        FaultDisposition::Propagate => error!(context, %err, "unexpected transport fault"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_signatures_are_suppressed() {
        assert_eq!(
            classify(&TransportError::Conflict("stream conflict".into())),
            FaultDisposition::Suppress
        );
        assert_eq!(
            classify(&TransportError::RateLimited("rate-overlimit".into())),
            FaultDisposition::Suppress
        );
        assert_eq!(
            classify(&TransportError::ConnectionClosed("closed".into())),
            FaultDisposition::Suppress
        );
    }

    #[test]
    fn test_other_faults_propagate() {
        assert_eq!(
            classify(&TransportError::Api("500 - boom".into())),
            FaultDisposition::Propagate
        );
        assert_eq!(
            classify(&TransportError::SendFailed("boom".into())),
            FaultDisposition::Propagate
        );
    }
}
