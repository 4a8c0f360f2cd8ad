//! Receiver and document backend classification.

use super::types::{Backend, Receiver, ReceiverType};

/// `Managed` when the receiver lists any managed receiver configs,
/// otherwise `Native`. Mixing is the validator's concern, not this one's.
pub fn receiver_type<M>(receiver: &Receiver<M>) -> ReceiverType {
    if receiver.managed.is_empty() {
        ReceiverType::Native
    } else {
        ReceiverType::Managed
    }
}

/// Backend of the first receiver, or `Undetermined` when there are none.
///
/// Only meaningful once the receivers are known to be homogeneous.
pub fn classify<M>(receivers: &[Receiver<M>]) -> Backend {
    receivers
        .first()
        .map_or(Backend::Undetermined, |receiver| receiver_type(receiver).into())
}
