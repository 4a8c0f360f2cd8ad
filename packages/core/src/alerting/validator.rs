//! Document validation.
//!
//! [`validate`] checks a parsed document against the receiver and routing
//! invariants and reports the first violation, in this order:
//!
//! 1. a receiver mixing native integrations with managed receivers
//! 2. two receivers sharing a name
//! 3. native and managed receivers in the same document
//! 4. a routing tree deeper than [`MAX_ROUTE_DEPTH`]
//! 5. a route referencing an undefined receiver

use std::collections::HashSet;

use super::classifier::receiver_type;
use super::error::ValidationError;
use super::types::{RawApiAlertingConfig, Receiver, ReceiverType};
use super::walker::{all_receivers, depth, MAX_ROUTE_DEPTH};

/// Validate a parsed document. The input is not modified.
pub fn validate<M>(config: &RawApiAlertingConfig<M>) -> Result<(), ValidationError> {
    for receiver in &config.receivers {
        check_receiver(receiver)?;
    }

    let mut names = HashSet::with_capacity(config.receivers.len());
    for receiver in &config.receivers {
        if !names.insert(receiver.name()) {
            return Err(ValidationError::duplicate_receiver(receiver.name()));
        }
    }

    let mut has_native = false;
    let mut has_managed = false;
    for receiver in &config.receivers {
        match receiver_type(receiver) {
            ReceiverType::Native => has_native = true,
            ReceiverType::Managed => has_managed = true,
        }
    }
    if has_native && has_managed {
        return Err(ValidationError::BackendMix);
    }

    if let Some(route) = &config.routing.route {
        if depth(route) > MAX_ROUTE_DEPTH {
            return Err(ValidationError::RouteTooDeep {
                max_depth: MAX_ROUTE_DEPTH,
            });
        }

        if let Some(missing) = all_receivers(route)
            .into_iter()
            .find(|name| !names.contains(name))
        {
            return Err(ValidationError::undefined_receiver(missing));
        }
    }

    Ok(())
}

/// Reject a receiver that lists managed receivers alongside any native
/// integration. Reports the first populated integration kind.
pub fn check_receiver<M>(receiver: &Receiver<M>) -> Result<(), ValidationError> {
    if receiver.managed.is_empty() {
        return Ok(());
    }

    match receiver.native.populated_kinds().next() {
        Some(kind) => Err(ValidationError::receiver_mix(receiver.name(), kind)),
        None => Ok(()),
    }
}
