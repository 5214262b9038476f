//! Recipient registration: peers exposed as ordinary functions.
//!
//! For every `(peer, description)` pair a `talk_to_<identity>` function is
//! added to the registry. Each one takes a `message` and a `recipient_name`
//! selector whose allowed values are exactly the registered identities, and
//! forwards the message to the selected peer.
//!
//! All synthesized functions share one immutable identity → peer map built
//! up front, so routing depends only on the validated selector value.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    types::TypeDescriptor,
};

use crate::{
    registry::{Function, FunctionRegistry},
    traits::Peer,
};

/// Parameter carrying the text forwarded to the peer.
pub const MESSAGE_PARAM: &str = "message";
/// Parameter selecting which peer receives the message.
pub const RECIPIENT_PARAM: &str = "recipient_name";

/// A peer plus the capability text shown to the model.
pub type Recipient = (Rc<dyn Peer>, String);

/// The function name used for the peer with `identity`.
pub fn recipient_function_name(identity: &str) -> String {
    format!("talk_to_{identity}")
}

/// A peer's identity: its name, lowercased.
pub fn identity_of(peer: &dyn Peer) -> String {
    peer.name().to_lowercase()
}

/// Install one forwarding function per recipient into `registry`.
///
/// Returns the identities in registration order. Fails with
/// `ParleyError::Config` if two peers share an identity (names compared
/// case-insensitively); in that case nothing is registered.
pub fn register_recipients(
    registry: &mut FunctionRegistry,
    recipients: Vec<Recipient>,
) -> ParleyResult<Vec<String>> {
    let mut peers: BTreeMap<String, Rc<dyn Peer>> = BTreeMap::new();
    let mut identities = Vec::with_capacity(recipients.len());

    for (peer, _) in &recipients {
        let identity = identity_of(peer.as_ref());
        if peers.contains_key(&identity) {
            return Err(ParleyError::Config {
                reason: format!(
                    "recipient '{}' collides with another recipient named '{}'",
                    peer.name(),
                    identity
                ),
            });
        }
        peers.insert(identity.clone(), Rc::clone(peer));
        identities.push(identity);
    }

    let peers = Rc::new(peers);
    let selector = TypeDescriptor::enumeration(identities.iter().cloned());

    for (peer, description) in recipients {
        let identity = identity_of(peer.as_ref());
        let name = recipient_function_name(&identity);
        let routes = Rc::clone(&peers);

        let function = Function::new(name.clone(), move |args| {
            let message: String = args.get(MESSAGE_PARAM)?;
            let selected: String = args.get(RECIPIENT_PARAM)?;
            let target = routes.get(&selected.to_lowercase()).ok_or_else(|| {
                ParleyError::dispatch(args.function(), format!("unknown recipient '{selected}'"))
            })?;

            debug!(function = %args.function(), recipient = %target.name(), "forwarding message to peer");
            target.invoke(&message).map(Value::String).map_err(|e| match e {
                ParleyError::Dispatch { .. } => e,
                other => ParleyError::dispatch(args.function(), other.to_string()),
            })
        })
        .doc(format!("Ask {}, which {}.", peer.name(), description))
        .param::<String>(MESSAGE_PARAM)
        .param_typed(RECIPIENT_PARAM, selector.clone());

        info!(function = %name, recipient = %peer.name(), "registered recipient");
        registry.register(function);
    }

    Ok(identities)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
