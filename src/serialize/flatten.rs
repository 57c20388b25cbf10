//! Resolves every deferred slot of a document in place.

use futures::future::try_join_all;

use super::value::Value;
use crate::errors::Result;

/// Replaces every [`Deferred`](super::Deferred) value inside `document`, at
/// any depth, with the JSON it settles to.
///
/// All pending values are awaited together. The first rejection is
/// returned and the document is left in an unspecified state (slots that
/// were pending may read `null`); callers must discard it.
///
/// Settled values are plain JSON and are not scanned again.
pub async fn flatten(document: &mut Value) -> Result<()> {
    let mut slots: Vec<&mut Value> = Vec::new();
    let mut pending = Vec::new();

    let mut stack: Vec<&mut Value> = vec![document];
    while let Some(value) = stack.pop() {
        if value.is_deferred() {
            if let Value::Deferred(deferred) = std::mem::take(value) {
                log::trace!("Awaiting deferred value '{}'", deferred.label());
                pending.push(deferred.into_future());
            }
            slots.push(value);
            continue;
        }
        match value {
            Value::Array(items) => stack.extend(items.iter_mut()),
            Value::Object(entries) => stack.extend(entries.iter_mut().map(|(_, v)| v)),
            _ => {}
        }
    }

    if pending.is_empty() {
        return Ok(());
    }
    log::debug!("Resolving {} deferred value(s)", pending.len());

    let settled = try_join_all(pending).await?;
    for (slot, json) in slots.into_iter().zip(settled) {
        *slot = Value::from(json);
    }
    Ok(())
}
