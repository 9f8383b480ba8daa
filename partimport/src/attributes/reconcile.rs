use super::{AttributeInstance, AttributeMap};

/// Bring `existing` into agreement with `desired`.
///
/// Each desired tag updates at most one existing instance: the first one
/// carrying that tag. Tags with no matching instance are appended, in the
/// map's order. Instances whose tag is not desired are left alone, and no
/// instance is ever removed. Running it again with the same map changes
/// nothing.
pub fn reconcile(desired: &AttributeMap, existing: &mut Vec<AttributeInstance>) {
    let mut remaining = desired.clone();
    let mut updated = 0usize;

    for instance in existing.iter_mut() {
        if let Some(value) = remaining.remove(&instance.tag) {
            instance.text = value;
            updated += 1;
        }
    }

    let appended = remaining.len();
    existing.extend(
        remaining
            .into_iter()
            .map(|(tag, text)| AttributeInstance::new(tag, text)),
    );

    tracing::debug!(updated, appended, "reconciled attributes");
}
