//! # Order-Preserving Batch Reconciliation
//!
//! A batch create submits a filtered list of valid hashes in one
//! transaction; the contract emits one creation event per item it
//! actually created, as an ordered subsequence of the submission. This
//! module attributes those events back to the caller's original,
//! unfiltered positions.
//!
//! ## Backend Precondition
//!
//! The event sequence is assumed ordered and non-reordered relative to
//! the valid submitted hashes. A backend that reorders or deduplicates
//! differently would mis-attribute per-item results; the cursor walk
//! bounds-checks and warns about unconsumed events, but cannot repair
//! such a backend.

use tessera_core::EvidenceHash;
use tessera_ledger::CreationEvent;

/// Attribute ordered creation events back to the original submission.
///
/// `original` holds one entry per caller-supplied item, in submission
/// order; `None` marks an item whose hash failed validation and was never
/// submitted. Returns one flag per entry: `true` iff the cursor's event
/// matched that position's hash (case-insensitive). Non-matching
/// positions never advance the cursor, covering both invalid entries and
/// entries the contract filtered as pre-existing.
pub fn reconcile(original: &[Option<EvidenceHash>], events: &[CreationEvent]) -> Vec<bool> {
    let mut results = Vec::with_capacity(original.len());
    let mut cursor = 0usize;
    for item in original {
        let created = match item {
            Some(hash) if cursor < events.len() => {
                events[cursor].hash.eq_ignore_ascii_case(hash.as_str())
            }
            _ => false,
        };
        if created {
            cursor += 1;
        }
        results.push(created);
    }
    if cursor < events.len() {
        tracing::warn!(
            consumed = cursor,
            emitted = events.len(),
            "batch reconciliation left creation events unattributed"
        );
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::SignerAddress;

    fn hash(n: u8) -> EvidenceHash {
        EvidenceHash::new(&format!("0x{:064x}", n)).unwrap()
    }

    fn event(h: &EvidenceHash) -> CreationEvent {
        CreationEvent {
            hash: h.as_str().to_string(),
            signer: SignerAddress::new(&format!("0x{:040x}", 1)).unwrap(),
            signature: "sig".into(),
        }
    }

    #[test]
    fn mixed_batch_attributes_in_order() {
        // valid+new, invalid, valid+new, duplicate of the first
        let h1 = hash(1);
        let h3 = hash(3);
        let original = vec![Some(h1.clone()), None, Some(h3.clone()), Some(h1.clone())];
        let events = vec![event(&h1), event(&h3)];
        assert_eq!(reconcile(&original, &events), vec![true, false, true, false]);
    }

    #[test]
    fn event_hash_case_is_ignored() {
        let h = hash(0xab);
        let mut ev = event(&h);
        ev.hash = ev.hash.to_uppercase().replace("0X", "0x");
        assert_eq!(reconcile(&[Some(h)], &[ev]), vec![true]);
    }

    #[test]
    fn no_events_means_all_false() {
        let original = vec![Some(hash(1)), Some(hash(2))];
        assert_eq!(reconcile(&original, &[]), vec![false, false]);
    }

    #[test]
    fn cursor_never_overruns_short_event_list() {
        let original = vec![Some(hash(1)), Some(hash(2)), Some(hash(3))];
        let events = vec![event(&hash(2))];
        // h1 mismatches, h2 matches and consumes the only event, h3 has
        // nothing left to match against.
        assert_eq!(reconcile(&original, &events), vec![false, true, false]);
    }

    #[test]
    fn all_invalid_consumes_nothing() {
        let original = vec![None, None];
        let events = vec![event(&hash(9))];
        assert_eq!(reconcile(&original, &events), vec![false, false]);
    }

    proptest::proptest! {
        #[test]
        fn result_length_always_matches_input(mask in proptest::collection::vec(proptest::bool::ANY, 0..32)) {
            let original: Vec<_> = mask
                .iter()
                .enumerate()
                .map(|(i, valid)| valid.then(|| hash(i as u8)))
                .collect();
            let events: Vec<_> = original
                .iter()
                .flatten()
                .map(event)
                .collect();
            let results = reconcile(&original, &events);
            proptest::prop_assert_eq!(results.len(), original.len());
            // every valid item matches when the backend echoes all of them
            for (item, created) in original.iter().zip(&results) {
                proptest::prop_assert_eq!(item.is_some(), *created);
            }
        }
    }
}
