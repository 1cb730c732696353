use tracing::warn;

use crate::models::Classification;
use crate::vocabulary::Vocabulary;

/// Aggregate the vocabulary classifications of an advisory's weakness
/// identifiers into a single verdict. The most severe signal wins: one
/// yes-mapped identifier outweighs any number of no-mapped ones.
///
/// An empty identifier set carries no signal and yields `Maybe`; so does an
/// identifier the vocabulary has not classified yet, which is logged for
/// triage but never blocks classification.
pub fn classify(weakness_ids: &[String], vocabulary: &Vocabulary) -> Classification {
    if weakness_ids.is_empty() {
        return Classification::Maybe;
    }

    let mut any_yes = false;
    let mut any_maybe = false;
    for weakness_id in weakness_ids {
        let classification = match vocabulary.lookup(weakness_id) {
            Some(classification) => classification,
            None => {
                warn!(weakness = %weakness_id, "Weakness identifier has not been classified yet");
                Classification::Maybe
            }
        };
        match classification {
            Classification::Yes => any_yes = true,
            Classification::Maybe => any_maybe = true,
            Classification::No => {}
        }
    }

    if any_yes {
        Classification::Yes
    } else if any_maybe {
        Classification::Maybe
    } else {
        Classification::No
    }
}
