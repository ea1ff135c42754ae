//! Prompt construction for the reactions generator.

use crate::services::providers::GenerationParams;

/// Sampling used for every reactions request, whatever the label count.
pub const REACTION_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.2,
    max_output_tokens: 256,
    top_p: 0.8,
    top_k: 40,
};

/// Build the reactions prompt for the given labels, kept in order and joined with `", "`.
pub fn reactions_prompt<S: AsRef<str>>(labels: &[S]) -> String {
    let joined = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Possible reactions between {}, if no reactions are possible explain the physical \
         phenomenon that these objects are able of performing, and if not that explain their \
         structure and architecture ",
        joined
    )
}
