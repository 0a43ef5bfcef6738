//! Sentence chunking for speech output.
//!
//! Long utterances are fed to the synthesis engine one sentence at a time
//! so cancellation takes effect at the next chunk boundary instead of after
//! the whole utterance.

/// Split text into speakable chunks at sentence terminators.
///
/// A chunk runs up to and including a maximal run of `.`, `!` or `?`, so
/// `"Wait... what?!"` yields `["Wait...", " what?!"]` rather than splitting
/// inside the terminator run. A trailing fragment with no terminator is
/// kept as a final chunk. Concatenating the chunks reproduces the input
/// exactly; whitespace-only chunks are possible and are skipped at playback
/// time, not here.
#[must_use]
pub fn split_speakable(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut prev_terminal = false;

    for ch in text.chars() {
        let terminal = matches!(ch, '.' | '!' | '?');
        if prev_terminal && !terminal {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_terminal = terminal;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_sentence_boundaries() {
        let chunks = split_speakable("Hello there. How are you today?");
        assert_eq!(chunks, vec!["Hello there.", " How are you today?"]);
    }

    #[test]
    fn keeps_terminator_runs_together() {
        let chunks = split_speakable("Wait... what?! Really.");
        assert_eq!(chunks, vec!["Wait...", " what?!", " Really."]);
    }

    #[test]
    fn keeps_unterminated_tail() {
        let chunks = split_speakable("One. two");
        assert_eq!(chunks, vec!["One.", " two"]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_speakable("").is_empty());
    }

    #[test]
    fn concatenation_is_lossless() {
        let text = "Hi!  Nice to meet you... So, what did you eat? Tell me";
        assert_eq!(split_speakable(text).concat(), text);
    }

    #[test]
    fn trailing_whitespace_becomes_its_own_chunk() {
        let chunks = split_speakable("Done. ");
        assert_eq!(chunks, vec!["Done.", " "]);
    }
}
