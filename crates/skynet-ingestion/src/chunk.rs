/// Splits `text` into overlapping windows of approximately `window_tokens`
/// tokens with `overlap_tokens` of carry-over between consecutive windows
/// (§4.2 step 2). Token count is approximated by whitespace-delimited words,
/// which is good enough for chunk sizing and keeps this crate free of a
/// tokenizer dependency.
pub fn chunk_text(text: &str, window_tokens: usize, overlap_tokens: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    if words.len() <= window_tokens {
        return vec![words.join(" ")];
    }

    let stride = window_tokens.saturating_sub(overlap_tokens).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + window_tokens).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += stride;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let text = words(10);
        let chunks = chunk_text(&text, 1500, 150);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn long_text_splits_with_overlap() {
        let text = words(2000);
        let chunks = chunk_text(&text, 1500, 150);
        assert!(chunks.len() >= 2);
        // the overlap region (last 150 words of chunk 0) must reappear at
        // the start of chunk 1.
        let first_tail: Vec<&str> = chunks[0].split_whitespace().rev().take(150).collect();
        let second_head: Vec<&str> = chunks[1].split_whitespace().take(150).collect();
        let mut first_tail_fwd = first_tail.clone();
        first_tail_fwd.reverse();
        assert_eq!(first_tail_fwd, second_head);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 1500, 150).is_empty());
    }

    #[test]
    fn last_chunk_covers_the_tail_exactly() {
        let text = words(3200);
        let chunks = chunk_text(&text, 1500, 150);
        let total_words: usize = text.split_whitespace().count();
        let last = chunks.last().unwrap();
        let last_word = last.split_whitespace().last().unwrap();
        assert_eq!(last_word, format!("w{}", total_words - 1));
    }
}
