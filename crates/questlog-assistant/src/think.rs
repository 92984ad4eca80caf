//! Removal of `<think>...</think>` spans from a growing text stream.
//!
//! The model interleaves a chain-of-thought block with its answer, and the
//! block's delimiters can be split across arbitrary chunk boundaries. The
//! filter is an explicit state machine: a side flag (outside/inside the
//! span) plus a held-back tail that might still turn out to be a partial
//! delimiter. Replaying it over the complete text from scratch always
//! yields the same visible text as the incremental calls.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Outside,
    Inside,
}

pub struct ThinkFilter {
    /// When true, span contents stay visible; only the marker strings are
    /// dropped. Decided once at turn start.
    show_thinking: bool,
    side: Side,
    /// Bytes of the accumulated text already classified.
    consumed: usize,
    /// Tail withheld because it may be a partial delimiter: never shown,
    /// never lost. At most one byte short of a full delimiter.
    pending: String,
    visible: String,
}

impl ThinkFilter {
    pub fn new(show_thinking: bool) -> Self {
        Self {
            show_thinking,
            side: Side::Outside,
            consumed: 0,
            pending: String::new(),
            visible: String::new(),
        }
    }

    /// Feed the *entire* accumulated text so far and get back the visible
    /// text so far. Only the unseen tail is scanned; the result is the same
    /// as scanning from the start every call.
    pub fn filter(&mut self, full_text: &str) -> &str {
        debug_assert!(full_text.len() >= self.consumed, "text is append-only");
        let tail = &full_text[self.consumed..];
        self.consumed = full_text.len();
        if tail.is_empty() {
            return &self.visible;
        }

        let mut work = std::mem::take(&mut self.pending);
        work.push_str(tail);

        let mut i = 0;
        loop {
            match self.side {
                Side::Outside => match work[i..].find(OPEN_TAG) {
                    Some(rel) => {
                        self.visible.push_str(&work[i..i + rel]);
                        i += rel + OPEN_TAG.len();
                        self.side = Side::Inside;
                    }
                    None => {
                        let held = held_suffix_len(&work[i..], OPEN_TAG);
                        let end = work.len() - held;
                        self.visible.push_str(&work[i..end]);
                        self.pending = work[end..].to_string();
                        break;
                    }
                },
                Side::Inside => match work[i..].find(CLOSE_TAG) {
                    Some(rel) => {
                        if self.show_thinking {
                            self.visible.push_str(&work[i..i + rel]);
                        }
                        i += rel + CLOSE_TAG.len();
                        self.side = Side::Outside;
                    }
                    None => {
                        let held = held_suffix_len(&work[i..], CLOSE_TAG);
                        let end = work.len() - held;
                        if self.show_thinking {
                            self.visible.push_str(&work[i..end]);
                        }
                        self.pending = work[end..].to_string();
                        break;
                    }
                },
            }
        }
        &self.visible
    }

    pub fn visible(&self) -> &str {
        &self.visible
    }
}

/// Length of the longest tail of `text` that is a proper prefix of `tag`.
fn held_suffix_len(text: &str, tag: &str) -> usize {
    let max = tag.len().saturating_sub(1).min(text.len());
    for len in (1..=max).rev() {
        if text.ends_with(&tag[..len]) {
            return len;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the filter over `text` split into the given chunks, feeding the
    /// accumulated prefix each time as the contract requires.
    fn filter_chunked(show_thinking: bool, chunks: &[&str]) -> String {
        let mut filter = ThinkFilter::new(show_thinking);
        let mut accumulated = String::new();
        for chunk in chunks {
            accumulated.push_str(chunk);
            filter.filter(&accumulated);
        }
        filter.visible().to_string()
    }

    fn filter_whole(show_thinking: bool, text: &str) -> String {
        let mut filter = ThinkFilter::new(show_thinking);
        filter.filter(text).to_string()
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(filter_whole(false, "hello world"), "hello world");
    }

    #[test]
    fn suppresses_a_think_span() {
        assert_eq!(
            filter_whole(false, "a<think>secret</think>b"),
            "ab"
        );
    }

    #[test]
    fn show_thinking_keeps_contents_but_drops_markers() {
        assert_eq!(
            filter_whole(true, "a<think>secret</think>b"),
            "asecretb"
        );
    }

    #[test]
    fn delimiters_split_across_chunks_are_still_recognized() {
        let visible = filter_chunked(false, &["a<thi", "nk>secret</th", "ink>b"]);
        assert_eq!(visible, "ab");
    }

    #[test]
    fn partial_delimiter_at_the_tail_is_withheld_not_shown() {
        let mut filter = ThinkFilter::new(false);
        assert_eq!(filter.filter("hello <thi"), "hello ");
        // The "<thi" resolves to plain text once more arrives.
        assert_eq!(filter.filter("hello <this is fine"), "hello <this is fine");
    }

    #[test]
    fn unclosed_span_stays_suppressed() {
        let visible = filter_chunked(false, &["before<think>never", " closed"]);
        assert_eq!(visible, "before");
    }

    #[test]
    fn replay_is_identical_for_every_two_way_split() {
        let text = "intro <think>hidden\nreasoning</think> middle <think>more</think> outro";
        let expected_off = filter_whole(false, text);
        let expected_on = filter_whole(true, text);
        for (split, _) in text.char_indices() {
            let chunks = [&text[..split], &text[split..]];
            assert_eq!(
                filter_chunked(false, &chunks),
                expected_off,
                "split at byte {split}"
            );
            assert_eq!(
                filter_chunked(true, &chunks),
                expected_on,
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn replay_is_identical_for_byte_at_a_time_chunks() {
        let text = "x<think>a</think>y<think>b</think>z";
        let singles: Vec<String> = text.chars().map(|c| c.to_string()).collect();
        let chunks: Vec<&str> = singles.iter().map(String::as_str).collect();
        assert_eq!(filter_chunked(false, &chunks), filter_whole(false, text));
    }

    #[test]
    fn conservation_outside_suppressed_spans() {
        let text = "abc<think>ddd</think>efg";
        let visible = filter_whole(false, text);
        let suppressed = "ddd";
        let markers = OPEN_TAG.len() + CLOSE_TAG.len();
        assert_eq!(visible.len() + suppressed.len() + markers, text.len());
        assert_eq!(visible, "abcefg");
    }

    #[test]
    fn close_tag_lookalike_outside_a_span_is_plain_text() {
        assert_eq!(filter_whole(false, "a</think>b"), "a</think>b");
    }

    #[test]
    fn false_partial_prefix_is_eventually_emitted() {
        let visible = filter_chunked(false, &["a<thin", "god>b"]);
        assert_eq!(visible, "a<thingod>b");
    }
}
