//! Splitting assistant text into prose and code blocks for display.
//!
//! Fences are matched literally. Whatever follows an opening fence (a
//! language tag, say) stays part of the code text, and an unterminated fence
//! simply leaves the tail as code.

/// Fence delimiter used by model output.
pub const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Prose,
    Code,
}

/// A display block derived from one assistant message. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn prose(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Prose,
            text: text.into(),
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            text: text.into(),
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Partition `content` into alternating prose and code segments.
///
/// Fragments at even positions are prose, odd positions are code. Every
/// fragment is trimmed, and empty prose fragments are kept so the rendered
/// spacing stays stable.
pub fn segment(content: &str) -> Vec<Segment> {
    if !content.contains(FENCE) {
        return vec![Segment::prose(content.trim())];
    }

    content
        .split(FENCE)
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 0 {
                Segment::prose(part.trim())
            } else {
                Segment::code(part.trim())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_prose_segment() {
        assert_eq!(segment("plain text"), vec![Segment::prose("plain text")]);
        assert_eq!(segment("  padded \n"), vec![Segment::prose("padded")]);
    }

    #[test]
    fn test_inline_fence_splits_three_ways() {
        assert_eq!(
            segment("before ```print(1)``` after"),
            vec![
                Segment::prose("before"),
                Segment::code("print(1)"),
                Segment::prose("after"),
            ]
        );
    }

    #[test]
    fn test_edge_fences_keep_empty_prose() {
        assert_eq!(
            segment("```x=1\ny=2```"),
            vec![
                Segment::prose(""),
                Segment::code("x=1\ny=2"),
                Segment::prose(""),
            ]
        );
    }

    #[test]
    fn test_code_keeps_inner_indentation() {
        let segments = segment("Fix:\n```\ndef f():\n    return 1\n```\nDone.");
        assert_eq!(segments[1], Segment::code("def f():\n    return 1"));
        assert_eq!(segments[2], Segment::prose("Done."));
    }

    #[test]
    fn test_language_tag_is_not_parsed() {
        let segments = segment("```python\nprint('hi')\n```");
        assert_eq!(segments[1], Segment::code("python\nprint('hi')"));
        assert!(segments[1].is_code());
    }

    #[test]
    fn test_unterminated_fence_leaves_tail_as_code() {
        assert_eq!(
            segment("intro ```x = 1"),
            vec![Segment::prose("intro"), Segment::code("x = 1")]
        );
    }

    #[test]
    fn test_multiple_blocks_alternate() {
        let kinds: Vec<SegmentKind> = segment("a ```b``` c ```d``` e")
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Prose,
                SegmentKind::Code,
                SegmentKind::Prose,
                SegmentKind::Code,
                SegmentKind::Prose,
            ]
        );
    }

    #[test]
    fn test_segment_is_repeatable() {
        let content = "text ```code``` more";
        assert_eq!(segment(content), segment(content));
    }
}
