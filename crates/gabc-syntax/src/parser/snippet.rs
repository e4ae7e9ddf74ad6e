//! Splits one music group into its `|`-delimited snippets.

use crate::model::Snippet;
use crate::position::Span;

/// Split `content` on every `|`, keeping empty pieces.
///
/// `base` is the absolute offset of `content` in the document. A group
/// without `|` yields exactly one snippet at index 0.
pub fn split(content: &str, base: usize) -> Vec<Snippet<'_>> {
    let mut snippets = Vec::new();
    let mut start = 0;
    for (index, piece) in content.split('|').enumerate() {
        let end = start + piece.len();
        snippets.push(Snippet {
            index,
            content: piece,
            span: Span::new(base + start, base + end),
        });
        start = end + 1;
    }
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(s: &str) -> Vec<&str> {
        split(s, 0).iter().map(|s| s.content).collect()
    }

    #[test]
    fn no_pipe_is_single_snippet() {
        let snippets = split("ce/fgf", 10);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].index, 0);
        assert_eq!(snippets[0].span, Span::new(10, 16));
    }

    #[test]
    fn empty_pieces_are_preserved() {
        assert_eq!(contents("f||g"), vec!["f", "", "g"]);
        assert_eq!(contents("|"), vec!["", ""]);
        assert_eq!(contents(""), vec![""]);
    }

    #[test]
    fn spans_skip_separators() {
        let snippets = split("ab|cd", 100);
        assert_eq!(snippets[1].span, Span::new(103, 105));
        assert_eq!(snippets[1].index, 1);
    }

    #[test]
    fn joining_reconstructs_group() {
        for group in ["ce/fgf|peGlsa6tohl|toppt2lss2lsim2", "f||g", "|x|", "", "gwh"] {
            let joined = contents(group).join("|");
            assert_eq!(joined, group);
        }
    }
}
