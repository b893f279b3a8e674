use serde::Serialize;

use maktabati_types::{Category, Id, Item};

/// An item whose name or content contains the search term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub category_id: Id,
    pub item_id: Id,
    pub name: String,
    /// 1 for a category's items, 2 for their children, and so on.
    pub depth: usize,
}

/// Case-insensitive substring search over item names and contents, in
/// document order. A blank term matches nothing.
pub fn search(categories: &[Category], term: &str) -> Vec<SearchHit> {
    let needle: Vec<char> = term.trim().chars().collect();
    let mut hits = Vec::new();
    if needle.is_empty() {
        return hits;
    }
    for category in categories {
        search_items(&category.id, &category.items, &needle, 1, &mut hits);
    }
    hits
}

fn search_items(category_id: &Id, items: &[Item], needle: &[char], depth: usize, hits: &mut Vec<SearchHit>) {
    for item in items {
        if contains_folded(&item.name, needle) || contains_folded(&item.content, needle) {
            hits.push(SearchHit {
                category_id: category_id.clone(),
                item_id: item.id.clone(),
                name: item.name.clone(),
                depth,
            });
        }
        search_items(category_id, &item.children, needle, depth + 1, hits);
    }
}

/// Byte length of the case-insensitive match of `needle` at the start of
/// `hay`, if any.
fn match_len(hay: &str, needle: &[char]) -> Option<usize> {
    let mut chars = hay.char_indices();
    for &n in needle {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map(|(i, _)| i).unwrap_or(hay.len()))
}

fn contains_folded(hay: &str, needle: &[char]) -> bool {
    hay.char_indices().any(|(i, _)| match_len(&hay[i..], needle).is_some())
}

/// Wrap every case-insensitive occurrence of `term` in `<mark>` tags.
///
/// The term is trimmed the way [`search`] trims it, then matched literally.
/// Matches do not overlap; scanning resumes after each one. A blank term
/// returns the text unchanged.
pub fn highlight(text: &str, term: &str) -> String {
    let needle: Vec<char> = term.trim().chars().collect();
    if needle.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match match_len(rest, &needle) {
            Some(len) => {
                out.push_str("<mark>");
                out.push_str(&rest[..len]);
                out.push_str("</mark>");
                rest = &rest[len..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree() -> Vec<Category> {
        let mut art1 = Item::with_id(Id::from_static("a1"), "Article One", "<p>Working hours</p>");
        art1.children.push(Item::with_id(Id::from_static("a1x"), "Annex", "overtime HOURS"));
        let art2 = Item::with_id(Id::from_static("a2"), "Article Two", "Leave");
        let mut cat = Category::with_id(Id::from_static("c"), "Labour", "⚖️");
        cat.items.push(art1);
        cat.items.push(art2);
        vec![cat]
    }

    #[test]
    fn search_matches_names_and_contents_case_insensitively() {
        let hits = search(&tree(), "hours");
        let ids: Vec<&str> = hits.iter().map(|h| h.item_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a1x"]);
        assert_eq!(hits[1].depth, 2);
        assert_eq!(hits[0].category_id, "c");

        let by_name = search(&tree(), "ARTICLE");
        assert_eq!(by_name.len(), 2);
    }

    #[test]
    fn blank_search_matches_nothing() {
        assert!(search(&tree(), "  ").is_empty());
        assert!(search(&tree(), "absent").is_empty());
    }

    #[test]
    fn search_handles_arabic_text() {
        let mut cat = Category::with_id(Id::from_static("t1"), "قانون العمل", "");
        cat.items.push(Item::with_id(Id::from_static("t1-i1"), "المادة (1): أحكام عامة", ""));
        assert_eq!(search(&[cat], "أحكام").len(), 1);
    }

    #[test]
    fn highlight_wraps_each_occurrence() {
        assert_eq!(
            highlight("Hours and hours", "hours"),
            "<mark>Hours</mark> and <mark>hours</mark>"
        );
    }

    #[test]
    fn highlight_treats_term_literally() {
        assert_eq!(highlight("a.b axb", "a.b"), "<mark>a.b</mark> axb");
        assert_eq!(highlight("(1) x", "(1)"), "<mark>(1)</mark> x");
    }

    #[test]
    fn highlight_trims_like_search() {
        assert_eq!(search(&tree(), " hours ").len(), 2);
        assert_eq!(highlight("Working hours", " hours "), "Working <mark>hours</mark>");
    }

    #[test]
    fn highlight_with_blank_term_is_identity() {
        assert_eq!(highlight("text", ""), "text");
        assert_eq!(highlight("text", " "), "text");
    }

    proptest! {
        #[test]
        fn stripping_marks_restores_text(text in "[a-zA-Z ]{0,40}", term in "[a-z]{1,3}") {
            let marked = highlight(&text, &term);
            let stripped = marked.replace("<mark>", "").replace("</mark>", "");
            prop_assert_eq!(stripped, text);
        }

        #[test]
        fn absent_term_leaves_text_alone(text in "[a-z ]{0,40}", term in "[0-9]{1,3}") {
            prop_assert_eq!(highlight(&text, &term), text);
        }
    }
}
